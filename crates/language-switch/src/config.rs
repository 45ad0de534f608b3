use crate::{LanguageCode, LanguageRegistry};
use serde::{Deserialize, Serialize};
use voice_local::{RecognizerConfig, SynthesizerConfig};

/// Fixed model selection and persona for the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// System prompt handed to the language model that picks tools.
    pub instructions: String,
    pub stt_model: String,
    pub llm_model: String,
    pub tts_model: String,
    pub default_language: LanguageCode,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            instructions: "You are a friendly voice assistant. \
                           You should speak clearly, and if the user asks, \
                           switch your responses into their chosen language. \
                           Avoid any unpronounceable characters."
                .to_string(),
            stt_model: "nova-2-general".to_string(),
            llm_model: "gpt-4o".to_string(),
            tts_model: "eleven_turbo_v2_5".to_string(),
            default_language: LanguageCode::En,
        }
    }
}

impl AgentConfig {
    pub fn recognizer_config(&self, registry: &LanguageRegistry) -> RecognizerConfig {
        RecognizerConfig {
            model: self.stt_model.clone(),
            language: registry
                .profile_for(self.default_language)
                .recognizer_code
                .clone(),
        }
    }

    pub fn synthesizer_config(&self, registry: &LanguageRegistry) -> SynthesizerConfig {
        SynthesizerConfig {
            model: self.tts_model.clone(),
            language: registry
                .profile_for(self.default_language)
                .synthesizer_code
                .clone(),
            voice: None,
        }
    }
}
