//! Supported languages and their speech configuration.

use crate::SwitchError;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the six languages the agent can speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    #[default]
    En,
    Es,
    Fr,
    De,
    It,
    Ta,
}

impl LanguageCode {
    /// Every supported code, in announcement order.
    pub const ALL: [LanguageCode; 6] = [
        LanguageCode::En,
        LanguageCode::Es,
        LanguageCode::Fr,
        LanguageCode::De,
        LanguageCode::It,
        LanguageCode::Ta,
    ];

    /// Bare ISO 639-1 code, e.g. "fr".
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::En => "en",
            LanguageCode::Es => "es",
            LanguageCode::Fr => "fr",
            LanguageCode::De => "de",
            LanguageCode::It => "it",
            LanguageCode::Ta => "ta",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageCode {
    type Err = SwitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LanguageCode::ALL
            .into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SwitchError::UnsupportedLanguage(s.to_string()))
    }
}

/// Speech configuration and greeting for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageProfile {
    pub display_name: String,
    /// Code in the recognizer's code space; may be a regional variant.
    pub recognizer_code: String,
    pub synthesizer_code: String,
    pub greeting: String,
}

fn builtin_profile(code: LanguageCode) -> LanguageProfile {
    let (display_name, recognizer_code, greeting) = match code {
        LanguageCode::En => (
            "English",
            "en",
            "Hello! I'm now speaking in English. How can I help you today?",
        ),
        LanguageCode::Es => (
            "Spanish",
            "es",
            "¡Hola! Ahora estoy hablando en español. ¿Cómo puedo ayudarte hoy?",
        ),
        // Canadian French on the recognizer side
        LanguageCode::Fr => (
            "French",
            "fr-CA",
            "Bonjour ! Je parle maintenant en français. Comment puis-je vous aider aujourd'hui ?",
        ),
        LanguageCode::De => (
            "German",
            "de",
            "Hallo! Ich spreche jetzt Deutsch. Wie kann ich Ihnen heute helfen?",
        ),
        LanguageCode::It => (
            "Italian",
            "it",
            "Ciao! Ora sto parlando in italiano. Come posso aiutarti oggi?",
        ),
        LanguageCode::Ta => (
            "Tamil",
            "ta",
            "வணக்கம்! நான் இப்போது தமிழில் பேசுகிறேன். இன்று நான் உங்களுக்கு எவ்வாறு உதவ முடியும்?",
        ),
    };

    LanguageProfile {
        display_name: display_name.to_string(),
        recognizer_code: recognizer_code.to_string(),
        synthesizer_code: code.as_str().to_string(),
        greeting: greeting.to_string(),
    }
}

/// Read-only table of language profiles, one entry per [`LanguageCode`].
///
/// Lookups are total: the table is indexed by the closed enum, so there is
/// no missing-entry case. Overrides are only possible while building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRegistry {
    profiles: [LanguageProfile; 6],
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LanguageRegistry {
    pub fn builtin() -> Self {
        Self {
            profiles: LanguageCode::ALL.map(builtin_profile),
        }
    }

    /// Replace the recognizer code for one language.
    pub fn with_recognizer_code(mut self, code: LanguageCode, value: impl Into<String>) -> Self {
        self.profiles[code.index()].recognizer_code = value.into();
        self
    }

    /// Replace the synthesizer code for one language.
    pub fn with_synthesizer_code(mut self, code: LanguageCode, value: impl Into<String>) -> Self {
        self.profiles[code.index()].synthesizer_code = value.into();
        self
    }

    pub fn profile_for(&self, code: LanguageCode) -> &LanguageProfile {
        &self.profiles[code.index()]
    }

    pub fn display_name(&self, code: LanguageCode) -> &str {
        &self.profile_for(code).display_name
    }

    /// The utterance spoken when a session starts, listing every language.
    pub fn capability_announcement(&self) -> String {
        let names: Vec<&str> = LanguageCode::ALL
            .iter()
            .map(|code| self.display_name(*code))
            .collect();
        let listed = match names.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{}, or {}", rest.join(", "), last),
            Some((last, _)) => (*last).to_string(),
            None => String::new(),
        };
        format!(
            "Hi there! I can speak in {listed}. Just ask me to switch to one of them. \
             Which language would you like me to use?"
        )
    }
}
