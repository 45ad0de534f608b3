use crate::{RecognizerConfig, Result, SynthesizerConfig};
use async_trait::async_trait;

/// Speech-to-text component attached to a session.
pub trait Recognizer {
    fn new(config: RecognizerConfig) -> Self
    where
        Self: Sized;

    /// Currently active recognizer language code.
    fn language(&self) -> &str;

    /// Switch the active language. `code` is in the recognizer's own code space.
    fn set_language(&mut self, code: &str) -> Result<()>;
}

/// Text-to-speech component attached to a session.
pub trait Synthesizer {
    fn new(config: SynthesizerConfig) -> Self
    where
        Self: Sized;

    fn language(&self) -> &str;

    fn set_language(&mut self, code: &str) -> Result<()>;
}

/// Channel the agent speaks through.
#[async_trait]
pub trait SpeechOutput: Send + Sync {
    async fn say(&self, text: &str) -> Result<()>;
}
