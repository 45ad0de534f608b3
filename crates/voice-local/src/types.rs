use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizerConfig {
    pub model: String,
    /// Recognizer-specific language code, e.g. "fr-CA"
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesizerConfig {
    pub model: String,
    pub language: String,
    #[serde(default)]
    pub voice: Option<String>,
}

/// A single text utterance handed to an output channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub ts: Option<OffsetDateTime>,
}
