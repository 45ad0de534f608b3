//! voice-local: speech recognizer, synthesizer and output-channel traits with a mock backend
//!
//! The agent never owns a speech pipeline of its own. It talks to whatever
//! recognizer, synthesizer and output channel the hosting session attaches,
//! through the traits defined here. The default build enables a `mock`
//! backend that records every call so flows are testable on any host.

mod types;
pub use types::{RecognizerConfig, SynthesizerConfig, Utterance};

mod error;
pub use error::{Result, VoiceError};

mod traits;
pub use traits::{Recognizer, SpeechOutput, Synthesizer};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{CallLog, MockOutput, MockRecognizer, MockSynthesizer};

pub mod plugin;

/// Initialize the voice backend system
pub fn init() -> Result<()> {
    tracing::info!("Initializing voice-local system");
    Ok(())
}
