//! language-switch: spoken-language switching for a voice agent
//!
//! This crate holds the language registry (display names, recognizer and
//! synthesizer codes, greetings), the per-conversation session state and the
//! controller that applies a language change to the attached speech handles
//! and announces it.

mod error;
pub use error::{Result, SwitchError};

mod language;
pub use language::{LanguageCode, LanguageProfile, LanguageRegistry};

mod state;
pub use state::{SessionState, Transition};

mod config;
pub use config::AgentConfig;

pub mod controller;
pub use controller::{Announcement, LanguageSwitchController, SwitchOutcome};

/// Initialize the language switch system
pub fn init() -> Result<()> {
    tracing::info!("Initializing Language Switch system");
    Ok(())
}
