use thiserror::Error;

pub type Result<T, E = VoiceError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("backend not supported: {0}")]
    Unsupported(&'static str),
    #[error("backend error: {0}")]
    Backend(String),
    #[error("output channel error: {0}")]
    Output(String),
}
