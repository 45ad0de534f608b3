use thiserror::Error;

pub type Result<T, E = SwitchError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("unsupported language code: {0}")]
    UnsupportedLanguage(String),
}
