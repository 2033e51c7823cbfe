use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{name} must be set")]
    MissingEnv { name: String },

    #[error("{name} is invalid: {reason}")]
    InvalidEnv { name: String, reason: String },
}

impl Error {
    #[must_use]
    pub fn missing_env(name: impl Into<String>) -> Self {
        Self::MissingEnv { name: name.into() }
    }

    #[must_use]
    pub fn invalid_env(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEnv {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
