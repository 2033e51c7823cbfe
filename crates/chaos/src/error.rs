use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Channel(#[from] chaosbot_channels::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
