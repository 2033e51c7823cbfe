//! Bot configuration, read once from the environment at startup.
//!
//! Recognized variables: `WALLET_KEY`, `ENCRYPTION_KEY` (both required) and
//! `XMTP_ENV` (`local`, `dev` or `production`; defaults to `dev`).

pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{ENCRYPTION_KEY_VAR, NETWORK_ENV_VAR, WALLET_KEY_VAR},
    schema::{BotConfig, NetworkEnv},
};
