//! `/chaos` command handling: parse the command, run one repeating send loop
//! per sender, and drive the provider's inbound stream.

pub mod command;
pub mod dispatcher;
pub mod error;
pub mod manager;
pub mod sentence;

pub use {
    command::{ChaosCommand, ChaosParams, parse_command},
    dispatcher::{ChaosBot, IgnoreReason, Outcome},
    error::{Error, Result},
    manager::{ChaosLoopInfo, ChaosManager},
    sentence::{RandomSentences, SentenceSource},
};
