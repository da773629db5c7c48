//! Voice command processing
//!
//! Classification of transcription fragments into the closed command set,
//! and the dispatcher that applies the debounce contract.

pub mod commands;
mod dispatcher;

pub use commands::{MIN_COMMAND_LEN, VoiceCommand, classify, sanitize_for_speech};
pub use dispatcher::CommandDispatcher;
