//! Centralized error types for roomcast using thiserror.

use thiserror::Error;

/// Errors related to configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load config file: {0}")]
    LoadError(String),
    #[error("invalid configuration: {0}")]
    ValidationError(String),
    #[error("invalid authentication '{name}': {message}")]
    InvalidAuthentication { name: String, message: String },
}

/// A color value outside the set accepted by the room notification API.
///
/// Raised at the point the value is parsed, before any request is built:
/// a bad color is a configuration bug, not a runtime condition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color '{0}', expected one of: yellow, green, red, purple, gray, random")]
pub struct InvalidColor(pub String);

/// Errors related to notification dispatch.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("no authentication registered for room '{0}'")]
    UnknownRoom(String),
    #[error("resolved message is empty")]
    EmptyMessage,
    #[error("failed to reach the chat service: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("chat service returned status {status}, expected {expected}")]
    UnexpectedStatus { status: u16, expected: u16 },
}

/// Errors related to deriving the message text from a local command.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("empty command line")]
    EmptyCommandLine,
    #[error("failed to launch command: {0}")]
    LaunchFailed(String),
    #[error("command exited with code {0}")]
    NonZeroExit(i32),
}
