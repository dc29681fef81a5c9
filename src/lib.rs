// src/lib.rs
//! Roomcast - build-pipeline notifications to chat rooms.

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod notify;

// Re-export commonly used types
pub use cli::LogFormat;
pub use command::CommandSpec;
pub use config::{Config, SecretString};
pub use notify::{
    AuthRecord, AuthRegistry, Color, Dispatcher, MessageSource, NotificationRequest,
    NotifyOptions, OnFailure, Outcome, RoomClient, RoomNotifier,
};
