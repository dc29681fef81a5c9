//! Command-line interface for roomcast using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;
use crate::notify::OnFailure;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format for log aggregation.
    Json,
}

/// Post build-pipeline notifications to chat rooms.
#[derive(Parser, Debug)]
#[command(name = "roomcast")]
#[command(version)]
#[command(about = "Post build-pipeline notifications to chat rooms")]
pub struct Cli {
    /// Path to configuration file.
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Validate configuration and exit.
    #[arg(long = "validate")]
    pub validate: bool,

    /// Log format: text or json.
    #[arg(long = "log-format", value_enum, default_value_t = LogFormat::Text, env = "LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Name of the registered authentication to notify.
    #[arg(long = "room", required_unless_present = "validate")]
    pub room: Option<String>,

    /// Message text, or a command line with --from-command.
    #[arg(short = 'm', long = "message")]
    pub message: Option<String>,

    /// Run the message as a command and post its standard output.
    #[arg(long = "from-command", requires = "message")]
    pub from_command: bool,

    /// Working directory for --from-command.
    #[arg(long = "workdir", requires = "from_command")]
    pub workdir: Option<PathBuf>,

    /// Message color: yellow, green, red, purple, gray or random.
    #[arg(long = "color")]
    pub color: Option<String>,

    /// Trigger a user notification in the room.
    #[arg(long = "notify")]
    pub notify: bool,

    /// Send the message as HTML instead of plain text.
    #[arg(long = "html")]
    pub html: bool,

    /// Sender name shown in the room.
    #[arg(long = "from")]
    pub from: Option<String>,

    /// What a failed notification does to the reported outcome.
    #[arg(long = "on-failure", value_enum, default_value_t = OnFailure::Fail)]
    pub on_failure: OnFailure,

    /// Check that the room's credentials are accepted and exit.
    #[arg(long = "test", conflicts_with = "message")]
    pub test: bool,
}
