//! Configuration loading and validation for roomcast.
//!
//! This module handles loading the YAML configuration file, validation,
//! and environment variable substitution for secrets.

mod env;
mod secret;
mod types;

pub use env::resolve_env_vars;
pub use secret::SecretString;
pub use types::{AuthConfig, Config, DEFAULT_CONFIG_PATH, HttpConfig, NotifyDefaults};

#[cfg(test)]
mod tests;
