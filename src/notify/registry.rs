//! Authentication registry: named room credentials, searched by name.

use crate::config::{AuthConfig, SecretString, resolve_env_vars};
use crate::error::ConfigError;

/// A named credential binding a human-readable room name to its access
/// token and actual room id.
#[derive(Debug, Clone)]
pub struct AuthRecord {
    name: String,
    token: SecretString,
    room: String,
}

impl AuthRecord {
    pub fn new(name: impl Into<String>, token: SecretString, room: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token,
            room: room.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    pub fn room(&self) -> &str {
        &self.room
    }
}

/// Ordered collection of authentication records.
///
/// Registries are small, human-curated room lists, so lookup is a linear
/// scan. Names are unique by convention only; the first match wins.
#[derive(Debug, Default)]
pub struct AuthRegistry {
    records: Vec<AuthRecord>,
}

impl AuthRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record. Duplicate names are allowed; `find_by_name`
    /// returns the earliest registration.
    pub fn register(&mut self, record: AuthRecord) {
        self.records.push(record);
    }

    /// Find the first record whose name exactly equals `name`.
    ///
    /// An empty name never matches.
    pub fn find_by_name(&self, name: &str) -> Option<&AuthRecord> {
        if name.is_empty() {
            return None;
        }
        self.records.iter().find(|record| record.name() == name)
    }

    /// All registered room names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.name())
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Build the registry from configuration, resolving `${ENV_VAR}`
    /// patterns in tokens.
    ///
    /// # Returns
    ///
    /// * `Ok(AuthRegistry)` - registry with all configured records
    /// * `Err(Vec<ConfigError>)` - all errors encountered while resolving
    pub fn from_config(auths: &[AuthConfig]) -> Result<Self, Vec<ConfigError>> {
        let mut registry = AuthRegistry::new();
        let mut errors = Vec::new();

        for auth in auths {
            match resolve_env_vars(&auth.token) {
                Ok(token) => {
                    tracing::debug!(
                        name = %auth.name,
                        room = %auth.room,
                        "Registered authentication"
                    );
                    registry.register(AuthRecord::new(
                        auth.name.clone(),
                        SecretString::new(token),
                        auth.room.clone(),
                    ));
                }
                Err(e) => errors.push(ConfigError::InvalidAuthentication {
                    name: auth.name.clone(),
                    message: format!("token: {}", e),
                }),
            }
        }

        if errors.is_empty() {
            Ok(registry)
        } else {
            Err(errors)
        }
    }
}
