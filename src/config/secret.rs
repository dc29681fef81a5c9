//! Secret string wrapper that never appears in logs.

/// Wrapper for secrets that never appears in logs.
///
/// API tokens grant write access to a room, so they must never leak
/// through logging or error output. The `Debug` and `Display`
/// implementations always show `[REDACTED]` instead of the actual value.
///
/// # Example
///
/// ```
/// use roomcast::config::SecretString;
///
/// let token = SecretString::new("my-room-token".to_string());
/// assert_eq!(format!("{:?}", token), "[REDACTED]");
/// assert_eq!(token.expose(), "my-room-token");
/// ```
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    /// Creates a new `SecretString` from a regular `String`.
    pub fn new(s: String) -> Self {
        SecretString(s)
    }

    /// Exposes the underlying secret value.
    ///
    /// Use with care - never pass the result to logging functions or any
    /// output that could be visible to unauthorized users.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl std::fmt::Display for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}
