//! Request inputs for the reading stats API
//!
//! Validation of path parameters before they reach the cache or the source.

/// Maximum accepted username length
pub const MAX_USERNAME_LENGTH: usize = 64;

/// A validated username path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Validates a raw username.
    ///
    /// Returns an error message if validation fails.
    pub fn parse(raw: impl Into<String>) -> Result<Self, String> {
        let raw = raw.into();

        if raw.is_empty() {
            return Err("Username cannot be empty".to_string());
        }
        if raw.len() > MAX_USERNAME_LENGTH {
            return Err(format!(
                "Username exceeds maximum length of {} characters",
                MAX_USERNAME_LENGTH
            ));
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err("Username may only contain letters, digits, '_', '-' and '.'".to_string());
        }

        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
