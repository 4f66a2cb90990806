//! Validated prompt text for a generation request.
use crate::error::ValidationError;

/// Non-empty description typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    /// Reject empty and whitespace-only input; keep the rest trimmed.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyPrompt);
        }
        Ok(Prompt(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The text actually sent to the provider: `"<prompt>, <suffix>"`.
    pub fn styled(&self, suffix: &str) -> String {
        let suffix = suffix.trim();
        if suffix.is_empty() {
            self.0.clone()
        } else {
            format!("{}, {}", self.0, suffix)
        }
    }
}
