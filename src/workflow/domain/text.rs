//! Length and content rules for user-entered text.

use super::{TaskDomainError, TextField};
use serde::{Deserialize, Serialize};

/// Character limits applied to names and descriptions.
///
/// One description limit is shared by tasks and projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLimits {
    /// Maximum characters in a task or project name.
    pub max_name_chars: usize,
    /// Maximum characters in a task or project description.
    pub max_description_chars: usize,
}

impl FieldLimits {
    /// Default maximum name length.
    pub const DEFAULT_MAX_NAME_CHARS: usize = 50;
    /// Default maximum description length.
    pub const DEFAULT_MAX_DESCRIPTION_CHARS: usize = 200;

    /// Validates and normalizes a required name.
    ///
    /// Surrounding whitespace is trimmed before the checks run.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyName`] for blank input or
    /// [`TaskDomainError::TooLong`] when the trimmed name exceeds the limit.
    pub fn name(&self, field: TextField, raw: &str) -> Result<String, TaskDomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyName { field });
        }
        check_length(field, trimmed, self.max_name_chars)?;
        Ok(trimmed.to_owned())
    }

    /// Validates and normalizes an optional description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TooLong`] when the trimmed description
    /// exceeds the limit.
    pub fn description(&self, field: TextField, raw: &str) -> Result<String, TaskDomainError> {
        let trimmed = raw.trim();
        check_length(field, trimmed, self.max_description_chars)?;
        Ok(trimmed.to_owned())
    }
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            max_name_chars: Self::DEFAULT_MAX_NAME_CHARS,
            max_description_chars: Self::DEFAULT_MAX_DESCRIPTION_CHARS,
        }
    }
}

fn check_length(field: TextField, value: &str, limit: usize) -> Result<(), TaskDomainError> {
    let actual = value.chars().count();
    if actual > limit {
        return Err(TaskDomainError::TooLong {
            field,
            limit,
            actual,
        });
    }
    Ok(())
}
