use thiserror::Error;

/// Errors raised by the syntax generators
///
/// Both kinds are caller-correctable: the input is rejected as a whole and no
/// partial syntax is produced. The `Display` form is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// Parallel lists of unequal length, or a count that is not a positive integer
    /// or exceeds [`MAX_COUNT`]
    #[error("{0}")]
    StructuralMismatch(String),

    /// No formula (or an unknown formula) was chosen where at least one is required
    #[error("{0}")]
    InvalidSelection(String),
}

impl SyntaxError {
    pub fn mismatch(message: impl Into<String>) -> Self {
        SyntaxError::StructuralMismatch(message.into())
    }

    pub fn selection(message: impl Into<String>) -> Self {
        SyntaxError::InvalidSelection(message.into())
    }
}

pub type Result<T, E = SyntaxError> = std::result::Result<T, E>;

/// Largest rank, attribute or brand count a generator accepts
pub const MAX_COUNT: u32 = 1000;

/// Reject counts above [`MAX_COUNT`]
pub(crate) fn check_count(what: &str, count: u32) -> Result<u32> {
    if count > MAX_COUNT {
        return Err(SyntaxError::mismatch(format!(
            "{} must be at most {}, got {}",
            what, MAX_COUNT, count
        )));
    }
    Ok(count)
}
