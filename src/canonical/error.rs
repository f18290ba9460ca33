use std::fmt;

// ============================================================================
// Canonicalization failures — recognized-but-invalid labels
// ============================================================================

/// A label that matched a known naming pattern but is invalid as written.
/// Carries an issue code and a corrective suggestion; callers surface it
/// rather than guessing, since a silent coercion risks a subtly wrong
/// output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalizeError {
    /// A person reference written with index 0. Labels are 1-based, so
    /// `user0` is almost always a miswritten `user1`.
    ZeroIndex { label: String, suggestion: String },

    /// The digit group could not be read as an index (overflow or stray
    /// characters that survived normalization).
    BadDigits { label: String, digits: String },

    /// Nothing was left of the label after normalization.
    EmptyLabel { label: String },
}

impl CanonicalizeError {
    pub fn code(&self) -> &'static str {
        match self {
            CanonicalizeError::ZeroIndex { .. } => "zero-indexed-person",
            CanonicalizeError::BadDigits { .. } => "bad-index-digits",
            CanonicalizeError::EmptyLabel { .. } => "empty-label",
        }
    }

    /// The label as it appeared in the source document.
    pub fn label(&self) -> &str {
        match self {
            CanonicalizeError::ZeroIndex { label, .. }
            | CanonicalizeError::BadDigits { label, .. }
            | CanonicalizeError::EmptyLabel { label } => label,
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            CanonicalizeError::ZeroIndex { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }
}

impl fmt::Display for CanonicalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalizeError::ZeroIndex { label, suggestion } => write!(
                f,
                "'{}' uses index 0, but person labels count from 1; did you mean '{}'?",
                label, suggestion
            ),
            CanonicalizeError::BadDigits { label, digits } => write!(
                f,
                "'{}' has an unreadable index '{}'; use a plain 1-based number",
                label, digits
            ),
            CanonicalizeError::EmptyLabel { label } => write!(
                f,
                "'{}' is empty after normalization; give the field a descriptive name",
                label
            ),
        }
    }
}

impl std::error::Error for CanonicalizeError {}

/// A non-fatal naming problem: the label classified fine but will read
/// poorly or failed to resolve to a known pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameWarning {
    pub field: String,
    pub message: String,
}

impl fmt::Display for NameWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
