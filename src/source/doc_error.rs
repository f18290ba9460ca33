use std::fmt;

// ============================================================================
// Source document failure taxonomy (introspection boundary)
// ============================================================================

/// Why a source document could not be introspected. Reported once,
/// categorized, never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocErrorKind {
    /// The document is corrupt or cannot be read at all.
    Unreadable,
    /// The document ends before its declared structure does.
    Truncated,
    /// The bytes are not the expected document format.
    WrongFormat,
}

impl DocErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocErrorKind::Unreadable => "unreadable",
            DocErrorKind::Truncated => "truncated",
            DocErrorKind::WrongFormat => "wrong-format",
        }
    }
}

/// A categorized source-document failure, surfaced to the host as
/// `(error_kind, message)`.
#[derive(Debug, Clone)]
pub struct DocError {
    pub kind: DocErrorKind,
    pub message: String,
}

impl DocError {
    pub fn new(kind: DocErrorKind, message: impl Into<String>) -> Self {
        DocError { kind, message: message.into() }
    }
}

impl fmt::Display for DocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} document: {}", self.kind.as_str(), self.message)
    }
}

impl std::error::Error for DocError {}
