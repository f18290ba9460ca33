use std::fmt;

// ============================================================================
// Synthesis failures — scoped to the affected output block
// ============================================================================

/// Why one generated block could not be emitted. Other blocks are
/// unaffected; the caller collects these alongside the successful output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    /// Two fields share a display path — the consolidation invariant was
    /// violated upstream. Emitting would produce inconsistent bindings,
    /// so the block is dropped instead.
    DuplicateDisplayPath { path: String, block: &'static str },

    /// A screen grouping names a field that is not in the field list.
    UnknownScreenField { field: String, screen: String },
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisError::DuplicateDisplayPath { path, block } => write!(
                f,
                "duplicate display path '{}'; {} block not generated",
                path, block
            ),
            SynthesisError::UnknownScreenField { field, screen } => write!(
                f,
                "screen '{}' references unknown field '{}'",
                screen, field
            ),
        }
    }
}

impl std::error::Error for SynthesisError {}
