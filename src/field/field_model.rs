use crate::path::path_model::CanonicalPath;
use crate::source::reference::RawReference;

// ============================================================================
// Field — the unit of classification
// ============================================================================

/// Rendering style for a multiple-choice field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceStyle {
    Radio,
    Checkbox,
    Dropdown,
    Combobox,
}

/// Data-entry type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Area,
    /// Boolean where the affirmative box carries the variable.
    YesNo { radio: bool },
    /// Boolean phrased negatively; checked means false.
    NoYes { radio: bool },
    Integer,
    Number,
    Currency,
    Date,
    Email,
    Multiselect,
    Choice(ChoiceStyle),
    File,
    Signature,
    /// Computed by the interview, never asked.
    Code,
    /// Present in the source but excluded from screens entirely.
    Skip,
}

impl FieldKind {
    /// Whether a screen may ask this field.
    pub fn is_askable(&self) -> bool {
        !matches!(self, FieldKind::Code | FieldKind::Skip)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    /// Matches a reserved naming convention; needs no custom prompt.
    BuiltIn,
    Signature,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOrigin {
    Form,
    Template,
}

/// One logical field: the raw references it subsumes, how it reads back,
/// and what must be assigned to populate it.
///
/// After consolidation no two fields in a list share a display path;
/// consolidation passes are the only code that mutates fields, and they
/// rebuild the list rather than editing in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Raw occurrences subsumed by this field; never empty.
    pub raws: Vec<RawReference>,
    /// How the field reads back in generated text.
    pub display: CanonicalPath,
    /// What must be assigned; differs from `display` for computed accessors.
    pub settable: CanonicalPath,
    pub kind: FieldKind,
    pub group: FieldGroup,
    pub origin: FieldOrigin,
    /// Guessed human label, used for prompts and yes/no pairing.
    pub label: String,
    /// Position in the source document.
    pub order: usize,
    /// Estimated character capacity, from form geometry.
    pub max_length: Option<usize>,
    pub choices: Option<Vec<String>>,
    /// This field consolidates a paired `_yes`/`_no` boolean.
    pub paired: bool,
}

impl Field {
    /// The label/path of the first raw occurrence.
    pub fn primary_raw_name(&self) -> &str {
        self.raws[0].raw_name()
    }

    pub fn raw_names(&self) -> impl Iterator<Item = &str> {
        self.raws.iter().map(|r| r.raw_name())
    }
}
