use crate::canonical::canonicalize::{canonicalize, normalize, settable_path, MatchKind};
use crate::canonical::error::{CanonicalizeError, NameWarning};
use crate::field::field_model::{ChoiceStyle, Field, FieldGroup, FieldKind, FieldOrigin};
use crate::path::path_model::CanonicalPath;
use crate::rules::tables::RuleTables;
use crate::source::reference::{BoundingBox, FormFieldRef, RawReference, WidgetKind};

// ============================================================================
// Field classifier — raw references → draft fields
// ============================================================================

/// Average glyph width, in points, for capacity estimation.
const AVG_GLYPH_WIDTH: f64 = 6.0;
/// Line height, in points, for multi-line capacity estimation.
const LINE_HEIGHT: f64 = 12.0;

/// The result of classifying one document's references. Canonicalization
/// failures are collected per field and never abort sibling classification.
#[derive(Debug, Default)]
pub struct ClassifyOutcome {
    pub fields: Vec<Field>,
    pub warnings: Vec<NameWarning>,
    pub errors: Vec<CanonicalizeError>,
}

/// Build one draft field per raw reference. The output still contains
/// duplicates and unpaired booleans; run it through
/// [`crate::field::consolidate::consolidate`] to get the logical field list.
pub fn classify_references(tables: &RuleTables, refs: &[RawReference]) -> ClassifyOutcome {
    let mut outcome = ClassifyOutcome::default();

    for (seq, reference) in refs.iter().enumerate() {
        match classify_one(tables, reference, seq) {
            Ok((field, warning)) => {
                if let Some(w) = warning {
                    outcome.warnings.push(w);
                }
                outcome.fields.push(field);
            }
            Err(e) => outcome.errors.push(e),
        }
    }

    outcome
}

fn classify_one(
    tables: &RuleTables,
    reference: &RawReference,
    seq: usize,
) -> Result<(Field, Option<NameWarning>), CanonicalizeError> {
    let raw_name = reference.raw_name();
    let resolution = canonicalize(tables, raw_name)?;
    let display = resolution.path;
    let settable = settable_path(tables, &display);

    let origin = match reference {
        RawReference::Form(_) => FieldOrigin::Form,
        RawReference::Template(_) => FieldOrigin::Template,
    };

    let group = classify_group(&display, resolution.matched, reference);
    let kind = infer_kind(tables, reference, &display, resolution.matched);
    let choices = extract_choices(reference);
    let kind = apply_choice_kind(kind, &choices, reference);

    let max_length = match (&kind, reference) {
        (FieldKind::Text | FieldKind::Area, RawReference::Form(f)) => {
            f.bbox.as_ref().map(estimated_capacity)
        }
        _ => None,
    };

    let warning = match (origin, resolution.matched) {
        (FieldOrigin::Form, MatchKind::Unmatched) => Some(NameWarning {
            field: raw_name.to_string(),
            message: "label matches no known naming convention; treated as a free-form custom field"
                .to_string(),
        }),
        _ => None,
    };

    let order = match reference {
        RawReference::Form(f) => f.order,
        RawReference::Template(_) => seq,
    };

    let field = Field {
        raws: vec![reference.clone()],
        label: guess_label(raw_name),
        display,
        settable,
        kind,
        group,
        origin,
        order,
        max_length,
        choices,
        paired: false,
    };

    Ok((field, warning))
}

fn classify_group(
    display: &CanonicalPath,
    matched: MatchKind,
    reference: &RawReference,
) -> FieldGroup {
    let signature_like = display
        .segments
        .last()
        .map(|s| s.name == "signature")
        .unwrap_or(false)
        || matches!(
            reference,
            RawReference::Form(FormFieldRef { widget: WidgetKind::Signature, .. })
        );
    if signature_like {
        return FieldGroup::Signature;
    }

    match matched {
        MatchKind::Unmatched => FieldGroup::Custom,
        _ => FieldGroup::BuiltIn,
    }
}

/// Type inference, in priority order: explicit suffix hints, paired
/// yes/no naming, widget metadata, capacity estimate, then plain text.
fn infer_kind(
    tables: &RuleTables,
    reference: &RawReference,
    display: &CanonicalPath,
    matched: MatchKind,
) -> FieldKind {
    // Reserved whole words are computed, never asked.
    if matched == MatchKind::ReservedWord {
        return FieldKind::Code;
    }

    let name = normalize(reference.raw_name());
    if name == "null" || name == "ignore" {
        return FieldKind::Skip;
    }

    if let Some(kind) = suffix_hint(&name, display) {
        return kind;
    }

    if name.ends_with("_yes") || name.ends_with("_no") {
        return FieldKind::YesNo { radio: false };
    }

    if let RawReference::Form(f) = reference {
        match f.widget {
            WidgetKind::Checkbox => return FieldKind::YesNo { radio: false },
            WidgetKind::Signature => return FieldKind::Signature,
            WidgetKind::Text | WidgetKind::Unknown => {}
        }
        if let Some(bbox) = &f.bbox {
            if estimated_capacity(bbox) > tables.area_threshold() {
                return FieldKind::Area;
            }
        }
    }

    FieldKind::Text
}

fn suffix_hint(name: &str, display: &CanonicalPath) -> Option<FieldKind> {
    let last = display.segments.last()?;
    if last.name == "signature" {
        return Some(FieldKind::Signature);
    }
    if last.name == "format" && last.call {
        return Some(FieldKind::Date);
    }
    if last.name == "email" {
        return Some(FieldKind::Email);
    }
    if last.name == "age_in_years" && last.call {
        return Some(FieldKind::Integer);
    }

    if name.ends_with("_date") || name.ends_with("_birthdate") {
        return Some(FieldKind::Date);
    }
    if name.ends_with("_amount")
        || name.ends_with("_fee")
        || name.ends_with("_cost")
        || name.ends_with("_owed")
    {
        return Some(FieldKind::Currency);
    }
    if name.ends_with("_value") || name.ends_with("_percentage") {
        return Some(FieldKind::Number);
    }
    if name.ends_with("_count") || name.ends_with("_quantity") {
        return Some(FieldKind::Integer);
    }
    if name.ends_with("_email") {
        return Some(FieldKind::Email);
    }
    if name.ends_with("_description") || name.ends_with("_notes") || name.ends_with("_reason") {
        return Some(FieldKind::Area);
    }
    None
}

/// Choice lists arrive through the form's `extra` metadata.
fn extract_choices(reference: &RawReference) -> Option<Vec<String>> {
    let RawReference::Form(f) = reference else {
        return None;
    };
    let extra = f.extra.as_ref()?;
    let values = extra.get("choices")?.as_array()?;
    let choices: Vec<String> = values
        .iter()
        .filter_map(|v| v.as_str().map(|s| s.to_string()))
        .collect();
    if choices.is_empty() { None } else { Some(choices) }
}

fn apply_choice_kind(
    kind: FieldKind,
    choices: &Option<Vec<String>>,
    reference: &RawReference,
) -> FieldKind {
    if choices.is_none() {
        return kind;
    }
    // Explicit hints win over choice metadata.
    if !matches!(kind, FieldKind::Text | FieldKind::YesNo { .. }) {
        return kind;
    }
    let multi = match reference {
        RawReference::Form(f) => f
            .extra
            .as_ref()
            .and_then(|e| e.get("multi"))
            .and_then(|m| m.as_bool())
            .unwrap_or(false),
        RawReference::Template(_) => false,
    };
    if multi {
        FieldKind::Multiselect
    } else {
        FieldKind::Choice(ChoiceStyle::Dropdown)
    }
}

/// Character capacity estimated from widget geometry.
fn estimated_capacity(bbox: &BoundingBox) -> usize {
    let cols = (bbox.width() / AVG_GLYPH_WIDTH).floor().max(1.0) as usize;
    let rows = (bbox.height() / LINE_HEIGHT).floor().max(1.0) as usize;
    cols * rows
}

/// Guess a human label from a raw name: normalization, minus the paired
/// boolean suffix, minus digit runs, underscores as spaces.
pub fn guess_label(raw_name: &str) -> String {
    // Path punctuation becomes a separator before normalization so dotted
    // template paths keep their word boundaries.
    let separated = raw_name.replace(['.', '[', ']', '(', ')'], "_");
    let name = normalize(&separated);
    let stripped = name
        .strip_suffix("_yes")
        .or_else(|| name.strip_suffix("_no"))
        .unwrap_or(&name);

    let words: Vec<String> = stripped
        .split('_')
        .map(|w| w.trim_end_matches(|c: char| c.is_ascii_digit()))
        .filter(|w| !w.is_empty() && *w != "i")
        .map(|w| w.to_string())
        .collect();

    words.join(" ")
}
