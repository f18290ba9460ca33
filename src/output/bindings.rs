use std::collections::BTreeSet;

use crate::canonical::canonicalize::normalize;
use crate::field::field_model::{Field, FieldGroup};
use crate::output::error::SynthesisError;

// ============================================================================
// Document-binding block — raw reference → fill expression
// ============================================================================

/// One binding block per output document, mapping every raw reference a
/// field subsumes back to the expression that fills it.
///
/// Paired booleans render as `expr` for the `_yes` box and `not expr` for
/// the `_no` box. Signature expressions are conditioned on the final
/// rendition so drafts circulate unsigned.
pub fn binding_block(doc_name: &str, fields: &[Field]) -> Result<String, SynthesisError> {
    let mut seen = BTreeSet::new();
    for field in fields {
        if !seen.insert(field.display.to_string()) {
            return Err(SynthesisError::DuplicateDisplayPath {
                path: field.display.to_string(),
                block: "attachment",
            });
        }
    }

    let mut out = String::new();
    out.push_str("---\n");
    out.push_str("attachment:\n");
    out.push_str(&format!("  name: {}\n", doc_name));
    out.push_str(&format!("  filename: {}\n", filename_of(doc_name)));
    out.push_str("  fields:\n");

    for field in fields {
        for raw in &field.raws {
            let expression = binding_expression(field, raw.raw_name());
            out.push_str(&format!(
                "    - \"{}\": ${{ {} }}\n",
                raw.raw_name(),
                expression
            ));
        }
    }
    Ok(out)
}

fn binding_expression(field: &Field, raw_name: &str) -> String {
    let display = field.display.to_string();

    if field.paired {
        // The negative box reads the inverted expression.
        if normalize(raw_name).ends_with("_no") {
            return format!("not {}", display);
        }
        return display;
    }

    if field.group == FieldGroup::Signature {
        return format!("{} if i == \"final\" else ''", display);
    }

    display
}

fn filename_of(doc_name: &str) -> String {
    let mut out = String::new();
    for ch in doc_name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.ends_with('_') && !out.is_empty() {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    format!("{}.pdf", out)
}
