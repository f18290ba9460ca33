use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::field::field_model::{ChoiceStyle, Field, FieldKind};
use crate::output::error::SynthesisError;

// ============================================================================
// Screen blocks — prompt plus per-field input directives
// ============================================================================

/// An externally supplied screen grouping: a prompt, the display paths of
/// the fields it asks (in order), and an optional stable identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenSpec {
    pub prompt: String,
    pub fields: Vec<String>,
    #[serde(default)]
    pub id: Option<String>,
}

/// A resolved screen: ordered fields plus prompt text and a stable id.
#[derive(Debug, Clone)]
pub struct Screen {
    pub id: String,
    pub prompt: String,
    pub fields: Vec<Field>,
}

impl Screen {
    pub fn new(spec_id: Option<&str>, prompt: &str, fields: Vec<Field>) -> Self {
        let id = match spec_id {
            Some(id) => id.to_string(),
            None => slugify(prompt),
        };
        Screen { id, prompt: prompt.to_string(), fields }
    }
}

/// Generate one question block for a screen. Fields tagged skip/code are
/// excluded; a screen whose fields all drop out still emits its prompt.
pub fn question_block(screen: &Screen) -> Result<String, SynthesisError> {
    let askable: Vec<&Field> = screen
        .fields
        .iter()
        .filter(|f| f.kind.is_askable())
        .collect();

    // Inconsistent bindings are worse than a missing block.
    let mut seen = BTreeSet::new();
    for field in &askable {
        if !seen.insert(field.display.to_string()) {
            return Err(SynthesisError::DuplicateDisplayPath {
                path: field.display.to_string(),
                block: "question",
            });
        }
    }

    let mut out = String::new();
    out.push_str("---\n");
    out.push_str(&format!("id: {}\n", screen.id));
    out.push_str("question: |\n");
    for line in screen.prompt.lines() {
        out.push_str(&format!("  {}\n", line));
    }

    if askable.is_empty() {
        out.push_str("continue button field: ");
        out.push_str(&screen.id.replace('-', "_"));
        out.push('\n');
        return Ok(out);
    }

    out.push_str("fields:\n");
    for field in askable {
        out.push_str(&format!(
            "  - {}: {}\n",
            prompt_label(&field.label),
            field.settable
        ));
        for directive in directives(field) {
            out.push_str(&format!("    {}\n", directive));
        }
    }
    Ok(out)
}

/// Input directives keyed by the field's type tag.
fn directives(field: &Field) -> Vec<String> {
    let mut lines = Vec::new();
    match &field.kind {
        FieldKind::Text => {
            if let Some(n) = field.max_length {
                lines.push(format!("maxlength: {}", n));
            }
        }
        FieldKind::Area => {
            lines.push("input type: area".to_string());
            if let Some(n) = field.max_length {
                lines.push(format!("maxlength: {}", n));
            }
        }
        FieldKind::YesNo { radio } => {
            lines.push(format!(
                "datatype: {}",
                if *radio { "yesnoradio" } else { "yesno" }
            ));
        }
        FieldKind::NoYes { radio } => {
            lines.push(format!(
                "datatype: {}",
                if *radio { "noyesradio" } else { "noyes" }
            ));
        }
        FieldKind::Integer => lines.push("datatype: integer".to_string()),
        FieldKind::Number => lines.push("datatype: number".to_string()),
        FieldKind::Currency => {
            // Numeric with a minimum: amounts never go negative.
            lines.push("datatype: currency".to_string());
            lines.push("min: 0".to_string());
        }
        FieldKind::Date => lines.push("datatype: date".to_string()),
        FieldKind::Email => lines.push("datatype: email".to_string()),
        FieldKind::Multiselect => {
            lines.push("datatype: multiselect".to_string());
            lines.extend(choice_lines(field));
        }
        FieldKind::Choice(style) => {
            let datatype = match style {
                ChoiceStyle::Radio => "radio",
                ChoiceStyle::Checkbox => "checkboxes",
                ChoiceStyle::Dropdown => "dropdown",
                ChoiceStyle::Combobox => "combobox",
            };
            lines.push(format!("datatype: {}", datatype));
            lines.extend(choice_lines(field));
        }
        FieldKind::File => lines.push("datatype: file".to_string()),
        FieldKind::Signature => lines.push("datatype: signature".to_string()),
        FieldKind::Code | FieldKind::Skip => {}
    }
    lines
}

fn choice_lines(field: &Field) -> Vec<String> {
    let Some(choices) = &field.choices else {
        return Vec::new();
    };
    let mut lines = vec!["choices:".to_string()];
    for choice in choices {
        lines.push(format!("  - {}", choice));
    }
    lines
}

/// First letter capitalized, rest as guessed.
pub fn prompt_label(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn slugify(prompt: &str) -> String {
    let mut out = String::new();
    let mut last_dash = false;
    for ch in prompt.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash && !out.is_empty() {
            out.push('-');
            last_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}
