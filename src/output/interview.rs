use crate::canonical::error::NameWarning;
use crate::field::field_model::Field;
use crate::output::bindings::binding_block;
use crate::output::error::SynthesisError;
use crate::output::flow::flow_block;
use crate::output::review::review_blocks;
use crate::output::screens::{question_block, Screen, ScreenSpec};
use crate::rules::tables::RuleTables;

// ============================================================================
// Interview assembly — the full generated-output sequence
// ============================================================================

/// The generated interview definition: an ordered, independently
/// concatenable sequence of text blocks, plus everything that went wrong
/// along the way without stopping the rest.
#[derive(Debug, Default)]
pub struct InterviewOutput {
    pub blocks: Vec<String>,
    pub warnings: Vec<NameWarning>,
    /// Blocks withheld because emitting them would be inconsistent.
    pub skipped: Vec<SynthesisError>,
}

impl InterviewOutput {
    /// The whole definition as one document.
    pub fn concatenated(&self) -> String {
        self.blocks.join("")
    }
}

/// Resolve externally supplied screen groupings against the field list.
/// Unknown field names are recorded and dropped; the screen still builds.
pub fn resolve_screens(
    specs: &[ScreenSpec],
    fields: &[Field],
    skipped: &mut Vec<SynthesisError>,
) -> Vec<Screen> {
    specs
        .iter()
        .map(|spec| {
            let mut members = Vec::new();
            for name in &spec.fields {
                match fields.iter().find(|f| f.display.to_string() == *name) {
                    Some(field) => members.push(field.clone()),
                    None => skipped.push(SynthesisError::UnknownScreenField {
                        field: name.clone(),
                        screen: spec.id.clone().unwrap_or_else(|| spec.prompt.clone()),
                    }),
                }
            }
            Screen::new(spec.id.as_deref(), &spec.prompt, members)
        })
        .collect()
}

/// One screen per askable field, in document order. Used when the host
/// supplies no groupings.
pub fn default_screens(fields: &[Field]) -> Vec<Screen> {
    let mut ordered: Vec<&Field> = fields.iter().filter(|f| f.kind.is_askable()).collect();
    ordered.sort_by_key(|f| f.order);
    ordered
        .into_iter()
        .map(|field| {
            let prompt = crate::output::screens::prompt_label(&field.label);
            Screen::new(None, &prompt, vec![field.clone()])
        })
        .collect()
}

/// Emit the full block sequence: one question block per screen, the
/// ordered flow block, the document-binding block, and one review block
/// per parent collection.
///
/// A failed block is skipped and recorded; every other block still emits.
pub fn synthesize_interview(
    tables: &RuleTables,
    fields: &[Field],
    specs: &[ScreenSpec],
    doc_name: &str,
) -> InterviewOutput {
    let mut output = InterviewOutput::default();

    let screens = if specs.is_empty() {
        default_screens(fields)
    } else {
        resolve_screens(specs, fields, &mut output.skipped)
    };

    for screen in &screens {
        match question_block(screen) {
            Ok(block) => output.blocks.push(block),
            Err(e) => output.skipped.push(e),
        }
    }

    output.blocks.push(flow_block(tables, &screens));

    match binding_block(doc_name, fields) {
        Ok(block) => output.blocks.push(block),
        Err(e) => output.skipped.push(e),
    }

    output.blocks.extend(review_blocks(tables, fields));

    output
}
