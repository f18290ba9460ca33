use std::collections::BTreeSet;

use crate::field::field_model::Field;
use crate::output::screens::Screen;
use crate::rules::tables::RuleTables;

// ============================================================================
// Flow block — ordered trigger expressions
// ============================================================================

/// The expression that causes one field to be asked: the collection's
/// bulk-gather call when this is the first field of a not-yet-instantiated
/// collection, else the field's settable path directly.
///
/// `gathered` carries the collections already instantiated earlier in the
/// flow, so each gather emits exactly once, at its first field.
pub fn trigger_for(
    tables: &RuleTables,
    field: &Field,
    gathered: &mut BTreeSet<String>,
) -> Option<String> {
    if !field.kind.is_askable() {
        return None;
    }
    let root = field.display.root().to_string();
    let is_collection =
        field.display.segments[0].index.is_some() || tables.is_plural_collection(&root);

    if is_collection && !gathered.contains(&root) {
        gathered.insert(root.clone());
        Some(format!("{}.gather()", root))
    } else {
        Some(field.settable.to_string())
    }
}

/// One ordered flow block listing each screen's trigger expression.
/// A trigger equal to one already emitted is skipped, never duplicated.
pub fn flow_block(tables: &RuleTables, screens: &[Screen]) -> String {
    let mut gathered = BTreeSet::new();
    let mut emitted = BTreeSet::new();
    let mut lines = Vec::new();

    for screen in screens {
        for field in &screen.fields {
            if let Some(trigger) = trigger_for(tables, field, &mut gathered) {
                if emitted.insert(trigger.clone()) {
                    lines.push(trigger);
                }
                // Only the screen's first askable field drives the screen.
                break;
            }
        }
    }

    render_flow(&lines)
}

/// Flow over a bare field list (no screen groupings): one trigger per
/// field in document order, deduplicated.
pub fn flow_block_from_fields(tables: &RuleTables, fields: &[Field]) -> String {
    let mut ordered: Vec<&Field> = fields.iter().collect();
    ordered.sort_by_key(|f| f.order);

    let mut gathered = BTreeSet::new();
    let mut emitted = BTreeSet::new();
    let mut lines = Vec::new();

    for field in ordered {
        if let Some(trigger) = trigger_for(tables, field, &mut gathered) {
            if emitted.insert(trigger.clone()) {
                lines.push(trigger);
            }
        }
    }

    render_flow(&lines)
}

fn render_flow(lines: &[String]) -> String {
    let mut out = String::new();
    out.push_str("---\n");
    out.push_str("mandatory: True\n");
    out.push_str("code: |\n");
    for line in lines {
        out.push_str(&format!("  {}\n", line));
    }
    out.push_str("  interview_complete\n");
    out
}
