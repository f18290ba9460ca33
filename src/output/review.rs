use crate::canonical::canonicalize::full_display_path;
use crate::field::field_model::Field;
use crate::field::parent::{derive_parents, ParentCollection, ParentKind};
use crate::output::screens::prompt_label;
use crate::path::path_model::CanonicalPath;
use crate::rules::tables::RuleTables;

// ============================================================================
// Review blocks — one per parent collection
// ============================================================================

/// One review block per parent collection: a table for lists, an
/// attribute list for objects, a single read-out for primitives.
pub fn review_blocks(tables: &RuleTables, fields: &[Field]) -> Vec<String> {
    derive_parents(tables, fields)
        .iter()
        .map(|parent| review_block(tables, parent))
        .collect()
}

fn review_block(tables: &RuleTables, parent: &ParentCollection) -> String {
    match parent.kind {
        ParentKind::List => list_table(tables, parent),
        ParentKind::Object => object_review(parent),
        ParentKind::Primitive => primitive_review(parent),
    }
}

fn list_table(tables: &RuleTables, parent: &ParentCollection) -> String {
    let mut out = String::new();
    out.push_str("---\n");
    out.push_str(&format!("table: {}_table\n", parent.root));
    out.push_str(&format!("rows: {}\n", parent.root));
    out.push_str("columns:\n");

    for (attr, entry) in &parent.attributes {
        if attr == &parent.root {
            // A bare element reference reads back as its composed display.
            let display = full_display_path(tables, &CanonicalPath::ident(parent.root.clone()));
            let chain = display.attr_chain();
            let value = if chain.is_empty() {
                "row_item".to_string()
            } else {
                format!("row_item.{}", chain)
            };
            out.push_str(&format!(
                "  - {}: {}\n",
                prompt_label(&column_label(attr)),
                value
            ));
        } else {
            out.push_str(&format!(
                "  - {}: row_item.{}\n",
                prompt_label(&column_label(attr)),
                entry.display.attr_chain()
            ));
        }
    }
    out
}

fn object_review(parent: &ParentCollection) -> String {
    let mut out = String::new();
    out.push_str("---\n");
    out.push_str("review:\n");
    out.push_str(&format!("  - Revisit: {}\n", parent.root));
    out.push_str("    fields:\n");
    for (attr, entry) in &parent.attributes {
        out.push_str(&format!(
            "      - {}: ${{ {} }}\n",
            prompt_label(&column_label(attr)),
            entry.display
        ));
    }
    out
}

fn primitive_review(parent: &ParentCollection) -> String {
    let mut out = String::new();
    out.push_str("---\n");
    out.push_str("review:\n");
    for (attr, entry) in &parent.attributes {
        out.push_str(&format!("  - Revisit: {}\n", entry.settable));
        out.push_str(&format!(
            "    button: |\n      {}: ${{ {} }}\n",
            prompt_label(&column_label(attr)),
            entry.display
        ));
    }
    out
}

/// `address.county` reads as "address county" in a column heading.
fn column_label(attr: &str) -> String {
    attr.replace(['.', '_'], " ")
}
