use std::collections::BTreeMap;

use crate::field::field_model::{Field, FieldKind};
use crate::path::path_model::CanonicalPath;
use crate::rules::tables::RuleTables;

// ============================================================================
// Parent collections — derived review grouping, never persisted
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParentKind {
    /// Scalar with no owning structure.
    Primitive,
    /// Singleton object with attributes.
    Object,
    /// Indexable collection.
    List,
}

/// The (display, settable) pair for one bare attribute of a parent.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeEntry {
    pub display: CanonicalPath,
    pub settable: CanonicalPath,
}

/// A derived grouping of fields sharing a root. Used only for review and
/// table output; recompute it whenever the field list changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentCollection {
    pub root: String,
    pub kind: ParentKind,
    /// Bare attribute name → its paths. For primitives the single entry
    /// is keyed by the root itself.
    pub attributes: BTreeMap<String, AttributeEntry>,
}

/// Group a field list by root. Skip-tagged fields contribute nothing to
/// review output.
pub fn derive_parents(tables: &RuleTables, fields: &[Field]) -> Vec<ParentCollection> {
    let mut parents: BTreeMap<String, ParentCollection> = BTreeMap::new();

    for field in fields {
        if field.kind == FieldKind::Skip {
            continue;
        }
        let root = field.display.root().to_string();
        let kind = parent_kind(tables, &field.display);

        let entry = parents.entry(root.clone()).or_insert_with(|| ParentCollection {
            root: root.clone(),
            kind,
            attributes: BTreeMap::new(),
        });
        // A root seen as both scalar and structured settles on the most
        // structured interpretation.
        if kind > entry.kind {
            entry.kind = kind;
        }

        let key = attribute_key(&field.display);
        entry.attributes.insert(
            key,
            AttributeEntry {
                display: field.display.clone(),
                settable: field.settable.clone(),
            },
        );
    }

    parents.into_values().collect()
}

fn parent_kind(tables: &RuleTables, display: &CanonicalPath) -> ParentKind {
    let root = display.root();
    if display.segments[0].index.is_some() || tables.is_plural_collection(root) {
        ParentKind::List
    } else if display.segments.len() > 1 {
        ParentKind::Object
    } else {
        ParentKind::Primitive
    }
}

/// The bare attribute a field hangs off: the attribute chain with
/// trailing accessor calls removed, or the root itself for primitives.
fn attribute_key(display: &CanonicalPath) -> String {
    if display.segments.len() == 1 {
        return display.root().to_string();
    }
    display.strip_trailing_calls().attr_chain()
}
