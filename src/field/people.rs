use std::collections::BTreeSet;

use crate::canonical::canonicalize::{canonicalize, settable_path, MatchKind};
use crate::field::consolidate::merge_duplicates;
use crate::field::field_model::{Field, FieldGroup, FieldOrigin};
use crate::path::path_model::{CanonicalPath, SegIndex};
use crate::rules::tables::RuleTables;
use crate::source::reference::RawReference;

// ============================================================================
// Person-like collection detection and builtin promotion
// ============================================================================

/// Scan raw references for roots that look like person collections: known
/// person names, singular-person aliases, or (template-origin) a root
/// followed by a person-like attribute chain. Returns distinct candidate
/// collection roots, pluralized.
pub fn detect_person_candidates(
    tables: &RuleTables,
    refs: &[RawReference],
) -> BTreeSet<String> {
    let mut candidates = BTreeSet::new();

    for reference in refs {
        match reference {
            RawReference::Form(f) => {
                let Ok(resolution) = canonicalize(tables, &f.name) else {
                    continue;
                };
                match resolution.matched {
                    MatchKind::PersonReference
                    | MatchKind::PersonAttribute
                    | MatchKind::CustomPerson => {
                        candidates.insert(resolution.path.root().to_string());
                    }
                    MatchKind::PluralCollection
                        if tables.is_person_collection(resolution.path.root()) =>
                    {
                        candidates.insert(resolution.path.root().to_string());
                    }
                    _ => {}
                }
            }
            RawReference::Template(t) => {
                let Some(path) = CanonicalPath::parse(&t.path) else {
                    continue;
                };
                let root = path.root();
                if tables.is_person_collection(root) {
                    candidates.insert(root.to_string());
                } else if let Some(plural) =
                    tables.is_person_singular(root).then(|| tables.pluralize(root)).flatten()
                {
                    candidates.insert(plural.to_string());
                } else if has_person_attribute_chain(tables, &path) {
                    // Undeclared root with a person-shaped attribute chain.
                    candidates.insert(root.to_string());
                }
            }
        }
    }

    candidates
}

fn has_person_attribute_chain(tables: &RuleTables, path: &CanonicalPath) -> bool {
    path.segments
        .get(1)
        .map(|seg| tables.person_attribute_roots().contains(&seg.name.as_str()))
        .unwrap_or(false)
}

/// Reclassify fields matching user-declared custom person collections as
/// built-in, rewrite their canonical paths onto the new root, and re-run
/// duplicate-path merging. Pure: returns a new field list.
pub fn promote_custom_people(
    tables: &RuleTables,
    fields: Vec<Field>,
    names: &[String],
) -> Vec<Field> {
    if names.is_empty() {
        return fields;
    }
    let promoted = tables.with_custom_people(names.iter().map(|s| s.as_str()));

    let rewritten = fields
        .into_iter()
        .map(|field| promote_one(&promoted, field))
        .collect();

    merge_duplicates(rewritten)
}

fn promote_one(tables: &RuleTables, mut field: Field) -> Field {
    if field.group != FieldGroup::Custom || field.paired {
        return field;
    }

    match field.origin {
        FieldOrigin::Form => {
            let Ok(resolution) = canonicalize(tables, field.primary_raw_name()) else {
                return field;
            };
            if resolution.matched == MatchKind::Unmatched {
                return field;
            }
            field.display = resolution.path;
            field.settable = settable_path(tables, &field.display);
            field.group = FieldGroup::BuiltIn;
        }
        FieldOrigin::Template => {
            // Template paths carry the declared singular alias or the
            // plural root verbatim; re-root onto the plural collection.
            let root = field.display.root().to_string();
            let plural = if tables.is_custom_person(&root) {
                root.clone()
            } else {
                match tables.pluralize(&root) {
                    Some(p) if tables.is_custom_person(p) => p.to_string(),
                    _ => return field,
                }
            };
            let mut new_root = field.display.segments[0].clone();
            new_root.name = plural;
            if new_root.index.is_none() && field.display.segments.len() > 1 {
                new_root.index = Some(SegIndex::Num(0));
            }
            field.display = field.display.with_root(new_root);
            field.settable = settable_path(tables, &field.display);
            field.group = FieldGroup::BuiltIn;
        }
    }
    field
}
