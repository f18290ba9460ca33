use std::collections::BTreeMap;

use crate::field::field_model::{Field, FieldKind, FieldOrigin};
use crate::path::path_model::CanonicalPath;

// ============================================================================
// Consolidation — pure, idempotent Fields -> Fields passes
// ============================================================================

/// Run the consolidation passes in order: yes/no pairing, then
/// duplicate-path merging. The result satisfies the display-path
/// uniqueness invariant for form-origin fields.
pub fn consolidate(fields: Vec<Field>) -> Vec<Field> {
    merge_duplicates(pair_yesno(fields))
}

/// Merge paired `_yes`/`_no` drafts sharing a guessed label into one
/// boolean field with the suffix stripped from both paths.
///
/// Pairing keys on (guessed label, suffix-stripped display root) rather
/// than the label alone, so two unrelated fields under different roots
/// with a coincidentally identical label never mis-pair.
pub fn pair_yesno(fields: Vec<Field>) -> Vec<Field> {
    // Candidate indices grouped by pairing key.
    let mut groups: BTreeMap<(String, String), Vec<usize>> = BTreeMap::new();
    for (i, field) in fields.iter().enumerate() {
        if field.paired || !is_pair_candidate(field) {
            continue;
        }
        let stem = strip_boolean_suffix(&field.display);
        let key = (field.label.clone(), stem.root().to_string());
        groups.entry(key).or_default().push(i);
    }

    let mut merged_into: BTreeMap<usize, usize> = BTreeMap::new(); // no -> yes
    for indices in groups.values() {
        let yes = indices
            .iter()
            .find(|&&i| last_segment_ends(&fields[i], "_yes"));
        let no = indices
            .iter()
            .find(|&&i| last_segment_ends(&fields[i], "_no"));
        if let (Some(&yes), Some(&no)) = (yes, no) {
            if yes != no {
                merged_into.insert(no, yes);
            }
        }
    }

    let mut out = Vec::with_capacity(fields.len());
    for (i, field) in fields.iter().enumerate() {
        if merged_into.contains_key(&i) {
            continue; // absorbed into its _yes partner
        }
        match merged_into.iter().find(|&(_, &yes)| yes == i) {
            Some((&no, _)) => out.push(merge_pair(field, &fields[no])),
            None => out.push(field.clone()),
        }
    }
    out
}

fn is_pair_candidate(field: &Field) -> bool {
    last_segment_ends(field, "_yes") || last_segment_ends(field, "_no")
}

fn last_segment_ends(field: &Field, suffix: &str) -> bool {
    field
        .display
        .segments
        .last()
        .map(|s| s.name.ends_with(suffix))
        .unwrap_or(false)
}

fn merge_pair(yes: &Field, no: &Field) -> Field {
    let display = strip_boolean_suffix(&yes.display);
    let settable = strip_boolean_suffix(&yes.settable);

    // When the negative box precedes the affirmative one, the generated
    // question reads better negative-first.
    let kind = if no.order < yes.order {
        FieldKind::NoYes { radio: true }
    } else {
        FieldKind::YesNo { radio: true }
    };

    let mut raws = yes.raws.clone();
    raws.extend(no.raws.iter().cloned());

    Field {
        raws,
        display,
        settable,
        kind,
        group: yes.group,
        origin: yes.origin,
        label: yes.label.clone(),
        order: yes.order.min(no.order),
        max_length: None,
        choices: None,
        paired: true,
    }
}

fn strip_boolean_suffix(path: &CanonicalPath) -> CanonicalPath {
    let mut out = path.clone();
    if let Some(last) = out.segments.last_mut() {
        if let Some(stem) = last.name.strip_suffix("_yes") {
            last.name = stem.to_string();
        } else if let Some(stem) = last.name.strip_suffix("_no") {
            last.name = stem.to_string();
        }
    }
    out
}

/// Collapse fields sharing a display path into one field that accumulates
/// every raw reference. Template-origin fields skip this pass: extraction
/// already set-deduplicates them.
pub fn merge_duplicates(fields: Vec<Field>) -> Vec<Field> {
    let mut out: Vec<Field> = Vec::with_capacity(fields.len());
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();

    for field in fields {
        if field.origin == FieldOrigin::Template {
            out.push(field);
            continue;
        }
        let key = field.display.to_string();
        match seen.get(&key) {
            Some(&at) => {
                let kept = &mut out[at];
                kept.raws.extend(field.raws);
                kept.order = kept.order.min(field.order);
                if kept.max_length.is_some() && field.max_length.is_some() {
                    kept.max_length = kept.max_length.max(field.max_length);
                }
            }
            None => {
                seen.insert(key, out.len());
                out.push(field);
            }
        }
    }
    out
}
