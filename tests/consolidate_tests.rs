use formwright::field::classifier::classify_references;
use formwright::field::consolidate::consolidate;
use formwright::field::field_model::{Field, FieldKind};

use crate::common::{displays, find, form_ref, tables, template_ref};

mod common;

fn classify_and_consolidate(
    refs: Vec<formwright::source::reference::RawReference>,
) -> Vec<Field> {
    let t = tables();
    consolidate(classify_references(&t, &refs).fields)
}

#[test]
fn yes_no_boxes_pair_into_one_boolean() {
    let fields = classify_and_consolidate(vec![
        form_ref("has_ssn_yes", 0),
        form_ref("has_ssn_no", 1),
    ]);

    assert_eq!(fields.len(), 1, "the pair must collapse into one field");
    let field = &fields[0];
    assert_eq!(field.display.to_string(), "has_ssn");
    assert_eq!(field.kind, FieldKind::YesNo { radio: true });
    assert!(field.paired);
    assert_eq!(field.order, 0);
    assert_eq!(field.raws.len(), 2, "both raw boxes must be retained for binding");
}

#[test]
fn negative_box_first_reads_negative_first() {
    let fields = classify_and_consolidate(vec![
        form_ref("is_employed_no", 0),
        form_ref("is_employed_yes", 1),
    ]);

    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].kind, FieldKind::NoYes { radio: true });
    assert_eq!(fields[0].order, 0);
}

#[test]
fn unpaired_boolean_suffix_stays_alone() {
    let fields = classify_and_consolidate(vec![form_ref("has_ssn_yes", 0)]);

    assert_eq!(fields.len(), 1);
    assert_eq!(
        fields[0].display.to_string(),
        "has_ssn_yes",
        "without a partner the suffix must not be stripped"
    );
    assert!(!fields[0].paired);
}

#[test]
fn pairing_keys_on_label_and_root_together() {
    // Digit-trimming makes both labels "user consent"; the differing
    // roots must still keep these two apart.
    let fields = classify_and_consolidate(vec![
        form_ref("user1_consent_yes", 0),
        form_ref("user2_consent_no", 1),
    ]);

    assert_eq!(fields.len(), 2, "fields under different roots must not pair, got {:?}", displays(&fields));
    assert!(fields.iter().all(|f| !f.paired));
}

#[test]
fn duplicate_display_paths_merge_accumulating_raws() {
    let fields = classify_and_consolidate(vec![
        form_ref("user1_name", 3),
        form_ref("user1_name__2", 7),
    ]);

    assert_eq!(fields.len(), 1);
    let field = &fields[0];
    assert_eq!(field.display.to_string(), "users[0].name.full()");
    assert_eq!(field.raws.len(), 2);
    assert_eq!(field.order, 3, "the merged field keeps the earliest position");
}

#[test]
fn template_fields_skip_duplicate_merging() {
    let fields = classify_and_consolidate(vec![
        template_ref("users[0].email"),
        template_ref("users[0].email"),
    ]);

    assert_eq!(
        fields.len(),
        2,
        "extraction already set-deduplicates; consolidation must not re-merge"
    );
}

#[test]
fn consolidation_is_idempotent() {
    let once = classify_and_consolidate(vec![
        form_ref("has_ssn_yes", 0),
        form_ref("has_ssn_no", 1),
        form_ref("user1_name", 2),
        form_ref("user1_name__2", 3),
        form_ref("user1_email", 4),
    ]);
    let twice = consolidate(once.clone());

    assert_eq!(twice, once, "consolidating a consolidated list must be a fixed point");
}

#[test]
fn settable_paths_track_the_stripped_suffix() {
    let fields = classify_and_consolidate(vec![
        form_ref("wants_interpreter_yes", 0),
        form_ref("wants_interpreter_no", 1),
    ]);

    let field = find(&fields, "wants_interpreter");
    assert_eq!(field.settable.to_string(), "wants_interpreter");
}
