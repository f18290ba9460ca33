use formwright::field::classifier::{classify_references, guess_label};
use formwright::field::field_model::{ChoiceStyle, FieldGroup, FieldKind, FieldOrigin};
use formwright::source::reference::WidgetKind;

use crate::common::{boxed_ref, find, form_ref, tables, template_ref, widget_ref};

mod common;

#[test]
fn one_draft_field_per_reference() {
    let t = tables();
    let refs = vec![form_ref("user1_name", 0), form_ref("user1_email", 1)];
    let outcome = classify_references(&t, &refs);

    assert_eq!(outcome.fields.len(), 2);
    assert!(outcome.errors.is_empty());

    let name = find(&outcome.fields, "users[0].name.full()");
    assert_eq!(name.settable.to_string(), "users[0].name.first");
    assert_eq!(name.group, FieldGroup::BuiltIn);
    assert_eq!(name.origin, FieldOrigin::Form);
}

#[test]
fn errors_are_collected_without_aborting_siblings() {
    let t = tables();
    let refs = vec![form_ref("user0", 0), form_ref("user1_email", 1)];
    let outcome = classify_references(&t, &refs);

    assert_eq!(outcome.fields.len(), 1, "the valid sibling still classifies");
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].code(), "zero-indexed-person");
}

#[test]
fn unmatched_form_label_warns_and_stays_custom() {
    let t = tables();
    let outcome = classify_references(&t, &[form_ref("favorite_color", 0)]);

    let field = &outcome.fields[0];
    assert_eq!(field.group, FieldGroup::Custom);
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].field, "favorite_color");
}

#[test]
fn template_references_never_warn_on_unmatched() {
    let t = tables();
    let outcome = classify_references(&t, &[template_ref("some_custom_thing")]);
    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.fields[0].origin, FieldOrigin::Template);
}

#[test]
fn reserved_words_become_code_fields() {
    let t = tables();
    let outcome = classify_references(&t, &[form_ref("signature_date", 0)]);

    let field = &outcome.fields[0];
    assert_eq!(field.kind, FieldKind::Code);
    assert!(!field.kind.is_askable(), "computed fields are never asked");
}

#[test]
fn suffix_hints_drive_type_inference() {
    let t = tables();
    let refs = vec![
        form_ref("user1_birthdate", 0),
        form_ref("user1_email", 1),
        form_ref("user1_age", 2),
        form_ref("filing_fee", 3),
        form_ref("incident_description", 4),
        form_ref("page_count", 5),
    ];
    let outcome = classify_references(&t, &refs);

    assert_eq!(find(&outcome.fields, "users[0].birthdate.format()").kind, FieldKind::Date);
    assert_eq!(find(&outcome.fields, "users[0].email").kind, FieldKind::Email);
    assert_eq!(find(&outcome.fields, "users[0].age_in_years()").kind, FieldKind::Integer);
    assert_eq!(find(&outcome.fields, "filing_fee").kind, FieldKind::Currency);
    assert_eq!(find(&outcome.fields, "incident_description").kind, FieldKind::Area);
    assert_eq!(find(&outcome.fields, "page_count").kind, FieldKind::Integer);
}

#[test]
fn checkbox_widget_reads_as_boolean() {
    let t = tables();
    let outcome =
        classify_references(&t, &[widget_ref("has_children", 0, WidgetKind::Checkbox)]);
    assert_eq!(outcome.fields[0].kind, FieldKind::YesNo { radio: false });
}

#[test]
fn signature_widget_and_suffix_both_mark_signature() {
    let t = tables();
    let refs = vec![
        form_ref("user1_signature", 0),
        widget_ref("scrawl_here", 1, WidgetKind::Signature),
    ];
    let outcome = classify_references(&t, &refs);

    let by_suffix = find(&outcome.fields, "users[0].signature");
    assert_eq!(by_suffix.kind, FieldKind::Signature);
    assert_eq!(by_suffix.group, FieldGroup::Signature);

    let by_widget = find(&outcome.fields, "scrawl_here");
    assert_eq!(by_widget.kind, FieldKind::Signature);
    assert_eq!(by_widget.group, FieldGroup::Signature);
}

#[test]
fn large_widgets_become_areas_with_capacity() {
    let t = tables();
    // 300x36 points: 50 columns by 3 rows, well past the area threshold.
    let outcome = classify_references(&t, &[boxed_ref("case_notes", 0, 300.0, 36.0)]);

    let field = &outcome.fields[0];
    assert_eq!(field.kind, FieldKind::Area);
    assert_eq!(field.max_length, Some(150));
}

#[test]
fn small_widgets_stay_single_line_text() {
    let t = tables();
    let outcome = classify_references(&t, &[boxed_ref("middle_initial", 0, 60.0, 14.0)]);

    let field = &outcome.fields[0];
    assert_eq!(field.kind, FieldKind::Text);
    assert_eq!(field.max_length, Some(10));
}

#[test]
fn area_threshold_is_tunable() {
    let t = tables().with_area_threshold(5);
    let outcome = classify_references(&t, &[boxed_ref("middle_initial", 0, 60.0, 14.0)]);

    assert_eq!(
        outcome.fields[0].kind,
        FieldKind::Area,
        "a capacity of 10 must cross a threshold of 5"
    );
}

#[test]
fn choice_metadata_selects_dropdown_or_multiselect() {
    let t = tables();
    let mut single = crate::common::form_field("filing_state", 0);
    single.extra = Some(serde_json::json!({ "choices": ["MA", "NY"] }));
    let mut multi = crate::common::form_field("claim_types", 1);
    multi.extra = Some(serde_json::json!({ "choices": ["a", "b"], "multi": true }));

    let refs = vec![
        formwright::source::reference::RawReference::Form(single),
        formwright::source::reference::RawReference::Form(multi),
    ];
    let outcome = classify_references(&t, &refs);

    let state = find(&outcome.fields, "filing_state");
    assert_eq!(state.kind, FieldKind::Choice(ChoiceStyle::Dropdown));
    assert_eq!(state.choices.as_deref(), Some(&["MA".to_string(), "NY".to_string()][..]));

    let types = find(&outcome.fields, "claim_types");
    assert_eq!(types.kind, FieldKind::Multiselect);
}

#[test]
fn guessed_labels_read_as_prose() {
    assert_eq!(guess_label("user1_name"), "user name");
    assert_eq!(guess_label("has_ssn_yes"), "has ssn");
    assert_eq!(guess_label("has_ssn_no"), "has ssn");
    assert_eq!(guess_label("trial_court_county"), "trial court county");
    assert_eq!(guess_label("children[i].name.first"), "children name first");
}
