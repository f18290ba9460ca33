use formwright::output::interview::synthesize_interview;
use formwright::output::screens::ScreenSpec;
use formwright::resolve_form_fields;
use formwright::source::reference::FormFieldRef;

use crate::common::{form_field, tables};

mod common;

fn resolve(names: &[&str]) -> Vec<formwright::field::field_model::Field> {
    let t = tables();
    let raw: Vec<FormFieldRef> = names
        .iter()
        .enumerate()
        .map(|(i, name)| form_field(name, i))
        .collect();
    resolve_form_fields(&t, raw, &[]).fields
}

#[test]
fn flow_gathers_a_collection_once_at_its_first_field() {
    let t = tables();
    let fields = resolve(&["defendant1_name", "defendant1_email"]);
    let output = synthesize_interview(&t, &fields, &[], "Complaint");
    let text = output.concatenated();

    assert!(
        text.contains("  defendants.gather()\n"),
        "the first field of an ungathered collection triggers a gather:\n{}",
        text
    );
    assert!(
        text.contains("  defendants[0].email\n"),
        "later fields of a gathered collection trigger their settable path:\n{}",
        text
    );
    assert_eq!(
        text.matches("defendants.gather()").count(),
        1,
        "a gather must be emitted exactly once"
    );
    assert!(text.contains("  interview_complete\n"));
}

#[test]
fn question_blocks_ask_the_settable_path() {
    let t = tables();
    let fields = resolve(&["user1_birthdate"]);
    let output = synthesize_interview(&t, &fields, &[], "Complaint");
    let text = output.concatenated();

    assert!(
        text.contains("- User birthdate: users[0].birthdate\n"),
        "the question assigns the settable slot, not the computed accessor:\n{}",
        text
    );
    assert!(text.contains("datatype: date"));
}

#[test]
fn code_fields_are_never_asked() {
    let t = tables();
    let fields = resolve(&["signature_date", "user1_name"]);
    let output = synthesize_interview(&t, &fields, &[], "Complaint");
    let text = output.concatenated();

    assert!(
        !text.contains("- Signature date:"),
        "computed fields must not appear on a screen:\n{}",
        text
    );
    assert!(text.contains("- User name: users[0].name.first\n"));
}

#[test]
fn binding_block_maps_every_raw_reference() {
    let t = tables();
    let fields = resolve(&["user1_name", "user1_name__2"]);
    let output = synthesize_interview(&t, &fields, &[], "Small Claims Complaint");
    let text = output.concatenated();

    assert!(text.contains("attachment:"));
    assert!(text.contains("name: Small Claims Complaint"));
    assert!(text.contains("filename: small_claims_complaint.pdf"));
    assert!(text.contains("- \"user1_name\": ${ users[0].name.full() }"));
    assert!(
        text.contains("- \"user1_name__2\": ${ users[0].name.full() }"),
        "every raw spelling binds, including repeat appearances:\n{}",
        text
    );
}

#[test]
fn paired_boolean_binds_the_negative_box_inverted() {
    let t = tables();
    let fields = resolve(&["has_ssn_yes", "has_ssn_no"]);
    let output = synthesize_interview(&t, &fields, &[], "Complaint");
    let text = output.concatenated();

    assert!(text.contains("- \"has_ssn_yes\": ${ has_ssn }"));
    assert!(
        text.contains("- \"has_ssn_no\": ${ not has_ssn }"),
        "the negative box reads the inverted expression:\n{}",
        text
    );
    assert!(text.contains("datatype: yesnoradio"));
}

#[test]
fn signatures_bind_conditioned_on_the_final_rendition() {
    let t = tables();
    let fields = resolve(&["user1_signature"]);
    let output = synthesize_interview(&t, &fields, &[], "Complaint");
    let text = output.concatenated();

    assert!(
        text.contains("${ users[0].signature if i == \"final\" else '' }"),
        "drafts must circulate unsigned:\n{}",
        text
    );
}

#[test]
fn list_roots_get_a_review_table() {
    let t = tables();
    let fields = resolve(&["defendant1_name", "defendant1_email"]);
    let output = synthesize_interview(&t, &fields, &[], "Complaint");
    let text = output.concatenated();

    assert!(text.contains("table: defendants_table"));
    assert!(text.contains("rows: defendants"));
    assert!(text.contains("row_item.name.full()"));
    assert!(text.contains("row_item.email"));
}

#[test]
fn object_roots_get_a_revisit_review() {
    let t = tables();
    let fields = resolve(&["trial_court_county"]);
    let output = synthesize_interview(&t, &fields, &[], "Complaint");
    let text = output.concatenated();

    assert!(text.contains("- Revisit: trial_court"));
    assert!(text.contains("${ trial_court.address.county }"));
}

#[test]
fn supplied_screens_group_fields_under_one_prompt() {
    let t = tables();
    let fields = resolve(&["user1_name", "user1_email"]);
    let specs = vec![ScreenSpec {
        prompt: "Tell us about yourself".to_string(),
        fields: vec![
            "users[0].name.full()".to_string(),
            "users[0].email".to_string(),
        ],
        id: Some("about-you".to_string()),
    }];
    let output = synthesize_interview(&t, &fields, &specs, "Complaint");
    let text = output.concatenated();

    assert!(text.contains("id: about-you"));
    assert!(text.contains("  Tell us about yourself\n"));
    assert!(text.contains("- User name: users[0].name.first\n"));
    assert!(text.contains("- User email: users[0].email\n"));
    assert!(output.skipped.is_empty(), "skipped: {:?}", output.skipped);
}

#[test]
fn unknown_screen_fields_are_recorded_not_fatal() {
    let t = tables();
    let fields = resolve(&["user1_name"]);
    let specs = vec![ScreenSpec {
        prompt: "About".to_string(),
        fields: vec!["users[0].name.full()".to_string(), "no_such_field".to_string()],
        id: None,
    }];
    let output = synthesize_interview(&t, &fields, &specs, "Complaint");

    assert_eq!(output.skipped.len(), 1, "the unknown name is recorded");
    let text = output.concatenated();
    assert!(
        text.contains("- User name: users[0].name.first\n"),
        "the screen still builds with its known fields:\n{}",
        text
    );
}

#[test]
fn screens_with_no_askable_fields_emit_a_continue_button() {
    let t = tables();
    let fields = resolve(&["signature_date"]);
    let specs = vec![ScreenSpec {
        prompt: "Review and continue".to_string(),
        fields: vec!["signature_date".to_string()],
        id: Some("review-continue".to_string()),
    }];
    let output = synthesize_interview(&t, &fields, &specs, "Complaint");
    let text = output.concatenated();

    assert!(
        text.contains("continue button field: review_continue\n"),
        "a prompt-only screen still needs a variable to set:\n{}",
        text
    );
}

#[test]
fn duplicate_display_paths_on_one_screen_skip_the_block() {
    let t = tables();
    let fields = resolve(&["user1_name"]);
    let specs = vec![ScreenSpec {
        prompt: "Doubled".to_string(),
        fields: vec![
            "users[0].name.full()".to_string(),
            "users[0].name.full()".to_string(),
        ],
        id: None,
    }];
    let output = synthesize_interview(&t, &fields, &specs, "Complaint");

    assert!(
        output.skipped.iter().any(|e| e.to_string().contains("question")),
        "an inconsistent block is withheld, not emitted: {:?}",
        output.skipped
    );
    assert!(
        !output.concatenated().contains("Doubled"),
        "the doubled screen must not appear in the output"
    );
}
