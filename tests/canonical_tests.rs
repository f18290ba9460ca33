use formwright::canonical::canonicalize::{
    canonicalize, full_display_path, normalize, settable_path, MatchKind,
};
use formwright::canonical::error::CanonicalizeError;
use formwright::path::path_model::CanonicalPath;

use crate::common::tables;

mod common;

#[test]
fn indexed_person_label_resolves_to_zero_based_element() {
    let t = tables();
    let r = canonicalize(&t, "user1").expect("user1 should resolve");

    assert_eq!(r.path.to_string(), "users[0]", "labels are 1-based, paths 0-based");
    assert_eq!(r.matched, MatchKind::PersonReference);
}

#[test]
fn person_attribute_with_repeat_marker_resolves() {
    let t = tables();
    let r = canonicalize(&t, "user3_birthdate__4").expect("should resolve");

    assert_eq!(
        r.path.to_string(),
        "users[2].birthdate.format()",
        "repeat-appearance marker must be stripped before decomposition"
    );
    assert_eq!(r.matched, MatchKind::PersonAttribute);
}

#[test]
fn undigited_person_label_means_first_element() {
    let t = tables();
    let r = canonicalize(&t, "defendant_name").expect("should resolve");
    assert_eq!(r.path.to_string(), "defendants[0].name.full()");
}

#[test]
fn singular_object_attribute_resolves() {
    let t = tables();
    let r = canonicalize(&t, "trial_court_county").expect("should resolve");

    assert_eq!(r.path.to_string(), "trial_court.address.county");
    assert_eq!(r.matched, MatchKind::ObjectAttribute);
}

#[test]
fn zero_index_is_rejected_with_suggestion() {
    let t = tables();
    let err = canonicalize(&t, "user0").expect_err("index 0 must be rejected");

    match err {
        CanonicalizeError::ZeroIndex { suggestion, .. } => {
            assert_eq!(suggestion, "user1", "suggestion should rewrite the index to 1");
        }
        other => panic!("expected ZeroIndex, got {:?}", other),
    }
}

#[test]
fn zero_index_with_suffix_keeps_suffix_in_suggestion() {
    let t = tables();
    let err = canonicalize(&t, "child0_birthdate").expect_err("index 0 must be rejected");
    assert_eq!(err.suggestion(), Some("child1_birthdate"));
}

#[test]
fn reserved_word_passes_through() {
    let t = tables();
    let r = canonicalize(&t, "signature_date").expect("should resolve");
    assert_eq!(r.path.to_string(), "signature_date");
    assert_eq!(r.matched, MatchKind::ReservedWord);
}

#[test]
fn bare_plural_collection_is_recognized() {
    let t = tables();
    let r = canonicalize(&t, "users").expect("should resolve");
    assert_eq!(r.path.to_string(), "users");
    assert_eq!(r.matched, MatchKind::PluralCollection);
}

#[test]
fn longer_prefix_wins_over_its_own_prefix() {
    let t = tables();
    let r = canonicalize(&t, "guardian_ad_litem2_name").expect("should resolve");
    assert_eq!(
        r.path.to_string(),
        "guardians_ad_litem[1].name.full()",
        "guardian_ad_litem must win over the shorter guardian prefix"
    );
}

#[test]
fn prefix_match_requires_a_word_boundary() {
    let t = tables();
    // "userx" starts with "user" but "x" is neither digits nor a suffix.
    let r = canonicalize(&t, "userx").expect("should resolve");
    assert_eq!(r.matched, MatchKind::Unmatched);
    assert_eq!(r.path.to_string(), "userx");
}

#[test]
fn unmatched_label_passes_through_unchanged() {
    let t = tables();
    let r = canonicalize(&t, "favorite_color").expect("should resolve");
    assert_eq!(r.path.to_string(), "favorite_color");
    assert_eq!(r.matched, MatchKind::Unmatched);
}

#[test]
fn sequence_takes_indices_but_no_attributes() {
    let t = tables();
    let r = canonicalize(&t, "docket_number2").expect("should resolve");
    assert_eq!(r.path.to_string(), "docket_numbers[1]");
    assert_eq!(r.matched, MatchKind::SequenceReference);

    let odd = canonicalize(&t, "docket_number2_name").expect("should resolve");
    assert_eq!(
        odd.matched,
        MatchKind::Unmatched,
        "sequences carry no attribute suffixes"
    );
}

#[test]
fn structured_path_bypasses_label_rules() {
    let t = tables();
    let r = canonicalize(&t, "users[2].birthdate.format()").expect("should resolve");
    assert_eq!(r.path.to_string(), "users[2].birthdate.format()");
    assert_eq!(r.matched, MatchKind::PersonAttribute);
}

#[test]
fn canonicalization_is_idempotent() {
    let t = tables();
    for label in [
        "user1",
        "user3_birthdate__4",
        "trial_court_county",
        "defendant2_email",
        "favorite_color",
        "signature_date",
    ] {
        let first = canonicalize(&t, label).expect("first pass resolves");
        let rendered = first.path.to_string();
        let second = canonicalize(&t, &rendered).expect("second pass resolves");
        assert_eq!(
            second.path, first.path,
            "canonicalizing {} twice must be a fixed point",
            label
        );
    }
}

#[test]
fn empty_label_is_an_error() {
    let t = tables();
    let err = canonicalize(&t, "  123  ").expect_err("nothing survives normalization");
    assert_eq!(err.code(), "empty-label");
}

#[test]
fn normalize_cleans_and_is_idempotent() {
    assert_eq!(normalize("  First Name  "), "first_name");
    assert_eq!(normalize("user1_name__2"), "user1_name");
    assert_eq!(normalize("3user1"), "user1");
    assert_eq!(normalize("a-b.c"), "abc");

    for raw in ["  First Name  ", "user1_name__2", "3user1"] {
        let once = normalize(raw);
        assert_eq!(normalize(&once), once, "normalize must be idempotent on {}", raw);
    }
}

#[test]
fn settable_path_rewrites_computed_accessors() {
    let t = tables();
    let cases = [
        ("users[0].name.full()", "users[0].name.first"),
        ("users[2].birthdate.format()", "users[2].birthdate"),
        ("users[0].age_in_years()", "users[0].birthdate"),
        ("trial_court.address.block()", "trial_court.address.address"),
        ("users[0].email", "users[0].email"),
    ];
    for (display, expected) in cases {
        let path = CanonicalPath::parse(display).expect("parses");
        assert_eq!(
            settable_path(&t, &path).to_string(),
            expected,
            "settable for {}",
            display
        );
    }
}

#[test]
fn settable_strips_unmapped_trailing_calls() {
    let t = tables();
    let path = CanonicalPath::parse("users[0].some_method()").expect("parses");
    assert_eq!(settable_path(&t, &path).to_string(), "users[0].some_method");
}

#[test]
fn full_display_appends_person_accessor() {
    let t = tables();
    let bare = CanonicalPath::parse("users").expect("parses");
    assert_eq!(full_display_path(&t, &bare).to_string(), "users.name.full()");

    let custom = CanonicalPath::parse("favorite_color").expect("parses");
    assert_eq!(
        full_display_path(&t, &custom).to_string(),
        "favorite_color",
        "roots without an accessor mapping stay bare"
    );
}

#[test]
fn custom_people_layer_on_without_mutating_standard() {
    let standard = tables();
    let extended = standard.with_custom_people(["grantors"]);

    let r = canonicalize(&extended, "grantor2_name").expect("should resolve");
    assert_eq!(r.path.to_string(), "grantors[1].name.full()");

    let base = canonicalize(&standard, "grantor2_name").expect("should resolve");
    assert_eq!(
        base.matched,
        MatchKind::Unmatched,
        "layering custom people must not touch the original tables"
    );
}
