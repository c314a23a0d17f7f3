mod support;

use claimwise_models::prelude::*;
use claimwise_models::resources::explanation_of_benefit::{
    ExplanationOfBenefitBuilder, Item, ProcessNote,
};
use std::collections::HashSet;
use support::*;

#[test]
fn to_builder_round_trips() {
    let eob = detailed_eob();
    let rebuilt = eob.to_builder().build().expect("should rebuild");

    assert_eq!(rebuilt, eob);
}

#[test]
fn build_is_repeatable() {
    let builder = minimal_eob().disposition("Claim settled as per contract.");

    let first = builder.build().expect("first build");
    let second = builder.build().expect("second build");

    assert_eq!(first, second);
    let set: HashSet<ExplanationOfBenefit> = [first, second].into_iter().collect();
    assert_eq!(set.len(), 1);
}

#[test]
fn equal_instances_hash_equally() {
    let a = detailed_eob();
    let b = detailed_eob();
    let c = a.to_builder().disposition("changed").build().expect("should build");

    let set: HashSet<ExplanationOfBenefit> = [a, b, c].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn copy_with_modification_leaves_original_untouched() {
    let original = minimal_eob().build().expect("should build");
    let modified = original
        .to_builder()
        .status(ExplanationOfBenefitStatus::CANCELLED)
        .build()
        .expect("should build");

    assert_eq!(original.status(), &ExplanationOfBenefitStatus::ACTIVE);
    assert_eq!(modified.status(), &ExplanationOfBenefitStatus::CANCELLED);
    assert_ne!(original, modified);
}

#[test]
fn collection_setters_append_extend_and_replace() {
    let note = |number: i32, text: &str| {
        ProcessNote::builder()
            .number(number)
            .type_(NoteType::DISPLAY)
            .text(text)
            .build()
            .expect("valid note")
    };

    let builder = minimal_eob()
        .process_note(note(1, "first"))
        .extend_process_note([note(2, "second"), note(3, "third")]);
    let eob = builder.build().expect("should build");
    let numbers: Vec<i32> = eob
        .process_note()
        .iter()
        .filter_map(|n| n.number().and_then(|v| v.value()).copied())
        .collect();
    assert_eq!(numbers, vec![1, 2, 3]);

    let replaced = builder
        .set_process_note([note(9, "only")])
        .build()
        .expect("should build");
    assert_eq!(replaced.process_note().len(), 1);
}

#[test]
fn replacing_with_empty_collection_is_preserved() {
    let eob = detailed_eob();
    assert_eq!(eob.item().len(), 2);

    let cleared = eob
        .to_builder()
        .set_item(Vec::<Item>::new())
        .build()
        .expect("empty optional collection is valid");

    assert!(cleared.item().is_empty());
}

#[test]
fn replacing_required_collection_with_empty_fails_at_build() {
    let err = minimal_eob()
        .set_insurance(Vec::<claimwise_models::resources::explanation_of_benefit::Insurance>::new())
        .build()
        .unwrap_err();

    assert_eq!(err, Error::EmptyList("insurance".to_string()));
}

#[test]
fn singular_setter_overwrites() {
    let eob = minimal_eob()
        .disposition("first")
        .disposition("second")
        .build()
        .expect("should build");

    assert_eq!(
        eob.disposition().and_then(|d| d.value()).map(String::as_str),
        Some("second")
    );
}

#[test]
fn invalid_string_value_names_the_field() {
    let err = minimal_eob().disposition("   ").build().unwrap_err();

    assert_eq!(err.element(), Some("disposition"));
    let Error::InvalidElement { source, .. } = err else {
        panic!("expected InvalidElement");
    };
    assert!(matches!(*source, Error::InvalidValue { type_name: "string", .. }));
}

#[test]
fn builder_from_instance_matches_to_builder() {
    let eob = detailed_eob();
    let via_from = ExplanationOfBenefitBuilder::from(eob.clone());

    assert_eq!(via_from, eob.to_builder());
}
