#![allow(dead_code)]

use claimwise_models::prelude::*;
use claimwise_models::resources::explanation_of_benefit::{
    Adjudication, Diagnosis, Insurance, Item, ItemDetail,
};
use claimwise_models::resources::explanation_of_benefit::ExplanationOfBenefitBuilder;
use rust_decimal::Decimal as Amount;

pub const CLAIM_TYPE: &str = "http://terminology.hl7.org/CodeSystem/claim-type";
pub const ADJUDICATION: &str = "http://terminology.hl7.org/CodeSystem/adjudication";

pub fn concept(system: &str, code: &str) -> CodeableConcept {
    CodeableConcept::of(system, code).expect("valid concept")
}

pub fn reference(literal: &str) -> Reference {
    Reference::to(literal).expect("valid reference")
}

pub fn usd(cents: i64) -> Money {
    Money::of(Amount::new(cents, 2), "USD").expect("valid money")
}

pub fn focal_insurance() -> Insurance {
    Insurance::builder()
        .focal(true)
        .coverage(reference("Coverage/9876B1"))
        .build()
        .expect("valid insurance")
}

/// Every required element except `insurance`.
pub fn eob_without_insurance() -> ExplanationOfBenefitBuilder {
    ExplanationOfBenefit::builder()
        .id("EB3500")
        .status(ExplanationOfBenefitStatus::ACTIVE)
        .type_(concept(CLAIM_TYPE, "oral"))
        .use_(Use::CLAIM)
        .patient(reference("Patient/pat1"))
        .created("2014-08-16".parse::<DateTime>().expect("valid dateTime"))
        .insurer(reference("Organization/3"))
        .provider(reference("Practitioner/1"))
        .outcome(RemittanceOutcome::COMPLETE)
}

pub fn minimal_eob() -> ExplanationOfBenefitBuilder {
    eob_without_insurance().insurance(focal_insurance())
}

pub fn adjudication(code: &str, cents: i64) -> Adjudication {
    Adjudication::builder()
        .category(concept(ADJUDICATION, code))
        .amount(usd(cents))
        .build()
        .expect("valid adjudication")
}

/// An EOB with one diagnosis and two items, the first with a detail line.
pub fn detailed_eob() -> ExplanationOfBenefit {
    let diagnosis = Diagnosis::builder()
        .sequence(1)
        .diagnosis(concept("http://hl7.org/fhir/sid/icd-10", "K03.6"))
        .build()
        .expect("valid diagnosis");

    let detail = ItemDetail::builder()
        .sequence(1)
        .product_or_service(concept("http://example.org/fhir/oralservicecodes", "1101"))
        .net(usd(4500))
        .adjudication(adjudication("eligible", 4500))
        .build()
        .expect("valid detail");

    let first = Item::builder()
        .sequence(1)
        .care_team_sequence(1)
        .product_or_service(concept("http://terminology.hl7.org/CodeSystem/ex-USCLS", "1205"))
        .serviced("2014-08-16".parse::<Date>().expect("valid date"))
        .unit_price(usd(13500))
        .net(usd(13500))
        .adjudication(adjudication("eligible", 12000))
        .adjudication(adjudication("benefit", 10000))
        .detail(detail)
        .build()
        .expect("valid item");

    let second = Item::builder()
        .sequence(2)
        .product_or_service(concept("http://terminology.hl7.org/CodeSystem/ex-USCLS", "group"))
        .location(reference("Location/clinic"))
        .net(usd(20000))
        .build()
        .expect("valid item");

    minimal_eob()
        .diagnosis(diagnosis)
        .extend_item([first, second])
        .build()
        .expect("valid explanation of benefit")
}
