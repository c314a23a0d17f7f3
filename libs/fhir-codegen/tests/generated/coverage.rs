//! Coverage resource
//!
//! Generated from http://hl7.org/fhir/StructureDefinition/Coverage

use claimwise_models::types::{CodeableConcept, CoverageStatus, FhirString, Money, Reference, SimpleQuantity};
use claimwise_models::{choice, composite};

composite! {
    resource Coverage("Coverage") {
        status("status"): one CoverageStatus,
        beneficiary("beneficiary"): one Reference [refs "Patient"],
        payor("payor"): some Reference [refs "Organization", "Patient", "RelatedPerson"],
        class("class"): many Class,
        cost_to_beneficiary("costToBeneficiary"): many CostToBeneficiary,
    }
}

composite! {
    backbone Class("Coverage.Class") {
        type_("type"): one CodeableConcept,
        value("value"): one FhirString,
        name("name"): opt FhirString,
    }
}

choice! {
    pub enum CostToBeneficiaryValue {
        SimpleQuantity(SimpleQuantity),
        Money(Money),
    }
}

composite! {
    backbone CostToBeneficiary("Coverage.CostToBeneficiary") {
        type_("type"): opt CodeableConcept,
        value("value"): choice CostToBeneficiaryValue,
    }
}
