//! Coverage resource

use crate::types::{
    Boolean, CodeableConcept, CoverageStatus, FhirString, Identifier, Money, Period, PositiveInt,
    Reference, SimpleQuantity,
};
use crate::{choice, composite};

composite! {
    /// Insurance or medical plan or a payment agreement
    ///
    /// Financial instrument which may be used to reimburse or pay for health
    /// care products and services.
    resource Coverage("Coverage") {
        /// Business Identifier for the coverage
        identifier("identifier"): many Identifier,
        /// active | cancelled | draft | entered-in-error
        status("status"): one CoverageStatus,
        /// Coverage category such as medical or accident
        type_("type"): opt CodeableConcept,
        /// Owner of the policy
        policy_holder("policyHolder"): opt Reference [refs "Patient", "RelatedPerson", "Organization"],
        /// Subscriber to the policy
        subscriber("subscriber"): opt Reference [refs "Patient", "RelatedPerson"],
        /// ID assigned to the subscriber
        subscriber_id("subscriberId"): opt FhirString,
        /// Plan beneficiary
        beneficiary("beneficiary"): one Reference [refs "Patient"],
        /// Dependent number
        dependent("dependent"): opt FhirString,
        relationship("relationship"): opt CodeableConcept,
        /// Coverage start and end dates
        period("period"): opt Period,
        /// Issuer of the policy
        payor("payor"): some Reference [refs "Organization", "Patient", "RelatedPerson"],
        /// Additional coverage classifications
        class("class"): many Class,
        /// Relative order of the coverage
        order("order"): opt PositiveInt,
        /// Insurer network
        network("network"): opt FhirString,
        /// Patient payments for services/products
        cost_to_beneficiary("costToBeneficiary"): many CostToBeneficiary,
        /// Reimbursement to insurer
        subrogation("subrogation"): opt Boolean,
        /// Contract details
        contract("contract"): many Reference [refs "Contract"],
    }
}

composite! {
    /// Additional coverage classifications
    backbone Class("Coverage.Class") {
        /// Type of class such as 'group' or 'plan'
        type_("type"): one CodeableConcept,
        /// Value associated with the type
        value("value"): one FhirString,
        /// Human readable description of the type and value
        name("name"): opt FhirString,
    }
}

choice! {
    /// `Coverage.costToBeneficiary.value[x]`
    pub enum CostToBeneficiaryValue {
        SimpleQuantity(SimpleQuantity),
        Money(Money),
    }
}

composite! {
    /// Patient payments for services/products
    backbone CostToBeneficiary("Coverage.CostToBeneficiary") {
        /// Cost category
        type_("type"): opt CodeableConcept,
        /// The amount or percentage due from the beneficiary
        value("value"): choice CostToBeneficiaryValue,
        /// Exceptions for patient payments
        exception("exception"): many Exception,
    }
}

composite! {
    /// Exceptions for patient payments
    backbone Exception("Coverage.CostToBeneficiary.Exception") {
        /// Exception category
        type_("type"): one CodeableConcept,
        /// The effective period of the exception
        period("period"): opt Period,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rust_decimal::Decimal as Amount;

    #[test]
    fn payor_is_required() {
        let err = Coverage::builder()
            .status(CoverageStatus::ACTIVE)
            .beneficiary(Reference::to("Patient/p1").unwrap())
            .build()
            .unwrap_err();
        assert_eq!(err, Error::EmptyList("payor".to_string()));
    }

    #[test]
    fn cost_to_beneficiary_value_is_money_or_quantity() {
        let copay = CostToBeneficiary::builder()
            .value(Money::of(Amount::new(20, 0), "USD").unwrap())
            .build()
            .unwrap();
        assert!(matches!(copay.value(), CostToBeneficiaryValue::Money(_)));

        let err = CostToBeneficiary::builder()
            .value(FhirString::from("twenty"))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidChoiceType { found: "string", allowed: &["SimpleQuantity", "Money"], .. }
        ));
    }

    #[test]
    fn payor_rejects_practitioner() {
        let err = Coverage::builder()
            .status(CoverageStatus::ACTIVE)
            .beneficiary(Reference::to("Patient/p1").unwrap())
            .payor(Reference::to("Practitioner/dr").unwrap())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidReferenceType { .. }));
    }
}
