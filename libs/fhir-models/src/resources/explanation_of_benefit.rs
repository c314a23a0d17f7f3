//! ExplanationOfBenefit resource
//!
//! Provider submitted information on a claim, the adjudication details from the
//! processing of that claim, and optionally account balance information.

use crate::types::{
    Address, Attachment, Boolean, CodeableConcept, Coding, Date, DateTime, Decimal,
    ExplanationOfBenefitStatus, FhirString, Identifier, Money, NoteType, Period, PositiveInt,
    Quantity, Reference, RemittanceOutcome, SimpleQuantity, UnsignedInt, Use,
};
use crate::{choice, composite};

composite! {
    /// Explanation of Benefit resource
    ///
    /// This resource provides: the claim details; adjudication details from the
    /// processing of a Claim; and optionally account balance information, for
    /// informing the subscriber of the benefits provided.
    resource ExplanationOfBenefit("ExplanationOfBenefit") {
        /// Business Identifier for the resource
        identifier("identifier"): many Identifier,
        /// active | cancelled | draft | entered-in-error
        status("status"): one ExplanationOfBenefitStatus,
        /// Category or discipline
        type_("type"): one CodeableConcept,
        sub_type("subType"): opt CodeableConcept,
        /// claim | preauthorization | predetermination
        use_("use"): one Use,
        /// The recipient of the products and services
        patient("patient"): one Reference [refs "Patient"],
        billable_period("billablePeriod"): opt Period,
        /// Response creation date
        created("created"): one DateTime,
        enterer("enterer"): opt Reference [refs "Practitioner", "PractitionerRole"],
        /// Party responsible for reimbursement
        insurer("insurer"): one Reference [refs "Organization"],
        /// Party responsible for the claim
        provider("provider"): one Reference [refs "Practitioner", "PractitionerRole", "Organization"],
        priority("priority"): opt CodeableConcept,
        funds_reserve_requested("fundsReserveRequested"): opt CodeableConcept,
        funds_reserve("fundsReserve"): opt CodeableConcept,
        /// Prior or corollary claims
        related("related"): many Related,
        prescription("prescription"): opt Reference [refs "MedicationRequest", "VisionPrescription"],
        original_prescription("originalPrescription"): opt Reference [refs "MedicationRequest"],
        /// Recipient of benefits payable
        payee("payee"): opt Payee,
        referral("referral"): opt Reference [refs "ServiceRequest"],
        facility("facility"): opt Reference [refs "Location"],
        /// Claim reference
        claim("claim"): opt Reference [refs "Claim"],
        claim_response("claimResponse"): opt Reference [refs "ClaimResponse"],
        /// queued | complete | error | partial
        outcome("outcome"): one RemittanceOutcome,
        disposition("disposition"): opt FhirString,
        /// Preauthorization reference
        pre_auth_ref("preAuthRef"): many FhirString,
        pre_auth_ref_period("preAuthRefPeriod"): many Period,
        /// Care Team members
        care_team("careTeam"): many CareTeam,
        supporting_info("supportingInfo"): many SupportingInfo,
        diagnosis("diagnosis"): many Diagnosis,
        procedure("procedure"): many Procedure,
        /// Precedence (primary, secondary, etc.)
        precedence("precedence"): opt PositiveInt,
        /// Patient insurance information
        insurance("insurance"): some Insurance,
        accident("accident"): opt Accident,
        /// Product or service provided
        item("item"): many Item,
        /// Insurer added line items
        add_item("addItem"): many AddItem,
        /// Header-level adjudication
        adjudication("adjudication"): many Adjudication,
        /// Adjudication totals
        total("total"): many Total,
        /// Payment Details
        payment("payment"): opt Payment,
        form_code("formCode"): opt CodeableConcept,
        form("form"): opt Attachment,
        process_note("processNote"): many ProcessNote,
        /// When the benefits are applicable
        benefit_period("benefitPeriod"): opt Period,
        benefit_balance("benefitBalance"): many BenefitBalance,
    }
}

composite! {
    /// Prior or corollary claims
    backbone Related("ExplanationOfBenefit.Related") {
        claim("claim"): opt Reference [refs "Claim"],
        /// How the reference claim is related
        relationship("relationship"): opt CodeableConcept,
        /// File or case reference
        reference("reference"): opt Identifier,
    }
}

composite! {
    /// Recipient of benefits payable
    backbone Payee("ExplanationOfBenefit.Payee") {
        /// Category of recipient
        type_("type"): opt CodeableConcept,
        party("party"): opt Reference [refs "Practitioner", "PractitionerRole", "Organization", "Patient", "RelatedPerson"],
    }
}

composite! {
    /// Care Team members
    backbone CareTeam("ExplanationOfBenefit.CareTeam") {
        /// Order of care team
        sequence("sequence"): one PositiveInt,
        provider("provider"): one Reference [refs "Practitioner", "PractitionerRole", "Organization"],
        /// Indicator of the lead practitioner
        responsible("responsible"): opt Boolean,
        role("role"): opt CodeableConcept,
        qualification("qualification"): opt CodeableConcept,
    }
}

choice! {
    /// `ExplanationOfBenefit.supportingInfo.timing[x]`
    pub enum SupportingInfoTiming {
        Date(Date),
        Period(Period),
    }
}

choice! {
    /// `ExplanationOfBenefit.supportingInfo.value[x]`
    pub enum SupportingInfoValue {
        Boolean(Boolean),
        String(FhirString),
        Quantity(Quantity),
        Attachment(Attachment),
        Reference(Reference),
    }
}

composite! {
    /// Supporting information
    backbone SupportingInfo("ExplanationOfBenefit.SupportingInfo") {
        /// Information instance identifier
        sequence("sequence"): one PositiveInt,
        /// Classification of the supplied information
        category("category"): one CodeableConcept,
        code("code"): opt CodeableConcept,
        /// When it occurred
        timing("timing"): opt_choice SupportingInfoTiming,
        /// Data to be provided
        value("value"): opt_choice SupportingInfoValue,
        /// Explanation for the information
        reason("reason"): opt Coding,
    }
}

choice! {
    /// `ExplanationOfBenefit.diagnosis.diagnosis[x]`
    pub enum DiagnosisDiagnosis {
        CodeableConcept(CodeableConcept),
        Reference(Reference),
    }
}

composite! {
    /// Pertinent diagnosis information
    backbone Diagnosis("ExplanationOfBenefit.Diagnosis") {
        /// Diagnosis instance identifier
        sequence("sequence"): one PositiveInt,
        /// Nature of illness or problem
        diagnosis("diagnosis"): choice DiagnosisDiagnosis [refs "Condition"],
        /// Timing or nature of the diagnosis
        type_("type"): many CodeableConcept,
        on_admission("onAdmission"): opt CodeableConcept,
        package_code("packageCode"): opt CodeableConcept,
    }
}

choice! {
    /// `ExplanationOfBenefit.procedure.procedure[x]`
    pub enum ProcedureProcedure {
        CodeableConcept(CodeableConcept),
        Reference(Reference),
    }
}

composite! {
    /// Clinical procedures performed
    backbone Procedure("ExplanationOfBenefit.Procedure") {
        /// Procedure instance identifier
        sequence("sequence"): one PositiveInt,
        type_("type"): many CodeableConcept,
        /// When the procedure was performed
        date("date"): opt DateTime,
        /// Specific clinical procedure
        procedure("procedure"): choice ProcedureProcedure [refs "Procedure"],
        udi("udi"): many Reference [refs "Device"],
    }
}

composite! {
    /// Patient insurance information
    backbone Insurance("ExplanationOfBenefit.Insurance") {
        /// Coverage to be used for adjudication
        focal("focal"): one Boolean,
        /// Insurance information
        coverage("coverage"): one Reference [refs "Coverage"],
        /// Prior authorization reference number
        pre_auth_ref("preAuthRef"): many FhirString,
    }
}

choice! {
    /// `ExplanationOfBenefit.accident.location[x]`
    pub enum AccidentLocation {
        Address(Address),
        Reference(Reference),
    }
}

composite! {
    /// Details of the event
    backbone Accident("ExplanationOfBenefit.Accident") {
        /// When the incident occurred
        date("date"): opt Date,
        type_("type"): opt CodeableConcept,
        /// Where the event occurred
        location("location"): opt_choice AccidentLocation [refs "Location"],
    }
}

choice! {
    /// `ExplanationOfBenefit.item.serviced[x]`
    pub enum ItemServiced {
        Date(Date),
        Period(Period),
    }
}

choice! {
    /// `ExplanationOfBenefit.item.location[x]`
    pub enum ItemLocation {
        CodeableConcept(CodeableConcept),
        Address(Address),
        Reference(Reference),
    }
}

composite! {
    /// Product or service provided
    backbone Item("ExplanationOfBenefit.Item") {
        /// Item instance identifier
        sequence("sequence"): one PositiveInt,
        care_team_sequence("careTeamSequence"): many PositiveInt,
        diagnosis_sequence("diagnosisSequence"): many PositiveInt,
        procedure_sequence("procedureSequence"): many PositiveInt,
        information_sequence("informationSequence"): many PositiveInt,
        /// Revenue or cost center code
        revenue("revenue"): opt CodeableConcept,
        category("category"): opt CodeableConcept,
        /// Billing, service, product, or drug code
        product_or_service("productOrService"): one CodeableConcept,
        /// Product or service billing modifiers
        modifier("modifier"): many CodeableConcept,
        program_code("programCode"): many CodeableConcept,
        /// Date or dates of service or product delivery
        serviced("serviced"): opt_choice ItemServiced,
        /// Place of service or where product was supplied
        location("location"): opt_choice ItemLocation [refs "Location"],
        quantity("quantity"): opt SimpleQuantity,
        /// Fee, charge or cost per item
        unit_price("unitPrice"): opt Money,
        /// Price scaling factor
        factor("factor"): opt Decimal,
        /// Total item cost
        net("net"): opt Money,
        /// Unique device identifier
        udi("udi"): many Reference [refs "Device"],
        body_site("bodySite"): opt CodeableConcept,
        sub_site("subSite"): many CodeableConcept,
        /// Encounters related to this billed item
        encounter("encounter"): many Reference [refs "Encounter"],
        /// Applicable note numbers
        note_number("noteNumber"): many PositiveInt,
        /// Adjudication details
        adjudication("adjudication"): many Adjudication,
        /// Additional items
        detail("detail"): many ItemDetail,
    }
}

composite! {
    /// Adjudication details
    backbone Adjudication("ExplanationOfBenefit.Item.Adjudication") {
        /// Type of adjudication information
        category("category"): one CodeableConcept,
        /// Explanation of adjudication outcome
        reason("reason"): opt CodeableConcept,
        /// Monetary amount
        amount("amount"): opt Money,
        /// Non-monitary value
        value("value"): opt Decimal,
    }
}

composite! {
    /// Additional items
    backbone ItemDetail("ExplanationOfBenefit.Item.Detail") {
        /// Product or service provided
        sequence("sequence"): one PositiveInt,
        revenue("revenue"): opt CodeableConcept,
        category("category"): opt CodeableConcept,
        product_or_service("productOrService"): one CodeableConcept,
        modifier("modifier"): many CodeableConcept,
        program_code("programCode"): many CodeableConcept,
        quantity("quantity"): opt SimpleQuantity,
        unit_price("unitPrice"): opt Money,
        factor("factor"): opt Decimal,
        net("net"): opt Money,
        udi("udi"): many Reference [refs "Device"],
        note_number("noteNumber"): many PositiveInt,
        /// Detail level adjudication details
        adjudication("adjudication"): many Adjudication,
        /// Additional items
        sub_detail("subDetail"): many ItemDetailSubDetail,
    }
}

composite! {
    /// Additional items
    backbone ItemDetailSubDetail("ExplanationOfBenefit.Item.Detail.SubDetail") {
        sequence("sequence"): one PositiveInt,
        revenue("revenue"): opt CodeableConcept,
        category("category"): opt CodeableConcept,
        product_or_service("productOrService"): one CodeableConcept,
        modifier("modifier"): many CodeableConcept,
        program_code("programCode"): many CodeableConcept,
        quantity("quantity"): opt SimpleQuantity,
        unit_price("unitPrice"): opt Money,
        factor("factor"): opt Decimal,
        net("net"): opt Money,
        udi("udi"): many Reference [refs "Device"],
        note_number("noteNumber"): many PositiveInt,
        /// Subdetail level adjudication details
        adjudication("adjudication"): many Adjudication,
    }
}

choice! {
    /// `ExplanationOfBenefit.addItem.serviced[x]`
    pub enum AddItemServiced {
        Date(Date),
        Period(Period),
    }
}

choice! {
    /// `ExplanationOfBenefit.addItem.location[x]`
    pub enum AddItemLocation {
        CodeableConcept(CodeableConcept),
        Address(Address),
        Reference(Reference),
    }
}

composite! {
    /// Insurer added line items
    backbone AddItem("ExplanationOfBenefit.AddItem") {
        /// Item sequence number
        item_sequence("itemSequence"): many PositiveInt,
        /// Detail sequence number
        detail_sequence("detailSequence"): many PositiveInt,
        /// Subdetail sequence number
        sub_detail_sequence("subDetailSequence"): many PositiveInt,
        /// Authorized providers
        provider("provider"): many Reference [refs "Practitioner", "PractitionerRole", "Organization"],
        product_or_service("productOrService"): one CodeableConcept,
        modifier("modifier"): many CodeableConcept,
        program_code("programCode"): many CodeableConcept,
        serviced("serviced"): opt_choice AddItemServiced,
        location("location"): opt_choice AddItemLocation [refs "Location"],
        quantity("quantity"): opt SimpleQuantity,
        unit_price("unitPrice"): opt Money,
        factor("factor"): opt Decimal,
        net("net"): opt Money,
        body_site("bodySite"): opt CodeableConcept,
        sub_site("subSite"): many CodeableConcept,
        note_number("noteNumber"): many PositiveInt,
        /// Added items adjudication
        adjudication("adjudication"): many Adjudication,
        /// Insurer added line items
        detail("detail"): many AddItemDetail,
    }
}

composite! {
    /// Insurer added line items
    backbone AddItemDetail("ExplanationOfBenefit.AddItem.Detail") {
        product_or_service("productOrService"): one CodeableConcept,
        modifier("modifier"): many CodeableConcept,
        quantity("quantity"): opt SimpleQuantity,
        unit_price("unitPrice"): opt Money,
        factor("factor"): opt Decimal,
        net("net"): opt Money,
        note_number("noteNumber"): many PositiveInt,
        adjudication("adjudication"): many Adjudication,
        /// Insurer added line items
        sub_detail("subDetail"): many AddItemDetailSubDetail,
    }
}

composite! {
    /// Insurer added line items
    backbone AddItemDetailSubDetail("ExplanationOfBenefit.AddItem.Detail.SubDetail") {
        product_or_service("productOrService"): one CodeableConcept,
        modifier("modifier"): many CodeableConcept,
        quantity("quantity"): opt SimpleQuantity,
        unit_price("unitPrice"): opt Money,
        factor("factor"): opt Decimal,
        net("net"): opt Money,
        note_number("noteNumber"): many PositiveInt,
        adjudication("adjudication"): many Adjudication,
    }
}

composite! {
    /// Adjudication totals
    backbone Total("ExplanationOfBenefit.Total") {
        /// Type of adjudication information
        category("category"): one CodeableConcept,
        /// Financial total for the category
        amount("amount"): one Money,
    }
}

composite! {
    /// Payment Details
    backbone Payment("ExplanationOfBenefit.Payment") {
        /// Partial or complete payment
        type_("type"): opt CodeableConcept,
        /// Payment adjustment for non-claim issues
        adjustment("adjustment"): opt Money,
        adjustment_reason("adjustmentReason"): opt CodeableConcept,
        /// Expected date of payment
        date("date"): opt Date,
        /// Payable amount after adjustment
        amount("amount"): opt Money,
        /// Business identifier for the payment
        identifier("identifier"): opt Identifier,
    }
}

composite! {
    /// Note concerning adjudication
    backbone ProcessNote("ExplanationOfBenefit.ProcessNote") {
        /// Note instance identifier
        number("number"): opt PositiveInt,
        /// display | print | printoper
        type_("type"): opt NoteType,
        /// Note explanatory text
        text("text"): opt FhirString,
        language("language"): opt CodeableConcept,
    }
}

composite! {
    /// Balance by Benefit Category
    backbone BenefitBalance("ExplanationOfBenefit.BenefitBalance") {
        /// Benefit classification
        category("category"): one CodeableConcept,
        /// Excluded from the plan
        excluded("excluded"): opt Boolean,
        /// Short name for the benefit
        name("name"): opt FhirString,
        description("description"): opt FhirString,
        /// In or out of network
        network("network"): opt CodeableConcept,
        /// Individual or family
        unit("unit"): opt CodeableConcept,
        /// Annual or lifetime
        term("term"): opt CodeableConcept,
        /// Benefit Summary
        financial("financial"): many Financial,
    }
}

choice! {
    /// `ExplanationOfBenefit.benefitBalance.financial.allowed[x]`
    pub enum FinancialAllowed {
        UnsignedInt(UnsignedInt),
        String(FhirString),
        Money(Money),
    }
}

choice! {
    /// `ExplanationOfBenefit.benefitBalance.financial.used[x]`
    pub enum FinancialUsed {
        UnsignedInt(UnsignedInt),
        Money(Money),
    }
}

composite! {
    /// Benefit Summary
    backbone Financial("ExplanationOfBenefit.BenefitBalance.Financial") {
        /// Benefit classification
        type_("type"): one CodeableConcept,
        /// Benefits allowed
        allowed("allowed"): opt_choice FinancialAllowed,
        /// Benefits used
        used("used"): opt_choice FinancialUsed,
    }
}

impl ExplanationOfBenefit {
    /// The insurance entry marked as focal, if any.
    pub fn focal_insurance(&self) -> Option<&Insurance> {
        self.insurance
            .iter()
            .find(|insurance| insurance.focal().value().copied().unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::{ExplanationOfBenefitStatus, RemittanceOutcome, Use};

    fn insurance(focal: bool, coverage: &str) -> Insurance {
        Insurance::builder()
            .focal(focal)
            .coverage(Reference::to(coverage).unwrap())
            .build()
            .unwrap()
    }

    fn minimal() -> ExplanationOfBenefitBuilder {
        ExplanationOfBenefit::builder()
            .status(ExplanationOfBenefitStatus::ACTIVE)
            .type_(CodeableConcept::of("http://terminology.hl7.org/CodeSystem/claim-type", "oral").unwrap())
            .use_(Use::CLAIM)
            .patient(Reference::to("Patient/p1").unwrap())
            .created("2024-03-01".parse::<DateTime>().unwrap())
            .insurer(Reference::to("Organization/ins").unwrap())
            .provider(Reference::to("Practitioner/dr").unwrap())
            .outcome(RemittanceOutcome::COMPLETE)
    }

    #[test]
    fn focal_insurance_is_found() {
        let eob = minimal()
            .insurance(insurance(false, "Coverage/secondary"))
            .insurance(insurance(true, "Coverage/primary"))
            .build()
            .unwrap();
        let focal = eob.focal_insurance().unwrap();
        assert_eq!(
            focal.coverage().reference().and_then(|r| r.value()).map(String::as_str),
            Some("Coverage/primary")
        );
    }

    #[test]
    fn required_fields_are_checked_in_declaration_order() {
        let err = ExplanationOfBenefit::builder().build().unwrap_err();
        assert_eq!(err, Error::MissingElement("status".to_string()));

        let err = minimal().build().unwrap_err();
        assert_eq!(err, Error::EmptyList("insurance".to_string()));
    }

    #[test]
    fn procedure_requires_its_choice() {
        let err = Procedure::builder().sequence(1).build().unwrap_err();
        assert_eq!(err, Error::MissingElement("procedure".to_string()));
    }

    #[test]
    fn sequence_must_be_positive() {
        let err = CareTeam::builder()
            .sequence(0)
            .provider(Reference::to("Practitioner/dr").unwrap())
            .build()
            .unwrap_err();
        assert_eq!(err.element(), Some("sequence"));
    }
}
