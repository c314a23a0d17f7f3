#![allow(dead_code)]

use serde_json::{json, Value};

pub fn element(path: &str, min: u32, max: &str, types: Value) -> Value {
    json!({ "path": path, "min": min, "max": max, "type": types })
}

pub fn reference_to(targets: &[&str]) -> Value {
    let profiles: Vec<String> = targets
        .iter()
        .map(|t| format!("http://hl7.org/fhir/StructureDefinition/{}", t))
        .collect();
    json!([{ "code": "Reference", "targetProfile": profiles }])
}

pub fn explanation_of_benefit() -> Value {
    let mut status = element(
        "ExplanationOfBenefit.status",
        1,
        "1",
        json!([{ "code": "code" }]),
    );
    status["isModifier"] = json!(true);
    status["short"] = json!("active | cancelled | draft | entered-in-error");
    status["binding"] = json!({
        "strength": "required",
        "valueSet": "http://hl7.org/fhir/ValueSet/explanationofbenefit-status|4.0.1"
    });

    let mut adjudication_ref = json!({
        "path": "ExplanationOfBenefit.item.detail.adjudication",
        "min": 0,
        "max": "*",
    });
    adjudication_ref["contentReference"] = json!("#ExplanationOfBenefit.item.adjudication");

    json!({
        "resourceType": "StructureDefinition",
        "url": "http://hl7.org/fhir/StructureDefinition/ExplanationOfBenefit",
        "name": "ExplanationOfBenefit",
        "description": "Explanation of Benefit resource",
        "kind": "resource",
        "abstract": false,
        "type": "ExplanationOfBenefit",
        "baseDefinition": "http://hl7.org/fhir/StructureDefinition/DomainResource",
        "derivation": "specialization",
        "snapshot": { "element": [
            element("ExplanationOfBenefit", 0, "*", json!([])),
            element("ExplanationOfBenefit.id", 0, "1", json!([{ "code": "id" }])),
            element("ExplanationOfBenefit.meta", 0, "1", json!([{ "code": "Meta" }])),
            element("ExplanationOfBenefit.contained", 0, "*", json!([{ "code": "Resource" }])),
            element("ExplanationOfBenefit.identifier", 0, "*", json!([{ "code": "Identifier" }])),
            status,
            element("ExplanationOfBenefit.type", 1, "1", json!([{ "code": "CodeableConcept" }])),
            element("ExplanationOfBenefit.patient", 1, "1", reference_to(&["Patient"])),
            element("ExplanationOfBenefit.provider", 1, "1",
                reference_to(&["Practitioner", "PractitionerRole", "Organization"])),
            element("ExplanationOfBenefit.diagnosis", 0, "*", json!([{ "code": "BackboneElement" }])),
            element("ExplanationOfBenefit.diagnosis.id", 0, "1", json!([{ "code": "string" }])),
            element("ExplanationOfBenefit.diagnosis.modifierExtension", 0, "*", json!([{ "code": "Extension" }])),
            element("ExplanationOfBenefit.diagnosis.sequence", 1, "1", json!([{ "code": "positiveInt" }])),
            element("ExplanationOfBenefit.diagnosis.diagnosis[x]", 1, "1", json!([
                { "code": "CodeableConcept" },
                { "code": "Reference", "targetProfile": ["http://hl7.org/fhir/StructureDefinition/Condition"] }
            ])),
            element("ExplanationOfBenefit.diagnosis.type", 0, "*", json!([{ "code": "CodeableConcept" }])),
            element("ExplanationOfBenefit.diagnosis.onAdmission", 0, "1", json!([{ "code": "CodeableConcept" }])),
            element("ExplanationOfBenefit.diagnosis.packageCode", 0, "1", json!([{ "code": "CodeableConcept" }])),
            element("ExplanationOfBenefit.insurance", 1, "*", json!([{ "code": "BackboneElement" }])),
            element("ExplanationOfBenefit.insurance.focal", 1, "1", json!([{ "code": "boolean" }])),
            element("ExplanationOfBenefit.insurance.coverage", 1, "1", reference_to(&["Coverage"])),
            element("ExplanationOfBenefit.insurance.preAuthRef", 0, "*", json!([{ "code": "string" }])),
            element("ExplanationOfBenefit.item", 0, "*", json!([{ "code": "BackboneElement" }])),
            element("ExplanationOfBenefit.item.sequence", 1, "1", json!([{ "code": "positiveInt" }])),
            element("ExplanationOfBenefit.item.serviced[x]", 0, "1", json!([{ "code": "date" }, { "code": "Period" }])),
            element("ExplanationOfBenefit.item.quantity", 0, "1", json!([{
                "code": "Quantity",
                "profile": ["http://hl7.org/fhir/StructureDefinition/SimpleQuantity"]
            }])),
            element("ExplanationOfBenefit.item.adjudication", 0, "*", json!([{ "code": "BackboneElement" }])),
            element("ExplanationOfBenefit.item.adjudication.category", 1, "1", json!([{ "code": "CodeableConcept" }])),
            element("ExplanationOfBenefit.item.adjudication.amount", 0, "1", json!([{ "code": "Money" }])),
            element("ExplanationOfBenefit.item.detail", 0, "*", json!([{ "code": "BackboneElement" }])),
            element("ExplanationOfBenefit.item.detail.sequence", 1, "1", json!([{ "code": "positiveInt" }])),
            adjudication_ref,
            element("ExplanationOfBenefit.precedence", 0, "0", json!([{ "code": "positiveInt" }])),
        ]}
    })
}

pub fn money() -> Value {
    json!({
        "resourceType": "StructureDefinition",
        "url": "http://hl7.org/fhir/StructureDefinition/Money",
        "name": "Money",
        "kind": "complex-type",
        "abstract": false,
        "type": "Money",
        "derivation": "specialization",
        "snapshot": { "element": [
            element("Money", 0, "*", json!([])),
            element("Money.id", 0, "1", json!([{ "code": "string" }])),
            element("Money.extension", 0, "*", json!([{ "code": "Extension" }])),
            element("Money.value", 0, "1", json!([{ "code": "decimal" }])),
            element("Money.currency", 0, "1", json!([{ "code": "code" }])),
        ]}
    })
}

pub fn simple_quantity_profile() -> Value {
    json!({
        "resourceType": "StructureDefinition",
        "url": "http://hl7.org/fhir/StructureDefinition/SimpleQuantity",
        "name": "SimpleQuantity",
        "kind": "complex-type",
        "type": "Quantity",
        "derivation": "constraint",
        "snapshot": { "element": [ element("Quantity", 0, "*", json!([])) ] }
    })
}

pub fn required_binding(value_set: &str) -> Value {
    json!({
        "strength": "required",
        "valueSet": format!("http://hl7.org/fhir/ValueSet/{}|4.0.1", value_set)
    })
}

fn complex_type(name: &str, elements: Vec<Value>) -> Value {
    let mut snapshot = vec![
        element(name, 0, "*", json!([])),
        element(&format!("{}.id", name), 0, "1", json!([{ "code": "string" }])),
        element(&format!("{}.extension", name), 0, "*", json!([{ "code": "Extension" }])),
    ];
    snapshot.extend(elements);
    json!({
        "resourceType": "StructureDefinition",
        "url": format!("http://hl7.org/fhir/StructureDefinition/{}", name),
        "name": name,
        "kind": "complex-type",
        "abstract": false,
        "type": name,
        "derivation": "specialization",
        "snapshot": { "element": snapshot }
    })
}

pub fn identifier_type() -> Value {
    let mut use_ = element("Identifier.use", 0, "1", json!([{ "code": "code" }]));
    use_["binding"] = required_binding("identifier-use");
    complex_type("Identifier", vec![
        use_,
        element("Identifier.type", 0, "1", json!([{ "code": "CodeableConcept" }])),
        element("Identifier.system", 0, "1", json!([{ "code": "uri" }])),
        element("Identifier.value", 0, "1", json!([{ "code": "string" }])),
        element("Identifier.period", 0, "1", json!([{ "code": "Period" }])),
        element("Identifier.assigner", 0, "1", reference_to(&["Organization"])),
    ])
}

pub fn reference_type() -> Value {
    complex_type("Reference", vec![
        element("Reference.reference", 0, "1", json!([{ "code": "string" }])),
        element("Reference.type", 0, "1", json!([{ "code": "uri" }])),
        element("Reference.identifier", 0, "1", json!([{ "code": "Identifier" }])),
        element("Reference.display", 0, "1", json!([{ "code": "string" }])),
    ])
}

/// Complex types that hold each other through a choice
pub fn recursive_choice_types() -> Vec<Value> {
    vec![
        complex_type("Alpha", vec![
            element("Alpha.beta", 0, "1", json!([{ "code": "Beta" }])),
        ]),
        complex_type("Beta", vec![
            element("Beta.alpha[x]", 0, "1", json!([{ "code": "Alpha" }, { "code": "string" }])),
        ]),
    ]
}

pub fn coverage() -> Value {
    let mut status = element("Coverage.status", 1, "1", json!([{ "code": "code" }]));
    status["binding"] = required_binding("fm-status");

    json!({
        "resourceType": "StructureDefinition",
        "url": "http://hl7.org/fhir/StructureDefinition/Coverage",
        "name": "Coverage",
        "kind": "resource",
        "abstract": false,
        "type": "Coverage",
        "derivation": "specialization",
        "snapshot": { "element": [
            element("Coverage", 0, "*", json!([])),
            element("Coverage.id", 0, "1", json!([{ "code": "id" }])),
            element("Coverage.text", 0, "1", json!([{ "code": "Narrative" }])),
            status,
            element("Coverage.beneficiary", 1, "1", reference_to(&["Patient"])),
            element("Coverage.payor", 1, "*",
                reference_to(&["Organization", "Patient", "RelatedPerson"])),
            element("Coverage.class", 0, "*", json!([{ "code": "BackboneElement" }])),
            element("Coverage.class.type", 1, "1", json!([{ "code": "CodeableConcept" }])),
            element("Coverage.class.value", 1, "1", json!([{ "code": "string" }])),
            element("Coverage.class.name", 0, "1", json!([{ "code": "string" }])),
            element("Coverage.costToBeneficiary", 0, "*", json!([{ "code": "BackboneElement" }])),
            element("Coverage.costToBeneficiary.type", 0, "1", json!([{ "code": "CodeableConcept" }])),
            element("Coverage.costToBeneficiary.value[x]", 1, "1", json!([
                { "code": "Quantity", "profile": ["http://hl7.org/fhir/StructureDefinition/SimpleQuantity"] },
                { "code": "Money" }
            ])),
        ]}
    })
}
