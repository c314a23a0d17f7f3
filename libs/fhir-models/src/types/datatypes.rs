//! Complex datatypes

use crate::composite;
use crate::types::{
    AddressType, AddressUse, Base64Binary, Boolean, Canonical, Code, DataType, DateTime, Decimal,
    FhirString, Id, IdentifierUse, Instant, NarrativeStatus, QuantityComparator, UnsignedInt, Uri,
    Url, Xhtml,
};

composite! {
    /// Optional extensions element
    element Extension("Extension") {
        /// identifies the meaning of the extension
        url("url"): one Uri,
        /// Value of extension
        value("value"): opt_choice DataType,
    }
}

composite! {
    /// Metadata about a resource
    element Meta("Meta") {
        version_id("versionId"): opt Id,
        /// When the resource version last changed
        last_updated("lastUpdated"): opt Instant,
        source("source"): opt Uri,
        /// Profiles this resource claims to conform to
        profile("profile"): many Canonical,
        security("security"): many Coding,
        tag("tag"): many Coding,
    }
}

composite! {
    /// Human-readable summary of the resource
    element Narrative("Narrative") {
        status("status"): one NarrativeStatus,
        /// Limited xhtml content
        div("div"): one Xhtml,
    }
}

composite! {
    /// A reference to a code defined by a terminology system
    element Coding("Coding") {
        /// Identity of the terminology system
        system("system"): opt Uri,
        version("version"): opt FhirString,
        /// Symbol in syntax defined by the system
        code("code"): opt Code,
        display("display"): opt FhirString,
        /// If this coding was chosen directly by the user
        user_selected("userSelected"): opt Boolean,
    }
}

composite! {
    /// Concept - reference to a terminology or just text
    element CodeableConcept("CodeableConcept") {
        coding("coding"): many Coding,
        /// Plain text representation of the concept
        text("text"): opt FhirString,
    }
}

composite! {
    /// An identifier intended for computation
    element Identifier("Identifier") {
        use_("use"): opt IdentifierUse,
        type_("type"): opt CodeableConcept,
        /// The namespace for the identifier value
        system("system"): opt Uri,
        /// The value that is unique
        value("value"): opt FhirString,
        period("period"): opt Period,
        /// Organization that issued id (may be just text)
        assigner("assigner"): opt Reference [refs "Organization"],
    }
}

composite! {
    /// A reference from one resource to another
    element Reference("Reference") {
        /// Literal reference, Relative, internal or absolute URL
        reference("reference"): opt FhirString,
        /// Type the reference refers to (e.g. "Patient")
        type_("type"): opt Uri,
        /// Logical reference, when literal reference is not known
        identifier("identifier"): opt Box<Identifier>,
        display("display"): opt FhirString,
    }
}

composite! {
    /// Time range defined by start and end date/time
    element Period("Period") {
        start("start"): opt DateTime,
        end("end"): opt DateTime,
    }
}

composite! {
    /// A measured or measurable amount
    element Quantity("Quantity") {
        /// Numerical value (with implicit precision)
        value("value"): opt Decimal,
        comparator("comparator"): opt QuantityComparator,
        unit("unit"): opt FhirString,
        system("system"): opt Uri,
        code("code"): opt Code,
    }
}

composite! {
    /// A fixed quantity (no comparator)
    element SimpleQuantity("SimpleQuantity") {
        value("value"): opt Decimal,
        unit("unit"): opt FhirString,
        system("system"): opt Uri,
        code("code"): opt Code,
    }
}

composite! {
    /// An amount of economic utility in some recognized currency
    element Money("Money") {
        value("value"): opt Decimal,
        /// ISO 4217 Currency Code
        currency("currency"): opt Code,
    }
}

composite! {
    /// An address expressed using postal conventions
    element Address("Address") {
        use_("use"): opt AddressUse,
        type_("type"): opt AddressType,
        /// Text representation of the address
        text("text"): opt FhirString,
        /// Street name, number, direction & P.O. Box etc.
        line("line"): many FhirString,
        city("city"): opt FhirString,
        district("district"): opt FhirString,
        /// Sub-unit of country (abbreviations ok)
        state("state"): opt FhirString,
        postal_code("postalCode"): opt FhirString,
        country("country"): opt FhirString,
        period("period"): opt Period,
    }
}

composite! {
    /// Content in a format defined elsewhere
    element Attachment("Attachment") {
        /// Mime type of the content, with charset etc.
        content_type("contentType"): opt Code,
        language("language"): opt Code,
        /// Data inline, base64ed
        data("data"): opt Base64Binary,
        url("url"): opt Url,
        /// Number of bytes of content (if url provided)
        size("size"): opt UnsignedInt,
        hash("hash"): opt Base64Binary,
        title("title"): opt FhirString,
        creation("creation"): opt DateTime,
    }
}

impl Reference {
    /// Relative literal reference, e.g. `Reference::to("Patient/123")`.
    pub fn to(reference: impl Into<String>) -> crate::Result<Self> {
        Self::builder().reference(reference.into()).build()
    }
}

/// A `SimpleQuantity` is a `Quantity` without a comparator.
impl From<SimpleQuantity> for Quantity {
    fn from(value: SimpleQuantity) -> Self {
        Quantity {
            base: value.base,
            value: value.value,
            comparator: None,
            unit: value.unit,
            system: value.system,
            code: value.code,
        }
    }
}

impl Money {
    pub fn of(value: impl Into<rust_decimal::Decimal>, currency: &str) -> crate::Result<Self> {
        Self::builder().value(value.into()).currency(currency).build()
    }
}

impl CodeableConcept {
    /// Concept with a single coding.
    pub fn of(system: &str, code: &str) -> crate::Result<Self> {
        let coding = Coding::builder().system(system).code(code).build()?;
        Self::builder().coding(coding).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::Element;
    use rust_decimal::Decimal as Amount;

    #[test]
    fn empty_datatype_violates_ele1() {
        assert_eq!(
            CodeableConcept::builder().build(),
            Err(Error::NoValueOrChildren("CodeableConcept"))
        );
    }

    #[test]
    fn extension_requires_url() {
        assert_eq!(
            Extension::builder().value(Boolean::from(true)).build(),
            Err(Error::MissingElement("url".to_string()))
        );
    }

    #[test]
    fn builder_accepts_native_values() {
        let money = Money::of(Amount::new(12550, 2), "USD").unwrap();
        assert_eq!(money.value().and_then(|v| v.value()), Some(&Amount::new(12550, 2)));
        assert_eq!(money.currency().and_then(|c| c.value()).map(String::as_str), Some("USD"));
    }

    #[test]
    fn invalid_primitive_is_reported_with_element_name() {
        let err = Coding::builder().code("two  spaces").build().unwrap_err();
        assert_eq!(err.element(), Some("code"));
        assert!(matches!(err, Error::InvalidElement { .. }));
    }

    #[test]
    fn identifier_assigner_must_be_an_organization() {
        let assigner = Reference::to("Patient/1").unwrap();
        let err = Identifier::builder()
            .value("A-1")
            .assigner(assigner)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidReferenceType { .. }));
    }

    #[test]
    fn to_builder_round_trips() {
        let reference = Reference::builder()
            .reference("Organization/acme")
            .display("Acme Insurance")
            .build()
            .unwrap();
        assert_eq!(reference.to_builder().build().unwrap(), reference);
        assert!(reference.has_children());
    }
}
