//! Codes from required value set bindings
//!
//! Each binding gets a closed value enum (`...Value`) and a `code` primitive
//! that carries it. The primitive exposes one associated constant per code:
//!
//! ```
//! use claimwise_models::types::{ExplanationOfBenefitStatus, ExplanationOfBenefitStatusValue};
//!
//! let status = ExplanationOfBenefitStatus::ACTIVE;
//! assert_eq!(status.value(), Some(&ExplanationOfBenefitStatusValue::Active));
//! assert_eq!(ExplanationOfBenefitStatus::parse("cancelled").unwrap().value().unwrap().as_str(), "cancelled");
//! ```

use super::primitives::{primitive, unchecked};
use crate::element::{Element, ElementBase, FhirType};
use crate::error::{Error, Result};
use crate::types::{Code, DataType, Extension};
use crate::validation;
use crate::visitor::{accept_value, AsPrimitive, Primitive, Visitor};
use crate::Visitable;
use std::fmt;
use std::str::FromStr;

macro_rules! codes {
    (
        $(#[$meta:meta])*
        $name:ident ($value_set:literal) {
            $( $variant:ident = $code:literal => $constant:ident ),+ $(,)?
        }
    ) => {
        paste::paste! {
            #[doc = "Codes of the `" $value_set "` value set."]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub enum [<$name Value>] {
                $( $variant, )+
            }

            impl [<$name Value>] {
                /// Canonical URL of the bound value set.
                pub const VALUE_SET: &'static str = $value_set;

                pub const ALL: &'static [[<$name Value>]] = &[$( [<$name Value>]::$variant, )+];

                pub fn as_str(&self) -> &'static str {
                    match self {
                        $( [<$name Value>]::$variant => $code, )+
                    }
                }
            }

            impl FromStr for [<$name Value>] {
                type Err = Error;

                fn from_str(s: &str) -> Result<Self> {
                    match s {
                        $( $code => Ok([<$name Value>]::$variant), )+
                        _ => Err(Error::invalid_value(
                            "code",
                            format!("'{}' is not a code of {}", s, $value_set),
                        )),
                    }
                }
            }

            impl fmt::Display for [<$name Value>] {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl AsPrimitive for [<$name Value>] {
                fn as_primitive(&self) -> Primitive<'_> {
                    Primitive::String(self.as_str())
                }
            }

            primitive! {
                $(#[$meta])*
                $name("code"): [<$name Value>] => unchecked
            }

            impl $name {
                $(
                    pub const $constant: $name = $name {
                        base: ElementBase {
                            id: None,
                            extension: Vec::new(),
                        },
                        value: Some([<$name Value>]::$variant),
                    };
                )+

                /// Parse a code string into an element.
                pub fn parse(code: &str) -> Result<Self> {
                    code.parse::<[<$name Value>]>().map(Self::from)
                }
            }

            impl From<$name> for Code {
                fn from(value: $name) -> Self {
                    Code::from_parts(value.base, value.value.map(|v| v.as_str().to_string()))
                }
            }

            impl From<$name> for DataType {
                fn from(value: $name) -> Self {
                    DataType::Code(value.into())
                }
            }
        }
    };
}

codes! {
    /// The status of the resource instance
    ExplanationOfBenefitStatus("http://hl7.org/fhir/ValueSet/explanationofbenefit-status") {
        Active = "active" => ACTIVE,
        Cancelled = "cancelled" => CANCELLED,
        Draft = "draft" => DRAFT,
        EnteredInError = "entered-in-error" => ENTERED_IN_ERROR,
    }
}

codes! {
    /// The purpose of the claim: a claim, preauthorization or predetermination
    Use("http://hl7.org/fhir/ValueSet/claim-use") {
        Claim = "claim" => CLAIM,
        Preauthorization = "preauthorization" => PREAUTHORIZATION,
        Predetermination = "predetermination" => PREDETERMINATION,
    }
}

codes! {
    /// The result of the claim processing
    RemittanceOutcome("http://hl7.org/fhir/ValueSet/remittance-outcome") {
        Queued = "queued" => QUEUED,
        Complete = "complete" => COMPLETE,
        Error = "error" => ERROR,
        Partial = "partial" => PARTIAL,
    }
}

codes! {
    /// The presentation types of notes
    NoteType("http://hl7.org/fhir/ValueSet/note-type") {
        Display = "display" => DISPLAY,
        Print = "print" => PRINT,
        Printoper = "printoper" => PRINTOPER,
    }
}

codes! {
    /// The status of the coverage
    CoverageStatus("http://hl7.org/fhir/ValueSet/fm-status") {
        Active = "active" => ACTIVE,
        Cancelled = "cancelled" => CANCELLED,
        Draft = "draft" => DRAFT,
        EnteredInError = "entered-in-error" => ENTERED_IN_ERROR,
    }
}

codes! {
    /// The status of a resource narrative
    NarrativeStatus("http://hl7.org/fhir/ValueSet/narrative-status") {
        Generated = "generated" => GENERATED,
        Extensions = "extensions" => EXTENSIONS,
        Additional = "additional" => ADDITIONAL,
        Empty = "empty" => EMPTY,
    }
}

codes! {
    /// How the Quantity should be understood and represented
    QuantityComparator("http://hl7.org/fhir/ValueSet/quantity-comparator") {
        LessThan = "<" => LESS_THAN,
        LessOrEquals = "<=" => LESS_OR_EQUALS,
        GreaterOrEquals = ">=" => GREATER_OR_EQUALS,
        GreaterThan = ">" => GREATER_THAN,
    }
}

codes! {
    /// Identifies the purpose for this identifier, if known
    IdentifierUse("http://hl7.org/fhir/ValueSet/identifier-use") {
        Usual = "usual" => USUAL,
        Official = "official" => OFFICIAL,
        Temp = "temp" => TEMP,
        Secondary = "secondary" => SECONDARY,
        Old = "old" => OLD,
    }
}

codes! {
    /// The use of an address
    AddressUse("http://hl7.org/fhir/ValueSet/address-use") {
        Home = "home" => HOME,
        Work = "work" => WORK,
        Temp = "temp" => TEMP,
        Old = "old" => OLD,
        Billing = "billing" => BILLING,
    }
}

codes! {
    /// The type of an address (physical / postal)
    AddressType("http://hl7.org/fhir/ValueSet/address-type") {
        Postal = "postal" => POSTAL,
        Physical = "physical" => PHYSICAL,
        Both = "both" => BOTH,
    }
}

/// The code type modeling a required binding to `value_set`, if any.
///
/// A `|version` suffix on the URL is ignored.
pub fn bound_code_type(value_set: &str) -> Option<&'static str> {
    let url = value_set.split('|').next().unwrap_or(value_set);
    [
        (ExplanationOfBenefitStatusValue::VALUE_SET, "ExplanationOfBenefitStatus"),
        (UseValue::VALUE_SET, "Use"),
        (RemittanceOutcomeValue::VALUE_SET, "RemittanceOutcome"),
        (NoteTypeValue::VALUE_SET, "NoteType"),
        (CoverageStatusValue::VALUE_SET, "CoverageStatus"),
        (NarrativeStatusValue::VALUE_SET, "NarrativeStatus"),
        (QuantityComparatorValue::VALUE_SET, "QuantityComparator"),
        (IdentifierUseValue::VALUE_SET, "IdentifierUse"),
        (AddressUseValue::VALUE_SET, "AddressUse"),
        (AddressTypeValue::VALUE_SET, "AddressType"),
    ]
    .into_iter()
    .find(|(bound, _)| *bound == url)
    .map(|(_, type_name)| type_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_codes_are_rejected() {
        assert!(matches!(
            "archived".parse::<ExplanationOfBenefitStatusValue>(),
            Err(Error::InvalidValue { type_name: "code", .. })
        ));
        assert!(Use::parse("claim").is_ok());
    }

    #[test]
    fn codes_round_trip_through_text() {
        for value in QuantityComparatorValue::ALL {
            assert_eq!(value.as_str().parse::<QuantityComparatorValue>().unwrap(), *value);
        }
    }

    #[test]
    fn finds_code_types_by_value_set() {
        assert_eq!(
            bound_code_type("http://hl7.org/fhir/ValueSet/claim-use|4.0.1"),
            Some("Use")
        );
        assert_eq!(bound_code_type("http://hl7.org/fhir/ValueSet/currencies"), None);
    }

    #[test]
    fn bound_codes_widen_to_code() {
        let code = Code::from(ExplanationOfBenefitStatus::CANCELLED);
        assert_eq!(code.value().map(String::as_str), Some("cancelled"));

        let extension = Extension::builder()
            .url("http://example.org/status")
            .value(ExplanationOfBenefitStatus::ACTIVE)
            .build()
            .unwrap();
        assert_eq!(extension.value(), Some(&DataType::Code(Code::from("active"))));
    }

    #[test]
    fn constants_are_valid_elements() {
        let status = CoverageStatus::ACTIVE;
        assert!(status.has_value());
        assert_eq!(status.to_builder().build().unwrap(), status);
        assert_eq!(status.type_name(), "code");
    }
}
