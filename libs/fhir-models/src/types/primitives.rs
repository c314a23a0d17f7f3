//! Primitive datatypes
//!
//! A primitive is an element with an optional typed value. Values converted
//! with `From` are unchecked; the value rules of each type run when the
//! primitive is built on its own, or when the composite that holds it is built.

use crate::element::{Element, ElementBase, FhirType};
use crate::error::{Error, Result};
use crate::types::datetime::{FhirDate, FhirDateTime};
use crate::types::Extension;
use crate::validation::{self, check_code, check_id, check_string, check_uri, check_xhtml};
use crate::visitor::{accept_value, Visitor};
use crate::Visitable;
use chrono::{FixedOffset, NaiveDate, Utc};
use std::str::FromStr;

macro_rules! primitive {
    (
        $(#[$meta:meta])*
        $name:ident ($type_name:literal) : $value:ty => $check:expr
    ) => {
        paste::paste! {
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq, Hash)]
            pub struct $name {
                base: ElementBase,
                value: Option<$value>,
            }

            #[doc = "Builder for [`" $name "`]."]
            #[derive(Debug, Clone, Default, PartialEq)]
            pub struct [<$name Builder>] {
                base: ElementBase,
                value: Option<$value>,
            }

            impl $name {
                pub fn builder() -> [<$name Builder>] {
                    [<$name Builder>]::default()
                }

                pub fn to_builder(&self) -> [<$name Builder>] {
                    [<$name Builder>]::from(self.clone())
                }

                pub fn value(&self) -> Option<&$value> {
                    self.value.as_ref()
                }

                pub fn id(&self) -> Option<&str> {
                    self.base.id.as_deref()
                }

                pub fn extension(&self) -> &[Extension] {
                    &self.base.extension
                }
            }

            impl [<$name Builder>] {
                crate::__base_setters!(element);

                pub fn value(mut self, value: impl Into<$value>) -> Self {
                    self.value = Some(value.into());
                    self
                }

                pub fn build(&self) -> Result<$name> {
                    let instance = $name {
                        base: self.base.clone(),
                        value: self.value.clone(),
                    };
                    let result = Element::check_value(&instance)
                        .and_then(|_| validation::require_value_or_children(&instance));
                    match result {
                        Ok(()) => Ok(instance),
                        Err(error) => {
                            tracing::debug!(type_name = $type_name, error = %error, "build failed validation");
                            Err(error)
                        }
                    }
                }
            }

            impl From<$name> for [<$name Builder>] {
                fn from(value: $name) -> Self {
                    Self {
                        base: value.base,
                        value: value.value,
                    }
                }
            }

            impl From<$value> for $name {
                fn from(value: $value) -> Self {
                    Self {
                        base: ElementBase::default(),
                        value: Some(value),
                    }
                }
            }

            impl FhirType for $name {
                const TYPE_NAME: &'static str = $type_name;
            }

            impl Element for $name {
                fn id(&self) -> Option<&str> {
                    self.base.id.as_deref()
                }

                fn extension(&self) -> &[Extension] {
                    &self.base.extension
                }

                fn has_value(&self) -> bool {
                    self.value.is_some()
                }

                fn has_children(&self) -> bool {
                    self.base.has_children()
                }

                fn check_value(&self) -> Result<()> {
                    match &self.value {
                        Some(value) => ($check)(value),
                        None => Ok(()),
                    }
                }
            }

            impl Visitable for $name {
                fn type_name(&self) -> &'static str {
                    $type_name
                }

                fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
                    if visitor.pre_visit(self) {
                        visitor.visit_start(element_name, element_index, self);
                        if visitor.visit(element_name, element_index, self) {
                            self.base.accept_children(visitor);
                            accept_value(&self.value, "value", visitor);
                        }
                        visitor.visit_end(element_name, element_index, self);
                        visitor.post_visit(self);
                    }
                }

                fn as_any(&self) -> &dyn std::any::Any {
                    self
                }
            }
        }
    };
}

pub(crate) use primitive;

pub(crate) fn unchecked<T>(_: &T) -> Result<()> {
    Ok(())
}

fn check_positive_int(value: &i32) -> Result<()> {
    validation::check_min_value(*value, 1, "positiveInt")
}

fn check_unsigned_int(value: &i32) -> Result<()> {
    validation::check_min_value(*value, 0, "unsignedInt")
}

primitive! {
    Boolean("boolean"): bool => unchecked
}

primitive! {
    Integer("integer"): i32 => unchecked
}

primitive! {
    /// An integer >= 1
    PositiveInt("positiveInt"): i32 => check_positive_int
}

primitive! {
    /// An integer >= 0
    UnsignedInt("unsignedInt"): i32 => check_unsigned_int
}

primitive! {
    Decimal("decimal"): rust_decimal::Decimal => unchecked
}

primitive! {
    /// A sequence of Unicode characters
    FhirString("string"): String => check_string
}

primitive! {
    /// A string taken from a set of defined codes
    Code("code"): String => check_code
}

impl Code {
    pub(crate) fn from_parts(base: ElementBase, value: Option<String>) -> Self {
        Self { base, value }
    }
}

primitive! {
    /// A logical or resource id
    Id("id"): String => check_id
}

primitive! {
    Uri("uri"): String => check_uri
}

primitive! {
    Url("url"): String => check_uri
}

primitive! {
    /// A URI that refers to a resource by its canonical URL
    Canonical("canonical"): String => check_uri
}

primitive! {
    /// Limited XHTML content
    Xhtml("xhtml"): String => check_xhtml
}

primitive! {
    Date("date"): FhirDate => unchecked
}

primitive! {
    /// A date, date-time or partial date
    DateTime("dateTime"): FhirDateTime => unchecked
}

primitive! {
    /// An instant in time, known at least to the second, with a timezone
    Instant("instant"): chrono::DateTime<FixedOffset> => unchecked
}

primitive! {
    Base64Binary("base64Binary"): Vec<u8> => unchecked
}

macro_rules! from_str_slice {
    ($($name:ident),+) => {
        $(
            impl From<&str> for $name {
                fn from(value: &str) -> Self {
                    Self::from(value.to_string())
                }
            }
        )+
    };
}

from_str_slice!(FhirString, Code, Id, Uri, Url, Canonical, Xhtml);

impl From<NaiveDate> for Date {
    fn from(value: NaiveDate) -> Self {
        Self::from(FhirDate::from(value))
    }
}

impl FromStr for Date {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<FhirDate>().map(Self::from)
    }
}

impl From<NaiveDate> for DateTime {
    fn from(value: NaiveDate) -> Self {
        Self::from(FhirDateTime::from(value))
    }
}

impl From<FhirDate> for DateTime {
    fn from(value: FhirDate) -> Self {
        Self::from(FhirDateTime::from(value))
    }
}

impl From<chrono::DateTime<FixedOffset>> for DateTime {
    fn from(value: chrono::DateTime<FixedOffset>) -> Self {
        Self::from(FhirDateTime::from(value))
    }
}

impl From<chrono::DateTime<Utc>> for DateTime {
    fn from(value: chrono::DateTime<Utc>) -> Self {
        Self::from(FhirDateTime::from(value))
    }
}

impl FromStr for DateTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<FhirDateTime>().map(Self::from)
    }
}

impl From<chrono::DateTime<Utc>> for Instant {
    fn from(value: chrono::DateTime<Utc>) -> Self {
        Self::from(chrono::DateTime::<FixedOffset>::from(value))
    }
}

impl FromStr for Instant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        chrono::DateTime::parse_from_rfc3339(s)
            .map(Self::from)
            .map_err(|e| Error::invalid_value("instant", format!("'{}': {}", s, e)))
    }
}

impl FromStr for Decimal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<rust_decimal::Decimal>()
            .map(Self::from)
            .map_err(|e| Error::invalid_value("decimal", format!("'{}': {}", s, e)))
    }
}

impl Base64Binary {
    /// Decode base64 text into a binary value.
    pub fn decode(encoded: &str) -> Result<Self> {
        validation::decode_base64(encoded).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converted_values_are_checked_at_build() {
        let positive = PositiveInt::from(0);
        assert!(positive.check_value().is_err());
        assert!(positive.to_builder().build().is_err());
        assert!(PositiveInt::builder().value(3).build().is_ok());
    }

    #[test]
    fn empty_primitive_violates_ele1() {
        assert_eq!(
            FhirString::builder().build(),
            Err(Error::NoValueOrChildren("string"))
        );
        assert!(FhirString::builder().id("x").build().is_err());
    }

    #[test]
    fn extension_satisfies_ele1() {
        let extension = Extension::builder()
            .url("http://example.org/data-absent-reason")
            .value(Code::from("unknown"))
            .build()
            .unwrap();
        let value = Boolean::builder().extension(extension).build().unwrap();
        assert!(!value.has_value());
        assert!(value.has_children());
    }

    #[test]
    fn parses_text_forms() {
        assert_eq!("2024-05".parse::<Date>().unwrap().value(), Some(&FhirDate::YearMonth(2024, 5)));
        assert!("12.50".parse::<Decimal>().is_ok());
        assert!("yesterday".parse::<Instant>().is_err());
        assert_eq!(Base64Binary::decode("AQID").unwrap().value(), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn code_whitespace_rules_apply() {
        assert!(Code::builder().value("two  spaces").build().is_err());
        assert!(Code::builder().value("ok").build().is_ok());
    }
}
