//! Validation support shared by every builder
//!
//! The composite macros call into these functions from `build()`; they are
//! public so that hand-written model types can follow the same rules.

use crate::config::ModelConfig;
use crate::error::{Error, Result};
use crate::resource_type::is_resource_type;
use crate::types::{Choice, DataType, Reference};
use crate::{Element, Visitable};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length of string-like primitive values.
pub const MAX_STRING_LENGTH: usize = 1_048_576;

static REFERENCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([A-Z][A-Za-z]+)/[A-Za-z0-9\-.]{1,64}(/_history/[A-Za-z0-9\-.]{1,64})?$",
    )
    .expect("reference pattern is valid")
});

static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9\-.]{1,64}$").expect("id pattern is valid"));

/// Unwrap a required singular field.
pub fn require_non_null<T>(value: Option<T>, element_name: &str) -> Result<T> {
    value.ok_or_else(|| Error::MissingElement(element_name.to_string()))
}

/// Ensure a `1..*` field has at least one entry.
pub fn check_non_empty_list<T>(values: Vec<T>, element_name: &str) -> Result<Vec<T>> {
    if values.is_empty() {
        return Err(Error::EmptyList(element_name.to_string()));
    }
    Ok(values)
}

/// Narrow an optional [`DataType`] to the choice type `C`.
pub fn choice_element<C: Choice>(
    value: Option<DataType>,
    element_name: &str,
) -> Result<Option<C>> {
    match value {
        None => Ok(None),
        Some(value) => C::from_data_type(value)
            .map(Some)
            .map_err(|other| Error::InvalidChoiceType {
                element: element_name.to_string(),
                found: other.type_name(),
                allowed: C::TYPE_NAMES,
            }),
    }
}

/// Narrow a required [`DataType`] to the choice type `C`.
pub fn require_choice_element<C: Choice>(
    value: Option<DataType>,
    element_name: &str,
) -> Result<C> {
    let value = require_non_null(value, element_name)?;
    choice_element(Some(value), element_name)?
        .ok_or_else(|| Error::MissingElement(element_name.to_string()))
}

/// Wrap a value rule failure with the element it occurred in.
pub fn in_element(element_name: &str, source: Error) -> Error {
    Error::InvalidElement {
        element: element_name.to_string(),
        source: Box::new(source),
    }
}

pub fn check_element<E: Element + ?Sized>(element: &E, element_name: &str) -> Result<()> {
    element
        .check_value()
        .map_err(|source| in_element(element_name, source))
}

pub fn check_optional_element<E: Element>(element: Option<&E>, element_name: &str) -> Result<()> {
    match element {
        Some(element) => check_element(element, element_name),
        None => Ok(()),
    }
}

pub fn check_elements<E: Element>(elements: &[E], element_name: &str) -> Result<()> {
    elements
        .iter()
        .try_for_each(|element| check_element(element, element_name))
}

/// `ele-1`: an element must carry a value, children, or both.
pub fn require_value_or_children<E: Element + ?Sized>(element: &E) -> Result<()> {
    if !element.has_value() && !element.has_children() {
        return Err(Error::NoValueOrChildren(element.type_name()));
    }
    Ok(())
}

/// Check that a reference names one of the allowed target resource types.
///
/// The literal `Reference.reference` is inspected when it is a relative
/// (`Type/id`, `Type/id/_history/vid`) or conditional (`Type?query`) reference.
/// Local (`#id`) references and anything with a scheme (`urn:uuid:...`,
/// absolute `http(s)` URLs) are not inspected. When `Reference.type` is set it
/// must be allowed and must agree with the literal.
pub fn check_reference_type(
    reference: Option<&Reference>,
    element_name: &str,
    allowed: &[&'static str],
) -> Result<()> {
    let Some(reference) = reference else {
        return Ok(());
    };
    if !ModelConfig::current().check_reference_types {
        return Ok(());
    }

    let literal = reference.reference().and_then(|r| r.value());
    let mut literal_type: Option<String> = None;

    if let Some(literal) = literal {
        if !literal.starts_with('#') && !has_scheme(literal) {
            let resource_type = match literal.find('?') {
                Some(index) => Some(literal[..index].to_string()),
                None => REFERENCE_PATTERN
                    .captures(literal)
                    .and_then(|captures| captures.get(1))
                    .map(|m| m.as_str().to_string()),
            };
            let Some(resource_type) = resource_type else {
                return Err(Error::InvalidReference {
                    element: element_name.to_string(),
                    reference: literal.clone(),
                });
            };
            check_target(&resource_type, element_name, allowed)?;
            literal_type = Some(resource_type);
        }
    }

    if let Some(declared) = reference.type_().and_then(|t| t.value()) {
        check_target(declared, element_name, allowed)?;
        if let (Some(literal), Some(literal_type)) = (literal, literal_type) {
            if &literal_type != declared {
                return Err(Error::ReferenceTypeMismatch {
                    element: element_name.to_string(),
                    reference: literal.clone(),
                    expected: declared.clone(),
                });
            }
        }
    }

    Ok(())
}

/// [`check_reference_type`] for every entry of a repeating reference field.
pub fn check_reference_types(
    references: &[Reference],
    element_name: &str,
    allowed: &[&'static str],
) -> Result<()> {
    references
        .iter()
        .try_for_each(|reference| check_reference_type(Some(reference), element_name, allowed))
}

fn check_target(resource_type: &str, element_name: &str, allowed: &[&'static str]) -> Result<()> {
    if !is_resource_type(resource_type) {
        return Err(Error::UnknownResourceType {
            element: element_name.to_string(),
            resource_type: resource_type.to_string(),
        });
    }
    if !allowed.contains(&resource_type) {
        return Err(Error::InvalidReferenceType {
            element: element_name.to_string(),
            resource_type: resource_type.to_string(),
            allowed: allowed.to_vec(),
        });
    }
    Ok(())
}

/// A colon that is neither the first nor the last character marks a scheme.
fn has_scheme(value: &str) -> bool {
    matches!(value.find(':'), Some(index) if index > 0 && index < value.len() - 1)
}

fn check_length(type_name: &'static str, value: &str) -> Result<()> {
    let length = value.chars().count();
    if length > MAX_STRING_LENGTH {
        return Err(Error::invalid_value(
            type_name,
            format!(
                "length {} is greater than the maximum allowed length {}",
                length, MAX_STRING_LENGTH
            ),
        ));
    }
    Ok(())
}

/// Rules for `string` values.
pub fn check_string(value: &str) -> Result<()> {
    check_length("string", value)?;
    let check_control_chars = ModelConfig::current().check_control_chars;
    let mut has_content = false;
    for c in value.chars() {
        match c {
            ' ' | '\t' | '\r' | '\n' => {}
            c if c.is_whitespace() => {
                return Err(Error::invalid_value(
                    "string",
                    format!("unsupported whitespace character U+{:04X}", c as u32),
                ));
            }
            c if check_control_chars && (c as u32) < 0x20 => {
                return Err(Error::invalid_value(
                    "string",
                    format!("unsupported control character U+{:04X}", c as u32),
                ));
            }
            _ => has_content = true,
        }
    }
    if !has_content {
        return Err(Error::invalid_value(
            "string",
            "must contain at least one non-whitespace character",
        ));
    }
    Ok(())
}

/// Rules for `code` values: no leading, trailing or repeated whitespace.
pub fn check_code(value: &str) -> Result<()> {
    check_length("code", value)?;
    let valid = !value.is_empty()
        && value
            .split(' ')
            .all(|token| !token.is_empty() && !token.chars().any(char::is_whitespace));
    if !valid {
        return Err(Error::invalid_value(
            "code",
            format!("'{}' must not contain leading, trailing or repeated whitespace", value),
        ));
    }
    Ok(())
}

/// Rules for `id` values.
pub fn check_id(value: &str) -> Result<()> {
    if !ID_PATTERN.is_match(value) {
        return Err(Error::invalid_value(
            "id",
            format!("'{}' must match [A-Za-z0-9\\-\\.]{{1,64}}", value),
        ));
    }
    Ok(())
}

/// Rules for `uri`, `url` and `canonical` values.
pub fn check_uri(value: &str) -> Result<()> {
    check_length("uri", value)?;
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(Error::invalid_value(
            "uri",
            format!("'{}' must be non-empty and contain no whitespace", value),
        ));
    }
    Ok(())
}

pub fn check_min_value(value: i32, min: i32, type_name: &'static str) -> Result<()> {
    if value < min {
        return Err(Error::invalid_value(
            type_name,
            format!("{} is less than the minimum allowed value {}", value, min),
        ));
    }
    Ok(())
}

/// Only the outer `<div>` wrapper of narrative XHTML is checked.
pub fn check_xhtml(value: &str) -> Result<()> {
    check_length("xhtml", value)?;
    let trimmed = value.trim();
    let opens = trimmed.starts_with("<div>") || trimmed.starts_with("<div ");
    if !opens || !trimmed.ends_with("</div>") {
        return Err(Error::invalid_value("xhtml", "narrative must be a single <div> element"));
    }
    Ok(())
}

/// Decode the text form of a `base64Binary` value.
pub fn decode_base64(value: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(value.trim())
        .map_err(|e| Error::invalid_value("base64Binary", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_rules() {
        assert!(check_string("Jane Doe").is_ok());
        assert!(check_string("line one\nline two\t").is_ok());
        assert!(check_string("").is_err());
        assert!(check_string(" \t ").is_err());
        assert!(check_string("no\u{00A0}break").is_err());
        assert!(check_string("bell\u{0007}").is_err());
    }

    #[test]
    fn code_rules() {
        assert!(check_code("active").is_ok());
        assert!(check_code("two words").is_ok());
        assert!(check_code(" active").is_err());
        assert!(check_code("active ").is_err());
        assert!(check_code("two  spaces").is_err());
        assert!(check_code("tab\there").is_err());
        assert!(check_code("").is_err());
    }

    #[test]
    fn id_rules() {
        assert!(check_id("eob-1.2").is_ok());
        assert!(check_id(&"a".repeat(64)).is_ok());
        assert!(check_id(&"a".repeat(65)).is_err());
        assert!(check_id("has_underscore").is_err());
        assert!(check_id("").is_err());
    }

    #[test]
    fn uri_rules() {
        assert!(check_uri("http://hl7.org/fhir").is_ok());
        assert!(check_uri("urn:uuid:1234").is_ok());
        assert!(check_uri("http://example.org/a b").is_err());
    }

    #[test]
    fn min_value() {
        assert!(check_min_value(1, 1, "positiveInt").is_ok());
        assert!(matches!(
            check_min_value(0, 1, "positiveInt"),
            Err(Error::InvalidValue { type_name: "positiveInt", .. })
        ));
    }

    #[test]
    fn xhtml_rules() {
        assert!(check_xhtml("<div xmlns=\"http://www.w3.org/1999/xhtml\">ok</div>").is_ok());
        assert!(check_xhtml("<p>not a div</p>").is_err());
    }

    #[test]
    fn base64_decoding() {
        assert_eq!(decode_base64("aGVsbG8=").unwrap(), b"hello");
        assert!(decode_base64("not base64!").is_err());
    }

    #[test]
    fn scheme_detection() {
        assert!(has_scheme("urn:uuid:abc"));
        assert!(has_scheme("http://example.org/Patient/1"));
        assert!(!has_scheme("Patient/1"));
        assert!(!has_scheme(":leading"));
        assert!(!has_scheme("trailing:"));
    }

    #[test]
    fn reference_pattern_extracts_type() {
        let captures = REFERENCE_PATTERN.captures("Patient/123/_history/2").unwrap();
        assert_eq!(captures.get(1).unwrap().as_str(), "Patient");
        assert!(REFERENCE_PATTERN.captures("Patient").is_none());
        assert!(REFERENCE_PATTERN.captures("http://example.org/fhir/Patient/123").is_none());
    }
}
