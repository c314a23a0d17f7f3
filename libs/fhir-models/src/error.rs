//! Error types for FHIR models

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Missing required element: '{0}'")]
    MissingElement(String),

    #[error("Missing required element: '{0}' must contain at least one entry")]
    EmptyList(String),

    #[error("Invalid type: {found} for choice element: '{element}' must be one of: {allowed:?}")]
    InvalidChoiceType {
        element: String,
        found: &'static str,
        allowed: &'static [&'static str],
    },

    #[error("Invalid reference value or resource type not found in reference value: '{reference}' for element: '{element}'")]
    InvalidReference { element: String, reference: String },

    #[error("Resource type '{resource_type}' found for element: '{element}' must be a valid resource type name")]
    UnknownResourceType {
        element: String,
        resource_type: String,
    },

    #[error("Resource type '{resource_type}' found for element: '{element}' must be one of: {allowed:?}")]
    InvalidReferenceType {
        element: String,
        resource_type: String,
        allowed: Vec<&'static str>,
    },

    #[error("Resource type found in reference value: '{reference}' for element: '{element}' does not match Reference.type: {expected}")]
    ReferenceTypeMismatch {
        element: String,
        reference: String,
        expected: String,
    },

    #[error("ele-1: All FHIR elements must have a @value or children ({0})")]
    NoValueOrChildren(&'static str),

    #[error("Invalid {type_name} value: {message}")]
    InvalidValue {
        type_name: &'static str,
        message: String,
    },

    #[error("Invalid value for element: '{element}': {source}")]
    InvalidElement {
        element: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn invalid_value(type_name: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidValue {
            type_name,
            message: message.into(),
        }
    }

    /// Name of the element the error was raised for, when the rule is element-scoped.
    pub fn element(&self) -> Option<&str> {
        match self {
            Error::MissingElement(name) | Error::EmptyList(name) => Some(name),
            Error::InvalidChoiceType { element, .. }
            | Error::InvalidReference { element, .. }
            | Error::UnknownResourceType { element, .. }
            | Error::InvalidReferenceType { element, .. }
            | Error::ReferenceTypeMismatch { element, .. }
            | Error::InvalidElement { element, .. } => Some(element),
            Error::NoValueOrChildren(_) | Error::InvalidValue { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
