//! FHIR R4 claim models
//!
//! This crate provides immutable, strongly-typed Rust structures for the FHIR R4
//! `ExplanationOfBenefit` and `Coverage` resources and the datatypes they use.
//!
//! # Module Organization
//!
//! - `types`: primitive datatypes, value set codes, complex datatypes and [`DataType`]
//! - `resources`: resources, their backbone elements and choice unions
//! - `validation`: the rules builders enforce at `build()`
//! - `visitor`: depth-first traversal of model trees
//! - `config`: process-wide validation switches
//!
//! # Design Philosophy
//!
//! - **Immutable**: instances are only created by a builder's `build()` and never change
//! - **Validated**: required elements, choice types, reference targets and primitive
//!   value rules are checked when building
//! - **Declarative**: every composite is a [`composite!`] invocation, so generated
//!   and hand-written types behave identically
//!
//! # Example
//!
//! ```rust
//! use claimwise_models::prelude::*;
//! use claimwise_models::resources::explanation_of_benefit::Insurance;
//!
//! let insurance = Insurance::builder()
//!     .focal(true)
//!     .coverage(Reference::to("Coverage/9876B1").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let eob = ExplanationOfBenefit::builder()
//!     .id("EB3500")
//!     .status(ExplanationOfBenefitStatus::ACTIVE)
//!     .type_(CodeableConcept::of("http://terminology.hl7.org/CodeSystem/claim-type", "oral").unwrap())
//!     .use_(Use::CLAIM)
//!     .patient(Reference::to("Patient/pat1").unwrap())
//!     .created("2014-08-16".parse::<DateTime>().unwrap())
//!     .insurer(Reference::to("Organization/3").unwrap())
//!     .provider(Reference::to("Practitioner/1").unwrap())
//!     .outcome(RemittanceOutcome::COMPLETE)
//!     .insurance(insurance)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(eob.id(), Some("EB3500"));
//! assert_eq!(eob.insurance().len(), 1);
//! ```

pub mod config;
pub mod element;
pub mod error;
#[macro_use]
mod macros;
pub mod resource_type;
pub mod resources;
pub mod types;
pub mod validation;
pub mod visitor;

pub use config::ModelConfig;
pub use element::{BackboneBase, Element, ElementBase, FhirType, ResourceBase};
pub use error::{Error, Result};
pub use resources::Resource;
pub use types::{Choice, Code, DataType, Extension, FromDataType, Meta, Narrative, Reference, Uri};
pub use visitor::{Visitable, Visitor};

#[doc(hidden)]
pub use paste;
#[doc(hidden)]
pub use tracing;

/// Commonly used types, for glob import.
pub mod prelude {
    pub use crate::resources::{Coverage, ExplanationOfBenefit, Resource};
    pub use crate::types::*;
    pub use crate::visitor::{CollectingVisitor, PathVisitor, Visitable, Visitor};
    pub use crate::{Element, Error, FhirType, ModelConfig, Result};
}
