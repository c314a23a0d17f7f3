//! FHIR datatypes: primitives, value set codes and complex types

mod codes;
mod data_type;
mod datatypes;
mod datetime;
mod primitives;

pub use codes::*;
pub use data_type::{Choice, DataType, FromDataType};
pub use datatypes::*;
pub use datetime::{FhirDate, FhirDateTime};
pub use primitives::*;
