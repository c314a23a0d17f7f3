//! Generated models

pub mod coverage;

pub use coverage::Coverage;
