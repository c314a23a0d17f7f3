//! Code generators
//!
//! A generator turns a [`TypeRegistry`] into source text. The Rust generator
//! emits `claimwise-models` macro invocations.

pub mod rust;

use crate::ir::TypeRegistry;
use anyhow::Result;

/// Trait that all generators must implement
pub trait Generator {
    /// The output type of this generator
    type Output;

    /// Generate code from the type registry
    fn generate(&self, registry: &TypeRegistry) -> Result<Self::Output>;
}

/// Configuration options for code generation
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Whether to generate documentation comments
    pub generate_docs: bool,
    /// Module path the shared datatypes are imported from.
    ///
    /// Defaults to `crate::types`, i.e. generated modules live inside the models crate.
    pub module_prefix: Option<String>,
}

impl GeneratorConfig {
    pub fn types_module(&self) -> &str {
        self.module_prefix.as_deref().unwrap_or("crate::types")
    }

    /// Crate path the `composite!` and `choice!` macros are imported from
    pub fn macros_crate(&self) -> &str {
        match self.module_prefix.as_deref() {
            Some(prefix) => prefix.split("::").next().unwrap_or("crate"),
            None => "crate",
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            generate_docs: true,
            module_prefix: None,
        }
    }
}
