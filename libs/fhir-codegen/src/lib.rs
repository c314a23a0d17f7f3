//! Claimwise Code Generator
//!
//! Reads FHIR StructureDefinitions and generates model modules built on the
//! `composite!` and `choice!` macros of `claimwise-models`.
//!
//! ## Architecture
//!
//! The generator uses a three-stage pipeline:
//! 1. **Parser**: Extracts type information from StructureDefinition snapshots
//! 2. **IR (Intermediate Representation)**: Types with flattened backbone elements,
//!    choice elements and reference targets
//! 3. **Generators**: Source text from the IR
//!
//! ```
//! use claimwise_codegen::generators::rust::RustGenerator;
//! use claimwise_codegen::CodeGenerator;
//! use serde_json::json;
//!
//! let definition = json!({
//!     "resourceType": "StructureDefinition",
//!     "url": "http://example.org/StructureDefinition/Allowance",
//!     "name": "Allowance",
//!     "kind": "complex-type",
//!     "type": "Allowance",
//!     "derivation": "specialization",
//!     "snapshot": { "element": [
//!         { "path": "Allowance" },
//!         { "path": "Allowance.amount", "min": 1, "max": "1", "type": [{ "code": "Money" }] }
//!     ]}
//! });
//!
//! let codegen = CodeGenerator::from_definitions(&[definition]);
//! let output = codegen.generate(&RustGenerator::new_default()).unwrap();
//! assert!(output.modules["allowance.rs"].contains(r#"amount("amount"): one Money,"#));
//! ```

pub mod generators;
pub mod ir;
pub mod parser;
pub mod utils;

use std::path::Path;

use anyhow::{Context, Result};
use generators::rust::RustGenerator;
use generators::GeneratorConfig;
use ir::TypeRegistry;
use serde_json::Value;

/// Main entry point for code generation
pub struct CodeGenerator {
    registry: TypeRegistry,
}

impl CodeGenerator {
    /// Create a code generator from StructureDefinition (or Bundle) JSON values
    pub fn from_definitions(definitions: &[Value]) -> Self {
        Self {
            registry: parser::parse_definitions(definitions),
        }
    }

    /// Create a code generator from the `*.json` files of a directory
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let registry = parser::parse_dir(dir)?;
        Ok(Self { registry })
    }

    /// Get the type registry
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Generate code with the given generator
    pub fn generate<G: generators::Generator>(&self, generator: &G) -> Result<G::Output> {
        generator.generate(&self.registry)
    }
}

/// Convenience helper to run the Rust code generator over a directory of definitions.
///
/// Returns the number of generated modules.
pub fn generate_rust_from_dir(
    input_dir: &Path,
    output_dir: &Path,
    config: GeneratorConfig,
) -> Result<usize> {
    let codegen = CodeGenerator::from_dir(input_dir).context("building type registry")?;
    if codegen.registry().is_empty() {
        anyhow::bail!("no StructureDefinitions found in {}", input_dir.display());
    }

    let generator = RustGenerator::new(config);
    let output = codegen
        .generate(&generator)
        .context("running Rust generator")?;

    utils::write_modules(output_dir, &output.modules)?;

    Ok(output.modules.len())
}
