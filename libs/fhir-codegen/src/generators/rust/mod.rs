//! Rust code generator
//!
//! Emits one module per resource and complex datatype. Each module is a list
//! of `composite!` / `choice!` invocations, the same form the hand-written
//! models in `claimwise-models` use.

mod cycles;
mod types;

pub use types::{field_name, rust_type_name, variant_name};

use crate::generators::{Generator, GeneratorConfig};
use crate::ir::{TypeDefinition, TypeKind, TypeRegistry};
use anyhow::{Context, Result};
use heck::ToSnakeCase;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

/// Output of the Rust generator
#[derive(Debug)]
pub struct RustOutput {
    /// Generated modules indexed by file name
    pub modules: BTreeMap<String, String>,
}

/// Rust code generator
pub struct RustGenerator {
    config: GeneratorConfig,
}

impl RustGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn new_default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl Generator for RustGenerator {
    type Output = RustOutput;

    fn generate(&self, registry: &TypeRegistry) -> Result<Self::Output> {
        let mut modules = BTreeMap::new();

        let primitives = registry.primitive_types().len();
        if primitives > 0 {
            tracing::debug!(
                count = primitives,
                "skipping primitive types, provided by claimwise-models"
            );
        }

        let targets: Vec<&TypeDefinition> = registry
            .complex_types()
            .into_iter()
            .chain(registry.resource_types())
            .collect();

        let boxed = cycles::boxed_fields(&targets)?;

        for type_def in &targets {
            let code = self
                .generate_type_module(type_def, registry, &boxed)
                .with_context(|| format!("generating {}", type_def.name))?;
            modules.insert(format!("{}.rs", module_name(&type_def.name)), code);
            tracing::debug!(
                name = %type_def.name,
                backbones = type_def.backbone_elements.len(),
                "generated type"
            );
        }

        modules.insert("mod.rs".to_string(), self.generate_mod_rs(&targets));
        tracing::info!(modules = modules.len(), "generated Rust modules");

        Ok(RustOutput { modules })
    }
}

impl RustGenerator {
    /// Generate a complete module for a single type
    fn generate_type_module(
        &self,
        type_def: &TypeDefinition,
        registry: &TypeRegistry,
        boxed: &BTreeSet<String>,
    ) -> Result<String> {
        let generated = types::generate_type(type_def, &self.config, boxed)?;
        let mut code = String::new();

        let kind = match type_def.kind {
            TypeKind::Resource => "resource",
            _ => "datatype",
        };
        let _ = writeln!(code, "//! {} {}", type_def.name, kind);
        if let Some(url) = &type_def.url {
            let _ = writeln!(code, "//!\n//! Generated from {}", url);
        }
        code.push('\n');

        // complex types generated alongside are imported from their own module
        let generated_complex = registry.complex_types();
        let siblings: BTreeSet<String> = registry
            .get_dependencies(type_def)
            .into_iter()
            .filter(|code| generated_complex.iter().any(|t| &t.name == code))
            .map(|code| rust_type_name(&code))
            .collect();

        let (sibling, shared): (Vec<&str>, Vec<&str>) = generated
            .imports
            .iter()
            .map(String::as_str)
            .filter(|name| *name != type_def.name)
            .partition(|name| siblings.contains(*name));

        if !shared.is_empty() {
            let _ = writeln!(
                code,
                "use {}::{{{}}};",
                self.config.types_module(),
                shared.join(", ")
            );
        }
        for name in sibling {
            let _ = writeln!(code, "use super::{}::{};", module_name(name), name);
        }
        let macros = self.config.macros_crate();
        if generated.has_choices {
            let _ = writeln!(code, "use {}::{{choice, composite}};", macros);
        } else {
            let _ = writeln!(code, "use {}::composite;", macros);
        }
        code.push('\n');
        code.push_str(&generated.code);

        Ok(code)
    }

    fn generate_mod_rs(&self, targets: &[&TypeDefinition]) -> String {
        let mut code = String::from("//! Generated models\n\n");

        let mut names: Vec<&str> = targets.iter().map(|t| t.name.as_str()).collect();
        names.sort_unstable();

        for name in &names {
            let _ = writeln!(code, "pub mod {};", module_name(name));
        }
        code.push('\n');
        for name in &names {
            let _ = writeln!(code, "pub use {}::{};", module_name(name), name);
        }

        code
    }
}

/// Convert a type name to a module name (snake_case)
fn module_name(type_name: &str) -> String {
    type_name.to_snake_case()
}
