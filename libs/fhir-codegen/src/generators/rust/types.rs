//! Emits `composite!` and `choice!` invocations for one type

use crate::generators::GeneratorConfig;
use crate::ir::{Property, PropertyType, TypeDefinition, TypeKind};
use anyhow::{anyhow, bail, Context, Result};
use claimwise_models::resource_type::is_resource_type;
use claimwise_models::types::{bound_code_type, Choice, DataType};
use heck::{ToSnakeCase, ToUpperCamelCase};
use std::collections::BTreeSet;
use std::fmt::Write;

/// Elements a backbone inherits from `BackboneElement`
pub(crate) const BACKBONE_INHERITED: &[&str] = &["id", "extension", "modifierExtension"];

/// Modeled types that cannot appear in a choice, so are not `DataType` variants
const NON_CHOICE_TYPES: &[&str] = &["xhtml", "Extension", "Meta", "Narrative"];

/// Source text and imports for one type and its backbone elements
pub struct GeneratedType {
    pub code: String,
    /// Datatype names the code refers to
    pub imports: BTreeSet<String>,
    /// Whether any `choice!` enum was emitted
    pub has_choices: bool,
}

/// Generate the invocations for a resource or complex type.
///
/// Fields whose path is in `boxed` are stored behind a `Box`.
pub fn generate_type(
    type_def: &TypeDefinition,
    config: &GeneratorConfig,
    boxed: &BTreeSet<String>,
) -> Result<GeneratedType> {
    let mut emitter = Emitter {
        type_def,
        config,
        boxed,
        imports: BTreeSet::new(),
        has_choices: false,
        code: String::new(),
    };

    let (kind, inherited) = match type_def.kind {
        TypeKind::Resource => ("resource", type_def.kind.inherited_elements()),
        TypeKind::ComplexType => ("element", type_def.kind.inherited_elements()),
        other => bail!("{} is a {} and cannot be generated", type_def.name, other.as_code()),
    };

    emitter.composite(
        kind,
        &type_def.name,
        &type_def.name,
        type_def.description.as_deref(),
        &type_def.properties,
        inherited,
    )?;
    for backbone in &type_def.backbone_elements {
        emitter
            .composite(
                "backbone",
                &backbone.name,
                &backbone.type_name,
                backbone.description.as_deref(),
                &backbone.properties,
                BACKBONE_INHERITED,
            )
            .with_context(|| format!("generating backbone {}", backbone.path))?;
    }

    Ok(GeneratedType {
        code: emitter.code,
        imports: emitter.imports,
        has_choices: emitter.has_choices,
    })
}

struct Emitter<'a> {
    type_def: &'a TypeDefinition,
    config: &'a GeneratorConfig,
    boxed: &'a BTreeSet<String>,
    imports: BTreeSet<String>,
    has_choices: bool,
    code: String,
}

impl Emitter<'_> {
    fn composite(
        &mut self,
        kind: &str,
        name: &str,
        type_name: &str,
        description: Option<&str>,
        properties: &[Property],
        inherited: &[&str],
    ) -> Result<()> {
        let own: Vec<&Property> = properties
            .iter()
            .filter(|p| !inherited.contains(&p.name.as_str()))
            .collect();

        let mut fields = String::new();
        for property in &own {
            let line = self
                .field(property, name)
                .with_context(|| format!("generating field {}", property.path))?;
            fields.push_str(&line);
        }

        if !self.code.is_empty() {
            self.code.push('\n');
        }
        self.code.push_str("composite! {\n");
        if self.config.generate_docs {
            for line in description.unwrap_or(name).lines() {
                push_doc(&mut self.code, "    ", line);
            }
        }
        let _ = writeln!(self.code, "    {} {}(\"{}\") {{", kind, name, type_name);
        self.code.push_str(&fields);
        self.code.push_str("    }\n}\n");
        Ok(())
    }

    /// One field line, emitting the choice enum first when the field needs one
    fn field(&mut self, property: &Property, owner: &str) -> Result<String> {
        let mut line = String::new();
        if self.config.generate_docs {
            if let Some(description) = &property.description {
                push_doc(&mut line, "        ", first_line(description));
            }
            if property.is_modifier {
                line.push_str("        /// **Modifier element**\n");
            }
        }

        let cardinality = property.cardinality;
        let (card, ty) = if property.is_choice || property.types.len() > 1 {
            if cardinality.is_array() {
                bail!("repeating choice elements are not supported");
            }
            let enum_name = format!("{}{}", owner, property.name.to_upper_camel_case());
            self.choice(&enum_name, property)?;
            let card = if cardinality.is_required() { "choice" } else { "opt_choice" };
            (card, enum_name)
        } else {
            let card = match (cardinality.is_array(), cardinality.is_required()) {
                (true, true) => "some",
                (true, false) => "many",
                (false, true) => "one",
                (false, false) => "opt",
            };
            let ty = self.field_type(property)?;
            if self.boxed.contains(&property.path) {
                (card, format!("Box<{}>", ty))
            } else {
                (card, ty)
            }
        };

        let _ = write!(
            line,
            "        {}(\"{}\"): {} {}",
            field_name(&property.name),
            property.name,
            card,
            ty
        );

        let targets = property.reference_targets();
        if !targets.is_empty() {
            for target in targets.iter().filter(|t| !is_resource_type(t)) {
                tracing::warn!(
                    path = %property.path,
                    target = %target,
                    "reference target is not a known resource type"
                );
            }
            let quoted: Vec<String> = targets.iter().map(|t| format!("\"{}\"", t)).collect();
            let _ = write!(line, " [refs {}]", quoted.join(", "));
        }
        line.push_str(",\n");
        Ok(line)
    }

    fn choice(&mut self, enum_name: &str, property: &Property) -> Result<()> {
        if property.types.is_empty() {
            bail!("choice element has no types");
        }
        if !self.code.is_empty() {
            self.code.push('\n');
        }
        self.code.push_str("choice! {\n");
        if self.config.generate_docs {
            let _ = writeln!(self.code, "    /// `{}`", property.path);
        }
        let _ = writeln!(self.code, "    pub enum {} {{", enum_name);
        for property_type in &property.types {
            let code = concrete_code(property_type);
            if !<DataType as Choice>::TYPE_NAMES.contains(&code) {
                tracing::warn!(
                    path = %property.path,
                    code,
                    "choice type is not a modeled datatype"
                );
            }
            let ty = self.datatype(code);
            let _ = writeln!(self.code, "        {}({}),", variant_name(code), ty);
        }
        self.code.push_str("    }\n}\n");
        self.has_choices = true;
        Ok(())
    }

    fn field_type(&mut self, property: &Property) -> Result<String> {
        if let Some(target) = &property.content_reference {
            return self
                .type_def
                .backbone_at(target)
                .map(|b| b.name.clone())
                .ok_or_else(|| anyhow!("content reference to unknown element {}", target));
        }
        if let Some(backbone) = self.type_def.backbone_at(&property.path) {
            return Ok(backbone.name.clone());
        }

        let property_type = property
            .single_type()
            .ok_or_else(|| anyhow!("element has no type"))?;

        if property_type.code == "code" {
            let bound = property
                .binding
                .as_ref()
                .filter(|b| b.is_required())
                .and_then(|b| b.value_set.as_deref())
                .and_then(bound_code_type);
            if let Some(type_name) = bound {
                self.imports.insert(type_name.to_string());
                return Ok(type_name.to_string());
            }
        }

        let code = concrete_code(property_type);
        if !is_modeled(code) {
            tracing::warn!(path = %property.path, code, "element type is not a modeled datatype");
        }
        Ok(self.datatype(code))
    }

    fn datatype(&mut self, code: &str) -> String {
        let name = rust_type_name(code);
        self.imports.insert(name.clone());
        name
    }
}

/// The type code to emit: the profiled type when it is modeled, else the base code
pub(crate) fn concrete_code(property_type: &PropertyType) -> &str {
    match property_type.profile_name() {
        Some(profile) if is_modeled(profile) => profile,
        _ => property_type.code.as_str(),
    }
}

fn is_modeled(code: &str) -> bool {
    <DataType as Choice>::TYPE_NAMES.contains(&code) || NON_CHOICE_TYPES.contains(&code)
}

/// Rust type for a FHIR type code
pub fn rust_type_name(code: &str) -> String {
    match code {
        "string" => "FhirString".to_string(),
        other => other.to_upper_camel_case(),
    }
}

/// `DataType` variant for a FHIR type code
pub fn variant_name(code: &str) -> String {
    code.to_upper_camel_case()
}

/// Field identifier for an element name; keywords get a trailing underscore
pub fn field_name(name: &str) -> String {
    let snake = name.to_snake_case();
    if is_rust_keyword(&snake) {
        format!("{}_", snake)
    } else {
        snake
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or(text).trim()
}

fn push_doc(out: &mut String, indent: &str, text: &str) {
    let text = text.trim_end();
    if text.is_empty() {
        let _ = writeln!(out, "{}///", indent);
    } else {
        let _ = writeln!(out, "{}/// {}", indent, text);
    }
}

/// Check if a string is a Rust keyword
fn is_rust_keyword(s: &str) -> bool {
    matches!(
        s,
        "as" | "break"
            | "const"
            | "continue"
            | "crate"
            | "else"
            | "enum"
            | "extern"
            | "false"
            | "fn"
            | "for"
            | "if"
            | "impl"
            | "in"
            | "let"
            | "loop"
            | "match"
            | "mod"
            | "move"
            | "mut"
            | "pub"
            | "ref"
            | "return"
            | "self"
            | "static"
            | "struct"
            | "super"
            | "trait"
            | "true"
            | "type"
            | "unsafe"
            | "use"
            | "where"
            | "while"
            | "async"
            | "await"
            | "dyn"
            | "abstract"
            | "become"
            | "box"
            | "do"
            | "final"
            | "macro"
            | "override"
            | "priv"
            | "typeof"
            | "unsized"
            | "virtual"
            | "yield"
            | "try"
    )
}
