//! Parser for FHIR StructureDefinitions
//!
//! Extracts type information from StructureDefinition snapshots and builds
//! an intermediate representation (IR) suitable for code generation.

use crate::ir::{
    BackboneElement, Binding, Cardinality, Property, PropertyType, TypeDefinition, TypeKind,
    TypeRegistry, type_name_from_url,
};
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Structural problems in a StructureDefinition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("StructureDefinition missing '{0}'")]
    MissingField(&'static str),
    #[error("unknown StructureDefinition kind '{0}'")]
    UnknownKind(String),
    #[error("element {index} missing 'path'")]
    MissingPath { index: usize },
    #[error("element '{path}' is outside type '{root}'")]
    ForeignPath { path: String, root: String },
    #[error("element '{0}' has a type without 'code'")]
    MissingTypeCode(String),
}

/// Parse StructureDefinitions (or Bundles of them) into a registry.
///
/// Other resources are skipped. A definition that fails to parse is logged
/// and skipped.
pub fn parse_definitions<'a>(values: impl IntoIterator<Item = &'a Value>) -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    for value in values {
        collect(value, &mut registry);
    }
    tracing::debug!(types = registry.len(), "parsed structure definitions");
    registry
}

fn collect(value: &Value, registry: &mut TypeRegistry) {
    match value.get("resourceType").and_then(Value::as_str) {
        Some("StructureDefinition") => match parse_structure_definition(value) {
            Ok(type_def) => {
                let id = type_def
                    .url
                    .clone()
                    .unwrap_or_else(|| type_def.name.clone());
                registry.add_type(id, type_def);
            }
            Err(error) => {
                let name = value.get("name").and_then(Value::as_str).unwrap_or("?");
                tracing::warn!(name, error = %error, "skipping StructureDefinition");
            }
        },
        Some("Bundle") => {
            let entries = value
                .get("entry")
                .and_then(Value::as_array)
                .into_iter()
                .flatten();
            for entry in entries {
                if let Some(resource) = entry.get("resource") {
                    collect(resource, registry);
                }
            }
        }
        other => {
            tracing::trace!(resource_type = ?other, "ignoring non-StructureDefinition resource");
        }
    }
}

/// Read every `*.json` file in `dir` and parse the definitions it holds.
pub fn parse_dir(dir: &Path) -> Result<TypeRegistry> {
    let mut paths: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut values = Vec::with_capacity(paths.len());
    for path in &paths {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON in {}", path.display()))?;
        values.push(value);
    }
    tracing::info!(files = paths.len(), dir = %dir.display(), "loaded definition files");

    Ok(parse_definitions(&values))
}

/// Parse a single StructureDefinition into a TypeDefinition
pub fn parse_structure_definition(sd: &Value) -> Result<TypeDefinition, ParseError> {
    let name = str_field(sd, "name")
        .ok_or(ParseError::MissingField("name"))?
        .to_string();
    let root = str_field(sd, "type").unwrap_or(&name).to_string();

    let kind_code = str_field(sd, "kind").ok_or(ParseError::MissingField("kind"))?;
    let kind =
        TypeKind::from_code(kind_code)
            .ok_or_else(|| ParseError::UnknownKind(kind_code.to_string()))?;

    let elements = sd
        .get("snapshot")
        .and_then(|s| s.get("element"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let (properties, backbone_elements) = parse_elements(elements, &root)?;

    Ok(TypeDefinition {
        name,
        url: str_field(sd, "url").map(String::from),
        description: str_field(sd, "description").map(String::from),
        kind,
        base_type: str_field(sd, "baseDefinition").map(|url| type_name_from_url(url).to_string()),
        properties,
        is_abstract: sd.get("abstract").and_then(Value::as_bool).unwrap_or(false),
        is_profile: str_field(sd, "derivation") == Some("constraint"),
        backbone_elements,
    })
}

/// Split snapshot elements into the root's properties and its backbone elements.
///
/// An element is a backbone when other elements are nested under its path.
/// Slices and prohibited elements are dropped.
fn parse_elements(
    elements: &[Value],
    root: &str,
) -> Result<(Vec<Property>, Vec<BackboneElement>), ParseError> {
    let mut paths = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        let path = str_field(element, "path").ok_or(ParseError::MissingPath { index })?;
        if path != root && !path.starts_with(&format!("{}.", root)) {
            return Err(ParseError::ForeignPath {
                path: path.to_string(),
                root: root.to_string(),
            });
        }
        paths.push(path);
    }

    let parents: HashSet<&str> = paths.iter().filter_map(|p| parent_path(p)).collect();

    let mut properties = Vec::new();
    let mut backbones: Vec<BackboneElement> = Vec::new();
    let mut backbone_index: HashMap<&str, usize> = HashMap::new();

    for (element, path) in elements.iter().zip(&paths) {
        if *path == root || element.get("sliceName").is_some() {
            continue;
        }
        let property = parse_element(element, path)?;
        if property.cardinality.is_prohibited() {
            continue;
        }

        if parents.contains(path) {
            let (name, type_name) = BackboneElement::names_for(root, path);
            backbone_index.insert(*path, backbones.len());
            backbones.push(BackboneElement {
                name,
                path: path.to_string(),
                type_name,
                description: property.description.clone(),
                properties: Vec::new(),
            });
        }

        match parent_path(path) {
            Some(parent) if parent == root => properties.push(property),
            Some(parent) => match backbone_index.get(parent) {
                Some(&index) => backbones[index].properties.push(property),
                // children of a dropped (sliced or prohibited) element
                None => tracing::trace!(path, "skipping element without a backbone parent"),
            },
            None => {}
        }
    }

    Ok((properties, backbones))
}

fn parent_path(path: &str) -> Option<&str> {
    path.rsplit_once('.').map(|(parent, _)| parent)
}

/// Parse a single element into a Property
fn parse_element(element: &Value, path: &str) -> Result<Property, ParseError> {
    let last = path.rsplit('.').next().unwrap_or(path);
    let is_choice = last.ends_with("[x]");
    let name = last.trim_end_matches("[x]").to_string();

    let description = str_field(element, "short")
        .or_else(|| str_field(element, "definition"))
        .map(String::from);

    let min = element.get("min").and_then(Value::as_u64).unwrap_or(0) as u32;
    let max = match str_field(element, "max") {
        Some("*") => None,
        Some(n) => n.parse().ok(),
        None => Some(1),
    };

    let types = element
        .get("type")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .map(|t| parse_element_type(t, path))
        .collect::<Result<Vec<_>, _>>()?;

    let binding = element.get("binding").and_then(|b| {
        str_field(b, "strength").map(|strength| Binding {
            strength: strength.to_string(),
            value_set: str_field(b, "valueSet").map(String::from),
        })
    });

    let content_reference = str_field(element, "contentReference")
        .map(|r| r.rsplit_once('#').map_or(r, |(_, path)| path).to_string());

    Ok(Property {
        name,
        path: path.to_string(),
        description,
        types,
        cardinality: Cardinality::new(min, max),
        is_choice,
        is_modifier: element
            .get("isModifier")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        binding,
        content_reference,
    })
}

/// Parse one `type` entry of an element
fn parse_element_type(type_spec: &Value, path: &str) -> Result<PropertyType, ParseError> {
    let code = str_field(type_spec, "code")
        .ok_or_else(|| ParseError::MissingTypeCode(path.to_string()))?
        .to_string();

    let profile = type_spec
        .get("profile")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
        .and_then(Value::as_str)
        .map(String::from);

    let target_profiles = type_spec
        .get("targetProfile")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(|v| v.as_str().map(String::from)).collect())
        .unwrap_or_default();

    Ok(PropertyType {
        code,
        profile,
        target_profiles,
    })
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}
