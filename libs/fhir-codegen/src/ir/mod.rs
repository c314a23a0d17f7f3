//! Intermediate Representation (IR)
//!
//! Language-agnostic representation of FHIR types extracted from StructureDefinitions.
//! Nested backbone elements are flattened onto their owning type, so a generator
//! only ever sees one level of structure per type.

use heck::ToUpperCamelCase;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Registry of all types extracted from a set of StructureDefinitions
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    /// All types indexed by their canonical URL or name
    types: HashMap<String, TypeDefinition>,
    /// Mapping from type name to canonical identifier
    name_index: HashMap<String, String>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type to the registry, replacing an earlier definition with the same id
    pub fn add_type(&mut self, id: String, type_def: TypeDefinition) {
        self.name_index.insert(type_def.name.clone(), id.clone());
        self.types.insert(id, type_def);
    }

    /// Get a type by its canonical identifier
    pub fn get_type(&self, id: &str) -> Option<&TypeDefinition> {
        self.types.get(id)
    }

    /// Get a type by its name
    pub fn get_type_by_name(&self, name: &str) -> Option<&TypeDefinition> {
        self.name_index.get(name).and_then(|id| self.types.get(id))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over all types, sorted by name
    pub fn types(&self) -> Vec<&TypeDefinition> {
        let mut types: Vec<_> = self.types.values().collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        types
    }

    /// Concrete resource specializations, sorted by name
    pub fn resource_types(&self) -> Vec<&TypeDefinition> {
        self.generatable(TypeKind::Resource)
    }

    /// Concrete complex datatype specializations, sorted by name
    pub fn complex_types(&self) -> Vec<&TypeDefinition> {
        self.generatable(TypeKind::ComplexType)
    }

    /// Get all primitive types
    pub fn primitive_types(&self) -> Vec<&TypeDefinition> {
        self.types()
            .into_iter()
            .filter(|t| t.kind == TypeKind::PrimitiveType)
            .collect()
    }

    fn generatable(&self, kind: TypeKind) -> Vec<&TypeDefinition> {
        self.types()
            .into_iter()
            .filter(|t| t.kind == kind && !t.is_abstract && !t.is_profile)
            .collect()
    }

    /// FHIR type codes a type depends on, excluding its own backbone elements
    pub fn get_dependencies(&self, type_def: &TypeDefinition) -> BTreeSet<String> {
        type_def
            .properties
            .iter()
            .chain(type_def.backbone_elements.iter().flat_map(|b| b.properties.iter()))
            .flat_map(|property| property.types.iter())
            .map(|property_type| property_type.code.clone())
            .filter(|code| !is_structural_type(code))
            .collect()
    }
}

/// Types that only describe nesting and never appear as a field type
pub fn is_structural_type(type_name: &str) -> bool {
    matches!(type_name, "Element" | "BackboneElement" | "Resource")
}

/// Check if a type is a FHIR primitive
pub fn is_primitive_type(type_name: &str) -> bool {
    matches!(
        type_name,
        "boolean"
            | "integer"
            | "unsignedInt"
            | "positiveInt"
            | "integer64"
            | "decimal"
            | "string"
            | "code"
            | "id"
            | "markdown"
            | "uri"
            | "url"
            | "canonical"
            | "oid"
            | "uuid"
            | "date"
            | "dateTime"
            | "instant"
            | "time"
            | "base64Binary"
            | "xhtml"
    )
}

/// A single type definition extracted from a StructureDefinition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// The type name (e.g., "ExplanationOfBenefit", "Money", "string")
    pub name: String,
    /// Canonical URL if available
    pub url: Option<String>,
    pub description: Option<String>,
    pub kind: TypeKind,
    /// Base type this extends (if any)
    pub base_type: Option<String>,
    /// Elements declared directly on this type, in snapshot order
    pub properties: Vec<Property>,
    pub is_abstract: bool,
    /// `derivation = constraint`: a profile on another type rather than a new type
    pub is_profile: bool,
    /// Backbone elements at any depth, in snapshot order
    pub backbone_elements: Vec<BackboneElement>,
}

impl TypeDefinition {
    /// Find a backbone element by the element path that defines it
    pub fn backbone_at(&self, path: &str) -> Option<&BackboneElement> {
        self.backbone_elements.iter().find(|b| b.path == path)
    }
}

/// Kind of FHIR type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    /// FHIR Resource (e.g., ExplanationOfBenefit, Coverage)
    Resource,
    /// Complex datatype (e.g., Money, Reference, Coding)
    ComplexType,
    /// Primitive type (e.g., string, integer, boolean)
    PrimitiveType,
    /// Logical model; never generated
    Logical,
}

impl TypeKind {
    /// Parse the `StructureDefinition.kind` code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "resource" => Some(TypeKind::Resource),
            "complex-type" => Some(TypeKind::ComplexType),
            "primitive-type" => Some(TypeKind::PrimitiveType),
            "logical" => Some(TypeKind::Logical),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            TypeKind::Resource => "resource",
            TypeKind::ComplexType => "complex-type",
            TypeKind::PrimitiveType => "primitive-type",
            TypeKind::Logical => "logical",
        }
    }

    /// Elements every type of this kind inherits from its base
    pub fn inherited_elements(&self) -> &'static [&'static str] {
        match self {
            TypeKind::Resource => &[
                "id",
                "meta",
                "implicitRules",
                "language",
                "text",
                "contained",
                "extension",
                "modifierExtension",
            ],
            _ => &["id", "extension"],
        }
    }
}

/// A property/field within a type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    /// Property name without any `[x]` suffix (e.g., "diagnosis", "serviced")
    pub name: String,
    /// Path in the FHIR element tree (e.g., "ExplanationOfBenefit.item.serviced[x]")
    pub path: String,
    pub description: Option<String>,
    /// The type(s) this property can have
    pub types: Vec<PropertyType>,
    pub cardinality: Cardinality,
    /// Whether the element was declared as `name[x]`
    pub is_choice: bool,
    /// Whether this property is a modifier element
    pub is_modifier: bool,
    pub binding: Option<Binding>,
    /// Path of the element whose definition this one reuses (`contentReference`)
    pub content_reference: Option<String>,
}

impl Property {
    /// The single type reference, when the property has exactly one
    pub fn single_type(&self) -> Option<&PropertyType> {
        match self.types.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Resource types permitted by every `Reference` type of this property.
    ///
    /// Empty when any type allows all resources.
    pub fn reference_targets(&self) -> Vec<String> {
        let references: Vec<_> = self.types.iter().filter(|t| t.code == "Reference").collect();
        let mut targets = Vec::new();
        for reference in references {
            let names = reference.target_names();
            if names.is_empty() || names.iter().any(|n| n == "Resource") {
                return Vec::new();
            }
            for name in names {
                if !targets.contains(&name) {
                    targets.push(name);
                }
            }
        }
        targets
    }
}

/// Type reference for a property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyType {
    /// Type code (e.g., "string", "CodeableConcept", "Reference")
    pub code: String,
    /// Profile URL the type is constrained to
    pub profile: Option<String>,
    /// Target profile URLs (for Reference and canonical types)
    pub target_profiles: Vec<String>,
}

impl PropertyType {
    /// Name of the profiled type the code is constrained to, when it differs from the code
    /// (e.g. "SimpleQuantity" for a `Quantity` with that profile)
    pub fn profile_name(&self) -> Option<&str> {
        self.profile
            .as_deref()
            .map(type_name_from_url)
            .filter(|name| *name != self.code)
    }

    /// Resource type names from the target profiles
    pub fn target_names(&self) -> Vec<String> {
        self.target_profiles
            .iter()
            .map(|url| type_name_from_url(url).to_string())
            .collect()
    }
}

/// A terminology binding on a coded element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// required | extensible | preferred | example
    pub strength: String,
    pub value_set: Option<String>,
}

impl Binding {
    pub fn is_required(&self) -> bool {
        self.strength == "required"
    }
}

/// Cardinality constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cardinality {
    pub min: u32,
    /// `None` is unbounded (`*`)
    pub max: Option<u32>,
}

impl Cardinality {
    pub fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    pub fn is_array(&self) -> bool {
        self.max.map_or(true, |max| max > 1)
    }

    pub fn is_optional(&self) -> bool {
        self.min == 0
    }

    pub fn is_required(&self) -> bool {
        self.min > 0
    }

    /// Whether the element was removed from use (`max = 0`)
    pub fn is_prohibited(&self) -> bool {
        self.max == Some(0)
    }
}

/// A backbone element, flattened out of its owning type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackboneElement {
    /// Flattened name, "ItemDetailSubDetail" for `ExplanationOfBenefit.item.detail.subDetail`
    pub name: String,
    /// Element path that defines the backbone
    pub path: String,
    /// Dotted type name with capitalized segments (e.g., "ExplanationOfBenefit.Item.Detail")
    pub type_name: String,
    pub description: Option<String>,
    pub properties: Vec<Property>,
}

impl BackboneElement {
    /// Name and type name for the backbone defined at `path` under `root`
    pub fn names_for(root: &str, path: &str) -> (String, String) {
        let segments: Vec<String> = path
            .strip_prefix(root)
            .unwrap_or(path)
            .split('.')
            .filter(|s| !s.is_empty())
            .map(|s| s.trim_end_matches("[x]").to_upper_camel_case())
            .collect();
        let name = segments.concat();
        let type_name = std::iter::once(root.to_string())
            .chain(segments)
            .collect::<Vec<_>>()
            .join(".");
        (name, type_name)
    }
}

/// Extract the type name from a canonical URL
/// E.g., "http://hl7.org/fhir/StructureDefinition/Coverage" -> "Coverage"
pub fn type_name_from_url(url: &str) -> &str {
    let url = url.split('|').next().unwrap_or(url);
    url.rsplit('/').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(targets: &[&str]) -> PropertyType {
        PropertyType {
            code: "Reference".to_string(),
            profile: None,
            target_profiles: targets
                .iter()
                .map(|t| format!("http://hl7.org/fhir/StructureDefinition/{}", t))
                .collect(),
        }
    }

    fn property(types: Vec<PropertyType>) -> Property {
        Property {
            name: "provider".to_string(),
            path: "ExplanationOfBenefit.provider".to_string(),
            description: None,
            types,
            cardinality: Cardinality::new(1, Some(1)),
            is_choice: false,
            is_modifier: false,
            binding: None,
            content_reference: None,
        }
    }

    #[test]
    fn backbone_names_are_flattened() {
        assert_eq!(
            BackboneElement::names_for(
                "ExplanationOfBenefit",
                "ExplanationOfBenefit.item.detail.subDetail"
            ),
            (
                "ItemDetailSubDetail".to_string(),
                "ExplanationOfBenefit.Item.Detail.SubDetail".to_string()
            )
        );
    }

    #[test]
    fn reference_targets_come_from_target_profiles() {
        let p = property(vec![reference(&["Practitioner", "Organization"])]);
        assert_eq!(p.reference_targets(), vec!["Practitioner", "Organization"]);

        let any = property(vec![reference(&["Resource"])]);
        assert!(any.reference_targets().is_empty());
    }

    #[test]
    fn profiles_name_a_constrained_type() {
        let quantity = PropertyType {
            code: "Quantity".to_string(),
            profile: Some("http://hl7.org/fhir/StructureDefinition/SimpleQuantity".to_string()),
            target_profiles: Vec::new(),
        };
        assert_eq!(quantity.profile_name(), Some("SimpleQuantity"));

        let same = PropertyType {
            code: "Money".to_string(),
            profile: Some("http://hl7.org/fhir/StructureDefinition/Money|4.0.1".to_string()),
            target_profiles: Vec::new(),
        };
        assert_eq!(same.profile_name(), None);
    }

    #[test]
    fn cardinality_shapes() {
        assert!(Cardinality::new(0, None).is_array());
        assert!(!Cardinality::new(1, Some(1)).is_array());
        assert!(Cardinality::new(0, Some(0)).is_prohibited());
    }

    #[test]
    fn type_names_ignore_versions() {
        assert_eq!(
            type_name_from_url("http://hl7.org/fhir/StructureDefinition/Coverage|4.0.1"),
            "Coverage"
        );
        assert_eq!(type_name_from_url("Coverage"), "Coverage");
    }
}
