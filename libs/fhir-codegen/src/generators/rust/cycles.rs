//! Fields that close a cycle of by-value types
//!
//! A singular field holds its value inline, so two types that contain each
//! other (`Identifier.assigner` and `Reference.identifier`) would have
//! infinite size. One field of every such cycle is stored behind a `Box`.

use super::types::{concrete_code, BACKBONE_INHERITED};
use crate::ir::{Property, TypeDefinition, TypeKind};
use anyhow::{bail, Result};
use std::collections::{BTreeSet, VecDeque};

/// A singular field of `from` holding a value of `to`
struct Edge {
    from: String,
    to: String,
    path: String,
    is_choice: bool,
}

/// Paths of the fields to box.
///
/// Structs are taken in name order; every field that leads back into the
/// current struct from a struct it reaches is boxed. Structs are keyed by type
/// name, backbones by element path.
pub fn boxed_fields(types: &[&TypeDefinition]) -> Result<BTreeSet<String>> {
    let complex: BTreeSet<&str> = types
        .iter()
        .filter(|t| t.kind == TypeKind::ComplexType)
        .map(|t| t.name.as_str())
        .collect();

    let mut edges = Vec::new();
    for type_def in types {
        let inherited = type_def.kind.inherited_elements();
        collect_edges(
            type_def,
            &type_def.name,
            &type_def.properties,
            inherited,
            &complex,
            &mut edges,
        );
        for backbone in &type_def.backbone_elements {
            collect_edges(
                type_def,
                &backbone.path,
                &backbone.properties,
                BACKBONE_INHERITED,
                &complex,
                &mut edges,
            );
        }
    }

    let nodes: BTreeSet<&str> = edges.iter().map(|e| e.from.as_str()).collect();
    let mut boxed = BTreeSet::new();
    for node in nodes {
        let reachable = reachable_from(node, &edges, &boxed);
        let closing = edges.iter().filter(|e| {
            e.to == node
                && (e.from == node || reachable.contains(e.from.as_str()))
                && !boxed.contains(&e.path)
        });
        let mut closing_paths = Vec::new();
        for edge in closing {
            if edge.is_choice {
                bail!("recursive choice element {} is not supported", edge.path);
            }
            closing_paths.push(edge.path.clone());
        }
        for path in closing_paths {
            tracing::debug!(path = %path, "boxing field that closes a type cycle");
            boxed.insert(path);
        }
    }

    Ok(boxed)
}

fn collect_edges(
    type_def: &TypeDefinition,
    from: &str,
    properties: &[Property],
    inherited: &[&str],
    complex: &BTreeSet<&str>,
    edges: &mut Vec<Edge>,
) {
    let singular = properties
        .iter()
        .filter(|p| !inherited.contains(&p.name.as_str()) && !p.cardinality.is_array());

    for property in singular {
        let targets: Vec<String> = if let Some(target) = &property.content_reference {
            type_def.backbone_at(target).map(|b| b.path.clone()).into_iter().collect()
        } else if type_def.backbone_at(&property.path).is_some() {
            vec![property.path.clone()]
        } else {
            property
                .types
                .iter()
                .map(concrete_code)
                .filter(|code| complex.contains(code))
                .map(String::from)
                .collect()
        };

        let is_choice = property.is_choice || property.types.len() > 1;
        edges.extend(targets.into_iter().map(|to| Edge {
            from: from.to_string(),
            to,
            path: property.path.clone(),
            is_choice,
        }));
    }
}

/// Structs reachable from `start` in one or more steps over unboxed fields
fn reachable_from<'a>(
    start: &str,
    edges: &'a [Edge],
    boxed: &BTreeSet<String>,
) -> BTreeSet<&'a str> {
    let mut reached = BTreeSet::new();
    let mut queue = VecDeque::from([start.to_string()]);
    while let Some(node) = queue.pop_front() {
        for edge in edges.iter().filter(|e| e.from == node && !boxed.contains(&e.path)) {
            if reached.insert(edge.to.as_str()) {
                queue.push_back(edge.to.clone());
            }
        }
    }
    reached
}
