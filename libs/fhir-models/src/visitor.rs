//! Depth-first traversal of model trees
//!
//! Every model type implements [`Visitable`]. A walk follows the same protocol
//! at each node:
//!
//! ```text
//! if visitor.pre_visit(node) {
//!     visitor.visit_start(name, index, node);
//!     if visitor.visit(name, index, node) {
//!         // children, in schema order
//!     }
//!     visitor.visit_end(name, index, node);
//!     visitor.post_visit(node);
//! }
//! ```
//!
//! Repeating elements are bracketed by `visit_list_start`/`visit_list_end`, and
//! each entry is visited with its index. Primitive leaf values are reported
//! through [`Visitor::visit_value`].

use crate::types::{FhirDate, FhirDateTime};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use std::any::Any;
use std::fmt::Debug;

/// A node in a model tree.
pub trait Visitable: Any + Debug + Send + Sync {
    /// FHIR type name, e.g. `"Reference"` or `"ExplanationOfBenefit.Item"`.
    fn type_name(&self) -> &'static str;

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor);

    fn as_any(&self) -> &dyn Any;

    /// Whether this node is a resource rather than an element.
    fn is_resource(&self) -> bool {
        false
    }

    /// Walk this node as the root of a tree, named after its own type.
    fn accept_root(&self, visitor: &mut dyn Visitor) {
        self.accept(self.type_name(), None, visitor);
    }
}

impl<T: Visitable> Visitable for Box<T> {
    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        (**self).accept(element_name, element_index, visitor)
    }

    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }

    fn is_resource(&self) -> bool {
        (**self).is_resource()
    }
}

impl dyn Visitable {
    pub fn downcast_ref<T: Visitable>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Visitable>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Borrowed view of a primitive leaf value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive<'a> {
    Boolean(bool),
    Integer(i32),
    Decimal(&'a Decimal),
    String(&'a str),
    Date(&'a FhirDate),
    DateTime(&'a FhirDateTime),
    Instant(&'a DateTime<FixedOffset>),
    Binary(&'a [u8]),
}

/// Conversion of a primitive's value into its visitor view.
pub trait AsPrimitive {
    fn as_primitive(&self) -> Primitive<'_>;
}

impl AsPrimitive for bool {
    fn as_primitive(&self) -> Primitive<'_> {
        Primitive::Boolean(*self)
    }
}

impl AsPrimitive for i32 {
    fn as_primitive(&self) -> Primitive<'_> {
        Primitive::Integer(*self)
    }
}

impl AsPrimitive for Decimal {
    fn as_primitive(&self) -> Primitive<'_> {
        Primitive::Decimal(self)
    }
}

impl AsPrimitive for String {
    fn as_primitive(&self) -> Primitive<'_> {
        Primitive::String(self)
    }
}

impl AsPrimitive for FhirDate {
    fn as_primitive(&self) -> Primitive<'_> {
        Primitive::Date(self)
    }
}

impl AsPrimitive for FhirDateTime {
    fn as_primitive(&self) -> Primitive<'_> {
        Primitive::DateTime(self)
    }
}

impl AsPrimitive for DateTime<FixedOffset> {
    fn as_primitive(&self) -> Primitive<'_> {
        Primitive::Instant(self)
    }
}

impl AsPrimitive for Vec<u8> {
    fn as_primitive(&self) -> Primitive<'_> {
        Primitive::Binary(self)
    }
}

/// Traversal hooks. Every hook has a default that visits everything.
#[allow(unused_variables)]
pub trait Visitor {
    /// Return `false` to skip `node` entirely.
    fn pre_visit(&mut self, node: &dyn Visitable) -> bool {
        true
    }

    fn post_visit(&mut self, node: &dyn Visitable) {}

    fn visit_start(
        &mut self,
        element_name: &str,
        element_index: Option<usize>,
        node: &dyn Visitable,
    ) {
    }

    fn visit_end(
        &mut self,
        element_name: &str,
        element_index: Option<usize>,
        node: &dyn Visitable,
    ) {
    }

    fn visit_list_start(&mut self, element_name: &str, len: usize) {}

    fn visit_list_end(&mut self, element_name: &str, len: usize) {}

    /// Return `false` to skip the children of `node`.
    fn visit(
        &mut self,
        element_name: &str,
        element_index: Option<usize>,
        node: &dyn Visitable,
    ) -> bool {
        true
    }

    fn visit_value(&mut self, element_name: &str, value: Primitive<'_>) {}
}

/// Visit a single child.
pub fn accept_one<T: Visitable>(value: &T, element_name: &str, visitor: &mut dyn Visitor) {
    value.accept(element_name, None, visitor);
}

/// Visit an optional child.
pub fn accept_opt<T: Visitable>(value: &Option<T>, element_name: &str, visitor: &mut dyn Visitor) {
    if let Some(value) = value {
        value.accept(element_name, None, visitor);
    }
}

/// Visit a repeating child; empty lists produce no callbacks.
pub fn accept_list<T: Visitable>(values: &[T], element_name: &str, visitor: &mut dyn Visitor) {
    if values.is_empty() {
        return;
    }
    visitor.visit_list_start(element_name, values.len());
    for (index, value) in values.iter().enumerate() {
        value.accept(element_name, Some(index), visitor);
    }
    visitor.visit_list_end(element_name, values.len());
}

/// Report a plain (non-element) value such as `Element.id`.
pub fn accept_value<V: AsPrimitive>(
    value: &Option<V>,
    element_name: &str,
    visitor: &mut dyn Visitor,
) {
    if let Some(value) = value {
        visitor.visit_value(element_name, value.as_primitive());
    }
}

/// Collects a clone of every node of concrete type `T`.
#[derive(Debug)]
pub struct CollectingVisitor<T> {
    result: Vec<T>,
}

impl<T: Visitable + Clone> CollectingVisitor<T> {
    pub fn new() -> Self {
        Self { result: Vec::new() }
    }

    pub fn result(&self) -> &[T] {
        &self.result
    }

    pub fn into_result(self) -> Vec<T> {
        self.result
    }
}

impl<T: Visitable + Clone> Default for CollectingVisitor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Visitable + Clone> Visitor for CollectingVisitor<T> {
    fn visit(
        &mut self,
        _element_name: &str,
        _element_index: Option<usize>,
        node: &dyn Visitable,
    ) -> bool {
        if let Some(value) = node.downcast_ref::<T>() {
            self.result.push(value.clone());
        }
        true
    }
}

/// Records the FHIRPath-style location of every visited node,
/// e.g. `ExplanationOfBenefit.item[0].adjudication[1]`.
#[derive(Debug, Default)]
pub struct PathVisitor {
    stack: Vec<String>,
    paths: Vec<(String, &'static str)>,
}

impl PathVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(path, type name)` pairs in visit order.
    pub fn paths(&self) -> &[(String, &'static str)] {
        &self.paths
    }

    /// Paths of every node of the given type name.
    pub fn paths_of(&self, type_name: &str) -> Vec<&str> {
        self.paths
            .iter()
            .filter(|(_, t)| *t == type_name)
            .map(|(p, _)| p.as_str())
            .collect()
    }
}

impl Visitor for PathVisitor {
    fn visit_start(
        &mut self,
        element_name: &str,
        element_index: Option<usize>,
        node: &dyn Visitable,
    ) {
        let segment = match element_index {
            Some(index) => format!("{}[{}]", element_name, index),
            None => element_name.to_string(),
        };
        self.stack.push(segment);
        self.paths.push((self.stack.join("."), node.type_name()));
    }

    fn visit_end(
        &mut self,
        _element_name: &str,
        _element_index: Option<usize>,
        _node: &dyn Visitable,
    ) {
        self.stack.pop();
    }
}
