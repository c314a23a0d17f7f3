//! Core traits and the base content shared by every element and resource

use crate::error::Result;
use crate::resources::Resource;
use crate::types::{Code, Extension, Meta, Narrative, Uri};
use crate::validation;
use crate::visitor::{accept_list, accept_opt, accept_value, Visitor};
use crate::Visitable;

/// Static FHIR type name of a model type.
pub trait FhirType {
    const TYPE_NAME: &'static str;
}

/// Behaviour common to all FHIR elements (primitives, datatypes, backbone elements).
pub trait Element: Visitable {
    fn id(&self) -> Option<&str>;

    fn extension(&self) -> &[Extension];

    /// Whether a primitive value is present. Always `false` for complex types.
    fn has_value(&self) -> bool {
        false
    }

    /// Whether any child element is present.
    fn has_children(&self) -> bool;

    /// Check the primitive value against the rules of its type.
    fn check_value(&self) -> Result<()> {
        Ok(())
    }
}

/// `Element.id` and `Element.extension`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ElementBase {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
}

impl ElementBase {
    /// `id` is an attribute, so only extensions count as children.
    pub fn has_children(&self) -> bool {
        !self.extension.is_empty()
    }

    pub fn accept_children(&self, visitor: &mut dyn Visitor) {
        accept_value(&self.id, "id", visitor);
        accept_list(&self.extension, "extension", visitor);
    }

    pub fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// [`ElementBase`] plus `modifierExtension`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BackboneBase {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub modifier_extension: Vec<Extension>,
}

impl BackboneBase {
    pub fn has_children(&self) -> bool {
        !self.extension.is_empty() || !self.modifier_extension.is_empty()
    }

    pub fn accept_children(&self, visitor: &mut dyn Visitor) {
        accept_value(&self.id, "id", visitor);
        accept_list(&self.extension, "extension", visitor);
        accept_list(&self.modifier_extension, "modifierExtension", visitor);
    }

    pub fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Content inherited from `Resource` and `DomainResource`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResourceBase {
    pub id: Option<String>,
    pub meta: Option<Meta>,
    pub implicit_rules: Option<Uri>,
    pub language: Option<Code>,
    pub text: Option<Narrative>,
    pub contained: Vec<Resource>,
    pub extension: Vec<Extension>,
    pub modifier_extension: Vec<Extension>,
}

impl ResourceBase {
    pub fn has_children(&self) -> bool {
        self.meta.is_some()
            || self.implicit_rules.is_some()
            || self.language.is_some()
            || self.text.is_some()
            || !self.contained.is_empty()
            || !self.extension.is_empty()
            || !self.modifier_extension.is_empty()
    }

    pub fn accept_children(&self, visitor: &mut dyn Visitor) {
        accept_value(&self.id, "id", visitor);
        accept_opt(&self.meta, "meta", visitor);
        accept_opt(&self.implicit_rules, "implicitRules", visitor);
        accept_opt(&self.language, "language", visitor);
        accept_opt(&self.text, "text", visitor);
        accept_list(&self.contained, "contained", visitor);
        accept_list(&self.extension, "extension", visitor);
        accept_list(&self.modifier_extension, "modifierExtension", visitor);
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(id) = &self.id {
            validation::check_id(id).map_err(|source| validation::in_element("id", source))?;
        }
        validation::check_optional_element(self.implicit_rules.as_ref(), "implicitRules")?;
        validation::check_optional_element(self.language.as_ref(), "language")?;
        Ok(())
    }
}

impl<T: Element> Element for Box<T> {
    fn id(&self) -> Option<&str> {
        (**self).id()
    }

    fn extension(&self) -> &[Extension] {
        (**self).extension()
    }

    fn has_value(&self) -> bool {
        (**self).has_value()
    }

    fn has_children(&self) -> bool {
        (**self).has_children()
    }

    fn check_value(&self) -> Result<()> {
        (**self).check_value()
    }
}
