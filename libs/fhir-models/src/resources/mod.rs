//! Resources

pub mod coverage;
pub mod explanation_of_benefit;

pub use coverage::Coverage;
pub use explanation_of_benefit::ExplanationOfBenefit;

use crate::visitor::Visitor;
use crate::Visitable;

/// Any modeled resource, e.g. an entry of `DomainResource.contained`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    Coverage(Box<Coverage>),
    ExplanationOfBenefit(Box<ExplanationOfBenefit>),
}

impl Resource {
    pub fn resource_type(&self) -> &'static str {
        self.type_name()
    }

    /// Logical id of the resource.
    pub fn id(&self) -> Option<&str> {
        match self {
            Resource::Coverage(r) => r.id(),
            Resource::ExplanationOfBenefit(r) => r.id(),
        }
    }

    pub fn as_coverage(&self) -> Option<&Coverage> {
        match self {
            Resource::Coverage(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_explanation_of_benefit(&self) -> Option<&ExplanationOfBenefit> {
        match self {
            Resource::ExplanationOfBenefit(r) => Some(r),
            _ => None,
        }
    }
}

impl From<Coverage> for Resource {
    fn from(value: Coverage) -> Self {
        Resource::Coverage(Box::new(value))
    }
}

impl From<ExplanationOfBenefit> for Resource {
    fn from(value: ExplanationOfBenefit) -> Self {
        Resource::ExplanationOfBenefit(Box::new(value))
    }
}

impl Visitable for Resource {
    fn type_name(&self) -> &'static str {
        match self {
            Resource::Coverage(r) => r.type_name(),
            Resource::ExplanationOfBenefit(r) => r.type_name(),
        }
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        match self {
            Resource::Coverage(r) => r.accept(element_name, element_index, visitor),
            Resource::ExplanationOfBenefit(r) => r.accept(element_name, element_index, visitor),
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn is_resource(&self) -> bool {
        true
    }
}
