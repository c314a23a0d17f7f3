//! The open sum of all datatypes, and the contract of closed choice unions

use crate::element::{Element, FhirType};
use crate::error::Result;
use crate::types::*;
use crate::visitor::Visitor;
use crate::Visitable;

/// A closed union of the types permitted for one choice element.
pub trait Choice: Element + Clone + Into<DataType> {
    /// FHIR type names of the permitted types, in declaration order.
    const TYPE_NAMES: &'static [&'static str];

    /// Narrow a [`DataType`], handing it back unchanged when its type is not permitted.
    fn from_data_type(value: DataType) -> std::result::Result<Self, DataType>;

    /// The held value, when it is a [`Reference`].
    fn as_reference(&self) -> Option<&Reference>;
}

/// Narrowing of a [`DataType`] to one variant type.
///
/// A profiled type narrows into its base type, so a `Quantity` slot takes a
/// `SimpleQuantity`.
#[doc(hidden)]
pub trait FromDataType: Sized {
    fn from_data_type(value: DataType) -> std::result::Result<Self, DataType>;
}

macro_rules! data_types {
    ($( $variant:ident($ty:ty) $(<- [$($profile:ident),+])? ),+ $(,)?) => {
        /// Any FHIR datatype. Choice setters and `Extension.value` accept this.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum DataType {
            $( $variant($ty), )+
        }

        $(
            impl From<$ty> for DataType {
                fn from(value: $ty) -> Self {
                    DataType::$variant(value)
                }
            }

            impl FromDataType for $ty {
                fn from_data_type(value: DataType) -> std::result::Result<Self, DataType> {
                    match value {
                        DataType::$variant(v) => Ok(v),
                        $( $( DataType::$profile(v) => Ok(v.into()), )+ )?
                        other => Err(other),
                    }
                }
            }
        )+

        impl Choice for DataType {
            const TYPE_NAMES: &'static [&'static str] = &[$( <$ty as FhirType>::TYPE_NAME ),+];

            fn from_data_type(value: DataType) -> std::result::Result<Self, DataType> {
                Ok(value)
            }

            fn as_reference(&self) -> Option<&Reference> {
                match self {
                    DataType::Reference(reference) => Some(reference),
                    _ => None,
                }
            }
        }

        impl Visitable for DataType {
            fn type_name(&self) -> &'static str {
                match self {
                    $( DataType::$variant(v) => v.type_name(), )+
                }
            }

            fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
                match self {
                    $( DataType::$variant(v) => v.accept(element_name, element_index, visitor), )+
                }
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }

        impl Element for DataType {
            fn id(&self) -> Option<&str> {
                match self {
                    $( DataType::$variant(v) => Element::id(v), )+
                }
            }

            fn extension(&self) -> &[Extension] {
                match self {
                    $( DataType::$variant(v) => Element::extension(v), )+
                }
            }

            fn has_value(&self) -> bool {
                match self {
                    $( DataType::$variant(v) => v.has_value(), )+
                }
            }

            fn has_children(&self) -> bool {
                match self {
                    $( DataType::$variant(v) => v.has_children(), )+
                }
            }

            fn check_value(&self) -> Result<()> {
                match self {
                    $( DataType::$variant(v) => v.check_value(), )+
                }
            }
        }
    };
}

data_types! {
    Base64Binary(Base64Binary),
    Boolean(Boolean),
    Canonical(Canonical),
    Code(Code),
    Date(Date),
    DateTime(DateTime),
    Decimal(Decimal),
    Id(Id),
    Instant(Instant),
    Integer(Integer),
    PositiveInt(PositiveInt),
    String(FhirString),
    UnsignedInt(UnsignedInt),
    Uri(Uri),
    Url(Url),
    Address(Address),
    Attachment(Attachment),
    CodeableConcept(CodeableConcept),
    Coding(Coding),
    Identifier(Identifier),
    Money(Money),
    Period(Period),
    Quantity(Quantity) <- [SimpleQuantity],
    Reference(Reference),
    SimpleQuantity(SimpleQuantity),
}
