//! Declarative macros that expand a per-field schema description into a
//! model type.
//!
//! [`composite!`](crate::composite) is the single source of the builder pattern
//! used by every resource, backbone element and complex datatype:
//!
//! ```ignore
//! composite! {
//!     /// Patient insurance information
//!     backbone Insurance("ExplanationOfBenefit.Insurance") {
//!         /// Coverage to be used for adjudication
//!         focal("focal"): one Boolean,
//!         coverage("coverage"): one Reference [refs "Coverage"],
//!         pre_auth_ref("preAuthRef"): many FhirString,
//!     }
//! }
//! ```
//!
//! The kind (`element`, `backbone`, `resource`) selects the inherited base
//! fields. Each field carries its FHIR element name and a cardinality:
//!
//! | cardinality  | stored as   | builder slot       | build-time rule          |
//! |--------------|-------------|--------------------|--------------------------|
//! | `one`        | `T`         | `Option<T>`        | must be set              |
//! | `opt`        | `Option<T>` | `Option<T>`        |                          |
//! | `many`       | `Vec<T>`    | `Vec<T>`           |                          |
//! | `some`       | `Vec<T>`    | `Vec<T>`           | at least one entry       |
//! | `choice`     | `T`         | `Option<DataType>` | must be set, type in `T` |
//! | `opt_choice` | `Option<T>` | `Option<DataType>` | type in `T`              |
//!
//! A trailing `[refs "Patient", ...]` restricts the resource types a
//! `Reference` field (or a choice that may hold a `Reference`) can point to.

/// Defines an immutable model type together with its builder, validation and
/// visitor support.
#[macro_export]
macro_rules! composite {
    (
        $(#[$meta:meta])*
        $kind:ident $name:ident ($type_name:literal) {
            $(
                $(#[$fmeta:meta])*
                $field:ident ($json:literal) : $card:ident $ty:ty
                $( [refs $($target:literal),+ $(,)?] )?
            ),* $(,)?
        }
    ) => {
        $crate::paste::paste! {
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq, Hash)]
            pub struct $name {
                base: $crate::__base_ty!($kind),
                $( $field: $crate::__field_ty!($card $ty), )*
            }

            #[doc = "Builder for [`" $name "`]."]
            #[derive(Debug, Clone, Default, PartialEq)]
            pub struct [<$name Builder>] {
                base: $crate::__base_ty!($kind),
                $( $field: $crate::__builder_ty!($card $ty), )*
            }

            impl $name {
                pub fn builder() -> [<$name Builder>] {
                    [<$name Builder>]::default()
                }

                /// Copy this instance into a builder for modification.
                pub fn to_builder(&self) -> [<$name Builder>] {
                    [<$name Builder>]::from(self.clone())
                }

                $crate::__base_getters!($kind);

                $( $crate::__getter!($(#[$fmeta])* $card $field $ty); )*

                #[allow(dead_code)]
                fn has_populated_fields(&self) -> bool {
                    self.base.has_children() $( || $crate::__populated!($card self.$field) )*
                }

                fn validate(&self) -> $crate::Result<()> {
                    $( $crate::__check_field!($card self.$field, $json); )*
                    $( $( $crate::__check_refs!($card self.$field, $json, [$($target),+]); )? )*
                    self.base.validate()?;
                    $crate::__kind_rules!($kind self);
                    Ok(())
                }
            }

            impl [<$name Builder>] {
                $crate::__base_setters!($kind);

                $( $crate::__setters!($(#[$fmeta])* $card $field $ty); )*

                #[doc = "Freeze the accumulated state into a validated [`" $name "`]."]
                ///
                /// The builder is left untouched, so building twice yields equal instances.
                pub fn build(&self) -> $crate::Result<$name> {
                    let result = self.try_build();
                    if let Err(error) = &result {
                        $crate::tracing::debug!(
                            type_name = $type_name,
                            error = %error,
                            "build failed validation"
                        );
                    }
                    result
                }

                fn try_build(&self) -> $crate::Result<$name> {
                    let instance = $name {
                        base: self.base.clone(),
                        $( $field: $crate::__build_field!($card $ty, self.$field, $json), )*
                    };
                    instance.validate()?;
                    Ok(instance)
                }
            }

            impl ::std::convert::From<$name> for [<$name Builder>] {
                fn from(value: $name) -> Self {
                    Self {
                        base: value.base,
                        $( $field: $crate::__unbuild_field!($card value.$field), )*
                    }
                }
            }

            impl $crate::FhirType for $name {
                const TYPE_NAME: &'static str = $type_name;
            }

            impl $crate::Visitable for $name {
                fn type_name(&self) -> &'static str {
                    $type_name
                }

                fn accept(
                    &self,
                    element_name: &str,
                    element_index: ::std::option::Option<usize>,
                    visitor: &mut dyn $crate::Visitor,
                ) {
                    if visitor.pre_visit(self) {
                        visitor.visit_start(element_name, element_index, self);
                        if visitor.visit(element_name, element_index, self) {
                            self.base.accept_children(visitor);
                            $( $crate::__accept!($card self.$field, $json, visitor); )*
                        }
                        visitor.visit_end(element_name, element_index, self);
                        visitor.post_visit(self);
                    }
                }

                fn as_any(&self) -> &dyn ::std::any::Any {
                    self
                }

                fn is_resource(&self) -> bool {
                    $crate::__is_resource!($kind)
                }
            }

            $crate::__kind_impls!($kind $name);
        }
    };
}

/// Defines a closed tagged union for a choice element (`value[x]`).
///
/// Variant names must match the [`DataType`](crate::DataType) variant that
/// carries the same type.
#[macro_export]
macro_rules! choice {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $variant:ident($ty:ty) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $variant($ty), )+
        }

        $(
            impl ::std::convert::From<$ty> for $name {
                fn from(value: $ty) -> Self {
                    $name::$variant(value)
                }
            }
        )+

        impl ::std::convert::From<$name> for $crate::DataType {
            fn from(value: $name) -> Self {
                match value {
                    $( $name::$variant(v) => $crate::DataType::$variant(v), )+
                }
            }
        }

        impl $crate::Choice for $name {
            const TYPE_NAMES: &'static [&'static str] =
                &[$( <$ty as $crate::FhirType>::TYPE_NAME ),+];

            fn from_data_type(
                value: $crate::DataType,
            ) -> ::std::result::Result<Self, $crate::DataType> {
                #[allow(unreachable_patterns)]
                let value = match value {
                    $( $crate::DataType::$variant(v) => return Ok($name::$variant(v)), )+
                    other => other,
                };
                // profiled types narrow into a permitted base type
                $(
                    let value = match <$ty as $crate::FromDataType>::from_data_type(value) {
                        Ok(v) => return Ok($name::$variant(v)),
                        Err(other) => other,
                    };
                )+
                Err(value)
            }

            fn as_reference(&self) -> ::std::option::Option<&$crate::Reference> {
                match self {
                    $( $name::$variant(v) => $crate::Visitable::as_any(v).downcast_ref::<$crate::Reference>(), )+
                }
            }
        }

        impl $crate::Visitable for $name {
            fn type_name(&self) -> &'static str {
                match self {
                    $( $name::$variant(v) => $crate::Visitable::type_name(v), )+
                }
            }

            fn accept(
                &self,
                element_name: &str,
                element_index: ::std::option::Option<usize>,
                visitor: &mut dyn $crate::Visitor,
            ) {
                match self {
                    $( $name::$variant(v) => $crate::Visitable::accept(v, element_name, element_index, visitor), )+
                }
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }

        impl $crate::Element for $name {
            fn id(&self) -> ::std::option::Option<&str> {
                match self {
                    $( $name::$variant(v) => $crate::Element::id(v), )+
                }
            }

            fn extension(&self) -> &[$crate::Extension] {
                match self {
                    $( $name::$variant(v) => $crate::Element::extension(v), )+
                }
            }

            fn has_value(&self) -> bool {
                match self {
                    $( $name::$variant(v) => $crate::Element::has_value(v), )+
                }
            }

            fn has_children(&self) -> bool {
                match self {
                    $( $name::$variant(v) => $crate::Element::has_children(v), )+
                }
            }

            fn check_value(&self) -> $crate::Result<()> {
                match self {
                    $( $name::$variant(v) => $crate::Element::check_value(v), )+
                }
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __base_ty {
    (element) => { $crate::ElementBase };
    (backbone) => { $crate::BackboneBase };
    (resource) => { $crate::ResourceBase };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_ty {
    (one $ty:ty) => { $ty };
    (opt $ty:ty) => { ::std::option::Option<$ty> };
    (many $ty:ty) => { ::std::vec::Vec<$ty> };
    (some $ty:ty) => { ::std::vec::Vec<$ty> };
    (choice $ty:ty) => { $ty };
    (opt_choice $ty:ty) => { ::std::option::Option<$ty> };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __builder_ty {
    (one $ty:ty) => { ::std::option::Option<$ty> };
    (opt $ty:ty) => { ::std::option::Option<$ty> };
    (many $ty:ty) => { ::std::vec::Vec<$ty> };
    (some $ty:ty) => { ::std::vec::Vec<$ty> };
    (choice $ty:ty) => { ::std::option::Option<$crate::DataType> };
    (opt_choice $ty:ty) => { ::std::option::Option<$crate::DataType> };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __getter {
    ($(#[$m:meta])* one $field:ident $ty:ty) => {
        $(#[$m])*
        pub fn $field(&self) -> &$ty {
            &self.$field
        }
    };
    ($(#[$m:meta])* choice $field:ident $ty:ty) => {
        $crate::__getter!($(#[$m])* one $field $ty);
    };
    ($(#[$m:meta])* opt $field:ident $ty:ty) => {
        $(#[$m])*
        pub fn $field(&self) -> ::std::option::Option<&$ty> {
            self.$field.as_ref()
        }
    };
    ($(#[$m:meta])* opt_choice $field:ident $ty:ty) => {
        $crate::__getter!($(#[$m])* opt $field $ty);
    };
    ($(#[$m:meta])* many $field:ident $ty:ty) => {
        $(#[$m])*
        pub fn $field(&self) -> &[$ty] {
            &self.$field
        }
    };
    ($(#[$m:meta])* some $field:ident $ty:ty) => {
        $crate::__getter!($(#[$m])* many $field $ty);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __setters {
    ($(#[$m:meta])* one $field:ident $ty:ty) => {
        $crate::__single_setter!($(#[$m])* $field: $ty => $field);
    };
    ($(#[$m:meta])* opt $field:ident $ty:ty) => {
        $crate::__single_setter!($(#[$m])* $field: $ty => $field);
    };
    ($(#[$m:meta])* many $field:ident $ty:ty) => {
        $crate::__list_setters!($(#[$m])* $field: $ty => $field);
    };
    ($(#[$m:meta])* some $field:ident $ty:ty) => {
        $crate::__list_setters!($(#[$m])* $field: $ty => $field);
    };
    ($(#[$m:meta])* choice $field:ident $ty:ty) => {
        $crate::__single_setter!($(#[$m])* $field: $crate::DataType => $field);
    };
    ($(#[$m:meta])* opt_choice $field:ident $ty:ty) => {
        $crate::__single_setter!($(#[$m])* $field: $crate::DataType => $field);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __single_setter {
    ($(#[$m:meta])* $field:ident : $ty:ty => $($slot:ident).+) => {
        $(#[$m])*
        pub fn $field(mut self, value: impl ::std::convert::Into<$ty>) -> Self {
            self.$($slot).+ = ::std::option::Option::Some(value.into());
            self
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __list_setters {
    ($(#[$m:meta])* $field:ident : $ty:ty => $($slot:ident).+) => {
        $crate::paste::paste! {
            $(#[$m])*
            ///
            /// Appends one entry.
            pub fn $field(mut self, value: impl ::std::convert::Into<$ty>) -> Self {
                self.$($slot).+.push(value.into());
                self
            }

            #[doc = "Appends every value to `" $field "`."]
            pub fn [<extend_ $field>]<I, V>(mut self, values: I) -> Self
            where
                I: ::std::iter::IntoIterator<Item = V>,
                V: ::std::convert::Into<$ty>,
            {
                self.$($slot).+.extend(values.into_iter().map(::std::convert::Into::into));
                self
            }

            #[doc = "Replaces `" $field "` with the given values; an empty collection clears it."]
            pub fn [<set_ $field>]<I, V>(mut self, values: I) -> Self
            where
                I: ::std::iter::IntoIterator<Item = V>,
                V: ::std::convert::Into<$ty>,
            {
                self.$($slot).+ = values.into_iter().map(::std::convert::Into::into).collect();
                self
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __build_field {
    (one $ty:ty, $value:expr, $name:expr) => {
        $crate::validation::require_non_null($value.clone(), $name)?
    };
    (opt $ty:ty, $value:expr, $name:expr) => {
        $value.clone()
    };
    (many $ty:ty, $value:expr, $name:expr) => {
        $value.clone()
    };
    (some $ty:ty, $value:expr, $name:expr) => {
        $crate::validation::check_non_empty_list($value.clone(), $name)?
    };
    (choice $ty:ty, $value:expr, $name:expr) => {
        $crate::validation::require_choice_element::<$ty>($value.clone(), $name)?
    };
    (opt_choice $ty:ty, $value:expr, $name:expr) => {
        $crate::validation::choice_element::<$ty>($value.clone(), $name)?
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __unbuild_field {
    (one $value:expr) => { ::std::option::Option::Some($value) };
    (opt $value:expr) => { $value };
    (many $value:expr) => { $value };
    (some $value:expr) => { $value };
    (choice $value:expr) => {
        ::std::option::Option::Some(::std::convert::Into::<$crate::DataType>::into($value))
    };
    (opt_choice $value:expr) => {
        $value.map(::std::convert::Into::<$crate::DataType>::into)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __populated {
    (one $value:expr) => { true };
    (choice $value:expr) => { true };
    (opt $value:expr) => { $value.is_some() };
    (opt_choice $value:expr) => { $value.is_some() };
    (many $value:expr) => { !$value.is_empty() };
    (some $value:expr) => { !$value.is_empty() };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __check_field {
    (one $value:expr, $name:expr) => {
        $crate::validation::check_element(&$value, $name)?
    };
    (choice $value:expr, $name:expr) => {
        $crate::validation::check_element(&$value, $name)?
    };
    (opt $value:expr, $name:expr) => {
        $crate::validation::check_optional_element($value.as_ref(), $name)?
    };
    (opt_choice $value:expr, $name:expr) => {
        $crate::validation::check_optional_element($value.as_ref(), $name)?
    };
    (many $value:expr, $name:expr) => {
        $crate::validation::check_elements(&$value, $name)?
    };
    (some $value:expr, $name:expr) => {
        $crate::validation::check_elements(&$value, $name)?
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __check_refs {
    (one $value:expr, $name:expr, [$($target:literal),+]) => {
        $crate::validation::check_reference_type(
            ::std::option::Option::Some(&$value),
            $name,
            &[$($target),+],
        )?
    };
    (opt $value:expr, $name:expr, [$($target:literal),+]) => {
        $crate::validation::check_reference_type($value.as_ref(), $name, &[$($target),+])?
    };
    (many $value:expr, $name:expr, [$($target:literal),+]) => {
        $crate::validation::check_reference_types(&$value, $name, &[$($target),+])?
    };
    (some $value:expr, $name:expr, [$($target:literal),+]) => {
        $crate::validation::check_reference_types(&$value, $name, &[$($target),+])?
    };
    (choice $value:expr, $name:expr, [$($target:literal),+]) => {
        $crate::validation::check_reference_type(
            $crate::Choice::as_reference(&$value),
            $name,
            &[$($target),+],
        )?
    };
    (opt_choice $value:expr, $name:expr, [$($target:literal),+]) => {
        $crate::validation::check_reference_type(
            $value.as_ref().and_then(|choice| $crate::Choice::as_reference(choice)),
            $name,
            &[$($target),+],
        )?
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __accept {
    (one $value:expr, $name:expr, $visitor:ident) => {
        $crate::visitor::accept_one(&$value, $name, $visitor)
    };
    (choice $value:expr, $name:expr, $visitor:ident) => {
        $crate::visitor::accept_one(&$value, $name, $visitor)
    };
    (opt $value:expr, $name:expr, $visitor:ident) => {
        $crate::visitor::accept_opt(&$value, $name, $visitor)
    };
    (opt_choice $value:expr, $name:expr, $visitor:ident) => {
        $crate::visitor::accept_opt(&$value, $name, $visitor)
    };
    (many $value:expr, $name:expr, $visitor:ident) => {
        $crate::visitor::accept_list(&$value, $name, $visitor)
    };
    (some $value:expr, $name:expr, $visitor:ident) => {
        $crate::visitor::accept_list(&$value, $name, $visitor)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __is_resource {
    (resource) => { true };
    ($other:ident) => { false };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __kind_rules {
    (resource $this:ident) => {};
    ($other:ident $this:ident) => {
        $crate::validation::require_value_or_children($this)?
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __kind_impls {
    (resource $name:ident) => {};
    ($other:ident $name:ident) => {
        impl $crate::Element for $name {
            fn id(&self) -> ::std::option::Option<&str> {
                self.base.id.as_deref()
            }

            fn extension(&self) -> &[$crate::Extension] {
                &self.base.extension
            }

            fn has_children(&self) -> bool {
                self.has_populated_fields()
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __base_getters {
    (element) => {
        /// Unique id for inter-element referencing
        pub fn id(&self) -> ::std::option::Option<&str> {
            self.base.id.as_deref()
        }

        /// Additional content defined by implementations
        pub fn extension(&self) -> &[$crate::Extension] {
            &self.base.extension
        }
    };
    (backbone) => {
        $crate::__base_getters!(element);

        /// Extensions that cannot be ignored even if unrecognized
        pub fn modifier_extension(&self) -> &[$crate::Extension] {
            &self.base.modifier_extension
        }
    };
    (resource) => {
        $crate::__base_getters!(backbone);

        /// Metadata about the resource
        pub fn meta(&self) -> ::std::option::Option<&$crate::Meta> {
            self.base.meta.as_ref()
        }

        /// A set of rules under which this content was created
        pub fn implicit_rules(&self) -> ::std::option::Option<&$crate::Uri> {
            self.base.implicit_rules.as_ref()
        }

        /// Language of the resource content
        pub fn language(&self) -> ::std::option::Option<&$crate::Code> {
            self.base.language.as_ref()
        }

        /// Text summary of the resource, for human interpretation
        pub fn text(&self) -> ::std::option::Option<&$crate::Narrative> {
            self.base.text.as_ref()
        }

        /// Contained, inline Resources
        pub fn contained(&self) -> &[$crate::Resource] {
            &self.base.contained
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __base_setters {
    (element) => {
        /// Unique id for inter-element referencing
        pub fn id(mut self, id: impl ::std::convert::Into<::std::string::String>) -> Self {
            self.base.id = ::std::option::Option::Some(id.into());
            self
        }

        $crate::__list_setters!(
            /// Additional content defined by implementations
            extension: $crate::Extension => base.extension
        );
    };
    (backbone) => {
        $crate::__base_setters!(element);

        $crate::__list_setters!(
            /// Extensions that cannot be ignored even if unrecognized
            modifier_extension: $crate::Extension => base.modifier_extension
        );
    };
    (resource) => {
        $crate::__base_setters!(backbone);

        $crate::__single_setter!(
            /// Metadata about the resource
            meta: $crate::Meta => base.meta
        );

        $crate::__single_setter!(
            /// A set of rules under which this content was created
            implicit_rules: $crate::Uri => base.implicit_rules
        );

        $crate::__single_setter!(
            /// Language of the resource content
            language: $crate::Code => base.language
        );

        $crate::__single_setter!(
            /// Text summary of the resource, for human interpretation
            text: $crate::Narrative => base.text
        );

        $crate::__list_setters!(
            /// Contained, inline Resources
            contained: $crate::Resource => base.contained
        );
    };
}
