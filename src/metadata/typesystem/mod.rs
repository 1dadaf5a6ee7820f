//! Type descriptors for API-surface analysis.
//!
//! This module provides the read-only view of every type a [`crate::Catalog`] knows about:
//! declared classes, value types and interfaces, the well-known primitives, and constructed
//! types such as arrays, pointers, by-ref types and generic instances.
//!
//! # Key Components
//!
//! - [`CilType`]: Core type representation
//! - [`CilTypeRef`]: Weak reference used for every type-to-type relation
//! - [`CilFlavor`]: Structural flavor of a type
//! - [`TypeKind`]: Classification label computed from a type's structure
//! - [`TypeBuilder`]: Fluent builder registering declared types in a catalog
//! - [`hierarchy`]: Nesting chain, base chain, interfaces and assignability
//!
//! # Examples
//!
//! ```rust
//! use apiscope::{Catalog, metadata::typesystem::{TypeBuilder, TypeKind}};
//!
//! let catalog = Catalog::new();
//! let module = catalog.add_module("Acme, Version=1.0.0.0", "/lib/Acme.dll");
//! let widget = TypeBuilder::new(&catalog, &module)
//!     .class("Acme", "Widget")
//!     .sealed()
//!     .build()?;
//!
//! assert_eq!(TypeKind::of(&widget), TypeKind::FinalClass);
//! # Ok::<(), apiscope::Error>(())
//! ```

mod attributes;
mod base;
mod builder;
pub mod hierarchy;
mod kind;
mod primitives;

use std::sync::{Arc, OnceLock};

pub use attributes::{TypeAttributes, COMPILER_GENERATED_ATTRIBUTE, EXTENSION_ATTRIBUTE};
pub use base::{resolve_all, CilFlavor, CilTypeRef, CilTypeRefList};
pub use builder::TypeBuilder;
pub use kind::TypeKind;
pub use primitives::{CilPrimitive, CilPrimitiveData, CilPrimitiveKind};

use crate::{
    metadata::{
        members::{EventList, FieldList, MethodList, PropertyList},
        module::ModuleRc,
        token::Token,
    },
    Result,
};

/// A vector that holds a list of `CilType`
pub type CilTypeList = Arc<boxcar::Vec<CilTypeRc>>;
/// Reference to a `CilType`
pub type CilTypeRc = Arc<CilType>;
/// A vector that holds the names of custom attributes
pub type CustomAttributeList = Arc<boxcar::Vec<String>>;

/// Represents a 'Type': a declared definition, a well-known primitive, or a type constructed
/// from others (array, pointer, by-ref, generic instance). The `Token` identifies it within the
/// owning catalog.
pub struct CilType {
    /// Token
    pub token: Token,
    /// The module declaring this type; constructed types inherit the module of their element or
    /// generic definition, generic parameters have none
    pub module: Option<ModuleRc>,
    /// The structural flavor
    pub flavor: CilFlavor,
    /// `TypeNamespace` (can be empty, e.g. for global types and generic parameters)
    pub namespace: String,
    /// `TypeName`, including the generic arity suffix (e.g. ``List`1``)
    pub name: String,
    /// Flags (a 4-byte bitmask of type `TypeAttributes`)
    pub flags: u32,
    /// This types base aka 'extends'
    base: OnceLock<CilTypeRef>,
    /// The type this one is nested in
    enclosing: OnceLock<CilTypeRef>,
    /// The element of an array, pointer or by-ref type
    element: OnceLock<CilTypeRef>,
    /// The generic definition this instance was created from
    definition: OnceLock<CilTypeRef>,
    /// All interfaces this type declares directly
    pub interfaces: CilTypeRefList,
    /// Generic parameters (definitions) or bound arguments (instances)
    pub generic_args: CilTypeRefList,
    /// All types that are 'contained' in this type
    pub nested_types: CilTypeRefList,
    /// All methods and constructors this type declares
    pub methods: MethodList,
    /// All fields this type declares
    pub fields: FieldList,
    /// All properties this type declares
    pub properties: PropertyList,
    /// All events this type declares
    pub events: EventList,
    /// Full names of the custom attributes applied to this type
    pub custom_attributes: CustomAttributeList,
}

impl CilType {
    /// Create a new instance of a `CilType`
    #[must_use]
    pub fn new(
        token: Token,
        module: Option<ModuleRc>,
        flavor: CilFlavor,
        namespace: String,
        name: String,
        flags: u32,
    ) -> Self {
        CilType {
            token,
            module,
            flavor,
            namespace,
            name,
            flags,
            base: OnceLock::new(),
            enclosing: OnceLock::new(),
            element: OnceLock::new(),
            definition: OnceLock::new(),
            interfaces: Arc::new(boxcar::Vec::new()),
            generic_args: Arc::new(boxcar::Vec::new()),
            nested_types: Arc::new(boxcar::Vec::new()),
            methods: Arc::new(boxcar::Vec::new()),
            fields: Arc::new(boxcar::Vec::new()),
            properties: Arc::new(boxcar::Vec::new()),
            events: Arc::new(boxcar::Vec::new()),
            custom_attributes: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Access the base type of this type, if it exists
    #[must_use]
    pub fn base(&self) -> Option<CilTypeRc> {
        self.base.get().and_then(CilTypeRef::upgrade)
    }

    /// Set the base type, can only be done once
    ///
    /// # Errors
    /// Returns an error if the base type has already been set
    pub fn set_base(&self, base: &CilTypeRc) -> Result<()> {
        self.base
            .set(base.into())
            .map_err(|_| malformed_error!("Base type of '{}' already set", self.fullname()))
    }

    /// Access the enclosing type of a nested type
    #[must_use]
    pub fn enclosing_type(&self) -> Option<CilTypeRc> {
        self.enclosing.get().and_then(CilTypeRef::upgrade)
    }

    /// Nest this type inside `enclosing`, can only be done once
    ///
    /// # Errors
    /// Returns an error if the enclosing type has already been set
    pub fn set_enclosing_type(&self, enclosing: &CilTypeRc) -> Result<()> {
        self.enclosing
            .set(enclosing.into())
            .map_err(|_| malformed_error!("Enclosing type of '{}' already set", self.name))
    }

    /// Access the element type of an array, pointer or by-ref type
    #[must_use]
    pub fn element_type(&self) -> Option<CilTypeRc> {
        self.element.get().and_then(CilTypeRef::upgrade)
    }

    /// Fix the element of a constructed type before it is shared
    #[must_use]
    pub(crate) fn with_element(mut self, element: &CilTypeRc) -> Self {
        self.element = OnceLock::from(CilTypeRef::from(element));
        self
    }

    /// Fix the base type before the descriptor is shared
    #[must_use]
    pub(crate) fn with_base(mut self, base: &CilTypeRc) -> Self {
        self.base = OnceLock::from(CilTypeRef::from(base));
        self
    }

    /// Access the generic definition a generic instance was created from
    #[must_use]
    pub fn instance_definition(&self) -> Option<CilTypeRc> {
        self.definition.get().and_then(CilTypeRef::upgrade)
    }

    /// Fix the generic definition of an instance, and its enclosing type if the definition is
    /// nested, before it is shared
    #[must_use]
    pub(crate) fn with_definition(mut self, definition: &CilTypeRc) -> Self {
        self.definition = OnceLock::from(CilTypeRef::from(definition));
        if let Some(enclosing) = definition.enclosing_type() {
            self.enclosing = OnceLock::from(CilTypeRef::from(&enclosing));
        }
        self
    }

    /// Returns the full name (Namespace.Name) of the entity
    #[must_use]
    pub fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{0}.{1}", self.namespace, self.name)
        }
    }

    /// The name without the generic arity suffix (``List`1`` -> `List`)
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.name.split('`').next().unwrap_or(&self.name)
    }

    /// Check whether a custom attribute with the given full name is applied
    #[must_use]
    pub fn has_attribute(&self, fullname: &str) -> bool {
        self.custom_attributes
            .iter()
            .any(|(_, attribute)| attribute == fullname)
    }

    /// Synthesized by a compiler rather than authored (attribute-tagged or a `<...>` name)
    #[must_use]
    pub fn is_compiler_generated(&self) -> bool {
        self.name.starts_with('<') || self.has_attribute(COMPILER_GENERATED_ATTRIBUTE)
    }

    /// Is this an array type
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self.flavor, CilFlavor::Array { .. })
    }

    /// Is this an unmanaged pointer type
    #[must_use]
    pub fn is_pointer(&self) -> bool {
        self.flavor == CilFlavor::Pointer
    }

    /// Is this a by-reference type
    #[must_use]
    pub fn is_by_ref(&self) -> bool {
        self.flavor == CilFlavor::ByRef
    }

    /// Is this one of the runtime primitives (numeric, boolean, char, native ints)
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        self.flavor.is_runtime_primitive()
    }

    /// Is this a value type (including primitives and enums)
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        self.flavor.is_value_type()
    }

    /// Is this a value type deriving from `System.Enum`
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.is_value_type()
            && self
                .base()
                .is_some_and(|base| base.namespace == "System" && base.name == "Enum")
    }

    /// Is this an interface
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.flavor == CilFlavor::Interface
            || (self.flags & TypeAttributes::CLASS_SEMANTICS_MASK) == TypeAttributes::INTERFACE
    }

    /// Is this a class (a reference type that is neither an interface nor an array)
    #[must_use]
    pub fn is_class(&self) -> bool {
        !self.is_interface()
            && matches!(
                self.flavor,
                CilFlavor::Class | CilFlavor::Object | CilFlavor::String
            )
    }

    /// Is the `Abstract` flag set
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.flags & TypeAttributes::ABSTRACT != 0
    }

    /// Is the `Sealed` flag set
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.flags & TypeAttributes::SEALED != 0
    }

    /// Is this type nested inside another type
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.enclosing.get().is_some()
    }

    /// Visible outside its module: public, and every enclosing type is visible as well
    #[must_use]
    pub fn is_visible(&self) -> bool {
        match self.flags & TypeAttributes::VISIBILITY_MASK {
            TypeAttributes::PUBLIC => !self.is_nested(),
            TypeAttributes::NESTED_PUBLIC => self
                .enclosing_type()
                .is_some_and(|enclosing| enclosing.is_visible()),
            _ => false,
        }
    }

    /// Is this an unbound generic type or method parameter
    #[must_use]
    pub fn is_generic_parameter(&self) -> bool {
        matches!(self.flavor, CilFlavor::GenericParameter { .. })
    }

    /// Has generic parameters or arguments
    #[must_use]
    pub fn is_generic_type(&self) -> bool {
        !self.generic_args.is_empty()
    }

    /// Was created by binding the arguments of a generic definition
    #[must_use]
    pub fn is_generic_instance(&self) -> bool {
        self.definition.get().is_some()
    }

    /// Is a generic definition with unbound parameters
    #[must_use]
    pub fn is_generic_definition(&self) -> bool {
        self.is_generic_type() && !self.is_generic_instance()
    }

    /// Mentions an unbound generic parameter anywhere in its structure
    #[must_use]
    pub fn contains_generic_parameters(&self) -> bool {
        if self.is_generic_parameter() || self.is_generic_definition() {
            return true;
        }

        if let Some(element) = self.element_type() {
            return element.contains_generic_parameters();
        }

        self.generic_args.iter().any(|(_, arg)| {
            arg.upgrade()
                .is_some_and(|arg| arg.contains_generic_parameters())
        })
    }

    /// A generic type that still mentions unbound parameters, e.g. `IEnumerable<T>`
    #[must_use]
    pub fn is_open_generic(&self) -> bool {
        self.is_generic_type() && self.contains_generic_parameters()
    }

    /// A generic type whose arguments are all bound, e.g. `IEnumerable<String>`
    #[must_use]
    pub fn is_closed_generic(&self) -> bool {
        self.is_generic_type() && !self.contains_generic_parameters()
    }

    /// A static, non-nested, non-generic type tagged as declaring extension methods
    #[must_use]
    pub fn is_extension_container(&self) -> bool {
        self.is_class()
            && self.is_abstract()
            && self.is_sealed()
            && !self.is_nested()
            && !self.is_generic_type()
            && !self.is_compiler_generated()
            && self.has_attribute(EXTENSION_ATTRIBUTE)
    }

    /// Identity comparison of two descriptors
    #[must_use]
    pub fn is_same(&self, other: &CilType) -> bool {
        self.token == other.token
    }
}
