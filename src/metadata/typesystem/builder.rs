//! Builder for declared type descriptors.
//!
//! This module provides the [`TypeBuilder`] struct, a fluent API for declaring classes, value
//! types, enums, interfaces and the well-known primitives of a module and registering them in a
//! [`Catalog`]. Constructed types (arrays, pointers, generic instances) are created through the
//! catalog itself.
//!
//! Unless [`TypeBuilder::extends`] names one, the base type is looked up by name at build time:
//! `System.Object` for classes, `System.ValueType` for value types, `System.Enum` for enums.
//! Interfaces have no base.
//!
//! # Example
//!
//! ```rust
//! use apiscope::{Catalog, metadata::typesystem::{CilPrimitiveKind, TypeBuilder}};
//!
//! let catalog = Catalog::new();
//! let corlib = catalog.add_module("System.Private.CoreLib", "System.Private.CoreLib.dll");
//! let object = TypeBuilder::new(&catalog, &corlib)
//!     .primitive(CilPrimitiveKind::Object)?
//!     .build()?;
//! let t = catalog.make_generic_parameter("T", 0, false);
//! let list = TypeBuilder::new(&catalog, &corlib)
//!     .class("System.Collections.Generic", "List")
//!     .generic_param(&t)
//!     .build()?;
//!
//! assert_eq!(list.name, "List`1");
//! assert!(list.base().is_some_and(|base| base.is_same(&object)));
//! # Ok::<(), apiscope::Error>(())
//! ```

use std::sync::Arc;

use crate::{
    metadata::{
        module::ModuleRc,
        token::TokenTable,
        typesystem::{
            CilFlavor, CilPrimitiveKind, CilType, CilTypeRc, TypeAttributes,
            COMPILER_GENERATED_ATTRIBUTE,
        },
    },
    Catalog,
    Error::TypeError,
    Result,
};

/// Provides a fluent API for declaring types
pub struct TypeBuilder<'a> {
    /// Catalog the type is registered in
    catalog: &'a Catalog,
    /// Module declaring the type
    module: ModuleRc,
    flavor: CilFlavor,
    namespace: String,
    name: String,
    flags: u32,
    visibility: Option<u32>,
    base: Option<CilTypeRc>,
    implied_base: Option<&'static str>,
    interfaces: Vec<CilTypeRc>,
    enclosing: Option<CilTypeRc>,
    generic_params: Vec<CilTypeRc>,
    attributes: Vec<String>,
}

impl<'a> TypeBuilder<'a> {
    /// Create a new builder declaring types in `module`
    ///
    /// ## Arguments
    /// * 'catalog' - The catalog to register the type in
    /// * 'module'  - The declaring module
    #[must_use]
    pub fn new(catalog: &'a Catalog, module: &ModuleRc) -> Self {
        TypeBuilder {
            catalog,
            module: module.clone(),
            flavor: CilFlavor::Unknown,
            namespace: String::new(),
            name: String::new(),
            flags: 0,
            visibility: None,
            base: None,
            implied_base: None,
            interfaces: Vec::new(),
            enclosing: None,
            generic_params: Vec::new(),
            attributes: Vec::new(),
        }
    }

    fn start(
        mut self,
        flavor: CilFlavor,
        namespace: &str,
        name: &str,
        implied_base: Option<&'static str>,
    ) -> Self {
        self.flavor = flavor;
        self.namespace = namespace.to_string();
        self.name = name.to_string();
        self.implied_base = implied_base;
        self
    }

    /// Start declaring one of the well-known primitives in the `System` namespace
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] for [`CilPrimitiveKind::Null`], which has no type.
    pub fn primitive(self, kind: CilPrimitiveKind) -> Result<Self> {
        let flavor = kind.to_flavor();
        let (implied_base, flags) = match flavor {
            CilFlavor::Unknown => {
                return Err(TypeError(format!(
                    "'{}' is a constant kind, not a type",
                    kind.name()
                )))
            }
            CilFlavor::Object => (None, 0),
            CilFlavor::String => (Some("System.Object"), TypeAttributes::SEALED),
            _ => (Some("System.ValueType"), TypeAttributes::SEALED),
        };

        let mut builder = self.start(flavor, kind.namespace(), kind.name(), implied_base);
        builder.flags |= flags;
        Ok(builder)
    }

    /// Start declaring a class
    #[must_use]
    pub fn class(self, namespace: &str, name: &str) -> Self {
        self.start(CilFlavor::Class, namespace, name, Some("System.Object"))
    }

    /// Start declaring a value type
    #[must_use]
    pub fn value_type(self, namespace: &str, name: &str) -> Self {
        let mut builder = self.start(
            CilFlavor::ValueType,
            namespace,
            name,
            Some("System.ValueType"),
        );
        builder.flags |= TypeAttributes::SEALED;
        builder
    }

    /// Start declaring an enum
    #[must_use]
    pub fn enumeration(self, namespace: &str, name: &str) -> Self {
        let mut builder = self.start(CilFlavor::ValueType, namespace, name, Some("System.Enum"));
        builder.flags |= TypeAttributes::SEALED;
        builder
    }

    /// Start declaring an interface
    #[must_use]
    pub fn interface(self, namespace: &str, name: &str) -> Self {
        let mut builder = self.start(CilFlavor::Interface, namespace, name, None);
        builder.flags |= TypeAttributes::INTERFACE | TypeAttributes::ABSTRACT;
        builder
    }

    /// Mark the type abstract
    #[must_use]
    pub fn abstract_type(mut self) -> Self {
        self.flags |= TypeAttributes::ABSTRACT;
        self
    }

    /// Mark the type sealed
    #[must_use]
    pub fn sealed(mut self) -> Self {
        self.flags |= TypeAttributes::SEALED;
        self
    }

    /// Mark the type abstract and sealed, i.e. static
    #[must_use]
    pub fn static_type(self) -> Self {
        self.abstract_type().sealed()
    }

    /// Set the visibility to one of the `TypeAttributes` visibility values
    #[must_use]
    pub fn visibility(mut self, visibility: u32) -> Self {
        self.visibility = Some(visibility & TypeAttributes::VISIBILITY_MASK);
        self
    }

    /// Hide the type from other modules
    #[must_use]
    pub fn hidden(self) -> Self {
        self.visibility(TypeAttributes::NOT_PUBLIC)
    }

    /// Set the base type explicitly
    #[must_use]
    pub fn extends(mut self, base: &CilTypeRc) -> Self {
        self.base = Some(base.clone());
        self
    }

    /// Add a directly implemented interface
    #[must_use]
    pub fn implements(mut self, interface: &CilTypeRc) -> Self {
        self.interfaces.push(interface.clone());
        self
    }

    /// Nest the type inside `enclosing`
    #[must_use]
    pub fn nested_in(mut self, enclosing: &CilTypeRc) -> Self {
        self.enclosing = Some(enclosing.clone());
        self
    }

    /// Append a generic type parameter, created by [`Catalog::make_generic_parameter`]
    #[must_use]
    pub fn generic_param(mut self, parameter: &CilTypeRc) -> Self {
        self.generic_params.push(parameter.clone());
        self
    }

    /// Apply a custom attribute, by full name
    #[must_use]
    pub fn attribute(mut self, fullname: &str) -> Self {
        self.attributes.push(fullname.to_string());
        self
    }

    /// Tag the type as compiler-generated
    #[must_use]
    pub fn compiler_generated(self) -> Self {
        self.attribute(COMPILER_GENERATED_ATTRIBUTE)
    }

    fn resolve_visibility(&self) -> Result<u32> {
        let nested = self.enclosing.is_some();
        match self.visibility {
            None if nested => Ok(TypeAttributes::NESTED_PUBLIC),
            None => Ok(TypeAttributes::PUBLIC),
            Some(visibility) if nested == (visibility >= TypeAttributes::NESTED_PUBLIC) => {
                Ok(visibility)
            }
            Some(visibility) => Err(malformed_error!(
                "Visibility 0x{:x} does not fit {} type '{}'",
                visibility,
                if nested { "nested" } else { "top-level" },
                self.name
            )),
        }
    }

    /// Register the type in the catalog
    ///
    /// # Errors
    /// Returns an error if no kind was started, the visibility doesn't match the nesting, or a
    /// generic parameter isn't an unbound type parameter.
    pub fn build(self) -> Result<CilTypeRc> {
        if self.name.is_empty() || self.flavor == CilFlavor::Unknown {
            return Err(malformed_error!("TypeBuilder::build called without a type kind"));
        }

        for parameter in &self.generic_params {
            if !matches!(
                parameter.flavor,
                CilFlavor::GenericParameter { method: false, .. }
            ) {
                return Err(malformed_error!(
                    "'{}' is not a generic type parameter of '{}'",
                    parameter.name,
                    self.name
                ));
            }
        }

        let name = if self.generic_params.is_empty() || self.name.contains('`') {
            self.name.clone()
        } else {
            format!("{}`{}", self.name, self.generic_params.len())
        };
        let flags = (self.flags & !TypeAttributes::VISIBILITY_MASK) | self.resolve_visibility()?;

        let declared = CilType::new(
            self.catalog.next_token(TokenTable::TypeDef),
            Some(self.module.clone()),
            self.flavor.clone(),
            self.namespace.clone(),
            name,
            flags,
        );
        for attribute in &self.attributes {
            declared.custom_attributes.push(attribute.clone());
        }
        for parameter in &self.generic_params {
            declared.generic_args.push(parameter.into());
        }
        for interface in &self.interfaces {
            declared.interfaces.push(interface.into());
        }
        if let Some(enclosing) = &self.enclosing {
            declared.set_enclosing_type(enclosing)?;
        }

        let base = match (&self.base, self.implied_base) {
            (Some(base), _) => Some(base.clone()),
            (None, Some(implied)) if implied != declared.fullname() => self.catalog.find(implied),
            _ => None,
        };
        if let Some(base) = base {
            declared.set_base(&base)?;
        }

        let declared = self.catalog.register(declared);
        if let Some(enclosing) = &self.enclosing {
            enclosing.nested_types.push(Arc::clone(&declared).into());
        }

        Ok(declared)
    }
}
