use std::sync::{Arc, OnceLock};

use crate::{
    metadata::{
        members::{MethodRc, MethodRef, ParamRc},
        token::{Token, TokenTable},
        typesystem::{CilTypeRc, CilTypeRef},
    },
    Catalog, Result,
};

#[allow(non_snake_case)]
/// All possible flags for `PropertyAttributes`
pub mod PropertyAttributes {
    /// Property is special
    pub const SPECIAL_NAME: u32 = 0x0200;
    /// Runtime(metadata internal APIs) should check name encoding
    pub const RT_SPECIAL_NAME: u32 = 0x0400;
    /// Property has default
    pub const HAS_DEFAULT: u32 = 0x1000;
}

/// A reference to a `Property`
pub type PropertyRc = Arc<Property>;
/// A vector that holds a list of `Property`
pub type PropertyList = Arc<boxcar::Vec<PropertyRc>>;

/// A property declared by a type
pub struct Property {
    /// Token
    pub token: Token,
    /// a 2-byte bitmask of type `PropertyAttributes`
    pub flags: u32,
    /// The name of this property
    pub name: String,
    /// The type of this property
    pub property_type: CilTypeRef,
    /// Index parameters; empty unless this is an indexer
    pub params: Vec<ParamRc>,
    /// The `Method` that retrieves this property
    pub fn_getter: OnceLock<MethodRef>,
    /// The `Method` that sets this property
    pub fn_setter: OnceLock<MethodRef>,
}

impl Property {
    /// The getter, if any
    #[must_use]
    pub fn getter(&self) -> Option<MethodRc> {
        self.fn_getter.get().and_then(MethodRef::upgrade)
    }

    /// The setter, if any
    #[must_use]
    pub fn setter(&self) -> Option<MethodRc> {
        self.fn_setter.get().and_then(MethodRef::upgrade)
    }

    /// Static if any accessor is static
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.getter()
            .or_else(|| self.setter())
            .is_some_and(|accessor| accessor.is_static())
    }

    /// Is `method` one of this property's accessors
    #[must_use]
    pub fn is_accessor(&self, method: &MethodRc) -> bool {
        [self.getter(), self.setter()]
            .iter()
            .flatten()
            .any(|accessor| Arc::ptr_eq(accessor, method))
    }
}

/// Fluent registration of a [`Property`] on its declaring type.
///
/// Accessors are registered on the declaring type as `get_{name}` / `set_{name}` methods.
pub struct PropertyBuilder<'a> {
    catalog: &'a Catalog,
    declaring: CilTypeRc,
    name: String,
    property_type: CilTypeRc,
    params: Vec<ParamRc>,
    getter: Option<MethodRc>,
    setter: Option<MethodRc>,
}

impl<'a> PropertyBuilder<'a> {
    /// Start building a property `name` of type `property_type` on `declaring`
    #[must_use]
    pub fn new(
        catalog: &'a Catalog,
        declaring: &CilTypeRc,
        name: &str,
        property_type: &CilTypeRc,
    ) -> Self {
        PropertyBuilder {
            catalog,
            declaring: declaring.clone(),
            name: name.to_string(),
            property_type: property_type.clone(),
            params: Vec::new(),
            getter: None,
            setter: None,
        }
    }

    /// Append an index parameter
    #[must_use]
    pub fn index(mut self, param: ParamRc) -> Self {
        self.params.push(param);
        self
    }

    /// Use `method` as the getter
    #[must_use]
    pub fn getter(mut self, method: &MethodRc) -> Self {
        self.getter = Some(method.clone());
        self
    }

    /// Use `method` as the setter
    #[must_use]
    pub fn setter(mut self, method: &MethodRc) -> Self {
        self.setter = Some(method.clone());
        self
    }

    /// Register the property on its declaring type
    ///
    /// # Errors
    /// Returns an error if an accessor is declared by another type.
    pub fn build(self) -> Result<PropertyRc> {
        for accessor in [&self.getter, &self.setter].into_iter().flatten() {
            if !accessor.declaring_type.get()?.is_same(&self.declaring) {
                return Err(malformed_error!(
                    "Accessor '{}' of property '{}' belongs to another type",
                    accessor.name,
                    self.name
                ));
            }
        }

        let property = Arc::new(Property {
            token: self.catalog.next_token(TokenTable::Property),
            flags: 0,
            name: self.name,
            property_type: (&self.property_type).into(),
            params: self.params,
            fn_getter: OnceLock::new(),
            fn_setter: OnceLock::new(),
        });

        if let Some(getter) = &self.getter {
            let _ = property.fn_getter.set(MethodRef::new(getter));
        }
        if let Some(setter) = &self.setter {
            let _ = property.fn_setter.set(MethodRef::new(setter));
        }

        self.declaring.properties.push(property.clone());
        Ok(property)
    }
}
