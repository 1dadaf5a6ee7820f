use std::sync::Arc;

use crate::{
    metadata::{
        token::{Token, TokenTable},
        typesystem::{CilPrimitive, CilTypeRc, CilTypeRef},
    },
    Catalog, Result,
};

#[allow(non_snake_case)]
/// All possible flags for `ParamAttributes`
pub mod ParamAttributes {
    /// Param is `[In]`
    pub const IN: u32 = 0x0001;
    /// Param is `[out]`
    pub const OUT: u32 = 0x0002;
    /// Param is optional
    pub const OPTIONAL: u32 = 0x0010;
    /// Param has default value
    pub const HAS_DEFAULT: u32 = 0x1000;
}

/// A reference to a `Param`
pub type ParamRc = Arc<Param>;

/// How an argument is passed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassMode {
    /// By value
    Value,
    /// By reference, read and written
    Ref,
    /// By reference, written only
    Out,
}

/// A parameter of a method, constructor or indexed property
pub struct Param {
    /// Token
    pub token: Token,
    /// a 2-byte bitmask of type `ParamAttributes`
    pub flags: u32,
    /// The name, if the metadata carries one
    pub name: Option<String>,
    /// The declared type, a by-ref type for `ref` and `out` parameters
    pub param_type: CilTypeRef,
    /// `flags.HAS_DEFAULT` -> the default value
    pub default: Option<CilPrimitive>,
}

impl Param {
    /// How the argument is passed, derived from a by-ref type and the `OUT` flag
    ///
    /// # Errors
    /// Returns [`crate::Error::MetadataUnavailable`] if the parameter type can't be resolved.
    pub fn pass_mode(&self) -> Result<PassMode> {
        if !self.param_type.get()?.is_by_ref() {
            return Ok(PassMode::Value);
        }

        if self.flags & ParamAttributes::OUT != 0 && self.flags & ParamAttributes::IN == 0 {
            Ok(PassMode::Out)
        } else {
            Ok(PassMode::Ref)
        }
    }

    /// Has a default value
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.flags & ParamAttributes::HAS_DEFAULT != 0 && self.default.is_some()
    }
}

/// Fluent construction of a [`Param`]
pub struct ParamBuilder<'a> {
    catalog: &'a Catalog,
    param_type: CilTypeRc,
    flags: u32,
    name: Option<String>,
    default: Option<CilPrimitive>,
}

impl<'a> ParamBuilder<'a> {
    /// Start building a parameter of type `param_type`
    #[must_use]
    pub fn new(catalog: &'a Catalog, param_type: &CilTypeRc) -> Self {
        ParamBuilder {
            catalog,
            param_type: param_type.clone(),
            flags: 0,
            name: None,
            default: None,
        }
    }

    /// Set the parameter name
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Mark as an output parameter; the type should be a by-ref type
    #[must_use]
    pub fn out(mut self) -> Self {
        self.flags |= ParamAttributes::OUT;
        self
    }

    /// Give the parameter a default value, which also makes it optional
    #[must_use]
    pub fn default_value(mut self, value: impl Into<CilPrimitive>) -> Self {
        self.flags |= ParamAttributes::OPTIONAL | ParamAttributes::HAS_DEFAULT;
        self.default = Some(value.into());
        self
    }

    /// Finish the parameter
    #[must_use]
    pub fn build(self) -> ParamRc {
        Arc::new(Param {
            token: self.catalog.next_token(TokenTable::Param),
            flags: self.flags,
            name: self.name,
            param_type: (&self.param_type).into(),
            default: self.default,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::CatalogFixture;

    #[test]
    fn test_pass_modes() {
        let fixture = CatalogFixture::new();
        let by_ref = fixture.catalog.make_by_ref(&fixture.int32);

        let value = ParamBuilder::new(&fixture.catalog, &fixture.int32).build();
        let reference = ParamBuilder::new(&fixture.catalog, &by_ref).build();
        let out = ParamBuilder::new(&fixture.catalog, &by_ref).out().build();
        let out_by_value = ParamBuilder::new(&fixture.catalog, &fixture.int32).out().build();

        assert_eq!(value.pass_mode().unwrap(), PassMode::Value);
        assert_eq!(reference.pass_mode().unwrap(), PassMode::Ref);
        assert_eq!(out.pass_mode().unwrap(), PassMode::Out);
        assert_eq!(out_by_value.pass_mode().unwrap(), PassMode::Value);
    }

    #[test]
    fn test_default_value() {
        let fixture = CatalogFixture::new();

        let param = ParamBuilder::new(&fixture.catalog, &fixture.string)
            .name("label")
            .default_value("none")
            .build();
        assert!(param.has_default());
        assert!(param.flags & ParamAttributes::OPTIONAL != 0);
        assert_eq!(param.name.as_deref(), Some("label"));
    }
}
