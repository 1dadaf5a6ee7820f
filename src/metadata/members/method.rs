//! Methods and constructors.
//!
//! # Key Types
//! - [`Method`]: a declared method or constructor
//! - [`MethodAccessFlags`], [`MethodModifiers`]: attribute flags
//! - [`MethodBuilder`]: fluent registration on a declaring type

use std::sync::{Arc, Weak};

use bitflags::bitflags;

use crate::{
    metadata::{
        members::{MemberAccess, ParamRc},
        token::{Token, TokenTable},
        typesystem::{
            CilTypeRc, CilTypeRef, CilTypeRefList, CustomAttributeList, EXTENSION_ATTRIBUTE,
        },
    },
    Catalog, Result,
};

/// Bitmask for `ACCESS` state extraction
pub const METHOD_ACCESS_MASK: u32 = 0x0007;

/// A reference to a `Method`
pub type MethodRc = Arc<Method>;
/// A vector that holds a list of `Method`
pub type MethodList = Arc<boxcar::Vec<MethodRc>>;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Method access flags
    pub struct MethodAccessFlags: u32 {
        /// Member not referenceable
        const COMPILER_CONTROLLED = 0x0000;
        /// Accessible only by the parent type
        const PRIVATE = 0x0001;
        /// Accessible by sub-types only in this Assembly
        const FAM_AND_ASSEM = 0x0002;
        /// Accessibly by anyone in the Assembly
        const ASSEM = 0x0003;
        /// Accessible only by type and sub-types
        const FAMILY = 0x0004;
        /// Accessibly by sub-types anywhere, plus anyone in assembly
        const FAM_OR_ASSEM = 0x0005;
        /// Accessibly by anyone who has visibility to this scope
        const PUBLIC = 0x0006;
    }
}

impl MethodAccessFlags {
    /// Extract access flags from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        let access = flags & METHOD_ACCESS_MASK;
        Self::from_bits_truncate(access)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Method modifiers and properties
    pub struct MethodModifiers: u32 {
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Method cannot be overridden
        const FINAL = 0x0020;
        /// Method is virtual
        const VIRTUAL = 0x0040;
        /// Method hides by name+sig, else just by name
        const HIDE_BY_SIG = 0x0080;
        /// Method always gets a new slot in the vtable
        const NEW_SLOT = 0x0100;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Method is special
        const SPECIAL_NAME = 0x0800;
        /// CLI provides 'special' behavior, dpending upon the name of the method
        const RTSPECIAL_NAME = 0x1000;
    }
}

impl MethodModifiers {
    /// Extract method modifiers from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & !METHOD_ACCESS_MASK)
    }
}

/// A smart reference to a `Method` that doesn't keep it alive, used by property and event
/// accessors
#[derive(Clone, Debug)]
pub struct MethodRef {
    weak_ref: Weak<Method>,
}

impl MethodRef {
    /// Create a new `MethodRef` from a strong reference
    #[must_use]
    pub fn new(strong_ref: &MethodRc) -> Self {
        Self {
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    /// Get a strong reference to the method, `None` if it has been dropped
    #[must_use]
    pub fn upgrade(&self) -> Option<MethodRc> {
        self.weak_ref.upgrade()
    }
}

/// A method or constructor declared by a type
pub struct Method {
    /// Token
    pub token: Token,
    /// The name; `.ctor` for instance constructors and `.cctor` for type initializers
    pub name: String,
    /// Access flags
    pub flags_access: MethodAccessFlags,
    /// Modifiers
    pub flags_modifiers: MethodModifiers,
    /// The type declaring this method
    pub declaring_type: CilTypeRef,
    /// The return type, `None` for methods returning nothing
    pub return_type: Option<CilTypeRef>,
    /// The parameters, in declaration order (the implicit `this` isn't listed)
    pub params: Vec<ParamRc>,
    /// Generic parameters of a generic method
    pub generic_args: CilTypeRefList,
    /// Full names of the custom attributes applied to this method
    pub custom_attributes: CustomAttributeList,
}

impl Method {
    /// Is this an instance constructor or a type initializer
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == ".ctor" || self.name == ".cctor"
    }

    /// Is this method static
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags_modifiers.contains(MethodModifiers::STATIC)
    }

    /// Is this method virtual
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.flags_modifiers.contains(MethodModifiers::VIRTUAL)
    }

    /// Is this method final (sealed)
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.flags_modifiers.contains(MethodModifiers::FINAL)
    }

    /// Is this method abstract
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.flags_modifiers.contains(MethodModifiers::ABSTRACT)
    }

    /// Declared accessibility
    #[must_use]
    pub fn access(&self) -> MemberAccess {
        MemberAccess::from_flags(self.flags_access.bits())
    }

    /// Check whether a custom attribute with the given full name is applied
    #[must_use]
    pub fn has_attribute(&self, fullname: &str) -> bool {
        self.custom_attributes
            .iter()
            .any(|(_, attribute)| attribute == fullname)
    }

    /// Tagged as an extension method
    #[must_use]
    pub fn is_extension(&self) -> bool {
        self.is_static() && self.has_attribute(EXTENSION_ATTRIBUTE)
    }

    /// The receiver parameter of an extension method, i.e. its first parameter
    #[must_use]
    pub fn receiver(&self) -> Option<&ParamRc> {
        self.params.first()
    }
}

/// Fluent registration of a [`Method`] on its declaring type.
///
/// Methods default to public, non-virtual instance methods returning nothing.
pub struct MethodBuilder<'a> {
    catalog: &'a Catalog,
    declaring: CilTypeRc,
    name: String,
    access: MethodAccessFlags,
    modifiers: MethodModifiers,
    return_type: Option<CilTypeRc>,
    params: Vec<ParamRc>,
    generic_args: Vec<CilTypeRc>,
    attributes: Vec<String>,
}

impl<'a> MethodBuilder<'a> {
    /// Start building a method named `name` on `declaring`
    ///
    /// ## Arguments
    /// * 'catalog'   - The catalog handing out the method token
    /// * 'declaring' - The type declaring the method
    /// * 'name'      - The method name
    #[must_use]
    pub fn new(catalog: &'a Catalog, declaring: &CilTypeRc, name: &str) -> Self {
        MethodBuilder {
            catalog,
            declaring: declaring.clone(),
            name: name.to_string(),
            access: MethodAccessFlags::PUBLIC,
            modifiers: MethodModifiers::HIDE_BY_SIG,
            return_type: None,
            params: Vec::new(),
            generic_args: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Start building an instance constructor
    #[must_use]
    pub fn constructor(catalog: &'a Catalog, declaring: &CilTypeRc) -> Self {
        Self::new(catalog, declaring, ".ctor")
            .modifiers(MethodModifiers::SPECIAL_NAME | MethodModifiers::RTSPECIAL_NAME)
    }

    /// Start building a type initializer
    #[must_use]
    pub fn type_initializer(catalog: &'a Catalog, declaring: &CilTypeRc) -> Self {
        Self::new(catalog, declaring, ".cctor")
            .access(MethodAccessFlags::PRIVATE)
            .modifiers(
                MethodModifiers::STATIC
                    | MethodModifiers::SPECIAL_NAME
                    | MethodModifiers::RTSPECIAL_NAME,
            )
    }

    /// Set the accessibility
    #[must_use]
    pub fn access(mut self, access: MethodAccessFlags) -> Self {
        self.access = access;
        self
    }

    /// Take access and modifiers from raw `MethodAttributes` bits, as stored in a `MethodDef` row
    #[must_use]
    pub fn raw_flags(mut self, flags: u32) -> Self {
        self.access = MethodAccessFlags::from_method_flags(flags);
        self.modifiers = MethodModifiers::from_method_flags(flags);
        self
    }

    /// Add modifiers
    #[must_use]
    pub fn modifiers(mut self, modifiers: MethodModifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }

    /// Make the method static
    #[must_use]
    pub fn static_method(self) -> Self {
        self.modifiers(MethodModifiers::STATIC)
    }

    /// Make the method virtual
    #[must_use]
    pub fn virtual_method(self) -> Self {
        self.modifiers(MethodModifiers::VIRTUAL | MethodModifiers::NEW_SLOT)
    }

    /// Make the method an override that can't be overridden further
    #[must_use]
    pub fn sealed_override(self) -> Self {
        self.modifiers(MethodModifiers::VIRTUAL | MethodModifiers::FINAL)
    }

    /// Make the method abstract
    #[must_use]
    pub fn abstract_method(self) -> Self {
        self.modifiers(
            MethodModifiers::VIRTUAL | MethodModifiers::NEW_SLOT | MethodModifiers::ABSTRACT,
        )
    }

    /// Tag the method as an extension method (implies static)
    #[must_use]
    pub fn extension(self) -> Self {
        self.static_method().attribute(EXTENSION_ATTRIBUTE)
    }

    /// Set the return type
    #[must_use]
    pub fn returns(mut self, return_type: &CilTypeRc) -> Self {
        self.return_type = Some(return_type.clone());
        self
    }

    /// Append a parameter
    #[must_use]
    pub fn param(mut self, param: ParamRc) -> Self {
        self.params.push(param);
        self
    }

    /// Append a generic method parameter
    #[must_use]
    pub fn generic_param(mut self, parameter: &CilTypeRc) -> Self {
        self.generic_args.push(parameter.clone());
        self
    }

    /// Apply a custom attribute, by full name
    #[must_use]
    pub fn attribute(mut self, fullname: &str) -> Self {
        self.attributes.push(fullname.to_string());
        self
    }

    /// Register the method on its declaring type
    ///
    /// # Errors
    /// Returns an error if a generic parameter isn't a method generic parameter.
    pub fn build(self) -> Result<MethodRc> {
        let generic_args: CilTypeRefList = Arc::new(boxcar::Vec::new());
        for arg in &self.generic_args {
            if !arg.is_generic_parameter() {
                return Err(malformed_error!(
                    "Generic argument '{}' of method '{}' is not a generic parameter",
                    arg.name,
                    self.name
                ));
            }
            generic_args.push(arg.into());
        }

        let custom_attributes: CustomAttributeList = Arc::new(boxcar::Vec::new());
        for attribute in self.attributes {
            custom_attributes.push(attribute);
        }

        let method = Arc::new(Method {
            token: self.catalog.next_token(TokenTable::MethodDef),
            name: self.name,
            flags_access: self.access,
            flags_modifiers: self.modifiers,
            declaring_type: (&self.declaring).into(),
            return_type: self.return_type.as_ref().map(CilTypeRef::from),
            params: self.params,
            generic_args,
            custom_attributes,
        });

        self.declaring.methods.push(method.clone());
        Ok(method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{metadata::members::ParamBuilder, test::CatalogFixture};

    #[test]
    fn test_flag_extraction() {
        let flags = 0x0006 | 0x0040 | 0x0020;
        assert_eq!(
            MethodAccessFlags::from_method_flags(flags),
            MethodAccessFlags::PUBLIC
        );
        let modifiers = MethodModifiers::from_method_flags(flags);
        assert!(modifiers.contains(MethodModifiers::VIRTUAL | MethodModifiers::FINAL));
        assert!(!modifiers.contains(MethodModifiers::STATIC));
    }

    #[test]
    fn test_builder_raw_flags() {
        let fixture = CatalogFixture::new();

        // family | static | hide-by-sig
        let method = MethodBuilder::new(&fixture.catalog, &fixture.widget, "Reset")
            .raw_flags(0x0004 | 0x0010 | 0x0080)
            .build()
            .unwrap();
        assert_eq!(method.access(), MemberAccess::Family);
        assert!(method.is_static());
        assert!(!method.is_virtual());

        let copied = method.flags_modifiers;
        assert_eq!(copied, method.flags_modifiers);
        assert_eq!(
            format!("{:?}", method.flags_access),
            format!("{:?}", MethodAccessFlags::FAMILY)
        );
    }

    #[test]
    fn test_builder_registers_on_declaring_type() {
        let fixture = CatalogFixture::new();
        let before = fixture.widget.methods.count();

        let method = MethodBuilder::new(&fixture.catalog, &fixture.widget, "Resize")
            .virtual_method()
            .param(ParamBuilder::new(&fixture.catalog, &fixture.int32).name("factor").build())
            .build()
            .unwrap();

        assert_eq!(fixture.widget.methods.count(), before + 1);
        assert!(method.is_virtual());
        assert!(!method.is_static());
        assert_eq!(method.access(), MemberAccess::Public);
        assert!(method.declaring_type.get().unwrap().is_same(&fixture.widget));
    }

    #[test]
    fn test_constructor_kinds() {
        let fixture = CatalogFixture::new();

        let ctor = MethodBuilder::constructor(&fixture.catalog, &fixture.widget)
            .build()
            .unwrap();
        assert!(ctor.is_constructor());
        assert_eq!(ctor.name, ".ctor");

        let cctor = MethodBuilder::type_initializer(&fixture.catalog, &fixture.widget)
            .build()
            .unwrap();
        assert!(cctor.is_constructor());
        assert_eq!(cctor.name, ".cctor");
        assert!(cctor.is_static());
        assert_eq!(cctor.access(), MemberAccess::Private);
    }

    #[test]
    fn test_extension_tagging() {
        let fixture = CatalogFixture::new();

        let method = MethodBuilder::new(&fixture.catalog, &fixture.sequence_ext, "Tap")
            .extension()
            .build()
            .unwrap();
        assert!(method.is_extension());
        assert!(method.receiver().is_none());
    }

    #[test]
    fn test_generic_arg_must_be_parameter() {
        let fixture = CatalogFixture::new();

        let result = MethodBuilder::new(&fixture.catalog, &fixture.widget, "Broken")
            .generic_param(&fixture.int32)
            .build();
        assert!(result.is_err());
    }
}
