use std::sync::Arc;

use crate::{
    metadata::{
        members::MemberAccess,
        token::{Token, TokenTable},
        typesystem::{CilPrimitive, CilTypeRc, CilTypeRef},
    },
    Catalog,
};

#[allow(non_snake_case)]
/// All possible flags for `FieldAttributes`
pub mod FieldAttributes {
    /// These 3 bits contain one of the following values:
    pub const FIELD_ACCESS_MASK: u32 = 0x0007;
    /// Member not referenceable
    pub const COMPILER_CONTROLLED: u32 = 0x0000;
    /// Accessible only by the parent type
    pub const PRIVATE: u32 = 0x0001;
    /// Accessible by sub-types only in this Assembly
    pub const FAM_AND_ASSEM: u32 = 0x0002;
    /// Accessibly by anyone in the Assembly
    pub const ASSEMBLY: u32 = 0x0003;
    /// Accessible only by type and sub-types
    pub const FAMILY: u32 = 0x0004;
    /// Accessibly by sub-types anywhere, plus anyone in assembly
    pub const FAM_OR_ASSEM: u32 = 0x0005;
    /// Accessibly by anyone who has visibility to this scope field contract attributes
    pub const PUBLIC: u32 = 0x0006;
    /// Defined on type, else per instance
    pub const STATIC: u32 = 0x0010;
    /// Field can only be initialized, not written to after init
    pub const INIT_ONLY: u32 = 0x0020;
    /// Value is compile time constant
    pub const LITERAL: u32 = 0x0040;
    /// Field is special
    pub const SPECIAL_NAME: u32 = 0x0200;
    /// CLI provides 'special' behavior, depending upon the name of the field
    pub const RTSPECIAL_NAME: u32 = 0x0400;
    /// Field has default
    pub const HAS_DEFAULT: u32 = 0x8000;
}

/// A reference to a `Field`
pub type FieldRc = Arc<Field>;
/// A vector that holds a list of `Field`
pub type FieldList = Arc<boxcar::Vec<FieldRc>>;

/// A field declared by a type
pub struct Field {
    /// Token
    pub token: Token,
    /// a 2-byte bitmask of type `FieldAttributes`
    pub flags: u32,
    /// The name of the field
    pub name: String,
    /// The declared type
    pub field_type: CilTypeRef,
    /// A default value (flags.HAS_DEFAULT)
    pub default: Option<CilPrimitive>,
}

impl Field {
    /// Declared accessibility
    #[must_use]
    pub fn access(&self) -> MemberAccess {
        MemberAccess::from_flags(self.flags)
    }

    /// Is this field static (literals always are)
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags & (FieldAttributes::STATIC | FieldAttributes::LITERAL) != 0
    }

    /// Can only be assigned during initialization
    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.flags & FieldAttributes::INIT_ONLY != 0
    }

    /// Is a compile time constant
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.flags & FieldAttributes::LITERAL != 0
    }

    /// Has a name reserved by the runtime (e.g. `value__` of an enum)
    #[must_use]
    pub fn is_special(&self) -> bool {
        self.flags & FieldAttributes::RTSPECIAL_NAME != 0
    }
}

/// Fluent registration of a [`Field`] on its declaring type.
///
/// Fields default to public instance fields.
pub struct FieldBuilder<'a> {
    catalog: &'a Catalog,
    declaring: CilTypeRc,
    name: String,
    field_type: CilTypeRc,
    flags: u32,
    default: Option<CilPrimitive>,
}

impl<'a> FieldBuilder<'a> {
    /// Start building a field `name` of type `field_type` on `declaring`
    #[must_use]
    pub fn new(
        catalog: &'a Catalog,
        declaring: &CilTypeRc,
        name: &str,
        field_type: &CilTypeRc,
    ) -> Self {
        FieldBuilder {
            catalog,
            declaring: declaring.clone(),
            name: name.to_string(),
            field_type: field_type.clone(),
            flags: FieldAttributes::PUBLIC,
            default: None,
        }
    }

    /// Replace the access bits with one of the `FieldAttributes` access values
    #[must_use]
    pub fn access(mut self, access: u32) -> Self {
        self.flags = (self.flags & !FieldAttributes::FIELD_ACCESS_MASK)
            | (access & FieldAttributes::FIELD_ACCESS_MASK);
        self
    }

    /// Make the field static
    #[must_use]
    pub fn static_field(mut self) -> Self {
        self.flags |= FieldAttributes::STATIC;
        self
    }

    /// Make the field readonly
    #[must_use]
    pub fn readonly(mut self) -> Self {
        self.flags |= FieldAttributes::INIT_ONLY;
        self
    }

    /// Make the field a compile time constant with the given value
    #[must_use]
    pub fn literal(mut self, value: impl Into<CilPrimitive>) -> Self {
        self.flags |=
            FieldAttributes::STATIC | FieldAttributes::LITERAL | FieldAttributes::HAS_DEFAULT;
        self.default = Some(value.into());
        self
    }

    /// Mark the name as reserved by the runtime
    #[must_use]
    pub fn special(mut self) -> Self {
        self.flags |= FieldAttributes::SPECIAL_NAME | FieldAttributes::RTSPECIAL_NAME;
        self
    }

    /// Register the field on its declaring type
    pub fn build(self) -> FieldRc {
        let field = Arc::new(Field {
            token: self.catalog.next_token(TokenTable::Field),
            flags: self.flags,
            name: self.name,
            field_type: (&self.field_type).into(),
            default: self.default,
        });

        self.declaring.fields.push(field.clone());
        field
    }
}
