//! Member descriptors: methods, constructors, fields, properties, events and their parameters.
//!
//! Members are registered on their declaring [`CilType`] through the builders in this module and
//! referenced from it; they point back to types through weak
//! [`crate::metadata::typesystem::CilTypeRef`]s.
//!
//! # Key Components
//!
//! - [`Member`]: one declared member of any kind, as enumerated by [`declared_members`]
//! - [`MemberAccess`]: declared accessibility shared by methods and fields
//! - [`MethodBuilder`], [`FieldBuilder`], [`PropertyBuilder`], [`EventBuilder`], [`ParamBuilder`]
//!
//! # Examples
//!
//! ```rust
//! use apiscope::{
//!     metadata::{
//!         members::{declared_members, MemberScope, MethodBuilder},
//!         typesystem::{CilPrimitiveKind, TypeBuilder},
//!     },
//!     Catalog,
//! };
//!
//! let catalog = Catalog::new();
//! let module = catalog.add_module("Acme", "Acme.dll");
//! let widget = TypeBuilder::new(&catalog, &module).class("Acme", "Widget").build()?;
//! MethodBuilder::constructor(&catalog, &widget).build()?;
//!
//! assert_eq!(declared_members(&widget, MemberScope::Instance).len(), 1);
//! assert!(declared_members(&widget, MemberScope::Static).is_empty());
//! # Ok::<(), apiscope::Error>(())
//! ```

mod event;
mod field;
mod method;
mod param;
mod property;

pub use event::{Event, EventAttributes, EventBuilder, EventList, EventRc};
pub use field::{Field, FieldAttributes, FieldBuilder, FieldList, FieldRc};
pub use method::{
    Method, MethodAccessFlags, MethodBuilder, MethodList, MethodModifiers, MethodRc, MethodRef,
    METHOD_ACCESS_MASK,
};
pub use param::{Param, ParamAttributes, ParamBuilder, ParamRc, PassMode};
pub use property::{Property, PropertyAttributes, PropertyBuilder, PropertyList, PropertyRc};

use crate::metadata::typesystem::{CilType, CilTypeRc};

/// Declared accessibility of a method or field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberAccess {
    /// Not referenceable
    CompilerControlled,
    /// Only the declaring type
    Private,
    /// Sub-types within the same assembly
    FamilyAndAssembly,
    /// Anyone within the same assembly
    Assembly,
    /// The declaring type and sub-types
    Family,
    /// Sub-types anywhere, plus anyone within the same assembly
    FamilyOrAssembly,
    /// Anyone
    Public,
}

impl MemberAccess {
    /// Decode the 3 access bits shared by `MethodAttributes` and `FieldAttributes`
    #[must_use]
    pub fn from_flags(flags: u32) -> Self {
        match flags & METHOD_ACCESS_MASK {
            0x0001 => MemberAccess::Private,
            0x0002 => MemberAccess::FamilyAndAssembly,
            0x0003 => MemberAccess::Assembly,
            0x0004 => MemberAccess::Family,
            0x0005 => MemberAccess::FamilyOrAssembly,
            0x0006 => MemberAccess::Public,
            _ => MemberAccess::CompilerControlled,
        }
    }

    /// The token shown in descriptor tags, `None` for public members
    #[must_use]
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            MemberAccess::Public => None,
            MemberAccess::Private => Some("private"),
            MemberAccess::Family => Some("family"),
            MemberAccess::FamilyOrAssembly => Some("family-or-assembly"),
            MemberAccess::Assembly => Some("assembly"),
            MemberAccess::FamilyAndAssembly => Some("family-and-assembly"),
            MemberAccess::CompilerControlled => Some("compiler-controlled"),
        }
    }
}

/// Which half of a type's members to enumerate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberScope {
    /// Members belonging to the type itself, including nested types and the type initializer
    Static,
    /// Members belonging to instances, including constructors
    Instance,
}

/// One declared member of a type
#[derive(Clone)]
pub enum Member {
    /// A nested type
    NestedType(CilTypeRc),
    /// An instance constructor or type initializer
    Constructor(MethodRc),
    /// A method
    Method(MethodRc),
    /// An event
    Event(EventRc),
    /// A property
    Property(PropertyRc),
    /// A field
    Field(FieldRc),
}

impl Member {
    /// The declared name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Member::NestedType(ty) => &ty.name,
            Member::Constructor(method) | Member::Method(method) => &method.name,
            Member::Event(event) => &event.name,
            Member::Property(property) => &property.name,
            Member::Field(field) => &field.name,
        }
    }

    /// Rank of the member kind, used to order members sharing a name
    #[must_use]
    pub fn kind_order(&self) -> u8 {
        match self {
            Member::NestedType(_) => 0,
            Member::Constructor(_) => 1,
            Member::Method(_) => 2,
            Member::Event(_) => 3,
            Member::Property(_) => 4,
            Member::Field(_) => 5,
        }
    }

    fn scope(&self) -> MemberScope {
        let is_static = match self {
            Member::NestedType(_) => true,
            Member::Constructor(method) | Member::Method(method) => method.is_static(),
            Member::Event(event) => event.is_static(),
            Member::Property(property) => property.is_static(),
            Member::Field(field) => field.is_static(),
        };

        if is_static {
            MemberScope::Static
        } else {
            MemberScope::Instance
        }
    }
}

fn is_accessor(ty: &CilType, method: &MethodRc) -> bool {
    ty.properties
        .iter()
        .any(|(_, property)| property.is_accessor(method))
        || ty.events.iter().any(|(_, event)| event.is_accessor(method))
}

/// The members `ty` declares itself in the given scope, ordered by name and then member kind.
///
/// Inherited members are not included. Compiler-generated nested types and the accessor methods
/// of declared properties and events are skipped.
#[must_use]
pub fn declared_members(ty: &CilType, scope: MemberScope) -> Vec<Member> {
    let mut members = Vec::new();

    for (_, nested) in ty.nested_types.iter() {
        if let Some(nested) = nested.upgrade() {
            if !nested.is_compiler_generated() {
                members.push(Member::NestedType(nested));
            }
        }
    }

    for (_, method) in ty.methods.iter() {
        if is_accessor(ty, method) {
            continue;
        }

        if method.is_constructor() {
            members.push(Member::Constructor(method.clone()));
        } else {
            members.push(Member::Method(method.clone()));
        }
    }

    members.extend(ty.events.iter().map(|(_, event)| Member::Event(event.clone())));
    members.extend(
        ty.properties
            .iter()
            .map(|(_, property)| Member::Property(property.clone())),
    );
    members.extend(ty.fields.iter().map(|(_, field)| Member::Field(field.clone())));

    members.retain(|member| member.scope() == scope);
    members.sort_by(|a, b| {
        a.name()
            .cmp(b.name())
            .then_with(|| a.kind_order().cmp(&b.kind_order()))
    });
    members
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::CatalogFixture;

    #[test]
    fn test_access_from_flags() {
        assert_eq!(MemberAccess::from_flags(0x0006), MemberAccess::Public);
        assert_eq!(MemberAccess::from_flags(0x0001), MemberAccess::Private);
        assert_eq!(MemberAccess::from_flags(0x0016), MemberAccess::Public);
        assert_eq!(MemberAccess::from_flags(0x0000), MemberAccess::CompilerControlled);
        assert_eq!(MemberAccess::Public.tag(), None);
        assert_eq!(MemberAccess::FamilyOrAssembly.tag(), Some("family-or-assembly"));
    }

    #[test]
    fn test_scopes_are_split() {
        let fixture = CatalogFixture::new();

        let instance: Vec<_> = declared_members(&fixture.widget, MemberScope::Instance)
            .iter()
            .map(|member| member.name().to_string())
            .collect();
        let statics: Vec<_> = declared_members(&fixture.widget, MemberScope::Static)
            .iter()
            .map(|member| member.name().to_string())
            .collect();

        assert_eq!(instance, [".ctor", "Changed", "Draw", "Title", "count"]);
        assert_eq!(statics, ["Create", "MaxSize"]);
    }

    #[test]
    fn test_nested_types_are_static_and_filtered() {
        let fixture = CatalogFixture::new();

        let statics = declared_members(&fixture.outer, MemberScope::Static);
        let nested: Vec<_> = statics
            .iter()
            .filter(|member| matches!(member, Member::NestedType(_)))
            .map(|member| member.name().to_string())
            .collect();
        assert_eq!(nested, ["Inner"]);
        assert!(declared_members(&fixture.outer, MemberScope::Instance)
            .iter()
            .all(|member| !matches!(member, Member::NestedType(_))));
    }
}
