use std::fmt;

use strum::{EnumCount, EnumIter};

use crate::metadata::typesystem::CilType;

/// Structural classification of a type, as shown in API-surface bracket lines.
///
/// Computed once from a [`CilType`] by [`TypeKind::of`] and consumed by every renderer; the
/// display form is the label (`static class`, `struct`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount)]
pub enum TypeKind {
    /// `T[]`, any rank
    Array,
    /// Unmanaged pointer `T*`
    Pointer,
    /// Runtime primitive (numeric, boolean, char, native ints)
    Primitive,
    /// Value type deriving from `System.Enum`
    Enum,
    /// Any other value type
    Struct,
    /// Interface
    Interface,
    /// Abstract and sealed class
    StaticClass,
    /// Abstract class
    AbstractClass,
    /// Sealed class
    FinalClass,
    /// Class
    Class,
    /// Everything else (by-ref types, generic parameters, exotic metadata)
    Unknown,
}

impl TypeKind {
    /// Classify a type. Never fails: types that fit no category are `Unknown`.
    ///
    /// The checks run in a fixed order, so a type matching several categories (e.g. an array,
    /// which is also a class) gets the first one.
    #[must_use]
    pub fn of(ty: &CilType) -> TypeKind {
        if ty.is_array() {
            TypeKind::Array
        } else if ty.is_pointer() {
            TypeKind::Pointer
        } else if ty.is_primitive() {
            TypeKind::Primitive
        } else if ty.is_value_type() {
            if ty.is_enum() {
                TypeKind::Enum
            } else {
                TypeKind::Struct
            }
        } else if ty.is_interface() {
            TypeKind::Interface
        } else if ty.is_class() {
            match (ty.is_abstract(), ty.is_sealed()) {
                (true, true) => TypeKind::StaticClass,
                (true, false) => TypeKind::AbstractClass,
                (false, true) => TypeKind::FinalClass,
                (false, false) => TypeKind::Class,
            }
        } else {
            TypeKind::Unknown
        }
    }

    /// The label used in rendered output
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            TypeKind::Array => "array",
            TypeKind::Pointer => "pointer",
            TypeKind::Primitive => "primitive",
            TypeKind::Enum => "enum",
            TypeKind::Struct => "struct",
            TypeKind::Interface => "interface",
            TypeKind::StaticClass => "static class",
            TypeKind::AbstractClass => "abstract class",
            TypeKind::FinalClass => "final class",
            TypeKind::Class => "class",
            TypeKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
