use std::sync::{Arc, Weak};

use crate::{
    metadata::{
        token::Token,
        typesystem::{CilPrimitiveKind, CilType, CilTypeRc},
    },
    Error::MetadataUnavailable,
    Result,
};

/// A vector that holds `CilTypeRef` instances (weak references)
pub type CilTypeRefList = Arc<boxcar::Vec<CilTypeRef>>;

/// A smart reference to a `CilType` that automatically handles weak references
/// to prevent circular reference memory leaks while providing a clean API
#[derive(Clone, Debug)]
pub struct CilTypeRef {
    weak_ref: Weak<CilType>,
}

impl CilTypeRef {
    /// Create a new `CilTypeRef` from a strong reference
    pub fn new(strong_ref: &CilTypeRc) -> Self {
        Self {
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    /// Get a strong reference to the type, returning None if the type has been dropped
    #[must_use]
    pub fn upgrade(&self) -> Option<CilTypeRc> {
        self.weak_ref.upgrade()
    }

    /// Get a strong reference to the type
    ///
    /// # Errors
    /// Returns [`crate::Error::MetadataUnavailable`] if the owning catalog has been dropped.
    pub fn get(&self) -> Result<CilTypeRc> {
        self.weak_ref
            .upgrade()
            .ok_or_else(|| MetadataUnavailable("type reference no longer resolvable".to_string()))
    }

    /// Check if the referenced type is still alive
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.weak_ref.strong_count() > 0
    }

    /// Get the token of the referenced type (if still alive)
    #[must_use]
    pub fn token(&self) -> Option<Token> {
        self.upgrade().map(|t| t.token)
    }
}

impl From<CilTypeRc> for CilTypeRef {
    fn from(strong_ref: CilTypeRc) -> Self {
        Self::new(&strong_ref)
    }
}

impl From<&CilTypeRc> for CilTypeRef {
    fn from(strong_ref: &CilTypeRc) -> Self {
        Self::new(strong_ref)
    }
}

/// Resolve every entry of a `CilTypeRefList`, in insertion order
///
/// # Errors
/// Returns [`crate::Error::MetadataUnavailable`] if any entry can no longer be resolved.
pub fn resolve_all(list: &CilTypeRefList) -> Result<Vec<CilTypeRc>> {
    list.iter().map(|(_, entry)| entry.get()).collect()
}

#[allow(missing_docs)]
/// Represents the structural flavor of a type
///
/// Primitive flavors identify the well-known runtime types; the remaining variants describe how
/// a type is built (array, pointer, ...) or which category a declared type falls into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CilFlavor {
    // Base primitive types
    Void,
    Boolean,
    Char,
    I1,
    U1,
    I2,
    U2,
    I4,
    U4,
    I8,
    U8,
    R4,
    R8,
    I,
    U,
    Object,
    String,
    TypedReference,

    // Constructed types
    Array {
        /// The rank (number of dimensions)
        rank: u32,
    },
    Pointer,
    ByRef,
    GenericParameter {
        /// Index in the generic parameters list
        index: u32,
        /// Whether it's a method parameter (true) or type parameter (false)
        method: bool,
    },

    // Type categories
    Class,
    ValueType,
    Interface,

    // Fallback
    Unknown,
}

impl CilFlavor {
    /// Check if this is one of the well-known runtime types
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        self.to_primitive_kind().is_some()
    }

    /// Check if this is a runtime primitive in the reflection sense: the numeric, boolean and
    /// character types plus the native integers. Object, String and Void are excluded.
    #[must_use]
    pub fn is_runtime_primitive(&self) -> bool {
        matches!(
            self,
            CilFlavor::Boolean
                | CilFlavor::Char
                | CilFlavor::I1
                | CilFlavor::U1
                | CilFlavor::I2
                | CilFlavor::U2
                | CilFlavor::I4
                | CilFlavor::U4
                | CilFlavor::I8
                | CilFlavor::U8
                | CilFlavor::R4
                | CilFlavor::R8
                | CilFlavor::I
                | CilFlavor::U
        )
    }

    /// Check if this is a value type
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        self.is_runtime_primitive()
            || matches!(
                self,
                CilFlavor::Void | CilFlavor::TypedReference | CilFlavor::ValueType
            )
    }

    /// Check if this flavor wraps an element type
    #[must_use]
    pub fn has_element(&self) -> bool {
        matches!(
            self,
            CilFlavor::Array { .. } | CilFlavor::Pointer | CilFlavor::ByRef
        )
    }

    /// Try to convert to a `CilPrimitiveKind` if this is a primitive type
    #[must_use]
    pub fn to_primitive_kind(&self) -> Option<CilPrimitiveKind> {
        match self {
            CilFlavor::Void => Some(CilPrimitiveKind::Void),
            CilFlavor::Boolean => Some(CilPrimitiveKind::Boolean),
            CilFlavor::Char => Some(CilPrimitiveKind::Char),
            CilFlavor::I1 => Some(CilPrimitiveKind::I1),
            CilFlavor::U1 => Some(CilPrimitiveKind::U1),
            CilFlavor::I2 => Some(CilPrimitiveKind::I2),
            CilFlavor::U2 => Some(CilPrimitiveKind::U2),
            CilFlavor::I4 => Some(CilPrimitiveKind::I4),
            CilFlavor::U4 => Some(CilPrimitiveKind::U4),
            CilFlavor::I8 => Some(CilPrimitiveKind::I8),
            CilFlavor::U8 => Some(CilPrimitiveKind::U8),
            CilFlavor::R4 => Some(CilPrimitiveKind::R4),
            CilFlavor::R8 => Some(CilPrimitiveKind::R8),
            CilFlavor::I => Some(CilPrimitiveKind::I),
            CilFlavor::U => Some(CilPrimitiveKind::U),
            CilFlavor::Object => Some(CilPrimitiveKind::Object),
            CilFlavor::String => Some(CilPrimitiveKind::String),
            CilFlavor::TypedReference => Some(CilPrimitiveKind::TypedReference),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cil_flavor_is_primitive() {
        assert!(CilFlavor::Void.is_primitive());
        assert!(CilFlavor::Boolean.is_primitive());
        assert!(CilFlavor::I4.is_primitive());
        assert!(CilFlavor::Object.is_primitive());
        assert!(CilFlavor::String.is_primitive());

        assert!(!CilFlavor::Array { rank: 1 }.is_primitive());
        assert!(!CilFlavor::Pointer.is_primitive());
        assert!(!CilFlavor::ByRef.is_primitive());
        assert!(!CilFlavor::Class.is_primitive());
        assert!(!CilFlavor::ValueType.is_primitive());
        assert!(!CilFlavor::Interface.is_primitive());
        assert!(!CilFlavor::Unknown.is_primitive());
    }

    #[test]
    fn test_cil_flavor_runtime_primitive() {
        assert!(CilFlavor::I4.is_runtime_primitive());
        assert!(CilFlavor::Boolean.is_runtime_primitive());
        assert!(CilFlavor::U.is_runtime_primitive());

        assert!(!CilFlavor::Object.is_runtime_primitive());
        assert!(!CilFlavor::String.is_runtime_primitive());
        assert!(!CilFlavor::Void.is_runtime_primitive());
    }

    #[test]
    fn test_cil_flavor_value_type() {
        assert!(CilFlavor::I8.is_value_type());
        assert!(CilFlavor::ValueType.is_value_type());
        assert!(CilFlavor::Void.is_value_type());
        assert!(!CilFlavor::Class.is_value_type());
    }

    #[test]
    fn test_cil_flavor_element() {
        assert!(CilFlavor::Array { rank: 1 }.has_element());
        assert!(CilFlavor::Pointer.has_element());
        assert!(CilFlavor::ByRef.has_element());
        assert!(!CilFlavor::Class.has_element());
    }

    #[test]
    fn test_cil_type_ref_dangling() {
        let dangling = {
            let ty = std::sync::Arc::new(crate::metadata::typesystem::CilType::new(
                Token::new(0x0200_0001),
                None,
                CilFlavor::Class,
                "Ns".to_string(),
                "Gone".to_string(),
                0,
            ));
            CilTypeRef::new(&ty)
        };

        assert!(!dangling.is_valid());
        assert!(dangling.upgrade().is_none());
        assert!(matches!(dangling.get(), Err(MetadataUnavailable(_))));
    }
}
