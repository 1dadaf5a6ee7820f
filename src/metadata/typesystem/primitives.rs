use std::fmt;

use crate::metadata::typesystem::CilFlavor;

/// Type for raw constant data (field literals and parameter defaults)
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CilPrimitiveData {
    /// No data (for void, null, etc.)
    #[default]
    None,
    /// Boolean value
    Boolean(bool),
    /// Character value
    Char(char),
    /// 8-bit signed integer
    I1(i8),
    /// 8-bit unsigned integer
    U1(u8),
    /// 16-bit signed integer
    I2(i16),
    /// 16-bit unsigned integer
    U2(u16),
    /// 32-bit signed integer
    I4(i32),
    /// 32-bit unsigned integer
    U4(u32),
    /// 64-bit signed integer
    I8(i64),
    /// 64-bit unsigned integer
    U8(u64),
    /// 32-bit floating point
    R4(f32),
    /// 64-bit floating point
    R8(f64),
    /// String value
    String(String),
}

impl CilPrimitiveData {
    /// Try to convert to a string value
    #[must_use]
    pub fn as_string(&self) -> Option<String> {
        match self {
            CilPrimitiveData::None => None,
            CilPrimitiveData::String(value) => Some(value.clone()),
            CilPrimitiveData::Boolean(value) => Some(value.to_string()),
            CilPrimitiveData::Char(value) => Some(value.to_string()),
            CilPrimitiveData::I1(value) => Some(value.to_string()),
            CilPrimitiveData::U1(value) => Some(value.to_string()),
            CilPrimitiveData::I2(value) => Some(value.to_string()),
            CilPrimitiveData::U2(value) => Some(value.to_string()),
            CilPrimitiveData::I4(value) => Some(value.to_string()),
            CilPrimitiveData::U4(value) => Some(value.to_string()),
            CilPrimitiveData::I8(value) => Some(value.to_string()),
            CilPrimitiveData::U8(value) => Some(value.to_string()),
            CilPrimitiveData::R4(value) => Some(value.to_string()),
            CilPrimitiveData::R8(value) => Some(value.to_string()),
        }
    }
}

/// The well-known runtime types, plus `Null` for explicit null constants
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CilPrimitiveKind {
    /// System.Void - represents no value
    Void,
    /// System.Boolean - true/false value
    Boolean,
    /// System.Char - Unicode 16-bit character
    Char,
    /// System.SByte - signed 8-bit integer
    I1,
    /// System.Byte - unsigned 8-bit integer
    U1,
    /// System.Int16 - signed 16-bit integer
    I2,
    /// System.UInt16 - unsigned 16-bit integer
    U2,
    /// System.Int32 - signed 32-bit integer
    I4,
    /// System.UInt32 - unsigned 32-bit integer
    U4,
    /// System.Int64 - signed 64-bit integer
    I8,
    /// System.UInt64 - unsigned 64-bit integer
    U8,
    /// System.Single - 32-bit floating point
    R4,
    /// System.Double - 64-bit floating point
    R8,
    /// System.IntPtr - native sized signed integer
    I,
    /// System.UIntPtr - native sized unsigned integer
    U,
    /// System.Object - base class for all reference types
    Object,
    /// System.String - immutable string of Unicode characters
    String,
    /// System.TypedReference - type-safe pointer (used by compiler)
    TypedReference,
    /// Special value for null reference in constants
    Null,
}

impl CilPrimitiveKind {
    /// Get the namespace of this type
    #[must_use]
    pub fn namespace(&self) -> &'static str {
        match self {
            CilPrimitiveKind::Null => "",
            _ => "System",
        }
    }

    /// Get the short name (without namespace)
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CilPrimitiveKind::Void => "Void",
            CilPrimitiveKind::Boolean => "Boolean",
            CilPrimitiveKind::Char => "Char",
            CilPrimitiveKind::I1 => "SByte",
            CilPrimitiveKind::U1 => "Byte",
            CilPrimitiveKind::I2 => "Int16",
            CilPrimitiveKind::U2 => "UInt16",
            CilPrimitiveKind::I4 => "Int32",
            CilPrimitiveKind::U4 => "UInt32",
            CilPrimitiveKind::I8 => "Int64",
            CilPrimitiveKind::U8 => "UInt64",
            CilPrimitiveKind::R4 => "Single",
            CilPrimitiveKind::R8 => "Double",
            CilPrimitiveKind::I => "IntPtr",
            CilPrimitiveKind::U => "UIntPtr",
            CilPrimitiveKind::Object => "Object",
            CilPrimitiveKind::String => "String",
            CilPrimitiveKind::TypedReference => "TypedReference",
            CilPrimitiveKind::Null => "Null",
        }
    }

    /// Convert to `CilFlavor`
    #[must_use]
    pub fn to_flavor(&self) -> CilFlavor {
        match self {
            CilPrimitiveKind::Void => CilFlavor::Void,
            CilPrimitiveKind::Boolean => CilFlavor::Boolean,
            CilPrimitiveKind::Char => CilFlavor::Char,
            CilPrimitiveKind::I1 => CilFlavor::I1,
            CilPrimitiveKind::U1 => CilFlavor::U1,
            CilPrimitiveKind::I2 => CilFlavor::I2,
            CilPrimitiveKind::U2 => CilFlavor::U2,
            CilPrimitiveKind::I4 => CilFlavor::I4,
            CilPrimitiveKind::U4 => CilFlavor::U4,
            CilPrimitiveKind::I8 => CilFlavor::I8,
            CilPrimitiveKind::U8 => CilFlavor::U8,
            CilPrimitiveKind::R4 => CilFlavor::R4,
            CilPrimitiveKind::R8 => CilFlavor::R8,
            CilPrimitiveKind::I => CilFlavor::I,
            CilPrimitiveKind::U => CilFlavor::U,
            CilPrimitiveKind::Object => CilFlavor::Object,
            CilPrimitiveKind::String => CilFlavor::String,
            CilPrimitiveKind::TypedReference => CilFlavor::TypedReference,
            CilPrimitiveKind::Null => CilFlavor::Unknown,
        }
    }
}

/// A constant value as stored for literal fields and optional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CilPrimitive {
    /// The type of primitive
    pub kind: CilPrimitiveKind,
    /// The actual data (if available)
    pub data: CilPrimitiveData,
}

impl CilPrimitive {
    /// Create a primitive with specific data
    ///
    /// ## Arguments
    /// * `kind` - Set the kind of primitive
    /// * `data` - Set the data for the primitive
    #[must_use]
    pub fn with_data(kind: CilPrimitiveKind, data: CilPrimitiveData) -> Self {
        CilPrimitive { kind, data }
    }

    /// Create a boolean primitive
    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self::with_data(CilPrimitiveKind::Boolean, CilPrimitiveData::Boolean(value))
    }

    /// Create a character primitive
    #[must_use]
    pub fn char(value: char) -> Self {
        Self::with_data(CilPrimitiveKind::Char, CilPrimitiveData::Char(value))
    }

    /// Create an i4 primitive
    #[must_use]
    pub fn i4(value: i32) -> Self {
        Self::with_data(CilPrimitiveKind::I4, CilPrimitiveData::I4(value))
    }

    /// Create an i8 primitive
    #[must_use]
    pub fn i8(value: i64) -> Self {
        Self::with_data(CilPrimitiveKind::I8, CilPrimitiveData::I8(value))
    }

    /// Create an r8 primitive
    #[must_use]
    pub fn r8(value: f64) -> Self {
        Self::with_data(CilPrimitiveKind::R8, CilPrimitiveData::R8(value))
    }

    /// Create a string primitive
    #[must_use]
    pub fn string(value: &str) -> Self {
        Self::with_data(
            CilPrimitiveKind::String,
            CilPrimitiveData::String(value.to_string()),
        )
    }

    /// Create a null primitive
    #[must_use]
    pub fn null() -> Self {
        Self::with_data(CilPrimitiveKind::Null, CilPrimitiveData::None)
    }

    /// Is this an explicit null constant
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.kind == CilPrimitiveKind::Null
    }
}

/// Renders the constant the way it appears as a default value: `Null` for an explicit null,
/// strings quoted, everything else as its literal value.
impl fmt::Display for CilPrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "Null");
        }

        match &self.data {
            CilPrimitiveData::None => write!(f, "{}", self.kind.name()),
            CilPrimitiveData::String(value) => write!(f, "\"{}\"", value),
            CilPrimitiveData::Char(value) => write!(f, "'{}'", value),
            other => write!(f, "{}", other.as_string().unwrap_or_default()),
        }
    }
}

impl From<bool> for CilPrimitive {
    fn from(value: bool) -> Self {
        CilPrimitive::boolean(value)
    }
}

impl From<i32> for CilPrimitive {
    fn from(value: i32) -> Self {
        CilPrimitive::i4(value)
    }
}

impl From<i64> for CilPrimitive {
    fn from(value: i64) -> Self {
        CilPrimitive::i8(value)
    }
}

impl From<f64> for CilPrimitive {
    fn from(value: f64) -> Self {
        CilPrimitive::r8(value)
    }
}

impl From<&str> for CilPrimitive {
    fn from(value: &str) -> Self {
        CilPrimitive::string(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_display() {
        assert_eq!(CilPrimitive::null().to_string(), "Null");
        assert_eq!(CilPrimitive::string("abc").to_string(), "\"abc\"");
        assert_eq!(CilPrimitive::string("").to_string(), "\"\"");
        assert_eq!(CilPrimitive::i4(5).to_string(), "5");
        assert_eq!(CilPrimitive::i8(-12).to_string(), "-12");
        assert_eq!(CilPrimitive::boolean(true).to_string(), "true");
        assert_eq!(CilPrimitive::char('x').to_string(), "'x'");
        assert_eq!(CilPrimitive::r8(1.5).to_string(), "1.5");
    }

    #[test]
    fn test_primitive_from() {
        assert_eq!(CilPrimitive::from(7), CilPrimitive::i4(7));
        assert_eq!(CilPrimitive::from("s"), CilPrimitive::string("s"));
        assert!(CilPrimitive::null().is_null());
        assert!(!CilPrimitive::from(false).is_null());
    }

    #[test]
    fn test_primitive_kind_names() {
        assert_eq!(CilPrimitiveKind::I4.name(), "Int32");
        assert_eq!(CilPrimitiveKind::U1.name(), "Byte");
        assert_eq!(CilPrimitiveKind::I4.namespace(), "System");
        assert_eq!(CilPrimitiveKind::Null.namespace(), "");
        assert_eq!(CilPrimitiveKind::R8.to_flavor(), CilFlavor::R8);
        assert_eq!(CilPrimitiveKind::Null.to_flavor(), CilFlavor::Unknown);
    }

    #[test]
    fn test_primitive_data_conversion() {
        assert_eq!(CilPrimitiveData::None.as_string(), None);
        assert_eq!(
            CilPrimitiveData::String("v".to_string()).as_string(),
            Some("v".to_string())
        );
    }
}
