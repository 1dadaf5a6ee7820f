//! Flag constants and well-known attribute names for type descriptors.

#[allow(non_snake_case)]
/// All possible flags for `TypeAttributes`
pub mod TypeAttributes {
    /// Use this mask to retrieve visibility information. These 3 bits contain one of the
    /// following values:
    pub const VISIBILITY_MASK: u32 = 0x0000_0007;
    /// Class has no public scope
    pub const NOT_PUBLIC: u32 = 0x0000_0000;
    /// Class has public scope
    pub const PUBLIC: u32 = 0x0000_0001;
    /// Class is nested with public visibility
    pub const NESTED_PUBLIC: u32 = 0x0000_0002;
    /// Class is nested with private visibility
    pub const NESTED_PRIVATE: u32 = 0x0000_0003;
    /// Class is nested with family visibility
    pub const NESTED_FAMILY: u32 = 0x0000_0004;
    /// Class is nested with assembly visibility
    pub const NESTED_ASSEMBLY: u32 = 0x0000_0005;
    /// Class is nested with family and assembly visibility
    pub const NESTED_FAM_AND_ASSEM: u32 = 0x0000_0006;
    /// Class is nested with family or assemblyvisibility
    pub const NESTED_FAM_OR_ASSEM: u32 = 0x0000_0007;
    //
    /// Use this mask to retrieve class semantics information. This bit contains one of the
    /// following values:
    pub const CLASS_SEMANTICS_MASK: u32 = 0x0000_0020;
    /// Type is a class
    pub const CLASS: u32 = 0x0000_0000;
    /// Type is an interface
    pub const INTERFACE: u32 = 0x0000_0020;
    /// Class is abstract
    pub const ABSTRACT: u32 = 0x0000_0080;
    /// Class cannot be extended
    pub const SEALED: u32 = 0x0000_0100;
    /// Class name is special
    pub const SPECIAL_NAME: u32 = 0x0000_0400;
}

/// Marks types and methods that can extend other types without modifying them
pub const EXTENSION_ATTRIBUTE: &str = "System.Runtime.CompilerServices.ExtensionAttribute";

/// Marks types synthesized by a compiler rather than authored
pub const COMPILER_GENERATED_ATTRIBUTE: &str =
    "System.Runtime.CompilerServices.CompilerGeneratedAttribute";
