//! Type metadata: the catalog of loaded modules and the descriptors of their types and members.
//!
//! Everything in this module is the read side of API-surface rendering. A host populates a
//! [`catalog::Catalog`] once, after which all descriptors are treated as immutable.
//!
//! # Key Components
//!
//! - [`catalog`] - The explicit metadata snapshot queried by every renderer
//! - [`module`] - Loaded modules (identity + origin path)
//! - [`typesystem`] - Type descriptors, classification and hierarchy walks
//! - [`members`] - Methods, constructors, fields, properties, events and parameters
//! - [`token`] - Metadata tokens identifying every descriptor

/// Implementation of the metadata snapshot
pub mod catalog;
/// Implementation of member descriptors
pub mod members;
/// Implementation of loaded modules
pub mod module;
/// Commonly used metadata token type
pub mod token;
/// Implementation of the type system
pub mod typesystem;
