//! # apiscope Prelude
//!
//! Re-exports of the types needed to populate a [`Catalog`] and render views of it.
//!
//! ```rust
//! use apiscope::prelude::*;
//!
//! let catalog = Catalog::new();
//! let surface = ApiSurface::with_config(&catalog, SurfaceConfig::compact());
//! assert_eq!(surface.modules(), "");
//! ```

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

pub use crate::{Catalog, Error, Result};

// ================================================================================================
// Type System
// ================================================================================================

pub use crate::metadata::{
    module::{Module, ModuleRc},
    token::{Token, TokenTable},
    typesystem::{
        hierarchy::DEFAULT_MAX_DEPTH, CilFlavor, CilPrimitive, CilPrimitiveKind, CilType,
        CilTypeRc, CilTypeRef, TypeAttributes, TypeBuilder, TypeKind,
        COMPILER_GENERATED_ATTRIBUTE, EXTENSION_ATTRIBUTE,
    },
};

// ================================================================================================
// Members
// ================================================================================================

pub use crate::metadata::members::{
    EventBuilder, FieldAttributes, FieldBuilder, MemberAccess, MemberScope, MethodAccessFlags,
    MethodBuilder, MethodModifiers, MethodRc, ParamBuilder, PropertyBuilder,
};

// ================================================================================================
// Rendering
// ================================================================================================

pub use crate::surface::{ApiSurface, ParameterLayout, SurfaceConfig};
