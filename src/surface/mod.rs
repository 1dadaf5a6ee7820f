//! Textual API-surface rendering.
//!
//! The submodules build on each other:
//!
//! - [`names`] - type and member names, parameter lists
//! - [`members`] - one signature per declared member
//! - [`extensions`] - which extension methods apply to a type
//! - [`composer`] - the indented multi-line views, through [`ApiSurface`]
//!
//! All rendering is read-only over a populated [`crate::Catalog`].

pub mod composer;
pub mod config;
pub mod extensions;
pub mod members;
pub mod names;

pub use composer::ApiSurface;
pub use config::{ParameterLayout, SurfaceConfig};
