// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # apiscope
//!
//! Deterministic, human-readable API-surface descriptors for .NET-style type metadata.
//!
//! Given a [`Catalog`] of loaded modules and their types, `apiscope` renders the public shape of
//! a type as indented text: its base chain, the interfaces it declares, its own members and the
//! extension methods other modules contribute to it. Every rendering is a pure function of the
//! catalog and a [`surface::SurfaceConfig`], so identical inputs always produce identical text.
//!
//! ## Quick Start
//!
//! ```rust
//! use apiscope::prelude::*;
//!
//! let catalog = Catalog::new();
//! let corlib = catalog.add_module("System.Private.CoreLib", "System.Private.CoreLib.dll");
//! TypeBuilder::new(&catalog, &corlib).primitive(CilPrimitiveKind::Object)?.build()?;
//! let int32 = TypeBuilder::new(&catalog, &corlib).primitive(CilPrimitiveKind::I4)?.build()?;
//!
//! let app = catalog.add_module("Acme, Version=1.0.0.0", "/opt/acme/Acme.dll");
//! let counter = TypeBuilder::new(&catalog, &app).class("Acme", "Counter").build()?;
//! MethodBuilder::new(&catalog, &counter, "Increment")
//!     .param(ParamBuilder::new(&catalog, &int32).name("by").build())
//!     .build()?;
//!
//! let surface = ApiSurface::new(&catalog);
//! assert_eq!(
//!     surface.full_api(&counter)?,
//!     [
//!         "[class System.Object (instance API)]",
//!         "  [class Acme.Counter (instance API)]",
//!         "    Increment(by: Int32): Void",
//!     ]
//!     .join("\n")
//! );
//! # Ok::<(), apiscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata`] - The [`Catalog`] of modules and type descriptors, their members, and the
//!   relation walks over them ([`metadata::typesystem::hierarchy`])
//! - [`surface`] - Naming, member rendering, extension resolution and the composed views
//! - [`prelude`] - Re-exports of the commonly used types
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Views
//!
//! [`surface::ApiSurface`] provides:
//!
//! - `chain` - bracket lines of the base chain, interfaces, the type and its extensions
//! - `static_api` - the base chain and the type with their static members
//! - `full_api` - the base chain, interfaces and the type with their instance members, plus every
//!   applicable extension and its methods
//! - `extensions_view` - only the applicable extensions
//! - `modules`, `namespaces`, `namespace_view` - catalog-level listings

#[macro_use]
pub(crate) mod error;

pub mod metadata;
pub mod prelude;
pub mod surface;

#[cfg(test)]
mod test;

pub use error::Error;
pub use metadata::catalog::Catalog;

/// `apiscope` Result type
pub type Result<T> = std::result::Result<T, Error>;
