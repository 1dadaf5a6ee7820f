//! Loaded modules of a [`crate::Catalog`].
//!
//! A module is the unit types are declared in: it carries the identity string a host would
//! show (e.g. `Acme.Core, Version=1.0.0.0`) and the path it was loaded from. Modules don't own
//! their types; the catalog indexes types per module instead, which keeps `CilType -> Module`
//! the only direction of reference.

use std::{path::Path, sync::Arc};

use crate::metadata::token::Token;

/// A reference to a loaded `Module`
pub type ModuleRc = Arc<Module>;

/// A module loaded into the metadata source
#[derive(Debug)]
pub struct Module {
    /// Token
    pub token: Token,
    /// Identity string, e.g. `Acme.Core, Version=1.0.0.0`
    pub identity: String,
    /// Where the module was loaded from
    pub path: String,
}

impl Module {
    /// Create a new module descriptor
    ///
    /// ## Arguments
    /// * `token`    - The token assigned by the catalog
    /// * `identity` - The module identity string
    /// * `path`     - The origin path of the module
    #[must_use]
    pub fn new(token: Token, identity: &str, path: &str) -> Self {
        Module {
            token,
            identity: identity.to_string(),
            path: path.to_string(),
        }
    }

    /// The file name component of the origin path, or the whole path if it has none
    #[must_use]
    pub fn file_name(&self) -> String {
        Path::new(&self.path).file_name().map_or_else(
            || self.path.clone(),
            |name| name.to_string_lossy().to_string(),
        )
    }
}
