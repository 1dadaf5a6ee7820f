use thiserror::Error;

use crate::metadata::token::Token;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Failures are always scoped to the single request that triggered them: a broken reference
/// while rendering one type never invalidates the [`crate::Catalog`] or other requests.
///
/// # Error Categories
///
/// ## Catalog Errors
/// - [`Error::MetadataUnavailable`] - A descriptor or module can no longer be reached
/// - [`Error::TypeNotFound`] - Requested token is not registered
/// - [`Error::TypeError`] - Invalid type construction (e.g. wrong generic arity)
/// - [`Error::Malformed`] - Inconsistent builder input
///
/// ## Traversal Errors
/// - [`Error::RecursionLimit`] - A hierarchy walk exceeded the configured depth
///
/// Note that an unclassifiable type is *not* an error (it renders as `unknown`), and neither is
/// an extension-tagged method without a receiver parameter (it is simply not a candidate).
///
/// # Examples
///
/// ```rust
/// use apiscope::{Catalog, Error, metadata::token::Token};
///
/// let catalog = Catalog::new();
/// match catalog.get(&Token::new(0x0200_0001)) {
///     Ok(ty) => println!("found {}", ty.name),
///     Err(Error::TypeNotFound(token)) => println!("no type {token}"),
///     Err(e) => println!("other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The metadata source can not provide a requested module, type or member.
    ///
    /// Raised when a weak descriptor reference can no longer be upgraded or a module identity is
    /// unknown to the catalog. Aborts only the rendering request that hit it.
    #[error("Metadata unavailable - {0}")]
    MetadataUnavailable(String),

    /// The input is inconsistent and could not be turned into a descriptor.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Failed to find type in the catalog.
    ///
    /// The associated [`Token`] identifies which type was not found.
    #[error("Failed to find type in Catalog - {0}")]
    TypeNotFound(Token),

    /// General error during type construction.
    ///
    /// Covers requests such as instantiating a non-generic type or supplying the wrong number
    /// of generic arguments.
    #[error("{0}")]
    TypeError(String),

    /// Recursion limit reached.
    ///
    /// Base, interface and nesting walks are bounded. This error indicates a chain deeper than
    /// the configured limit, which in practice means the source contains a cycle.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),
}
