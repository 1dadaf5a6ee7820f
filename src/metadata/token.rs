//! Metadata tokens identifying every descriptor in a [`crate::Catalog`].
//!
//! Tokens follow the ECMA-335 layout: the high byte names the table a descriptor belongs to,
//! the low 24 bits are its row. Descriptors that never existed in a physical table (arrays,
//! generic instances, generic parameters) get rows in the `TypeSpec` / `GenericParam` tables.

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::atomic::{AtomicU32, Ordering},
};

use strum::{EnumCount, EnumIter, IntoEnumIterator};

/// The largest row a token can address
pub const MAX_ROW: u32 = 0x00FF_FFFF;

/// A metadata token representing a reference to a descriptor.
///
/// Tokens in .NET metadata consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the table type
/// - The low 24 bits (bits 0-23) indicate the row index within that table
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(pub u32);

impl Token {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token from a table and a row; `row` must not exceed [`MAX_ROW`]
    #[must_use]
    pub fn from_parts(table: TokenTable, row: u32) -> Self {
        debug_assert!(row <= MAX_ROW, "row {row:#x} doesn't fit into a token");
        Token(((table as u32) << 24) | (row & MAX_ROW))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & MAX_ROW
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

/// The tables a catalog hands out tokens for
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, EnumCount)]
#[repr(u8)]
pub enum TokenTable {
    /// Loaded modules
    Module = 0x00,
    /// Declared types
    TypeDef = 0x02,
    /// Fields
    Field = 0x04,
    /// Methods and constructors
    MethodDef = 0x06,
    /// Parameters
    Param = 0x08,
    /// Events
    Event = 0x14,
    /// Properties
    Property = 0x17,
    /// Constructed types (arrays, pointers, by-ref, generic instances)
    TypeSpec = 0x1B,
    /// Generic type and method parameters
    GenericParam = 0x2A,
}

/// Hands out sequential, never reused tokens per [`TokenTable`]
pub struct TokenGenerator {
    next_rows: [AtomicU32; TokenTable::COUNT],
}

impl TokenGenerator {
    /// Create a generator whose first row in every table is 1
    #[must_use]
    pub fn new() -> Self {
        TokenGenerator {
            next_rows: std::array::from_fn(|_| AtomicU32::new(1)),
        }
    }

    /// Allocate the next token in `table`.
    ///
    /// A table has [`MAX_ROW`] rows. Running out of them trips a debug assertion; release builds
    /// hand out the last row again instead of wrapping around to rows that are already taken.
    pub fn next(&self, table: TokenTable) -> Token {
        let slot = TokenTable::iter()
            .position(|candidate| candidate == table)
            .unwrap_or(0);
        let row = match self.next_rows[slot].fetch_update(
            Ordering::Relaxed,
            Ordering::Relaxed,
            |row| (row <= MAX_ROW).then_some(row + 1),
        ) {
            Ok(row) => row,
            Err(_) => {
                // Out of rows - this should never happen in practice
                debug_assert!(false, "ran out of rows in table {table:?}");
                MAX_ROW
            }
        };
        Token::from_parts(table, row)
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_token_table() {
        let token = Token(0x06000001);
        assert_eq!(token.table(), 0x06);

        let token2 = Token(0x02000005);
        assert_eq!(token2.table(), 0x02);

        let token3 = Token(0x00000000);
        assert_eq!(token3.table(), 0x00);
    }

    #[test]
    fn test_token_row() {
        let token = Token(0x06000001);
        assert_eq!(token.row(), 1);

        let token3 = Token(0x06FFFFFF);
        assert_eq!(token3.row(), 0x00FFFFFF);
    }

    #[test]
    fn test_token_from_parts() {
        let token = Token::from_parts(TokenTable::TypeSpec, 7);
        assert_eq!(token.value(), 0x1B000007);
        assert_eq!(token.table(), TokenTable::TypeSpec as u8);

        let last = Token::from_parts(TokenTable::Field, MAX_ROW);
        assert_eq!(last.row(), MAX_ROW);
        assert_eq!(last.table(), TokenTable::Field as u8);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "doesn't fit into a token")]
    fn test_token_from_parts_rejects_wide_row() {
        let _ = Token::from_parts(TokenTable::Field, MAX_ROW + 1);
    }

    #[test]
    fn test_generator_never_wraps() {
        let generator = TokenGenerator::new();
        let slot = TokenTable::iter()
            .position(|table| table == TokenTable::Field)
            .unwrap();
        generator.next_rows[slot].store(MAX_ROW - 1, Ordering::Relaxed);

        assert_eq!(generator.next(TokenTable::Field).row(), MAX_ROW - 1);
        assert_eq!(generator.next(TokenTable::Field).row(), MAX_ROW);
        assert_eq!(generator.next(TokenTable::TypeDef).row(), 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "ran out of rows")]
    fn test_generator_exhaustion_is_reported() {
        let generator = TokenGenerator::new();
        let slot = TokenTable::iter()
            .position(|table| table == TokenTable::Field)
            .unwrap();
        generator.next_rows[slot].store(MAX_ROW, Ordering::Relaxed);

        assert_eq!(generator.next(TokenTable::Field).row(), MAX_ROW);
        let _ = generator.next(TokenTable::Field);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_generator_exhaustion_saturates() {
        let generator = TokenGenerator::new();
        let slot = TokenTable::iter()
            .position(|table| table == TokenTable::Field)
            .unwrap();
        generator.next_rows[slot].store(MAX_ROW, Ordering::Relaxed);

        assert_eq!(generator.next(TokenTable::Field).row(), MAX_ROW);
        let last = Token::from_parts(TokenTable::Field, MAX_ROW);
        assert_eq!(generator.next(TokenTable::Field), last);
    }

    #[test]
    fn test_token_display_and_debug() {
        let token = Token(0x06000001);
        assert_eq!(format!("{}", token), "0x06000001");

        let debug_str = format!("{:?}", token);
        assert!(debug_str.contains("Token(0x06000001"));
        assert!(debug_str.contains("table: 0x06"));
        assert!(debug_str.contains("row: 1"));
    }

    #[test]
    fn test_token_ordering_and_hash() {
        let token1 = Token(0x06000001);
        let token2 = Token(0x06000002);
        let token3 = Token(0x07000001);

        assert!(token1 < token2);
        assert!(token2 < token3);

        let mut map = HashMap::new();
        map.insert(token1, "first");
        map.insert(token2, "second");
        assert_eq!(map.get(&Token(0x06000001)), Some(&"first"));
    }

    #[test]
    fn test_generator_is_sequential_per_table() {
        let generator = TokenGenerator::new();

        assert_eq!(generator.next(TokenTable::TypeDef), Token(0x02000001));
        assert_eq!(generator.next(TokenTable::TypeDef), Token(0x02000002));
        assert_eq!(generator.next(TokenTable::MethodDef), Token(0x06000001));
        assert_eq!(generator.next(TokenTable::TypeSpec), Token(0x1B000001));
        assert_eq!(generator.next(TokenTable::TypeDef), Token(0x02000003));
    }
}
