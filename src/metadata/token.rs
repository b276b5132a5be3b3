//! Metadata tokens.

use std::fmt;

use crate::metadata::tables::TableId;

/// A metadata token representing a reference to a metadata table entry.
///
/// Tokens in .NET metadata consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the table type
/// - The low 24 bits (bits 0-23) indicate the row index within that table
///
/// Row indexes are 1-based, a row of `0` is the null reference of that table.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub u32);

impl Token {
    /// Create a token from its raw value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Create a token for `row` in `table`
    #[must_use]
    pub fn from_parts(table: TableId, row: u32) -> Self {
        Token(((table as u32) << 24) | (row & 0x00FF_FFFF))
    }

    /// The raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// The table byte of the token
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// The row index of the token
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Whether this token points at `table`
    #[must_use]
    pub fn is_table(&self, table: TableId) -> bool {
        self.table() == table as u8
    }

    /// Whether the row index is zero
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.row() == 0
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts() {
        let token = Token::from_parts(TableId::MethodDef, 1);
        assert_eq!(token.value(), 0x0600_0001);
        assert_eq!(token.table(), 0x06);
        assert_eq!(token.row(), 1);
        assert!(token.is_table(TableId::MethodDef));
        assert!(!token.is_table(TableId::TypeDef));

        let token = Token::new(0x06FF_FFFF);
        assert_eq!(token.row(), 0x00FF_FFFF);
    }

    #[test]
    fn null() {
        assert!(Token::new(0).is_null());
        assert!(Token::from_parts(TableId::TypeRef, 0).is_null());
        assert!(!Token::new(0x0100_0001).is_null());
    }

    #[test]
    fn formatting() {
        let token = Token(0x0200_0005);
        assert_eq!(format!("{}", token), "0x02000005");

        let debug_str = format!("{:?}", token);
        assert!(debug_str.contains("Token(0x02000005"));
        assert!(debug_str.contains("table: 0x02"));
        assert!(debug_str.contains("row: 5"));

        let raw: u32 = token.into();
        assert_eq!(Token::from(raw), token);
    }
}
