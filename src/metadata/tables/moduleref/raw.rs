use crate::metadata::token::Token;

/// A row of the `ModuleRef` table.
#[derive(Clone, Debug)]
pub struct ModuleRefRaw {
    /// Row identifier (1-based)
    pub rid: u32,
    /// Metadata token, `0x1A000000 + rid`
    pub token: Token,
    /// Byte offset of this row within the table
    pub offset: usize,
    /// Index into the `#Strings` heap
    pub name: u32,
}
