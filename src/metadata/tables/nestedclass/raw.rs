use crate::metadata::token::Token;

/// A row of the `NestedClass` table.
#[derive(Clone, Debug)]
pub struct NestedClassRaw {
    /// Row identifier (1-based)
    pub rid: u32,
    /// Metadata token, `0x29000000 + rid`
    pub token: Token,
    /// Byte offset of this row within the table
    pub offset: usize,
    /// `TypeDef` row of the nested type
    pub nested_class: u32,
    /// `TypeDef` row of the enclosing type
    pub enclosing_class: u32,
}
