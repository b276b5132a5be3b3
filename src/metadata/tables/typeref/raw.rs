use crate::metadata::{tables::CodedIndex, token::Token};

/// A row of the `TypeRef` table, with heap indexes left unresolved.
///
/// For a nested type the resolution scope points at the `TypeRef` of the enclosing type and the
/// namespace is empty.
#[derive(Clone, Debug)]
pub struct TypeRefRaw {
    /// Row identifier (1-based)
    pub rid: u32,
    /// Metadata token, `0x01000000 + rid`
    pub token: Token,
    /// Byte offset of this row within the table
    pub offset: usize,
    /// `ResolutionScope` coded index
    pub resolution_scope: CodedIndex,
    /// Index into the `#Strings` heap
    pub type_name: u32,
    /// Index into the `#Strings` heap
    pub type_namespace: u32,
}
