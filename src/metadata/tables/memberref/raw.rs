use crate::metadata::{tables::CodedIndex, token::Token};

/// A row of the `MemberRef` table, with heap indexes left unresolved.
#[derive(Clone, Debug)]
pub struct MemberRefRaw {
    /// Row identifier (1-based)
    pub rid: u32,
    /// Metadata token, `0x0A000000 + rid`
    pub token: Token,
    /// Byte offset of this row within the table
    pub offset: usize,
    /// `MemberRefParent` coded index of the declaring type
    pub class: CodedIndex,
    /// Index into the `#Strings` heap
    pub name: u32,
    /// Index into the `#Blob` heap
    pub signature: u32,
}
