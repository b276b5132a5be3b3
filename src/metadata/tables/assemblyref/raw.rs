use crate::metadata::token::Token;

/// A row of the `AssemblyRef` table, with heap indexes left unresolved.
#[derive(Clone, Debug)]
pub struct AssemblyRefRaw {
    /// Row identifier (1-based)
    pub rid: u32,
    /// Metadata token, `0x23000000 + rid`
    pub token: Token,
    /// Byte offset of this row within the table
    pub offset: usize,
    /// Major version
    pub major_version: u32,
    /// Minor version
    pub minor_version: u32,
    /// Build number
    pub build_number: u32,
    /// Revision number
    pub revision_number: u32,
    /// `AssemblyFlags` bitmask
    pub flags: u32,
    /// Index into the `#Blob` heap
    pub public_key_or_token: u32,
    /// Index into the `#Strings` heap, the simple assembly name
    pub name: u32,
    /// Index into the `#Strings` heap
    pub culture: u32,
    /// Index into the `#Blob` heap
    pub hash_value: u32,
}
