use strum::{EnumCount, EnumIter};

use crate::{
    file::io::read_le_at,
    metadata::{
        tables::{TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

/// The coded index kinds of ECMA-335 II.24.2.6.
///
/// A coded index packs a table tag into the low bits and the row into the remaining bits, and is
/// stored in 2 bytes unless the largest referenced table needs more.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, EnumIter, EnumCount)]
#[repr(usize)]
pub enum CodedIndexType {
    /// `TypeDef`, `TypeRef`, `TypeSpec`
    TypeDefOrRef,
    /// `Field`, `Param`, `Property`
    HasConstant,
    /// Any table that can carry a custom attribute
    HasCustomAttribute,
    /// `Field`, `Param`
    HasFieldMarshal,
    /// `TypeDef`, `MethodDef`, `Assembly`
    HasDeclSecurity,
    /// `TypeDef`, `TypeRef`, `ModuleRef`, `MethodDef`, `TypeSpec`
    MemberRefParent,
    /// `Event`, `Property`
    HasSemantics,
    /// `MethodDef`, `MemberRef`
    MethodDefOrRef,
    /// `Field`, `MethodDef`
    MemberForwarded,
    /// `File`, `AssemblyRef`, `ExportedType`
    Implementation,
    /// `MethodDef`, `MemberRef` at tags 2 and 3, the other tags are unused
    CustomAttributeType,
    /// `Module`, `ModuleRef`, `AssemblyRef`, `TypeRef`
    ResolutionScope,
    /// `TypeDef`, `MethodDef`
    TypeOrMethodDef,
}

impl CodedIndexType {
    /// The tables this coded index can point into, in tag order.
    ///
    /// `CustomAttributeType` lists only its two used tables, use [`CodedIndexType::table`] to map
    /// a tag.
    #[must_use]
    pub fn tables(&self) -> &'static [TableId] {
        match self {
            CodedIndexType::TypeDefOrRef => {
                &[TableId::TypeDef, TableId::TypeRef, TableId::TypeSpec]
            }
            CodedIndexType::HasConstant => &[TableId::Field, TableId::Param, TableId::Property],
            CodedIndexType::HasCustomAttribute => &[
                TableId::MethodDef,
                TableId::Field,
                TableId::TypeRef,
                TableId::TypeDef,
                TableId::Param,
                TableId::InterfaceImpl,
                TableId::MemberRef,
                TableId::Module,
                TableId::DeclSecurity,
                TableId::Property,
                TableId::Event,
                TableId::StandAloneSig,
                TableId::ModuleRef,
                TableId::TypeSpec,
                TableId::Assembly,
                TableId::AssemblyRef,
                TableId::File,
                TableId::ExportedType,
                TableId::ManifestResource,
                TableId::GenericParam,
                TableId::GenericParamConstraint,
                TableId::MethodSpec,
            ],
            CodedIndexType::HasFieldMarshal => &[TableId::Field, TableId::Param],
            CodedIndexType::HasDeclSecurity => {
                &[TableId::TypeDef, TableId::MethodDef, TableId::Assembly]
            }
            CodedIndexType::MemberRefParent => &[
                TableId::TypeDef,
                TableId::TypeRef,
                TableId::ModuleRef,
                TableId::MethodDef,
                TableId::TypeSpec,
            ],
            CodedIndexType::HasSemantics => &[TableId::Event, TableId::Property],
            CodedIndexType::MethodDefOrRef => &[TableId::MethodDef, TableId::MemberRef],
            CodedIndexType::MemberForwarded => &[TableId::Field, TableId::MethodDef],
            CodedIndexType::Implementation => {
                &[TableId::File, TableId::AssemblyRef, TableId::ExportedType]
            }
            CodedIndexType::CustomAttributeType => &[TableId::MethodDef, TableId::MemberRef],
            CodedIndexType::ResolutionScope => &[
                TableId::Module,
                TableId::ModuleRef,
                TableId::AssemblyRef,
                TableId::TypeRef,
            ],
            CodedIndexType::TypeOrMethodDef => &[TableId::TypeDef, TableId::MethodDef],
        }
    }

    /// Number of low bits holding the table tag
    #[must_use]
    pub fn tag_bits(&self) -> u8 {
        match self {
            CodedIndexType::HasFieldMarshal
            | CodedIndexType::HasSemantics
            | CodedIndexType::MethodDefOrRef
            | CodedIndexType::MemberForwarded
            | CodedIndexType::TypeOrMethodDef => 1,
            CodedIndexType::TypeDefOrRef
            | CodedIndexType::HasConstant
            | CodedIndexType::HasDeclSecurity
            | CodedIndexType::Implementation
            | CodedIndexType::ResolutionScope => 2,
            CodedIndexType::MemberRefParent | CodedIndexType::CustomAttributeType => 3,
            CodedIndexType::HasCustomAttribute => 5,
        }
    }

    /// Map a tag value to its table, `None` for unused tags
    #[must_use]
    pub fn table(&self, tag: u32) -> Option<TableId> {
        match self {
            CodedIndexType::CustomAttributeType => match tag {
                2 => Some(TableId::MethodDef),
                3 => Some(TableId::MemberRef),
                _ => None,
            },
            _ => self.tables().get(tag as usize).copied(),
        }
    }
}

/// A decoded coded index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodedIndex {
    /// The table the index points into
    pub tag: TableId,
    /// The row within `tag`, `0` is a null reference
    pub row: u32,
    /// The token equivalent of `tag` and `row`
    pub token: Token,
}

impl CodedIndex {
    /// Read a coded index of kind `ci_type` at `offset` and advance past it.
    ///
    /// # Errors
    /// Returns an error if the data is too short or the tag is not valid for `ci_type`.
    pub fn read(
        data: &[u8],
        offset: &mut usize,
        info: &TableInfoRef,
        ci_type: CodedIndexType,
    ) -> Result<Self> {
        let coded_index = if info.coded_index_bytes(ci_type) == 4 {
            read_le_at::<u32>(data, offset)?
        } else {
            u32::from(read_le_at::<u16>(data, offset)?)
        };

        let (tag, row) = info.decode_coded_index(coded_index, ci_type)?;
        Ok(CodedIndex::new(tag, row))
    }

    /// Create a coded index from table and row
    #[must_use]
    pub fn new(tag: TableId, row: u32) -> CodedIndex {
        CodedIndex {
            tag,
            row,
            token: Token::from_parts(tag, row),
        }
    }

    /// Whether this index is the null reference
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.row == 0
    }
}
