//! Column layout of every metadata table (ECMA-335 II.22).
//!
//! Tables are stored back to back in the `#~` stream, so locating any one table requires the
//! row size of all tables before it, including the ones this crate never reads.

use crate::metadata::tables::{CodedIndexType, TableId};

/// One column of a metadata table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    /// Constant width integer, in bytes
    Fixed(u8),
    /// Index into the `#Strings` heap
    Str,
    /// Index into the `#GUID` heap
    Guid,
    /// Index into the `#Blob` heap
    Blob,
    /// Simple index into another table
    Table(TableId),
    /// Coded index
    Coded(CodedIndexType),
}

use Column::{Blob, Coded, Fixed, Guid, Str, Table};
use CodedIndexType as C;

impl TableId {
    /// The columns of this table, in storage order
    #[must_use]
    pub fn columns(self) -> &'static [Column] {
        match self {
            TableId::Module => &[Fixed(2), Str, Guid, Guid, Guid],
            TableId::TypeRef => &[Coded(C::ResolutionScope), Str, Str],
            TableId::TypeDef => &[
                Fixed(4),
                Str,
                Str,
                Coded(C::TypeDefOrRef),
                Table(TableId::Field),
                Table(TableId::MethodDef),
            ],
            TableId::FieldPtr => &[Table(TableId::Field)],
            TableId::Field => &[Fixed(2), Str, Blob],
            TableId::MethodPtr => &[Table(TableId::MethodDef)],
            TableId::MethodDef => &[
                Fixed(4),
                Fixed(2),
                Fixed(2),
                Str,
                Blob,
                Table(TableId::Param),
            ],
            TableId::ParamPtr => &[Table(TableId::Param)],
            TableId::Param => &[Fixed(2), Fixed(2), Str],
            TableId::InterfaceImpl => &[Table(TableId::TypeDef), Coded(C::TypeDefOrRef)],
            TableId::MemberRef => &[Coded(C::MemberRefParent), Str, Blob],
            TableId::Constant => &[Fixed(2), Coded(C::HasConstant), Blob],
            TableId::CustomAttribute => &[
                Coded(C::HasCustomAttribute),
                Coded(C::CustomAttributeType),
                Blob,
            ],
            TableId::FieldMarshal => &[Coded(C::HasFieldMarshal), Blob],
            TableId::DeclSecurity => &[Fixed(2), Coded(C::HasDeclSecurity), Blob],
            TableId::ClassLayout => &[Fixed(2), Fixed(4), Table(TableId::TypeDef)],
            TableId::FieldLayout => &[Fixed(4), Table(TableId::Field)],
            TableId::StandAloneSig => &[Blob],
            TableId::EventMap => &[Table(TableId::TypeDef), Table(TableId::Event)],
            TableId::EventPtr => &[Table(TableId::Event)],
            TableId::Event => &[Fixed(2), Str, Coded(C::TypeDefOrRef)],
            TableId::PropertyMap => &[Table(TableId::TypeDef), Table(TableId::Property)],
            TableId::PropertyPtr => &[Table(TableId::Property)],
            TableId::Property => &[Fixed(2), Str, Blob],
            TableId::MethodSemantics => &[
                Fixed(2),
                Table(TableId::MethodDef),
                Coded(C::HasSemantics),
            ],
            TableId::MethodImpl => &[
                Table(TableId::TypeDef),
                Coded(C::MethodDefOrRef),
                Coded(C::MethodDefOrRef),
            ],
            TableId::ModuleRef => &[Str],
            TableId::TypeSpec => &[Blob],
            TableId::ImplMap => &[
                Fixed(2),
                Coded(C::MemberForwarded),
                Str,
                Table(TableId::ModuleRef),
            ],
            TableId::FieldRVA => &[Fixed(4), Table(TableId::Field)],
            TableId::EncLog => &[Fixed(4), Fixed(4)],
            TableId::EncMap => &[Fixed(4)],
            TableId::Assembly => &[
                Fixed(4),
                Fixed(2),
                Fixed(2),
                Fixed(2),
                Fixed(2),
                Fixed(4),
                Blob,
                Str,
                Str,
            ],
            TableId::AssemblyProcessor => &[Fixed(4)],
            TableId::AssemblyOS => &[Fixed(4), Fixed(4), Fixed(4)],
            TableId::AssemblyRef => &[
                Fixed(2),
                Fixed(2),
                Fixed(2),
                Fixed(2),
                Fixed(4),
                Blob,
                Str,
                Str,
                Blob,
            ],
            TableId::AssemblyRefProcessor => &[Fixed(4), Table(TableId::AssemblyRef)],
            TableId::AssemblyRefOS => &[
                Fixed(4),
                Fixed(4),
                Fixed(4),
                Table(TableId::AssemblyRef),
            ],
            TableId::File => &[Fixed(4), Str, Blob],
            TableId::ExportedType => &[
                Fixed(4),
                Fixed(4),
                Str,
                Str,
                Coded(C::Implementation),
            ],
            TableId::ManifestResource => &[Fixed(4), Fixed(4), Str, Coded(C::Implementation)],
            TableId::NestedClass => &[Table(TableId::TypeDef), Table(TableId::TypeDef)],
            TableId::GenericParam => &[Fixed(2), Fixed(2), Coded(C::TypeOrMethodDef), Str],
            TableId::MethodSpec => &[Coded(C::MethodDefOrRef), Blob],
            TableId::GenericParamConstraint => &[
                Table(TableId::GenericParam),
                Coded(C::TypeDefOrRef),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::TableInfo;

    #[test]
    fn small_row_sizes() {
        let info = TableInfo::new_test(&[], false, false, false);

        assert_eq!(info.row_size(TableId::Module), 10);
        assert_eq!(info.row_size(TableId::TypeRef), 6);
        assert_eq!(info.row_size(TableId::TypeDef), 14);
        assert_eq!(info.row_size(TableId::MethodDef), 14);
        assert_eq!(info.row_size(TableId::Param), 6);
        assert_eq!(info.row_size(TableId::CustomAttribute), 6);
        assert_eq!(info.row_size(TableId::Assembly), 22);
        assert_eq!(info.row_size(TableId::AssemblyRef), 20);
        assert_eq!(info.row_size(TableId::NestedClass), 4);
        assert_eq!(info.row_size(TableId::Constant), 6);
    }

    #[test]
    fn large_row_sizes() {
        let info = TableInfo::new_test(
            &[(TableId::TypeDef, 0x4000), (TableId::MethodDef, 0x1_0000)],
            true,
            true,
            true,
        );

        // TypeDefOrRef needs 2 tag bits, 0x4000 rows need 15 bits
        assert_eq!(info.row_size(TableId::TypeRef), 2 + 4 + 4);
        assert_eq!(info.row_size(TableId::TypeDef), 4 + 4 + 4 + 4 + 2 + 4);
        assert_eq!(info.row_size(TableId::NestedClass), 4);
        assert_eq!(info.row_size(TableId::Module), 2 + 4 + 4 + 4 + 4);
    }
}
