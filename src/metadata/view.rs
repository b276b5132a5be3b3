//! Read-only view of one module's metadata.
//!
//! [`ModuleView`] owns the [`File`] and the parsed [`ModuleMetadata`] borrowing from it. Opening
//! a view parses the CLI header, the metadata root, the heaps and the table layout, and builds
//! the namespace tree and the nesting maps. Rows are decoded lazily on access.

use std::{collections::HashMap, path::Path};

use ouroboros::self_referencing;

use crate::{
    file::File,
    metadata::{
        cor20header::Cor20Header,
        namespace::NamespaceTree,
        root::Root,
        streams::{Blob, Strings, TablesHeader},
        tables::{
            MetadataTable, MethodDefRaw, MethodPtrRaw, NestedClassRaw, ParamRaw, RowReadable,
            TableId, TypeDefRaw,
        },
    },
    Error::OutOfBounds,
    Result,
};

/// Parsed metadata of a module, borrowing the bytes of its [`File`].
pub struct ModuleMetadata<'a> {
    /// The CLI header
    pub cor20header: Cor20Header,
    /// The metadata root with its stream directory
    pub root: Root,
    /// The `#~` (or `#-`) stream
    pub tables: TablesHeader<'a>,
    /// The `#Strings` heap
    pub strings: Strings<'a>,
    /// The `#Blob` heap, absent in modules without signatures
    pub blobs: Option<Blob<'a>>,
    namespaces: NamespaceTree<'a>,
    enclosing: HashMap<u32, u32>,
    nested: HashMap<u32, Vec<u32>>,
}

impl<'a> ModuleMetadata<'a> {
    /// Parse the metadata of `file`
    ///
    /// # Errors
    /// Returns an error if the CLI header, the metadata root, a required stream or the table
    /// layout is damaged.
    pub fn read(file: &'a File) -> Result<Self> {
        let (clr_rva, clr_size) = file.clr();
        let clr_offset = file.rva_to_offset(clr_rva)?;
        let cor20header = Cor20Header::read(file.data_slice(clr_offset, clr_size)?)?;

        let metadata_offset = file.rva_to_offset(cor20header.meta_data_rva as usize)?;
        let metadata = file.data_slice(metadata_offset, cor20header.meta_data_size as usize)?;
        let root = Root::read(metadata)?;

        let stream_data = |name: &str| -> Result<Option<&'a [u8]>> {
            match root.stream(name) {
                Some(stream) => {
                    let start = stream.offset as usize;
                    let end = start + stream.size as usize;
                    metadata.get(start..end).map(Some).ok_or(OutOfBounds)
                }
                None => Ok(None),
            }
        };

        let Some(tables_data) = stream_data("#~")?.or(stream_data("#-")?) else {
            return Err(malformed_error!("Module has no metadata tables stream"));
        };
        let Some(strings_data) = stream_data("#Strings")? else {
            return Err(malformed_error!("Module has no #Strings heap"));
        };

        let tables = TablesHeader::from(tables_data)?;
        let strings = Strings::from(strings_data)?;
        let blobs = match stream_data("#Blob")? {
            Some(data) => Some(Blob::from(data)?),
            None => None,
        };

        let mut enclosing = HashMap::new();
        let mut nested: HashMap<u32, Vec<u32>> = HashMap::new();
        if let Some(nested_classes) = tables.table::<NestedClassRaw>() {
            for row in &nested_classes {
                enclosing.insert(row.nested_class, row.enclosing_class);
                nested
                    .entry(row.enclosing_class)
                    .or_default()
                    .push(row.nested_class);
            }
        }

        let mut namespaces = NamespaceTree::default();
        if let Some(typedefs) = tables.table::<TypeDefRaw>() {
            for row in &typedefs {
                if enclosing.contains_key(&row.rid) {
                    continue;
                }

                namespaces.insert(strings.get(row.type_namespace as usize)?, row.rid);
            }
        }

        Ok(ModuleMetadata {
            cor20header,
            root,
            tables,
            strings,
            blobs,
            namespaces,
            enclosing,
            nested,
        })
    }

    /// A typed view over the table of `T`, `None` if the module has no such rows
    #[must_use]
    pub fn table<T: RowReadable>(&self) -> Option<MetadataTable<'a, T>> {
        self.tables.table::<T>()
    }

    /// Read row `rid` of the table of `T`
    #[must_use]
    pub fn row<T: RowReadable>(&self, rid: u32) -> Option<T> {
        self.table::<T>()?.get(rid)
    }

    /// Look up a `#Strings` heap entry
    ///
    /// # Errors
    /// Returns an error if `index` lies outside the heap or the string is not UTF-8.
    pub fn string(&self, index: u32) -> Result<&'a str> {
        self.strings.get(index as usize)
    }

    /// Look up a `#Blob` heap entry
    ///
    /// # Errors
    /// Returns an error if the module has no blob heap or `index` lies outside of it.
    pub fn blob(&self, index: u32) -> Result<&'a [u8]> {
        match &self.blobs {
            Some(blobs) => blobs.get(index as usize),
            None => Err(malformed_error!("Module has no #Blob heap")),
        }
    }

    /// The namespace tree of this module
    #[must_use]
    pub fn namespaces(&self) -> &NamespaceTree<'a> {
        &self.namespaces
    }

    /// The `TypeDef` row enclosing the nested type `rid`
    #[must_use]
    pub fn enclosing_type(&self, rid: u32) -> Option<u32> {
        self.enclosing.get(&rid).copied()
    }

    /// The `TypeDef` rows nested directly in `rid`, in table order
    #[must_use]
    pub fn nested_types(&self, rid: u32) -> &[u32] {
        self.nested.get(&rid).map_or(&[], Vec::as_slice)
    }

    /// Reconstruct the full name of `TypeDef` row `rid`.
    ///
    /// The result is `Namespace.Outer+Inner`, without a leading dot for types in the global
    /// namespace, and resolves back to the same row by name.
    ///
    /// # Errors
    /// Returns an error if a row or string is missing, or the nesting forms a cycle.
    pub fn type_full_name(&self, rid: u32) -> Result<String> {
        let max_depth = self.tables.rows(TableId::TypeDef) as usize;

        let mut names = Vec::new();
        let mut current = rid;
        loop {
            let Some(row) = self.row::<TypeDefRaw>(current) else {
                return Err(malformed_error!("Invalid TypeDef row - {}", current));
            };
            names.push(self.string(row.type_name)?);

            match self.enclosing_type(current) {
                Some(enclosing) => {
                    if names.len() > max_depth {
                        return Err(malformed_error!("Nested type cycle at TypeDef {}", rid));
                    }
                    current = enclosing;
                }
                None => {
                    let namespace = self.string(row.type_namespace)?;
                    names.reverse();

                    let nested_name = names.join("+");
                    if namespace.is_empty() {
                        return Ok(nested_name);
                    }
                    return Ok(format!("{namespace}.{nested_name}"));
                }
            }
        }
    }

    /// The methods declared by `typedef`, in table order.
    ///
    /// A type owns the method list entries from its own `MethodList` up to the next type's. When
    /// the `MethodPtr` table is present, those entries are resolved through it.
    #[must_use]
    pub fn methods(&self, typedef: &TypeDefRaw) -> Vec<MethodDefRaw> {
        let Some(methods) = self.table::<MethodDefRaw>() else {
            return Vec::new();
        };
        let method_ptrs = self.table::<MethodPtrRaw>();

        let list_len = method_ptrs
            .as_ref()
            .map_or(methods.row_count(), MetadataTable::row_count);
        let start = typedef.method_list;
        let end = self
            .row::<TypeDefRaw>(typedef.rid + 1)
            .map_or(list_len + 1, |next| next.method_list)
            .min(list_len + 1);

        if start == 0 || start >= end {
            return Vec::new();
        }

        (start..end)
            .filter_map(|index| match &method_ptrs {
                Some(ptrs) => ptrs.get(index).and_then(|ptr| methods.get(ptr.method)),
                None => methods.get(index),
            })
            .collect()
    }

    /// The `Param` rows of `method`, in table order
    #[must_use]
    pub fn params(&self, method: &MethodDefRaw) -> Vec<ParamRaw> {
        let Some(params) = self.table::<ParamRaw>() else {
            return Vec::new();
        };

        let end = self
            .row::<MethodDefRaw>(method.rid + 1)
            .map_or(params.row_count() + 1, |next| next.param_list)
            .min(params.row_count() + 1);
        if method.param_list == 0 || method.param_list >= end {
            return Vec::new();
        }

        (method.param_list..end)
            .filter_map(|rid| params.get(rid))
            .collect()
    }

    /// The `TypeDef` row declaring `MethodDef` row `method_rid`
    #[must_use]
    pub fn method_owner(&self, method_rid: u32) -> Option<TypeDefRaw> {
        let position = match self.table::<MethodPtrRaw>() {
            Some(ptrs) => ptrs.iter().find(|ptr| ptr.method == method_rid)?.rid,
            None => method_rid,
        };

        let typedefs = self.table::<TypeDefRaw>()?;
        let owner = typedefs
            .iter()
            .filter(|row| row.method_list != 0 && row.method_list <= position)
            .last();

        owner.filter(|owner| self.methods(owner).iter().any(|m| m.rid == method_rid))
    }
}

/// An opened module: the file and its parsed metadata.
///
/// # Examples
///
/// ```rust,no_run
/// use dotnav::metadata::view::ModuleView;
/// use std::path::Path;
///
/// let view = ModuleView::from_file(Path::new("Tests.dll"))?;
/// let metadata = view.metadata();
/// println!("Metadata version {}", metadata.root.version);
/// # Ok::<(), dotnav::Error>(())
/// ```
#[self_referencing]
pub struct ModuleView {
    file: File,

    #[borrows(file)]
    #[covariant]
    data: ModuleMetadata<'this>,
}

impl ModuleView {
    /// Open and parse the module at `path`
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be read, or a parse error if it is
    /// not a managed module.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::load(File::from_file(path)?)
    }

    /// Parse a module image held in memory
    ///
    /// # Errors
    /// Returns a parse error if `data` is not a managed module.
    pub fn from_mem(data: Vec<u8>) -> Result<Self> {
        Self::load(File::from_mem(data)?)
    }

    fn load(file: File) -> Result<Self> {
        ModuleView::try_new(file, |file| ModuleMetadata::read(file))
    }

    /// The parsed metadata
    #[must_use]
    pub fn metadata(&self) -> &ModuleMetadata<'_> {
        self.borrow_data()
    }

    /// The underlying file
    #[must_use]
    pub fn file(&self) -> &File {
        self.borrow_file()
    }
}
