//! Type lookup by name.
//!
//! A type name is consumed in three parts: the namespace segments, the names of the containing
//! types from outermost to innermost, and the simple name of the type itself. The lookup walks
//! the namespace tree one segment at a time, then the nested types one name at a time. Every
//! comparison is an exact ordinal match.
//!
//! Two name sources exist. [`FullTypeName`] splits a reflection style `Namespace.Outer+Inner`
//! string, [`TypeNameParts`] carries names that were already split while following a type
//! reference. Both yield the same parts for the same type.

use crate::{
    metadata::{namespace::NamespaceTree, tables::TypeDefRaw, view::ModuleMetadata},
    Result,
};

/// A type name split into the parts a lookup walks.
pub trait TypeNameSource {
    /// The namespace segments, outermost first; empty for the global namespace
    fn namespace_segments(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    /// The containing types, outermost first; empty for a top-level type
    fn containing_types(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    /// The simple name of the type
    fn name(&self) -> &str;
}

/// A full type name such as `Company.Tests.Outer+Inner`.
///
/// The namespace ends at the last `.` before the first `+`. Everything after it is a `+`
/// separated chain of type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullTypeName<'a> {
    namespace: &'a str,
    types: &'a str,
}

impl<'a> FullTypeName<'a> {
    /// Split `full_name` into namespace and type chain
    #[must_use]
    pub fn new(full_name: &'a str) -> Self {
        let outer_end = full_name.find('+').unwrap_or(full_name.len());
        match full_name[..outer_end].rfind('.') {
            Some(dot) => FullTypeName {
                namespace: &full_name[..dot],
                types: &full_name[dot + 1..],
            },
            None => FullTypeName {
                namespace: "",
                types: full_name,
            },
        }
    }

    /// The namespace, empty for the global namespace
    #[must_use]
    pub fn namespace(&self) -> &'a str {
        self.namespace
    }
}

impl TypeNameSource for FullTypeName<'_> {
    fn namespace_segments(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        if self.namespace.is_empty() {
            Box::new(std::iter::empty())
        } else {
            Box::new(self.namespace.split('.'))
        }
    }

    fn containing_types(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self.types.rfind('+') {
            Some(last) => Box::new(self.types[..last].split('+')),
            None => Box::new(std::iter::empty()),
        }
    }

    fn name(&self) -> &str {
        match self.types.rfind('+') {
            Some(last) => &self.types[last + 1..],
            None => self.types,
        }
    }
}

/// A type name that is already split into its parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeNameParts {
    /// Dotted namespace, empty for the global namespace
    pub namespace: String,
    /// Containing types, outermost first
    pub containing: Vec<String>,
    /// Simple name
    pub name: String,
}

impl TypeNameParts {
    /// Combine the parts of a type name
    #[must_use]
    pub fn new(namespace: &str, containing: Vec<String>, name: &str) -> Self {
        TypeNameParts {
            namespace: namespace.to_string(),
            containing,
            name: name.to_string(),
        }
    }
}

impl TypeNameSource for TypeNameParts {
    fn namespace_segments(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        if self.namespace.is_empty() {
            Box::new(std::iter::empty())
        } else {
            Box::new(self.namespace.split('.'))
        }
    }

    fn containing_types(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.containing.iter().map(String::as_str))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Find the `TypeDef` row named by `source`.
///
/// Returns `Ok(None)` if any namespace segment, containing type or the final name has no exact
/// match. Where several types share a name the first in table order wins.
///
/// # Errors
/// Returns an error if a `TypeDef` row or its name cannot be read.
pub fn find_type<S>(metadata: &ModuleMetadata<'_>, source: &S) -> Result<Option<u32>>
where
    S: TypeNameSource + ?Sized,
{
    let tree = metadata.namespaces();

    let mut namespace = NamespaceTree::ROOT;
    for segment in source.namespace_segments() {
        match tree.child(namespace, segment) {
            Some(child) => namespace = child,
            None => return Ok(None),
        }
    }

    let mut candidates = tree.types(namespace);
    for containing in source.containing_types() {
        match find_named(metadata, candidates, containing)? {
            Some(rid) => candidates = metadata.nested_types(rid),
            None => return Ok(None),
        }
    }

    find_named(metadata, candidates, source.name())
}

/// Find a type by its full name, see [`FullTypeName`]
///
/// # Errors
/// Returns an error if a `TypeDef` row or its name cannot be read.
pub fn find_type_by_full_name(metadata: &ModuleMetadata<'_>, full_name: &str) -> Result<Option<u32>> {
    find_type(metadata, &FullTypeName::new(full_name))
}

/// Find a type by its pre-split name parts
///
/// # Errors
/// Returns an error if a `TypeDef` row or its name cannot be read.
pub fn find_type_by_parts(metadata: &ModuleMetadata<'_>, parts: &TypeNameParts) -> Result<Option<u32>> {
    find_type(metadata, parts)
}

fn find_named(metadata: &ModuleMetadata<'_>, candidates: &[u32], name: &str) -> Result<Option<u32>> {
    for rid in candidates {
        let Some(typedef) = metadata.row::<TypeDefRaw>(*rid) else {
            return Err(malformed_error!("Invalid TypeDef row - {}", rid));
        };

        if metadata.string(typedef.type_name)? == name {
            return Ok(Some(*rid));
        }
    }

    Ok(None)
}
