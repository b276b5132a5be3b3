//! Following type references across modules.
//!
//! A `TypeRef` names a type through its resolution scope. A nested type points at the `TypeRef`
//! of its enclosing type, the outermost one points at the `AssemblyRef` of the module that
//! defines it. Resolving a reference walks that chain, locates the defining module by its
//! simple name and looks the type up there by name.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::trace;

use crate::{
    metadata::{
        cache::PathKey,
        tables::{AssemblyRefRaw, CodedIndex, TableId, TypeRefRaw},
        view::{ModuleMetadata, ModuleView},
    },
    resolution::{find_type_by_parts, ModuleLocator, TypeNameParts},
    Result,
};

/// A module opened during resolution, identified by its path.
///
/// Two resolved modules are equal when their paths are equal ignoring case.
#[derive(Clone)]
pub struct ResolvedModule {
    /// Path of the module file
    pub path: PathBuf,
    /// The opened module
    pub view: Arc<ModuleView>,
}

impl ResolvedModule {
    /// Pair a path with its opened module
    #[must_use]
    pub fn new(path: PathBuf, view: Arc<ModuleView>) -> Self {
        ResolvedModule { path, view }
    }

    /// The parsed metadata of the module
    #[must_use]
    pub fn metadata(&self) -> &ModuleMetadata<'_> {
        self.view.metadata()
    }

    /// Whether this module lives at `path`, ignoring case
    #[must_use]
    pub fn is_at(&self, path: &Path) -> bool {
        PathKey::new(&self.path) == PathKey::new(path)
    }
}

impl PartialEq for ResolvedModule {
    fn eq(&self, other: &Self) -> bool {
        self.is_at(&other.path)
    }
}

impl Eq for ResolvedModule {}

impl fmt::Debug for ResolvedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedModule")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// The three shapes of a `TypeDefOrRef` reference, plus the null reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeHandle {
    /// No type, for example the base of `System.Object`
    Nil,
    /// A `TypeDef` row of the current module
    Definition(u32),
    /// A `TypeRef` row of the current module
    Reference(u32),
    /// A `TypeSpec` row, a constructed type
    Specification(u32),
}

impl From<CodedIndex> for TypeHandle {
    fn from(index: CodedIndex) -> Self {
        if index.is_null() {
            return TypeHandle::Nil;
        }

        match index.tag {
            TableId::TypeDef => TypeHandle::Definition(index.row),
            TableId::TypeRef => TypeHandle::Reference(index.row),
            TableId::TypeSpec => TypeHandle::Specification(index.row),
            _ => TypeHandle::Nil,
        }
    }
}

/// Where a resolved type is defined
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionResult {
    /// `TypeDef` row of the module the reference was resolved in
    Local(u32),
    /// `TypeDef` row of another module
    External(ResolvedModule, u32),
}

impl ResolutionResult {
    /// The defining module and `TypeDef` row, with `current` standing in for a local result
    #[must_use]
    pub fn into_parts(self, current: &ResolvedModule) -> (ResolvedModule, u32) {
        match self {
            ResolutionResult::Local(rid) => (current.clone(), rid),
            ResolutionResult::External(module, rid) => (module, rid),
        }
    }
}

/// Why a type reference could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveFailure {
    /// No type with the referenced name exists in the defining module
    NotFound,
    /// Several candidates match by name
    Ambiguous,
    /// A `TypeSpec`, or a `TypeRef` scoped to something other than a type or an assembly
    UnsupportedReferenceShape,
    /// The module locator found no module with the referenced name
    ModuleNotFound,
}

impl fmt::Display for ResolveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            ResolveFailure::NotFound => "type not found",
            ResolveFailure::Ambiguous => "ambiguous match",
            ResolveFailure::UnsupportedReferenceShape => "unsupported reference shape",
            ResolveFailure::ModuleNotFound => "module not found",
        };
        f.write_str(reason)
    }
}

/// Outcome of [`resolve_type`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeResolution {
    /// The handle was the null reference, there is nothing to resolve
    Nil,
    /// The type was found
    Found(ResolutionResult),
    /// The type could not be resolved
    Failed(ResolveFailure),
}

/// Resolve `handle`, read from `module`, to the `TypeDef` row that defines it.
///
/// Definitions resolve to themselves. References are followed into the module `locator` finds
/// for their `AssemblyRef`. Specifications are not supported.
///
/// # Errors
/// Returns an error if the metadata of `module` is damaged or the located module cannot be
/// opened.
pub fn resolve_type(
    module: &ResolvedModule,
    handle: TypeHandle,
    locator: &mut dyn ModuleLocator,
) -> Result<TypeResolution> {
    let rid = match handle {
        TypeHandle::Nil => return Ok(TypeResolution::Nil),
        TypeHandle::Definition(rid) => {
            return Ok(TypeResolution::Found(ResolutionResult::Local(rid)));
        }
        TypeHandle::Specification(_) => {
            return Ok(TypeResolution::Failed(
                ResolveFailure::UnsupportedReferenceShape,
            ));
        }
        TypeHandle::Reference(rid) => rid,
    };

    let metadata = module.metadata();
    let Some((assembly_ref, parts)) = reference_chain(metadata, rid)? else {
        return Ok(TypeResolution::Failed(
            ResolveFailure::UnsupportedReferenceShape,
        ));
    };

    let Some(assembly) = metadata.row::<AssemblyRefRaw>(assembly_ref) else {
        return Err(malformed_error!("Invalid AssemblyRef row - {}", assembly_ref));
    };
    let assembly_name = metadata.string(assembly.name)?;

    let Some(target) = locator.locate(assembly_name)? else {
        trace!(assembly = assembly_name, "referenced module not located");
        return Ok(TypeResolution::Failed(ResolveFailure::ModuleNotFound));
    };

    match find_type_by_parts(target.metadata(), &parts)? {
        Some(found) => Ok(TypeResolution::Found(ResolutionResult::External(
            target, found,
        ))),
        None => Ok(TypeResolution::Failed(ResolveFailure::NotFound)),
    }
}

/// Reconstruct the full name of `TypeRef` row `rid` as `Namespace.Outer+Inner`
///
/// Chains that do not end in a resolution scope are named from the types they do reach.
///
/// # Errors
/// Returns an error if a row or string is missing, or the chain forms a cycle.
pub fn type_ref_full_name(metadata: &ModuleMetadata<'_>, rid: u32) -> Result<String> {
    let (namespace, names, _) = walk_chain(metadata, rid)?;

    let nested_name = names.join("+");
    if namespace.is_empty() {
        Ok(nested_name)
    } else {
        Ok(format!("{namespace}.{nested_name}"))
    }
}

/// Split the `TypeRef` chain starting at `rid` into the `AssemblyRef` row and the name parts,
/// `None` if the chain ends in an unsupported scope.
fn reference_chain(metadata: &ModuleMetadata<'_>, rid: u32) -> Result<Option<(u32, TypeNameParts)>> {
    let (namespace, mut names, scope) = walk_chain(metadata, rid)?;

    if scope.tag != TableId::AssemblyRef || scope.is_null() {
        return Ok(None);
    }

    let Some(name) = names.pop() else {
        return Ok(None);
    };
    let containing = names.into_iter().map(str::to_string).collect();

    Ok(Some((
        scope.row,
        TypeNameParts::new(namespace, containing, name),
    )))
}

/// Follow nested `TypeRef` scopes up to the outermost reference.
///
/// Returns the namespace of the outermost reference, the names outermost first, and the scope
/// the chain ends in.
fn walk_chain<'a>(
    metadata: &ModuleMetadata<'a>,
    rid: u32,
) -> Result<(&'a str, Vec<&'a str>, CodedIndex)> {
    let max_depth = metadata.tables.rows(TableId::TypeRef) as usize;

    let mut names = Vec::new();
    let mut current = rid;
    loop {
        let Some(type_ref) = metadata.row::<TypeRefRaw>(current) else {
            return Err(malformed_error!("Invalid TypeRef row - {}", current));
        };
        names.push(metadata.string(type_ref.type_name)?);

        let scope = type_ref.resolution_scope;
        if scope.tag == TableId::TypeRef && !scope.is_null() {
            if names.len() > max_depth {
                return Err(malformed_error!("TypeRef scope cycle at row {}", rid));
            }
            current = scope.row;
            continue;
        }

        // Collected innermost first
        names.reverse();
        return Ok((metadata.string(type_ref.type_namespace)?, names, scope));
    }
}
