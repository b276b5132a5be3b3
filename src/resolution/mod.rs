//! Metadata driven resolution of navigation targets.
//!
//! When a symbol lookup for the reported test method fails, the method is usually not where the
//! test framework said it is. It may be inherited from a base type, possibly defined in another
//! module, or its body may live in a compiler generated state machine type. The resolvers in this
//! module find the real location by reading module metadata.
//!
//! # Key Components
//!
//! - [`typename`] - Type lookup by namespace, containing types and simple name
//! - [`reference`] - Following `TypeRef` chains into other modules
//! - [`ModuleLocator`] and [`DirectoryLocator`] - Finding a referenced module on disk
//! - [`MetadataResolver`] - The declaring type and state machine walks
//!
//! # Examples
//!
//! ```rust,no_run
//! use dotnav::{
//!     metadata::cache::ModuleCache,
//!     navigation::NavigationConfig,
//!     resolution::MetadataResolver,
//! };
//! use std::path::Path;
//!
//! let mut cache = ModuleCache::new();
//! let config = NavigationConfig::default();
//! let mut resolver = MetadataResolver::new(&mut cache, &config);
//!
//! if let Some(target) = resolver.find_declaring_type(
//!     Path::new("Tests.dll"),
//!     "Company.Tests.DerivedTests",
//!     "SharedTest",
//! )? {
//!     println!("{} in {}", target.type_name, target.module_path.display());
//! }
//! # Ok::<(), dotnav::Error>(())
//! ```

mod declaring;
mod locator;
mod reference;
mod statemachine;
mod typename;

use std::path::PathBuf;

pub use locator::{DirectoryLocator, ModuleLocator};
pub use reference::{
    resolve_type, type_ref_full_name, ResolutionResult, ResolveFailure, ResolvedModule,
    TypeHandle, TypeResolution,
};
pub use statemachine::STATE_MACHINE_ATTRIBUTES;
pub use typename::{
    find_type, find_type_by_full_name, find_type_by_parts, FullTypeName, TypeNameParts,
    TypeNameSource,
};

use crate::{
    metadata::{
        cache::ModuleCache,
        tables::{MethodDefRaw, TypeDefRaw},
        view::ModuleMetadata,
    },
    navigation::NavigationConfig,
    Result,
};

/// A method to look up in the symbols of a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    /// The module whose symbols describe the method
    pub module_path: PathBuf,
    /// Full type name, containing types joined with `+`
    pub type_name: String,
    /// Simple method name
    pub method_name: String,
}

impl NavigationTarget {
    /// Create a navigation target
    #[must_use]
    pub fn new(module_path: PathBuf, type_name: &str, method_name: &str) -> Self {
        NavigationTarget {
            module_path,
            type_name: type_name.to_string(),
            method_name: method_name.to_string(),
        }
    }
}

/// Resolves navigation targets from module metadata.
///
/// Modules are opened through the borrowed [`ModuleCache`], so every module is read at most once
/// per session no matter how many lookups touch it.
pub struct MetadataResolver<'a> {
    cache: &'a mut ModuleCache,
    config: &'a NavigationConfig,
}

impl<'a> MetadataResolver<'a> {
    /// Create a resolver over `cache`
    pub fn new(cache: &'a mut ModuleCache, config: &'a NavigationConfig) -> Self {
        MetadataResolver { cache, config }
    }
}

/// The public methods of `typedef` named exactly `method_name`
fn public_methods_named(
    metadata: &ModuleMetadata<'_>,
    typedef: &TypeDefRaw,
    method_name: &str,
) -> Result<Vec<MethodDefRaw>> {
    let mut matches = Vec::new();
    for method in metadata.methods(typedef) {
        if !method.access().is_public() {
            continue;
        }

        if metadata.string(method.name)? == method_name {
            matches.push(method);
        }
    }

    Ok(matches)
}
