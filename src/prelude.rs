//! # dotnav Prelude
//!
//! The types needed to run navigation lookups, plug in a symbol reader and drive the metadata
//! resolvers directly.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotnav operations
pub use crate::Error;

/// The result type used throughout dotnav
pub use crate::Result;

// ================================================================================================
// Navigation
// ================================================================================================

/// Lookup session, its outcome and configuration
pub use crate::navigation::{NavigationConfig, NavigationData, NavigationSession};

/// The symbol reader seam
pub use crate::navigation::{SourceLocation, SymbolProvider, SymbolSession};

// ================================================================================================
// Resolution
// ================================================================================================

/// Metadata resolvers and their results
pub use crate::resolution::{
    DirectoryLocator, MetadataResolver, ModuleLocator, NavigationTarget, ResolvedModule,
};

// ================================================================================================
// Metadata
// ================================================================================================

/// Opened modules and the session cache
pub use crate::metadata::{
    cache::ModuleCache,
    view::{ModuleMetadata, ModuleView},
};

/// Metadata tokens
pub use crate::metadata::token::Token;
