//! The symbol provider seam.
//!
//! Turning a method into a source file and line requires the debug symbols of a module. Reading
//! symbol stores is left to the host, which plugs in through [`SymbolProvider`].

use std::path::{Path, PathBuf};

use crate::Result;

/// A source location reported by a symbol session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Source file containing the method
    pub file_path: PathBuf,
    /// Lowest line number of the method body
    pub min_line_number: u32,
}

impl SourceLocation {
    /// Create a source location
    #[must_use]
    pub fn new(file_path: impl Into<PathBuf>, min_line_number: u32) -> Self {
        SourceLocation {
            file_path: file_path.into(),
            min_line_number,
        }
    }
}

/// Opens symbol sessions for modules.
///
/// # Examples
///
/// ```rust
/// use dotnav::navigation::{SourceLocation, SymbolProvider, SymbolSession};
/// use std::path::Path;
///
/// struct NoSymbols;
/// struct EmptySession;
///
/// impl SymbolSession for EmptySession {
///     fn navigation_data(&mut self, _type_name: &str, _method: &str) -> Option<SourceLocation> {
///         None
///     }
/// }
///
/// impl SymbolProvider for NoSymbols {
///     type Session = EmptySession;
///
///     fn open_session(&mut self, _module_path: &Path) -> dotnav::Result<EmptySession> {
///         Ok(EmptySession)
///     }
/// }
/// ```
pub trait SymbolProvider {
    /// The session type for one module
    type Session: SymbolSession;

    /// Open the symbols of the module at `module_path`
    ///
    /// # Errors
    /// Returns an error if the module has no readable symbols.
    fn open_session(&mut self, module_path: &Path) -> Result<Self::Session>;
}

/// The symbols of one module
pub trait SymbolSession {
    /// Look up the source location of `method_name` on the type `type_full_name`.
    ///
    /// Type names join containing types with `+`.
    fn navigation_data(&mut self, type_full_name: &str, method_name: &str)
        -> Option<SourceLocation>;
}
