use std::path::PathBuf;

use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Only hard failures end up here: unreadable files, damaged metadata and the like. A name that
/// simply does not exist in a module is not an error, see
/// [`crate::resolution::ResolveFailure`] for how expected misses are reported.
///
/// # Error Categories
///
/// ## File Parsing Errors
/// - [`Error::Malformed`] - Corrupted or invalid file structure
/// - [`Error::OutOfBounds`] - Attempted to read beyond file boundaries
/// - [`Error::NotSupported`] - Unsupported file format or feature
/// - [`Error::Empty`] - Empty input provided
///
/// ## I/O and External Errors
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::GoblinErr`] - PE parsing errors from goblin crate
/// - [`Error::ModuleUnavailable`] - A module that already failed to open in this session
///
/// ## Resolution Errors
/// - [`Error::RecursionLimit`] - Maximum inheritance depth exceeded
///
/// # Examples
///
/// ```rust,no_run
/// use dotnav::{Error, metadata::view::ModuleView};
/// use std::path::Path;
///
/// match ModuleView::from_file(Path::new("Tests.dll")) {
///     Ok(_) => println!("Module opened"),
///     Err(error) if error.is_not_found() => eprintln!("No such module"),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed file: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The file is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was detected for
    /// debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the file.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// This file type is not supported.
    ///
    /// Raised for metadata that uses tables this library does not know how to size.
    #[error("This file type is not supported")]
    NotSupported,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Generic error for miscellaneous failures, such as a failed memory mapping.
    #[error("{0}")]
    Error(String),

    /// Error from the goblin crate during PE parsing.
    #[error("{0}")]
    GoblinErr(#[from] goblin::error::Error),

    /// The module at `path` failed to open earlier in this session.
    ///
    /// Opening a module is attempted once per path; later requests replay the outcome through
    /// this variant instead of touching the file system again.
    #[error("Module {} is unavailable (not found: {not_found})", path.display())]
    ModuleUnavailable {
        /// Path of the module that failed to open
        path: PathBuf,
        /// Whether the original failure was a missing file
        not_found: bool,
    },

    /// Recursion limit reached.
    ///
    /// The associated value shows the depth limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),
}

impl Error {
    /// Returns `true` if this error means "the file does not exist".
    ///
    /// Covers a direct I/O `NotFound` as well as a cached replay of one.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::FileError(error) => error.kind() == std::io::ErrorKind::NotFound,
            Error::ModuleUnavailable { not_found, .. } => *not_found,
            _ => false,
        }
    }
}
