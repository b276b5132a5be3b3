//! Finding referenced modules on disk.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::{
    metadata::cache::ModuleCache,
    resolution::ResolvedModule,
    Result,
};

/// Finds a module by the simple name an `AssemblyRef` row carries.
///
/// Implementations return `Ok(None)` when no module with that name exists and reserve errors for
/// modules that exist but cannot be opened.
pub trait ModuleLocator {
    /// Locate and open the module named `simple_name`
    ///
    /// # Errors
    /// Returns an error if a candidate file exists but cannot be read or parsed.
    fn locate(&mut self, simple_name: &str) -> Result<Option<ResolvedModule>>;
}

impl<F> ModuleLocator for F
where
    F: FnMut(&str) -> Result<Option<ResolvedModule>>,
{
    fn locate(&mut self, simple_name: &str) -> Result<Option<ResolvedModule>> {
        self(simple_name)
    }
}

/// Looks for `<directory>/<simple_name>.<extension>` for each extension in order.
///
/// Modules are opened through the session's [`ModuleCache`]. A missing file moves on to the next
/// extension, any other open failure is returned.
pub struct DirectoryLocator<'a> {
    cache: &'a mut ModuleCache,
    directory: PathBuf,
    extensions: &'a [String],
}

impl<'a> DirectoryLocator<'a> {
    /// Search `directory` with the given extensions
    pub fn new(cache: &'a mut ModuleCache, directory: &Path, extensions: &'a [String]) -> Self {
        DirectoryLocator {
            cache,
            directory: directory.to_path_buf(),
            extensions,
        }
    }

    /// Search the directory containing `module_path`
    pub fn beside(cache: &'a mut ModuleCache, module_path: &Path, extensions: &'a [String]) -> Self {
        let directory = module_path.parent().unwrap_or_else(|| Path::new(""));
        Self::new(cache, directory, extensions)
    }
}

impl ModuleLocator for DirectoryLocator<'_> {
    fn locate(&mut self, simple_name: &str) -> Result<Option<ResolvedModule>> {
        for extension in self.extensions {
            let path = self.directory.join(format!("{simple_name}.{extension}"));

            match self.cache.get_or_open(&path) {
                Ok(view) => {
                    trace!(module = %path.display(), "located module");
                    return Ok(Some(ResolvedModule::new(path, view)));
                }
                Err(error) if error.is_not_found() => {
                    trace!(module = %path.display(), "no module at probed path");
                }
                Err(error) => return Err(error),
            }
        }

        Ok(None)
    }
}
