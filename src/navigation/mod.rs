//! Source navigation for test methods.
//!
//! A [`NavigationSession`] answers "where is this test method?" for a host that has a symbol
//! reader. The reported type and method are tried first. When the symbols know nothing about
//! them, the session falls back to metadata: the compiler generated state machine of an async or
//! iterator method, then the base type that actually declares an inherited method.
//!
//! # Examples
//!
//! ```rust,no_run
//! use dotnav::navigation::{
//!     NavigationData, NavigationSession, SourceLocation, SymbolProvider, SymbolSession,
//! };
//! use std::path::Path;
//!
//! # struct Pdb;
//! # impl SymbolSession for Pdb {
//! #     fn navigation_data(&mut self, _: &str, _: &str) -> Option<SourceLocation> { None }
//! # }
//! # struct PdbReader;
//! # impl SymbolProvider for PdbReader {
//! #     type Session = Pdb;
//! #     fn open_session(&mut self, _: &Path) -> dotnav::Result<Pdb> { Ok(Pdb) }
//! # }
//! let mut session = NavigationSession::new(PdbReader);
//! match session.get_navigation_data(Path::new("Tests.dll"), "Company.Tests.Fixture", "Runs") {
//!     NavigationData::Found(location) => {
//!         println!("{}:{}", location.file_path.display(), location.min_line_number);
//!     }
//!     NavigationData::Invalid => println!("no navigation data"),
//! }
//! session.close();
//! ```

mod config;
mod symbols;

use std::{collections::HashMap, path::Path};

use tracing::{debug, warn};

pub use config::NavigationConfig;
pub use symbols::{SourceLocation, SymbolProvider, SymbolSession};

use crate::{
    metadata::cache::{ModuleCache, PathKey},
    resolution::{MetadataResolver, NavigationTarget},
    Result,
};

/// Outcome of a navigation lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationData {
    /// The method was found in the symbols
    Found(SourceLocation),
    /// No source location could be determined
    Invalid,
}

impl NavigationData {
    /// Whether a source location was found
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, NavigationData::Found(_))
    }

    /// The source location, if one was found
    #[must_use]
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            NavigationData::Found(location) => Some(location),
            NavigationData::Invalid => None,
        }
    }
}

/// A batch of navigation lookups.
///
/// Symbol sessions and opened modules are kept per path until [`NavigationSession::close`] is
/// called or the session is dropped. A module or symbol store that failed to open is not retried.
pub struct NavigationSession<P: SymbolProvider> {
    provider: P,
    sessions: HashMap<PathKey, Option<P::Session>>,
    modules: ModuleCache,
    config: NavigationConfig,
}

impl<P: SymbolProvider> NavigationSession<P> {
    /// Create a session with the default configuration
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, NavigationConfig::default())
    }

    /// Create a session with a custom configuration
    pub fn with_config(provider: P, config: NavigationConfig) -> Self {
        NavigationSession {
            provider,
            sessions: HashMap::new(),
            modules: ModuleCache::new(),
            config,
        }
    }

    /// The active configuration
    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Find the source location of `method_name` as reported on `type_name` in the module at
    /// `module_path`.
    ///
    /// Failures along the way never escape, the worst outcome is [`NavigationData::Invalid`].
    pub fn get_navigation_data(
        &mut self,
        module_path: &Path,
        type_name: &str,
        method_name: &str,
    ) -> NavigationData {
        if let Some(location) = self.symbol_data(module_path, type_name, method_name) {
            return NavigationData::Found(location);
        }

        if self.config.resolve_state_machines {
            let mut resolver = MetadataResolver::new(&mut self.modules, &self.config);
            let lookup = resolver.find_state_machine_type(module_path, type_name, method_name);
            if let Some(location) = self.fallback("state machine", lookup, module_path, type_name) {
                return NavigationData::Found(location);
            }
        }

        if self.config.resolve_declaring_types {
            let mut resolver = MetadataResolver::new(&mut self.modules, &self.config);
            let lookup = resolver.find_declaring_type(module_path, type_name, method_name);
            if let Some(location) = self.fallback("declaring type", lookup, module_path, type_name) {
                return NavigationData::Found(location);
            }
        }

        debug!(
            module = %module_path.display(),
            type_name,
            method = method_name,
            "no navigation data"
        );
        NavigationData::Invalid
    }

    /// Release all symbol sessions and opened modules
    pub fn close(&mut self) {
        self.sessions.clear();
        self.modules.close_all();
    }

    /// Retry the symbol lookup with the target a metadata fallback produced
    fn fallback(
        &mut self,
        step: &'static str,
        lookup: Result<Option<NavigationTarget>>,
        module_path: &Path,
        type_name: &str,
    ) -> Option<SourceLocation> {
        let target = match lookup {
            Ok(target) => target?,
            Err(error) if error.is_not_found() => {
                debug!(module = %module_path.display(), step, "module not found");
                return None;
            }
            Err(error) => {
                warn!(
                    module = %module_path.display(),
                    type_name,
                    step,
                    %error,
                    "metadata lookup failed"
                );
                return None;
            }
        };

        debug!(
            module = %target.module_path.display(),
            type_name = %target.type_name,
            method = %target.method_name,
            step,
            "retrying symbol lookup"
        );
        self.symbol_data(&target.module_path, &target.type_name, &target.method_name)
    }

    fn symbol_data(
        &mut self,
        module_path: &Path,
        type_name: &str,
        method_name: &str,
    ) -> Option<SourceLocation> {
        let provider = &mut self.provider;
        let session = self
            .sessions
            .entry(PathKey::new(module_path))
            .or_insert_with(|| match provider.open_session(module_path) {
                Ok(session) => Some(session),
                Err(error) => {
                    debug!(module = %module_path.display(), %error, "no symbols for module");
                    None
                }
            })
            .as_mut()?;

        session
            .navigation_data(type_name, method_name)
            .filter(|location| !location.file_path.as_os_str().is_empty())
    }
}

impl<P: SymbolProvider> Drop for NavigationSession<P> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        collections::HashMap,
        path::{Path, PathBuf},
        rc::Rc,
    };

    use super::*;
    use crate::{
        test::{
            attribute_value, ser_string, type_ctor_signature, CtorRef, MethodBuilder,
            ModuleBuilder, TypeBuilder,
        },
        Error, Result,
    };

    type Symbols = HashMap<(String, String), SourceLocation>;

    /// Symbols keyed by lower-cased module file name, with a log of opened sessions
    #[derive(Default, Clone)]
    struct FakeProvider {
        modules: Rc<HashMap<String, Symbols>>,
        opened: Rc<RefCell<Vec<String>>>,
    }

    struct FakeSession {
        symbols: Symbols,
    }

    impl SymbolSession for FakeSession {
        fn navigation_data(&mut self, type_full_name: &str, method_name: &str) -> Option<SourceLocation> {
            self.symbols
                .get(&(type_full_name.to_string(), method_name.to_string()))
                .cloned()
        }
    }

    impl SymbolProvider for FakeProvider {
        type Session = FakeSession;

        fn open_session(&mut self, module_path: &Path) -> Result<FakeSession> {
            let name = module_path
                .file_name()
                .map(|name| name.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            self.opened.borrow_mut().push(name.clone());

            match self.modules.get(&name) {
                Some(symbols) => Ok(FakeSession {
                    symbols: symbols.clone(),
                }),
                None => Err(Error::Error(format!("no symbols for {name}"))),
            }
        }
    }

    fn provider(entries: &[(&str, &str, &str, &str, u32)]) -> FakeProvider {
        let mut modules: HashMap<String, Symbols> = HashMap::new();
        for (module, type_name, method, file, line) in entries {
            modules.entry(module.to_lowercase()).or_default().insert(
                (type_name.to_string(), method.to_string()),
                SourceLocation::new(*file, *line),
            );
        }

        FakeProvider {
            modules: Rc::new(modules),
            opened: Rc::default(),
        }
    }

    /// `Base.dll` declares `B.Base.Shared`, `Tests.dll` has `T.Derived : B.Base` and an async
    /// `T.Fixture.Run`
    fn modules(dir: &Path) -> PathBuf {
        let mut base = ModuleBuilder::new("Base");
        base.add_type(TypeBuilder::new("B", "Base").with_method(MethodBuilder::public("Shared")));
        base.write_to(dir);

        let mut tests = ModuleBuilder::new("Tests");
        let runtime = tests.add_assembly_ref("System.Runtime");
        let base_ref = tests.add_assembly_ref("Base");
        let system_type = tests.add_type_ref(runtime, "System", "Type");
        let async_attribute = tests.add_type_ref(
            runtime,
            "System.Runtime.CompilerServices",
            "AsyncStateMachineAttribute",
        );
        let ctor = tests.add_member_ref(async_attribute, ".ctor", type_ctor_signature(system_type));
        let shared_base = tests.add_type_ref(base_ref, "B", "Base");

        tests.add_type(TypeBuilder::new("T", "Derived").with_extends(shared_base));
        let fixture = tests.add_type(
            TypeBuilder::new("T", "Fixture")
                .with_method(MethodBuilder::public("Run"))
                .with_method(MethodBuilder::public("Plain")),
        );
        tests.add_method_attribute(
            fixture,
            0,
            CtorRef::Member(ctor),
            attribute_value(&ser_string(Some("T.Fixture+<Run>d__0, Tests"))),
        );
        tests.write_to(dir)
    }

    #[test]
    fn direct_lookup_reads_no_metadata() {
        let provider = provider(&[("Tests.dll", "T.Fixture", "Plain", "Fixture.cs", 12)]);
        let mut session = NavigationSession::new(provider);

        // The module does not exist, only the symbols are consulted
        let data = session.get_navigation_data(Path::new("/nowhere/Tests.dll"), "T.Fixture", "Plain");
        assert_eq!(data, NavigationData::Found(SourceLocation::new("Fixture.cs", 12)));
        assert!(session.modules.is_empty());
    }

    #[test]
    fn state_machine_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let tests = modules(dir.path());
        let provider = provider(&[("Tests.dll", "T.Fixture+<Run>d__0", "MoveNext", "Fixture.cs", 20)]);
        let mut session = NavigationSession::new(provider);

        let data = session.get_navigation_data(&tests, "T.Fixture", "Run");
        assert_eq!(data.location().unwrap().min_line_number, 20);
    }

    #[test]
    fn declaring_type_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let tests = modules(dir.path());
        let provider = provider(&[
            ("Tests.dll", "T.Fixture", "Plain", "Fixture.cs", 12),
            ("Base.dll", "B.Base", "Shared", "Base.cs", 7),
        ]);
        let opened = provider.opened.clone();
        let mut session = NavigationSession::new(provider);

        let data = session.get_navigation_data(&tests, "T.Derived", "Shared");
        assert_eq!(data, NavigationData::Found(SourceLocation::new("Base.cs", 7)));

        session.get_navigation_data(&tests, "T.Derived", "Shared");
        assert_eq!(*opened.borrow(), vec!["tests.dll", "base.dll"]);
    }

    #[test]
    fn disabled_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let tests = modules(dir.path());
        let provider = provider(&[
            ("Tests.dll", "T.Fixture+<Run>d__0", "MoveNext", "Fixture.cs", 20),
            ("Base.dll", "B.Base", "Shared", "Base.cs", 7),
        ]);
        let mut session = NavigationSession::with_config(provider, NavigationConfig::direct_only());

        assert_eq!(
            session.get_navigation_data(&tests, "T.Fixture", "Run"),
            NavigationData::Invalid
        );
        assert_eq!(
            session.get_navigation_data(&tests, "T.Derived", "Shared"),
            NavigationData::Invalid
        );
    }

    #[test]
    fn empty_file_path_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let tests = modules(dir.path());
        let provider = provider(&[("Tests.dll", "T.Fixture", "Plain", "", 3)]);
        let mut session = NavigationSession::new(provider);

        let data = session.get_navigation_data(&tests, "T.Fixture", "Plain");
        assert!(!data.is_valid());
    }

    #[test]
    fn missing_module_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&[]);
        let opened = provider.opened.clone();
        let mut session = NavigationSession::new(provider);

        let missing = dir.path().join("Missing.dll");
        assert_eq!(
            session.get_navigation_data(&missing, "T.Fixture", "Run"),
            NavigationData::Invalid
        );
        assert_eq!(
            session.get_navigation_data(&missing, "T.Fixture", "Run"),
            NavigationData::Invalid
        );
        // The failed symbol open is remembered
        assert_eq!(opened.borrow().len(), 1);
        assert_eq!(session.modules.len(), 1);
    }

    #[test]
    fn close_releases_everything() {
        let dir = tempfile::tempdir().unwrap();
        let tests = modules(dir.path());
        let provider = provider(&[("Base.dll", "B.Base", "Shared", "Base.cs", 7)]);
        let mut session = NavigationSession::new(provider);

        assert!(session.get_navigation_data(&tests, "T.Derived", "Shared").is_valid());
        assert!(!session.sessions.is_empty());
        assert!(!session.modules.is_empty());

        session.close();
        assert!(session.sessions.is_empty());
        assert!(session.modules.is_empty());
    }
}
