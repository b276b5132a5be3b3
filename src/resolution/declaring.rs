//! Finding the type that declares an inherited test method.

use std::path::Path;

use tracing::{debug, warn};

use crate::{
    metadata::tables::TypeDefRaw,
    resolution::{
        find_type_by_full_name, public_methods_named, resolve_type, DirectoryLocator,
        MetadataResolver, NavigationTarget, ResolvedModule, TypeHandle, TypeResolution,
    },
    Result,
};

impl MetadataResolver<'_> {
    /// Find the type that declares the public method `method_name` seen on `type_name`.
    ///
    /// The walk starts at `type_name` in the module at `origin` and follows the base types,
    /// crossing into other modules found next to the module of the type being inspected. A type
    /// with more than one public method of that name contributes no match.
    ///
    /// A match on `type_name` itself is recorded and the walk goes on. The first match on an
    /// ancestor ends the walk with that ancestor, unless `type_name` matched as well, in which
    /// case the result is `None`. When a base type cannot be resolved the walk stops with
    /// whatever was recorded.
    ///
    /// # Errors
    /// Returns an error if the module at `origin` cannot be opened or its metadata is damaged.
    pub fn find_declaring_type(
        &mut self,
        origin: &Path,
        type_name: &str,
        method_name: &str,
    ) -> Result<Option<NavigationTarget>> {
        let view = self.cache.get_or_open(origin)?;
        let mut module = ResolvedModule::new(origin.to_path_buf(), view);

        let Some(mut current) = find_type_by_full_name(module.metadata(), type_name)? else {
            debug!(module = %origin.display(), type_name, "reported type not found");
            return Ok(None);
        };

        let mut candidate = None;
        for depth in 0..=self.config.max_inheritance_depth {
            let metadata = module.metadata();
            let Some(typedef) = metadata.row::<TypeDefRaw>(current) else {
                return Err(malformed_error!("Invalid TypeDef row - {}", current));
            };

            let matches = public_methods_named(metadata, &typedef, method_name)?;
            match matches.len() {
                0 => {}
                1 if depth == 0 => {
                    // The reported type keeps the caller's spelling of its name, only ancestor
                    // names are rebuilt from metadata. An ancestor match is final, a match on the
                    // reported type only holds if no ancestor also declares the method.
                    candidate = Some(NavigationTarget::new(
                        module.path.clone(),
                        type_name,
                        method_name,
                    ));
                }
                1 => {
                    if candidate.is_some() {
                        debug!(
                            type_name,
                            method = method_name,
                            reason = "declared by reported type and an ancestor",
                            "declaring type walk failed"
                        );
                        return Ok(None);
                    }

                    let declaring_type = metadata.type_full_name(current)?;
                    return Ok(Some(NavigationTarget::new(
                        module.path.clone(),
                        &declaring_type,
                        method_name,
                    )));
                }
                count => {
                    debug!(
                        module = %module.path.display(),
                        type_name = %metadata.type_full_name(current)?,
                        method = method_name,
                        count,
                        "ambiguous method name, skipping type"
                    );
                }
            }

            let handle = TypeHandle::from(typedef.extends);
            if handle == TypeHandle::Nil {
                return Ok(candidate);
            }

            let mut locator = DirectoryLocator::beside(
                self.cache,
                &module.path,
                &self.config.module_extensions,
            );
            match resolve_type(&module, handle, &mut locator) {
                Ok(TypeResolution::Found(result)) => {
                    (module, current) = result.into_parts(&module);
                }
                Ok(TypeResolution::Nil) => return Ok(candidate),
                Ok(TypeResolution::Failed(reason)) => {
                    debug!(
                        module = %module.path.display(),
                        type_name,
                        method = method_name,
                        %reason,
                        "base type unresolved, stopping declaring type walk"
                    );
                    return Ok(candidate);
                }
                Err(error) => {
                    warn!(
                        module = %module.path.display(),
                        type_name,
                        method = method_name,
                        %error,
                        "failed to resolve base type"
                    );
                    return Ok(candidate);
                }
            }
        }

        debug!(
            type_name,
            method = method_name,
            depth = self.config.max_inheritance_depth,
            "inheritance depth limit reached"
        );
        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::{
        metadata::{
            cache::ModuleCache,
            tables::{CodedIndex, TableId},
        },
        navigation::NavigationConfig,
        resolution::{MetadataResolver, NavigationTarget},
        test::{MethodBuilder, ModuleBuilder, TypeBuilder, METHOD_FAMILY, METHOD_HIDE_BY_SIG},
    };

    fn find(
        origin: &std::path::Path,
        type_name: &str,
        method_name: &str,
        config: &NavigationConfig,
    ) -> Option<NavigationTarget> {
        let mut cache = ModuleCache::new();
        let mut resolver = MetadataResolver::new(&mut cache, config);
        resolver
            .find_declaring_type(origin, type_name, method_name)
            .unwrap()
    }

    /// Tests.dll: `A.B` declares `Go`, `A.Derived : A.Base` declares nothing, `A.Base` declares
    /// `Go`, `A.Twice` declares two public `Go`, `A.Twins : A.Twice`, `A.Hidden` has a private
    /// `Go`, `A.Both : A.Base` declares `Go` itself and `A.Outer+Inner : A.Base` is nested.
    fn local_module(dir: &std::path::Path) -> PathBuf {
        let mut tests = ModuleBuilder::new("Tests");
        let corlib = tests.add_assembly_ref("mscorlib");
        let object = tests.add_type_ref(corlib, "System", "Object");

        tests.add_type(
            TypeBuilder::new("A", "B")
                .with_extends(object)
                .with_method(MethodBuilder::public("Go")),
        );
        tests.add_type(TypeBuilder::new("A", "C").with_method(MethodBuilder::public("Go")));
        let base = tests.add_type(
            TypeBuilder::new("A", "Base")
                .with_extends(object)
                .with_method(MethodBuilder::public("Go"))
                .with_method(MethodBuilder::private("Stop")),
        );
        tests.add_type(TypeBuilder::new("A", "Derived").with_extends(base));
        let twice = tests.add_type(
            TypeBuilder::new("A", "Twice")
                .with_method(MethodBuilder::public("Go"))
                .with_method(MethodBuilder::public("Go")),
        );
        tests.add_type(TypeBuilder::new("A", "Twins").with_extends(twice));
        tests.add_type(
            TypeBuilder::new("A", "Hidden")
                .with_extends(base)
                .with_method(MethodBuilder::private("Go")),
        );
        tests.add_type(
            TypeBuilder::new("A", "Both")
                .with_extends(base)
                .with_method(MethodBuilder::public("Go")),
        );
        tests.add_type(
            TypeBuilder::new("A", "Overloads")
                .with_extends(base)
                .with_method(MethodBuilder::public("Go"))
                .with_method(MethodBuilder::public("Go")),
        );
        tests.add_type(
            TypeBuilder::new("A", "Guarded")
                .with_extends(base)
                .with_method(
                    MethodBuilder::public("Go").with_flags(METHOD_FAMILY | METHOD_HIDE_BY_SIG),
                ),
        );
        let outer = tests.add_type(TypeBuilder::new("A", "Outer"));
        tests.add_type(
            TypeBuilder::new("", "Inner")
                .with_enclosing(outer)
                .with_extends(base),
        );
        tests.write_to(dir)
    }

    #[test]
    fn reported_type_declares_method() {
        let dir = tempfile::tempdir().unwrap();
        let tests = local_module(dir.path());

        let target = find(&tests, "A.B", "Go", &NavigationConfig::default()).unwrap();
        assert_eq!(target, NavigationTarget::new(tests.clone(), "A.B", "Go"));
    }

    #[test]
    fn inherited_from_local_base() {
        let dir = tempfile::tempdir().unwrap();
        let tests = local_module(dir.path());

        let target = find(&tests, "A.Derived", "Go", &NavigationConfig::default()).unwrap();
        assert_eq!(target.type_name, "A.Base");
        assert_eq!(target.module_path, tests);

        let nested = find(&tests, "A.Outer+Inner", "Go", &NavigationConfig::default()).unwrap();
        assert_eq!(nested.type_name, "A.Base");
    }

    #[test]
    fn visibility_and_ambiguity() {
        let dir = tempfile::tempdir().unwrap();
        let tests = local_module(dir.path());
        let config = NavigationConfig::default();

        // The private method is skipped, the walk continues to the public one on the base
        let hidden = find(&tests, "A.Hidden", "Go", &config).unwrap();
        assert_eq!(hidden.type_name, "A.Base");

        assert!(find(&tests, "A.Twice", "Go", &config).is_none());
        assert!(find(&tests, "A.Twins", "Go", &config).is_none());
        assert!(find(&tests, "A.Derived", "Stop", &config).is_none());
    }

    #[test]
    fn overloads_defer_to_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        let tests = local_module(dir.path());

        let target = find(&tests, "A.Overloads", "Go", &NavigationConfig::default()).unwrap();
        assert_eq!(target, NavigationTarget::new(tests.clone(), "A.Base", "Go"));
    }

    #[test]
    fn protected_method_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let tests = local_module(dir.path());

        let target = find(&tests, "A.Guarded", "Go", &NavigationConfig::default()).unwrap();
        assert_eq!(target.type_name, "A.Base");
    }

    #[test]
    fn reported_and_ancestor_match() {
        let dir = tempfile::tempdir().unwrap();
        let tests = local_module(dir.path());

        assert!(find(&tests, "A.Both", "Go", &NavigationConfig::default()).is_none());
    }

    #[test]
    fn misses() {
        let dir = tempfile::tempdir().unwrap();
        let tests = local_module(dir.path());
        let config = NavigationConfig::default();

        assert!(find(&tests, "A.Missing", "Go", &config).is_none());
        assert!(find(&tests, "A.Derived", "Missing", &config).is_none());
        assert!(find(&tests, "a.derived", "Go", &config).is_none());
    }

    #[test]
    fn depth_limit() {
        let dir = tempfile::tempdir().unwrap();
        let tests = local_module(dir.path());

        let shallow = NavigationConfig::default().with_max_inheritance_depth(0);
        assert!(find(&tests, "A.Derived", "Go", &shallow).is_none());
        assert!(find(&tests, "A.B", "Go", &shallow).is_some());
    }

    #[test]
    fn inherited_across_modules() {
        let dir = tempfile::tempdir().unwrap();

        let mut base = ModuleBuilder::new("Y");
        let corlib = base.add_assembly_ref("mscorlib");
        let object = base.add_type_ref(corlib, "System", "Object");
        let root = base.add_type(
            TypeBuilder::new("A.Shared", "Root")
                .with_extends(object)
                .with_method(MethodBuilder::public("Go")),
        );
        let outer = base.add_type(TypeBuilder::new("A.Shared", "Holder"));
        base.add_type(
            TypeBuilder::new("", "Base")
                .with_enclosing(outer)
                .with_extends(root),
        );
        let y = base.write_to(dir.path());

        let mut derived = ModuleBuilder::new("X");
        let y_ref = derived.add_assembly_ref("Y");
        let holder_ref = derived.add_type_ref(y_ref, "A.Shared", "Holder");
        let base_ref = derived.add_type_ref(holder_ref, "", "Base");
        derived.add_type(TypeBuilder::new("A", "Derived").with_extends(base_ref));
        let x = derived.write_to(dir.path());

        let mut cache = ModuleCache::new();
        let config = NavigationConfig::default();
        let mut resolver = MetadataResolver::new(&mut cache, &config);
        let target = resolver
            .find_declaring_type(&x, "A.Derived", "Go")
            .unwrap()
            .unwrap();

        assert_eq!(target.module_path, y);
        assert_eq!(target.type_name, "A.Shared.Root");
        assert_eq!(target.method_name, "Go");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn broken_chains_keep_candidate() {
        let dir = tempfile::tempdir().unwrap();

        let mut tests = ModuleBuilder::new("Tests");
        let gone = tests.add_assembly_ref("Gone");
        let broken = tests.add_assembly_ref("Broken");
        let gone_base = tests.add_type_ref(gone, "Gone", "Base");
        let broken_base = tests.add_type_ref(broken, "Broken", "Base");
        let spec = tests.add_type_spec(vec![0x15, 0x12, 0x08, 0x01, 0x08]);
        tests.add_type(
            TypeBuilder::new("A", "Orphan")
                .with_extends(gone_base)
                .with_method(MethodBuilder::public("Go")),
        );
        tests.add_type(TypeBuilder::new("A", "Lost").with_extends(gone_base));
        tests.add_type(
            TypeBuilder::new("A", "Damaged")
                .with_extends(broken_base)
                .with_method(MethodBuilder::public("Go")),
        );
        tests.add_type(
            TypeBuilder::new("A", "Generic")
                .with_extends(spec)
                .with_method(MethodBuilder::public("Go")),
        );
        tests.add_type(
            TypeBuilder::new("A", "SelfDefined")
                .with_extends(CodedIndex::new(TableId::TypeDef, 1))
                .with_method(MethodBuilder::public("Go")),
        );
        let path = tests.write_to(dir.path());
        std::fs::write(dir.path().join("Broken.dll"), [0xCC; 64]).unwrap();

        let config = NavigationConfig::default();
        assert_eq!(find(&path, "A.Orphan", "Go", &config).unwrap().type_name, "A.Orphan");
        assert!(find(&path, "A.Lost", "Go", &config).is_none());
        assert_eq!(find(&path, "A.Damaged", "Go", &config).unwrap().type_name, "A.Damaged");
        assert_eq!(find(&path, "A.Generic", "Go", &config).unwrap().type_name, "A.Generic");
        assert_eq!(
            find(&path, "A.SelfDefined", "Go", &config).unwrap().type_name,
            "A.SelfDefined"
        );
    }

    #[test]
    fn missing_origin_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = ModuleCache::new();
        let config = NavigationConfig::default();
        let mut resolver = MetadataResolver::new(&mut cache, &config);

        let error = resolver
            .find_declaring_type(&dir.path().join("Nope.dll"), "A.B", "Go")
            .unwrap_err();
        assert!(error.is_not_found());
    }
}
