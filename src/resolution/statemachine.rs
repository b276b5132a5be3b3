//! Finding the compiler generated state machine type of an async or iterator method.
//!
//! The compiler marks such a method with an attribute deriving from
//! `System.Runtime.CompilerServices.StateMachineAttribute` whose constructor receives the
//! generated type as a `System.Type` argument. The argument is stored as a serialized type name
//! in the attribute blob.

use std::path::Path;

use tracing::{debug, trace, warn};

use crate::{
    metadata::{
        customattributes::{parse_fixed_arguments, CustomAttributeArgument, FixedArgType},
        signatures::{parse_method_signature, TypeSignature},
        tables::{CodedIndex, CustomAttributeRaw, MemberRefRaw, MethodDefRaw, TableId, TypeDefRaw},
        token::Token,
        view::ModuleMetadata,
    },
    resolution::{
        find_type_by_full_name, public_methods_named, resolve_type, type_ref_full_name,
        DirectoryLocator, MetadataResolver, NavigationTarget, ResolvedModule, TypeHandle,
        TypeResolution,
    },
    Error::NotSupported,
    Result,
};

/// Attribute types that mark a state machine method.
///
/// The first entry is the common base. The derived framework attributes are listed as well since
/// the framework modules defining them usually cannot be located next to a test module.
pub const STATE_MACHINE_ATTRIBUTES: &[&str] = &[
    "System.Runtime.CompilerServices.StateMachineAttribute",
    "System.Runtime.CompilerServices.AsyncStateMachineAttribute",
    "System.Runtime.CompilerServices.IteratorStateMachineAttribute",
    "System.Runtime.CompilerServices.AsyncIteratorStateMachineAttribute",
];

const SYSTEM_TYPE: &str = "System.Type";
const STATE_MACHINE_PARAMETER: &str = "stateMachineType";

/// The constructor of an attribute instance
struct AttributeConstructor {
    /// The attribute type declaring the constructor
    attribute_type: TypeHandle,
    /// Blob index of the constructor signature
    signature: u32,
    /// The constructor definition, when it lives in the same module
    definition: Option<MethodDefRaw>,
}

impl AttributeConstructor {
    /// Read the constructor `index` of a `CustomAttribute` row, `None` when the constructor is
    /// not owned by a type definition or reference.
    fn read(metadata: &ModuleMetadata<'_>, index: CodedIndex) -> Result<Option<Self>> {
        match index.tag {
            TableId::MethodDef => {
                let Some(method) = metadata.row::<MethodDefRaw>(index.row) else {
                    return Err(malformed_error!("Invalid MethodDef row - {}", index.row));
                };
                let Some(owner) = metadata.method_owner(index.row) else {
                    return Err(malformed_error!("MethodDef {} has no owner", index.row));
                };

                Ok(Some(AttributeConstructor {
                    attribute_type: TypeHandle::Definition(owner.rid),
                    signature: method.signature,
                    definition: Some(method),
                }))
            }
            TableId::MemberRef => {
                let Some(member) = metadata.row::<MemberRefRaw>(index.row) else {
                    return Err(malformed_error!("Invalid MemberRef row - {}", index.row));
                };

                let attribute_type = match member.class.tag {
                    TableId::TypeDef | TableId::TypeRef if !member.class.is_null() => {
                        TypeHandle::from(member.class)
                    }
                    _ => return Ok(None),
                };

                Ok(Some(AttributeConstructor {
                    attribute_type,
                    signature: member.signature,
                    definition: None,
                }))
            }
            _ => Ok(None),
        }
    }

    /// Position of the `System.Type` parameter receiving the state machine type.
    ///
    /// A local constructor with `Param` rows is matched by parameter name, any other constructor
    /// must have exactly one `System.Type` parameter.
    fn state_machine_parameter(
        &self,
        metadata: &ModuleMetadata<'_>,
        types: &[FixedArgType],
    ) -> Result<Option<usize>> {
        if let Some(definition) = &self.definition {
            let params = metadata.params(definition);
            if !params.is_empty() {
                for param in params {
                    // Sequence 0 describes the return value
                    if param.sequence == 0 {
                        continue;
                    }

                    if metadata.string(param.name)? == STATE_MACHINE_PARAMETER {
                        let index = param.sequence as usize - 1;
                        return Ok((types.get(index) == Some(&FixedArgType::SystemType))
                            .then_some(index));
                    }
                }

                return Ok(None);
            }
        }

        let mut type_params = types
            .iter()
            .enumerate()
            .filter(|(_, arg_type)| **arg_type == FixedArgType::SystemType)
            .map(|(index, _)| index);

        match (type_params.next(), type_params.next()) {
            (Some(index), None) => Ok(Some(index)),
            _ => Ok(None),
        }
    }
}

impl MetadataResolver<'_> {
    /// Find the generated state machine type of the public method `method_name` on `type_name`.
    ///
    /// The method must be the only public method of that name. Its attributes are searched for
    /// one whose type is, or derives from, a state machine attribute. The generated type named by
    /// that attribute is returned together with the configured resumption method name. Several
    /// state machine attributes on one method yield `None`.
    ///
    /// # Errors
    /// Returns an error if the module at `origin` cannot be opened, or its metadata or a state
    /// machine attribute is damaged.
    pub fn find_state_machine_type(
        &mut self,
        origin: &Path,
        type_name: &str,
        method_name: &str,
    ) -> Result<Option<NavigationTarget>> {
        let view = self.cache.get_or_open(origin)?;
        let module = ResolvedModule::new(origin.to_path_buf(), view);
        let metadata = module.metadata();

        let Some(rid) = find_type_by_full_name(metadata, type_name)? else {
            debug!(module = %origin.display(), type_name, "reported type not found");
            return Ok(None);
        };
        let Some(typedef) = metadata.row::<TypeDefRaw>(rid) else {
            return Err(malformed_error!("Invalid TypeDef row - {}", rid));
        };

        let methods = public_methods_named(metadata, &typedef, method_name)?;
        let [method] = methods.as_slice() else {
            debug!(
                type_name,
                method = method_name,
                count = methods.len(),
                "no single public method, skipping state machine lookup"
            );
            return Ok(None);
        };

        let Some(attributes) = metadata.table::<CustomAttributeRaw>() else {
            return Ok(None);
        };

        let mut candidate: Option<String> = None;
        for attribute in attributes.iter() {
            if attribute.parent.tag != TableId::MethodDef || attribute.parent.row != method.rid {
                continue;
            }

            let Some(constructor) = AttributeConstructor::read(metadata, attribute.constructor)?
            else {
                continue;
            };
            if !self.is_state_machine_attribute(&module, constructor.attribute_type)? {
                continue;
            }

            let Some(generated) = state_machine_argument(metadata, &constructor, attribute.value)?
            else {
                continue;
            };

            if candidate.is_some() {
                debug!(
                    type_name,
                    method = method_name,
                    "several state machine attributes, ambiguous"
                );
                return Ok(None);
            }
            candidate = Some(generated);
        }

        Ok(candidate.map(|generated| {
            trace!(type_name, method = method_name, %generated, "found state machine type");
            NavigationTarget::new(
                origin.to_path_buf(),
                &generated,
                &self.config.state_machine_method,
            )
        }))
    }

    /// Whether `handle` or one of its base types is a state machine attribute.
    ///
    /// Base types that cannot be resolved end the walk without a match.
    fn is_state_machine_attribute(
        &mut self,
        module: &ResolvedModule,
        handle: TypeHandle,
    ) -> Result<bool> {
        let mut module = module.clone();
        let mut handle = handle;

        for _ in 0..=self.config.max_inheritance_depth {
            let name = match handle {
                TypeHandle::Definition(rid) => module.metadata().type_full_name(rid)?,
                TypeHandle::Reference(rid) => type_ref_full_name(module.metadata(), rid)?,
                TypeHandle::Nil | TypeHandle::Specification(_) => return Ok(false),
            };
            if STATE_MACHINE_ATTRIBUTES.contains(&name.as_str()) {
                return Ok(true);
            }

            let mut locator = DirectoryLocator::beside(
                self.cache,
                &module.path,
                &self.config.module_extensions,
            );
            let rid = match resolve_type(&module, handle, &mut locator) {
                Ok(TypeResolution::Found(result)) => {
                    let (resolved, rid) = result.into_parts(&module);
                    module = resolved;
                    rid
                }
                Ok(TypeResolution::Nil) => return Ok(false),
                Ok(TypeResolution::Failed(reason)) => {
                    trace!(attribute = %name, %reason, "attribute base chain ends unresolved");
                    return Ok(false);
                }
                Err(error) => {
                    warn!(
                        module = %module.path.display(),
                        attribute = %name,
                        %error,
                        "failed to resolve attribute type"
                    );
                    return Ok(false);
                }
            };

            let Some(typedef) = module.metadata().row::<TypeDefRaw>(rid) else {
                return Err(malformed_error!("Invalid TypeDef row - {}", rid));
            };
            handle = TypeHandle::from(typedef.extends);
        }

        Ok(false)
    }
}

/// The state machine type name stored in the attribute blob `value`
fn state_machine_argument(
    metadata: &ModuleMetadata<'_>,
    constructor: &AttributeConstructor,
    value: u32,
) -> Result<Option<String>> {
    let signature = parse_method_signature(metadata.blob(constructor.signature)?)?;

    let classify = |signature: &TypeSignature| match signature {
        TypeSignature::Class(token) => {
            if token_full_name(metadata, *token).is_ok_and(|name| name.as_deref() == Some(SYSTEM_TYPE)) {
                FixedArgType::SystemType
            } else {
                FixedArgType::Unsupported
            }
        }
        TypeSignature::ValueType(_) => FixedArgType::Enum,
        _ => FixedArgType::Unsupported,
    };
    let types: Vec<FixedArgType> = signature
        .params
        .iter()
        .map(|param| FixedArgType::from_signature(&param.base, &classify))
        .collect();

    let Some(index) = constructor.state_machine_parameter(metadata, &types)? else {
        return Ok(None);
    };

    let leading = &types[..=index];
    if leading.contains(&FixedArgType::Unsupported) {
        trace!(index, "state machine argument preceded by undecodable argument");
        return Ok(None);
    }

    let mut arguments = match parse_fixed_arguments(metadata.blob(value)?, leading) {
        Ok(arguments) => arguments,
        Err(NotSupported) => return Ok(None),
        Err(error) => return Err(error),
    };
    match arguments.pop() {
        Some(CustomAttributeArgument::Type(Some(name))) => {
            Ok(Some(strip_assembly_name(&name).to_string()))
        }
        _ => Ok(None),
    }
}

/// Full name of the type a signature token points at
fn token_full_name(metadata: &ModuleMetadata<'_>, token: Token) -> Result<Option<String>> {
    if token.is_table(TableId::TypeRef) {
        type_ref_full_name(metadata, token.row()).map(Some)
    } else if token.is_table(TableId::TypeDef) {
        metadata.type_full_name(token.row()).map(Some)
    } else {
        Ok(None)
    }
}

/// Drop the assembly qualification of a serialized type name.
///
/// Commas inside generic argument brackets belong to the arguments and are kept.
fn strip_assembly_name(name: &str) -> &str {
    let mut depth = 0_usize;
    for (index, ch) in name.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return name[..index].trim_end(),
            _ => {}
        }
    }

    name.trim_end()
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::{
        metadata::cache::ModuleCache,
        navigation::NavigationConfig,
        test::{
            attribute_value, compressed_type_token, ser_string, type_ctor_signature, CtorRef,
            MethodBuilder, ModuleBuilder, TypeBuilder, SIG_INSTANCE_VOID,
        },
    };

    const COMPILER_SERVICES: &str = "System.Runtime.CompilerServices";

    fn find(origin: &Path, type_name: &str, method_name: &str) -> Option<NavigationTarget> {
        let mut cache = ModuleCache::new();
        let config = NavigationConfig::default();
        let mut resolver = MetadataResolver::new(&mut cache, &config);
        resolver
            .find_state_machine_type(origin, type_name, method_name)
            .unwrap()
    }

    fn type_arg(name: Option<&str>) -> Vec<u8> {
        attribute_value(&ser_string(name))
    }

    /// Tests.dll with `N.C` carrying framework and local state machine attributes
    fn module(dir: &Path) -> PathBuf {
        let mut tests = ModuleBuilder::new("Tests");
        let runtime = tests.add_assembly_ref("System.Runtime");
        let system_type = tests.add_type_ref(runtime, "System", "Type");
        let base_attribute =
            tests.add_type_ref(runtime, COMPILER_SERVICES, "StateMachineAttribute");
        let async_attribute =
            tests.add_type_ref(runtime, COMPILER_SERVICES, "AsyncStateMachineAttribute");
        let step_through =
            tests.add_type_ref(runtime, "System.Diagnostics", "DebuggerStepThroughAttribute");

        let async_ctor =
            tests.add_member_ref(async_attribute, ".ctor", type_ctor_signature(system_type));
        let step_ctor = tests.add_member_ref(step_through, ".ctor", SIG_INSTANCE_VOID.to_vec());

        let mut two_types = vec![0x20, 0x02, 0x01, 0x12];
        two_types.extend_from_slice(&compressed_type_token(system_type));
        two_types.push(0x12);
        two_types.extend_from_slice(&compressed_type_token(system_type));
        let local_attribute = tests.add_type(
            TypeBuilder::new("N", "TracedStateMachineAttribute")
                .with_extends(base_attribute)
                .with_method(
                    MethodBuilder::public(".ctor")
                        .with_signature(two_types)
                        .with_param("origin")
                        .with_param(STATE_MACHINE_PARAMETER),
                ),
        );

        let fixture = tests.add_type(
            TypeBuilder::new("N", "C")
                .with_method(MethodBuilder::public("Run"))
                .with_method(MethodBuilder::public("Plain"))
                .with_method(MethodBuilder::public("Traced"))
                .with_method(MethodBuilder::public("Both"))
                .with_method(MethodBuilder::public("Twice"))
                .with_method(MethodBuilder::public("Twice"))
                .with_method(MethodBuilder::private("Hidden"))
                .with_method(MethodBuilder::public("Unnamed"))
                .with_method(MethodBuilder::public("Mixed")),
        );

        tests.add_method_attribute(
            fixture,
            0,
            CtorRef::Member(step_ctor),
            attribute_value(&[]),
        );
        tests.add_method_attribute(
            fixture,
            0,
            CtorRef::Member(async_ctor),
            type_arg(Some(
                "N.C+<Run>d__0, Tests, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null",
            )),
        );

        let mut traced = ser_string(Some("N.Wrong"));
        traced.extend_from_slice(&ser_string(Some("N.C+<Traced>d__2")));
        tests.add_method_attribute(
            fixture,
            2,
            CtorRef::Def {
                type_rid: local_attribute.row,
                index: 0,
            },
            attribute_value(&traced),
        );

        for name in ["N.C+<Both>d__3", "N.C+<Both>d__4"] {
            tests.add_method_attribute(
                fixture,
                3,
                CtorRef::Member(async_ctor),
                type_arg(Some(name)),
            );
        }
        for index in [4, 6] {
            tests.add_method_attribute(
                fixture,
                index,
                CtorRef::Member(async_ctor),
                type_arg(Some("N.C+<Other>d__9")),
            );
        }
        tests.add_method_attribute(fixture, 7, CtorRef::Member(async_ctor), type_arg(None));

        // `.ctor(class Other, class System.Type)`: the leading argument cannot be decoded
        let other = tests.add_type_ref(runtime, "System", "Uri");
        let mut other_first = vec![0x20, 0x02, 0x01, 0x12];
        other_first.extend_from_slice(&compressed_type_token(other));
        other_first.push(0x12);
        other_first.extend_from_slice(&compressed_type_token(system_type));
        let other_ctor = tests.add_member_ref(async_attribute, ".ctor", other_first);
        tests.add_method_attribute(
            fixture,
            8,
            CtorRef::Member(other_ctor),
            attribute_value(&[0x03, b'u', b'r', b'i', 0x03, b'N', b'.', b'X']),
        );
        tests.add_method_attribute(
            fixture,
            8,
            CtorRef::Member(async_ctor),
            type_arg(Some("N.C+<Mixed>d__8, Tests")),
        );

        tests.write_to(dir)
    }

    #[test]
    fn framework_attribute() {
        let dir = tempfile::tempdir().unwrap();
        let tests = module(dir.path());

        let target = find(&tests, "N.C", "Run").unwrap();
        assert_eq!(
            target,
            NavigationTarget::new(tests.clone(), "N.C+<Run>d__0", "MoveNext")
        );
    }

    #[test]
    fn local_attribute_by_parameter_name() {
        let dir = tempfile::tempdir().unwrap();
        let tests = module(dir.path());

        let target = find(&tests, "N.C", "Traced").unwrap();
        assert_eq!(target.type_name, "N.C+<Traced>d__2");
        assert_eq!(target.method_name, "MoveNext");
    }

    #[test]
    fn undecodable_attribute_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let tests = module(dir.path());

        let target = find(&tests, "N.C", "Mixed").unwrap();
        assert_eq!(target.type_name, "N.C+<Mixed>d__8");
    }

    #[test]
    fn no_result() {
        let dir = tempfile::tempdir().unwrap();
        let tests = module(dir.path());

        assert!(find(&tests, "N.C", "Plain").is_none());
        assert!(find(&tests, "N.C", "Both").is_none());
        assert!(find(&tests, "N.C", "Twice").is_none());
        assert!(find(&tests, "N.C", "Hidden").is_none());
        assert!(find(&tests, "N.C", "Unnamed").is_none());
        assert!(find(&tests, "N.C", "Missing").is_none());
        assert!(find(&tests, "N.Missing", "Run").is_none());
    }

    #[test]
    fn resumption_method_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let tests = module(dir.path());

        let mut cache = ModuleCache::new();
        let config = NavigationConfig::default().with_state_machine_method("Resume");
        let mut resolver = MetadataResolver::new(&mut cache, &config);
        let target = resolver
            .find_state_machine_type(&tests, "N.C", "Run")
            .unwrap()
            .unwrap();
        assert_eq!(target.method_name, "Resume");
    }

    /// `Tests.dll` uses an attribute from `Attrs.dll` deriving from the framework base attribute
    fn cross_module(dir: &Path, with_attrs: bool) -> PathBuf {
        if with_attrs {
            let mut attrs = ModuleBuilder::new("Attrs");
            let runtime = attrs.add_assembly_ref("System.Runtime");
            let base = attrs.add_type_ref(runtime, COMPILER_SERVICES, "StateMachineAttribute");
            attrs.add_type(TypeBuilder::new("Attrs", "CustomStateMachineAttribute").with_extends(base));
            attrs.write_to(dir);
        }

        let mut tests = ModuleBuilder::new("Tests");
        let runtime = tests.add_assembly_ref("System.Runtime");
        let attrs = tests.add_assembly_ref("Attrs");
        let system_type = tests.add_type_ref(runtime, "System", "Type");
        let custom = tests.add_type_ref(attrs, "Attrs", "CustomStateMachineAttribute");
        let ctor = tests.add_member_ref(custom, ".ctor", type_ctor_signature(system_type));
        let fixture = tests.add_type(TypeBuilder::new("N", "C").with_method(MethodBuilder::public("Run")));
        tests.add_method_attribute(
            fixture,
            0,
            CtorRef::Member(ctor),
            type_arg(Some("N.C+<Run>d__0, Tests")),
        );
        tests.write_to(dir)
    }

    #[test]
    fn derived_attribute_in_other_module() {
        let dir = tempfile::tempdir().unwrap();
        let tests = cross_module(dir.path(), true);

        let target = find(&tests, "N.C", "Run").unwrap();
        assert_eq!(target.type_name, "N.C+<Run>d__0");
        assert_eq!(target.module_path, tests);
    }

    #[test]
    fn unresolvable_attribute_base() {
        let dir = tempfile::tempdir().unwrap();
        let tests = cross_module(dir.path(), false);

        assert!(find(&tests, "N.C", "Run").is_none());
    }

    #[test]
    fn assembly_qualification() {
        assert_eq!(strip_assembly_name("N.C+<Run>d__0, Tests"), "N.C+<Run>d__0");
        assert_eq!(strip_assembly_name("N.C+<Run>d__0"), "N.C+<Run>d__0");
        assert_eq!(
            strip_assembly_name("N.G`1[[System.Int32, mscorlib]], Tests, Version=1.0.0.0"),
            "N.G`1[[System.Int32, mscorlib]]"
        );
    }
}
