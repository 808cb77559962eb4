//! Managed proxy generation
//!
//! [`ManagedProxyGenerator`] turns a [`ManagedType`] into a [`ProxyFactory`]:
//! a dispatch table mapping every method of the type to its generated
//! implementation. Abstract getters and setters go to the state store;
//! default methods run their own body with setters disabled.
//!
//! Nothing here is synchronized or cached. Callers generate behind a single
//! [`crate::TypeCache`] which publishes the resulting factory.

use crate::config::{ConfigError, GeneratorConfig};
use crate::error::ProxyError;
use crate::instance::ManagedInstance;
use crate::schema::{ManagedMethod, ManagedType, MethodBody, MethodKind, MethodSignature, TypeKind};
use indexmap::IndexMap;
use modelkit_core::{ModelElementState, ModelValue, ValueType};
use std::collections::HashSet;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use uuid::Uuid;

/// Generates proxy implementations of managed types
#[derive(Debug, Clone, Default)]
pub struct ManagedProxyGenerator {
    config: GeneratorConfig,
}

impl ManagedProxyGenerator {
    /// Create generator with default naming conventions
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create generator with custom configuration
    ///
    /// # Errors
    /// Returns error if the configuration is invalid
    pub fn with_config(config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate an implementation of `managed_type`
    ///
    /// Every call produces a new, independent implementation.
    ///
    /// # Errors
    /// Returns [`ProxyError::ContractViolation`] if an abstract method cannot
    /// be mapped to a getter or setter, or an interface declares an
    /// initializer
    pub fn generate(&self, managed_type: &ManagedType) -> Result<ProxyFactory, ProxyError> {
        if managed_type.kind() == TypeKind::Interface && managed_type.initializer().is_some() {
            return Err(ProxyError::contract_violation(
                managed_type.name(),
                "<init>",
                "only abstract classes may declare an initializer",
            ));
        }

        let mut seen: HashSet<(&str, &[ValueType])> = HashSet::new();
        let mut methods: IndexMap<String, Vec<GeneratedMethod>> = IndexMap::new();

        for method in managed_type.methods() {
            if !seen.insert((method.name(), method.signature().params.as_slice())) {
                continue;
            }
            let dispatch = self.dispatch_for(managed_type, method)?;
            methods
                .entry(method.name().to_string())
                .or_default()
                .push(GeneratedMethod {
                    signature: method.signature().clone(),
                    dispatch,
                });
        }

        let generated = GeneratedType {
            id: Uuid::new_v4(),
            name: format!("{}{}", managed_type.name(), self.config.impl_suffix),
            managed_type: managed_type.clone(),
            getter_prefix: self.config.getter_prefix.clone(),
            setter_prefix: self.config.setter_prefix.clone(),
            methods,
        };

        tracing::debug!(
            "Generated {} for managed type {} ({} methods)",
            generated.name,
            managed_type.name(),
            generated.methods.len()
        );

        Ok(ProxyFactory {
            generated: Arc::new(generated),
        })
    }

    fn dispatch_for(
        &self,
        managed_type: &ManagedType,
        method: &ManagedMethod,
    ) -> Result<Dispatch, ProxyError> {
        match method.kind() {
            MethodKind::Default(body) => Ok(Dispatch::Default(Arc::clone(body))),
            MethodKind::Abstract => self.accessor_for(managed_type, method),
        }
    }

    fn accessor_for(
        &self,
        managed_type: &ManagedType,
        method: &ManagedMethod,
    ) -> Result<Dispatch, ProxyError> {
        let violation =
            |reason: &str| ProxyError::contract_violation(managed_type.name(), &method.to_string(), reason);
        let signature = method.signature();

        if let Some(rest) = method.name().strip_prefix(self.config.getter_prefix.as_str()) {
            if rest.is_empty() {
                return Err(violation("getter name has no property part"));
            }
            if !signature.params.is_empty() {
                return Err(violation("getter must not take parameters"));
            }
            if signature.returns.is_none() {
                return Err(violation("getter must declare a return type"));
            }
            return Ok(Dispatch::StateGetter {
                property: uncapitalize(rest),
            });
        }

        if let Some(rest) = method.name().strip_prefix(self.config.setter_prefix.as_str()) {
            if rest.is_empty() {
                return Err(violation("setter name has no property part"));
            }
            if signature.params.len() != 1 {
                return Err(violation("setter must take exactly one parameter"));
            }
            if signature.returns.is_some() {
                return Err(violation("setter must not return a value"));
            }
            return Ok(Dispatch::StateSetter {
                property: uncapitalize(rest),
            });
        }

        Err(violation("abstract method is neither a getter nor a setter"))
    }
}

/// Lower-cases the first character: `FirstName` → `firstName`
fn uncapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Generated implementation of one method
pub(crate) enum Dispatch {
    /// Read `property` from the state store
    StateGetter { property: String },
    /// Write `property` to the state store, if setters are allowed
    StateSetter { property: String },
    /// Default method body, run with setters disabled
    Default(MethodBody),
}

pub(crate) struct GeneratedMethod {
    pub(crate) signature: MethodSignature,
    pub(crate) dispatch: Dispatch,
}

/// A generated implementation: identity plus dispatch table
pub(crate) struct GeneratedType {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) managed_type: ManagedType,
    pub(crate) getter_prefix: String,
    pub(crate) setter_prefix: String,
    pub(crate) methods: IndexMap<String, Vec<GeneratedMethod>>,
}

impl GeneratedType {
    /// Pick the overload of `method` that accepts `args`
    pub(crate) fn resolve(
        &self,
        method: &str,
        args: &[ModelValue],
    ) -> Result<&GeneratedMethod, ProxyError> {
        let candidates = self
            .methods
            .get(method)
            .ok_or_else(|| ProxyError::NoSuchMethod {
                type_name: self.managed_type.name().to_string(),
                method: method.to_string(),
            })?;

        let mut type_mismatch = None;
        for candidate in candidates {
            let params = &candidate.signature.params;
            if params.len() != args.len() {
                continue;
            }
            match params
                .iter()
                .zip(args)
                .find(|(param, arg)| !arg.is_assignable_to(**param))
            {
                None => return Ok(candidate),
                Some((param, arg)) => {
                    if type_mismatch.is_none() {
                        type_mismatch = Some(ProxyError::TypeMismatch {
                            method: method.to_string(),
                            expected: *param,
                            actual: arg.type_name(),
                        });
                    }
                }
            }
        }

        Err(type_mismatch.unwrap_or_else(|| ProxyError::ArityMismatch {
            method: method.to_string(),
            expected: candidates[0].signature.params.len(),
            actual: args.len(),
        }))
    }

    pub(crate) fn has_method(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// Whether every overload of `method` is an abstract setter
    pub(crate) fn is_state_setter(&self, method: &str) -> bool {
        self.methods.get(method).is_some_and(|candidates| {
            candidates
                .iter()
                .all(|c| matches!(c.dispatch, Dispatch::StateSetter { .. }))
        })
    }
}

/// Creates instances of one generated implementation
///
/// Cheap to clone; all clones share the same implementation.
#[derive(Clone)]
pub struct ProxyFactory {
    generated: Arc<GeneratedType>,
}

impl ProxyFactory {
    /// Create an instance backed by `state`
    ///
    /// Runs the base initializer (abstract classes only) with setters
    /// disabled; setters become available once construction completes.
    ///
    /// # Errors
    /// Propagates any error raised by the base initializer
    pub fn create(&self, state: Arc<dyn ModelElementState>) -> Result<ManagedInstance, ProxyError> {
        ManagedInstance::construct(Arc::clone(&self.generated), state)
    }

    /// Name of the generated implementation (e.g. `Person_Impl`)
    #[inline]
    #[must_use]
    pub fn generated_type_name(&self) -> &str {
        &self.generated.name
    }

    /// Unique identity of this implementation
    #[inline]
    #[must_use]
    pub fn type_id(&self) -> Uuid {
        self.generated.id
    }

    /// The implemented managed type
    #[inline]
    #[must_use]
    pub fn managed_type(&self) -> &ManagedType {
        &self.generated.managed_type
    }

    /// Names of all implemented methods, in declaration order
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.generated.methods.keys().map(String::as_str)
    }
}

impl Debug for ProxyFactory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyFactory")
            .field("generated_type", &self.generated.name)
            .field("type_id", &self.generated.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelkit_core::DefaultModelElementState;

    fn person() -> ManagedType {
        ManagedType::interface("Person")
            .property("name", ValueType::String)
            .property("age", ValueType::Integer)
            .build()
    }

    #[test]
    fn generated_type_is_named_after_managed_type() {
        let factory = ManagedProxyGenerator::new().generate(&person()).unwrap();
        assert_eq!(factory.generated_type_name(), "Person_Impl");
        assert_eq!(factory.managed_type().name(), "Person");
    }

    #[test]
    fn custom_suffix() {
        let config = GeneratorConfig::new().with_impl_suffix("Proxy");
        let generator = ManagedProxyGenerator::with_config(config).unwrap();
        let factory = generator.generate(&person()).unwrap();
        assert_eq!(factory.generated_type_name(), "PersonProxy");
    }

    #[test]
    fn each_generation_is_a_distinct_implementation() {
        let generator = ManagedProxyGenerator::new();
        let a = generator.generate(&person()).unwrap();
        let b = generator.generate(&person()).unwrap();
        assert_ne!(a.type_id(), b.type_id());
        assert_eq!(a.clone().type_id(), a.type_id());
    }

    #[test]
    fn non_accessor_abstract_method_is_contract_violation() {
        let ty = ManagedType::interface("Thing")
            .property("name", ValueType::String)
            .abstract_method("frobnicate", MethodSignature::new(vec![], None))
            .build();

        let err = ManagedProxyGenerator::new().generate(&ty).unwrap_err();
        match err {
            ProxyError::ContractViolation {
                type_name, method, ..
            } => {
                assert_eq!(type_name, "Thing");
                assert_eq!(method, "frobnicate()");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_accessors_are_contract_violations() {
        let cases = [
            ManagedMethod::abstract_method("get", MethodSignature::getter(ValueType::String)),
            ManagedMethod::abstract_method(
                "getName",
                MethodSignature::new(vec![ValueType::String], Some(ValueType::String)),
            ),
            ManagedMethod::abstract_method("getName", MethodSignature::new(vec![], None)),
            ManagedMethod::abstract_method("setName", MethodSignature::new(vec![], None)),
            ManagedMethod::abstract_method(
                "setName",
                MethodSignature::new(vec![ValueType::String], Some(ValueType::Bool)),
            ),
        ];

        for method in cases {
            let ty = ManagedType::interface("Broken")
                .abstract_method(method.name().to_string(), method.signature().clone())
                .build();
            let result = ManagedProxyGenerator::new().generate(&ty);
            assert!(
                matches!(result, Err(ProxyError::ContractViolation { .. })),
                "{method} should be rejected"
            );
        }
    }

    #[test]
    fn interface_initializer_is_contract_violation() {
        let ty = ManagedType::interface("Person")
            .property("name", ValueType::String)
            .initializer(|_| Ok(()))
            .build();
        let err = ManagedProxyGenerator::new().generate(&ty).unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn duplicate_signatures_keep_first_declaration() {
        let base = ManagedType::interface("Named")
            .property("name", ValueType::String)
            .build();
        let ty = ManagedType::interface("Person")
            .default_getter("getName", ValueType::String, |_| Ok("fixed".into()))
            .extends(&base)
            .build();

        let factory = ManagedProxyGenerator::new().generate(&ty).unwrap();
        let names: Vec<_> = factory.method_names().collect();
        assert_eq!(names, vec!["getName", "setName"]);

        let instance = factory
            .create(Arc::new(DefaultModelElementState::new()))
            .unwrap();
        assert_eq!(instance.get::<String>("name").unwrap(), "fixed");
    }

    #[test]
    fn custom_prefixes_drive_classification() {
        let config = GeneratorConfig::new()
            .with_getter_prefix("read")
            .with_setter_prefix("write");
        let generator = ManagedProxyGenerator::with_config(config).unwrap();
        let ty = ManagedType::interface("Counter")
            .abstract_method("readCount", MethodSignature::getter(ValueType::Integer))
            .abstract_method("writeCount", MethodSignature::setter(ValueType::Integer))
            .build();

        let factory = generator.generate(&ty).unwrap();
        let state = Arc::new(DefaultModelElementState::new());
        let instance = factory.create(state.clone()).unwrap();
        instance.set("count", 3).unwrap();
        assert_eq!(state.get("count").unwrap(), ModelValue::Integer(3));
        assert_eq!(instance.get::<i64>("count").unwrap(), 3);

        let bean = person();
        assert!(generator.generate(&bean).unwrap_err().is_contract_violation());
    }

    #[test]
    fn uncapitalize_property_names() {
        assert_eq!(uncapitalize("FirstName"), "firstName");
        assert_eq!(uncapitalize("URL"), "uRL");
        assert_eq!(uncapitalize(""), "");
    }
}
