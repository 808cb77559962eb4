//! Generated managed instances
//!
//! A [`ManagedInstance`] is one object of a generated implementation. Every
//! property read and write goes to its [`ModelElementState`]; the instance
//! itself holds no property values.
//!
//! # Reentrancy guard
//!
//! Each instance carries a `setters_allowed` flag. It is `false` while the
//! instance is being constructed and while one of the type's own default
//! methods runs; abstract setters fail with
//! [`ProxyError::IllegalSelfMutation`] in that window. Abstract getters are
//! never blocked. The flag is restored
//! by a drop guard, so it survives error returns and unwinding alike.
//!
//! The flag is a [`Cell`]: instances are `!Sync` and must not be shared
//! between threads while a call is in progress.

use crate::error::ProxyError;
use crate::generator::{Dispatch, GeneratedType};
use crate::schema::{capitalize, ManagedType};
use modelkit_core::{FromModelValue, ModelElementState, ModelValue};
use std::cell::Cell;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use uuid::Uuid;

/// Instance of a generated managed type implementation
pub struct ManagedInstance {
    generated: Arc<GeneratedType>,
    state: Arc<dyn ModelElementState>,
    setters_allowed: Cell<bool>,
}

impl ManagedInstance {
    pub(crate) fn construct(
        generated: Arc<GeneratedType>,
        state: Arc<dyn ModelElementState>,
    ) -> Result<Self, ProxyError> {
        let instance = Self {
            generated,
            state,
            setters_allowed: Cell::new(false),
        };

        if let Some(init) = instance.generated.managed_type.initializer() {
            init(&instance)?;
        }

        instance.setters_allowed.set(true);
        Ok(instance)
    }

    /// Call `method` with `args`
    ///
    /// # Errors
    /// - [`ProxyError::NoSuchMethod`] / [`ProxyError::ArityMismatch`] /
    ///   [`ProxyError::TypeMismatch`] if the call does not match the type
    /// - [`ProxyError::IllegalSelfMutation`] for a setter called while a
    ///   default method of this instance is running
    /// - [`ProxyError::State`] for state store failures
    /// - whatever a default method body returns
    pub fn invoke(&self, method: &str, args: &[ModelValue]) -> Result<ModelValue, ProxyError> {
        // Setters refuse before their arguments are looked at
        if self.generated.is_state_setter(method) {
            self.ensure_setters_allowed(method)?;
        }
        let resolved = self.generated.resolve(method, args)?;
        let returns = resolved.signature.returns;

        let value = match &resolved.dispatch {
            Dispatch::StateGetter { property } => self.state.get(property)?,
            Dispatch::StateSetter { property } => {
                self.write_property(method, property, &args[0])?;
                return Ok(ModelValue::Null);
            }
            Dispatch::Default(body) => {
                let _guard = SettersDisabled::enter(&self.setters_allowed);
                body(self, args)?
            }
        };

        match returns {
            Some(expected) if !value.is_assignable_to(expected) => Err(ProxyError::TypeMismatch {
                method: method.to_string(),
                expected,
                actual: value.type_name(),
            }),
            _ => Ok(value),
        }
    }

    fn write_property(
        &self,
        method: &str,
        property: &str,
        value: &ModelValue,
    ) -> Result<(), ProxyError> {
        self.ensure_setters_allowed(method)?;
        self.state.set(property, value.clone())?;
        Ok(())
    }

    fn ensure_setters_allowed(&self, method: &str) -> Result<(), ProxyError> {
        if self.setters_allowed.get() {
            return Ok(());
        }
        tracing::trace!(
            "Rejected {}.{} while setters are disabled",
            self.generated.name,
            method
        );
        Err(ProxyError::IllegalSelfMutation {
            type_name: self.generated.managed_type.name().to_string(),
            method: method.to_string(),
        })
    }

    /// Read `property` through its getter, converting to `T`
    ///
    /// # Errors
    /// Returns [`ProxyError::NoSuchProperty`] if the type has no getter for
    /// `property`, [`ProxyError::Conversion`] if the value is not a `T`, or
    /// any error of [`ManagedInstance::invoke`]
    pub fn get<T: FromModelValue>(&self, property: &str) -> Result<T, ProxyError> {
        let getter = self.accessor_name(&self.generated.getter_prefix, property, "getter")?;
        let value = self.invoke(&getter, &[])?;
        T::from_model_value(value).map_err(|source| ProxyError::Conversion {
            property: property.to_string(),
            source,
        })
    }

    /// Write `property` through its setter
    ///
    /// # Errors
    /// Returns [`ProxyError::NoSuchProperty`] if the type has no setter for
    /// `property`, or any error of [`ManagedInstance::invoke`]
    pub fn set(&self, property: &str, value: impl Into<ModelValue>) -> Result<(), ProxyError> {
        let setter = self.accessor_name(&self.generated.setter_prefix, property, "setter")?;
        self.invoke(&setter, &[value.into()])?;
        Ok(())
    }

    fn accessor_name(
        &self,
        prefix: &str,
        property: &str,
        accessor: &'static str,
    ) -> Result<String, ProxyError> {
        let name = format!("{prefix}{}", capitalize(property));
        if self.generated.has_method(&name) {
            Ok(name)
        } else {
            Err(ProxyError::NoSuchProperty {
                type_name: self.generated.managed_type.name().to_string(),
                property: property.to_string(),
                accessor,
            })
        }
    }

    /// Whether abstract setters may currently be called
    #[inline]
    #[must_use]
    pub fn setters_allowed(&self) -> bool {
        self.setters_allowed.get()
    }

    /// The implemented managed type
    #[inline]
    #[must_use]
    pub fn managed_type(&self) -> &ManagedType {
        &self.generated.managed_type
    }

    /// Name of the generated implementation
    #[inline]
    #[must_use]
    pub fn generated_type_name(&self) -> &str {
        &self.generated.name
    }

    /// Identity of the generated implementation
    #[inline]
    #[must_use]
    pub fn type_id(&self) -> Uuid {
        self.generated.id
    }

    /// Backing state store
    #[inline]
    #[must_use]
    pub fn state(&self) -> &Arc<dyn ModelElementState> {
        &self.state
    }
}

impl Debug for ManagedInstance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedInstance")
            .field("type", &self.generated.name)
            .field("state", &self.state)
            .field("setters_allowed", &self.setters_allowed.get())
            .finish()
    }
}

/// Keeps setters disabled while alive; restores the previous flag on drop
struct SettersDisabled<'a> {
    flag: &'a Cell<bool>,
    previous: bool,
}

impl<'a> SettersDisabled<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        let previous = flag.replace(false);
        Self { flag, previous }
    }
}

impl Drop for SettersDisabled<'_> {
    fn drop(&mut self) {
        self.flag.set(self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::ManagedProxyGenerator;
    use crate::schema::MethodSignature;
    use modelkit_core::{DefaultModelElementState, StateError, ValueType};
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn instance_of(ty: &ManagedType) -> (ManagedInstance, Arc<DefaultModelElementState>) {
        let state = Arc::new(DefaultModelElementState::new());
        let instance = ManagedProxyGenerator::new()
            .generate(ty)
            .unwrap()
            .create(state.clone())
            .unwrap();
        (instance, state)
    }

    fn person() -> ManagedType {
        ManagedType::interface("Person")
            .property("name", ValueType::String)
            .default_getter("getDisplayName", ValueType::String, |this| {
                let name: String = this.get("name")?;
                Ok(format!("<{name}>").into())
            })
            .default_getter("getRenamed", ValueType::String, |this| {
                this.set("name", "renamed")?;
                Ok("unreachable".into())
            })
            .build()
    }

    #[test]
    fn setters_allowed_after_construction() {
        let (instance, state) = instance_of(&person());
        assert!(instance.setters_allowed());

        instance.set("name", "a").unwrap();
        assert_eq!(instance.get::<String>("name").unwrap(), "a");
        assert_eq!(state.get("name").unwrap(), ModelValue::from("a"));
    }

    #[test]
    fn default_getter_may_read_through_getters() {
        let (instance, _) = instance_of(&person());
        instance.set("name", "core").unwrap();
        assert_eq!(instance.get::<String>("displayName").unwrap(), "<core>");
    }

    #[test]
    fn setter_from_default_getter_is_rejected() {
        let (instance, state) = instance_of(&person());
        instance.set("name", "before").unwrap();

        let err = instance.invoke("getRenamed", &[]).unwrap_err();
        assert_eq!(
            err,
            ProxyError::IllegalSelfMutation {
                type_name: "Person".into(),
                method: "setName".into(),
            }
        );
        assert_eq!(state.get("name").unwrap(), ModelValue::from("before"));
        assert!(instance.setters_allowed());

        instance.set("name", "after").unwrap();
        assert_eq!(instance.get::<String>("name").unwrap(), "after");
    }

    #[test]
    fn nested_default_getters_keep_setters_disabled() {
        let ty = ManagedType::interface("Nested")
            .property("name", ValueType::String)
            .default_getter("getInner", ValueType::Bool, |this| {
                Ok(this.setters_allowed().into())
            })
            .default_getter("getOuter", ValueType::Bool, |this| {
                let _: bool = this.get("inner")?;
                Ok(this.setters_allowed().into())
            })
            .build();
        let (instance, _) = instance_of(&ty);

        assert!(!instance.get::<bool>("inner").unwrap());
        assert!(!instance.get::<bool>("outer").unwrap());
        assert!(instance.setters_allowed());
    }

    #[test]
    fn default_method_with_arguments_is_guarded() {
        let ty = ManagedType::interface("Person")
            .property("name", ValueType::String)
            .default_method(
                "rename",
                MethodSignature::new(vec![ValueType::String], None),
                |this, args| {
                    assert!(!this.setters_allowed());
                    this.set("name", args[0].clone())?;
                    Ok(ModelValue::Null)
                },
            )
            .build();
        let (instance, state) = instance_of(&ty);

        assert!(matches!(
            instance.invoke("rename", &["x".into()]),
            Err(ProxyError::IllegalSelfMutation { .. })
        ));
        assert!(state.is_empty());
        assert!(instance.setters_allowed());
    }

    #[test]
    fn disabled_setter_rejects_before_argument_checks() {
        let ty = ManagedType::interface("Person")
            .property("name", ValueType::String)
            .default_method("rename", MethodSignature::new(vec![], None), |this, _| {
                this.set("name", 3)?;
                Ok(ModelValue::Null)
            })
            .default_method("clear", MethodSignature::new(vec![], None), |this, _| {
                this.invoke("setName", &[])?;
                Ok(ModelValue::Null)
            })
            .build();
        let (instance, state) = instance_of(&ty);

        let expected = ProxyError::IllegalSelfMutation {
            type_name: "Person".into(),
            method: "setName".into(),
        };
        assert_eq!(instance.invoke("rename", &[]), Err(expected.clone()));
        assert_eq!(instance.invoke("clear", &[]), Err(expected));
        assert!(state.is_empty());

        // Outside a default method the argument is checked as usual
        assert!(matches!(
            instance.set("name", 3),
            Err(ProxyError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn flag_restored_after_body_error() {
        let ty = ManagedType::interface("Failing")
            .property("name", ValueType::String)
            .default_getter("getBroken", ValueType::String, |_| {
                Err(ProxyError::body("broken"))
            })
            .build();
        let (instance, _) = instance_of(&ty);

        assert_eq!(
            instance.invoke("getBroken", &[]),
            Err(ProxyError::Body("broken".into()))
        );
        assert!(instance.setters_allowed());
        instance.set("name", "ok").unwrap();
    }

    #[test]
    fn flag_restored_after_panic() {
        let ty = ManagedType::interface("Panicking")
            .property("name", ValueType::String)
            .default_getter("getBoom", ValueType::String, |_| panic!("boom"))
            .build();
        let (instance, _) = instance_of(&ty);

        let result = catch_unwind(AssertUnwindSafe(|| instance.invoke("getBoom", &[])));
        assert!(result.is_err());
        assert!(instance.setters_allowed());
    }

    #[test]
    fn initializer_runs_with_setters_disabled() {
        let ty = ManagedType::abstract_class("Base")
            .property("name", ValueType::String)
            .initializer(|this| {
                assert!(!this.setters_allowed());
                match this.set("name", "init") {
                    Err(ProxyError::IllegalSelfMutation { .. }) => Ok(()),
                    other => panic!("setter during construction: {other:?}"),
                }
            })
            .build();
        let (instance, state) = instance_of(&ty);

        assert!(instance.setters_allowed());
        assert!(state.is_empty());
    }

    #[test]
    fn initializer_error_aborts_construction() {
        let ty = ManagedType::abstract_class("Base")
            .initializer(|_| Err(ProxyError::body("no")))
            .build();
        let factory = ManagedProxyGenerator::new().generate(&ty).unwrap();
        let result = factory.create(Arc::new(DefaultModelElementState::new()));
        assert!(matches!(result, Err(ProxyError::Body(_))));
    }

    #[test]
    fn state_errors_propagate_unmodified() {
        let ty = person();
        let state = Arc::new(DefaultModelElementState::with_properties([(
            "other",
            ValueType::String,
        )]));
        let instance = ManagedProxyGenerator::new()
            .generate(&ty)
            .unwrap()
            .create(state)
            .unwrap();

        assert_eq!(
            instance.set("name", "x"),
            Err(ProxyError::State(StateError::UnknownProperty("name".into())))
        );
        assert_eq!(
            instance.get::<String>("name"),
            Err(ProxyError::State(StateError::UnknownProperty("name".into())))
        );
    }

    #[test]
    fn dispatch_errors() {
        let (instance, _) = instance_of(&person());

        assert!(matches!(
            instance.invoke("getAge", &[]),
            Err(ProxyError::NoSuchMethod { .. })
        ));
        assert!(matches!(
            instance.invoke("setName", &[]),
            Err(ProxyError::ArityMismatch { expected: 1, actual: 0, .. })
        ));
        assert!(matches!(
            instance.set("name", 3),
            Err(ProxyError::TypeMismatch { expected: ValueType::String, actual: "integer", .. })
        ));
        assert!(matches!(
            instance.get::<String>("age"),
            Err(ProxyError::NoSuchProperty { accessor: "getter", .. })
        ));
    }

    #[test]
    fn getter_checks_stored_value_type() {
        let (instance, state) = instance_of(&person());
        state.set("name", 42.into()).unwrap();

        assert!(matches!(
            instance.invoke("getName", &[]),
            Err(ProxyError::TypeMismatch { actual: "integer", .. })
        ));
    }

    #[test]
    fn unset_property_reads_null() {
        let (instance, _) = instance_of(&person());
        assert_eq!(instance.get::<Option<String>>("name").unwrap(), None);
        assert!(matches!(
            instance.get::<String>("name"),
            Err(ProxyError::Conversion { .. })
        ));
    }
}
