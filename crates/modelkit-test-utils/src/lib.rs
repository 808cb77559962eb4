//! Testing utilities for modelkit workspace
//!
//! Shared managed type fixtures and instrumented state stores.

#![allow(missing_docs)]

use modelkit_core::{
    DefaultModelElementState, ModelElementState, ModelValue, StateError, ValueType,
};
use modelkit_proxy::{
    ManagedInstance, ManagedProxyGenerator, ManagedType, MethodSignature, ProxyError,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// One call observed by a [`RecordingState`]
#[derive(Debug, Clone, PartialEq)]
pub enum StateOp {
    Get(String),
    Set(String, ModelValue),
}

/// Open in-memory state that records every call made to it
#[derive(Debug, Default)]
pub struct RecordingState {
    inner: DefaultModelElementState,
    ops: Mutex<Vec<StateOp>>,
}

impl RecordingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Vec<StateOp> {
        self.ops.lock().clone()
    }

    pub fn sets(&self) -> Vec<(String, ModelValue)> {
        self.ops
            .lock()
            .iter()
            .filter_map(|op| match op {
                StateOp::Set(name, value) => Some((name.clone(), value.clone())),
                StateOp::Get(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.ops.lock().clear();
    }
}

impl ModelElementState for RecordingState {
    fn get(&self, name: &str) -> Result<ModelValue, StateError> {
        self.ops.lock().push(StateOp::Get(name.to_string()));
        self.inner.get(name)
    }

    fn set(&self, name: &str, value: ModelValue) -> Result<(), StateError> {
        self.ops.lock().push(StateOp::Set(name.to_string(), value.clone()));
        self.inner.set(name, value)
    }
}

/// State that rejects every operation
#[derive(Debug, Clone)]
pub struct FailingState {
    pub reason: String,
}

impl FailingState {
    pub fn new(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }

    pub fn error(&self) -> StateError {
        StateError::Rejected(self.reason.clone())
    }
}

impl ModelElementState for FailingState {
    fn get(&self, _name: &str) -> Result<ModelValue, StateError> {
        Err(self.error())
    }

    fn set(&self, _name: &str, _value: ModelValue) -> Result<(), StateError> {
        Err(self.error())
    }
}

/// `Person` interface
///
/// - `name: string`, `age: integer` properties
/// - `getDisplayName()` default getter reading `name`
/// - `getRenamed()` default getter that calls `setName` (always rejected)
/// - `rename(string)` default method that calls `setName` (always rejected)
/// - `greet(string) -> string` default method reading `name`
pub fn person_type() -> ManagedType {
    ManagedType::interface("Person")
        .property("name", ValueType::String)
        .property("age", ValueType::Integer)
        .default_getter("getDisplayName", ValueType::String, |this| {
            let name: Option<String> = this.get("name")?;
            Ok(format!("<{}>", name.unwrap_or_default()).into())
        })
        .default_getter("getRenamed", ValueType::String, |this| {
            this.set("name", "renamed")?;
            Ok("renamed".into())
        })
        .default_method(
            "rename",
            MethodSignature::new(vec![ValueType::String], None),
            |this, args| {
                this.set("name", args[0].clone())?;
                Ok(ModelValue::Null)
            },
        )
        .default_method(
            "greet",
            MethodSignature::new(vec![ValueType::String], Some(ValueType::String)),
            |this, args| {
                let name: Option<String> = this.get("name")?;
                let greeting = args[0].as_str().unwrap_or("Hello");
                Ok(format!("{greeting}, {}", name.unwrap_or_default()).into())
            },
        )
        .build()
}

/// `Named` abstract class whose initializer tries to assign `name`
///
/// Construction succeeds; the initializer swallows the expected
/// [`ProxyError::IllegalSelfMutation`] and fails on anything else.
pub fn named_base_type() -> ManagedType {
    ManagedType::abstract_class("Named")
        .property("name", ValueType::String)
        .initializer(|this| match this.set("name", "initial") {
            Err(ProxyError::IllegalSelfMutation { .. }) => Ok(()),
            Ok(()) => Err(ProxyError::body("setter succeeded during construction")),
            Err(other) => Err(other),
        })
        .build()
}

pub fn create_instance(managed_type: &ManagedType) -> (ManagedInstance, Arc<RecordingState>) {
    let state = Arc::new(RecordingState::new());
    let instance = ManagedProxyGenerator::new()
        .generate(managed_type)
        .unwrap()
        .create(state.clone())
        .unwrap();
    (instance, state)
}

pub fn create_person() -> (ManagedInstance, Arc<RecordingState>) {
    create_instance(&person_type())
}
