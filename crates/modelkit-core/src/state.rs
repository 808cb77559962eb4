//! Model element state
//!
//! The [`ModelElementState`] trait is the store of record for the property
//! values of one managed object. The store is owned by the model framework and
//! shared with the object that reads and writes through it.

use crate::value::{ModelValue, ValueType};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::fmt::Debug;

/// Property store backing a single managed object
///
/// Implementations use interior mutability: the store is shared through an
/// `Arc` between the framework and the generated object.
pub trait ModelElementState: Send + Sync + Debug {
    /// Read a property
    ///
    /// # Errors
    /// Implementation defined (e.g. unknown property)
    fn get(&self, name: &str) -> Result<ModelValue, StateError>;

    /// Write a property
    ///
    /// # Errors
    /// Implementation defined (e.g. unknown property, type mismatch)
    fn set(&self, name: &str, value: ModelValue) -> Result<(), StateError>;
}

/// Errors raised by a state store
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StateError {
    /// Property not declared on this element
    #[error("unknown property '{0}'")]
    UnknownProperty(String),

    /// Value does not fit the declared property type
    #[error("cannot assign {actual} value to property '{property}' of type {expected}")]
    TypeMismatch {
        /// Property name
        property: String,
        /// Declared type
        expected: ValueType,
        /// Runtime type name of the rejected value
        actual: &'static str,
    },

    /// Store refused the operation
    #[error("state store rejected operation: {0}")]
    Rejected(String),
}

/// In-memory [`ModelElementState`]
///
/// Without a schema any property name is accepted and unset properties read
/// as `Null`. With a schema (see [`DefaultModelElementState::with_properties`])
/// only declared properties are accepted and writes are type checked.
#[derive(Debug, Default)]
pub struct DefaultModelElementState {
    schema: Option<IndexMap<String, ValueType>>,
    values: RwLock<IndexMap<String, ModelValue>>,
}

impl DefaultModelElementState {
    /// Create an open store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store restricted to the given properties
    #[must_use]
    pub fn with_properties<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = (S, ValueType)>,
        S: Into<String>,
    {
        Self {
            schema: Some(
                properties
                    .into_iter()
                    .map(|(name, ty)| (name.into(), ty))
                    .collect(),
            ),
            values: RwLock::new(IndexMap::new()),
        }
    }

    /// Snapshot of all assigned values, in assignment order
    #[must_use]
    pub fn snapshot(&self) -> Vec<(String, ModelValue)> {
        self.values
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Number of assigned properties
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Whether nothing has been assigned
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    fn declared_type(&self, name: &str) -> Result<Option<ValueType>, StateError> {
        match &self.schema {
            None => Ok(None),
            Some(schema) => schema
                .get(name)
                .copied()
                .map(Some)
                .ok_or_else(|| StateError::UnknownProperty(name.to_string())),
        }
    }
}

impl ModelElementState for DefaultModelElementState {
    fn get(&self, name: &str) -> Result<ModelValue, StateError> {
        self.declared_type(name)?;
        Ok(self.values.read().get(name).cloned().unwrap_or_default())
    }

    fn set(&self, name: &str, value: ModelValue) -> Result<(), StateError> {
        if let Some(expected) = self.declared_type(name)? {
            if !value.is_assignable_to(expected) {
                return Err(StateError::TypeMismatch {
                    property: name.to_string(),
                    expected,
                    actual: value.type_name(),
                });
            }
        }
        self.values.write().insert(name.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_store_reads_null_for_unset() {
        let state = DefaultModelElementState::new();
        assert_eq!(state.get("missing").unwrap(), ModelValue::Null);
        assert!(state.is_empty());
    }

    #[test]
    fn set_then_get() {
        let state = DefaultModelElementState::new();
        state.set("name", "core".into()).unwrap();
        assert_eq!(state.get("name").unwrap(), ModelValue::from("core"));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn schema_rejects_unknown_property() {
        let state = DefaultModelElementState::with_properties([("name", ValueType::String)]);
        assert_eq!(
            state.get("other"),
            Err(StateError::UnknownProperty("other".into()))
        );
        assert!(state.set("other", ModelValue::Null).is_err());
    }

    #[test]
    fn schema_type_checks_writes() {
        let state = DefaultModelElementState::with_properties([("count", ValueType::Integer)]);
        let err = state.set("count", "ten".into()).unwrap_err();
        assert!(matches!(err, StateError::TypeMismatch { actual: "string", .. }));
        assert_eq!(state.get("count").unwrap(), ModelValue::Null);

        state.set("count", 10.into()).unwrap();
        state.set("count", ModelValue::Null).unwrap();
    }

    #[test]
    fn snapshot_keeps_assignment_order() {
        let state = DefaultModelElementState::new();
        state.set("b", 1.into()).unwrap();
        state.set("a", 2.into()).unwrap();
        let keys: Vec<_> = state.snapshot().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
