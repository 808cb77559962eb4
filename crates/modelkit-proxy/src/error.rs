//! Error types for managed proxies
//!
//! - Contract violations found while generating an implementation
//! - Setter calls made while the reentrancy guard is active
//! - State store failures (passed through untouched)
//! - Dispatch failures on a generated instance

use modelkit_core::{ConversionError, StateError, ValueType};

/// Errors raised while generating or using a managed proxy
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProxyError {
    /// Managed type declares a method that cannot be implemented
    #[error(
        "unexpected method encountered when generating implementation for managed type '{type_name}': {method} ({reason})"
    )]
    ContractViolation {
        /// Managed type name
        type_name: String,
        /// Offending method
        method: String,
        /// Why the method cannot be mapped
        reason: String,
    },

    /// Setter invoked from within one of the instance's own default methods
    #[error("calling setters of a managed type on itself is not allowed: {type_name}.{method}")]
    IllegalSelfMutation {
        /// Managed type name
        type_name: String,
        /// Setter that was called
        method: String,
    },

    /// State store failure
    #[error(transparent)]
    State(#[from] StateError),

    /// Value does not match the declared accessor type
    #[error("{method}: expected {expected} value, got {actual}")]
    TypeMismatch {
        /// Method whose signature was violated
        method: String,
        /// Declared type
        expected: ValueType,
        /// Runtime type name of the value
        actual: &'static str,
    },

    /// No method with this name on the managed type
    #[error("managed type '{type_name}' has no method '{method}'")]
    NoSuchMethod {
        /// Managed type name
        type_name: String,
        /// Requested method
        method: String,
    },

    /// Wrong number of arguments
    #[error("{method} takes {expected} argument(s), {actual} given")]
    ArityMismatch {
        /// Called method
        method: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        actual: usize,
    },

    /// No accessor for this property on the managed type
    #[error("managed type '{type_name}' has no {accessor} for property '{property}'")]
    NoSuchProperty {
        /// Managed type name
        type_name: String,
        /// Property name
        property: String,
        /// `"getter"` or `"setter"`
        accessor: &'static str,
    },

    /// Typed read could not convert the value
    #[error("property '{property}': {source}")]
    Conversion {
        /// Property name
        property: String,
        /// Underlying conversion failure
        #[source]
        source: ConversionError,
    },

    /// Failure raised by a default method body
    #[error("{0}")]
    Body(String),
}

impl ProxyError {
    /// Failure from a default method body or base initializer
    #[inline]
    pub fn body(message: impl Into<String>) -> Self {
        Self::Body(message.into())
    }

    /// Check if this is a contract violation (fatal to the managed type)
    #[inline]
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::ContractViolation { .. })
    }

    /// Check if this is an illegal self mutation
    #[inline]
    #[must_use]
    pub fn is_illegal_self_mutation(&self) -> bool {
        matches!(self, Self::IllegalSelfMutation { .. })
    }

    /// Check if the instance that raised this error is still usable
    ///
    /// Only contract violations are fatal, and those never reach an instance.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !self.is_contract_violation()
    }

    pub(crate) fn contract_violation(
        type_name: &str,
        method: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::ContractViolation {
            type_name: type_name.to_string(),
            method: method.to_string(),
            reason: reason.into(),
        }
    }
}
