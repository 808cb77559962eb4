//! Dynamically typed model values
//!
//! Provides [`ModelValue`], the unit of storage in a model element state, and
//! [`ValueType`], the declared type of a managed property.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Declared type of a managed property or accessor parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// `true` / `false`
    Bool,
    /// 64-bit signed integer
    Integer,
    /// 64-bit float
    Float,
    /// UTF-8 string
    String,
    /// Ordered list of values
    List,
    /// Accepts any value
    Any,
}

impl ValueType {
    /// Lowercase type name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::List => "list",
            Self::Any => "any",
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property value held by a model element state
///
/// `Null` stands for "no value" and is assignable to every [`ValueType`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum ModelValue {
    /// Absent value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Integer(i64),
    /// Float
    Float(f64),
    /// String
    String(String),
    /// List
    List(Vec<ModelValue>),
}

impl ModelValue {
    /// Runtime type of this value, `None` for `Null`
    #[inline]
    #[must_use]
    pub const fn value_type(&self) -> Option<ValueType> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(ValueType::Bool),
            Self::Integer(_) => Some(ValueType::Integer),
            Self::Float(_) => Some(ValueType::Float),
            Self::String(_) => Some(ValueType::String),
            Self::List(_) => Some(ValueType::List),
        }
    }

    /// Whether this is `Null`
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether this value may be stored in a slot declared as `declared`
    #[inline]
    #[must_use]
    pub fn is_assignable_to(&self, declared: ValueType) -> bool {
        match self.value_type() {
            None => true,
            Some(_) if declared == ValueType::Any => true,
            Some(actual) => actual == declared,
        }
    }

    /// Name of the runtime type, `"null"` for `Null`
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.value_type().map_or("null", ValueType::as_str)
    }

    /// Borrow as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Display for ModelValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for ModelValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ModelValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ModelValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for ModelValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for ModelValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for ModelValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl<T: Into<ModelValue>> From<Vec<T>> for ModelValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ModelValue>> From<Option<T>> for ModelValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Conversion from a [`ModelValue`] into a Rust type
///
/// Used by typed property reads on managed instances.
pub trait FromModelValue: Sized {
    /// Convert, failing when the runtime type does not match
    ///
    /// # Errors
    /// Returns [`ConversionError`] on type mismatch or unexpected `Null`
    fn from_model_value(value: ModelValue) -> Result<Self, ConversionError>;
}

/// Failed conversion out of a [`ModelValue`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot convert {actual} value to {expected}")]
pub struct ConversionError {
    /// Requested type
    pub expected: ValueType,
    /// Runtime type name of the value
    pub actual: &'static str,
}

impl ConversionError {
    fn new(expected: ValueType, value: &ModelValue) -> Self {
        Self {
            expected,
            actual: value.type_name(),
        }
    }
}

impl FromModelValue for ModelValue {
    fn from_model_value(value: ModelValue) -> Result<Self, ConversionError> {
        Ok(value)
    }
}

impl FromModelValue for bool {
    fn from_model_value(value: ModelValue) -> Result<Self, ConversionError> {
        match value {
            ModelValue::Bool(b) => Ok(b),
            other => Err(ConversionError::new(ValueType::Bool, &other)),
        }
    }
}

impl FromModelValue for i64 {
    fn from_model_value(value: ModelValue) -> Result<Self, ConversionError> {
        match value {
            ModelValue::Integer(i) => Ok(i),
            other => Err(ConversionError::new(ValueType::Integer, &other)),
        }
    }
}

impl FromModelValue for f64 {
    fn from_model_value(value: ModelValue) -> Result<Self, ConversionError> {
        match value {
            ModelValue::Float(x) => Ok(x),
            other => Err(ConversionError::new(ValueType::Float, &other)),
        }
    }
}

impl FromModelValue for String {
    fn from_model_value(value: ModelValue) -> Result<Self, ConversionError> {
        match value {
            ModelValue::String(s) => Ok(s),
            other => Err(ConversionError::new(ValueType::String, &other)),
        }
    }
}

impl<T: FromModelValue> FromModelValue for Vec<T> {
    fn from_model_value(value: ModelValue) -> Result<Self, ConversionError> {
        match value {
            ModelValue::List(items) => items.into_iter().map(T::from_model_value).collect(),
            other => Err(ConversionError::new(ValueType::List, &other)),
        }
    }
}

impl<T: FromModelValue> FromModelValue for Option<T> {
    fn from_model_value(value: ModelValue) -> Result<Self, ConversionError> {
        match value {
            ModelValue::Null => Ok(None),
            other => T::from_model_value(other).map(Some),
        }
    }
}
