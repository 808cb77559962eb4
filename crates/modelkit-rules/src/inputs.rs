//! Resolved rule inputs

use crate::reference::{ModelReference, UntypedModelReference};
use std::any::Any;
use std::fmt::{self, Debug, Formatter};

/// Ordered, type-erased input values handed to a rule
///
/// Value `i` is the resolution of reference `i`.
#[derive(Default)]
pub struct Inputs {
    references: Vec<UntypedModelReference>,
    values: Vec<Box<dyn Any + Send + Sync>>,
}

impl Inputs {
    /// No inputs
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append the resolved value of `reference`
    pub fn push<T: Any + Send + Sync>(&mut self, reference: &ModelReference<T>, value: T) {
        self.references.push(reference.erase());
        self.values.push(Box::new(value));
    }

    /// Builder form of [`Inputs::push`]
    #[must_use]
    pub fn with<T: Any + Send + Sync>(mut self, reference: &ModelReference<T>, value: T) -> Self {
        self.push(reference, value);
        self
    }

    /// Typed value at `index`
    ///
    /// # Errors
    /// Returns error if there is no input at `index` or it is not a `T`
    pub fn get<T: Any>(&self, index: usize) -> Result<&T, InputError> {
        let value = self.values.get(index).ok_or(InputError::OutOfRange {
            index,
            len: self.values.len(),
        })?;
        value.downcast_ref::<T>().ok_or_else(|| InputError::WrongType {
            index,
            requested: std::any::type_name::<T>(),
            actual: self.references[index].type_name.clone(),
        })
    }

    /// References the values were resolved from
    #[inline]
    #[must_use]
    pub fn references(&self) -> &[UntypedModelReference] {
        &self.references
    }

    /// Number of inputs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no inputs
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Debug for Inputs {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inputs")
            .field("references", &self.references)
            .finish_non_exhaustive()
    }
}

/// Input lookup failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// No input at this position
    #[error("no input at index {index} ({len} inputs)")]
    OutOfRange {
        /// Requested position
        index: usize,
        /// Number of inputs
        len: usize,
    },

    /// Input exists but has another type
    #[error("input {index} is a {actual}, not a {requested}")]
    WrongType {
        /// Requested position
        index: usize,
        /// Requested type
        requested: &'static str,
        /// Type of the input's reference
        actual: String,
    },
}
