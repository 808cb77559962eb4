//! Model references
//!
//! A [`ModelReference`] names the model element a rule reads or mutates:
//! optionally a path in the model graph, always the Rust type of the element.

use modelkit_core::ModelPath;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display, Formatter};
use std::marker::PhantomData;

/// Typed reference to a model element
///
/// Without a path the reference matches by type alone.
///
/// # Example
/// ```
/// use modelkit_core::ModelPath;
/// use modelkit_rules::ModelReference;
///
/// let path: ModelPath = "tasks.build".parse().unwrap();
/// let subject = ModelReference::<Vec<String>>::of(path).with_description("build tasks");
/// assert_eq!(subject.path().map(ToString::to_string).as_deref(), Some("tasks.build"));
/// ```
pub struct ModelReference<T> {
    path: Option<ModelPath>,
    type_name: &'static str,
    description: Option<String>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ModelReference<T> {
    /// Reference any element of type `T`
    #[inline]
    #[must_use]
    pub fn of_type() -> Self {
        Self {
            path: None,
            type_name: std::any::type_name::<T>(),
            description: None,
            _marker: PhantomData,
        }
    }

    /// Reference the element of type `T` at `path`
    #[inline]
    #[must_use]
    pub fn of(path: ModelPath) -> Self {
        Self {
            path: Some(path),
            ..Self::of_type()
        }
    }

    /// With a human readable description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Element path, if bound to one
    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&ModelPath> {
        self.path.as_ref()
    }

    /// Name of the element type
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Description, if any
    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Drop the static type
    #[must_use]
    pub fn erase(&self) -> UntypedModelReference {
        UntypedModelReference {
            path: self.path.clone(),
            type_name: self.type_name.to_string(),
            description: self.description.clone(),
        }
    }
}

impl<T> Clone for ModelReference<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            type_name: self.type_name,
            description: self.description.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for ModelReference<T> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.description == other.description
    }
}

impl<T> Eq for ModelReference<T> {}

impl<T> Debug for ModelReference<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelReference")
            .field("path", &self.path)
            .field("type_name", &self.type_name)
            .field("description", &self.description)
            .finish()
    }
}

impl<T> Display for ModelReference<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_reference(f, self.path.as_ref(), self.type_name)
    }
}

/// [`ModelReference`] with the type erased, as listed in rule inputs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UntypedModelReference {
    /// Element path, if bound to one
    pub path: Option<ModelPath>,
    /// Name of the element type
    pub type_name: String,
    /// Description, if any
    pub description: Option<String>,
}

impl Display for UntypedModelReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_reference(f, self.path.as_ref(), &self.type_name)
    }
}

fn write_reference(f: &mut Formatter<'_>, path: Option<&ModelPath>, type_name: &str) -> fmt::Result {
    match path {
        Some(path) => write!(f, "{path} ({type_name})"),
        None => write!(f, "<any> ({type_name})"),
    }
}
