//! Modelkit Core
//!
//! Shared substrate for managed model elements.
//!
//! # Core Concepts
//!
//! - [`ModelValue`]: Dynamically typed property value
//! - [`ValueType`]: Declared type of a managed property
//! - [`ModelElementState`]: Store of record for one managed object's properties
//! - [`ModelPath`]: Dotted address of an element in the model graph
//!
//! # Example
//!
//! ```rust
//! use modelkit_core::{DefaultModelElementState, ModelElementState, ModelValue};
//!
//! let state = DefaultModelElementState::new();
//! state.set("name", ModelValue::from("core")).unwrap();
//! assert_eq!(state.get("name").unwrap(), ModelValue::from("core"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod path;
mod state;
mod value;

// Re-exports
pub use path::{ModelPath, PathError};
pub use state::{DefaultModelElementState, ModelElementState, StateError};
pub use value::{ConversionError, FromModelValue, ModelValue, ValueType};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
