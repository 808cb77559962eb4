//! Modelkit Proxy
//!
//! Run-time implementations of managed model types.
//!
//! # Overview
//!
//! A managed type declares abstract property accessors and, optionally,
//! default methods. The generator implements it:
//! - **Abstract getters** read the property from a [`ModelElementState`]
//! - **Abstract setters** write it, unless a default method of the same
//!   instance is running ([`ProxyError::IllegalSelfMutation`])
//! - **Default methods** run with setters disabled
//! - **Anything else abstract** is a [`ProxyError::ContractViolation`]
//!
//! # Example
//!
//! ```rust
//! use modelkit_core::{DefaultModelElementState, ValueType};
//! use modelkit_proxy::{ManagedProxyGenerator, ManagedType};
//! use std::sync::Arc;
//!
//! let person = ManagedType::interface("Person")
//!     .property("name", ValueType::String)
//!     .default_getter("getGreeting", ValueType::String, |this| {
//!         let name: String = this.get("name")?;
//!         Ok(format!("Hello, {name}").into())
//!     })
//!     .build();
//!
//! let factory = ManagedProxyGenerator::new().generate(&person).unwrap();
//! let instance = factory.create(Arc::new(DefaultModelElementState::new())).unwrap();
//!
//! instance.set("name", "Ada").unwrap();
//! assert_eq!(instance.get::<String>("greeting").unwrap(), "Hello, Ada");
//! ```
//!
//! [`ModelElementState`]: modelkit_core::ModelElementState

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod cache;
mod config;
mod error;
mod generator;
mod instance;
mod schema;

// Re-exports
pub use cache::{ManagedTypeCache, TypeCache};
pub use config::{ConfigError, GeneratorConfig};
pub use error::ProxyError;
pub use generator::{ManagedProxyGenerator, ProxyFactory};
pub use instance::ManagedInstance;
pub use schema::{
    Initializer, ManagedMethod, ManagedType, ManagedTypeBuilder, MethodBody, MethodKind,
    MethodSignature, TypeKind,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for defining and instantiating managed types
    pub use crate::{
        ManagedInstance, ManagedProxyGenerator, ManagedType, ManagedTypeCache, ProxyError,
        ProxyFactory, TypeCache,
    };
    pub use modelkit_core::{
        DefaultModelElementState, ModelElementState, ModelValue, ValueType,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
