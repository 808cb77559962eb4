//! Modelkit Rules
//!
//! Rules that configure model elements, in the shape a rule engine schedules
//! them.
//!
//! # Overview
//!
//! - **ModelAction**: a rule with a subject, ordered inputs and a descriptor
//! - **ActionBackedMutateRule**: adapts any [`Action`] into a rule with no
//!   inputs
//! - **ModelReference**: typed reference to the element a rule touches
//! - **ModelRuleDescriptor**: where a rule came from, for diagnostics
//!
//! # Example
//!
//! ```rust
//! use modelkit_rules::prelude::*;
//!
//! let rule = ActionBackedMutateRule::new(
//!     ModelReference::<u32>::of_type(),
//!     |retries: &mut u32| -> Result<(), std::convert::Infallible> {
//!         *retries = 3;
//!         Ok(())
//!     },
//!     SimpleModelRuleDescriptor::shared("retry policy"),
//! );
//!
//! let mut retries = 0;
//! rule.execute(None, &mut retries, &Inputs::empty()).unwrap();
//! assert_eq!(retries, 3);
//! assert!(rule.inputs().is_empty());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod action;
mod descriptor;
mod inputs;
mod mutate_rule;
mod node;
mod reference;

// Re-exports
pub use action::{Action, ModelAction};
pub use descriptor::{ModelRuleDescriptor, NestedModelRuleDescriptor, SimpleModelRuleDescriptor};
pub use inputs::{InputError, Inputs};
pub use mutate_rule::ActionBackedMutateRule;
pub use node::MutableModelNode;
pub use reference::{ModelReference, UntypedModelReference};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for declaring and running rules
    pub use crate::{
        Action, ActionBackedMutateRule, Inputs, ModelAction, ModelReference,
        ModelRuleDescriptor, MutableModelNode, SimpleModelRuleDescriptor,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
