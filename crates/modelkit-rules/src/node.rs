//! Model graph nodes

use modelkit_core::ModelPath;
use std::fmt::Debug;

/// Node of the model graph that rules may mutate
///
/// Owned by the rule engine. Rules receive it for context and may ignore it.
pub trait MutableModelNode: Debug {
    /// Location of the node in the model graph
    fn path(&self) -> &ModelPath;
}
