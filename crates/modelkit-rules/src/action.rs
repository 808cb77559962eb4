//! Rule actions

use crate::descriptor::ModelRuleDescriptor;
use crate::inputs::Inputs;
use crate::node::MutableModelNode;
use crate::reference::{ModelReference, UntypedModelReference};
use std::sync::Arc;

/// Configuration step applied to a subject
///
/// Implemented for every `Fn(&mut T) -> Result<(), E>`.
pub trait Action<T: ?Sized> {
    /// Failure raised by the action
    type Error;

    /// Apply the action to `subject`
    ///
    /// # Errors
    /// Whatever the action reports
    fn execute(&self, subject: &mut T) -> Result<(), Self::Error>;
}

impl<T: ?Sized, E, F> Action<T> for F
where
    F: Fn(&mut T) -> Result<(), E>,
{
    type Error = E;

    #[inline]
    fn execute(&self, subject: &mut T) -> Result<(), E> {
        self(subject)
    }
}

/// Rule that mutates one model element, as scheduled by a rule engine
pub trait ModelAction<T> {
    /// Failure raised while executing the rule
    type Error;

    /// Element the rule mutates
    fn subject(&self) -> &ModelReference<T>;

    /// Run the rule against `subject`
    ///
    /// `node` is the graph node holding `subject` when the engine has one;
    /// `inputs` holds the resolved values of [`ModelAction::inputs`] in order.
    ///
    /// # Errors
    /// Whatever the rule reports
    fn execute(
        &self,
        node: Option<&dyn MutableModelNode>,
        subject: &mut T,
        inputs: &Inputs,
    ) -> Result<(), Self::Error>;

    /// Elements that must be resolved before the rule runs
    fn inputs(&self) -> &[UntypedModelReference];

    /// Where the rule came from
    fn descriptor(&self) -> &Arc<dyn ModelRuleDescriptor>;
}
