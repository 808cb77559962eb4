//! Mutation rules backed by plain actions
//!
//! [`ActionBackedMutateRule`] lets any [`Action`] take part in rule
//! scheduling. It declares no inputs, and the graph node and inputs passed to
//! [`ModelAction::execute`] are ignored.

use crate::action::{Action, ModelAction};
use crate::descriptor::ModelRuleDescriptor;
use crate::inputs::Inputs;
use crate::node::MutableModelNode;
use crate::reference::{ModelReference, UntypedModelReference};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Rule that applies an [`Action`] to its subject
pub struct ActionBackedMutateRule<T, A> {
    subject: ModelReference<T>,
    action: A,
    descriptor: Arc<dyn ModelRuleDescriptor>,
}

impl<T, A> ActionBackedMutateRule<T, A>
where
    A: Action<T>,
{
    /// Create rule
    ///
    /// # Example
    /// ```
    /// use modelkit_rules::{
    ///     ActionBackedMutateRule, Inputs, ModelAction, ModelReference, SimpleModelRuleDescriptor,
    /// };
    ///
    /// let rule = ActionBackedMutateRule::new(
    ///     ModelReference::<Vec<String>>::of_type(),
    ///     |tasks: &mut Vec<String>| -> Result<(), String> {
    ///         tasks.push("build".into());
    ///         Ok(())
    ///     },
    ///     SimpleModelRuleDescriptor::shared("add build task"),
    /// );
    ///
    /// let mut tasks = Vec::new();
    /// rule.execute(None, &mut tasks, &Inputs::empty()).unwrap();
    /// assert_eq!(tasks, vec!["build".to_string()]);
    /// ```
    #[inline]
    #[must_use]
    pub fn new(
        subject: ModelReference<T>,
        action: A,
        descriptor: Arc<dyn ModelRuleDescriptor>,
    ) -> Self {
        Self {
            subject,
            action,
            descriptor,
        }
    }

    /// Wrapped action
    #[inline]
    #[must_use]
    pub fn action(&self) -> &A {
        &self.action
    }
}

impl<T, A> ModelAction<T> for ActionBackedMutateRule<T, A>
where
    A: Action<T>,
{
    type Error = A::Error;

    #[inline]
    fn subject(&self) -> &ModelReference<T> {
        &self.subject
    }

    fn execute(
        &self,
        _node: Option<&dyn MutableModelNode>,
        subject: &mut T,
        _inputs: &Inputs,
    ) -> Result<(), A::Error> {
        tracing::trace!("Executing mutate rule {}", self.descriptor.describe());
        self.action.execute(subject)
    }

    #[inline]
    fn inputs(&self) -> &[UntypedModelReference] {
        &[]
    }

    #[inline]
    fn descriptor(&self) -> &Arc<dyn ModelRuleDescriptor> {
        &self.descriptor
    }
}

impl<T, A> Debug for ActionBackedMutateRule<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionBackedMutateRule")
            .field("subject", &self.subject)
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}
