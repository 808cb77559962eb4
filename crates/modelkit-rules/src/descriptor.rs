//! Rule descriptors
//!
//! Descriptors say where a rule came from, for diagnostics only. They never
//! influence how a rule executes.

use std::fmt::{self, Debug, Write};
use std::sync::Arc;

/// Human readable origin of a model rule
pub trait ModelRuleDescriptor: Debug + Send + Sync {
    /// Write the description to `out`
    ///
    /// # Errors
    /// Returns error if writing to `out` fails
    fn describe_to(&self, out: &mut dyn Write) -> fmt::Result;

    /// Description as a string
    fn describe(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = self.describe_to(&mut out);
        out
    }
}

/// Descriptor holding a fixed description
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimpleModelRuleDescriptor {
    description: String,
}

impl SimpleModelRuleDescriptor {
    /// Create descriptor
    #[inline]
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    /// Shared descriptor, ready to hand to a rule
    #[inline]
    #[must_use]
    pub fn shared(description: impl Into<String>) -> Arc<dyn ModelRuleDescriptor> {
        Arc::new(Self::new(description))
    }
}

impl ModelRuleDescriptor for SimpleModelRuleDescriptor {
    fn describe_to(&self, out: &mut dyn Write) -> fmt::Result {
        out.write_str(&self.description)
    }
}

/// Rule declared inside another rule: `parent > child`
#[derive(Debug, Clone)]
pub struct NestedModelRuleDescriptor {
    parent: Arc<dyn ModelRuleDescriptor>,
    child: Arc<dyn ModelRuleDescriptor>,
}

impl NestedModelRuleDescriptor {
    /// Create descriptor
    #[inline]
    #[must_use]
    pub fn new(parent: Arc<dyn ModelRuleDescriptor>, child: Arc<dyn ModelRuleDescriptor>) -> Self {
        Self { parent, child }
    }

    /// Enclosing rule
    #[inline]
    #[must_use]
    pub fn parent(&self) -> &Arc<dyn ModelRuleDescriptor> {
        &self.parent
    }

    /// Nested rule
    #[inline]
    #[must_use]
    pub fn child(&self) -> &Arc<dyn ModelRuleDescriptor> {
        &self.child
    }
}

impl ModelRuleDescriptor for NestedModelRuleDescriptor {
    fn describe_to(&self, out: &mut dyn Write) -> fmt::Result {
        self.parent.describe_to(out)?;
        out.write_str(" > ")?;
        self.child.describe_to(out)
    }
}
