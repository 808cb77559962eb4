//! Generator configuration

use serde::{Deserialize, Serialize};

/// Accessor naming conventions and cache sizing for proxy generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Prefix marking a getter (`getName`)
    pub getter_prefix: String,
    /// Prefix marking a setter (`setName`)
    pub setter_prefix: String,
    /// Appended to the managed type name to name the generated type
    pub impl_suffix: String,
    /// Maximum number of factories held by a [`crate::ManagedTypeCache`]
    pub cache_capacity: u64,
}

impl GeneratorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With getter prefix
    #[inline]
    #[must_use]
    pub fn with_getter_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.getter_prefix = prefix.into();
        self
    }

    /// With setter prefix
    #[inline]
    #[must_use]
    pub fn with_setter_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.setter_prefix = prefix.into();
        self
    }

    /// With generated type suffix
    #[inline]
    #[must_use]
    pub fn with_impl_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.impl_suffix = suffix.into();
        self
    }

    /// With cache capacity
    #[inline]
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Check that accessor prefixes are usable
    ///
    /// # Errors
    /// Returns error if a prefix is empty or one prefix starts with the
    /// other, since a method name could then match both
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.getter_prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix("getter"));
        }
        if self.setter_prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix("setter"));
        }
        if self.getter_prefix.starts_with(&self.setter_prefix)
            || self.setter_prefix.starts_with(&self.getter_prefix)
        {
            return Err(ConfigError::AmbiguousPrefixes {
                getter: self.getter_prefix.clone(),
                setter: self.setter_prefix.clone(),
            });
        }
        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            getter_prefix: "get".to_string(),
            setter_prefix: "set".to_string(),
            impl_suffix: "_Impl".to_string(),
            cache_capacity: 1_024,
        }
    }
}

/// Invalid generator configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Accessor prefix is empty
    #[error("{0} prefix must not be empty")]
    EmptyPrefix(&'static str),

    /// One accessor prefix is a prefix of the other
    #[error("getter prefix '{getter}' and setter prefix '{setter}' overlap")]
    AmbiguousPrefixes {
        /// Configured getter prefix
        getter: String,
        /// Configured setter prefix
        setter: String,
    },
}
