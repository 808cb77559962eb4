//! Generated type cache using moka
//!
//! Generation itself is unsynchronized. A [`TypeCache`] is the single place
//! where factories are published, so each managed type is generated at most
//! once per cache and naming convention, even when many threads ask for it
//! together.

use crate::config::GeneratorConfig;
use crate::error::ProxyError;
use crate::generator::{ManagedProxyGenerator, ProxyFactory};
use crate::schema::ManagedType;
use moka::sync::Cache;

/// Publishes one generated implementation per managed type
///
/// Supplied by the caller; the generator never caches on its own.
pub trait TypeCache: Send + Sync {
    /// Return the cached factory for `managed_type`, generating it first if
    /// needed
    ///
    /// # Errors
    /// Propagates generation failures; nothing is cached for a type that
    /// failed to generate
    fn get_or_generate(
        &self,
        managed_type: &ManagedType,
        generator: &ManagedProxyGenerator,
    ) -> Result<ProxyFactory, ProxyError>;
}

/// [`TypeCache`] keyed by managed type name and generator naming conventions
///
/// Concurrent requests for the same type wait for a single generation and
/// all receive the same factory. Generators with different prefixes or
/// suffix get separate entries.
#[derive(Debug, Clone)]
pub struct ManagedTypeCache {
    inner: Cache<CacheKey, ProxyFactory>,
}

/// Everything that decides what a generation produces
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    type_name: String,
    getter_prefix: String,
    setter_prefix: String,
    impl_suffix: String,
}

impl CacheKey {
    fn new(type_name: &str, generator: &ManagedProxyGenerator) -> Self {
        let config = generator.config();
        Self {
            type_name: type_name.to_string(),
            getter_prefix: config.getter_prefix.clone(),
            setter_prefix: config.setter_prefix.clone(),
            impl_suffix: config.impl_suffix.clone(),
        }
    }
}

impl ManagedTypeCache {
    /// Create new cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Create cache sized by `config`
    #[inline]
    #[must_use]
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.cache_capacity)
    }

    /// Get the factory cached for a managed type name under `generator`
    #[inline]
    #[must_use]
    pub fn get(
        &self,
        type_name: &str,
        generator: &ManagedProxyGenerator,
    ) -> Option<ProxyFactory> {
        self.inner.get(&CacheKey::new(type_name, generator))
    }

    /// Drop the factory cached under `generator`; the next request with it
    /// generates a new one
    #[inline]
    pub fn invalidate(&self, type_name: &str, generator: &ManagedProxyGenerator) {
        self.inner.invalidate(&CacheKey::new(type_name, generator));
    }

    /// Invalidate all entries
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Get approximate entry count
    #[inline]
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}

impl Default for ManagedTypeCache {
    fn default() -> Self {
        Self::from_config(&GeneratorConfig::default())
    }
}

impl TypeCache for ManagedTypeCache {
    fn get_or_generate(
        &self,
        managed_type: &ManagedType,
        generator: &ManagedProxyGenerator,
    ) -> Result<ProxyFactory, ProxyError> {
        self.inner
            .try_get_with(CacheKey::new(managed_type.name(), generator), || {
                tracing::info!("Generating implementation for {}", managed_type.name());
                generator.generate(managed_type)
            })
            .map_err(|e| (*e).clone())
    }
}
