//! Shared per-type cache of property descriptors.
//!
//! Introspection results are computed lazily on first use and shared across
//! every generation call through an `Arc<DescriptorCache>`.
//!
//! # Thread Safety
//!
//! Entries live behind a `parking_lot::RwLock`. Two threads missing on the same
//! type may both introspect it; only the first insert is kept, and entries are
//! always inserted whole, so readers never observe a partial descriptor.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::bean::{BeanType, PropertyDescriptor};

/// Introspected properties of one type.
#[derive(Debug)]
pub struct BeanDescriptor {
    type_name: &'static str,
    properties: HashMap<String, PropertyDescriptor>,
    /// Property names in sorted order.
    names: Vec<String>,
}

impl BeanDescriptor {
    /// Introspects a type.
    #[must_use]
    pub fn introspect(bean_type: BeanType) -> Self {
        let properties: HashMap<String, PropertyDescriptor> = bean_type
            .introspect()
            .into_iter()
            .map(|descriptor| (descriptor.name().to_string(), descriptor))
            .collect();
        // Write-only properties are not variables.
        let mut names: Vec<String> = properties
            .values()
            .filter(|descriptor| descriptor.is_readable())
            .map(|descriptor| descriptor.name().to_string())
            .collect();
        names.sort();

        BeanDescriptor {
            type_name: bean_type.name(),
            properties,
            names,
        }
    }

    /// Returns the name of the described type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Looks up a property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    /// Returns the sorted names of the readable properties.
    #[must_use]
    pub fn property_names(&self) -> &[String] {
        &self.names
    }
}

/// Thread-safe descriptor cache keyed by type.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    entries: RwLock<HashMap<TypeId, Arc<BeanDescriptor>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl DescriptorCache {
    /// Creates a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty cache ready to be shared between accessors.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Returns the descriptor for a type, introspecting it on first use.
    pub fn descriptor(&self, bean_type: BeanType) -> Arc<BeanDescriptor> {
        if let Some(existing) = self.entries.read().get(&bean_type.id()) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(existing);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        // Introspect outside the lock; a racing thread may do the same work.
        let computed = Arc::new(BeanDescriptor::introspect(bean_type));
        log::debug!(
            "Introspected {} ({} properties)",
            bean_type.name(),
            computed.property_names().len()
        );

        let mut entries = self.entries.write();
        Arc::clone(entries.entry(bean_type.id()).or_insert(computed))
    }

    /// Returns the number of cached types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing has been cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns the number of cache hits.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Returns the number of cache misses.
    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Clear all cached descriptors and reset statistics.
    pub fn clear(&self) {
        self.entries.write().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}
