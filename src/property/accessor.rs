//! Pluggable property access.

use std::sync::Arc;

use super::bean::{Bean, BeanType};
use super::cache::DescriptorCache;
use crate::error::{Result, SqlBindError};
use crate::types::{DataType, Value};

/// Reads and writes named properties of introspectable objects.
///
/// Implement this to replace how object parameters are inspected; the rest of
/// the engine only goes through this trait.
pub trait PropertyAccessor: Send + Sync {
    /// Returns the property names of a type.
    fn property_names(&self, bean_type: BeanType) -> Vec<String>;

    /// Returns the data type of a property.
    ///
    /// # Errors
    ///
    /// Returns `PropertyNotFound` if the type has no such property.
    fn property_type(&self, bean_type: BeanType, name: &str) -> Result<DataType>;

    /// Reads a property value.
    ///
    /// # Errors
    ///
    /// Returns `PropertyNotFound` if there is no reader for the property and
    /// `PropertyInvocation` if the reader itself fails.
    fn get_value(&self, target: &dyn Bean, name: &str) -> Result<Value>;

    /// Writes a property value.
    ///
    /// # Errors
    ///
    /// Returns `PropertyNotFound` if there is no writer for the property and
    /// `PropertyInvocation` if the writer itself fails.
    fn set_value(&self, target: &mut dyn Bean, name: &str, value: Value) -> Result<()>;
}

/// Default accessor backed by [`Introspect`](super::Introspect) descriptors.
#[derive(Debug, Clone, Default)]
pub struct StandardPropertyAccessor {
    cache: Arc<DescriptorCache>,
}

impl StandardPropertyAccessor {
    /// Creates an accessor using the given shared cache.
    #[must_use]
    pub fn new(cache: Arc<DescriptorCache>) -> Self {
        StandardPropertyAccessor { cache }
    }

    /// Returns the descriptor cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<DescriptorCache> {
        &self.cache
    }
}

impl PropertyAccessor for StandardPropertyAccessor {
    fn property_names(&self, bean_type: BeanType) -> Vec<String> {
        self.cache.descriptor(bean_type).property_names().to_vec()
    }

    fn property_type(&self, bean_type: BeanType, name: &str) -> Result<DataType> {
        self.cache
            .descriptor(bean_type)
            .property(name)
            .map(super::PropertyDescriptor::data_type)
            .ok_or_else(|| SqlBindError::property_not_found(name, bean_type.name()))
    }

    fn get_value(&self, target: &dyn Bean, name: &str) -> Result<Value> {
        let bean_type = target.bean_type();
        let descriptor = self.cache.descriptor(bean_type);
        let read = descriptor
            .property(name)
            .and_then(|property| property.read(target.as_any()))
            .ok_or_else(|| SqlBindError::property_not_found(name, bean_type.name()))?;
        read.map_err(|source| SqlBindError::property_invocation(name, bean_type.name(), source))
    }

    fn set_value(&self, target: &mut dyn Bean, name: &str, value: Value) -> Result<()> {
        let bean_type = target.bean_type();
        let descriptor = self.cache.descriptor(bean_type);
        let written = descriptor
            .property(name)
            .and_then(|property| property.write(target.as_any_mut(), value))
            .ok_or_else(|| SqlBindError::property_not_found(name, bean_type.name()))?;
        written.map_err(|source| SqlBindError::property_invocation(name, bean_type.name(), source))
    }
}
