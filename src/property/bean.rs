//! Introspectable objects and their property descriptors.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::PropertyFailure;
use crate::types::{DataType, Value};

type ReadFn = dyn Fn(&dyn Any) -> Result<Value, PropertyFailure> + Send + Sync;
type WriteFn = dyn Fn(&mut dyn Any, Value) -> Result<(), PropertyFailure> + Send + Sync;

/// Describes one named property of a type: its data type plus optional reader and writer.
#[derive(Clone)]
pub struct PropertyDescriptor {
    name: String,
    data_type: DataType,
    reader: Option<Arc<ReadFn>>,
    writer: Option<Arc<WriteFn>>,
}

impl PropertyDescriptor {
    /// Creates a descriptor with neither reader nor writer.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        PropertyDescriptor {
            name: name.into(),
            data_type,
            reader: None,
            writer: None,
        }
    }

    /// Attaches a reader that may fail.
    #[must_use]
    pub fn with_reader<T, F>(mut self, read: F) -> Self
    where
        T: 'static,
        F: Fn(&T) -> Result<Value, PropertyFailure> + Send + Sync + 'static,
    {
        let reader: Arc<ReadFn> = Arc::new(move |target: &dyn Any| {
            let target = target
                .downcast_ref::<T>()
                .ok_or_else(type_mismatch::<T>)?;
            read(target)
        });
        self.reader = Some(reader);
        self
    }

    /// Attaches an infallible reader.
    #[must_use]
    pub fn with_getter<T, F>(self, get: F) -> Self
    where
        T: 'static,
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        self.with_reader(move |target: &T| Ok(get(target)))
    }

    /// Attaches a writer that may fail.
    #[must_use]
    pub fn with_writer<T, F>(mut self, write: F) -> Self
    where
        T: 'static,
        F: Fn(&mut T, Value) -> Result<(), PropertyFailure> + Send + Sync + 'static,
    {
        let writer: Arc<WriteFn> = Arc::new(move |target: &mut dyn Any, value: Value| {
            let target = target
                .downcast_mut::<T>()
                .ok_or_else(type_mismatch::<T>)?;
            write(target, value)
        });
        self.writer = Some(writer);
        self
    }

    /// Returns the property name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared data type.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Returns true if the property has a reader.
    #[must_use]
    pub fn is_readable(&self) -> bool {
        self.reader.is_some()
    }

    /// Returns true if the property has a writer.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.writer.is_some()
    }

    /// Invokes the reader, or returns None if the property is write-only.
    pub fn read(&self, target: &dyn Any) -> Option<Result<Value, PropertyFailure>> {
        self.reader.as_ref().map(|read| read(target))
    }

    /// Invokes the writer, or returns None if the property is read-only.
    pub fn write(&self, target: &mut dyn Any, value: Value) -> Option<Result<(), PropertyFailure>> {
        self.writer.as_ref().map(|write| write(target, value))
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("data_type", &self.data_type)
            .field("readable", &self.is_readable())
            .field("writable", &self.is_writable())
            .finish()
    }
}

fn type_mismatch<T>() -> PropertyFailure {
    format!("target is not a {}", std::any::type_name::<T>()).into()
}

/// Types that can describe their own properties.
///
/// ```
/// use sqlbind::property::{Introspect, PropertyDescriptor};
/// use sqlbind::types::{DataType, Value};
///
/// #[derive(Debug)]
/// struct Person {
///     id: i64,
/// }
///
/// impl Introspect for Person {
///     fn properties() -> Vec<PropertyDescriptor> {
///         vec![PropertyDescriptor::new("id", DataType::Int64)
///             .with_getter(|p: &Person| Value::Int64(p.id))]
///     }
/// }
/// ```
pub trait Introspect: Any + Send + Sync + fmt::Debug + Sized {
    /// Returns the descriptors of every property of this type.
    fn properties() -> Vec<PropertyDescriptor>;
}

/// Runtime identity of an introspectable type.
#[derive(Clone, Copy)]
pub struct BeanType {
    id: TypeId,
    name: &'static str,
    introspect: fn() -> Vec<PropertyDescriptor>,
}

impl BeanType {
    /// Returns the bean type of `T`.
    #[must_use]
    pub fn of<T: Introspect>() -> Self {
        BeanType {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            introspect: T::properties,
        }
    }

    /// Returns the type id, the cache key for descriptors.
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the fully qualified type name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Runs the type's introspection.
    #[must_use]
    pub fn introspect(&self) -> Vec<PropertyDescriptor> {
        (self.introspect)()
    }
}

impl PartialEq for BeanType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BeanType {}

impl Hash for BeanType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for BeanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Object-safe view of an [`Introspect`] value.
pub trait Bean: Any + Send + Sync + fmt::Debug {
    /// Returns the runtime type of this object.
    fn bean_type(&self) -> BeanType;
    /// Upcasts to `Any` for reader invocation.
    fn as_any(&self) -> &dyn Any;
    /// Upcasts to `Any` for writer invocation.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Introspect> Bean for T {
    fn bean_type(&self) -> BeanType {
        BeanType::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
