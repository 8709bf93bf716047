//! Property access for object-graph parameters.
//!
//! Object parameters expose their properties through the [`Introspect`] trait.
//! The engine never calls readers directly; it goes through a
//! [`PropertyAccessor`], so hosts can swap in their own object inspector:
//! - [`StandardPropertyAccessor`] reads descriptors declared by [`Introspect`]
//! - [`DescriptorCache`] memoizes those descriptors per type, shared across calls
//! - [`resolve_path`] navigates nested references such as `person.address.city`

mod accessor;
mod bean;
mod cache;
mod path;

pub use accessor::{PropertyAccessor, StandardPropertyAccessor};
pub use bean::{Bean, BeanType, Introspect, PropertyDescriptor};
pub use cache::{BeanDescriptor, DescriptorCache};
pub use path::{navigate, parse_segments, resolve_path, PathSegment};
