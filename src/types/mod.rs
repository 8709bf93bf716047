//! Runtime value model.

mod value;

pub use value::{Bindings, DataType, Value};
