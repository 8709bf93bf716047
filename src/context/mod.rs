//! Variable lookup surface handed to template evaluators.
//!
//! The evaluator only sees [`VariableContext`]. Behind it:
//! - [`ResolutionContext`] dispatches on the parameter shape (scalar, map, object)
//! - [`FallbackContext`] resolves unknown names to a scalar parameter when the
//!   binding context asks for it

mod fallback;
mod resolution;

use std::any::Any;
use std::collections::BTreeSet;

pub use fallback::FallbackContext;
pub use resolution::{ParameterSource, ResolutionContext};

use crate::error::{Result, SqlBindError};
use crate::types::Value;

/// Reserved variable name that always resolves to the whole parameter.
pub const PARAMETER_OBJECT_KEY: &str = "_parameter";

/// Named-variable lookup used by template evaluators and directive callbacks.
pub trait VariableContext {
    /// Returns the locale tag templates should format values with.
    fn locale(&self) -> &str;

    /// Returns true if `name` resolves to a value.
    fn contains_variable(&self, name: &str) -> bool;

    /// Returns every resolvable variable name.
    fn variable_names(&self) -> BTreeSet<String>;

    /// Resolves a variable.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvableReference` if no source knows the name, or any
    /// error raised while reading an object property.
    fn get_variable(&self, name: &str) -> Result<Value>;

    /// Returns a reserved, non-value entry such as the binding context.
    fn extension_mut(&mut self, key: &str) -> Option<&mut dyn Any>;

    /// Resolves a variable, mapping an unknown name to `None`.
    ///
    /// # Errors
    ///
    /// Propagates every error except `UnresolvableReference`.
    fn find_variable(&self, name: &str) -> Result<Option<Value>> {
        match self.get_variable(name) {
            Ok(value) => Ok(Some(value)),
            Err(SqlBindError::UnresolvableReference(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}
