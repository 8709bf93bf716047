//! Fallback lookups for scalar parameters.

use std::any::Any;
use std::collections::BTreeSet;

use super::{VariableContext, PARAMETER_OBJECT_KEY};
use crate::binding::BindingContext;
use crate::error::Result;
use crate::types::Value;

/// Wraps a context so that, when the binding context enables the fallback
/// policy, any name the inner context does not know resolves to the whole
/// parameter.
///
/// This lets a template written against a named property (`id`) run with a
/// bare value (`6`) as its parameter.
pub struct FallbackContext<C> {
    inner: C,
    fallback: bool,
}

impl<C: VariableContext> FallbackContext<C> {
    /// Wraps `inner`, reading the policy from its binding context.
    pub fn new(mut inner: C) -> Self {
        let fallback = BindingContext::load(&mut inner)
            .is_some_and(|binding| binding.is_fallback_parameter_object());
        FallbackContext { inner, fallback }
    }

    /// Returns true if the fallback policy is active.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Consumes the wrapper, yielding the wrapped context.
    #[must_use]
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: VariableContext> VariableContext for FallbackContext<C> {
    fn locale(&self) -> &str {
        self.inner.locale()
    }

    fn contains_variable(&self, name: &str) -> bool {
        self.inner.contains_variable(name)
    }

    fn variable_names(&self) -> BTreeSet<String> {
        self.inner.variable_names()
    }

    fn get_variable(&self, name: &str) -> Result<Value> {
        if self.fallback && !self.inner.contains_variable(name) {
            self.inner.get_variable(PARAMETER_OBJECT_KEY)
        } else {
            self.inner.get_variable(name)
        }
    }

    fn extension_mut(&mut self, key: &str) -> Option<&mut dyn Any> {
        self.inner.extension_mut(key)
    }
}
