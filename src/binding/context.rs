//! Binding context for one generation call.

use super::naming::{IterationNamingService, IterationStatus};
use crate::context::{VariableContext, PARAMETER_OBJECT_KEY};
use crate::error::{Result, SqlBindError};
use crate::types::{Bindings, Value};

/// Reserved variable name under which the binding context is exposed to
/// evaluator callbacks.
pub const BINDING_CONTEXT_VARIABLE_NAME: &str = "_sqlbind.BindingContext";

/// Mutable scratchpad for one generation call.
#[derive(Debug, Default)]
pub struct BindingContext {
    /// Variables registered during evaluation.
    custom_bind_variables: Bindings,
    /// Unique names for iteration elements.
    naming: IterationNamingService,
    /// Whether unknown names resolve to the whole parameter.
    fallback_parameter_object: bool,
}

impl BindingContext {
    /// Creates an empty binding context.
    #[must_use]
    pub fn new(fallback_parameter_object: bool) -> Self {
        BindingContext {
            custom_bind_variables: Bindings::new(),
            naming: IterationNamingService::new(),
            fallback_parameter_object,
        }
    }

    /// Retrieves the binding context carried by an evaluation context.
    pub fn load(context: &mut dyn VariableContext) -> Option<&mut BindingContext> {
        context
            .extension_mut(BINDING_CONTEXT_VARIABLE_NAME)?
            .downcast_mut::<BindingContext>()
    }

    /// Sets a custom bind variable, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `VariableNameInvalid` for an empty name or a reserved name
    /// (`_parameter`, the binding context key).
    pub fn set_custom_bind_variable(
        &mut self,
        name: impl Into<String>,
        value: Value,
    ) -> Result<()> {
        let name = name.into();
        if name.is_empty()
            || name == PARAMETER_OBJECT_KEY
            || name == BINDING_CONTEXT_VARIABLE_NAME
        {
            return Err(SqlBindError::VariableNameInvalid(name));
        }
        log::trace!("Custom bind variable {name} = {value:?}");
        self.custom_bind_variables.insert(name, value);
        Ok(())
    }

    /// Returns true if a custom bind variable with this name exists.
    #[must_use]
    pub fn contains_custom_bind_variable(&self, name: &str) -> bool {
        self.custom_bind_variables.contains_key(name)
    }

    /// Looks up a custom bind variable.
    #[must_use]
    pub fn custom_bind_variable(&self, name: &str) -> Option<&Value> {
        self.custom_bind_variables.get(name)
    }

    /// Returns all custom bind variables registered so far.
    #[must_use]
    pub fn custom_bind_variables(&self) -> &Bindings {
        &self.custom_bind_variables
    }

    /// Generates a unique variable name per iteration element.
    ///
    /// The name is `{base_name}_{loop sequence index}_{status.index()}`.
    pub fn unique_name(&mut self, base_name: &str, status: &IterationStatus) -> String {
        self.naming.unique_name(base_name, status)
    }

    /// Returns whether unknown names resolve to the whole parameter.
    #[must_use]
    pub fn is_fallback_parameter_object(&self) -> bool {
        self.fallback_parameter_object
    }

    /// Consumes the context, yielding the custom bind variables.
    #[must_use]
    pub fn into_custom_bind_variables(self) -> Bindings {
        self.custom_bind_variables
    }
}
