//! Directive callbacks invoked by template evaluators.
//!
//! A template evaluator owns the directive syntax; when it meets a bind or
//! parameter directive it calls into [`Dialect`], which does the engine-side
//! work against the evaluation context:
//! - [`Dialect::bind`] registers a custom bind variable
//! - [`Dialect::param`] renders a bind placeholder, registering iteration
//!   elements under unique names and expanding lists

mod param;

use std::fmt;
use std::sync::Arc;

use crate::binding::{BindingContext, IterationStatus};
use crate::context::VariableContext;
use crate::error::{Result, SqlBindError};
use crate::property::{PropertyAccessor, StandardPropertyAccessor};
use crate::render::{BindVariableRenderer, BuiltInRenderer};
use crate::types::Value;

use param::ParamExpression;

/// Engine-side implementation of the bind and parameter directives.
#[derive(Clone)]
pub struct Dialect {
    renderer: Arc<dyn BindVariableRenderer>,
    accessor: Arc<dyn PropertyAccessor>,
}

impl Default for Dialect {
    fn default() -> Self {
        Self::new(
            Arc::new(BuiltInRenderer::default()),
            Arc::new(StandardPropertyAccessor::default()),
        )
    }
}

impl fmt::Debug for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialect")
            .field("placeholder", &self.renderer.render("name"))
            .finish_non_exhaustive()
    }
}

impl Dialect {
    /// Creates a dialect with the given renderer and property accessor.
    #[must_use]
    pub fn new(
        renderer: Arc<dyn BindVariableRenderer>,
        accessor: Arc<dyn PropertyAccessor>,
    ) -> Self {
        Dialect { renderer, accessor }
    }

    /// Returns the placeholder renderer.
    #[must_use]
    pub fn renderer(&self) -> &Arc<dyn BindVariableRenderer> {
        &self.renderer
    }

    /// Returns the property accessor used for nested references.
    #[must_use]
    pub fn accessor(&self) -> &Arc<dyn PropertyAccessor> {
        &self.accessor
    }

    /// Renders a bind variable placeholder.
    #[must_use]
    pub fn render(&self, name: &str) -> String {
        self.renderer.render(name)
    }

    /// Registers `value` as a custom bind variable named by the evaluated `name`.
    ///
    /// # Errors
    ///
    /// Returns `VariableNameInvalid` if `name` is null, renders empty or
    /// renders a reserved name (`_parameter`), and `BindingContextMissing` if
    /// the context carries no binding context.
    pub fn bind(&self, context: &mut dyn VariableContext, name: &Value, value: Value) -> Result<()> {
        let variable_name = match name {
            Value::Null => String::new(),
            other => other.to_string(),
        };
        if variable_name.is_empty() {
            return Err(SqlBindError::VariableNameInvalid(name.to_string()));
        }

        let binding = BindingContext::load(context).ok_or(SqlBindError::BindingContextMissing)?;
        binding.set_custom_bind_variable(variable_name, value)
    }

    /// Renders the bind placeholder(s) for a parameter expression.
    ///
    /// `expression` has the form `name[.nested.path][,options]`; options are
    /// passed through to the placeholder, e.g. `id,jdbcType=INTEGER`.
    ///
    /// Inside a loop, pass the current step as `iteration`: the element is
    /// registered as a custom bind variable under a unique name derived from
    /// `name`, and the placeholder refers to that name.
    ///
    /// A reference to a list expands to one placeholder per element, joined by
    /// `", "`; an empty list renders `null`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPropertyPath` for a malformed expression,
    /// `BindingContextMissing` when iterating without a binding context, and
    /// any error raised while resolving nested properties.
    pub fn param(
        &self,
        context: &mut dyn VariableContext,
        expression: &str,
        iteration: Option<&IterationStatus>,
    ) -> Result<String> {
        let param = ParamExpression::parse(expression)?;

        let Some(status) = iteration else {
            let value = param.resolve(context, self.accessor.as_ref())?;
            return Ok(match value.as_list() {
                Some(items) => self.render_list(param.parameter_path(), items.len(), param.options()),
                None => self.render(param.expression()),
            });
        };

        let binding = BindingContext::load(context).ok_or(SqlBindError::BindingContextMissing)?;
        let variable_name = binding.unique_name(param.object_name(), status);
        if !binding.contains_custom_bind_variable(&variable_name) {
            binding.set_custom_bind_variable(variable_name.clone(), status.current().clone())?;
        }

        if param.nested_path().is_empty() {
            return Ok(self.render(&format!("{variable_name}{}", param.options())));
        }

        let value = param.resolve_nested(status.current(), self.accessor.as_ref())?;
        let path = format!("{variable_name}{}", param.nested_path());
        Ok(match value.as_list() {
            Some(items) => self.render_list(&path, items.len(), param.options()),
            None => self.render(&format!("{path}{}", param.options())),
        })
    }

    fn render_list(&self, path: &str, len: usize, options: &str) -> String {
        if len == 0 {
            return "null".to_string();
        }
        (0..len)
            .map(|i| self.render(&format!("{path}[{i}]{options}")))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
