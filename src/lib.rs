//! sqlbind - variable resolution and bind context for SQL templates
//!
//! A [`SqlGenerator`] runs a template through a pluggable
//! [`TemplateEvaluator`]. For each call it presents the parameter (a scalar, a
//! map, or an object graph) as named variables, collects the bind variables
//! registered while the template is evaluated, and renders bind placeholders
//! in the syntax the downstream statement executor expects.
//!
//! ```
//! use std::collections::HashMap;
//! use sqlbind::evaluator::from_fn;
//! use sqlbind::{SqlGenerator, Value};
//!
//! let generator = SqlGenerator::new(from_fn(|_template, context, dialect| {
//!     let mut sql = String::from("SELECT * FROM names");
//!     if context.find_variable("id")?.is_some_and(|id| !id.is_null()) {
//!         sql.push_str(" WHERE id = ");
//!         sql.push_str(&dialect.param(context, "id", None)?);
//!     }
//!     Ok(sql)
//! }));
//!
//! let parameter = Value::Map(HashMap::from([("id".to_string(), Value::Int64(5))]));
//! let sql = generator.generate("names.sql", &parameter).unwrap();
//! assert_eq!(sql, "SELECT * FROM names WHERE id = #{id}");
//! ```

pub mod binding;
pub mod bound;
pub mod config;
pub mod context;
pub mod dialect;
pub mod error;
pub mod evaluator;
pub mod property;
pub mod render;
pub mod types;

use std::sync::Arc;

pub use binding::{BindingContext, IterationStatus, LoopId};
pub use bound::BoundSql;
pub use config::GeneratorConfig;
pub use context::VariableContext;
pub use dialect::Dialect;
pub use error::{Result, SqlBindError};
pub use evaluator::TemplateEvaluator;
pub use types::{Bindings, DataType, Value};

use context::{FallbackContext, ResolutionContext};
use property::{PropertyAccessor, StandardPropertyAccessor};
use render::BindVariableRenderer;

/// Generates SQL from templates.
///
/// One generator can serve concurrent callers; every call builds its own
/// binding context and shares only the property descriptor cache.
pub struct SqlGenerator {
    /// Template evaluator.
    evaluator: Box<dyn TemplateEvaluator>,
    /// Directive callbacks (renderer + property accessor).
    dialect: Dialect,
    /// Variables merged into every call.
    default_custom_variables: Bindings,
    /// Locale reported to the evaluator.
    locale: String,
}

impl SqlGenerator {
    /// Creates a generator with the default configuration.
    #[must_use]
    pub fn new(evaluator: impl TemplateEvaluator + 'static) -> Self {
        Self::with_config(evaluator, GeneratorConfig::default())
    }

    /// Creates a generator from a configuration.
    #[must_use]
    pub fn with_config(evaluator: impl TemplateEvaluator + 'static, config: GeneratorConfig) -> Self {
        let dialect = Dialect::new(
            Arc::new(config.bind_variable_render),
            Arc::new(StandardPropertyAccessor::default()),
        );
        SqlGenerator {
            evaluator: Box::new(evaluator),
            dialect,
            default_custom_variables: config.default_custom_variables,
            locale: config.locale,
        }
    }

    /// Replaces the property accessor.
    #[must_use]
    pub fn with_property_accessor(mut self, accessor: Arc<dyn PropertyAccessor>) -> Self {
        self.dialect = Dialect::new(Arc::clone(self.dialect.renderer()), accessor);
        self
    }

    /// Replaces the bind variable renderer.
    #[must_use]
    pub fn with_bind_variable_renderer(mut self, renderer: Arc<dyn BindVariableRenderer>) -> Self {
        self.dialect = Dialect::new(renderer, Arc::clone(self.dialect.accessor()));
        self
    }

    /// Replaces the variables merged into every call.
    #[must_use]
    pub fn with_default_custom_variables(mut self, variables: Bindings) -> Self {
        self.default_custom_variables = variables;
        self
    }

    /// Returns the variables merged into every call.
    #[must_use]
    pub fn default_custom_variables(&self) -> &Bindings {
        &self.default_custom_variables
    }

    /// Returns the dialect handed to the evaluator.
    #[must_use]
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Generates SQL from a template.
    ///
    /// # Errors
    ///
    /// Returns the first error raised during evaluation; no partial SQL is
    /// produced.
    pub fn generate(&self, template: &str, parameter: &Value) -> Result<String> {
        self.process(template, parameter, None).map(|(sql, _)| sql)
    }

    /// Generates SQL with per-call variables, which take precedence over the
    /// default custom variables.
    ///
    /// # Errors
    ///
    /// See [`SqlGenerator::generate`].
    pub fn generate_with_variables(
        &self,
        template: &str,
        parameter: &Value,
        custom_variables: &Bindings,
    ) -> Result<String> {
        self.process(template, parameter, Some(custom_variables))
            .map(|(sql, _)| sql)
    }

    /// Generates SQL and passes each custom bind variable registered during
    /// evaluation to `binder`, once, after evaluation completes.
    ///
    /// # Errors
    ///
    /// See [`SqlGenerator::generate`]. On error `binder` is never called.
    pub fn generate_with_binder<F>(
        &self,
        template: &str,
        parameter: &Value,
        mut binder: F,
        custom_variables: Option<&Bindings>,
    ) -> Result<String>
    where
        F: FnMut(&str, Value),
    {
        let (sql, custom_bind_variables) = self.process(template, parameter, custom_variables)?;
        for (name, value) in custom_bind_variables {
            binder(&name, value);
        }
        Ok(sql)
    }

    /// Generates SQL together with the values a statement executor binds.
    /// `custom_variables`, when given, take precedence over the default
    /// custom variables.
    ///
    /// # Errors
    ///
    /// See [`SqlGenerator::generate`].
    pub fn generate_bound(
        &self,
        template: &str,
        parameter: &Value,
        custom_variables: Option<&Bindings>,
    ) -> Result<BoundSql> {
        let (sql, custom_bind_variables) = self.process(template, parameter, custom_variables)?;
        Ok(BoundSql::new(
            sql,
            parameter.clone(),
            custom_bind_variables,
            Arc::clone(self.dialect.accessor()),
        ))
    }

    fn process(
        &self,
        template: &str,
        parameter: &Value,
        custom_variables: Option<&Bindings>,
    ) -> Result<(String, Bindings)> {
        let mut variables = self.default_custom_variables.clone();
        if let Some(custom_variables) = custom_variables {
            variables.extend(
                custom_variables
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone())),
            );
        }

        let accessor = self.dialect.accessor();
        let mut context = FallbackContext::new(ResolutionContext::new(
            parameter,
            variables,
            accessor.as_ref(),
            &self.locale,
        ));
        log::debug!(
            "Generating SQL for {} parameter (fallback: {})",
            parameter.type_name(),
            context.is_fallback()
        );

        let sql = self.evaluator.evaluate(template, &mut context, &self.dialect)?;
        let custom_bind_variables = context
            .into_inner()
            .into_binding_context()
            .into_custom_bind_variables();
        log::trace!(
            "Generated SQL with {} custom bind variables",
            custom_bind_variables.len()
        );

        Ok((sql, custom_bind_variables))
    }
}
