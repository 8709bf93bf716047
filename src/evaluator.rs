//! Template evaluator seam.
//!
//! sqlbind does not parse templates. Any expression language can be plugged
//! in by implementing [`TemplateEvaluator`]: it receives the template text, the
//! variable context for the call, and the [`Dialect`] whose directives it calls
//! when it meets a bind or parameter directive.

use crate::context::VariableContext;
use crate::dialect::Dialect;
use crate::error::Result;

/// Renders a template against a variable context.
pub trait TemplateEvaluator: Send + Sync {
    /// Evaluates `template`, returning the rendered statement text.
    ///
    /// # Errors
    ///
    /// Returns any error raised by a variable lookup or directive, or
    /// `Template` for failures of the evaluator itself.
    fn evaluate(
        &self,
        template: &str,
        context: &mut dyn VariableContext,
        dialect: &Dialect,
    ) -> Result<String>;
}

/// Evaluator backed by a closure. See [`from_fn`].
#[derive(Debug, Clone, Copy)]
pub struct FnEvaluator<F>(F);

/// Creates an evaluator from a closure.
///
/// ```
/// use sqlbind::evaluator::from_fn;
///
/// let evaluator = from_fn(|template, _context, _dialect| Ok(template.to_uppercase()));
/// # let _ = evaluator;
/// ```
pub fn from_fn<F>(f: F) -> FnEvaluator<F>
where
    F: Fn(&str, &mut dyn VariableContext, &Dialect) -> Result<String> + Send + Sync,
{
    FnEvaluator(f)
}

impl<F> TemplateEvaluator for FnEvaluator<F>
where
    F: Fn(&str, &mut dyn VariableContext, &Dialect) -> Result<String> + Send + Sync,
{
    fn evaluate(
        &self,
        template: &str,
        context: &mut dyn VariableContext,
        dialect: &Dialect,
    ) -> Result<String> {
        (self.0)(template, context, dialect)
    }
}

/// Evaluator that returns the template unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl TemplateEvaluator for Verbatim {
    fn evaluate(
        &self,
        template: &str,
        _context: &mut dyn VariableContext,
        _dialect: &Dialect,
    ) -> Result<String> {
        Ok(template.to_string())
    }
}
