//! Parameter directive expressions: `name[.nested.path][,options]`.

use crate::context::VariableContext;
use crate::error::{Result, SqlBindError};
use crate::property::{navigate, parse_segments, PropertyAccessor};
use crate::types::Value;

/// Split form of a parameter expression. Separators stay attached to the
/// piece that follows them, so pieces concatenate back to the expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct ParamExpression<'e> {
    expression: &'e str,
    parameter_path: &'e str,
    object_name: &'e str,
    nested_path: &'e str,
    options: &'e str,
}

impl<'e> ParamExpression<'e> {
    /// Parses an expression, ignoring surrounding whitespace. The object name
    /// must be non-empty and free of whitespace.
    pub(super) fn parse(expression: &'e str) -> Result<Self> {
        let expression = expression.trim();
        let (parameter_path, options) = split_at(expression, |c| c == ',');
        let (object_name, nested_path) = split_at(parameter_path, |c| c == '.' || c == '[');
        if object_name.is_empty() || object_name.contains(char::is_whitespace) {
            return Err(SqlBindError::InvalidPropertyPath(expression.to_string()));
        }
        Ok(ParamExpression {
            expression,
            parameter_path,
            object_name,
            nested_path,
            options,
        })
    }

    pub(super) fn expression(&self) -> &'e str {
        self.expression
    }

    pub(super) fn parameter_path(&self) -> &'e str {
        self.parameter_path
    }

    pub(super) fn object_name(&self) -> &'e str {
        self.object_name
    }

    pub(super) fn nested_path(&self) -> &'e str {
        self.nested_path
    }

    pub(super) fn options(&self) -> &'e str {
        self.options
    }

    /// Resolves the referenced value through the context. An unknown root
    /// resolves to `Null`.
    pub(super) fn resolve(
        &self,
        context: &dyn VariableContext,
        accessor: &dyn PropertyAccessor,
    ) -> Result<Value> {
        let root = context.find_variable(self.object_name)?.unwrap_or(Value::Null);
        if self.nested_path.is_empty() {
            Ok(root)
        } else {
            self.resolve_nested(&root, accessor)
        }
    }

    /// Resolves the nested path against `root`.
    pub(super) fn resolve_nested(&self, root: &Value, accessor: &dyn PropertyAccessor) -> Result<Value> {
        let segments = parse_segments(self.nested_path)?;
        navigate(accessor, root, &segments)
    }
}

fn split_at(value: &str, separator: impl Fn(char) -> bool) -> (&str, &str) {
    match value.find(separator) {
        Some(index) => value.split_at(index),
        None => (value, ""),
    }
}
