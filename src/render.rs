//! Bind variable placeholder rendering.

use serde::Deserialize;

/// Renders a bind variable name as the placeholder a statement executor expects.
///
/// Implementations must be stateless; one instance is shared by every call.
pub trait BindVariableRenderer: Send + Sync {
    /// Renders a bind variable.
    fn render(&self, name: &str) -> String;
}

impl<F> BindVariableRenderer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn render(&self, name: &str) -> String {
        self(name)
    }
}

/// Built-in placeholder conventions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum BuiltInRenderer {
    /// MyBatis named parameter, e.g. `#{id}`.
    #[default]
    #[serde(rename = "MYBATIS")]
    MyBatis,
    /// Spring JDBC named parameter, e.g. `:id`.
    #[serde(rename = "SPRING_NAMED_PARAMETER")]
    SpringNamedParameter,
}

impl BindVariableRenderer for BuiltInRenderer {
    fn render(&self, name: &str) -> String {
        match self {
            BuiltInRenderer::MyBatis => format!("#{{{name}}}"),
            BuiltInRenderer::SpringNamedParameter => format!(":{name}"),
        }
    }
}

/// Renders `{prefix}{name}{suffix}`, e.g. `?id` for R2DBC `MySQL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnclosingRenderer {
    prefix: String,
    suffix: String,
}

impl EnclosingRenderer {
    /// Creates a renderer that encloses names in `prefix` and `suffix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        EnclosingRenderer {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }
}

impl BindVariableRenderer for EnclosingRenderer {
    fn render(&self, name: &str) -> String {
        format!("{}{name}{}", self.prefix, self.suffix)
    }
}
