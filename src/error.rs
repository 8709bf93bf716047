//! Error types for sqlbind operations.

use thiserror::Error;

/// Result type alias using [`SqlBindError`].
pub type Result<T> = std::result::Result<T, SqlBindError>;

/// Boxed failure raised by a property reader or writer.
pub type PropertyFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for sqlbind operations.
#[derive(Debug, Error)]
pub enum SqlBindError {
    // ==================== Property Access Errors ====================
    /// No reader/writer exists for the property on the given type.
    #[error("Property '{property}' not found on '{type_name}'")]
    PropertyNotFound { property: String, type_name: String },

    /// A property reader or writer raised an error.
    #[error("Cannot access property '{property}' on '{type_name}': {source}")]
    PropertyInvocation {
        property: String,
        type_name: String,
        #[source]
        source: PropertyFailure,
    },

    /// A property path could not be parsed or navigated.
    #[error("Invalid property path: {0}")]
    InvalidPropertyPath(String),

    // ==================== Variable Resolution Errors ====================
    /// A directive tried to register a bind variable under an empty or
    /// reserved name.
    #[error("Variable name expression evaluated as null, empty or reserved: \"{0}\"")]
    VariableNameInvalid(String),

    /// A referenced variable is absent from every source.
    #[error("Unresolvable reference: '{0}'")]
    UnresolvableReference(String),

    /// The evaluation context does not carry a binding context.
    #[error("Binding context is not available in the evaluation context")]
    BindingContextMissing,

    // ==================== Generation Errors ====================
    /// The template evaluator failed.
    #[error("Template error: {0}")]
    Template(String),

    /// Invalid generator configuration.
    #[error("Config error: {0}")]
    Config(String),
}

impl SqlBindError {
    /// Creates a property-not-found error.
    #[must_use]
    pub fn property_not_found(property: impl Into<String>, type_name: impl Into<String>) -> Self {
        SqlBindError::PropertyNotFound {
            property: property.into(),
            type_name: type_name.into(),
        }
    }

    /// Wraps a reader/writer failure together with the property and type it came from.
    #[must_use]
    pub fn property_invocation(
        property: impl Into<String>,
        type_name: impl Into<String>,
        source: PropertyFailure,
    ) -> Self {
        SqlBindError::PropertyInvocation {
            property: property.into(),
            type_name: type_name.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for SqlBindError {
    fn from(err: serde_json::Error) -> Self {
        SqlBindError::Config(err.to_string())
    }
}
