//! Generated statement plus the named values it binds.

use std::fmt;
use std::sync::Arc;

use crate::context::PARAMETER_OBJECT_KEY;
use crate::error::Result;
use crate::property::PropertyAccessor;
use crate::types::{Bindings, Value};

/// Output of one generation call, ready for a statement executor.
///
/// `additional_parameters` holds every custom bind variable registered during
/// evaluation, each exactly once, plus the whole parameter under
/// `_parameter`.
pub struct BoundSql {
    sql: String,
    parameter: Value,
    additional_parameters: Bindings,
    accessor: Arc<dyn PropertyAccessor>,
}

impl BoundSql {
    pub(crate) fn new(
        sql: String,
        parameter: Value,
        custom_bind_variables: Bindings,
        accessor: Arc<dyn PropertyAccessor>,
    ) -> Self {
        let mut additional_parameters = custom_bind_variables;
        additional_parameters.insert(PARAMETER_OBJECT_KEY.to_string(), parameter.clone());
        BoundSql {
            sql,
            parameter,
            additional_parameters,
            accessor,
        }
    }

    /// Returns the rendered statement text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the original parameter.
    #[must_use]
    pub fn parameter(&self) -> &Value {
        &self.parameter
    }

    /// Returns the custom bind variables and `_parameter`.
    #[must_use]
    pub fn additional_parameters(&self) -> &Bindings {
        &self.additional_parameters
    }

    /// Returns true if `name` is an additional parameter.
    #[must_use]
    pub fn has_additional_parameter(&self, name: &str) -> bool {
        self.additional_parameters.contains_key(name)
    }

    /// Resolves a bind variable name against the merged set: additional
    /// parameters first, then the parameter's own names. A scalar parameter
    /// answers for any name.
    ///
    /// # Errors
    ///
    /// Returns any error raised while reading an object property.
    pub fn value_of(&self, name: &str) -> Result<Option<Value>> {
        if let Some(value) = self.additional_parameters.get(name) {
            return Ok(Some(value.clone()));
        }
        match &self.parameter {
            Value::Null => Ok(None),
            Value::Map(map) => Ok(map.get(name).cloned()),
            Value::Object(bean) => {
                let names = self.accessor.property_names(bean.bean_type());
                if names.is_empty() {
                    Ok(Some(self.parameter.clone()))
                } else if names.iter().any(|n| n == name) {
                    self.accessor.get_value(bean.as_ref(), name).map(Some)
                } else {
                    Ok(None)
                }
            }
            scalar => Ok(Some(scalar.clone())),
        }
    }
}

impl fmt::Debug for BoundSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundSql")
            .field("sql", &self.sql)
            .field("parameter", &self.parameter)
            .field("additional_parameters", &self.additional_parameters)
            .finish_non_exhaustive()
    }
}
