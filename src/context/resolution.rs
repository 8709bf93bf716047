//! Parameter-shape-aware variable resolution.

use std::any::Any;
use std::collections::{BTreeSet, HashMap};

use super::{VariableContext, PARAMETER_OBJECT_KEY};
use crate::binding::{BindingContext, BINDING_CONTEXT_VARIABLE_NAME};
use crate::error::{Result, SqlBindError};
use crate::property::{Bean, PropertyAccessor};
use crate::types::{Bindings, Value};

/// Shape of the parameter, decided once when the context is built.
pub enum ParameterSource<'a> {
    /// A value with no named properties: null, scalar, list, or property-less object.
    Scalar(&'a Value),
    /// A string-keyed map; keys are the variable names.
    Map(&'a HashMap<String, Value>),
    /// An object whose introspected properties are the variable names.
    Object {
        bean: &'a dyn Bean,
        names: BTreeSet<String>,
    },
}

impl<'a> ParameterSource<'a> {
    /// Classifies a parameter.
    pub fn classify(parameter: &'a Value, accessor: &dyn PropertyAccessor) -> Self {
        match parameter {
            Value::Map(map) => ParameterSource::Map(map),
            Value::Object(bean) => {
                let names: BTreeSet<String> = accessor
                    .property_names(bean.bean_type())
                    .into_iter()
                    .collect();
                if names.is_empty() {
                    ParameterSource::Scalar(parameter)
                } else {
                    ParameterSource::Object {
                        bean: bean.as_ref(),
                        names,
                    }
                }
            }
            other => ParameterSource::Scalar(other),
        }
    }

    /// Returns true if unknown names should resolve to the whole parameter.
    ///
    /// Only a non-null parameter without named properties qualifies.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, ParameterSource::Scalar(value) if !value.is_null())
    }

    fn contains(&self, name: &str) -> bool {
        match self {
            ParameterSource::Scalar(_) => false,
            ParameterSource::Map(map) => map.contains_key(name),
            ParameterSource::Object { names, .. } => names.contains(name),
        }
    }

    fn names(&self) -> Vec<&str> {
        match self {
            ParameterSource::Scalar(_) => Vec::new(),
            ParameterSource::Map(map) => map.keys().map(String::as_str).collect(),
            ParameterSource::Object { names, .. } => names.iter().map(String::as_str).collect(),
        }
    }

    fn get(&self, name: &str, accessor: &dyn PropertyAccessor) -> Result<Value> {
        match self {
            ParameterSource::Map(map) => map
                .get(name)
                .cloned()
                .ok_or_else(|| SqlBindError::UnresolvableReference(name.to_string())),
            ParameterSource::Object { bean, names } if names.contains(name) => {
                accessor.get_value(*bean, name)
            }
            _ => Err(SqlBindError::UnresolvableReference(name.to_string())),
        }
    }
}

/// Variable context over one parameter, the call's variables, and its binding context.
///
/// Lookup order: the reserved [`PARAMETER_OBJECT_KEY`], custom bind variables
/// registered during evaluation, call/default variables, then the parameter.
/// The first source that knows a name supplies its value.
pub struct ResolutionContext<'a> {
    parameter: &'a Value,
    source: ParameterSource<'a>,
    variables: Bindings,
    binding: BindingContext,
    accessor: &'a dyn PropertyAccessor,
    locale: &'a str,
}

impl<'a> ResolutionContext<'a> {
    /// Builds the context and a fresh binding context for one call.
    pub fn new(
        parameter: &'a Value,
        variables: Bindings,
        accessor: &'a dyn PropertyAccessor,
        locale: &'a str,
    ) -> Self {
        let source = ParameterSource::classify(parameter, accessor);
        let binding = BindingContext::new(source.is_fallback());
        ResolutionContext {
            parameter,
            source,
            variables,
            binding,
            accessor,
            locale,
        }
    }

    /// Returns the binding context.
    #[must_use]
    pub fn binding_context(&self) -> &BindingContext {
        &self.binding
    }

    /// Returns the binding context mutably.
    pub fn binding_context_mut(&mut self) -> &mut BindingContext {
        &mut self.binding
    }

    /// Consumes the context, yielding its binding context.
    #[must_use]
    pub fn into_binding_context(self) -> BindingContext {
        self.binding
    }
}

impl VariableContext for ResolutionContext<'_> {
    fn locale(&self) -> &str {
        self.locale
    }

    fn contains_variable(&self, name: &str) -> bool {
        name == PARAMETER_OBJECT_KEY
            || self.binding.contains_custom_bind_variable(name)
            || self.variables.contains_key(name)
            || self.source.contains(name)
    }

    fn variable_names(&self) -> BTreeSet<String> {
        let mut names: BTreeSet<String> = self
            .binding
            .custom_bind_variables()
            .keys()
            .chain(self.variables.keys())
            .cloned()
            .collect();
        names.insert(PARAMETER_OBJECT_KEY.to_string());
        names.extend(self.source.names().into_iter().map(str::to_string));
        names
    }

    fn get_variable(&self, name: &str) -> Result<Value> {
        if name == PARAMETER_OBJECT_KEY {
            return Ok(self.parameter.clone());
        }
        if let Some(value) = self.binding.custom_bind_variable(name) {
            return Ok(value.clone());
        }
        if let Some(value) = self.variables.get(name) {
            return Ok(value.clone());
        }
        self.source.get(name, self.accessor)
    }

    fn extension_mut(&mut self, key: &str) -> Option<&mut dyn Any> {
        if key == BINDING_CONTEXT_VARIABLE_NAME {
            Some(&mut self.binding)
        } else {
            None
        }
    }
}
