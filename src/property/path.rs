//! Nested property paths such as `order.lines[0].sku`.

use super::accessor::PropertyAccessor;
use crate::error::{Result, SqlBindError};
use crate::types::Value;

/// One step of a property path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Named property or map key.
    Property(String),
    /// List index.
    Index(usize),
}

/// Parses the segment tail of a path, e.g. `.address.city` or `[0].name`.
///
/// # Errors
///
/// Returns `InvalidPropertyPath` if the tail is malformed.
pub fn parse_segments(tail: &str) -> Result<Vec<PathSegment>> {
    let invalid = || SqlBindError::InvalidPropertyPath(tail.to_string());
    let mut segments = Vec::new();
    let mut rest = tail;

    while !rest.is_empty() {
        if let Some(after_dot) = rest.strip_prefix('.') {
            let end = after_dot.find(['.', '[']).unwrap_or(after_dot.len());
            let name = &after_dot[..end];
            if name.is_empty() {
                return Err(invalid());
            }
            segments.push(PathSegment::Property(name.to_string()));
            rest = &after_dot[end..];
        } else if let Some(after_bracket) = rest.strip_prefix('[') {
            let close = after_bracket.find(']').ok_or_else(invalid)?;
            let index = after_bracket[..close]
                .trim()
                .parse::<usize>()
                .map_err(|_| invalid())?;
            segments.push(PathSegment::Index(index));
            rest = &after_bracket[close + 1..];
        } else {
            return Err(invalid());
        }
    }

    Ok(segments)
}

/// Walks `segments` starting from `value`.
///
/// Navigating through `Null` yields `Null`; a missing map key yields `Null`.
///
/// # Errors
///
/// Returns `PropertyNotFound` when a scalar has no such property,
/// `InvalidPropertyPath` for an out-of-range or misplaced index, and any
/// error raised by the accessor.
pub fn navigate(
    accessor: &dyn PropertyAccessor,
    value: &Value,
    segments: &[PathSegment],
) -> Result<Value> {
    let mut current = value.clone();
    for segment in segments {
        current = match (segment, &current) {
            (_, Value::Null) => return Ok(Value::Null),
            (PathSegment::Property(name), Value::Map(map)) => {
                map.get(name).cloned().unwrap_or(Value::Null)
            }
            (PathSegment::Property(name), Value::Object(bean)) => {
                accessor.get_value(bean.as_ref(), name)?
            }
            (PathSegment::Property(name), other) => {
                return Err(SqlBindError::property_not_found(name, other.type_name()));
            }
            (PathSegment::Index(index), Value::List(items)) => {
                items.get(*index).cloned().ok_or_else(|| {
                    SqlBindError::InvalidPropertyPath(format!(
                        "index {index} out of bounds for list of length {}",
                        items.len()
                    ))
                })?
            }
            (PathSegment::Index(index), other) => {
                return Err(SqlBindError::InvalidPropertyPath(format!(
                    "cannot index {} with [{index}]",
                    other.type_name()
                )));
            }
        };
    }
    Ok(current)
}

/// Resolves a path relative to `root`, e.g. `lines[0].sku` against an order.
///
/// # Errors
///
/// Returns `InvalidPropertyPath` for a malformed path and any error raised
/// while navigating it.
pub fn resolve_path(accessor: &dyn PropertyAccessor, root: &Value, path: &str) -> Result<Value> {
    let segments = if path.starts_with('[') {
        parse_segments(path)?
    } else {
        parse_segments(&format!(".{path}"))?
    };
    navigate(accessor, root, &segments)
}
