//! A2UI Bound Values
//!
//! Component properties can carry an immediate literal or a pointer into the
//! surface data model.
//!
//! ```json
//! {"literalString": "Hello World"}
//! {"literalNumber": 42}
//! {"literalBoolean": true}
//! {"path": "/user/name"}
//! ```

use serde_json::{Value, json};

use super::data_model::DataModel;

const LITERAL_STRING: &str = "literalString";
const LITERAL_NUMBER: &str = "literalNumber";
const LITERAL_BOOLEAN: &str = "literalBoolean";
const PATH: &str = "path";

/// A property value that is either a literal or a data-model pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    /// An immediate value, taken as-is
    Literal(Value),
    /// A slash-delimited pointer into the data model
    Path(String),
}

impl BoundValue {
    /// Create a literal string value
    pub fn literal_string(s: impl Into<String>) -> Self {
        BoundValue::Literal(Value::String(s.into()))
    }

    /// Create a literal number value
    pub fn literal_number(n: f64) -> Self {
        BoundValue::Literal(json!(n))
    }

    /// Create a literal boolean value
    pub fn literal_boolean(b: bool) -> Self {
        BoundValue::Literal(Value::Bool(b))
    }

    /// Create a path reference
    pub fn path(p: impl Into<String>) -> Self {
        BoundValue::Path(p.into())
    }

    /// Interpret a raw property value.
    ///
    /// Literal keys win over `path`, in the order string, number, boolean.
    /// Returns `None` when the value has no bound-value shape at all.
    pub fn from_json(value: &Value) -> Option<Self> {
        let map = value.as_object()?;

        for key in [LITERAL_STRING, LITERAL_NUMBER, LITERAL_BOOLEAN] {
            if let Some(literal) = map.get(key) {
                return Some(BoundValue::Literal(literal.clone()));
            }
        }

        match map.get(PATH) {
            Some(Value::String(path)) => Some(BoundValue::Path(path.clone())),
            _ => None,
        }
    }

    /// Check if this is a literal value
    pub fn is_literal(&self) -> bool {
        matches!(self, BoundValue::Literal(_))
    }

    /// Get the path if this is a path reference
    pub fn as_path(&self) -> Option<&str> {
        match self {
            BoundValue::Path(path) => Some(path),
            _ => None,
        }
    }

    /// Resolve against a data model. `None` means the path is undefined.
    pub fn resolve(&self, data_model: &DataModel) -> Option<Value> {
        self.resolve_scoped(data_model, None)
    }

    /// Resolve with an optional scope for template items.
    pub fn resolve_scoped(&self, data_model: &DataModel, scope: Option<&str>) -> Option<Value> {
        match self {
            BoundValue::Literal(value) => Some(value.clone()),
            BoundValue::Path(path) => data_model.get(&scoped_path(path, scope)).cloned(),
        }
    }
}

/// Resolve any property value: bound values are looked up, anything else
/// is returned unchanged.
pub fn resolve_value(value: &Value, data_model: &DataModel) -> Option<Value> {
    resolve_value_scoped(value, data_model, None)
}

/// [`resolve_value`] with an optional template scope.
pub fn resolve_value_scoped(
    value: &Value,
    data_model: &DataModel,
    scope: Option<&str>,
) -> Option<Value> {
    match BoundValue::from_json(value) {
        Some(bound) => bound.resolve_scoped(data_model, scope),
        None => Some(value.clone()),
    }
}

/// Resolve a path against an optional scope prefix.
/// - absolute paths (leading `/`) are used as-is
/// - relative paths are appended to the scope when there is one
pub(crate) fn scoped_path(path: &str, scope: Option<&str>) -> String {
    match scope {
        Some(prefix) if !path.starts_with('/') && !path.is_empty() => {
            format!("{}/{}", prefix.trim_end_matches('/'), path)
        }
        _ => path.to_string(),
    }
}
