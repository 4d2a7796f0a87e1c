//! Button actions and the user-action descriptor handed to the host.
//!
//! A Button's `action` property is resolved together with the rest of the
//! tree, so context values bound to the data model are captured at
//! resolution time. Activating the node stamps the descriptor with the
//! current time.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value, json};

use super::data_model::DataModel;
use super::value::resolve_value_scoped;

/// Action name used when the component does not name one.
pub const DEFAULT_ACTION_NAME: &str = "click";

/// A resolved, ready-to-fire Button action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonAction {
    pub name: String,
    pub context: Map<String, Value>,
    pub surface_id: String,
    pub source_component_id: String,
}

impl ButtonAction {
    /// Resolve a raw `action` property.
    ///
    /// Accepted shapes:
    /// - `"submit"`
    /// - `{"name": "submit", "context": {"qty": {"path": "/qty"}}}`
    /// - `{"name": "submit", "context": [{"key": "qty", "value": {"path": "/qty"}}]}`
    ///
    /// Context values that resolve to nothing are left out.
    pub fn from_value(
        action: &Value,
        data_model: &DataModel,
        scope: Option<&str>,
        surface_id: &str,
        source_component_id: &str,
    ) -> Self {
        let (name, context) = match action {
            Value::String(name) => (Some(name.as_str()), None),
            Value::Object(map) => (map.get("name").and_then(Value::as_str), map.get("context")),
            _ => (None, None),
        };

        let mut resolved = Map::new();
        match context {
            Some(Value::Object(entries)) => {
                for (key, value) in entries {
                    if let Some(value) = resolve_value_scoped(value, data_model, scope) {
                        resolved.insert(key.clone(), value);
                    }
                }
            }
            Some(Value::Array(items)) => {
                for item in items {
                    let Some(key) = item.get("key").and_then(Value::as_str) else {
                        log::debug!("[A2UI action] Ignoring context item without key: {}", item);
                        continue;
                    };
                    let value = item.get("value").unwrap_or(&Value::Null);
                    if let Some(value) = resolve_value_scoped(value, data_model, scope) {
                        resolved.insert(key.to_string(), value);
                    }
                }
            }
            _ => {}
        }

        ButtonAction {
            name: name
                .filter(|n| !n.is_empty())
                .unwrap_or(DEFAULT_ACTION_NAME)
                .to_string(),
            context: resolved,
            surface_id: surface_id.to_string(),
            source_component_id: source_component_id.to_string(),
        }
    }

    /// Fire the action now.
    pub fn activate(&self) -> UserAction {
        self.activate_at(Utc::now())
    }

    /// Fire the action with an explicit timestamp.
    pub fn activate_at(&self, at: DateTime<Utc>) -> UserAction {
        UserAction {
            name: self.name.clone(),
            surface_id: self.surface_id.clone(),
            source_component_id: self.source_component_id.clone(),
            context: self.context.clone(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// User action event (sent from client to agent)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAction {
    pub name: String,
    pub surface_id: String,
    pub source_component_id: String,
    pub context: Map<String, Value>,
    /// ISO-8601, UTC, millisecond precision
    pub timestamp: String,
}

impl UserAction {
    /// Wrap as an outbound protocol message.
    pub fn to_outbound(&self) -> Value {
        json!({ "userAction": self })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn model() -> DataModel {
        DataModel::with_data(json!({"qty": 3, "items": [{"sku": "A1"}]}))
    }

    #[test]
    fn test_object_context() {
        let action = json!({"name": "addToCart", "context": {"qty": {"path": "/qty"}, "note": "gift", "gone": {"path": "/nope"}}});
        let resolved = ButtonAction::from_value(&action, &model(), None, "main", "buy");

        assert_eq!(resolved.name, "addToCart");
        assert_eq!(Value::Object(resolved.context), json!({"qty": 3, "note": "gift"}));
    }

    #[test]
    fn test_list_context_with_scope() {
        let action = json!({"name": "pick", "context": [
            {"key": "sku", "value": {"path": "sku"}},
            {"path": "/qty"}
        ]});
        let resolved = ButtonAction::from_value(&action, &model(), Some("/items/0"), "main", "row");
        assert_eq!(Value::Object(resolved.context), json!({"sku": "A1"}));
    }

    #[test]
    fn test_default_name() {
        for action in [json!({}), json!({"name": ""}), json!(7)] {
            let resolved = ButtonAction::from_value(&action, &model(), None, "main", "b");
            assert_eq!(resolved.name, DEFAULT_ACTION_NAME);
            assert!(resolved.context.is_empty());
        }
        let resolved = ButtonAction::from_value(&json!("submit"), &model(), None, "main", "b");
        assert_eq!(resolved.name, "submit");
    }

    #[test]
    fn test_activate_outbound_shape() {
        let action = ButtonAction::from_value(&json!({"name": "go"}), &model(), None, "main", "btn");
        let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();

        let user_action = action.activate_at(at);
        assert_eq!(user_action.timestamp, "2025-01-02T03:04:05.000Z");
        assert_eq!(
            user_action.to_outbound(),
            json!({"userAction": {
                "name": "go",
                "surfaceId": "main",
                "sourceComponentId": "btn",
                "context": {},
                "timestamp": "2025-01-02T03:04:05.000Z"
            }})
        );

        let now = action.activate();
        assert!(DateTime::parse_from_rfc3339(&now.timestamp).is_ok());
    }
}
