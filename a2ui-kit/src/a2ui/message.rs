//! A2UI Protocol Message Types
//!
//! A record becomes a message when exactly one of the four message keys is
//! populated. Payloads are decoded leniently: component entries that do not
//! fit are dropped one by one and wrong-typed scalar fields are ignored, so
//! one sloppy line from a model never costs the whole update.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::catalog::ComponentKind;
use super::data_model::{DataEntry, lenient_entries, lenient_f64, lenient_string};
use super::decoder::{DecodeOutcome, decode_all};
use super::error::SkipReason;

/// The four recognized top-level message keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    SurfaceUpdate,
    DataModelUpdate,
    BeginRendering,
    DeleteSurface,
}

impl MessageKind {
    /// Classification order.
    pub const ALL: [MessageKind; 4] = [
        MessageKind::SurfaceUpdate,
        MessageKind::DataModelUpdate,
        MessageKind::BeginRendering,
        MessageKind::DeleteSurface,
    ];

    /// Wire key, case-sensitive.
    pub fn key(&self) -> &'static str {
        match self {
            MessageKind::SurfaceUpdate => "surfaceUpdate",
            MessageKind::DataModelUpdate => "dataModelUpdate",
            MessageKind::BeginRendering => "beginRendering",
            MessageKind::DeleteSurface => "deleteSurface",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Tag a record with the first message key it populates.
///
/// `null`, `false`, `0` and `""` count as absent.
pub fn classify(record: &Value) -> Option<MessageKind> {
    let map = record.as_object()?;
    MessageKind::ALL
        .into_iter()
        .find(|kind| map.get(kind.key()).is_some_and(is_populated))
}

fn is_populated(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Whether `text` carries at least one protocol message.
///
/// Used to tell an A2UI response apart from ordinary markdown prose.
pub fn looks_like_protocol(text: &str) -> bool {
    decode_all(text)
        .into_iter()
        .filter_map(DecodeOutcome::into_record)
        .any(|record| classify(&record).is_some())
}

/// Top-level A2UI message enum.
///
/// Serializes back to the wire shape (`{"surfaceUpdate": {...}}`);
/// deserializing goes through [`A2uiMessage::from_record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Value")]
pub enum A2uiMessage {
    /// Add or update components in the tree
    SurfaceUpdate(SurfaceUpdate),

    /// Update the data model
    DataModelUpdate(DataModelUpdate),

    /// Mark a surface ready, optionally naming its root
    BeginRendering(BeginRendering),

    /// Delete a surface
    DeleteSurface(DeleteSurface),
}

impl A2uiMessage {
    /// Classify a record and decode its payload.
    pub fn from_record(record: Value) -> Result<Self, SkipReason> {
        let kind = classify(&record).ok_or(SkipReason::Unclassified)?;
        let payload = match record {
            Value::Object(mut map) => map.remove(kind.key()).unwrap_or(Value::Null),
            _ => Value::Null,
        };

        if !payload.is_object() {
            return Err(SkipReason::InvalidPayload {
                kind,
                message: "payload is not an object".to_string(),
            });
        }

        let invalid = |e: serde_json::Error| SkipReason::InvalidPayload {
            kind,
            message: e.to_string(),
        };

        match kind {
            MessageKind::SurfaceUpdate => serde_json::from_value(payload)
                .map(A2uiMessage::SurfaceUpdate)
                .map_err(invalid),
            MessageKind::DataModelUpdate => serde_json::from_value(payload)
                .map(A2uiMessage::DataModelUpdate)
                .map_err(invalid),
            MessageKind::BeginRendering => serde_json::from_value(payload)
                .map(A2uiMessage::BeginRendering)
                .map_err(invalid),
            MessageKind::DeleteSurface => serde_json::from_value(payload)
                .map(A2uiMessage::DeleteSurface)
                .map_err(invalid),
        }
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            A2uiMessage::SurfaceUpdate(_) => MessageKind::SurfaceUpdate,
            A2uiMessage::DataModelUpdate(_) => MessageKind::DataModelUpdate,
            A2uiMessage::BeginRendering(_) => MessageKind::BeginRendering,
            A2uiMessage::DeleteSurface(_) => MessageKind::DeleteSurface,
        }
    }

    /// Get the surface ID this message names, if any
    pub fn surface_id(&self) -> Option<&str> {
        match self {
            A2uiMessage::SurfaceUpdate(m) => m.surface_id.as_deref(),
            A2uiMessage::DataModelUpdate(m) => m.surface_id.as_deref(),
            A2uiMessage::BeginRendering(m) => m.surface_id.as_deref(),
            A2uiMessage::DeleteSurface(m) => Some(&m.surface_id),
        }
    }
}

impl TryFrom<Value> for A2uiMessage {
    type Error = SkipReason;

    fn try_from(record: Value) -> Result<Self, Self::Error> {
        A2uiMessage::from_record(record)
    }
}

/// Add or update components in the surface.
///
/// # Example JSON
///
/// ```text
/// {
///   "surfaceUpdate": {
///     "surfaceId": "main",
///     "components": [
///       {
///         "id": "root",
///         "component": {
///           "Column": {
///             "children": {"explicitList": ["header", "content"]}
///           }
///         }
///       }
///     ]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceUpdate {
    /// Target surface ID
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub surface_id: Option<String>,

    /// Components to add or update
    #[serde(default, deserialize_with = "lenient_components")]
    pub components: Vec<ComponentDefinition>,
}

/// Update the data model.
///
/// # Example JSON
///
/// ```text
/// {
///   "dataModelUpdate": {
///     "surfaceId": "main",
///     "path": "/",
///     "contents": [
///       {"key": "products", "valueMap": [...]}
///     ]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataModelUpdate {
    /// Target surface ID
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub surface_id: Option<String>,

    /// Merge point; absent means the root
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Adjacency-list encoded values; absent or not a list means nothing to merge
    #[serde(default, deserialize_with = "lenient_entries", skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<DataEntry>>,
}

/// Mark a surface ready.
///
/// # Example JSON
///
/// ```text
/// {
///   "beginRendering": {
///     "surfaceId": "main",
///     "root": "root-column",
///     "styles": {"primaryColor": "#007BFF", "font": "Roboto"}
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginRendering {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub surface_id: Option<String>,

    /// ID of the root component
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    /// Optional style configuration
    #[serde(default, deserialize_with = "lenient_styles", skip_serializing_if = "Option::is_none")]
    pub styles: Option<SurfaceStyles>,
}

/// Style configuration for a surface
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceStyles {
    /// Primary color (hex format)
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,

    /// Font family name
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,

    /// Additional custom styles
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Delete a surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSurface {
    /// Surface ID to delete
    pub surface_id: String,
}

/// A single component definition in the adjacency list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    /// Unique component ID
    pub id: String,

    /// Optional flex weight for Row/Column layouts
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// The component type and properties
    pub component: ComponentType,
}

impl ComponentDefinition {
    pub fn new(id: impl Into<String>, component: ComponentType) -> Self {
        ComponentDefinition {
            id: id.into(),
            weight: None,
            component,
        }
    }
}

/// The component variant: a single-key object whose key is the type name.
///
/// Properties are kept as raw JSON; the tree resolver interprets them.
/// Type names outside the catalog are preserved so they can be shown as a
/// placeholder instead of disappearing.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentType {
    Known { kind: ComponentKind, props: Value },
    Unknown { type_name: String, props: Value },
}

impl ComponentType {
    /// Build from a type tag and its property bag.
    pub fn new(type_name: &str, props: Value) -> Self {
        match ComponentKind::parse(type_name) {
            Some(kind) => ComponentType::Known { kind, props },
            None => ComponentType::Unknown {
                type_name: type_name.to_string(),
                props,
            },
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            ComponentType::Known { kind, .. } => kind.name(),
            ComponentType::Unknown { type_name, .. } => type_name,
        }
    }

    pub fn kind(&self) -> Option<ComponentKind> {
        match self {
            ComponentType::Known { kind, .. } => Some(*kind),
            ComponentType::Unknown { .. } => None,
        }
    }

    pub fn props(&self) -> &Value {
        match self {
            ComponentType::Known { props, .. } | ComponentType::Unknown { props, .. } => props,
        }
    }
}

impl Serialize for ComponentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.type_name(), self.props())?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for ComponentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Value::Object(map) = Value::deserialize(deserializer)? else {
            return Err(de::Error::custom("component must be an object"));
        };
        // With several keys, the first one names the type.
        let Some((type_name, props)) = map.into_iter().next() else {
            return Err(de::Error::custom("component has no type"));
        };
        Ok(ComponentType::new(&type_name, props))
    }
}

/// Component list deserializer: keeps every entry that decodes, drops the rest.
fn lenient_components<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Vec<ComponentDefinition>, D::Error> {
    let Some(Value::Array(items)) = Option::<Value>::deserialize(d)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<ComponentDefinition>(item) {
            Ok(def) if !def.id.is_empty() => Some(def),
            Ok(_) => {
                log::debug!("[A2UI message] Dropping component with empty id");
                None
            }
            Err(e) => {
                log::debug!("[A2UI message] Dropping component: {}", e);
                None
            }
        })
        .collect())
}

fn lenient_styles<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SurfaceStyles>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.and_then(|v| serde_json::from_value(v).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_first_populated_key() {
        assert_eq!(
            classify(&json!({"beginRendering": {}, "surfaceUpdate": {"components": []}})),
            Some(MessageKind::SurfaceUpdate)
        );
        assert_eq!(
            classify(&json!({"surfaceUpdate": null, "deleteSurface": {"surfaceId": "x"}})),
            Some(MessageKind::DeleteSurface)
        );
        assert_eq!(classify(&json!({"surfaceUpdate": false, "dataModelUpdate": 0})), None);
        assert_eq!(classify(&json!({"SurfaceUpdate": {}})), None);
        assert_eq!(classify(&json!([{"surfaceUpdate": {}}])), None);
    }

    #[test]
    fn test_parse_begin_rendering() {
        let record = json!({"beginRendering": {"surfaceId": "main", "root": "root-column", "styles": {"primaryColor": "#007BFF", "radius": 4}}});

        match A2uiMessage::from_record(record).unwrap() {
            A2uiMessage::BeginRendering(br) => {
                assert_eq!(br.surface_id.as_deref(), Some("main"));
                assert_eq!(br.root.as_deref(), Some("root-column"));
                let styles = br.styles.unwrap();
                assert_eq!(styles.primary_color.as_deref(), Some("#007BFF"));
                assert_eq!(styles.extra.get("radius"), Some(&json!(4)));
            }
            other => panic!("Expected BeginRendering, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_surface_update() {
        let json = r##"{"surfaceUpdate": {"surfaceId": "main", "components": [{"id": "title", "component": {"Text": {"text": {"literalString": "Hello"}, "usageHint": "h1"}}}]}}"##;

        let msg: A2uiMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.kind(), MessageKind::SurfaceUpdate);
        assert_eq!(msg.surface_id(), Some("main"));
        match msg {
            A2uiMessage::SurfaceUpdate(su) => {
                assert_eq!(su.components.len(), 1);
                assert_eq!(su.components[0].id, "title");
                assert_eq!(su.components[0].component.kind(), Some(ComponentKind::Text));
                assert_eq!(su.components[0].component.props()["usageHint"], json!("h1"));
            }
            _ => panic!("Expected SurfaceUpdate"),
        }
    }

    #[test]
    fn test_bad_components_dropped_individually() {
        let record = json!({"surfaceUpdate": {"components": [
            {"id": "ok", "component": {"Text": {}}},
            {"id": "", "component": {"Text": {}}},
            {"id": 7, "component": {"Text": {}}},
            {"id": "no-variant"},
            {"id": "empty-variant", "component": {}},
            "garbage",
            {"id": "chart", "weight": "heavy", "component": {"Chart": {"series": []}}}
        ]}});

        let A2uiMessage::SurfaceUpdate(su) = A2uiMessage::from_record(record).unwrap() else {
            panic!("Expected SurfaceUpdate");
        };
        let ids: Vec<&str> = su.components.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["ok", "chart"]);
        assert_eq!(su.surface_id, None);

        let chart = &su.components[1];
        assert_eq!(chart.weight, None);
        assert_eq!(
            chart.component,
            ComponentType::Unknown {
                type_name: "Chart".to_string(),
                props: json!({"series": []})
            }
        );
    }

    #[test]
    fn test_parse_data_model_update() {
        let record = json!({"dataModelUpdate": {"surfaceId": 3, "contents": [
            {"key": "name", "valueString": "Alice"},
            {"key": "count", "valueNumber": 42}
        ]}});

        let A2uiMessage::DataModelUpdate(dm) = A2uiMessage::from_record(record).unwrap() else {
            panic!("Expected DataModelUpdate");
        };
        assert_eq!(dm.surface_id, None);
        assert_eq!(dm.path, None);
        assert_eq!(dm.contents.map(|c| c.len()), Some(2));

        let A2uiMessage::DataModelUpdate(dm) =
            A2uiMessage::from_record(json!({"dataModelUpdate": {"path": "/user", "contents": "oops"}}))
                .unwrap()
        else {
            panic!("Expected DataModelUpdate");
        };
        assert_eq!(dm.contents, None);
    }

    #[test]
    fn test_invalid_payloads() {
        let err = A2uiMessage::from_record(json!({"deleteSurface": {}})).unwrap_err();
        assert!(matches!(
            err,
            SkipReason::InvalidPayload { kind: MessageKind::DeleteSurface, .. }
        ));

        let err = A2uiMessage::from_record(json!({"surfaceUpdate": "yes"})).unwrap_err();
        assert!(matches!(
            err,
            SkipReason::InvalidPayload { kind: MessageKind::SurfaceUpdate, .. }
        ));

        let err = A2uiMessage::from_record(json!({"hello": "world"})).unwrap_err();
        assert_eq!(err, SkipReason::Unclassified);
    }

    #[test]
    fn test_serializes_to_wire_shape() {
        let msg = A2uiMessage::SurfaceUpdate(SurfaceUpdate {
            surface_id: Some("main".to_string()),
            components: vec![ComponentDefinition::new(
                "t",
                ComponentType::new("Text", json!({"text": {"literalString": "Hi"}})),
            )],
        });
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"surfaceUpdate": {"surfaceId": "main", "components": [
                {"id": "t", "component": {"Text": {"text": {"literalString": "Hi"}}}}
            ]}})
        );
    }

    #[test]
    fn test_looks_like_protocol() {
        assert!(looks_like_protocol(
            "Sure!\n{\"beginRendering\":{\"root\":\"r\"}}\n"
        ));
        assert!(!looks_like_protocol("# Title\n\nSome *markdown* with {braces}."));
        assert!(!looks_like_protocol("{\"role\":\"assistant\"}"));
    }
}
