//! Plain-text rendering of resolved trees and surface events.
//!
//! Each component kind gets a one-line describer registered in a
//! [`Catalog`]; the outline walks the tree and indents children.

use a2ui_kit::a2ui::{
    Catalog, ComponentKind, NodeKind, RenderChildren, RenderNode, SurfaceEvent,
};
use serde_json::Value;

pub type Describe = fn(&RenderNode) -> String;

const INDENT: &str = "  ";

/// Catalog with a describer for every known component kind.
pub fn text_catalog() -> Catalog<Describe> {
    let mut catalog: Catalog<Describe> = Catalog::new();
    for kind in ComponentKind::all() {
        let describe: Describe = match kind {
            ComponentKind::Text => describe_text,
            ComponentKind::Image => describe_image,
            ComponentKind::Icon => describe_icon,
            ComponentKind::Button => describe_button,
            ComponentKind::TextField => describe_text_field,
            ComponentKind::CheckBox => describe_check_box,
            ComponentKind::Slider => describe_slider,
            ComponentKind::MultipleChoice => describe_multiple_choice,
            _ => describe_plain,
        };
        catalog.register_kind(*kind, describe);
    }
    catalog
}

/// Render `node` and its descendants, one line per node.
pub fn render_outline(node: &RenderNode, catalog: &Catalog<Describe>) -> String {
    let mut out = String::new();
    write_node(node, catalog, 0, &mut out);
    out
}

fn write_node(node: &RenderNode, catalog: &Catalog<Describe>, depth: usize, out: &mut String) {
    let label = match node.kind {
        NodeKind::Group => "(surface)".to_string(),
        NodeKind::UnknownType => format!("[unknown component: {}]", node.type_tag),
        NodeKind::Error => format!(
            "[error: {}]",
            node.error.as_deref().unwrap_or("unresolvable component")
        ),
        NodeKind::Component => match catalog.get(&node.type_tag) {
            Some(describe) => describe(node),
            None => node.type_tag.clone(),
        },
    };

    out.push_str(&INDENT.repeat(depth));
    out.push_str(&label);
    if let Some(id) = &node.id {
        out.push_str(&format!("  #{}", id));
    }
    out.push('\n');

    match &node.children {
        RenderChildren::None => {}
        RenderChildren::Single(child) => write_node(child, catalog, depth + 1, out),
        RenderChildren::List(children) => {
            for child in children {
                match child {
                    Some(child) => write_node(child, catalog, depth + 1, out),
                    None => {
                        out.push_str(&INDENT.repeat(depth + 1));
                        out.push_str("(missing)\n");
                    }
                }
            }
        }
    }
}

/// One line per surface event, for `--watch`.
pub fn describe_event(event: &SurfaceEvent) -> String {
    match event {
        SurfaceEvent::Created { surface_id } => format!("[{}] created", surface_id),
        SurfaceEvent::ComponentsUpdated { surface_id, ids } => {
            format!("[{}] components: {}", surface_id, ids.join(", "))
        }
        SurfaceEvent::DataModelUpdated { surface_id, path } => {
            format!("[{}] data model updated at {}", surface_id, path)
        }
        SurfaceEvent::Ready { surface_id, root } => match root {
            Some(root) => format!("[{}] ready, root {}", surface_id, root),
            None => format!("[{}] ready", surface_id),
        },
        SurfaceEvent::Deleted { surface_id } => format!("[{}] deleted", surface_id),
    }
}

fn text_prop(node: &RenderNode, key: &str) -> Option<String> {
    match node.prop(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn describe_plain(node: &RenderNode) -> String {
    node.type_tag.clone()
}

fn describe_text(node: &RenderNode) -> String {
    let text = text_prop(node, "text").unwrap_or_default();
    match text_prop(node, "usageHint") {
        Some(hint) => format!("Text {:?} ({})", text, hint),
        None => format!("Text {:?}", text),
    }
}

fn describe_image(node: &RenderNode) -> String {
    format!("Image <{}>", text_prop(node, "url").unwrap_or_default())
}

fn describe_icon(node: &RenderNode) -> String {
    format!("Icon {}", text_prop(node, "name").unwrap_or_default())
}

fn describe_button(node: &RenderNode) -> String {
    match &node.action {
        Some(action) if action.context.is_empty() => format!("Button -> {}", action.name),
        Some(action) => format!("Button -> {} {}", action.name, Value::Object(action.context.clone())),
        None => "Button".to_string(),
    }
}

fn describe_text_field(node: &RenderNode) -> String {
    let label = text_prop(node, "label").unwrap_or_default();
    format!("TextField {}: {:?}", label, text_prop(node, "text").unwrap_or_default())
}

fn describe_check_box(node: &RenderNode) -> String {
    let checked = node.prop("value").and_then(Value::as_bool).unwrap_or(false);
    let label = text_prop(node, "label").unwrap_or_default();
    format!("[{}] {}", if checked { "x" } else { " " }, label)
}

fn describe_slider(node: &RenderNode) -> String {
    let value = text_prop(node, "value").unwrap_or_else(|| "?".to_string());
    match (text_prop(node, "min"), text_prop(node, "max")) {
        (Some(min), Some(max)) => format!("Slider {} ({}..{})", value, min, max),
        _ => format!("Slider {}", value),
    }
}

fn describe_multiple_choice(node: &RenderNode) -> String {
    let options: Vec<String> = node
        .prop("options")
        .and_then(Value::as_array)
        .map(|options| {
            options
                .iter()
                .filter_map(|option| match option.get("label") {
                    Some(Value::String(label)) => Some(label.clone()),
                    Some(Value::Object(bound)) => bound
                        .get("literalString")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    _ => option.get("value").and_then(Value::as_str).map(str::to_string),
                })
                .collect()
        })
        .unwrap_or_default();
    format!("MultipleChoice [{}]", options.join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use a2ui_kit::a2ui::SurfaceManager;

    fn render(text: &str) -> String {
        let mut manager = SurfaceManager::new();
        manager.process_content(text);
        let tree = manager.default_surface().unwrap().render_tree().unwrap();
        render_outline(&tree, &text_catalog())
    }

    #[test]
    fn test_catalog_covers_every_kind() {
        assert!(text_catalog().missing_kinds().is_empty());
    }

    #[test]
    fn test_outline_indents_children() {
        let outline = render(concat!(
            "{\"surfaceUpdate\":{\"components\":[",
            "{\"id\":\"root\",\"component\":{\"Column\":{\"children\":{\"explicitList\":[\"title\",\"ghost\",\"ok\"]}}}},",
            "{\"id\":\"title\",\"component\":{\"Text\":{\"text\":{\"literalString\":\"Hi\"},\"usageHint\":\"h1\"}}},",
            "{\"id\":\"ok\",\"component\":{\"Button\":{\"child\":\"ok-label\",\"action\":{\"name\":\"confirm\"}}}},",
            "{\"id\":\"ok-label\",\"component\":{\"Text\":{\"text\":{\"literalString\":\"OK\"}}}}",
            "]}}\n",
            "{\"beginRendering\":{\"root\":\"root\"}}\n",
        ));

        assert_eq!(
            outline,
            concat!(
                "Column  #root\n",
                "  Text \"Hi\" (h1)  #title\n",
                "  (missing)\n",
                "  Button -> confirm  #ok\n",
                "    Text \"OK\"  #ok-label\n",
            )
        );
    }

    #[test]
    fn test_outline_placeholders() {
        let outline = render(concat!(
            "{\"surfaceUpdate\":{\"components\":[",
            "{\"id\":\"a\",\"component\":{\"Chart\":{}}},",
            "{\"id\":\"b\",\"component\":{\"CheckBox\":{\"value\":{\"path\":\"/agree\"},\"label\":{\"literalString\":\"Agree\"}}}}",
            "]}}\n",
            "{\"dataModelUpdate\":{\"contents\":[{\"key\":\"agree\",\"valueBoolean\":true}]}}\n",
        ));

        assert_eq!(
            outline,
            concat!(
                "(surface)\n",
                "  [unknown component: Chart]  #a\n",
                "  [x] Agree  #b\n",
            )
        );
    }

    #[test]
    fn test_describe_event() {
        let event = SurfaceEvent::ComponentsUpdated {
            surface_id: "main".to_string(),
            ids: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(describe_event(&event), "[main] components: a, b");
        assert_eq!(
            describe_event(&SurfaceEvent::Ready {
                surface_id: "main".to_string(),
                root: None
            }),
            "[main] ready"
        );
    }
}
