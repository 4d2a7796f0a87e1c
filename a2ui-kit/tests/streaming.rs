use a2ui_kit::a2ui::*;
use futures::StreamExt;
use futures::executor::block_on;
use futures::stream;
use serde_json::{Value, json};

const RESPONSE: &str = concat!(
    "Here is your form:\n",
    r#"{"surfaceUpdate":{"surfaceId":"main","components":[{"id":"root","component":{"Column":{"children":{"explicitList":["title","items"]}}}},{"id":"title","component":{"Text":{"text":{"path":"/title"},"usageHint":"h1"}}}]}}"#,
    "\n",
    r#"{"surfaceUpdate":{"surfaceId":"main","components":[{"id":"items","component":{"List":{"children":{"template":{"componentId":"row","dataBinding":"/items"}}}}},{"id":"row","component":{"Text":{"text":{"path":"name"}}}}]}}"#,
    "\n",
    r#"{"dataModelUpdate":{"surfaceId":"main","contents":[{"key":"title","valueString":"Shop {\"best\"} deals }"},{"key":"items","valueMap":[{"key":"a","valueMap":[{"key":"name","valueString":"Apple"}]},{"key":"b","valueMap":[{"key":"name","valueString":"Pear"}]}]}]}}"#,
    "\n",
    r#"{"beginRendering":{"surfaceId":"main","root":"root"}}"#,
    "\n",
    "Done!\n",
);

fn run_chunked(text: &str, chunk_size: usize) -> A2uiSession {
    let mut session = A2uiSession::new(InputFormat::Framed);
    for chunk in text.as_bytes().chunks(chunk_size) {
        session.push_chunk(std::str::from_utf8(chunk).unwrap());
    }
    session.finish();
    session
}

fn as_sse(text: &str) -> String {
    text.lines()
        .filter(|line| line.starts_with('{'))
        .map(|line| format!("data: {}\n\n", line))
        .chain(std::iter::once("data: [DONE]\n\n".to_string()))
        .collect()
}

fn text_of(node: &RenderNode) -> Option<&str> {
    node.prop("text").and_then(Value::as_str)
}

#[test]
fn test_full_response_tree() {
    let mut session = run_chunked(RESPONSE, RESPONSE.len());
    let tree = session.render("main").unwrap();

    assert_eq!(tree.type_tag, "Column");
    let children = tree.child_nodes();
    assert_eq!(children.len(), 2);
    assert_eq!(text_of(children[0]), Some("Shop {\"best\"} deals }"));
    assert_eq!(children[0].prop("usageHint"), Some(&json!("h1")));

    let rows: Vec<Option<&str>> = children[1].child_nodes().into_iter().map(text_of).collect();
    assert_eq!(rows, vec![Some("Apple"), Some("Pear")]);

    assert!(matches!(
        &session.take_skipped()[..],
        [SkipReason::StrayText { len: 18 }, SkipReason::StrayText { len: 5 }]
    ));
}

#[test]
fn test_chunk_split_invariance() {
    let reference = run_chunked(RESPONSE, RESPONSE.len()).render("main");
    assert!(reference.is_some());

    for chunk_size in [1, 2, 3, 5, 7, 13, 64] {
        let session = run_chunked(RESPONSE, chunk_size);
        assert_eq!(session.render("main"), reference, "chunk size {}", chunk_size);
    }

    let sse = as_sse(RESPONSE);
    for chunk_size in [1, 4, 9, 100, sse.len()] {
        let session = run_chunked(&sse, chunk_size);
        assert!(session.is_done());
        assert_eq!(session.render("main"), reference, "sse chunk size {}", chunk_size);
    }
}

#[test]
fn test_async_stream_matches_sync() {
    let reference = run_chunked(RESPONSE, RESPONSE.len()).render("main");

    let chunks: Vec<String> = RESPONSE
        .as_bytes()
        .chunks(11)
        .map(|chunk| String::from_utf8(chunk.to_vec()).unwrap())
        .collect();
    let mut session = A2uiSession::new(InputFormat::Framed);
    let events: Vec<SurfaceEvent> =
        block_on(session_events(&mut session, stream::iter(chunks)).collect());

    assert_eq!(
        events.first(),
        Some(&SurfaceEvent::Created {
            surface_id: "main".to_string()
        })
    );
    assert_eq!(
        events.last(),
        Some(&SurfaceEvent::Ready {
            surface_id: "main".to_string(),
            root: Some("root".to_string())
        })
    );
    assert_eq!(session.render("main"), reference);
}

#[test]
fn test_upsert_by_id() {
    let mut manager = SurfaceManager::new();
    manager.process_content(concat!(
        r#"{"surfaceUpdate":{"components":[{"id":"t","component":{"Text":{"text":{"literalString":"one"}}}}]}}"#,
        "\n",
        r#"{"surfaceUpdate":{"components":[{"id":"u","component":{"Divider":{}}},{"id":"t","component":{"Text":{"text":{"literalString":"two"}}}}]}}"#,
    ));

    let surface = manager.default_surface().unwrap();
    assert_eq!(surface.component_count(), 2);
    let ids: Vec<&str> = surface.components().map(|def| def.id.as_str()).collect();
    assert_eq!(ids, vec!["t", "u"]);

    let text = surface.render_tree().unwrap().find("t").cloned().unwrap();
    assert_eq!(text_of(&text), Some("two"));
}

#[test]
fn test_path_scoped_merge() {
    let mut manager = SurfaceManager::new();
    manager.process_content(concat!(
        r#"{"dataModelUpdate":{"path":"/a/b","contents":[{"key":"x","valueNumber":1}]}}"#,
        "\n",
        r#"{"dataModelUpdate":{"path":"/a/c","contents":[{"key":"y","valueNumber":2}]}}"#,
        "\n",
        r#"{"dataModelUpdate":{"contents":[{"key":"z","valueBoolean":true}]}}"#,
    ));

    let model = manager.default_surface().unwrap().data_model();
    assert_eq!(
        model.as_value(),
        &json!({"a": {"b": {"x": 1}, "c": {"y": 2}}, "z": true})
    );
}

#[test]
fn test_cycle_terminates() {
    let mut manager = SurfaceManager::new();
    manager.process_content(concat!(
        r#"{"surfaceUpdate":{"components":[{"id":"a","component":{"Card":{"child":"b"}}},{"id":"b","component":{"Card":{"child":"a"}}}]}}"#,
        "\n",
        r#"{"beginRendering":{"root":"a"}}"#,
    ));

    let tree = manager.default_surface().unwrap().render_tree().unwrap();
    assert_eq!(tree.id.as_deref(), Some("a"));
    let b = tree.child_nodes()[0];
    assert_eq!(b.id.as_deref(), Some("b"));
    assert_eq!(b.children, RenderChildren::None);
    assert_eq!(tree.node_count(), 2);
}

#[test]
fn test_implicit_roots() {
    let mut manager = SurfaceManager::new();
    manager.process_content(
        r#"{"surfaceUpdate":{"components":[{"id":"col","component":{"Column":{"children":["x"]}}},{"id":"x","component":{"Text":{}}},{"id":"y","component":{"Icon":{}}}]}}"#,
    );

    let tree = manager.default_surface().unwrap().render_tree().unwrap();
    assert_eq!(tree.kind, NodeKind::Group);
    let roots: Vec<Option<&str>> = tree.child_nodes().iter().map(|n| n.id.as_deref()).collect();
    assert_eq!(roots, vec![Some("col"), Some("y")]);
}

#[test]
fn test_bound_values() {
    let mut manager = SurfaceManager::new();
    manager.process_content(
        r#"{"dataModelUpdate":{"contents":[{"key":"title","valueString":"Hello"}]}}"#,
    );
    let surface = manager.default_surface().unwrap();

    assert_eq!(surface.resolve(&json!({"path": "/title"})), Some(json!("Hello")));
    assert_eq!(surface.resolve(&json!({"literalNumber": 42})), Some(json!(42)));
    assert_eq!(surface.resolve(&json!({"path": "/missing"})), None);
}

#[test]
fn test_end_to_end_text() {
    let stream = concat!(
        r#"{"surfaceUpdate":{"components":[{"id":"root","component":{"Text":{"text":{"literalString":"Hi"},"usageHint":"h1"}}}]}}"#,
        "\n",
        r#"{"beginRendering":{"root":"root"}}"#,
        "\n",
    );
    let session = run_chunked(stream, 3);
    let tree = session.render_default().unwrap();

    assert_eq!(tree.kind, NodeKind::Component);
    assert_eq!(tree.type_tag, "Text");
    assert_eq!(Value::Object(tree.props.clone()), json!({"text": "Hi", "usageHint": "h1"}));
    assert_eq!(tree.children, RenderChildren::None);
    assert_eq!(tree.node_count(), 1);
}

#[test]
fn test_delete_then_recreate() {
    let mut manager = SurfaceManager::new();
    let events = manager.process_content(concat!(
        r#"{"beginRendering":{"surfaceId":"s"}}"#,
        "\n",
        r#"{"deleteSurface":{"surfaceId":"s"}}"#,
        "\n",
        r#"{"surfaceUpdate":{"surfaceId":"s","components":[]}}"#,
    ));

    assert_eq!(events.iter().filter(|e| matches!(e, SurfaceEvent::Created { .. })).count(), 2);
    let surface = manager.get_surface("s").unwrap();
    assert!(!surface.is_ready());
}
