use mindmap_genius::oracle::{decode_response, GeminiOracle};
use mindmap_genius_core::config::OracleConfig;
use mindmap_genius_core::tree::MindmapTree;
use serde_json::json;

fn body_with_text(text: &str) -> String {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": text }]
            },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

const MAP: &str = r##"{
  "title": "Photosynthesis",
  "nodes": [
    {"id": "root", "text": "Photosynthesis", "level": 0, "x": 400, "y": 300, "color": "#00BFFF"},
    {"id": "light", "text": "Light reactions", "level": 1},
    {"id": "atp", "text": "ATP synthesis", "description": "Energy carrier", "level": 2},
    {"id": "calvin", "text": "Calvin cycle", "level": 1}
  ]
}"##;

#[test]
fn decodes_flat_map_from_first_candidate() {
    let raw = decode_response(&body_with_text(MAP)).expect("should decode");
    assert_eq!(raw.title, "Photosynthesis");
    assert_eq!(raw.nodes.len(), 4);

    let tree = MindmapTree::from_raw(raw).expect("valid tree");
    assert_eq!(tree.stats().main_topics, 2);
    assert_eq!(tree.find("atp").unwrap().description(), Some("Energy carrier"));
}

#[test]
fn tolerates_markdown_code_fence() {
    let fenced = format!("```json\n{MAP}\n```");
    let raw = decode_response(&body_with_text(&fenced)).expect("fenced JSON should decode");
    assert_eq!(raw.nodes[0].id, "root");
}

#[test]
fn empty_candidates_is_an_error() {
    let err = decode_response(r#"{"candidates": []}"#).unwrap_err();
    assert!(err.to_string().contains("no mind map"));
}

#[test]
fn non_json_answer_is_an_error() {
    let err = decode_response(&body_with_text("Sorry, I cannot help with that.")).unwrap_err();
    assert!(err.to_string().contains("invalid mind map JSON"), "got: {err}");
}

#[test]
fn unreadable_body_is_an_error() {
    let err = decode_response("<html>502</html>").unwrap_err();
    assert!(err.to_string().contains("unreadable response"));
}

#[test]
fn client_builds_from_default_config() {
    assert!(GeminiOracle::new(&OracleConfig::default()).is_ok());
}
