use mindmap_genius::export::{outline_lines, render_pdf, PdfExporter, LINES_PER_PAGE};
use mindmap_genius::view::{render_tree, view_handoff, NO_MAP_MESSAGE};
use mindmap_genius_core::contract::DocumentExporter;
use mindmap_genius_core::handoff::HandoffChannel;
use mindmap_genius_core::tree::{MindmapTree, RawMindmap, RawNode};

fn tree() -> MindmapTree {
    MindmapTree::from_raw(RawMindmap {
        title: "Rust".into(),
        nodes: vec![
            RawNode::new("r", "Rust").at_level(0),
            RawNode::new("own", "Ownership")
                .at_level(1)
                .described("Each value has one owner"),
            RawNode::new("borrow", "Borrowing").at_level(2),
            RawNode::new("traits", "Traits").at_level(1),
        ],
        root: None,
    })
    .unwrap()
}

#[test]
fn viewer_renders_outline_then_stats() {
    let rendered = render_tree(&tree());
    let own = rendered.find("Ownership").unwrap();
    let borrow = rendered.find("Borrowing").unwrap();
    let traits = rendered.find("Traits").unwrap();
    assert!(own < borrow && borrow < traits, "pre-order expected:\n{rendered}");
    assert!(rendered.contains("Each value has one owner"));
    assert!(rendered.contains("Total nodes: 4"));
    assert!(rendered.contains("Main topics: 2"));
    assert!(rendered.contains("Max depth: 2"));
}

#[test]
fn viewer_output_is_exact() {
    let expected = "Rust\n\
                    ====\n\
                    ● Rust\n  \
                    ◆ Ownership\n      \
                    Each value has one owner\n    \
                    • Borrowing\n  \
                    ◆ Traits\n\
                    \n\
                    Total nodes: 4\n\
                    Main topics: 2\n\
                    Max depth: 2\n";
    assert_eq!(render_tree(&tree()), expected);
}

#[test]
fn viewer_consumes_the_handoff_once() {
    let mut channel = HandoffChannel::new();
    channel.put(tree());
    assert!(view_handoff(&mut channel).starts_with("Rust"));
    assert_eq!(view_handoff(&mut channel), NO_MAP_MESSAGE);
}

#[test]
fn outline_has_title_and_one_line_per_node_plus_descriptions() {
    let lines = outline_lines(&tree());
    assert_eq!(lines.len(), 1 + 4 + 1);
    assert!(lines[0].heading);
    assert_eq!(lines[0].text, "Rust");
    assert_eq!(lines[2].text, "    - Ownership");
    assert_eq!(lines[4].text, "        - Borrowing");
}

#[test]
fn large_maps_span_several_pages() {
    let topics: Vec<RawNode> = (0..LINES_PER_PAGE * 2)
        .map(|i| RawNode::new(format!("t{i}"), format!("Topic {i}")))
        .collect();
    let big = MindmapTree::from_raw(RawMindmap {
        title: "Big".into(),
        nodes: Vec::new(),
        root: Some(RawNode::new("root", "Big").with_children(topics)),
    })
    .unwrap();
    let bytes = render_pdf(&big);
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn exporter_writes_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rust.pdf");
    let exporter = PdfExporter::new(&path);
    exporter.export(&tree()).await.expect("export should succeed");
    assert_eq!(exporter.path(), path.as_path());
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}

#[tokio::test]
async fn exporter_reports_unwritable_destination() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = PdfExporter::new(dir.path().join("missing").join("rust.pdf"));
    let err = exporter.export(&tree()).await.unwrap_err();
    assert!(err.to_string().contains("failed to write"));
}
