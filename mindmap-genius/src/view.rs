//! Terminal viewer: the receiving end of the generate→view handoff.

use mindmap_genius_core::handoff::{Handoff, HandoffChannel};
use mindmap_genius_core::tree::{MindmapStats, MindmapTree};

pub const NO_MAP_MESSAGE: &str = "No mind map data found. Generate one first.";

/// Takes whatever the channel holds and renders it; an empty channel renders the "no map" notice.
pub fn view_handoff(channel: &mut HandoffChannel) -> String {
    match channel.take() {
        Handoff::Map(tree) => render_tree(&tree),
        Handoff::NoMap => {
            tracing::warn!("Viewer opened without a mind map");
            NO_MAP_MESSAGE.to_string()
        }
    }
}

/// Title, indented outline and the stats footer.
pub fn render_tree(tree: &MindmapTree) -> String {
    let title = tree.title();
    let mut out = format!("{title}\n{}\n", "=".repeat(title.chars().count()));
    for node in tree.nodes() {
        let indent = "  ".repeat(node.level());
        let marker = match node.level() {
            0 => "●",
            1 => "◆",
            _ => "•",
        };
        out.push_str(&format!("{indent}{marker} {}\n", node.text()));
        if let Some(description) = node.description() {
            out.push_str(&format!("{indent}    {description}\n"));
        }
    }
    out.push('\n');
    out.push_str(&render_stats(&tree.stats()));
    out
}

pub fn render_stats(stats: &MindmapStats) -> String {
    format!(
        "Total nodes: {}\nMain topics: {}\nMax depth: {}\n",
        stats.total_nodes, stats.main_topics, stats.max_depth
    )
}
