//! # tree: the canonical mind map model
//!
//! A [`MindmapTree`] owns a single root [`MindmapNode`]; every node owns its children exclusively,
//! so the structure can hold no cycles or shared sub-trees. Trees are only ever built from the
//! oracle's wire shape ([`RawMindmap`]) through [`MindmapTree::from_raw`], which enforces:
//! - a non-empty title,
//! - non-empty ids, pairwise distinct across the whole tree,
//! - non-empty labels,
//! - `level == parent.level + 1` (root at 0), with `level` computed from position rather than
//!   trusted from the payload.
//!
//! The wire shape may be nested (one root with `children`) or flat (a level-tagged list in
//! emission order). Flat input is rebuilt into the nested form before anything else looks at it.
//!
//! After construction a tree is read-only, except that a layout collaborator may hand back a copy
//! with coordinates filled in ([`MindmapTree::with_positions`]).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Hard ceiling on nesting, guards the recursive builder against hostile payloads.
pub const MAX_DEPTH: usize = 100;

/// Colour tag for the root node.
pub const ROOT_COLOR: &str = "#00BFFF";
/// Colour tag for main topics (level 1).
pub const BRANCH_COLOR: &str = "#10B981";
/// Colour tag for everything deeper.
pub const LEAF_COLOR: &str = "#8B5CF6";

/// Conventional presentation colour for a node at `level`.
pub fn color_for_level(level: usize) -> &'static str {
    match level {
        0 => ROOT_COLOR,
        1 => BRANCH_COLOR,
        _ => LEAF_COLOR,
    }
}

/// Node as it arrives from the oracle (or a legacy caller). Every field is optional on the wire;
/// validation happens when converting into [`MindmapNode`].
///
/// Coordinates are deliberately absent: anything the oracle sends for `x`/`y` is dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RawNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl RawNode {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn at_level(mut self, level: usize) -> Self {
        self.level = Some(level);
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_children(mut self, children: Vec<RawNode>) -> Self {
        self.children = Some(children);
        self
    }

    fn has_children(&self) -> bool {
        self.children.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// Mind map as it arrives on the wire: `{title, nodes: [...]}` or `{title, root: {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMindmap {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<RawNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<RawNode>,
}

impl RawMindmap {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Structural violations found while building a tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("mind map title is empty")]
    EmptyTitle,
    #[error("mind map has no root node")]
    MissingRoot,
    #[error("mind map carries both a root and a node list")]
    AmbiguousShape,
    #[error("more than one root node (second root: {id:?})")]
    MultipleRoots { id: String },
    #[error("node at level {level} has an empty id")]
    MissingId { level: usize },
    #[error("node {id:?} has an empty label")]
    EmptyLabel { id: String },
    #[error("duplicate node id {id:?}")]
    DuplicateId { id: String },
    #[error("node {id:?} declares level {declared} but sits at level {expected}")]
    LevelMismatch {
        id: String,
        declared: usize,
        expected: usize,
    },
    #[error("flat node {id:?} has no level tag")]
    MissingLevel { id: String },
    #[error("flat node {id:?} at level {level} has no open parent at level {}", .level.saturating_sub(1))]
    Orphan { id: String, level: usize },
    #[error("flat node {id:?} also nests children")]
    MixedShape { id: String },
    #[error("mind map deeper than {} levels", MAX_DEPTH)]
    TooDeep,
}

/// One validated node. Fields are read through accessors; `level` is derived from the node's
/// position and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MindmapNode {
    id: String,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    level: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<MindmapNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
}

impl MindmapNode {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn children(&self) -> &[MindmapNode] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Layout coordinates, present only once a layout collaborator has placed the node.
    pub fn position(&self) -> Option<(f64, f64)> {
        self.x.zip(self.y)
    }
}

/// Figures shown next to a rendered map, always computed by traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MindmapStats {
    pub total_nodes: usize,
    pub main_topics: usize,
    pub max_depth: usize,
}

/// Validated, immutable mind map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MindmapTree {
    title: String,
    root: MindmapNode,
}

impl MindmapTree {
    /// Builds the canonical tree from a wire payload, rebuilding flat lists first.
    pub fn from_raw(raw: RawMindmap) -> Result<Self, TreeError> {
        let title = raw.title.trim();
        if title.is_empty() {
            return Err(TreeError::EmptyTitle);
        }

        let root = match (raw.root, raw.nodes.len()) {
            (Some(root), 0) => root,
            (Some(_), _) => return Err(TreeError::AmbiguousShape),
            (None, 0) => return Err(TreeError::MissingRoot),
            (None, 1) => raw
                .nodes
                .into_iter()
                .next()
                .ok_or(TreeError::MissingRoot)?,
            (None, _) => nest_flat(raw.nodes)?,
        };

        let mut seen = HashSet::new();
        let root = build_node(root, 0, &mut seen)?;
        Ok(Self {
            title: title.to_string(),
            root,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn root(&self) -> &MindmapNode {
        &self.root
    }

    /// Pre-order traversal: each parent before its children, siblings in display order.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes {
            stack: vec![&self.root],
        }
    }

    pub fn find(&self, id: &str) -> Option<&MindmapNode> {
        self.nodes().find(|n| n.id == id)
    }

    pub fn stats(&self) -> MindmapStats {
        self.nodes().fold(
            MindmapStats {
                total_nodes: 0,
                main_topics: 0,
                max_depth: 0,
            },
            |mut acc, node| {
                acc.total_nodes += 1;
                if node.level == 1 {
                    acc.main_topics += 1;
                }
                acc.max_depth = acc.max_depth.max(node.level);
                acc
            },
        )
    }

    /// Flattens by traversal into level-tagged wire nodes (no nested children), the shape
    /// legacy callers expect. Feeding the result back through [`MindmapTree::from_raw`] rebuilds
    /// the same tree.
    pub fn to_flat(&self) -> Vec<RawNode> {
        self.nodes()
            .map(|n| RawNode {
                id: n.id.clone(),
                text: n.text.clone(),
                description: n.description.clone(),
                level: Some(n.level),
                children: None,
                color: n.color.clone(),
            })
            .collect()
    }

    /// Returns a copy placed by a layout collaborator. `place` sees every node once, in
    /// pre-order; nodes it returns `None` for keep their current coordinates.
    pub fn with_positions<F>(mut self, mut place: F) -> Self
    where
        F: FnMut(&MindmapNode) -> Option<(f64, f64)>,
    {
        fn visit<F>(node: &mut MindmapNode, place: &mut F)
        where
            F: FnMut(&MindmapNode) -> Option<(f64, f64)>,
        {
            if let Some((x, y)) = place(node) {
                node.x = Some(x);
                node.y = Some(y);
            }
            for child in &mut node.children {
                visit(child, place);
            }
        }

        visit(&mut self.root, &mut place);
        self
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Iterator returned by [`MindmapTree::nodes`].
pub struct Nodes<'a> {
    stack: Vec<&'a MindmapNode>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a MindmapNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Rebuilds a flat, level-tagged list into one nested root.
///
/// Nodes are walked in emission order while a stack holds the currently open path from the root.
/// A node at level `L` closes every open node at `L` or deeper, then must land directly under an
/// open node at `L - 1`; anything else is an orphan. This keeps pre-order traversal of the
/// result identical to the input order.
fn nest_flat(nodes: Vec<RawNode>) -> Result<RawNode, TreeError> {
    let mut open: Vec<(usize, RawNode)> = Vec::new();
    let mut root: Option<RawNode> = None;

    for node in nodes {
        let level = node.level.ok_or_else(|| TreeError::MissingLevel {
            id: node.id.clone(),
        })?;
        // Refuse before nesting: a chain deeper than the cap must never be built.
        if level > MAX_DEPTH {
            return Err(TreeError::TooDeep);
        }
        if node.has_children() {
            return Err(TreeError::MixedShape { id: node.id });
        }

        while open.last().is_some_and(|(open_level, _)| *open_level >= level) {
            close_top(&mut open, &mut root);
        }

        match open.last() {
            None if level == 0 && root.is_none() => {}
            None if level == 0 => return Err(TreeError::MultipleRoots { id: node.id }),
            Some((parent_level, _)) if parent_level + 1 == level => {}
            _ => return Err(TreeError::Orphan { id: node.id, level }),
        }
        open.push((level, node));
    }

    while !open.is_empty() {
        close_top(&mut open, &mut root);
    }
    root.ok_or(TreeError::MissingRoot)
}

fn close_top(open: &mut Vec<(usize, RawNode)>, root: &mut Option<RawNode>) {
    let Some((_, node)) = open.pop() else {
        return;
    };
    match open.last_mut() {
        Some((_, parent)) => parent.children.get_or_insert_with(Vec::new).push(node),
        None => *root = Some(node),
    }
}

fn build_node(
    raw: RawNode,
    level: usize,
    seen: &mut HashSet<String>,
) -> Result<MindmapNode, TreeError> {
    if level > MAX_DEPTH {
        return Err(TreeError::TooDeep);
    }
    if raw.id.trim().is_empty() {
        return Err(TreeError::MissingId { level });
    }
    let text = raw.text.trim();
    if text.is_empty() {
        return Err(TreeError::EmptyLabel { id: raw.id });
    }
    if let Some(declared) = raw.level {
        if declared != level {
            return Err(TreeError::LevelMismatch {
                id: raw.id,
                declared,
                expected: level,
            });
        }
    }
    if !seen.insert(raw.id.clone()) {
        return Err(TreeError::DuplicateId { id: raw.id });
    }

    let children = raw
        .children
        .unwrap_or_default()
        .into_iter()
        .map(|child| build_node(child, level + 1, seen))
        .collect::<Result<Vec<_>, _>>()?;

    let color = raw
        .color
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| color_for_level(level).to_string());

    Ok(MindmapNode {
        text: text.to_string(),
        id: raw.id,
        description: raw.description.filter(|d| !d.trim().is_empty()),
        level,
        children,
        x: None,
        y: None,
        color: Some(color),
    })
}
