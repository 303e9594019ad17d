//! Single-slot transfer of a finished map from the generation flow to the viewing flow.
//!
//! One channel is created per generate→view transition and owned by whoever drives it; there is
//! no global slot. `take` delivers a tree at most once.

use tracing::debug;

use crate::tree::MindmapTree;

/// Result of reading the channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Handoff {
    Map(MindmapTree),
    NoMap,
}

impl Handoff {
    pub fn into_tree(self) -> Option<MindmapTree> {
        match self {
            Self::Map(tree) => Some(tree),
            Self::NoMap => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoMap)
    }
}

#[derive(Debug, Default)]
pub struct HandoffChannel {
    slot: Option<MindmapTree>,
}

impl HandoffChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `tree` for the next read. An unread tree is replaced (last write wins).
    pub fn put(&mut self, tree: MindmapTree) {
        if let Some(previous) = self.slot.replace(tree) {
            debug!(replaced = %previous.title(), "Handoff slot overwritten before it was read");
        }
    }

    /// Consumes the stored tree; [`Handoff::NoMap`] when nothing is waiting.
    pub fn take(&mut self) -> Handoff {
        match self.slot.take() {
            Some(tree) => Handoff::Map(tree),
            None => Handoff::NoMap,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }
}
