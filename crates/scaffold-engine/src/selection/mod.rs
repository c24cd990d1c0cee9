//! Client-side selection tracking for the live preview
//!
//! [`SelectionTracker`] is a sans-IO state machine: callers feed it user
//! actions and fetch results together with the current instant, and poll it
//! for fetches that are due. [`session::PreviewSession`] drives it on tokio.
//!
//! Each fetch carries a sequence number. Only the most recently issued fetch
//! of each kind is accepted; anything older, or anything issued before a
//! superseding user action, is discarded on arrival.

pub mod session;

use crate::preview::PreviewedFile;
use crate::tree::{files_named, find_by_path, TreeNode};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Quiet periods before a fetch is issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceSettings {
    pub tree: Duration,
    pub preview: Duration,
}

impl Default for DebounceSettings {
    fn default() -> Self {
        Self {
            tree: Duration::from_millis(300),
            preview: Duration::from_millis(200),
        }
    }
}

/// The file currently selected in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub path: String,
    pub is_directory: bool,
}

impl SelectedFile {
    fn from_node(node: &TreeNode) -> Self {
        Self {
            name: node.name.clone(),
            path: node.path.clone(),
            is_directory: node.is_directory,
        }
    }
}

/// A fetch the driver should perform now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Tree { seq: u64 },
    Preview { seq: u64, path: String },
}

/// State changes resulting from a delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    TreeReplaced,
    /// The selection survived a tree change, possibly under a new path
    SelectionKept { path: String },
    SelectionMoved { from: String, to: String },
    SelectionCleared { previous: String },
    ContentShown { path: String },
    ContentCleared,
    /// A response arrived for a fetch that is no longer current
    Discarded { seq: u64 },
}

#[derive(Debug)]
pub struct SelectionTracker {
    debounce: DebounceSettings,
    tree: Vec<TreeNode>,
    selection: Option<SelectedFile>,
    content: Option<PreviewedFile>,
    tree_due: Option<Instant>,
    preview_due: Option<Instant>,
    awaiting_tree: Option<u64>,
    awaiting_preview: Option<u64>,
    last_seq: u64,
}

impl SelectionTracker {
    pub fn new(debounce: DebounceSettings) -> Self {
        Self {
            debounce,
            tree: Vec::new(),
            selection: None,
            content: None,
            tree_due: None,
            preview_due: None,
            awaiting_tree: None,
            awaiting_preview: None,
            last_seq: 0,
        }
    }

    pub fn tree(&self) -> &[TreeNode] {
        &self.tree
    }

    pub fn selection(&self) -> Option<&SelectedFile> {
        self.selection.as_ref()
    }

    pub fn content(&self) -> Option<&PreviewedFile> {
        self.content.as_ref()
    }

    /// Select a node. Directories are ignored; returns whether the selection changed.
    pub fn select(&mut self, node: &TreeNode, now: Instant) -> bool {
        if node.is_directory {
            return false;
        }
        self.selection = Some(SelectedFile::from_node(node));
        self.awaiting_preview = None;
        self.preview_due = Some(now + self.debounce.preview);
        true
    }

    /// The configuration was edited; restart the tree debounce.
    ///
    /// A pending preview is dropped: the selected path may not exist under
    /// the new configuration, so the next tree delivery reschedules it.
    pub fn config_changed(&mut self, now: Instant) {
        self.awaiting_tree = None;
        self.awaiting_preview = None;
        self.preview_due = None;
        self.tree_due = Some(now + self.debounce.tree);
    }

    /// Earliest instant at which `poll` will issue a fetch
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.tree_due, self.preview_due) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.last_seq += 1;
        self.last_seq
    }

    /// Fetches whose debounce window has elapsed at `now`
    pub fn poll(&mut self, now: Instant) -> Vec<FetchRequest> {
        let mut requests = Vec::new();
        if self.tree_due.is_some_and(|due| due <= now) {
            self.tree_due = None;
            let seq = self.next_seq();
            self.awaiting_tree = Some(seq);
            requests.push(FetchRequest::Tree { seq });
        }
        if self.preview_due.is_some_and(|due| due <= now) {
            self.preview_due = None;
            if let Some(path) = self.selection.as_ref().map(|s| s.path.clone()) {
                let seq = self.next_seq();
                self.awaiting_preview = Some(seq);
                requests.push(FetchRequest::Preview { seq, path });
            }
        }
        requests
    }

    /// Apply a delivered tree, re-resolving the selection against it
    pub fn tree_delivered(&mut self, seq: u64, tree: Vec<TreeNode>, now: Instant) -> Vec<TrackerEvent> {
        if self.awaiting_tree != Some(seq) {
            debug!(seq, "Discarding stale tree response");
            return vec![TrackerEvent::Discarded { seq }];
        }
        self.awaiting_tree = None;
        self.tree = tree;
        let mut events = vec![TrackerEvent::TreeReplaced];

        let Some(previous) = self.selection.take() else {
            return events;
        };

        match self.resolve(&previous) {
            Some(resolved) => {
                if resolved.path == previous.path {
                    events.push(TrackerEvent::SelectionKept {
                        path: resolved.path.clone(),
                    });
                } else {
                    events.push(TrackerEvent::SelectionMoved {
                        from: previous.path,
                        to: resolved.path.clone(),
                    });
                }
                self.selection = Some(resolved);
                self.awaiting_preview = None;
                self.preview_due = Some(now + self.debounce.preview);
            }
            None => {
                self.awaiting_preview = None;
                self.preview_due = None;
                events.push(TrackerEvent::SelectionCleared {
                    previous: previous.path,
                });
                if self.content.take().is_some() {
                    events.push(TrackerEvent::ContentCleared);
                }
            }
        }
        events
    }

    /// Exact path of the same kind first, then a unique file with the same name
    fn resolve(&self, previous: &SelectedFile) -> Option<SelectedFile> {
        if let Some(node) = find_by_path(&self.tree, &previous.path)
            .filter(|n| n.is_directory == previous.is_directory)
        {
            return Some(SelectedFile::from_node(node));
        }
        match files_named(&self.tree, &previous.name).as_slice() {
            [only] => Some(SelectedFile::from_node(only)),
            _ => None,
        }
    }

    /// Apply a delivered preview. `None` means the file is no longer planned.
    pub fn preview_delivered(&mut self, seq: u64, file: Option<PreviewedFile>) -> Vec<TrackerEvent> {
        if self.awaiting_preview != Some(seq) || self.selection.is_none() {
            debug!(seq, "Discarding stale preview response");
            return vec![TrackerEvent::Discarded { seq }];
        }
        self.awaiting_preview = None;
        match file {
            Some(file) => {
                let path = file.output_path.clone();
                self.content = Some(file);
                vec![TrackerEvent::ContentShown { path }]
            }
            None => {
                self.content = None;
                vec![TrackerEvent::ContentCleared]
            }
        }
    }

    /// A fetch failed. Returns false when the failure belongs to a superseded fetch.
    pub fn fetch_failed(&mut self, seq: u64) -> bool {
        if self.awaiting_tree == Some(seq) {
            self.awaiting_tree = None;
            true
        } else if self.awaiting_preview == Some(seq) {
            self.awaiting_preview = None;
            true
        } else {
            false
        }
    }
}
