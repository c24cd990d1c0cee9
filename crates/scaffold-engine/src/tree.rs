//! File-tree builder
//!
//! Turns a flat list of '/'-separated output paths into a nested tree for
//! display. Segments are matched case-insensitively; the casing of the first
//! path that introduced a directory is kept for display. File nodes keep the
//! path they were inserted with, so `flatten` returns the input paths.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A node of the display tree. Files carry no `children`; directories always do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub name: String,
    pub path: String,
    pub is_directory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_directory: false,
            children: None,
        }
    }

    pub fn directory(name: impl Into<String>, path: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_directory: true,
            children: Some(children),
        }
    }

    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or_default()
    }
}

#[derive(Default)]
struct TrieNode {
    name: String,
    path: String,
    /// Original path of the file ending here, if any
    file_path: Option<String>,
    children: HashMap<String, TrieNode>,
}

impl TrieNode {
    fn insert(&mut self, segments: &[&str], parent_path: &str, full_path: &str) {
        let Some((first, rest)) = segments.split_first() else {
            if self.file_path.is_none() {
                self.file_path = Some(full_path.to_string());
            }
            return;
        };
        let path = if parent_path.is_empty() {
            first.to_string()
        } else {
            format!("{}/{}", parent_path, first)
        };
        let child = self
            .children
            .entry(first.to_lowercase())
            .or_insert_with(|| TrieNode {
                name: first.to_string(),
                path,
                ..Default::default()
            });
        let child_path = child.path.clone();
        child.insert(rest, &child_path, full_path);
    }

    fn into_tree_nodes(self) -> Vec<TreeNode> {
        let mut nodes: Vec<TreeNode> = self
            .children
            .into_values()
            .map(|child| match child.file_path {
                Some(file_path) if child.children.is_empty() => TreeNode::file(child.name, file_path),
                _ => {
                    let name = child.name.clone();
                    let path = child.path.clone();
                    TreeNode::directory(name, path, child.into_tree_nodes())
                }
            })
            .collect();
        nodes.sort_by(|a, b| {
            b.is_directory
                .cmp(&a.is_directory)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
                .then_with(|| a.name.cmp(&b.name))
        });
        nodes
    }
}

/// Build the display tree for `paths`.
///
/// Directories precede files at every level, each group sorted by
/// case-insensitive name. Empty segments are ignored.
pub fn build_tree<'a>(paths: impl IntoIterator<Item = &'a str>) -> Vec<TreeNode> {
    let mut root = TrieNode::default();
    for path in paths {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if !segments.is_empty() {
            let full_path = segments.join("/");
            root.insert(&segments, "", &full_path);
        }
    }
    root.into_tree_nodes()
}

/// Leaf file paths in depth-first display order
pub fn flatten(tree: &[TreeNode]) -> Vec<String> {
    let mut paths = Vec::new();
    collect_files(tree, &mut paths);
    paths
}

fn collect_files(nodes: &[TreeNode], paths: &mut Vec<String>) {
    for node in nodes {
        if node.is_directory {
            collect_files(node.children(), paths);
        } else {
            paths.push(node.path.clone());
        }
    }
}

/// Node whose path equals `path` exactly
pub fn find_by_path<'a>(tree: &'a [TreeNode], path: &str) -> Option<&'a TreeNode> {
    tree.iter().find_map(|node| {
        if node.path == path {
            Some(node)
        } else {
            find_by_path(node.children(), path)
        }
    })
}

/// Every file node named `name`
pub fn files_named<'a>(tree: &'a [TreeNode], name: &str) -> Vec<&'a TreeNode> {
    let mut found = Vec::new();
    collect_named(tree, name, &mut found);
    found
}

fn collect_named<'a>(nodes: &'a [TreeNode], name: &str, found: &mut Vec<&'a TreeNode>) {
    for node in nodes {
        if node.is_directory {
            collect_named(node.children(), name, found);
        } else if node.name == name {
            found.push(node);
        }
    }
}
