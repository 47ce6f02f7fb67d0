//! In-memory accessible tree loaded from JSON.
//!
//! A snapshot is a serialized accessible hierarchy (name, description,
//! attributes, text, children). The replay CLI and the test suite use it to
//! drive the live-region pipeline without an accessibility bus. Nodes that
//! carry an `id` attribute are addressable through [`SnapshotTree::get`].

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, Weak};

use serde::Deserialize;
use thiserror::Error;

use super::{Accessible, AccessibleRef};

/// Errors loading or addressing a snapshot tree.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Invalid snapshot JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown node id: {0}")]
    UnknownNode(String),

    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),
}

/// Raw serde form of one node in a snapshot file.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotNode {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Attribute map; `id`, `container-live`, `container-atomic` and
    /// `channel` are the keys the pipeline reacts to.
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// Text content of this node, if it exposes a text interface.
    #[serde(default)]
    pub text: Option<String>,

    /// Ids of nodes this one is DESCRIBED_BY.
    #[serde(default)]
    pub described_by: Vec<String>,

    #[serde(default)]
    pub children: Vec<SnapshotNode>,
}

/// One linked node. Parent and relation links are fixed up after the tree
/// is built, so they live behind `OnceLock`s and stay `Weak` to avoid
/// reference cycles.
struct Node {
    name: String,
    description: String,
    attributes: HashMap<String, String>,
    text: Option<String>,
    described_by_ids: Vec<String>,
    children: Vec<Arc<Node>>,
    parent: OnceLock<(Weak<Node>, usize)>,
    described_by: OnceLock<Vec<Weak<Node>>>,
}

impl Node {
    fn build(raw: SnapshotNode) -> Arc<Node> {
        let children = raw.children.into_iter().map(Node::build).collect();
        Arc::new(Node {
            name: raw.name,
            description: raw.description,
            attributes: raw.attributes,
            text: raw.text,
            described_by_ids: raw.described_by,
            children,
            parent: OnceLock::new(),
            described_by: OnceLock::new(),
        })
    }

    fn flattened_text(&self) -> Option<String> {
        if let Some(text) = &self.text {
            return Some(text.clone());
        }
        let parts: Vec<String> = self
            .children
            .iter()
            .filter_map(|child| child.flattened_text())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

impl Accessible for Node {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn raw_attributes(&self) -> HashMap<String, String> {
        self.attributes.clone()
    }

    fn text(&self) -> Option<String> {
        self.flattened_text()
    }

    fn children(&self) -> Vec<AccessibleRef> {
        self.children
            .iter()
            .map(|child| child.clone() as AccessibleRef)
            .collect()
    }

    fn parent(&self) -> Option<AccessibleRef> {
        self.parent
            .get()
            .and_then(|(weak, _)| weak.upgrade())
            .map(|node| node as AccessibleRef)
    }

    fn index_in_parent(&self) -> Option<usize> {
        self.parent.get().map(|(_, index)| *index)
    }

    fn described_by(&self) -> Vec<AccessibleRef> {
        self.described_by
            .get()
            .map(|targets| {
                targets
                    .iter()
                    .filter_map(Weak::upgrade)
                    .map(|node| node as AccessibleRef)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A fully linked snapshot tree with an id index.
pub struct SnapshotTree {
    root: Arc<Node>,
    index: HashMap<String, Arc<Node>>,
}

impl SnapshotTree {
    /// Parse a snapshot from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let raw: SnapshotNode = serde_json::from_str(json)?;
        Self::from_node(raw)
    }

    /// Build a tree from an already deserialized root node.
    pub fn from_node(raw: SnapshotNode) -> Result<Self, SnapshotError> {
        let root = Node::build(raw);

        let mut index = HashMap::new();
        build_index(&root, &mut index)?;
        link(&root, &index);

        Ok(Self { root, index })
    }

    /// The document root.
    pub fn root(&self) -> AccessibleRef {
        self.root.clone()
    }

    /// Look up a node by its `id` attribute.
    pub fn get(&self, id: &str) -> Option<AccessibleRef> {
        self.index.get(id).map(|node| node.clone() as AccessibleRef)
    }

    /// Like [`get`](Self::get), but an unknown id is an error.
    pub fn require(&self, id: &str) -> Result<AccessibleRef, SnapshotError> {
        self.get(id)
            .ok_or_else(|| SnapshotError::UnknownNode(id.to_string()))
    }
}

fn build_index(node: &Arc<Node>, index: &mut HashMap<String, Arc<Node>>) -> Result<(), SnapshotError> {
    if let Some(id) = node.attributes.get("id") {
        if index.insert(id.clone(), node.clone()).is_some() {
            return Err(SnapshotError::DuplicateNode(id.clone()));
        }
    }
    for child in &node.children {
        build_index(child, index)?;
    }
    Ok(())
}

fn link(node: &Arc<Node>, index: &HashMap<String, Arc<Node>>) {
    let targets = node
        .described_by_ids
        .iter()
        .filter_map(|id| index.get(id))
        .map(Arc::downgrade)
        .collect();
    let _ = node.described_by.set(targets);

    for (i, child) in node.children.iter().enumerate() {
        let _ = child.parent.set((Arc::downgrade(node), i));
        link(child, index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessible::{element_key, Attributes, ElementKey};

    fn sample_tree() -> SnapshotTree {
        SnapshotTree::from_json(
            r#"{
                "name": "document",
                "children": [
                    {
                        "name": "Stock ticker",
                        "attributes": {"id": "ticker", "container-live": "polite"},
                        "children": [
                            {"text": "ACME 42.0"}
                        ]
                    },
                    {
                        "attributes": {"container-live": "assertive"},
                        "text": "alert text"
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_index_and_attributes() {
        let tree = sample_tree();
        let ticker = tree.require("ticker").unwrap();
        let attrs = Attributes::of(ticker.as_ref());
        assert!(attrs.has_live_markup());
        assert_eq!(attrs.id(), Some("ticker"));
        assert!(!attrs.atomic());
    }

    #[test]
    fn test_flattened_text() {
        let tree = sample_tree();
        let ticker = tree.require("ticker").unwrap();
        assert_eq!(ticker.text().as_deref(), Some("ACME 42.0"));
    }

    #[test]
    fn test_element_key_falls_back_to_path() {
        let tree = sample_tree();
        let children = tree.root().children();
        let anonymous = children[1].clone();
        assert_eq!(element_key(&anonymous), ElementKey::Path(vec![1]));

        let ticker = tree.require("ticker").unwrap();
        assert_eq!(element_key(&ticker), ElementKey::Id("ticker".to_string()));
    }

    #[test]
    fn test_unknown_node_is_error() {
        let tree = sample_tree();
        assert!(matches!(
            tree.require("nope"),
            Err(SnapshotError::UnknownNode(_))
        ));
    }
}
