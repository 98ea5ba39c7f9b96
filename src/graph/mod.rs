//! Instance/subclass hierarchy graph: relation extraction, BFS traversal and
//! tree rendering.
//!
//! The graph is an arena keyed by entity ID. Edges are ID lists and may point
//! at IDs that were never visited (the depth limit cut them off); those are
//! resolved lazily by the renderer and dropped when absent.

mod extraction;
mod render;
mod traversal;

pub use extraction::{entity_reference, extract_hierarchy_relations, HierarchyRelations};
pub use render::{render_hierarchy, HierarchyTree};
pub use traversal::build_relation_graph;

use std::collections::BTreeMap;

use crate::format::first_non_empty;

/// The two relation kinds followed by the hierarchy walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    InstanceOf,
    SubclassOf,
}

impl RelationKind {
    pub const ALL: [RelationKind; 2] = [RelationKind::InstanceOf, RelationKind::SubclassOf];

    /// Property identifier carrying this relation (`P31` / `P279`).
    pub fn property_id(self) -> &'static str {
        match self {
            RelationKind::InstanceOf => "P31",
            RelationKind::SubclassOf => "P279",
        }
    }

    /// Key used for this relation in rendered trees.
    pub fn key(self) -> &'static str {
        match self {
            RelationKind::InstanceOf => "instance-of",
            RelationKind::SubclassOf => "subclass-of",
        }
    }

    pub fn from_property_id(pid: &str) -> Option<Self> {
        RelationKind::ALL
            .into_iter()
            .find(|kind| kind.property_id() == pid.trim())
    }

    pub fn property_ids() -> [&'static str; 2] {
        RelationKind::ALL.map(RelationKind::property_id)
    }
}

/// One visited entity and its outgoing hierarchy edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationGraphNode {
    pub id: String,
    /// Display label; equals `id` once labels are resolved and none was found.
    pub label: String,
    pub instance_of: Vec<String>,
    pub subclass_of: Vec<String>,
}

impl RelationGraphNode {
    pub fn targets(&self, kind: RelationKind) -> &[String] {
        match kind {
            RelationKind::InstanceOf => &self.instance_of,
            RelationKind::SubclassOf => &self.subclass_of,
        }
    }

    /// `"<label> (<id>)"`
    pub fn display(&self) -> String {
        format!("{} ({})", first_non_empty(&[&self.label, &self.id]), self.id)
    }
}

/// Entities discovered by one traversal, keyed by ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationGraph {
    nodes: BTreeMap<String, RelationGraphNode>,
}

impl RelationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a visited node, replacing any earlier entry for the same ID.
    pub fn insert(&mut self, node: RelationGraphNode) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn get(&self, id: &str) -> Option<&RelationGraphNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &RelationGraphNode> {
        self.nodes.values()
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut RelationGraphNode> {
        self.nodes.values_mut()
    }
}
