//! Nested tree rendering of a built hierarchy graph.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::{RelationGraph, RelationKind};

/// A rendered hierarchy: either a bare `"<label> (<id>)"` leaf or that same
/// key mapped to its expanded relations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyTree {
    Leaf(String),
    Branch {
        key: String,
        instance_of: Vec<HierarchyTree>,
        subclass_of: Vec<HierarchyTree>,
    },
}

impl HierarchyTree {
    /// The `"<label> (<id>)"` text of this tree's root.
    pub fn key(&self) -> &str {
        match self {
            HierarchyTree::Leaf(key) | HierarchyTree::Branch { key, .. } => key,
        }
    }

    pub fn children(&self, kind: RelationKind) -> &[HierarchyTree] {
        match (self, kind) {
            (HierarchyTree::Leaf(_), _) => &[],
            (HierarchyTree::Branch { instance_of, .. }, RelationKind::InstanceOf) => instance_of,
            (HierarchyTree::Branch { subclass_of, .. }, RelationKind::SubclassOf) => subclass_of,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HierarchyTree::Leaf(_))
    }
}

/// Render `root` and everything reachable from it within `depth` hops.
///
/// Only targets present in the graph are expanded; dangling edges are dropped.
/// Nothing is memoised, so a node reachable along several paths is expanded in
/// full once per path and diamond-shaped hierarchies grow with depth times
/// branching factor.
pub fn render_hierarchy(graph: &RelationGraph, root: &str, depth: usize) -> HierarchyTree {
    let Some(node) = graph.get(root) else {
        return HierarchyTree::Leaf(format!("{} ({})", root, root));
    };
    if depth == 0 {
        return HierarchyTree::Leaf(node.display());
    }

    let expand = |kind: RelationKind| -> Vec<HierarchyTree> {
        node.targets(kind)
            .iter()
            .filter(|target| graph.contains(target))
            .map(|target| render_hierarchy(graph, target, depth - 1))
            .collect()
    };

    HierarchyTree::Branch {
        key: node.display(),
        instance_of: expand(RelationKind::InstanceOf),
        subclass_of: expand(RelationKind::SubclassOf),
    }
}

struct Relations<'a>(&'a [HierarchyTree], &'a [HierarchyTree]);

impl Serialize for Relations<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(RelationKind::InstanceOf.key(), self.0)?;
        map.serialize_entry(RelationKind::SubclassOf.key(), self.1)?;
        map.end()
    }
}

impl Serialize for HierarchyTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            HierarchyTree::Leaf(key) => serializer.serialize_str(key),
            HierarchyTree::Branch {
                key,
                instance_of,
                subclass_of,
            } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(key, &Relations(instance_of, subclass_of))?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RelationGraphNode;
    use serde_json::json;

    fn node(id: &str, label: &str, instance_of: &[&str], subclass_of: &[&str]) -> RelationGraphNode {
        RelationGraphNode {
            id: id.to_string(),
            label: label.to_string(),
            instance_of: instance_of.iter().map(|s| s.to_string()).collect(),
            subclass_of: subclass_of.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn douglas_adams_graph() -> RelationGraph {
        let mut graph = RelationGraph::new();
        graph.insert(node("Q42", "Douglas Adams", &["Q5"], &[]));
        graph.insert(node("Q5", "human", &[], &["Q729"]));
        graph.insert(node("Q729", "mammal", &[], &[]));
        graph
    }

    #[test]
    fn test_renders_two_levels() {
        let tree = render_hierarchy(&douglas_adams_graph(), "Q42", 2);
        assert_eq!(tree.key(), "Douglas Adams (Q42)");

        let human = &tree.children(RelationKind::InstanceOf)[0];
        assert_eq!(human.key(), "human (Q5)");
        assert!(tree.children(RelationKind::SubclassOf).is_empty());

        let mammal = &human.children(RelationKind::SubclassOf)[0];
        assert_eq!(mammal, &HierarchyTree::Leaf("mammal (Q729)".to_string()));
    }

    #[test]
    fn test_serializes_as_nested_maps() {
        let tree = render_hierarchy(&douglas_adams_graph(), "Q42", 2);
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({
                "Douglas Adams (Q42)": {
                    "instance-of": [{
                        "human (Q5)": {
                            "instance-of": [],
                            "subclass-of": ["mammal (Q729)"]
                        }
                    }],
                    "subclass-of": []
                }
            })
        );
    }

    #[test]
    fn test_depth_zero_is_always_a_leaf() {
        let tree = render_hierarchy(&douglas_adams_graph(), "Q42", 0);
        assert_eq!(tree, HierarchyTree::Leaf("Douglas Adams (Q42)".to_string()));
        assert_eq!(serde_json::to_value(&tree).unwrap(), json!("Douglas Adams (Q42)"));
    }

    #[test]
    fn test_missing_root_is_a_leaf() {
        let tree = render_hierarchy(&douglas_adams_graph(), "Q1", 3);
        assert!(tree.is_leaf());
        assert_eq!(tree.key(), "Q1 (Q1)");
    }

    #[test]
    fn test_dangling_edges_are_omitted() {
        let mut graph = RelationGraph::new();
        graph.insert(node("Q1", "root", &["Q2", "Q404"], &["Q405"]));
        graph.insert(node("Q2", "known", &[], &[]));

        let tree = render_hierarchy(&graph, "Q1", 5);
        let instance: Vec<&str> = tree
            .children(RelationKind::InstanceOf)
            .iter()
            .map(HierarchyTree::key)
            .collect();
        assert_eq!(instance, vec!["known (Q2)"]);
        assert!(tree.children(RelationKind::SubclassOf).is_empty());
    }

    #[test]
    fn test_shared_descendants_expand_per_path() {
        let mut graph = RelationGraph::new();
        graph.insert(node("Q1", "top", &["Q2", "Q3"], &[]));
        graph.insert(node("Q2", "left", &[], &["Q4"]));
        graph.insert(node("Q3", "right", &[], &["Q4"]));
        graph.insert(node("Q4", "base", &[], &["Q5"]));
        graph.insert(node("Q5", "root class", &[], &[]));

        let tree = render_hierarchy(&graph, "Q1", 3);
        let branches = tree.children(RelationKind::InstanceOf);
        assert_eq!(branches.len(), 2);
        for branch in branches {
            let base = &branch.children(RelationKind::SubclassOf)[0];
            assert_eq!(base.key(), "base (Q4)");
            assert_eq!(
                base.children(RelationKind::SubclassOf),
                [HierarchyTree::Leaf("root class (Q5)".to_string())]
            );
        }
    }

    #[test]
    fn test_cycle_render_is_bounded_by_depth() {
        let mut graph = RelationGraph::new();
        graph.insert(node("Q1", "a", &["Q2"], &[]));
        graph.insert(node("Q2", "b", &["Q1"], &[]));

        let tree = render_hierarchy(&graph, "Q1", 3);
        let b = &tree.children(RelationKind::InstanceOf)[0];
        let a = &b.children(RelationKind::InstanceOf)[0];
        let b_again = &a.children(RelationKind::InstanceOf)[0];
        assert_eq!(b_again, &HierarchyTree::Leaf("b (Q2)".to_string()));
    }
}
