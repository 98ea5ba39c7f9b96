//! Level-by-level BFS over instance-of / subclass-of edges.

use std::collections::{HashMap, HashSet};

use super::{extract_hierarchy_relations, RelationGraph, RelationGraphNode, RelationKind};
use crate::error::Result;
use crate::fetcher::{FetchOptions, RelationFetcher};
use crate::format::first_non_empty;

/// Build the hierarchy graph around `seed`.
///
/// Each BFS level is fetched in one batched call. Level 0 is the seed itself, so
/// `max_depth = 0` still fetches the seed and records its direct edges. IDs that
/// are already keys of the graph are never queued again, which is what breaks
/// cycles. Returns `Ok(None)` when the seed was never found. Any fetch error
/// aborts the whole build.
pub async fn build_relation_graph<F>(
    fetcher: &F,
    seed: &str,
    max_depth: usize,
    lang: &str,
) -> Result<Option<RelationGraph>>
where
    F: RelationFetcher + ?Sized,
{
    let options = FetchOptions::relations_only(lang);
    let properties = RelationKind::property_ids();

    let mut graph = RelationGraph::new();
    let mut label_hints: HashMap<String, String> = HashMap::new();
    let mut frontier = vec![seed.to_string()];
    let mut depth = 0;

    while !frontier.is_empty() && depth <= max_depth {
        log::debug!("Hierarchy level {}: fetching {} entities", depth, frontier.len());
        let response = fetcher.fetch(&frontier, &properties, &options).await?;

        let mut next = Vec::new();
        let mut queued = HashSet::new();
        for id in &frontier {
            let Some(entity) = response.get(id) else {
                log::debug!("Entity {} not returned by the service, skipping", id);
                continue;
            };

            let relations = extract_hierarchy_relations(&entity.claims);
            for (target, label) in &relations.label_hints {
                label_hints
                    .entry(target.clone())
                    .or_insert_with(|| label.clone());
            }
            for target in relations.targets() {
                if queued.insert(target.clone()) {
                    next.push(target.clone());
                }
            }

            graph.insert(RelationGraphNode {
                id: id.clone(),
                label: entity.label.trim().to_string(),
                instance_of: relations.instance_of,
                subclass_of: relations.subclass_of,
            });
        }

        next.retain(|id| !graph.contains(id));
        frontier = next;
        depth += 1;
    }

    if !graph.contains(seed) {
        return Ok(None);
    }

    for node in graph.nodes_mut() {
        let hint = label_hints.get(&node.id).map(String::as_str).unwrap_or("");
        node.label = first_non_empty(&[&node.label, hint, &node.id]).to_string();
    }
    log::debug!("Hierarchy graph for {} has {} nodes", seed, graph.len());

    Ok(Some(graph))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WikidataError;
    use crate::fetcher::testing::StaticFetcher;
    use crate::model::{Claim, ClaimValue, Entity};
    use serde_json::json;

    fn entity(id: &str, label: &str, instance_of: &[&str], subclass_of: &[&str]) -> Entity {
        let claim = |pid: &str, targets: &[&str]| Claim {
            property_id: pid.to_string(),
            values: targets
                .iter()
                .map(|t| ClaimValue {
                    value: json!({"QID": t}),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };
        Entity {
            qid: id.to_string(),
            label: label.to_string(),
            claims: vec![claim("P31", instance_of), claim("P279", subclass_of)],
            ..Default::default()
        }
    }

    fn douglas_adams() -> StaticFetcher {
        StaticFetcher::new(vec![
            entity("Q42", "Douglas Adams", &["Q5"], &[]),
            entity("Q5", "human", &[], &["Q729"]),
            entity("Q729", "mammal", &[], &[]),
        ])
    }

    fn keys(graph: &RelationGraph) -> Vec<&str> {
        graph.nodes().map(|n| n.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_builds_full_chain() {
        let fetcher = douglas_adams();
        let graph = build_relation_graph(&fetcher, "Q42", 5, "en")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(keys(&graph), vec!["Q42", "Q5", "Q729"]);
        assert_eq!(graph.get("Q42").unwrap().instance_of, vec!["Q5"]);
        assert_eq!(graph.get("Q5").unwrap().subclass_of, vec!["Q729"]);
        assert_eq!(graph.get("Q729").unwrap().label, "mammal");
        // Q729 has no edges, so the walk stops after three levels.
        assert_eq!(fetcher.batches().len(), 3);
    }

    #[tokio::test]
    async fn test_requests_relation_filter_without_qualifiers() {
        let fetcher = douglas_adams();
        build_relation_graph(&fetcher, "Q42", 0, "de").await.unwrap();

        let calls = fetcher.calls.lock().unwrap();
        let (ids, properties, options) = &calls[0];
        assert_eq!(ids, &vec!["Q42".to_string()]);
        assert_eq!(properties, &vec!["P31".to_string(), "P279".to_string()]);
        assert_eq!(options, &FetchOptions::relations_only("de"));
        assert!(!options.qualifiers);
    }

    #[tokio::test]
    async fn test_depth_zero_fetches_seed_once() {
        let fetcher = douglas_adams();
        let graph = build_relation_graph(&fetcher, "Q42", 0, "en")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(fetcher.batches(), vec![vec!["Q42".to_string()]]);
        assert_eq!(keys(&graph), vec!["Q42"]);
        // Direct edges are recorded even though Q5 itself was never visited.
        assert_eq!(graph.get("Q42").unwrap().instance_of, vec!["Q5"]);
        assert!(!graph.contains("Q5"));
    }

    #[tokio::test]
    async fn test_nodes_stay_within_depth() {
        let fetcher = douglas_adams();
        let graph = build_relation_graph(&fetcher, "Q42", 1, "en")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(keys(&graph), vec!["Q42", "Q5"]);
    }

    #[tokio::test]
    async fn test_cycle_terminates_without_duplicates() {
        let fetcher = StaticFetcher::new(vec![
            entity("Q1", "a", &["Q2"], &["Q2"]),
            entity("Q2", "b", &["Q1"], &["Q1"]),
        ]);
        let graph = build_relation_graph(&fetcher, "Q1", 50, "en")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(keys(&graph), vec!["Q1", "Q2"]);
        assert_eq!(fetcher.batches().len(), 2);
        assert_eq!(graph.get("Q2").unwrap().subclass_of, vec!["Q1"]);
    }

    #[tokio::test]
    async fn test_frontier_is_batched_and_deduplicated() {
        let fetcher = StaticFetcher::new(vec![
            entity("Q1", "root", &["Q2", "Q3"], &["Q2"]),
            entity("Q2", "left", &["Q4"], &[]),
            entity("Q3", "right", &["Q4"], &[]),
            entity("Q4", "shared", &[], &[]),
        ]);
        build_relation_graph(&fetcher, "Q1", 3, "en").await.unwrap();

        assert_eq!(
            fetcher.batches(),
            vec![
                vec!["Q1".to_string()],
                vec!["Q2".to_string(), "Q3".to_string()],
                vec!["Q4".to_string()],
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_seed_is_not_found() {
        let fetcher = douglas_adams();
        let result = build_relation_graph(&fetcher, "Q999", 3, "en").await.unwrap();
        assert!(result.is_none());
        assert_eq!(fetcher.batches().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_targets_are_skipped() {
        let fetcher = StaticFetcher::new(vec![entity("Q1", "root", &["Q404"], &[])]);
        let graph = build_relation_graph(&fetcher, "Q1", 3, "en")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(keys(&graph), vec!["Q1"]);
        assert_eq!(fetcher.batches().len(), 2);
    }

    #[tokio::test]
    async fn test_labels_fall_back_to_hints_then_ids() {
        let mut root = entity("Q1", "root", &[], &[]);
        root.claims[0].values = vec![
            ClaimValue {
                value: json!({"QID": "Q2", "label": "hinted"}),
                ..Default::default()
            },
            ClaimValue {
                value: json!({"QID": "Q3"}),
                ..Default::default()
            },
        ];
        let fetcher = StaticFetcher::new(vec![
            root,
            entity("Q2", "", &[], &[]),
            entity("Q3", "  ", &[], &[]),
        ]);

        let graph = build_relation_graph(&fetcher, "Q1", 2, "en")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(graph.get("Q1").unwrap().label, "root");
        assert_eq!(graph.get("Q2").unwrap().label, "hinted");
        assert_eq!(graph.get("Q3").unwrap().label, "Q3");
    }

    #[tokio::test]
    async fn test_rebuild_is_idempotent() {
        let fetcher = douglas_adams();
        let first = build_relation_graph(&fetcher, "Q42", 4, "en").await.unwrap();
        let second = build_relation_graph(&fetcher, "Q42", 4, "en").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_build() {
        let fetcher = StaticFetcher::failing();
        let err = build_relation_graph(&fetcher, "Q42", 2, "en")
            .await
            .unwrap_err();
        assert!(matches!(err, WikidataError::Remote { status: 502, .. }));
    }
}
