//! Hierarchy edge extraction from an entity's claims.

use std::collections::HashSet;

use serde_json::Value;

use super::RelationKind;
use crate::model::Claim;

/// Outgoing hierarchy edges of one entity, plus the labels the claim values
/// carried for their targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyRelations {
    pub instance_of: Vec<String>,
    pub subclass_of: Vec<String>,
    pub label_hints: Vec<(String, String)>,
}

impl HierarchyRelations {
    /// All targets, instance-of first, in first-seen order (may repeat across kinds).
    pub fn targets(&self) -> impl Iterator<Item = &String> {
        self.instance_of.iter().chain(self.subclass_of.iter())
    }
}

/// Collect P31/P279 targets from `claims`, deduplicated per kind.
pub fn extract_hierarchy_relations(claims: &[Claim]) -> HierarchyRelations {
    let mut relations = HierarchyRelations::default();
    let mut seen_instance = HashSet::new();
    let mut seen_subclass = HashSet::new();

    for claim in claims {
        let Some(kind) = RelationKind::from_property_id(&claim.property_id) else {
            continue;
        };

        for claim_value in &claim.values {
            let Some((id, label)) = entity_reference(&claim_value.value) else {
                continue;
            };
            if let Some(label) = label {
                relations.label_hints.push((id.clone(), label));
            }

            let (seen, targets) = match kind {
                RelationKind::InstanceOf => (&mut seen_instance, &mut relations.instance_of),
                RelationKind::SubclassOf => (&mut seen_subclass, &mut relations.subclass_of),
            };
            if seen.insert(id.clone()) {
                targets.push(id);
            }
        }
    }

    relations
}

/// `(id, label)` of an entity-reference value such as `{"QID": "Q5", "label": "human"}`.
pub fn entity_reference(value: &Value) -> Option<(String, Option<String>)> {
    let map = value.as_object()?;
    ["QID", "PID"].into_iter().find_map(|key| {
        let id = map.get(key)?.as_str()?.trim();
        if id.is_empty() {
            return None;
        }
        let label = map
            .get("label")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string);
        Some((id.to_string(), label))
    })
}
