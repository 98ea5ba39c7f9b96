//! Entity payloads returned by the textifier service.
//!
//! Every collection tolerates being absent or `null` on the wire; both decode
//! to an empty `Vec`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One fetched entity with its claims.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "QID", default, deserialize_with = "null_as_default")]
    pub qid: String,
    #[serde(rename = "PID", default, deserialize_with = "null_as_default")]
    pub pid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub claims: Vec<Claim>,
}

impl Entity {
    /// The entity's own identifier, whichever namespace it lives in.
    pub fn id(&self) -> &str {
        if self.qid.trim().is_empty() {
            self.pid.trim()
        } else {
            self.qid.trim()
        }
    }
}

/// All values asserted for one property of an entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    #[serde(rename = "PID", default, deserialize_with = "null_as_default")]
    pub property_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub property_label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub datatype: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<ClaimValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimValue {
    #[serde(default)]
    pub value: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rank: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub qualifiers: Vec<Qualifier>,
    /// Reference groups; each group lists its entries in order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub references: Vec<Vec<Qualifier>>,
}

impl ClaimValue {
    /// Rank as displayed: blank ranks read as `normal`.
    pub fn display_rank(&self) -> &str {
        let rank = self.rank.trim();
        if rank.is_empty() {
            "normal"
        } else {
            rank
        }
    }
}

/// Qualifier or reference entry; both share this shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Qualifier {
    #[serde(rename = "PID", default, deserialize_with = "null_as_default")]
    pub property_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub property_label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub datatype: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<QualifierValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualifierValue {
    #[serde(default)]
    pub value: Value,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_decodes_textifier_payload() {
        let payload = json!({
            "QID": "Q42",
            "label": "Douglas Adams",
            "description": "English writer",
            "claims": [{
                "PID": "P106",
                "property_label": "occupation",
                "datatype": "wikibase-item",
                "values": [{
                    "value": {"QID": "Q6625963", "label": "novelist"},
                    "rank": "preferred",
                    "qualifiers": [{
                        "PID": "P580",
                        "property_label": "start time",
                        "values": [{"value": {"string": "1979"}}]
                    }],
                    "references": [[{
                        "PID": "P248",
                        "property_label": "stated in",
                        "values": [{"value": {"QID": "Q36578", "label": "GND"}}]
                    }]]
                }]
            }]
        });

        let entity: Entity = serde_json::from_value(payload).unwrap();
        assert_eq!(entity.id(), "Q42");
        assert_eq!(entity.claims.len(), 1);
        let claim = &entity.claims[0];
        assert_eq!(claim.property_id, "P106");
        assert_eq!(claim.property_label, "occupation");
        assert_eq!(claim.values[0].display_rank(), "preferred");
        assert_eq!(claim.values[0].qualifiers[0].property_id, "P580");
        assert_eq!(claim.values[0].references[0][0].property_label, "stated in");
    }

    #[test]
    fn test_null_collections_decode_as_empty() {
        let payload = json!({
            "PID": "P31",
            "label": null,
            "claims": [{
                "PID": "P1855",
                "values": [{"value": "x", "rank": null, "qualifiers": null, "references": null}]
            }]
        });

        let entity: Entity = serde_json::from_value(payload).unwrap();
        assert_eq!(entity.id(), "P31");
        assert_eq!(entity.label, "");
        let value = &entity.claims[0].values[0];
        assert!(value.qualifiers.is_empty());
        assert!(value.references.is_empty());
        assert_eq!(value.display_rank(), "normal");
    }
}
