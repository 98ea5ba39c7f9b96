//! Multi-line text rendering of one entity's statements.

use crate::format::value::stringify;
use crate::model::{Entity, Qualifier};

/// Render every (claim, value) pair of `entity` as a text block.
///
/// Blocks are separated by a blank line. `property_id` stands in for claims that
/// omit their own property identifier. An entity without claims renders as an
/// empty string so the caller can substitute its own message.
pub fn render_statement_values(entity_id: &str, property_id: &str, entity: &Entity) -> String {
    if entity.claims.is_empty() {
        return String::new();
    }

    let entity_label = first_non_empty(&[&entity.label, entity_id]);
    let mut out = String::new();
    let mut first_block = true;

    for claim in &entity.claims {
        let property = first_non_empty(&[&claim.property_id, property_id]);
        for claim_value in &claim.values {
            if !first_block {
                out.push('\n');
            }
            first_block = false;

            out.push_str(&format!(
                "{} ({}): {} ({}): {}\n",
                entity_label,
                entity_id,
                claim.property_label,
                property,
                stringify(&claim_value.value)
            ));
            out.push_str(&format!("  Rank: {}\n", claim_value.display_rank()));

            if !claim_value.qualifiers.is_empty() {
                out.push_str("  Qualifier:\n");
                for qualifier in &claim_value.qualifiers {
                    write_entry(&mut out, qualifier);
                }
            }

            for (index, group) in claim_value.references.iter().enumerate() {
                out.push_str(&format!("  Reference {}:\n", index + 1));
                for entry in group {
                    write_entry(&mut out, entry);
                }
            }
        }
    }

    out.trim().to_string()
}

fn write_entry(out: &mut String, entry: &Qualifier) {
    out.push_str(&format!(
        "    - {} ({}): {}\n",
        entry.property_label,
        entry.property_id,
        stringify_entry(entry)
    ));
}

/// Values of a qualifier or reference entry, joined with `", "`.
pub fn stringify_entry(entry: &Qualifier) -> String {
    entry
        .values
        .iter()
        .map(|v| stringify(&v.value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// First candidate that is not blank, trimmed; empty when all are blank.
pub fn first_non_empty<'a>(candidates: &[&'a str]) -> &'a str {
    candidates
        .iter()
        .map(|c| c.trim())
        .find(|c| !c.is_empty())
        .unwrap_or("")
}
