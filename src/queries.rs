//! Operations exposed to the command layer on top of a [`RelationFetcher`].
//!
//! "Not found" outcomes are successful results carrying a message, so callers
//! can tell them apart from transport or remote failures.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{Result, WikidataError};
use crate::fetcher::{FetchOptions, RelationFetcher};
use crate::format::render_statement_values;
use crate::graph::{build_relation_graph, render_hierarchy, HierarchyTree};

/// Outcome of a hierarchy lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyResult {
    Tree(HierarchyTree),
    NotFound { message: String },
}

impl HierarchyResult {
    pub fn message(&self) -> Option<&str> {
        match self {
            HierarchyResult::NotFound { message } => Some(message),
            HierarchyResult::Tree(_) => None,
        }
    }

    pub fn tree(&self) -> Option<&HierarchyTree> {
        match self {
            HierarchyResult::Tree(tree) => Some(tree),
            HierarchyResult::NotFound { .. } => None,
        }
    }
}

/// Serialized as `{"tree": ...}` or `{"message": ...}`. A bare leaf tree is
/// wrapped as `{"tree": {"result": "<leaf>"}}` so `tree` is always an object.
impl Serialize for HierarchyResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        struct LeafWrapper<'a>(&'a HierarchyTree);

        impl Serialize for LeafWrapper<'_> {
            fn serialize<S: Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("result", self.0)?;
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            HierarchyResult::Tree(tree) if tree.is_leaf() => {
                map.serialize_entry("tree", &LeafWrapper(tree))?
            }
            HierarchyResult::Tree(tree) => map.serialize_entry("tree", tree)?,
            HierarchyResult::NotFound { message } => map.serialize_entry("message", message)?,
        }
        map.end()
    }
}

/// Instance-of / subclass-of hierarchy of `entity_id`, `max_depth` levels deep.
pub async fn get_instance_and_subclass_hierarchy<F>(
    fetcher: &F,
    entity_id: &str,
    max_depth: i64,
    lang: &str,
) -> Result<HierarchyResult>
where
    F: RelationFetcher + ?Sized,
{
    let entity_id = require_id(entity_id, "entity ID")?;
    let max_depth = usize::try_from(max_depth)
        .map_err(|_| WikidataError::invalid_input("max-depth must be zero or greater"))?;
    let lang = normalize_lang(lang);

    let Some(graph) = build_relation_graph(fetcher, entity_id, max_depth, lang).await? else {
        return Ok(HierarchyResult::NotFound {
            message: not_found_message(entity_id),
        });
    };

    Ok(HierarchyResult::Tree(render_hierarchy(
        &graph, entity_id, max_depth,
    )))
}

/// Detailed values, ranks, qualifiers and references of one property.
pub async fn get_statement_values<F>(
    fetcher: &F,
    entity_id: &str,
    property_id: &str,
    lang: &str,
) -> Result<String>
where
    F: RelationFetcher + ?Sized,
{
    let entity_id = require_id(entity_id, "entity ID")?;
    let property_id = require_id(property_id, "property ID")?;
    let lang = normalize_lang(lang);

    let ids = [entity_id.to_string()];
    let mut response = fetcher
        .fetch(&ids, &[property_id], &FetchOptions::full_detail(lang))
        .await?;

    let Some(entity) = response.remove(entity_id) else {
        return Ok(not_found_message(entity_id));
    };

    let text = render_statement_values(entity_id, property_id, &entity);
    if text.trim().is_empty() {
        return Ok(format!(
            "No statement found for {} with property {}",
            entity_id, property_id
        ));
    }
    Ok(text)
}

pub fn not_found_message(entity_id: &str) -> String {
    format!("Entity {} not found", entity_id)
}

pub(crate) fn require_id<'a>(id: &'a str, what: &str) -> Result<&'a str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(WikidataError::invalid_input(format!("{} cannot be empty", what)));
    }
    Ok(id)
}

pub(crate) fn normalize_lang(lang: &str) -> &str {
    let lang = lang.trim();
    if lang.is_empty() {
        "en"
    } else {
        lang
    }
}
