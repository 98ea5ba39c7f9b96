//! Textifier endpoint: batched entity claims (JSON) and plain-text statements.

use std::collections::HashMap;

use async_trait::async_trait;

use super::WikidataClient;
use crate::error::Result;
use crate::fetcher::{FetchOptions, RelationFetcher};
use crate::model::Entity;
use crate::queries::{normalize_lang, not_found_message, require_id};

#[async_trait]
impl RelationFetcher for WikidataClient {
    async fn fetch(
        &self,
        ids: &[String],
        properties: &[&str],
        options: &FetchOptions,
    ) -> Result<HashMap<String, Entity>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut params = vec![
            ("id", ids.join(",")),
            ("external_ids", options.external_ids.to_string()),
            ("all_ranks", options.all_ranks.to_string()),
            ("references", options.references.to_string()),
            ("qualifiers", options.qualifiers.to_string()),
            ("lang", normalize_lang(&options.lang).to_string()),
            ("format", "json".to_string()),
        ];
        if !properties.is_empty() {
            params.push(("pid", properties.join(",")));
        }

        log::debug!("Fetching {} entities from textifier", ids.len());
        let response: HashMap<String, Option<Entity>> = self
            .get_json(&self.config.textifier_url, &params, &[])
            .await?;

        Ok(response
            .into_iter()
            .filter_map(|(id, entity)| entity.map(|e| (id, e)))
            .collect())
    }
}

impl WikidataClient {
    /// All direct statements of an entity as the textifier's triplet text.
    pub async fn get_statements(
        &self,
        entity_id: &str,
        include_external_ids: bool,
        lang: &str,
    ) -> Result<String> {
        let entity_id = require_id(entity_id, "entity ID")?;
        let params = [
            ("id", entity_id.to_string()),
            ("external_ids", include_external_ids.to_string()),
            ("all_ranks", "false".to_string()),
            ("qualifiers", "false".to_string()),
            ("lang", normalize_lang(lang).to_string()),
            ("format", "triplet".to_string()),
        ];

        let response: HashMap<String, Option<String>> = self
            .get_json(&self.config.textifier_url, &params, &[])
            .await?;

        let text = response
            .get(entity_id)
            .and_then(|t| t.as_deref())
            .map(str::trim)
            .unwrap_or("");
        if text.is_empty() {
            return Ok(not_found_message(entity_id));
        }
        Ok(text.to_string())
    }
}
