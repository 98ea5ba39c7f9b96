//! Entity search: vector search first, keyword search as the fallback.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::WikidataClient;
use crate::error::{Result, WikidataError};
use crate::format::first_non_empty;

const DEFAULT_LIMIT: usize = 10;
/// `wbgetentities` accepts at most this many IDs per call.
const LABEL_BATCH_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Item,
    Property,
}

impl SearchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::Item => "item",
            SearchKind::Property => "property",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSource {
    Vector,
    Keyword,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub label: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResponse {
    pub source: SearchSource,
    pub results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct VectorCandidate {
    #[serde(rename = "QID", default)]
    qid: Option<String>,
    #[serde(rename = "PID", default)]
    pid: Option<String>,
}

#[derive(Deserialize, Default)]
struct LangValue {
    #[serde(default)]
    value: String,
}

#[derive(Deserialize)]
struct EntitiesResponse {
    #[serde(default)]
    entities: HashMap<String, EntityTerms>,
}

#[derive(Deserialize)]
struct EntityTerms {
    #[serde(default)]
    labels: HashMap<String, LangValue>,
    #[serde(default)]
    descriptions: HashMap<String, LangValue>,
}

#[derive(Deserialize)]
struct KeywordResponse {
    #[serde(default)]
    search: Vec<KeywordHit>,
}

#[derive(Deserialize)]
struct KeywordHit {
    id: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    display: KeywordDisplay,
}

#[derive(Deserialize, Default)]
struct KeywordDisplay {
    #[serde(default)]
    label: LangValue,
    #[serde(default)]
    description: LangValue,
}

impl WikidataClient {
    pub async fn search_items(
        &self,
        query: &str,
        lang: &str,
        limit: usize,
        disable_vector: bool,
    ) -> Result<SearchResponse> {
        self.search(query, lang, limit, SearchKind::Item, disable_vector)
            .await
    }

    pub async fn search_properties(
        &self,
        query: &str,
        lang: &str,
        limit: usize,
        disable_vector: bool,
    ) -> Result<SearchResponse> {
        self.search(query, lang, limit, SearchKind::Property, disable_vector)
            .await
    }

    /// Search entities of `kind`.
    ///
    /// Vector search is tried first unless disabled; any vector failure or an
    /// empty vector result falls back to keyword search, whose errors are final.
    pub async fn search(
        &self,
        query: &str,
        lang: &str,
        limit: usize,
        kind: SearchKind,
        disable_vector: bool,
    ) -> Result<SearchResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WikidataError::invalid_input("query cannot be empty"));
        }
        let lang = first_non_empty(&[lang, "en"]);
        let limit = if limit == 0 { DEFAULT_LIMIT } else { limit };

        if !disable_vector {
            match self.vector_search(query, lang, limit, kind).await {
                Ok(results) if !results.is_empty() => {
                    return Ok(SearchResponse {
                        source: SearchSource::Vector,
                        results,
                    });
                }
                Ok(_) => log::debug!("Vector search returned nothing, using keyword search"),
                Err(e) => log::warn!("Vector search failed, using keyword search: {}", e),
            }
        }

        let results = self.keyword_search(query, lang, limit, kind).await?;
        Ok(SearchResponse {
            source: SearchSource::Keyword,
            results,
        })
    }

    async fn vector_search(
        &self,
        query: &str,
        lang: &str,
        limit: usize,
        kind: SearchKind,
    ) -> Result<Vec<SearchResult>> {
        let endpoint = format!(
            "{}/{}/query/",
            self.config.vector_search_url.trim_end_matches('/'),
            kind.as_str()
        );
        let params = [("query", query.to_string()), ("k", limit.to_string())];
        let headers = [("x-api-secret", self.config.vector_api_secret.as_str())];

        let candidates: Vec<VectorCandidate> =
            self.get_json(&endpoint, &params, &headers).await?;

        let mut seen = HashSet::new();
        let mut ids: Vec<String> = candidates
            .into_iter()
            .filter_map(|c| match kind {
                SearchKind::Item => c.qid,
                SearchKind::Property => c.pid,
            })
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty() && seen.insert(id.clone()))
            .collect();
        ids.truncate(limit);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut terms = self.labels_and_descriptions(&ids, lang).await?;
        Ok(ids
            .into_iter()
            .map(|id| {
                let (label, description) = terms.remove(&id).unwrap_or_default();
                SearchResult {
                    id,
                    label,
                    description,
                }
            })
            .collect())
    }

    async fn keyword_search(
        &self,
        query: &str,
        lang: &str,
        limit: usize,
        kind: SearchKind,
    ) -> Result<Vec<SearchResult>> {
        let params = [
            ("action", "wbsearchentities".to_string()),
            ("type", kind.as_str().to_string()),
            ("search", query.to_string()),
            ("limit", limit.to_string()),
            ("language", lang.to_string()),
            ("format", "json".to_string()),
            ("origin", "*".to_string()),
        ];

        let response: KeywordResponse = self
            .get_json(&self.config.wikidata_api_url, &params, &[])
            .await?;

        Ok(response
            .search
            .into_iter()
            .map(|hit| SearchResult {
                label: first_non_empty(&[&hit.display.label.value, &hit.label]).to_string(),
                description: first_non_empty(&[&hit.display.description.value, &hit.description])
                    .to_string(),
                id: hit.id,
            })
            .collect())
    }

    /// `(label, description)` per ID, fetched in batches of 50.
    async fn labels_and_descriptions(
        &self,
        ids: &[String],
        lang: &str,
    ) -> Result<HashMap<String, (String, String)>> {
        let mut result = HashMap::with_capacity(ids.len());
        for chunk in ids.chunks(LABEL_BATCH_SIZE) {
            let params = [
                ("action", "wbgetentities".to_string()),
                ("ids", chunk.join("|")),
                ("languages", format!("{}|mul|en", lang)),
                ("props", "labels|descriptions".to_string()),
                ("format", "json".to_string()),
                ("origin", "*".to_string()),
            ];
            let response: EntitiesResponse = self
                .get_json(&self.config.wikidata_api_url, &params, &[])
                .await?;

            for (id, terms) in response.entities {
                let label = pick_lang_value(&terms.labels, lang);
                let description = pick_lang_value(&terms.descriptions, lang);
                result.insert(id, (label, description));
            }
        }
        Ok(result)
    }
}

/// Value in `lang`, then `mul`, then `en`.
fn pick_lang_value(values: &HashMap<String, LangValue>, lang: &str) -> String {
    [lang, "mul", "en"]
        .iter()
        .filter_map(|l| values.get(*l))
        .map(|v| v.value.trim())
        .find(|v| !v.is_empty())
        .unwrap_or("")
        .to_string()
}
