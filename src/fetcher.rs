//! The data-access seam used by the hierarchy builder and statement rendering.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::Entity;

/// What the remote side should include in each fetched entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub external_ids: bool,
    pub all_ranks: bool,
    pub references: bool,
    pub qualifiers: bool,
    pub lang: String,
}

impl FetchOptions {
    /// Labels and best-rank claims only.
    pub fn relations_only(lang: &str) -> Self {
        Self {
            external_ids: false,
            all_ranks: false,
            references: false,
            qualifiers: false,
            lang: lang.to_string(),
        }
    }

    /// Every rank, qualifier and reference.
    pub fn full_detail(lang: &str) -> Self {
        Self {
            external_ids: true,
            all_ranks: true,
            references: true,
            qualifiers: true,
            lang: lang.to_string(),
        }
    }
}

/// Batched entity lookup.
///
/// Returns one entry per ID the remote side knows; unknown IDs are simply
/// missing from the map. An empty `properties` slice means no filter.
#[async_trait]
pub trait RelationFetcher: Send + Sync {
    async fn fetch(
        &self,
        ids: &[String],
        properties: &[&str],
        options: &FetchOptions,
    ) -> Result<HashMap<String, Entity>>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory fetcher shared by the graph and statement tests.

    use super::*;
    use crate::error::WikidataError;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct StaticFetcher {
        entities: HashMap<String, Entity>,
        fail: bool,
        pub calls: Mutex<Vec<(Vec<String>, Vec<String>, FetchOptions)>>,
    }

    impl StaticFetcher {
        pub fn new(entities: Vec<Entity>) -> Self {
            Self {
                entities: entities
                    .into_iter()
                    .map(|e| (e.id().to_string(), e))
                    .collect(),
                ..Default::default()
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub fn batches(&self) -> Vec<Vec<String>> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(ids, _, _)| ids.clone())
                .collect()
        }
    }

    #[async_trait]
    impl RelationFetcher for StaticFetcher {
        async fn fetch(
            &self,
            ids: &[String],
            properties: &[&str],
            options: &FetchOptions,
        ) -> Result<HashMap<String, Entity>> {
            self.calls.lock().unwrap().push((
                ids.to_vec(),
                properties.iter().map(|p| p.to_string()).collect(),
                options.clone(),
            ));
            if self.fail {
                return Err(WikidataError::Remote {
                    status: 502,
                    body: "bad gateway".to_string(),
                });
            }
            Ok(ids
                .iter()
                .filter_map(|id| self.entities.get(id).map(|e| (id.clone(), e.clone())))
                .map(|(id, mut entity)| {
                    if !properties.is_empty() {
                        entity
                            .claims
                            .retain(|c| properties.contains(&c.property_id.as_str()));
                    }
                    (id, entity)
                })
                .collect())
        }
    }
}
