//! HTTP client for the Wikidata API, the query service, the textifier and the
//! vector search service.

mod search;
mod sparql;
mod textifier;

pub use search::{SearchKind, SearchResponse, SearchResult, SearchSource};
pub use sparql::{SparqlResult, SparqlRow};

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{Result, WikidataError};

/// Error bodies are read up to this many bytes.
const MAX_ERROR_BODY: usize = 1 << 16;

/// Wikidata services client
///
/// Holds one pooled `reqwest::Client`; the configured timeout bounds every request.
pub struct WikidataClient {
    client: Client,
    config: Config,
}

impl WikidataClient {
    /// Create a client after validating `config`.
    pub fn new(config: Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| WikidataError::Config(format!("{:#}", e)))?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// GET `endpoint` with query `params` and decode the JSON body.
    ///
    /// Blank header values are skipped. Statuses >= 400 become
    /// [`WikidataError::Remote`] carrying the (truncated) body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        headers: &[(&str, &str)],
    ) -> Result<T> {
        let mut request = self
            .client
            .get(endpoint)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, self.config.user_agent.as_str());
        if !params.is_empty() {
            request = request.query(params);
        }
        for (name, value) in headers {
            if !value.trim().is_empty() {
                request = request.header(*name, *value);
            }
        }

        let start = std::time::Instant::now();
        let response = request.send().await?;
        let status = response.status();
        log::debug!("GET {} -> {} in {:?}", endpoint, status, start.elapsed());

        if status.is_client_error() || status.is_server_error() {
            let body = read_capped(response, MAX_ERROR_BODY).await?;
            return Err(WikidataError::Remote {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Read at most `limit` bytes of the body, chunk by chunk.
async fn read_capped(mut response: reqwest::Response, limit: usize) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    while body.len() < limit {
        let Some(chunk) = response.chunk().await? else {
            break;
        };
        body.extend_from_slice(&chunk);
    }
    body.truncate(limit);
    Ok(body)
}
