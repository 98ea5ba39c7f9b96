//! SPARQL execution against the Wikidata Query Service.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::WikidataClient;
use crate::error::{Result, WikidataError};

const DEFAULT_ROW_LIMIT: usize = 10;
const GENERIC_FAILURE: &str = "SPARQL query failed";

/// One result row keyed by variable name.
pub type SparqlRow = BTreeMap<String, String>;

/// Query outcome; a rejected query carries only `message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SparqlResult {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vars: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<SparqlRow>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub csv: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
}

#[derive(Deserialize)]
struct SparqlResponse {
    #[serde(default)]
    head: SparqlHead,
    #[serde(default)]
    results: SparqlBindings,
}

#[derive(Deserialize, Default)]
struct SparqlHead {
    #[serde(default)]
    vars: Vec<String>,
}

#[derive(Deserialize, Default)]
struct SparqlBindings {
    #[serde(default)]
    bindings: Vec<HashMap<String, BindingValue>>,
}

#[derive(Deserialize)]
struct BindingValue {
    #[serde(default)]
    value: String,
}

impl WikidataClient {
    /// Run `query` and keep at most `limit` rows (0 means 10).
    ///
    /// An HTTP 400 from the query service is a syntax or evaluation error and is
    /// returned as a message rather than an error.
    pub async fn execute_sparql(&self, query: &str, limit: usize) -> Result<SparqlResult> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WikidataError::invalid_input("SPARQL query cannot be empty"));
        }
        let limit = if limit == 0 { DEFAULT_ROW_LIMIT } else { limit };

        let params = [("query", query.to_string()), ("format", "json".to_string())];
        let response: SparqlResponse = match self
            .get_json(&self.config.wikidata_query_url, &params, &[])
            .await
        {
            Ok(response) => response,
            Err(WikidataError::Remote { status: 400, body }) => {
                return Ok(SparqlResult {
                    message: clean_sparql_error_message(&body),
                    ..Default::default()
                });
            }
            Err(e) => return Err(e),
        };

        let vars = response.head.vars;
        let rows: Vec<SparqlRow> = response
            .results
            .bindings
            .into_iter()
            .take(limit)
            .map(|binding| {
                vars.iter()
                    .map(|var| {
                        let value = binding.get(var).map(|b| b.value.as_str()).unwrap_or("");
                        (var.clone(), shorten_entity_uri(value).to_string())
                    })
                    .collect()
            })
            .collect();
        log::debug!("SPARQL query returned {} rows", rows.len());

        let csv = to_semicolon_csv(&vars, &rows)?;
        Ok(SparqlResult {
            vars,
            rows,
            csv,
            message: String::new(),
        })
    }
}

/// First line of the error body, without the Java stack trace.
fn clean_sparql_error_message(body: &str) -> String {
    let first = body.trim().lines().next().unwrap_or("").trim();
    let message = first.split("\tat ").next().unwrap_or("").trim();
    if message.is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        message.to_string()
    }
}

fn entity_uri_regex() -> &'static Regex {
    static ENTITY_URI: OnceLock<Regex> = OnceLock::new();
    ENTITY_URI.get_or_init(|| {
        Regex::new(r"^http://www\.wikidata\.org/entity/([A-Z]\d+)$").expect("Invalid regex pattern")
    })
}

/// `http://www.wikidata.org/entity/Q42` becomes `Q42`; anything else is unchanged.
fn shorten_entity_uri(value: &str) -> &str {
    entity_uri_regex()
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map_or(value, |m| m.as_str())
}

/// Semicolon CSV with an empty leading header cell and a 0-based row index.
fn to_semicolon_csv(vars: &[String], rows: &[SparqlRow]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());

    let mut header = Vec::with_capacity(vars.len() + 1);
    header.push("");
    header.extend(vars.iter().map(String::as_str));
    writer.write_record(&header)?;

    for (index, row) in rows.iter().enumerate() {
        let mut record = Vec::with_capacity(vars.len() + 1);
        record.push(index.to_string());
        record.extend(vars.iter().map(|var| row.get(var).cloned().unwrap_or_default()));
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| WikidataError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
