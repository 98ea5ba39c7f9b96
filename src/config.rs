use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_WIKIDATA_API_URL: &str = "https://www.wikidata.org/w/api.php";
pub const DEFAULT_WIKIDATA_QUERY_URL: &str = "https://query.wikidata.org/sparql";
pub const DEFAULT_TEXTIFIER_URL: &str = "https://wd-textify.wmcloud.org";
pub const DEFAULT_VECTOR_SEARCH_URL: &str = "https://wd-vectordb.wmcloud.org";
pub const DEFAULT_TIMEOUT_SECS: f64 = 15.0;

/// Config file consulted when `WIKIDATA_CLI_CONFIG` is not set.
const DEFAULT_CONFIG_FILE: &str = "wikidata-cli.toml";

/// Endpoints and HTTP settings for all remote services
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub wikidata_api_url: String,
    pub wikidata_query_url: String,
    pub textifier_url: String,
    pub vector_search_url: String,
    /// Sent as `x-api-secret` to the vector search service when non-empty
    pub vector_api_secret: String,
    pub user_agent: String,
    pub timeout_secs: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wikidata_api_url: DEFAULT_WIKIDATA_API_URL.to_string(),
            wikidata_query_url: DEFAULT_WIKIDATA_QUERY_URL.to_string(),
            textifier_url: DEFAULT_TEXTIFIER_URL.to_string(),
            vector_search_url: DEFAULT_VECTOR_SEARCH_URL.to_string(),
            vector_api_secret: String::new(),
            user_agent: default_user_agent(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_user_agent() -> String {
    format!("wikidata-cli/{}", env!("CARGO_PKG_VERSION"))
}

/// Overrides taken from command-line flags; `None` keeps the loaded value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub wikidata_api_url: Option<String>,
    pub wikidata_query_url: Option<String>,
    pub textifier_url: Option<String>,
    pub vector_search_url: Option<String>,
    pub vector_api_secret: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_secs: Option<f64>,
}

impl Config {
    /// Load configuration
    ///
    /// Loads environment variables from .env file (if present) first. Sources, later
    /// ones winning:
    /// 1. Built-in defaults
    /// 2. TOML file at WIKIDATA_CLI_CONFIG (must exist when set), otherwise
    ///    ./wikidata-cli.toml if present
    /// 3. Environment variables (WD_API_URI, WD_QUERY_URI, TEXTIFIER_URI, ...)
    pub fn load() -> Result<Self> {
        let _ = dotenv::dotenv();

        let mut config = match std::env::var("WIKIDATA_CLI_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(path.trim()))?,
            _ => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML config file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply environment overrides through `lookup` so tests need not touch the
    /// process environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get("WD_API_URI") {
            self.wikidata_api_url = v;
        }
        if let Some(v) = get("WD_QUERY_URI") {
            self.wikidata_query_url = v;
        }
        // TEXTIFER_URI is a historical misspelling still honoured first.
        if let Some(v) = get("TEXTIFER_URI").or_else(|| get("TEXTIFIER_URI")) {
            self.textifier_url = v;
        }
        if let Some(v) = get("VECTOR_SEARCH_URI") {
            self.vector_search_url = v;
        }
        if let Some(v) = get("WD_VECTORDB_API_SECRET") {
            self.vector_api_secret = v;
        }
        if let Some(v) = get("USER_AGENT") {
            self.user_agent = v;
        }
        if let Some(v) = get("REQUEST_TIMEOUT_SECONDS") {
            match v.parse::<f64>() {
                Ok(secs) if timeout_duration(secs).is_some() => self.timeout_secs = secs,
                _ => log::warn!("Ignoring invalid REQUEST_TIMEOUT_SECONDS value: {}", v),
            }
        }
    }

    /// Apply command-line overrides.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        let ConfigOverrides {
            wikidata_api_url,
            wikidata_query_url,
            textifier_url,
            vector_search_url,
            vector_api_secret,
            user_agent,
            timeout_secs,
        } = overrides;

        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        if let Some(v) = non_blank(wikidata_api_url) {
            self.wikidata_api_url = v;
        }
        if let Some(v) = non_blank(wikidata_query_url) {
            self.wikidata_query_url = v;
        }
        if let Some(v) = non_blank(textifier_url) {
            self.textifier_url = v;
        }
        if let Some(v) = non_blank(vector_search_url) {
            self.vector_search_url = v;
        }
        if let Some(v) = vector_api_secret {
            self.vector_api_secret = v.trim().to_string();
        }
        if let Some(v) = user_agent {
            self.user_agent = v;
        }
        if let Some(v) = timeout_secs {
            self.timeout_secs = v;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("wikidata api url", &self.wikidata_api_url),
            ("wikidata query url", &self.wikidata_query_url),
            ("textifier url", &self.textifier_url),
            ("vector search url", &self.vector_search_url),
        ] {
            let parsed = url::Url::parse(value)
                .with_context(|| format!("invalid {}: {}", name, value))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                anyhow::bail!("invalid {}: {} (expected http or https)", name, value);
            }
        }

        if !(self.timeout_secs > 0.0 && self.timeout_secs.is_finite()) {
            anyhow::bail!("timeout must be greater than zero");
        }
        if timeout_duration(self.timeout_secs).is_none() {
            anyhow::bail!("timeout is too large: {} seconds", self.timeout_secs);
        }

        if self.user_agent.trim().is_empty() {
            anyhow::bail!("user agent cannot be empty");
        }

        Ok(())
    }

    /// Request timeout; an unvalidated out-of-range value falls back to the default.
    pub fn timeout(&self) -> Duration {
        timeout_duration(self.timeout_secs)
            .unwrap_or_else(|| Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS))
    }
}

/// `secs` as a `Duration` when it is positive and representable.
fn timeout_duration(secs: f64) -> Option<Duration> {
    if secs <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(secs).ok()
}
