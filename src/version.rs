use serde::Serialize;

/// Build metadata reported by the `version` command.
///
/// Passed explicitly to the command layer instead of living in globals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: String,
    pub commit: String,
    pub date: String,
}

impl BuildInfo {
    /// Package version plus optional `WIKIDATA_CLI_COMMIT` / `WIKIDATA_CLI_BUILD_DATE`
    /// captured at compile time.
    pub fn from_env() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit: option_env!("WIKIDATA_CLI_COMMIT").unwrap_or("").to_string(),
            date: option_env!("WIKIDATA_CLI_BUILD_DATE").unwrap_or("").to_string(),
        }
    }

    /// Copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            version: self.version.trim().to_string(),
            commit: self.commit.trim().to_string(),
            date: self.date.trim().to_string(),
        }
    }

    /// `version`, or `version (commit date)` when either is known; a blank
    /// version reads as `dev`.
    pub fn render_text(&self) -> String {
        let info = self.trimmed();
        let version = if info.version.is_empty() {
            "dev"
        } else {
            info.version.as_str()
        };

        if info.commit.is_empty() && info.date.is_empty() {
            version.to_string()
        } else {
            format!("{} ({} {})", version, info.commit, info.date)
        }
    }
}
