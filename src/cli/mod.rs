//! Command-line surface: argument parsing and per-subcommand output.

pub mod output;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;

use crate::client::{SearchKind, WikidataClient};
use crate::config::{Config, ConfigOverrides};
use crate::queries::{get_instance_and_subclass_hierarchy, get_statement_values};
use crate::version::BuildInfo;
use output::{no_results_message, print_json, print_text, search_lines};

#[derive(Parser, Debug)]
#[command(name = "wikidata-cli")]
#[command(about = "Search and explore Wikidata from the command line")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Output JSON to stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// HTTP timeout for outbound requests, in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// User-Agent header used for Wikidata services
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// Wikidata API base URL
    #[arg(long, global = true)]
    pub wikidata_api_url: Option<String>,

    /// Wikidata Query Service URL
    #[arg(long, global = true)]
    pub wikidata_query_url: Option<String>,

    /// Wikidata textifier API URL
    #[arg(long, global = true)]
    pub textifier_url: Option<String>,

    /// Wikidata vector search API URL
    #[arg(long, global = true)]
    pub vector_search_url: Option<String>,

    /// Optional API secret for vector search
    #[arg(long, global = true)]
    pub vector_api_secret: Option<String>,
}

impl GlobalArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            wikidata_api_url: self.wikidata_api_url.clone(),
            wikidata_query_url: self.wikidata_query_url.clone(),
            textifier_url: self.textifier_url.clone(),
            vector_search_url: self.vector_search_url.clone(),
            vector_api_secret: self.vector_api_secret.clone(),
            user_agent: self.user_agent.clone(),
            timeout_secs: self.timeout,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search Wikidata items (QIDs)
    #[command(name = "search-items", visible_alias = "si")]
    SearchItems(SearchArgs),

    /// Search Wikidata properties (PIDs)
    #[command(name = "search-properties", visible_alias = "sp")]
    SearchProperties(SearchArgs),

    /// Return direct Wikidata statements for an entity
    #[command(name = "get-statements", visible_alias = "statements")]
    GetStatements {
        entity_id: String,

        /// Include external identifier statements
        #[arg(long)]
        include_external_ids: bool,

        /// Language code for labels/descriptions
        #[arg(long, default_value = "en")]
        lang: String,
    },

    /// Return detailed values, qualifiers, ranks, and references for a statement
    #[command(
        name = "get-statement-values",
        visible_aliases = ["statement-values", "values"]
    )]
    GetStatementValues {
        entity_id: String,
        property_id: String,

        /// Language code for labels/descriptions
        #[arg(long, default_value = "en")]
        lang: String,
    },

    /// Return a hierarchy based on P31 (instance of) and P279 (subclass of)
    #[command(
        name = "get-instance-and-subclass-hierarchy",
        visible_alias = "hierarchy"
    )]
    GetHierarchy {
        entity_id: String,

        /// Maximum hierarchy depth
        #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
        max_depth: i64,

        /// Language code for labels/descriptions
        #[arg(long, default_value = "en")]
        lang: String,
    },

    /// Execute SPARQL against Wikidata and return semicolon-separated CSV
    #[command(name = "execute-sparql", visible_alias = "sparql")]
    ExecuteSparql(SparqlArgs),

    /// Print build version
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    pub query: String,

    /// Language code for labels/descriptions
    #[arg(long, default_value = "en")]
    pub lang: String,

    /// Maximum search results
    #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
    pub limit: i64,

    /// Disable vector search and use keyword search only
    #[arg(long)]
    pub no_vector: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SparqlArgs {
    /// SPARQL query text
    #[arg(value_name = "QUERY")]
    pub positional: Vec<String>,

    /// SPARQL query string (alternative to positional query argument)
    #[arg(short, long)]
    pub query: Option<String>,

    /// Path to file containing SPARQL query text
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Maximum rows to return
    #[arg(long = "k", default_value_t = 10, allow_negative_numbers = true)]
    pub k: i64,
}

/// Run the parsed command, building the client from `config` when needed.
pub async fn run<W: Write>(cli: &Cli, config: Config, build: &BuildInfo, out: &mut W) -> Result<()> {
    if let Command::Version = cli.command {
        return print_version(build, cli.global.json, out);
    }

    let client = WikidataClient::new(config)?;
    execute(&cli.command, cli.global.json, &client, out).await
}

/// Run a subcommand against an existing client.
pub async fn execute<W: Write>(
    command: &Command,
    json: bool,
    client: &WikidataClient,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::SearchItems(args) => run_search(client, args, SearchKind::Item, json, out).await,
        Command::SearchProperties(args) => {
            run_search(client, args, SearchKind::Property, json, out).await
        }
        Command::GetStatements {
            entity_id,
            include_external_ids,
            lang,
        } => {
            let result = client
                .get_statements(entity_id, *include_external_ids, lang)
                .await?;
            if json {
                return print_json(
                    out,
                    &json!({
                        "entity_id": entity_id,
                        "include_external_ids": include_external_ids,
                        "lang": lang,
                        "result": result,
                    }),
                );
            }
            print_text(out, &result)
        }
        Command::GetStatementValues {
            entity_id,
            property_id,
            lang,
        } => {
            let result = get_statement_values(client, entity_id, property_id, lang).await?;
            if json {
                return print_json(
                    out,
                    &json!({
                        "entity_id": entity_id,
                        "property_id": property_id,
                        "lang": lang,
                        "result": result,
                    }),
                );
            }
            print_text(out, &result)
        }
        Command::GetHierarchy {
            entity_id,
            max_depth,
            lang,
        } => {
            let result =
                get_instance_and_subclass_hierarchy(client, entity_id, *max_depth, lang).await?;
            if json {
                return print_json(
                    out,
                    &json!({
                        "entity_id": entity_id,
                        "max_depth": max_depth,
                        "lang": lang,
                        "result": result,
                    }),
                );
            }
            if let Some(message) = result.message() {
                return print_text(out, message);
            }
            let value = serde_json::to_value(&result)?;
            print_text(out, &serde_json::to_string_pretty(&value["tree"])?)
        }
        Command::ExecuteSparql(args) => {
            let query = resolve_sparql_query(args)?;
            let limit = usize::try_from(args.k).unwrap_or(0);
            let result = client.execute_sparql(&query, limit).await?;
            if json {
                return print_json(
                    out,
                    &json!({
                        "query": query,
                        "limit": args.k,
                        "result": result,
                    }),
                );
            }
            if !result.message.is_empty() {
                return print_text(out, &result.message);
            }
            print_text(out, &result.csv)
        }
        Command::Version => anyhow::bail!("version does not use the Wikidata client"),
    }
}

async fn run_search<W: Write>(
    client: &WikidataClient,
    args: &SearchArgs,
    kind: SearchKind,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let limit = usize::try_from(args.limit).unwrap_or(0);
    let response = client
        .search(&args.query, &args.lang, limit, kind, args.no_vector)
        .await?;

    if json {
        let mut payload = json!({
            "query": args.query,
            "lang": args.lang,
            "limit": args.limit,
            "source": response.source,
            "results": response.results,
        });
        if response.results.is_empty() {
            payload["message"] = json!(no_results_message(kind));
        }
        return print_json(out, &payload);
    }

    if response.results.is_empty() {
        return print_text(out, &no_results_message(kind));
    }
    print_text(out, &search_lines(&response.results))
}

fn print_version<W: Write>(build: &BuildInfo, json: bool, out: &mut W) -> Result<()> {
    if json {
        return print_json(out, &build.trimmed());
    }
    print_text(out, &build.render_text())
}

/// Exactly one query source among the positional argument, `--query` and
/// `--file`; blank sources do not count.
pub fn resolve_sparql_query(args: &SparqlArgs) -> Result<String> {
    if args.positional.len() > 1 {
        anyhow::bail!("expected at most one positional query argument");
    }

    let mut sources = 0;
    let mut query = String::new();

    if let Some(arg) = args.positional.first().filter(|a| !a.trim().is_empty()) {
        sources += 1;
        query = arg.clone();
    }
    if let Some(flag) = args.query.as_ref().filter(|q| !q.trim().is_empty()) {
        sources += 1;
        query = flag.clone();
    }
    if let Some(path) = args
        .file
        .as_ref()
        .filter(|p| !p.as_os_str().to_string_lossy().trim().is_empty())
    {
        sources += 1;
        query = std::fs::read_to_string(path).context("failed to read query file")?;
    }

    match sources {
        0 => anyhow::bail!("provide a query as an argument, via --query, or via --file"),
        1 => {}
        _ => anyhow::bail!(
            "provide only one query source among positional arg, --query, and --file"
        ),
    }

    let query = query.trim();
    if query.is_empty() {
        anyhow::bail!("SPARQL query cannot be empty");
    }
    Ok(query.to_string())
}
