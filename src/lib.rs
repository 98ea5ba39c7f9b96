pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod format;
pub mod graph;
pub mod model;
pub mod queries;
pub mod version;

pub use client::WikidataClient;
pub use config::Config;
pub use error::{Result, WikidataError};
pub use fetcher::{FetchOptions, RelationFetcher};
pub use graph::{build_relation_graph, render_hierarchy, HierarchyTree, RelationGraph};
pub use queries::{get_instance_and_subclass_hierarchy, get_statement_values, HierarchyResult};
pub use version::BuildInfo;
