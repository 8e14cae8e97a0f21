//! # solr-kit
//!
//! A lightweight Apache Solr client paired with a queryset-style search
//! builder, declarative schema synchronization, and a model indexing layer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Application Layer                      │
//! │  • Indexable models, IndexRegistry for bulk reindexing     │
//! │  • Declarative SchemaConfig synced into the core           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SolrQuerySet Builder                     │
//! │  • Chained filter/facet/highlight/stats calls              │
//! │  • Translated into select handler parameters               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SolrClient                           │
//! │  • select / update / schema / core-admin handlers          │
//! │  • wt=json, status interpretation, retry, metrics          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                    (sans-io Transport seam)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Solr HTTP API (ureq)                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use solr_kit::{SolrClient, SolrConfig, SolrQuerySet};
//!
//! fn main() -> Result<(), solr_kit::SolrError> {
//!     let config = SolrConfig {
//!         url: "http://localhost:8983/solr".into(),
//!         collection: "mycore".into(),
//!         ..Default::default()
//!     };
//!     let client = SolrClient::new(config)?;
//!
//!     let mut results = SolrQuerySet::new(&client)
//!         .filter("item_type_s", "person")
//!         .search("name", "hem*")
//!         .order_by("sort_name")
//!         .facet(["item_type_s"]);
//!
//!     for doc in results.get_results()? {
//!         println!("{}", doc["id"]);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`client`]: [`SolrClient`] and its handler APIs (select, update,
//!   schema, core admin)
//! - [`query`]: [`SolrQuerySet`] and [`AliasedSolrQuerySet`] builders
//! - [`schema`]: declarative schema configuration and diff-based sync
//! - [`indexing`]: [`Indexable`] items, change hooks, bulk reindexing
//! - [`http`]: the sans-io transport seam (swap in a mock for tests)
//! - [`retry`]: backoff policy for transient transport failures
//! - [`testkit`]: disposable test cores for downstream test suites

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod indexing;
pub mod metrics;
pub mod query;
pub mod retry;
pub mod schema;
pub mod testkit;

pub use client::{
    CoreAdmin, CoreStatus, FacetCounts, Grouped, IndexOptions, QueryResponse, SchemaApi,
    SolrClient, Update,
};
pub use config::SolrConfig;
pub use error::SolrError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use indexing::{
    ClearMode, IndexRegistry, IndexSource, IndexTarget, Indexable, Indexer, ReindexOptions,
};
pub use query::{AliasedSolrQuerySet, Lookup, SolrQuerySet};
pub use retry::RetryConfig;
pub use schema::{Analyzer, SchemaConfig, SchemaCounts, SchemaReport, SolrField, SolrFieldType};
