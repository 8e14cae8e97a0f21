// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Basic solr-kit usage example.
//!
//! Demonstrates:
//! 1. Connecting to a local Solr and creating a scratch core
//! 2. Declaring and syncing a schema
//! 3. Indexing a few documents
//! 4. Querying them back with the queryset builder
//! 5. Cleaning up the core
//!
//! # Prerequisites
//!
//! A running Solr, e.g.:
//! ```bash
//! docker run --rm -p 8983:8983 solr:9
//! ```
//!
//! # Run
//!
//! ```bash
//! cargo run --example basic_usage
//! ```

use serde_json::json;
use solr_kit::schema::sync_schema;
use solr_kit::{
    IndexOptions, Lookup, SchemaConfig, SolrClient, SolrConfig, SolrField, SolrQuerySet,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Simple logging (no filter for simplicity)
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    // ─────────────────────────────────────────────────────────────────────
    // 1. Connect and create a scratch core
    // ─────────────────────────────────────────────────────────────────────
    let config = SolrConfig {
        url: "http://localhost:8983/solr".into(),
        collection: "solr_kit_demo".into(),
        ..Default::default()
    };
    let client = SolrClient::new(config)?;

    // ─────────────────────────────────────────────────────────────────────
    // 2. Declare and sync the schema (creates the core when missing)
    // ─────────────────────────────────────────────────────────────────────
    let schema = SchemaConfig::new()
        .field(SolrField::new("name", "text_general"))
        .field(SolrField::string("item_type_s"))
        .field(SolrField::new("birth_year", "pint"));
    let report = sync_schema(&client, &schema, true)?;
    println!(
        "schema synced: {} added, {} replaced, {} deleted",
        report.fields.added, report.fields.replaced, report.fields.deleted
    );

    // ─────────────────────────────────────────────────────────────────────
    // 3. Index a few documents with a hard commit
    // ─────────────────────────────────────────────────────────────────────
    let docs = vec![
        json!({"id": "person.1", "item_type_s": "person", "name": "Ada Lovelace", "birth_year": 1815}),
        json!({"id": "person.2", "item_type_s": "person", "name": "Alan Turing", "birth_year": 1912}),
        json!({"id": "book.1", "item_type_s": "book", "name": "On Computable Numbers"}),
    ];
    client.update.index(&docs, &IndexOptions::hard_commit())?;

    // ─────────────────────────────────────────────────────────────────────
    // 4. Query with the queryset builder
    // ─────────────────────────────────────────────────────────────────────
    let mut people = SolrQuerySet::new(&client)
        .filter("item_type_s", "person")
        .filter("birth_year", Lookup::range(Some(1800), Some(1900)))
        .order_by("birth_year")
        .facet(["item_type_s"]);

    for doc in people.get_results()? {
        println!("match: {} ({})", doc["name"], doc["birth_year"]);
    }
    println!("total matches: {}", people.count()?);

    for (value, count) in people.get_facets()?.field("item_type_s").unwrap_or(&[]) {
        println!("facet {}: {}", value, count);
    }

    // ─────────────────────────────────────────────────────────────────────
    // 5. Clean up
    // ─────────────────────────────────────────────────────────────────────
    client.update.delete_by_query("*:*")?;
    client.core_admin.unload("solr_kit_demo")?;
    println!("done");

    Ok(())
}
