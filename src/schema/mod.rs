// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Declarative Solr schema configuration and synchronization.
//!
//! Declare the fields, field types, and copy fields your project needs,
//! then sync the declaration into a live core with [`sync_schema`] (or the
//! individual `configure_*` methods). Synchronization diffs the declaration
//! against what the core reports and applies only the changes.
//!
//! # Example
//!
//! ```rust,no_run
//! use solr_kit::schema::{Analyzer, SchemaConfig, SolrField, SolrFieldType};
//!
//! let analyzer = Analyzer::new("solr.StandardTokenizerFactory")
//!     .filter(serde_json::json!({"class": "solr.LowerCaseFilterFactory"}))
//!     .filter(serde_json::json!({"class": "solr.PorterStemFilterFactory"}));
//!
//! let schema = SchemaConfig::new()
//!     .field_type(SolrFieldType::new("text_en", "solr.TextField", analyzer))
//!     .field(SolrField::new("author", "text_en"))
//!     .field(SolrField::new("author_exact", "string"))
//!     .field(SolrField::new("collections", "text_en").multivalued(true))
//!     .copy_field("author", ["author_exact"])
//!     .copy_field("collections", ["collections_s"]);
//! ```

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::client::SolrClient;
use crate::error::SolrError;

/// A declared schema field.
#[derive(Debug, Clone, PartialEq)]
pub struct SolrField {
    pub name: String,
    pub field_type: String,
    pub required: bool,
    pub multivalued: bool,
    pub stored: bool,
    pub default: Option<String>,
}

impl SolrField {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            required: false,
            multivalued: false,
            stored: true,
            default: None,
        }
    }

    /// Shorthand for a `string` field.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, "string")
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn multivalued(mut self, multivalued: bool) -> Self {
        self.multivalued = multivalued;
        self
    }

    pub fn stored(mut self, stored: bool) -> Self {
        self.stored = stored;
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Render the Schema API definition body for this field.
    pub fn definition(&self) -> Value {
        let mut definition = json!({
            "name": self.name,
            "type": self.field_type,
            "required": self.required,
            "multiValued": self.multivalued,
            "stored": self.stored,
        });
        if let Some(default) = &self.default {
            definition["default"] = json!(default);
        }
        definition
    }
}

/// A field analyzer declaration: tokenizer plus filter chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Analyzer {
    pub tokenizer: String,
    pub filters: Vec<Value>,
}

impl Analyzer {
    pub fn new(tokenizer: impl Into<String>) -> Self {
        Self {
            tokenizer: tokenizer.into(),
            filters: Vec::new(),
        }
    }

    pub fn filter(mut self, filter: Value) -> Self {
        self.filters.push(filter);
        self
    }

    /// Render the analyzer in Solr config form.
    pub fn as_solr_config(&self) -> Value {
        json!({
            "tokenizer": {"class": self.tokenizer},
            "filters": self.filters,
        })
    }
}

/// A declared field type with its analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct SolrFieldType {
    pub name: String,
    pub class: String,
    pub analyzer: Analyzer,
    pub opts: Vec<(String, Value)>,
}

impl SolrFieldType {
    pub fn new(name: impl Into<String>, class: impl Into<String>, analyzer: Analyzer) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            analyzer,
            opts: Vec::new(),
        }
    }

    /// Additional field type options (e.g. `positionIncrementGap`).
    pub fn opt(mut self, key: impl Into<String>, value: Value) -> Self {
        self.opts.push((key.into(), value));
        self
    }

    /// Render the Schema API definition body for this field type.
    pub fn definition(&self) -> Value {
        let mut definition = json!({
            "name": self.name,
            "class": self.class,
            "analyzer": self.analyzer.as_solr_config(),
        });
        for (key, value) in &self.opts {
            definition[key] = value.clone();
        }
        definition
    }
}

/// Counts of changes applied by a configure pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaCounts {
    pub added: usize,
    pub replaced: usize,
    pub deleted: usize,
}

/// Report returned by [`sync_schema`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaReport {
    /// Whether the core had to be created first
    pub core_created: bool,
    pub field_types: SchemaCounts,
    pub fields: SchemaCounts,
}

/// Declarative schema: fields, field types, and copy fields.
#[derive(Debug, Clone, Default)]
pub struct SchemaConfig {
    pub fields: Vec<SolrField>,
    pub field_types: Vec<SolrFieldType>,
    /// source field -> destination fields
    pub copy_fields: Vec<(String, Vec<String>)>,
}

impl SchemaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: SolrField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field_type(mut self, field_type: SolrFieldType) -> Self {
        self.field_types.push(field_type);
        self
    }

    pub fn copy_field<I, S>(mut self, source: impl Into<String>, dests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.copy_fields
            .push((source.into(), dests.into_iter().map(Into::into).collect()));
        self
    }

    fn declared_field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.name.as_str()).collect()
    }

    /// Destination list declared for a source field, if any.
    fn declared_copy_dests(&self, source: &str) -> Option<&[String]> {
        self.copy_fields
            .iter()
            .find(|(declared, _)| declared == source)
            .map(|(_, dests)| dests.as_slice())
    }

    /// Update the core's schema to match the declared fields.
    ///
    /// Copy fields are synced *after* new fields are created and *before*
    /// stale fields are removed, since an outdated copy field referencing a
    /// stale field would prevent its removal.
    pub fn configure_fields(&self, solr: &SolrClient) -> Result<SchemaCounts, SolrError> {
        let current: Vec<String> = solr
            .schema
            .list_fields(&[], false, false)?
            .iter()
            .filter_map(|field| field.get("name").and_then(Value::as_str))
            .map(str::to_string)
            .collect();

        let mut counts = SchemaCounts::default();

        for field in &self.fields {
            if current.iter().any(|name| name == &field.name) {
                // no check whether the definition actually changed; replace
                // is idempotent on Solr's side
                debug!("Replace schema field {}", field.name);
                solr.schema.replace_field(field.definition())?;
                counts.replaced += 1;
            } else {
                debug!("Adding schema field {}", field.name);
                solr.schema.add_field(field.definition())?;
                counts.added += 1;
            }
        }

        self.configure_copy_fields(solr)?;

        let declared = self.declared_field_names();
        for name in &current {
            // don't remove special fields!
            if name == "id" || name.starts_with('_') {
                continue;
            }
            if !declared.contains(&name.as_str()) {
                debug!("Delete schema field {}", name);
                solr.schema.delete_field(name)?;
                counts.deleted += 1;
            }
        }

        Ok(counts)
    }

    /// Update the core's copy fields to match the declaration.
    pub fn configure_copy_fields(&self, solr: &SolrClient) -> Result<(), SolrError> {
        let current = solr.schema.list_copy_fields(&[], &[])?;

        // add declared copy fields that are not already present
        for (source, dests) in &self.copy_fields {
            for dest in dests {
                let present = current
                    .iter()
                    .any(|rule| &rule.source == source && &rule.dest == dest);
                if !present {
                    debug!("Adding copy field {} -> {}", source, dest);
                    solr.schema.add_copy_field(source, dest, None)?;
                }
            }
        }

        // delete previous copy fields that are no longer declared
        for rule in &current {
            let keep = self
                .declared_copy_dests(&rule.source)
                .is_some_and(|dests| dests.iter().any(|dest| dest == &rule.dest));
            if !keep {
                debug!("Deleting copy field {} -> {}", rule.source, rule.dest);
                solr.schema.delete_copy_field(&rule.source, &rule.dest)?;
            }
        }

        Ok(())
    }

    /// Update the core's schema to include the declared field types.
    ///
    /// Stale field types are never deleted: distinguishing project types
    /// from Solr's own predefined ones would need a list that drifts across
    /// Solr versions.
    pub fn configure_field_types(&self, solr: &SolrClient) -> Result<SchemaCounts, SolrError> {
        let mut counts = SchemaCounts::default();

        if self.field_types.is_empty() {
            return Ok(counts);
        }

        let current: Vec<String> = solr
            .schema
            .list_field_types(true)?
            .iter()
            .filter_map(|ftype| ftype.get("name").and_then(Value::as_str))
            .map(str::to_string)
            .collect();

        for field_type in &self.field_types {
            if current.iter().any(|name| name == &field_type.name) {
                debug!("Updating field type {}", field_type.name);
                solr.schema.replace_field_type(field_type.definition())?;
                counts.replaced += 1;
            } else {
                debug!("Adding field type {}", field_type.name);
                solr.schema.add_field_type(field_type.definition())?;
                counts.added += 1;
            }
        }

        Ok(counts)
    }
}

/// Synchronize a schema declaration into the configured core.
///
/// Pings the core and creates it (with the configured config set) when
/// missing, syncs field types, fields, and copy fields, then reloads the
/// core so the changes take effect. The original manage command prompted
/// before creating; pass `create_core = false` to fail instead.
pub fn sync_schema(
    solr: &SolrClient,
    schema: &SchemaConfig,
    create_core: bool,
) -> Result<SchemaReport, SolrError> {
    let collection = solr.collection().to_string();
    let mut report = SchemaReport::default();

    if !solr.core_admin.ping(&collection)? {
        if !create_core {
            return Err(SolrError::Config(format!(
                "Solr core {} does not exist",
                collection
            )));
        }
        let config_set = solr.config().config_set.clone();
        warn!("Solr core {} does not exist; creating it", collection);
        solr.core_admin.create(&collection, Some(&config_set))?;
        report.core_created = true;
    }

    report.field_types = schema.configure_field_types(solr)?;
    report.fields = schema.configure_fields(solr)?;

    // reload so schema changes take effect
    solr.core_admin.reload(&collection)?;

    info!(
        "Schema sync: {} field type(s) added, {} replaced; {} field(s) added, {} replaced, {} deleted",
        report.field_types.added,
        report.field_types.replaced,
        report.fields.added,
        report.fields.replaced,
        report.fields.deleted,
    );

    Ok(report)
}
