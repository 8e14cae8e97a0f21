//! API handler for the Solr Schema API.
//!
//! Mutations POST a single-command body (`{"add-field": {...}}`) to the
//! schema handler; listings GET the `fields`, `copyfields`, and
//! `fieldtypes` sub-resources.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use super::{bool_param, Requestor};
use crate::error::SolrError;
use crate::http::HttpRequest;
use crate::metrics;

/// A copy field rule as returned by Solr.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CopyField {
    pub source: String,
    pub dest: String,
    #[serde(default, rename = "maxChars")]
    pub max_chars: Option<u64>,
}

/// API handler for managing a collection's schema.
pub struct SchemaApi {
    requestor: Arc<Requestor>,
    url: String,
}

impl SchemaApi {
    pub(crate) fn new(requestor: Arc<Requestor>, url: String) -> Self {
        Self { requestor, url }
    }

    /// Post a single schema command with its definition.
    fn post_command(&self, command: &str, definition: Value) -> Result<(), SolrError> {
        let body = serde_json::to_string(&json!({ command: definition }))?;
        let request = HttpRequest::post(&self.url).with_json_body(body);
        match self.requestor.send("schema", request) {
            Ok(_) => {
                metrics::record_schema_operation(command, "success");
                Ok(())
            }
            Err(err) => {
                metrics::record_schema_operation(command, "error");
                Err(err)
            }
        }
    }

    /// Add a field with the supplied definition.
    pub fn add_field(&self, definition: Value) -> Result<(), SolrError> {
        self.post_command("add-field", definition)
    }

    /// Replace a field with the supplied definition. Must be a full
    /// redefinition, not a partial update.
    pub fn replace_field(&self, definition: Value) -> Result<(), SolrError> {
        self.post_command("replace-field", definition)
    }

    /// Delete a field by name.
    pub fn delete_field(&self, name: &str) -> Result<(), SolrError> {
        self.post_command("delete-field", json!({ "name": name }))
    }

    /// Add a copy field between two existing fields.
    pub fn add_copy_field(
        &self,
        source: &str,
        dest: &str,
        max_chars: Option<u64>,
    ) -> Result<(), SolrError> {
        let mut definition = json!({ "source": source, "dest": dest });
        if let Some(max_chars) = max_chars {
            definition["maxChars"] = json!(max_chars);
        }
        self.post_command("add-copy-field", definition)
    }

    /// Delete a copy field rule.
    pub fn delete_copy_field(&self, source: &str, dest: &str) -> Result<(), SolrError> {
        self.post_command("delete-copy-field", json!({ "source": source, "dest": dest }))
    }

    /// Add a field type with the supplied definition.
    pub fn add_field_type(&self, definition: Value) -> Result<(), SolrError> {
        self.post_command("add-field-type", definition)
    }

    /// Replace a field type. Must be a full redefinition.
    pub fn replace_field_type(&self, definition: Value) -> Result<(), SolrError> {
        self.post_command("replace-field-type", definition)
    }

    /// Delete a field type by name.
    pub fn delete_field_type(&self, name: &str) -> Result<(), SolrError> {
        self.post_command("delete-field-type", json!({ "name": name }))
    }

    /// Get the full schema for the collection.
    pub fn get_schema(&self) -> Result<Value, SolrError> {
        let output = self.requestor.send("schema", HttpRequest::get(&self.url))?;
        Ok(output.get("schema").cloned().unwrap_or(Value::Null))
    }

    /// List field definitions, optionally filtered by name.
    pub fn list_fields(
        &self,
        fields: &[&str],
        include_dynamic: bool,
        show_defaults: bool,
    ) -> Result<Vec<Value>, SolrError> {
        let mut query: Vec<(String, String)> = Vec::new();
        if !fields.is_empty() {
            query.push(("fl".into(), fields.join(",")));
        }
        query.push(("includeDynamic".into(), bool_param(include_dynamic).into()));
        query.push(("showDefaults".into(), bool_param(show_defaults).into()));

        let url = format!("{}/fields", self.url);
        let output = self
            .requestor
            .send("schema", HttpRequest::get(url).with_query(query))?;
        Ok(output
            .get("fields")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    /// List copy field rules, optionally filtered by source or destination.
    pub fn list_copy_fields(
        &self,
        source_fl: &[&str],
        dest_fl: &[&str],
    ) -> Result<Vec<CopyField>, SolrError> {
        let mut query: Vec<(String, String)> = Vec::new();
        if !source_fl.is_empty() {
            query.push(("source.fl".into(), source_fl.join(",")));
        }
        if !dest_fl.is_empty() {
            query.push(("dest.fl".into(), dest_fl.join(",")));
        }

        let url = format!("{}/copyfields", self.url);
        let output = self
            .requestor
            .send("schema", HttpRequest::get(url).with_query(query))?;
        let copy_fields = output.get("copyFields").cloned().unwrap_or(json!([]));
        Ok(serde_json::from_value(copy_fields)?)
    }

    /// List field types.
    pub fn list_field_types(&self, show_defaults: bool) -> Result<Vec<Value>, SolrError> {
        let url = format!("{}/fieldtypes", self.url);
        let query = vec![("showDefaults".into(), bool_param(show_defaults).into())];
        let output = self
            .requestor
            .send("schema", HttpRequest::get(url).with_query(query))?;
        Ok(output
            .get("fieldTypes")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }
}
