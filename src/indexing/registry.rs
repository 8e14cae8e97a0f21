// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Registry of index sources and the bulk reindex operation.
//!
//! An [`IndexSource`] supplies the documents for one item type (usually by
//! paging a database query). Sources register explicitly on an
//! [`IndexRegistry`], which can then clear and rebuild the index for all
//! types, one type, or specific `type.id` items.

use serde_json::Value;
use tracing::{debug, info};

use super::{Indexer, ID_SEPARATOR};
use crate::client::SolrClient;
use crate::error::SolrError;

/// Supplies index documents for one item type.
pub trait IndexSource {
    /// The item type label this source covers (see
    /// [`Indexable::index_item_type`](super::Indexable::index_item_type)).
    fn item_type(&self) -> &str;

    /// Total number of items this source would index.
    fn total(&self) -> Result<usize, SolrError>;

    /// All documents to index for this type.
    fn documents(&self) -> Result<Box<dyn Iterator<Item = Value> + '_>, SolrError>;

    /// Document for one item id within this type, if the item exists.
    fn document_for_id(&self, item_id: &str) -> Result<Option<Value>, SolrError>;
}

/// What to index in a reindex run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IndexTarget {
    /// Index every registered type
    #[default]
    All,
    /// Clear only; index nothing
    None,
    /// Index a single registered type
    Type(String),
}

/// What to clear before indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearMode {
    /// Remove everything from the index
    All,
    /// Remove one item type from the index
    Type(String),
}

/// Options for [`IndexRegistry::reindex`].
#[derive(Debug, Clone, Default)]
pub struct ReindexOptions {
    pub target: IndexTarget,
    /// Clear some or all indexed data before indexing
    pub clear: Option<ClearMode>,
    /// Specific items to index, as `type.id` index ids. When non-empty,
    /// takes precedence over `target`.
    pub ids: Vec<String>,
}

/// Registry of [`IndexSource`]s, keyed on item type.
#[derive(Default)]
pub struct IndexRegistry {
    sources: Vec<Box<dyn IndexSource>>,
}

impl IndexRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an index source. Later registrations win when two sources
    /// claim the same item type.
    pub fn register(&mut self, source: Box<dyn IndexSource>) {
        debug!("Registering index source for {}", source.item_type());
        self.sources
            .retain(|existing| existing.item_type() != source.item_type());
        self.sources.push(source);
    }

    /// Registered item type labels.
    pub fn item_types(&self) -> Vec<&str> {
        self.sources.iter().map(|source| source.item_type()).collect()
    }

    fn source_for(&self, item_type: &str) -> Result<&dyn IndexSource, SolrError> {
        self.sources
            .iter()
            .find(|source| source.item_type() == item_type)
            .map(|source| source.as_ref())
            .ok_or_else(|| SolrError::UnknownIndexTarget(item_type.to_string()))
    }

    /// Total number of items a reindex of `target` would cover.
    pub fn total_to_index(&self, target: &IndexTarget) -> Result<usize, SolrError> {
        match target {
            IndexTarget::None => Ok(0),
            IndexTarget::All => self.sources.iter().map(|source| source.total()).sum(),
            IndexTarget::Type(item_type) => self.source_for(item_type)?.total(),
        }
    }

    /// Remove items from the index, either everything or one item type.
    pub fn clear(&self, solr: &SolrClient, mode: &ClearMode) -> Result<(), SolrError> {
        let del_query = match mode {
            ClearMode::All => "*:*".to_string(),
            ClearMode::Type(item_type) => {
                // only registered types can be cleared by name
                self.source_for(item_type)?;
                format!("item_type_s:{}", item_type)
            }
        };
        let label = match mode {
            ClearMode::All => "everything",
            ClearMode::Type(item_type) => item_type.as_str(),
        };
        info!("Clearing {} from the index", label);
        solr.update.delete_by_query(&del_query)
    }

    /// Look up the document for one `type.id` index id.
    fn document_for_index_id(&self, index_id: &str) -> Result<Value, SolrError> {
        let (item_type, item_id) = index_id
            .split_once(ID_SEPARATOR)
            .ok_or_else(|| SolrError::UnknownIndexTarget(index_id.to_string()))?;
        let source = self
            .source_for(item_type)
            .map_err(|_| SolrError::UnknownIndexTarget(index_id.to_string()))?;
        source
            .document_for_id(item_id)?
            .ok_or_else(|| SolrError::UnknownIndexTarget(index_id.to_string()))
    }

    /// Clear and rebuild the index per `options`, committing at the end.
    /// Returns the total number of items indexed.
    pub fn reindex(&self, solr: &SolrClient, options: &ReindexOptions) -> Result<usize, SolrError> {
        if let Some(mode) = &options.clear {
            self.clear(solr, mode)?;
        }

        let indexer = Indexer::new(solr);
        let mut count = 0;

        if !options.ids.is_empty() {
            // specific items by id; manual entry, so never very many at once
            let docs: Vec<Value> = options
                .ids
                .iter()
                .map(|index_id| self.document_for_index_id(index_id))
                .collect::<Result<_, _>>()?;
            count += indexer.index_items(docs)?;
        } else {
            if let IndexTarget::Type(item_type) = &options.target {
                // error out early if the requested type was never registered
                self.source_for(item_type)?;
            }

            for source in &self.sources {
                let wanted = match &options.target {
                    IndexTarget::All => true,
                    IndexTarget::None => false,
                    IndexTarget::Type(item_type) => source.item_type() == item_type,
                };
                if !wanted {
                    continue;
                }
                let total = source.total()?;
                info!("Indexing {} ({} item(s))", source.item_type(), total);
                count += indexer.index_items(source.documents()?)?;
            }
        }

        // commit all the indexed changes
        solr.update.commit()?;

        info!("Indexed {} item(s)", count);
        Ok(count)
    }
}
