//! Model-based indexing with Solr.
//!
//! Items to be indexed implement [`Indexable`]. At a minimum, implement
//! [`Indexable::index_data`] to include the information to be indexed for
//! the item; the default only carries the index id and item type.
//!
//! Single items are indexed through an [`Indexer`], whose
//! [`item_saved`](Indexer::item_saved) / [`item_deleted`](Indexer::item_deleted)
//! hooks are the change-tracking entry points: call them after your
//! persistence layer commits a save or delete, and the index follows.
//! For bulk work, see [`IndexRegistry`](crate::indexing::IndexRegistry).

mod registry;

pub use registry::{ClearMode, IndexRegistry, IndexSource, IndexTarget, ReindexOptions};

use serde_json::{json, Value};
use tracing::debug;

use crate::client::{IndexOptions, SolrClient};
use crate::error::SolrError;
use crate::metrics;

/// Separator between item type and item id in auto-generated index ids.
pub const ID_SEPARATOR: char = '.';

/// Number of items to index at once when indexing a large number of items.
pub const DEFAULT_CHUNK_SIZE: usize = 150;

/// An item that can be indexed as a Solr document.
pub trait Indexable {
    /// Label for this kind of indexable item. Must be unique across all
    /// indexable items in an application.
    fn index_item_type(&self) -> &str;

    /// Identifier of this item within its type (typically the primary key).
    fn index_item_id(&self) -> String;

    /// Solr identifier. By default, combines the item type and item id
    /// with [`ID_SEPARATOR`].
    fn index_id(&self) -> String {
        format!(
            "{}{}{}",
            self.index_item_type(),
            ID_SEPARATOR,
            self.index_item_id()
        )
    }

    /// Document to index for this item. The default carries the index id
    /// and item type; implementations extend it with their own data.
    fn index_data(&self) -> Value {
        json!({
            "id": self.index_id(),
            "item_type_s": self.index_item_type(),
        })
    }
}

/// Indexes [`Indexable`] items and raw documents into Solr, in chunks.
pub struct Indexer<'a> {
    solr: &'a SolrClient,
    chunk_size: usize,
}

impl<'a> Indexer<'a> {
    pub fn new(solr: &'a SolrClient) -> Self {
        Self {
            solr,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        // a zero chunk size would loop forever
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Index a single item.
    pub fn index(&self, item: &dyn Indexable) -> Result<(), SolrError> {
        self.solr
            .update
            .index(&[item.index_data()], &IndexOptions::default())
    }

    /// Remove a single item from the index by its index id.
    pub fn remove(&self, item: &dyn Indexable) -> Result<(), SolrError> {
        debug!("Deleting document from index with id {}", item.index_id());
        self.solr.update.delete_by_id(&[item.index_id()])
    }

    /// Change hook: call after an item has been saved.
    pub fn item_saved(&self, item: &dyn Indexable) -> Result<(), SolrError> {
        debug!(
            "Indexing {} {}",
            item.index_item_type(),
            item.index_item_id()
        );
        self.index(item)
    }

    /// Change hook: call after an item has been deleted.
    pub fn item_deleted(&self, item: &dyn Indexable) -> Result<(), SolrError> {
        debug!(
            "Removing {} {} from index",
            item.index_item_type(),
            item.index_item_id()
        );
        self.remove(item)
    }

    /// Index documents in chunks, to efficiently handle large batches.
    /// Returns the total number of items indexed.
    pub fn index_items<I>(&self, items: I) -> Result<usize, SolrError>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut count = 0;
        let mut chunk = Vec::with_capacity(self.chunk_size);

        for doc in items {
            chunk.push(doc);
            if chunk.len() >= self.chunk_size {
                count += self.flush_chunk(&mut chunk)?;
            }
        }
        if !chunk.is_empty() {
            count += self.flush_chunk(&mut chunk)?;
        }

        Ok(count)
    }

    fn flush_chunk(&self, chunk: &mut Vec<Value>) -> Result<usize, SolrError> {
        let size = chunk.len();
        self.solr.update.index(chunk, &IndexOptions::default())?;
        metrics::record_index_batch(size);
        debug!("Indexed chunk of {} item(s)", size);
        chunk.clear();
        Ok(size)
    }
}
