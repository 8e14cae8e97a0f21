//! Object-oriented searching and filtering of Solr results.
//!
//! [`SolrQuerySet`] accumulates search, filter, facet, stats, and
//! highlighting options through chained calls and translates them into the
//! parameter set the select handler expects. [`AliasedSolrQuerySet`] adds a
//! readable-alias layer over raw Solr field names.

mod aliased;
mod lookup;
mod queryset;

pub use aliased::AliasedSolrQuerySet;
pub use lookup::Lookup;
pub use queryset::SolrQuerySet;
