//! Queryset layer with readable aliases for Solr fields.

use serde_json::Value;

use super::lookup::Lookup;
use super::queryset::SolrQuerySet;
use crate::client::{FacetCounts, SolrClient};
use crate::error::SolrError;

/// A [`SolrQuerySet`] wrapper that maps application-readable field names to
/// the concrete Solr fields behind them (useful with dynamic field types).
///
/// The alias map seeds the default field list as `alias:solr_field`
/// projections, and aliases resolve in filter and search keys, facet, sort,
/// and field-limit arguments, and highlight fields. Names without an alias
/// pass through untouched.
///
/// ```rust,no_run
/// # use solr_kit::{AliasedSolrQuerySet, SolrClient};
/// # fn example(client: &SolrClient) {
/// let qs = AliasedSolrQuerySet::new(
///     client,
///     [("name", "name_t"), ("year", "birth_year_i")],
/// );
/// let opts = qs.filter("year", "1900").query_opts();
/// # }
/// ```
#[derive(Clone)]
pub struct AliasedSolrQuerySet<'a> {
    qs: SolrQuerySet<'a>,
    field_aliases: Vec<(String, String)>,
}

impl<'a> AliasedSolrQuerySet<'a> {
    pub fn new<I, K, V>(solr: &'a SolrClient, aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let field_aliases: Vec<(String, String)> = aliases
            .into_iter()
            .map(|(alias, field)| (alias.into(), field.into()))
            .collect();

        // default field list projects every alias
        let field_list: Vec<String> = field_aliases
            .iter()
            .map(|(alias, field)| format!("{}:{}", alias, field))
            .collect();
        let qs = SolrQuerySet::new(solr).only(field_list);

        Self { qs, field_aliases }
    }

    /// Resolve an alias to its Solr field; unknown names pass through.
    fn unalias<'n>(&'n self, name: &'n str) -> &'n str {
        self.field_aliases
            .iter()
            .find(|(alias, _)| alias == name)
            .map(|(_, field)| field.as_str())
            .unwrap_or(name)
    }

    fn map(mut self, f: impl FnOnce(SolrQuerySet<'a>) -> SolrQuerySet<'a>) -> Self {
        self.qs = f(self.qs);
        self
    }

    pub fn search(self, field: &str, lookup: impl Into<Lookup>) -> Self {
        let field = self.unalias(field).to_string();
        self.map(|qs| qs.search(&field, lookup))
    }

    pub fn filter(self, field: &str, lookup: impl Into<Lookup>) -> Self {
        let field = self.unalias(field).to_string();
        self.map(|qs| qs.filter(&field, lookup))
    }

    pub fn filter_tag(self, field: &str, lookup: impl Into<Lookup>, tag: &str) -> Self {
        let field = self.unalias(field).to_string();
        let tag = tag.to_string();
        self.map(|qs| qs.filter_tag(&field, lookup, &tag))
    }

    pub fn order_by(self, field: &str) -> Self {
        // preserve the descending marker while unaliasing
        let (prefix, name) = match field.strip_prefix('-') {
            Some(name) => ("-", name),
            None => ("", field),
        };
        let resolved = format!("{}{}", prefix, self.unalias(name));
        self.map(|qs| qs.order_by(&resolved))
    }

    pub fn only<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let resolved: Vec<String> = fields
            .into_iter()
            .map(|field| self.unalias(field.as_ref()).to_string())
            .collect();
        self.map(|qs| qs.only(resolved))
    }

    pub fn facet<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let resolved: Vec<String> = fields
            .into_iter()
            .map(|field| self.unalias(field.as_ref()).to_string())
            .collect();
        self.map(|qs| qs.facet(resolved))
    }

    pub fn facet_field(self, field: &str) -> Self {
        let field = self.unalias(field).to_string();
        self.map(|qs| qs.facet_field(&field))
    }

    pub fn facet_field_excluded(self, field: &str, exclude: &str) -> Self {
        let field = self.unalias(field).to_string();
        let exclude = exclude.to_string();
        self.map(|qs| qs.facet_field_excluded(&field, &exclude))
    }

    pub fn facet_range(
        self,
        field: &str,
        start: impl ToString,
        end: impl ToString,
        gap: impl ToString,
    ) -> Self {
        let field = self.unalias(field).to_string();
        self.map(|qs| qs.facet_range(&field, start, end, gap))
    }

    pub fn highlight(self, field: &str) -> Self {
        let field = self.unalias(field).to_string();
        self.map(|qs| qs.highlight(&field))
    }

    pub fn highlight_opt(self, field: &str, opt: &str, value: impl ToString) -> Self {
        let field = self.unalias(field).to_string();
        let opt = opt.to_string();
        self.map(|qs| qs.highlight_opt(&field, &opt, value))
    }

    // passthroughs for options that carry no field names

    pub fn search_raw(self, query: impl Into<String>) -> Self {
        self.map(|qs| qs.search_raw(query))
    }

    pub fn filter_raw(self, filter: impl Into<String>) -> Self {
        self.map(|qs| qs.filter_raw(filter))
    }

    pub fn raw_query_param(self, key: &str, value: impl ToString) -> Self {
        self.map(|qs| qs.raw_query_param(key, value))
    }

    pub fn set_limits(self, start: usize, stop: Option<usize>) -> Self {
        self.map(|qs| qs.set_limits(start, stop))
    }

    pub fn none(self) -> Self {
        self.map(SolrQuerySet::none)
    }

    // execution helpers delegate to the underlying queryset

    pub fn query_opts(&self) -> Vec<(String, String)> {
        self.qs.query_opts()
    }

    pub fn get_results(&mut self) -> Result<Vec<Value>, SolrError> {
        self.qs.get_results()
    }

    pub fn count(&self) -> Result<u64, SolrError> {
        self.qs.count()
    }

    pub fn get_facets(&self) -> Result<FacetCounts, SolrError> {
        self.qs.get_facets()
    }

    pub fn get_stats(&self) -> Result<Value, SolrError> {
        self.qs.get_stats()
    }

    pub fn get_highlighting(&mut self) -> Result<Value, SolrError> {
        self.qs.get_highlighting()
    }

    /// Consume the alias layer and return the plain queryset.
    pub fn into_queryset(self) -> SolrQuerySet<'a> {
        self.qs
    }
}
