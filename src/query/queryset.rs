// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Queryset-style search builder.
//!
//! Filter, search, and sort methods consume the queryset and return it for
//! chaining. For example:
//!
//! ```rust,no_run
//! # use solr_kit::{SolrClient, SolrConfig, SolrQuerySet};
//! # fn example(client: &SolrClient) -> Result<(), solr_kit::SolrError> {
//! let mut results = SolrQuerySet::new(client)
//!     .filter("item_type_s", "person")
//!     .search("name", "hem*")
//!     .order_by("sort_name");
//! let docs = results.get_results()?;
//! # Ok(())
//! # }
//! ```
//!
//! Nothing is sent to Solr until one of the execution helpers runs; the
//! accumulated state is visible through [`SolrQuerySet::query_opts`].

use serde_json::Value;

use super::lookup::Lookup;
use crate::client::{FacetCounts, QueryResponse, SolrClient};
use crate::error::SolrError;

/// Default operator used to combine search terms
const SEARCH_OPERATOR: &str = "AND";

/// A queryset accumulating Solr search options, submitted lazily.
#[derive(Clone)]
pub struct SolrQuerySet<'a> {
    solr: &'a SolrClient,
    start: usize,
    stop: Option<usize>,
    search_qs: Vec<String>,
    filter_qs: Vec<String>,
    sort_options: Vec<String>,
    field_list: Vec<String>,
    highlight_fields: Vec<String>,
    highlight_opts: Vec<(String, String)>,
    facet_field_list: Vec<String>,
    range_facet_fields: Vec<String>,
    facet_opts: Vec<(String, String)>,
    stats_field_list: Vec<String>,
    stats_opts: Vec<(String, String)>,
    raw_params: Vec<(String, String)>,
    result_cache: Option<QueryResponse>,
}

impl<'a> SolrQuerySet<'a> {
    pub fn new(solr: &'a SolrClient) -> Self {
        Self {
            solr,
            start: 0,
            stop: None,
            search_qs: Vec::new(),
            filter_qs: Vec::new(),
            sort_options: Vec::new(),
            field_list: Vec::new(),
            highlight_fields: Vec::new(),
            highlight_opts: Vec::new(),
            facet_field_list: Vec::new(),
            range_facet_fields: Vec::new(),
            facet_opts: Vec::new(),
            stats_field_list: Vec::new(),
            stats_opts: Vec::new(),
            raw_params: Vec::new(),
            result_cache: None,
        }
    }

    // ───────────────────────────────────────────────────────────────────
    // Builder methods
    // ───────────────────────────────────────────────────────────────────

    /// Add a search term on a field. Terms are combined with the default
    /// `AND` operator when constructing the `q` parameter.
    pub fn search(self, field: &str, lookup: impl Into<Lookup>) -> Self {
        let term = lookup.into().to_filter(field, None);
        self.search_raw(term)
    }

    /// Add a search term used unmodified.
    pub fn search_raw(mut self, query: impl Into<String>) -> Self {
        self.search_qs.push(query.into());
        self.invalidate()
    }

    /// Add a filter query on a field. Multiple filters can be chained:
    ///
    /// ```rust,no_run
    /// # use solr_kit::{SolrQuerySet, Lookup};
    /// # fn example(qs: SolrQuerySet) -> SolrQuerySet {
    /// qs.filter("item_type_s", "person")
    ///   .filter("birth_year", Lookup::range(Some(1800), None::<i64>))
    /// # }
    /// ```
    pub fn filter(self, field: &str, lookup: impl Into<Lookup>) -> Self {
        let filter = lookup.into().to_filter(field, None);
        self.filter_raw(filter)
    }

    /// Add a filter query with a tag, for use with facet field exclusions.
    pub fn filter_tag(mut self, field: &str, lookup: impl Into<Lookup>, tag: &str) -> Self {
        self.filter_qs
            .push(lookup.into().to_filter(field, Some(tag)));
        self.invalidate()
    }

    /// Add a filter query used unmodified, e.g. `"birth_year:[1800 TO *]"`.
    pub fn filter_raw(mut self, filter: impl Into<String>) -> Self {
        self.filter_qs.push(filter.into());
        self.invalidate()
    }

    /// Apply a sort option by field name; a leading `-` sorts descending.
    pub fn order_by(mut self, field: &str) -> Self {
        let (field, order) = match field.strip_prefix('-') {
            Some(field) => (field, "desc"),
            None => (field, "asc"),
        };
        self.sort_options.push(format!("{} {}", field, order));
        self.invalidate()
    }

    /// Limit the returned fields to those given, *replacing* any previous
    /// field limits. Aliases use the `alias:solr_field` form.
    pub fn only<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_list = fields.into_iter().map(Into::into).collect();
        self.invalidate()
    }

    /// Like [`only`](Self::only), but appends to previous field limits
    /// instead of replacing them.
    pub fn also<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_list.extend(fields.into_iter().map(Into::into));
        self.invalidate()
    }

    /// Request facets for the given fields, *replacing* any previous facet
    /// field list.
    pub fn facet<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facet_field_list = fields.into_iter().map(Into::into).collect();
        self.invalidate()
    }

    /// Set a faceting option. Keys starting with `f.` (field-specific
    /// options) are used as-is; anything else gets the `facet.` prefix.
    pub fn facet_opt(mut self, opt: &str, value: impl ToString) -> Self {
        let key = if opt.starts_with("f.") {
            opt.to_string()
        } else {
            format!("facet.{}", opt)
        };
        self.facet_opts.push((key, value.to_string()));
        self.invalidate()
    }

    /// Add a single facet field to the current list.
    pub fn facet_field(mut self, field: &str) -> Self {
        self.facet_field_list.push(field.to_string());
        self.invalidate()
    }

    /// Add a facet field that excludes a tagged filter when generating
    /// counts (see [`filter_tag`](Self::filter_tag)).
    pub fn facet_field_excluded(mut self, field: &str, exclude: &str) -> Self {
        let entry = if exclude.is_empty() {
            field.to_string()
        } else {
            format!("{{!ex={}}}{}", exclude, field)
        };
        self.facet_field_list.push(entry);
        self.invalidate()
    }

    /// Set a field-specific facet option: `f.<field>.facet.<opt>`.
    pub fn facet_field_opt(mut self, field: &str, opt: &str, value: impl ToString) -> Self {
        self.facet_opts
            .push((format!("f.{}.facet.{}", field, opt), value.to_string()));
        self.invalidate()
    }

    /// Request range faceting for a field. Start, end, and gap are required
    /// by Solr; further options can be set with
    /// [`facet_range_opt`](Self::facet_range_opt).
    pub fn facet_range(
        mut self,
        field: &str,
        start: impl ToString,
        end: impl ToString,
        gap: impl ToString,
    ) -> Self {
        self.range_facet_fields.push(field.to_string());
        self.facet_opts.push((
            format!("f.{}.facet.range.start", field),
            start.to_string(),
        ));
        self.facet_opts
            .push((format!("f.{}.facet.range.end", field), end.to_string()));
        self.facet_opts
            .push((format!("f.{}.facet.range.gap", field), gap.to_string()));
        self.invalidate()
    }

    /// Set a field-specific range facet option: `f.<field>.facet.range.<opt>`.
    pub fn facet_range_opt(mut self, field: &str, opt: &str, value: impl ToString) -> Self {
        self.facet_opts
            .push((format!("f.{}.facet.range.{}", field, opt), value.to_string()));
        self.invalidate()
    }

    /// Request stats for the given fields, *replacing* any previous stats
    /// field list. Local params may ride along with the field names, e.g.
    /// `{!ex=filterA}account_start_i`.
    pub fn stats<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stats_field_list = fields.into_iter().map(Into::into).collect();
        self.invalidate()
    }

    /// Set a stats option. Keys already starting with `stats` are used
    /// as-is; anything else gets the `stats.` prefix.
    pub fn stats_opt(mut self, opt: &str, value: impl ToString) -> Self {
        let key = if opt.starts_with("stats") {
            opt.to_string()
        } else {
            format!("stats.{}", opt)
        };
        self.stats_opts.push((key, value.to_string()));
        self.invalidate()
    }

    /// Enable highlighting on a field.
    pub fn highlight(mut self, field: &str) -> Self {
        self.highlight_fields.push(field.to_string());
        self.invalidate()
    }

    /// Set a field-specific highlighting option: `f.<field>.hl.<opt>`.
    ///
    /// ```rust,no_run
    /// # use solr_kit::SolrQuerySet;
    /// # fn example(qs: SolrQuerySet) -> SolrQuerySet {
    /// qs.highlight("content")
    ///   .highlight_opt("content", "snippets", 3)
    ///   .highlight_opt("content", "method", "unified")
    /// # }
    /// ```
    pub fn highlight_opt(mut self, field: &str, opt: &str, value: impl ToString) -> Self {
        self.highlight_opts
            .push((format!("f.{}.hl.{}", field, opt), value.to_string()));
        self.invalidate()
    }

    /// Add arbitrary raw parameters to the request, e.g. for variables
    /// referenced in join or field queries.
    pub fn raw_query_param(mut self, key: &str, value: impl ToString) -> Self {
        self.raw_params.push((key.to_string(), value.to_string()));
        self.invalidate()
    }

    /// Limit to a subsection of the results.
    pub fn set_limits(mut self, start: usize, stop: Option<usize>) -> Self {
        self.start = start;
        self.stop = stop;
        self.invalidate()
    }

    /// Return a copy of the current queryset.
    pub fn all(&self) -> Self {
        self.clone()
    }

    /// Return a queryset matching nothing.
    pub fn none(mut self) -> Self {
        self.search_qs = vec!["NOT *:*".to_string()];
        self.invalidate()
    }

    // drop any cached response when query state changes
    fn invalidate(mut self) -> Self {
        self.result_cache = None;
        self
    }

    // ───────────────────────────────────────────────────────────────────
    // Parameter construction
    // ───────────────────────────────────────────────────────────────────

    /// Construct the select parameters for the current queryset state.
    pub fn query_opts(&self) -> Vec<(String, String)> {
        let mut opts: Vec<(String, String)> = Vec::new();

        // main query; if no query is defined, find everything
        let q = if self.search_qs.is_empty() {
            "*:*".to_string()
        } else {
            self.search_qs.join(&format!(" {} ", SEARCH_OPERATOR))
        };
        opts.push(("q".into(), q));

        for fq in &self.filter_qs {
            opts.push(("fq".into(), fq.clone()));
        }

        if !self.field_list.is_empty() {
            opts.push(("fl".into(), self.field_list.join(",")));
        }

        if !self.sort_options.is_empty() {
            opts.push(("sort".into(), self.sort_options.join(",")));
        }

        opts.push(("start".into(), self.start.to_string()));
        // use stop if set to limit row numbers
        if let Some(stop) = self.stop {
            opts.push(("rows".into(), stop.saturating_sub(self.start).to_string()));
        }

        self.set_highlighting_opts(&mut opts);
        self.set_faceting_opts(&mut opts);
        self.set_stats_opts(&mut opts);

        opts.extend(self.raw_params.iter().cloned());

        opts.retain(|(_, value)| !value.is_empty());
        opts
    }

    fn set_highlighting_opts(&self, opts: &mut Vec<(String, String)>) {
        if self.highlight_fields.is_empty() {
            return;
        }
        opts.push(("hl".into(), "true".into()));
        opts.push(("hl.fl".into(), self.highlight_fields.join(",")));
        // highlighting options were prefixed when added
        opts.extend(self.highlight_opts.iter().cloned());
    }

    fn set_faceting_opts(&self, opts: &mut Vec<(String, String)>) {
        if self.facet_field_list.is_empty()
            && self.range_facet_fields.is_empty()
            && self.facet_opts.is_empty()
        {
            return;
        }
        opts.push(("facet".into(), "true".into()));
        for field in &self.facet_field_list {
            opts.push(("facet.field".into(), field.clone()));
        }
        for field in &self.range_facet_fields {
            opts.push(("facet.range".into(), field.clone()));
        }
        opts.extend(self.facet_opts.iter().cloned());
    }

    fn set_stats_opts(&self, opts: &mut Vec<(String, String)>) {
        if self.stats_field_list.is_empty() {
            return;
        }
        opts.push(("stats".into(), "true".into()));
        for field in &self.stats_field_list {
            opts.push(("stats.field".into(), field.clone()));
        }
        opts.extend(self.stats_opts.iter().cloned());
    }

    /// Current opts with the given keys replaced (used for count/facet
    /// probes that override rows and feature switches).
    fn opts_with_overrides(&self, overrides: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut opts = self.query_opts();
        opts.retain(|(key, _)| !overrides.iter().any(|(k, _)| k == key));
        opts.extend(
            overrides
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        opts
    }

    // ───────────────────────────────────────────────────────────────────
    // Execution helpers
    // ───────────────────────────────────────────────────────────────────

    /// Query Solr for the current options, populate the result cache, and
    /// return the documents portion of the response.
    pub fn get_results(&mut self) -> Result<Vec<Value>, SolrError> {
        if self.result_cache.is_none() {
            let response = self.solr.query(&self.query_opts())?;
            self.result_cache = Some(response);
        }
        Ok(self
            .result_cache
            .as_ref()
            .map(|response| response.docs.clone())
            .unwrap_or_default())
    }

    /// Full decoded response for the current options, from cache when
    /// available.
    pub fn response(&mut self) -> Result<&QueryResponse, SolrError> {
        if self.result_cache.is_none() {
            let response = self.solr.query(&self.query_opts())?;
            self.result_cache = Some(response);
        }
        Ok(self.result_cache.as_ref().expect("cache populated above"))
    }

    /// Total number of results for the current query.
    ///
    /// Uses the result cache when populated; otherwise issues a probe with
    /// zero rows and faceting/highlighting disabled, without populating the
    /// cache.
    pub fn count(&self) -> Result<u64, SolrError> {
        if let Some(cached) = &self.result_cache {
            return Ok(cached.num_found());
        }
        let opts =
            self.opts_with_overrides(&[("rows", "0"), ("facet", "false"), ("hl", "false")]);
        let response = self.solr.query(&opts)?;
        Ok(response.num_found())
    }

    /// Facet counts for the current query. Runs a zero-row probe when no
    /// results are cached.
    pub fn get_facets(&self) -> Result<FacetCounts, SolrError> {
        if let Some(cached) = &self.result_cache {
            return Ok(cached.facet_counts.clone());
        }
        let opts = self.opts_with_overrides(&[("rows", "0"), ("hl", "false")]);
        let response = self.solr.query(&opts)?;
        Ok(response.facet_counts)
    }

    /// Stats section for the current query. Runs a zero-row probe when no
    /// results are cached.
    pub fn get_stats(&self) -> Result<Value, SolrError> {
        if let Some(cached) = &self.result_cache {
            return Ok(cached.stats.clone());
        }
        let opts = self.opts_with_overrides(&[("rows", "0"), ("hl", "false")]);
        let response = self.solr.query(&opts)?;
        Ok(response.stats)
    }

    /// Highlighting section of the response; populates the result cache.
    pub fn get_highlighting(&mut self) -> Result<Value, SolrError> {
        Ok(self.response()?.highlighting.clone())
    }

    /// Expanded section of the response; populates the result cache.
    pub fn get_expanded(&mut self) -> Result<Value, SolrError> {
        Ok(self.response()?.expanded.clone())
    }
}
