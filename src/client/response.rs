//! Typed access to Solr select responses.
//!
//! Solr encodes facet counts as flat arrays of alternating values and
//! counts; [`QueryResponse::from_json`] pairs them up so callers see them
//! in the order Solr returned them.

use serde_json::{Map, Value};

use crate::error::SolrError;

/// Facet counts section of a select response.
#[derive(Debug, Clone, Default)]
pub struct FacetCounts {
    /// Field facets: field name -> ordered (value, count) pairs
    pub facet_fields: Vec<(String, Vec<(String, u64)>)>,
    /// Range facets: field name -> counts plus range parameters
    pub facet_ranges: Vec<(String, RangeFacetCounts)>,
    /// Query facets: query -> count
    pub facet_queries: Vec<(String, u64)>,
}

impl FacetCounts {
    /// Look up the (value, count) pairs for a facet field.
    pub fn field(&self, name: &str) -> Option<&[(String, u64)]> {
        self.facet_fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, counts)| counts.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.facet_fields.is_empty() && self.facet_ranges.is_empty() && self.facet_queries.is_empty()
    }
}

/// Counts and parameters for one range facet.
#[derive(Debug, Clone, Default)]
pub struct RangeFacetCounts {
    pub counts: Vec<(String, u64)>,
    pub start: Value,
    pub end: Value,
    pub gap: Value,
}

/// One group within a grouped response.
#[derive(Debug, Clone)]
pub struct Group {
    pub value: Value,
    pub num_found: u64,
    pub docs: Vec<Value>,
}

/// Grouped results section, keyed on the `group.field` echoed in the
/// response params. Grouping by query is not supported.
#[derive(Debug, Clone)]
pub struct Grouped {
    pub field: String,
    pub matches: u64,
    pub groups: Vec<Group>,
}

/// A decoded Solr select response.
///
/// Sections that were not requested decode as empty rather than erroring,
/// so one envelope serves plain, faceted, highlighted, and grouped queries.
#[derive(Debug, Clone)]
pub struct QueryResponse {
    /// Query time reported by Solr, in ms
    pub qtime_ms: i64,
    /// Parameters echoed back in the response header
    pub params: Map<String, Value>,
    /// numFound from the document list (0 for grouped responses)
    num_found: u64,
    /// start offset from the document list
    pub start: u64,
    /// Result documents
    pub docs: Vec<Value>,
    /// Facet counts, when faceting was requested
    pub facet_counts: FacetCounts,
    /// Stats section, when stats were requested
    pub stats: Value,
    /// Highlighting section, when highlighting was requested
    pub highlighting: Value,
    /// Expanded section, when collapse/expand was enabled
    pub expanded: Value,
    /// Grouped results, when grouping was requested
    pub grouped: Option<Grouped>,
}

impl QueryResponse {
    /// Decode a select response body.
    pub fn from_json(output: Value) -> Result<Self, SolrError> {
        let params = output
            .pointer("/responseHeader/params")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let qtime_ms = output
            .pointer("/responseHeader/QTime")
            .and_then(Value::as_i64)
            .unwrap_or(0);

        let num_found = output
            .pointer("/response/numFound")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let start = output
            .pointer("/response/start")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let docs = output
            .pointer("/response/docs")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let facet_counts = output
            .get("facet_counts")
            .map(parse_facet_counts)
            .unwrap_or_default();

        let grouped = parse_grouped(&output, &params)?;

        Ok(Self {
            qtime_ms,
            params,
            num_found,
            start,
            docs,
            facet_counts,
            stats: output.get("stats").cloned().unwrap_or(Value::Null),
            highlighting: output.get("highlighting").cloned().unwrap_or(Value::Null),
            expanded: output.get("expanded").cloned().unwrap_or(Value::Null),
            grouped,
        })
    }

    /// Total number of matches: the document list's numFound, or for a
    /// grouped response the match count of the grouping field.
    pub fn num_found(&self) -> u64 {
        match &self.grouped {
            Some(grouped) => grouped.matches,
            None => self.num_found,
        }
    }

    /// Whether this was a grouped response.
    pub fn is_grouped(&self) -> bool {
        self.grouped.is_some()
    }
}

/// Pair up Solr's flat `[value, count, value, count, ...]` facet arrays,
/// preserving response order.
fn pair_counts(flat: &Value) -> Vec<(String, u64)> {
    let Some(items) = flat.as_array() else {
        return Vec::new();
    };
    items
        .chunks(2)
        .filter_map(|pair| match pair {
            [value, count] => Some((
                value
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| value.to_string()),
                count.as_u64().unwrap_or(0),
            )),
            _ => None,
        })
        .collect()
}

fn parse_facet_counts(section: &Value) -> FacetCounts {
    let mut counts = FacetCounts::default();

    if let Some(fields) = section.get("facet_fields").and_then(Value::as_object) {
        for (field, flat) in fields {
            counts.facet_fields.push((field.clone(), pair_counts(flat)));
        }
    }

    if let Some(ranges) = section.get("facet_ranges").and_then(Value::as_object) {
        for (field, range) in ranges {
            counts.facet_ranges.push((
                field.clone(),
                RangeFacetCounts {
                    counts: pair_counts(range.get("counts").unwrap_or(&Value::Null)),
                    start: range.get("start").cloned().unwrap_or(Value::Null),
                    end: range.get("end").cloned().unwrap_or(Value::Null),
                    gap: range.get("gap").cloned().unwrap_or(Value::Null),
                },
            ));
        }
    }

    if let Some(queries) = section.get("facet_queries").and_then(Value::as_object) {
        for (query, count) in queries {
            counts
                .facet_queries
                .push((query.clone(), count.as_u64().unwrap_or(0)));
        }
    }

    counts
}

fn parse_grouped(
    output: &Value,
    params: &Map<String, Value>,
) -> Result<Option<Grouped>, SolrError> {
    let Some(grouped) = output.get("grouped").and_then(Value::as_object) else {
        return Ok(None);
    };

    // group.field as echoed in the params; fall back to the only key in
    // the grouped section when params were not echoed back
    let field = params
        .get("group.field")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| grouped.keys().next().cloned())
        .ok_or_else(|| SolrError::Parse("grouped response without group field".into()))?;

    let Some(section) = grouped.get(&field) else {
        return Ok(Some(Grouped {
            field,
            matches: 0,
            groups: Vec::new(),
        }));
    };

    let matches = section
        .get("matches")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let groups = section
        .get("groups")
        .and_then(Value::as_array)
        .map(|groups| {
            groups
                .iter()
                .map(|group| Group {
                    value: group.get("groupValue").cloned().unwrap_or(Value::Null),
                    num_found: group
                        .pointer("/doclist/numFound")
                        .and_then(Value::as_u64)
                        .unwrap_or(0),
                    docs: group
                        .pointer("/doclist/docs")
                        .and_then(Value::as_array)
                        .cloned()
                        .unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(Some(Grouped {
        field,
        matches,
        groups,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_plain_response() {
        let response = QueryResponse::from_json(json!({
            "responseHeader": {"status": 0, "QTime": 5, "params": {"q": "*:*"}},
            "response": {
                "numFound": 2,
                "start": 0,
                "docs": [{"id": "a"}, {"id": "b"}]
            }
        }))
        .unwrap();

        assert_eq!(response.num_found(), 2);
        assert_eq!(response.start, 0);
        assert_eq!(response.docs.len(), 2);
        assert_eq!(response.qtime_ms, 5);
        assert!(!response.is_grouped());
        assert!(response.facet_counts.is_empty());
    }

    #[test]
    fn facet_pairs_preserve_order() {
        let response = QueryResponse::from_json(json!({
            "responseHeader": {"status": 0},
            "response": {"numFound": 0, "start": 0, "docs": []},
            "facet_counts": {
                "facet_fields": {
                    "item_type_s": ["book", 12, "person", 5, "place", 1]
                }
            }
        }))
        .unwrap();

        let counts = response.facet_counts.field("item_type_s").unwrap();
        assert_eq!(
            counts,
            &[
                ("book".to_string(), 12),
                ("person".to_string(), 5),
                ("place".to_string(), 1)
            ]
        );
    }

    #[test]
    fn range_facets_pair_counts_and_keep_parameters() {
        let response = QueryResponse::from_json(json!({
            "responseHeader": {"status": 0},
            "response": {"numFound": 0, "start": 0, "docs": []},
            "facet_counts": {
                "facet_ranges": {
                    "year_i": {
                        "counts": ["1900", 7, "1910", 3],
                        "start": 1900,
                        "end": 1920,
                        "gap": 10
                    }
                }
            }
        }))
        .unwrap();

        let (field, range) = &response.facet_counts.facet_ranges[0];
        assert_eq!(field, "year_i");
        assert_eq!(range.counts, vec![("1900".to_string(), 7), ("1910".to_string(), 3)]);
        assert_eq!(range.start, json!(1900));
        assert_eq!(range.gap, json!(10));
    }

    #[test]
    fn decodes_grouped_response() {
        let response = QueryResponse::from_json(json!({
            "responseHeader": {"status": 0, "params": {"group.field": "item_type_s"}},
            "grouped": {
                "item_type_s": {
                    "matches": 3,
                    "groups": [
                        {
                            "groupValue": "book",
                            "doclist": {"numFound": 2, "docs": [{"id": "a"}, {"id": "b"}]}
                        },
                        {
                            "groupValue": "person",
                            "doclist": {"numFound": 1, "docs": [{"id": "c"}]}
                        }
                    ]
                }
            }
        }))
        .unwrap();

        assert!(response.is_grouped());
        assert_eq!(response.num_found(), 3);
        let grouped = response.grouped.as_ref().unwrap();
        assert_eq!(grouped.field, "item_type_s");
        assert_eq!(grouped.groups.len(), 2);
        assert_eq!(grouped.groups[0].value, json!("book"));
        assert_eq!(grouped.groups[0].docs.len(), 2);
    }

    #[test]
    fn missing_sections_decode_as_empty() {
        let response = QueryResponse::from_json(json!({
            "responseHeader": {"status": 0},
            "response": {"numFound": 0, "start": 0, "docs": []}
        }))
        .unwrap();

        assert!(response.stats.is_null());
        assert!(response.highlighting.is_null());
        assert!(response.expanded.is_null());
    }
}
