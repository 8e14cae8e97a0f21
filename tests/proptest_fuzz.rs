//! Property-based tests (fuzzing) for the queryset builder.
//!
//! Uses proptest to generate arbitrary field names, values, and option
//! combinations and verify the builder never panics and always produces a
//! well-formed parameter list.
//!
//! Run with: `cargo test --test proptest_fuzz`

mod common;

use common::{client_with, MockTransport};
use proptest::prelude::*;
use solr_kit::{Lookup, SolrClient, SolrQuerySet};

fn fuzz_client() -> SolrClient {
    client_with(MockTransport::new())
}

/// Generate strings including Solr-special characters.
fn value_strategy() -> impl Strategy<Value = String> {
    "[ -~]{0,30}"
}

/// Generate plausible-to-hostile field names.
fn field_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z_][a-z0-9_]{0,20}",
        "[ -~]{1,20}",
    ]
}

fn lookup_strategy() -> impl Strategy<Value = Lookup> {
    prop_oneof![
        value_strategy().prop_map(Lookup::Eq),
        prop::collection::vec(value_strategy(), 0..5).prop_map(Lookup::AnyOf),
        any::<bool>().prop_map(Lookup::Exists),
        (
            prop::option::of(any::<i32>()),
            prop::option::of(any::<i32>())
        )
            .prop_map(|(start, end)| Lookup::range(start, end)),
    ]
}

proptest! {
    #[test]
    fn lookup_translation_never_panics(
        field in field_strategy(),
        lookup in lookup_strategy(),
        tag in prop::option::of("[a-z]{1,8}"),
    ) {
        let filter = lookup.to_filter(&field, tag.as_deref());
        // the field name always survives into the filter expression
        prop_assert!(filter.contains(&field));
        if let Some(tag) = tag {
            let tag_prefix = format!("{{!tag={}}}", tag);
            prop_assert!(filter.starts_with(&tag_prefix));
        }
    }

    #[test]
    fn query_opts_always_well_formed(
        filters in prop::collection::vec((field_strategy(), lookup_strategy()), 0..4),
        searches in prop::collection::vec((field_strategy(), value_strategy()), 0..3),
        sorts in prop::collection::vec(field_strategy(), 0..3),
        facets in prop::collection::vec(field_strategy(), 0..3),
        start in 0usize..1000,
        rows in prop::option::of(0usize..1000),
    ) {
        let client = fuzz_client();
        let mut qs = SolrQuerySet::new(&client);
        for (field, lookup) in filters {
            qs = qs.filter(&field, lookup);
        }
        for (field, value) in &searches {
            qs = qs.search(field, value.as_str());
        }
        for field in &sorts {
            qs = qs.order_by(field);
        }
        if !facets.is_empty() {
            qs = qs.facet(facets.clone());
        }
        qs = qs.set_limits(start, rows.map(|r| start + r));

        let opts = qs.query_opts();

        // q is always present and never empty
        let q = opts.iter().find(|(k, _)| k == "q").map(|(_, v)| v.clone());
        prop_assert!(q.is_some());
        prop_assert!(!q.unwrap().is_empty());

        // no empty values survive
        prop_assert!(opts.iter().all(|(_, v)| !v.is_empty()));

        // feature switches only appear when the feature is configured
        let has_facet = opts.iter().any(|(k, _)| k == "facet");
        prop_assert_eq!(has_facet, !facets.is_empty());
    }

    #[test]
    fn set_limits_never_produces_negative_rows(
        start in 0usize..10_000,
        stop in 0usize..10_000,
    ) {
        let client = fuzz_client();
        let opts = SolrQuerySet::new(&client)
            .set_limits(start, Some(stop))
            .query_opts();
        let rows: usize = opts
            .iter()
            .find(|(k, _)| k == "rows")
            .map(|(_, v)| v.parse().unwrap())
            .unwrap();
        // stop below start saturates to zero rows rather than underflowing
        prop_assert_eq!(rows, stop.saturating_sub(start));
    }

    #[test]
    fn facet_opt_prefixing_is_consistent(
        opt in "[a-z.]{1,20}",
        value in "[ -~]{1,20}",
    ) {
        let client = fuzz_client();
        let opts = SolrQuerySet::new(&client)
            .facet(["item_type_s"])
            .facet_opt(&opt, value.clone())
            .query_opts();
        let expected_key = if opt.starts_with("f.") {
            opt.clone()
        } else {
            format!("facet.{}", opt)
        };
        prop_assert!(opts.iter().any(|(k, v)| k == &expected_key && v == &value));
    }
}
