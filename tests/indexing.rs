//! Indexing layer tests: chunking, registry reindex flows, and the
//! save/delete change hooks.

mod common;

use common::{client_with, param, MockTransport};
use serde_json::{json, Value};
use solr_kit::{
    ClearMode, IndexRegistry, IndexSource, IndexTarget, Indexable, Indexer, ReindexOptions,
    SolrError,
};

struct Person {
    id: u64,
    name: String,
}

impl Indexable for Person {
    fn index_item_type(&self) -> &str {
        "person"
    }

    fn index_item_id(&self) -> String {
        self.id.to_string()
    }

    fn index_data(&self) -> Value {
        json!({
            "id": self.index_id(),
            "item_type_s": self.index_item_type(),
            "name": self.name,
        })
    }
}

/// In-memory index source over a fixed set of people.
struct PeopleSource {
    people: Vec<Person>,
}

impl PeopleSource {
    fn with_count(count: u64) -> Self {
        Self {
            people: (1..=count)
                .map(|id| Person {
                    id,
                    name: format!("Person {}", id),
                })
                .collect(),
        }
    }
}

impl IndexSource for PeopleSource {
    fn item_type(&self) -> &str {
        "person"
    }

    fn total(&self) -> Result<usize, SolrError> {
        Ok(self.people.len())
    }

    fn documents(&self) -> Result<Box<dyn Iterator<Item = Value> + '_>, SolrError> {
        Ok(Box::new(self.people.iter().map(Indexable::index_data)))
    }

    fn document_for_id(&self, item_id: &str) -> Result<Option<Value>, SolrError> {
        Ok(self
            .people
            .iter()
            .find(|person| person.index_item_id() == item_id)
            .map(Indexable::index_data))
    }
}

fn doc_batches(transport: &MockTransport) -> Vec<usize> {
    transport
        .requests()
        .iter()
        .filter(|request| request.url.ends_with("/update/json/docs"))
        .filter_map(|request| {
            let body: Value = serde_json::from_str(request.body.as_deref()?).ok()?;
            Some(body.as_array()?.len())
        })
        .collect()
}

#[test]
fn index_items_chunks_large_batches() {
    let transport = MockTransport::new();
    let client = client_with(transport.clone());

    let docs: Vec<Value> = (0..350).map(|i| json!({"id": format!("person.{i}")})).collect();
    let count = Indexer::new(&client).index_items(docs).unwrap();

    assert_eq!(count, 350);
    // default chunk size of 150: two full chunks plus the remainder
    assert_eq!(doc_batches(&transport), vec![150, 150, 50]);
}

#[test]
fn index_items_custom_chunk_size() {
    let transport = MockTransport::new();
    let client = client_with(transport.clone());

    let docs: Vec<Value> = (0..5).map(|i| json!({"id": format!("person.{i}")})).collect();
    let count = Indexer::new(&client)
        .with_chunk_size(2)
        .index_items(docs)
        .unwrap();

    assert_eq!(count, 5);
    assert_eq!(doc_batches(&transport), vec![2, 2, 1]);
}

#[test]
fn save_hook_indexes_document() {
    let transport = MockTransport::new();
    let client = client_with(transport.clone());

    let person = Person {
        id: 12,
        name: "Ada".into(),
    };
    Indexer::new(&client).item_saved(&person).unwrap();

    let request = transport.last_request();
    assert!(request.url.ends_with("/update/json/docs"));
    let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(body[0]["id"], "person.12");
    assert_eq!(body[0]["name"], "Ada");
}

#[test]
fn delete_hook_removes_by_index_id() {
    let transport = MockTransport::new();
    let client = client_with(transport.clone());

    let person = Person {
        id: 12,
        name: "Ada".into(),
    };
    Indexer::new(&client).item_deleted(&person).unwrap();

    let body: Value =
        serde_json::from_str(transport.last_request().body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({"delete": ["person.12"]}));
}

#[test]
fn reindex_all_indexes_and_commits() {
    let transport = MockTransport::new();
    let client = client_with(transport.clone());

    let mut registry = IndexRegistry::new();
    registry.register(Box::new(PeopleSource::with_count(3)));

    let count = registry
        .reindex(&client, &ReindexOptions::default())
        .unwrap();
    assert_eq!(count, 3);

    assert_eq!(doc_batches(&transport), vec![3, 0]);
    // the trailing empty batch is the hard commit
    let last = transport.last_request();
    assert_eq!(param(&last, "commit"), Some("true"));
}

#[test]
fn reindex_clear_all_deletes_everything_first() {
    let transport = MockTransport::new();
    let client = client_with(transport.clone());

    let mut registry = IndexRegistry::new();
    registry.register(Box::new(PeopleSource::with_count(1)));

    registry
        .reindex(
            &client,
            &ReindexOptions {
                target: IndexTarget::None,
                clear: Some(ClearMode::All),
                ids: Vec::new(),
            },
        )
        .unwrap();

    let first = &transport.requests()[0];
    let body: Value = serde_json::from_str(first.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({"delete": {"query": "*:*"}}));
    // clear-only run indexes nothing besides the final commit
    assert_eq!(doc_batches(&transport), vec![0]);
}

#[test]
fn reindex_clear_single_type_scopes_delete_query() {
    let transport = MockTransport::new();
    let client = client_with(transport.clone());

    let mut registry = IndexRegistry::new();
    registry.register(Box::new(PeopleSource::with_count(1)));

    registry.clear(&client, &ClearMode::Type("person".into())).unwrap();

    let body: Value =
        serde_json::from_str(transport.last_request().body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({"delete": {"query": "item_type_s:person"}}));
}

#[test]
fn reindex_specific_ids() {
    let transport = MockTransport::new();
    let client = client_with(transport.clone());

    let mut registry = IndexRegistry::new();
    registry.register(Box::new(PeopleSource::with_count(5)));

    let count = registry
        .reindex(
            &client,
            &ReindexOptions {
                target: IndexTarget::All,
                clear: None,
                ids: vec!["person.2".into(), "person.4".into()],
            },
        )
        .unwrap();

    assert_eq!(count, 2);
    let batch = transport
        .requests()
        .iter()
        .find(|request| request.url.ends_with("/update/json/docs"))
        .cloned()
        .unwrap();
    let body: Value = serde_json::from_str(batch.body.as_deref().unwrap()).unwrap();
    assert_eq!(body[0]["id"], "person.2");
    assert_eq!(body[1]["id"], "person.4");
}

#[test]
fn unrecognized_index_ids_error() {
    let transport = MockTransport::new();
    let client = client_with(transport.clone());

    let mut registry = IndexRegistry::new();
    registry.register(Box::new(PeopleSource::with_count(1)));

    // no separator at all
    let err = registry
        .reindex(
            &client,
            &ReindexOptions {
                ids: vec!["person#1".into()],
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, SolrError::UnknownIndexTarget(_)));

    // unknown type
    let err = registry
        .reindex(
            &client,
            &ReindexOptions {
                ids: vec!["location.1".into()],
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, SolrError::UnknownIndexTarget(_)));

    // known type, missing item
    let err = registry
        .reindex(
            &client,
            &ReindexOptions {
                ids: vec!["person.99".into()],
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, SolrError::UnknownIndexTarget(_)));
}

#[test]
fn reindex_unknown_type_errors() {
    let transport = MockTransport::new();
    let client = client_with(transport.clone());

    let registry = IndexRegistry::new();
    let err = registry
        .reindex(
            &client,
            &ReindexOptions {
                target: IndexTarget::Type("location".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, SolrError::UnknownIndexTarget(_)));
}

#[test]
fn total_to_index_by_target() {
    let mut registry = IndexRegistry::new();
    registry.register(Box::new(PeopleSource::with_count(4)));

    assert_eq!(registry.total_to_index(&IndexTarget::All).unwrap(), 4);
    assert_eq!(registry.total_to_index(&IndexTarget::None).unwrap(), 0);
    assert_eq!(
        registry
            .total_to_index(&IndexTarget::Type("person".into()))
            .unwrap(),
        4
    );
    assert!(registry
        .total_to_index(&IndexTarget::Type("location".into()))
        .is_err());
}
