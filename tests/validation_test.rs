//! Integration tests for snapshot validation: every rejection kind, in check order.

use rstest::rstest;
use serde_json::{json, Value};

use cluster_tool::domain::{decode_collection, ValidationError};
use cluster_tool::ClusterStore;

#[rstest]
#[case::root_not_object(json!([]), "invalid_json")]
#[case::root_string(json!("clusters"), "invalid_json")]
#[case::no_clusters_key(json!({"groups": []}), "missing_clusters")]
#[case::clusters_object(json!({"clusters": {"id": "a"}}), "clusters_not_array")]
#[case::clusters_empty(json!({"clusters": []}), "no_clusters")]
#[case::cluster_scalar(json!({"clusters": [1]}), "cluster_not_object")]
#[case::cluster_missing_name(json!({"clusters": [{"id": "a", "members": []}]}), "missing_keys")]
#[case::members_object(json!({"clusters": [{"id": "a", "name": "A", "members": {}}]}), "members_not_array")]
#[case::member_scalar(json!({"clusters": [{"id": "a", "name": "A", "members": ["m"]}]}), "member_not_object")]
#[case::member_missing_id(json!({"clusters": [{"id": "a", "name": "A", "members": [{"name": "m"}]}]}), "member_missing_keys")]
#[case::duplicate(json!({"clusters": [
    {"id": "a", "name": "A", "members": []},
    {"id": "a", "name": "B", "members": []}
]}), "duplicate_ids")]
fn given_malformed_snapshot_when_decoding_then_reports_kind(
    #[case] raw: Value,
    #[case] expected: &str,
) {
    // Act
    let result = decode_collection(raw);

    // Assert
    assert_eq!(result.unwrap_err().kind(), expected);
}

#[test]
fn given_nested_relationship_entry_when_decoding_then_stringified() {
    let raw = json!({"clusters": [{"id": "a", "name": "A", "members": [], "relationships": [["b"], "a"]}]});

    let collection = decode_collection(raw).expect("nested entries are kept as text");

    assert_eq!(collection.clusters[0].relationships, vec![r#"["b"]"#]);
}

#[test]
fn given_cluster_missing_several_keys_when_decoding_then_lists_them_in_order() {
    // Arrange
    let raw = json!({"clusters": [
        {"id": "a", "name": "A", "members": []},
        {"name": "B"}
    ]});

    // Act
    let err = decode_collection(raw).unwrap_err();

    // Assert
    assert_eq!(
        err,
        ValidationError::MissingKeys {
            cluster: 1,
            keys: vec!["id".into(), "members".into()],
        }
    );
    assert_eq!(err.to_string(), "cluster 2 missing required keys: id, members");
}

#[test]
fn given_member_missing_both_keys_when_decoding_then_reports_position() {
    // Arrange
    let raw = json!({"clusters": [
        {"id": "a", "name": "A", "members": [{"id": "m1", "name": "x"}, {"role": "Dev"}]}
    ]});

    // Act
    let err = decode_collection(raw).unwrap_err();

    // Assert
    assert_eq!(
        err,
        ValidationError::MemberMissingKeys {
            cluster: 0,
            member: 1,
            keys: vec!["id".into(), "name".into()],
        }
    );
    assert_eq!(err.to_string(), "cluster 1, member 2 missing: id, name");
}

#[test]
fn given_earlier_structural_error_when_decoding_then_reported_before_duplicates() {
    // Arrange: cluster 3 is broken, clusters 1 and 2 share an id
    let raw = json!({"clusters": [
        {"id": "a", "name": "A", "members": []},
        {"id": "a", "name": "B", "members": []},
        {"id": "c", "name": "C"}
    ]});

    // Act
    let err = decode_collection(raw).unwrap_err();

    // Assert
    assert_eq!(err.kind(), "missing_keys");
}

#[test]
fn given_repeated_duplicates_when_decoding_then_each_id_listed_once() {
    // Arrange
    let raw = json!({"clusters": [
        {"id": "a", "name": "A", "members": []},
        {"id": "b", "name": "B", "members": []},
        {"id": "a", "name": "A2", "members": []},
        {"id": "b", "name": "B2", "members": []},
        {"id": "a", "name": "A3", "members": []}
    ]});

    // Act
    let err = decode_collection(raw).unwrap_err();

    // Assert
    assert_eq!(
        err,
        ValidationError::DuplicateIds {
            ids: vec!["a".into(), "b".into()],
        }
    );
}

#[test]
fn given_wrong_scalar_types_when_decoding_then_normalized() {
    // Arrange
    let raw = json!({"clusters": [
        {"id": "a", "name": true, "members": [
            {"id": 1.5, "name": null, "metadata": "not a map"},
            {"id": "m2", "name": "Two", "metadata": {"level": 3, "lead": false}}
        ], "relationships": null, "extra": "ignored"}
    ]});

    // Act
    let collection = decode_collection(raw).expect("normalizes");

    // Assert
    let cluster = &collection.clusters[0];
    assert_eq!(cluster.name, "true");
    assert!(cluster.relationships.is_empty());
    assert_eq!(cluster.members[0].id, "1.5");
    assert_eq!(cluster.members[0].name, "null");
    assert!(cluster.members[0].metadata.is_none());
    let meta = cluster.members[1].metadata.as_ref().unwrap();
    assert_eq!(meta["level"], "3");
    assert_eq!(meta["lead"], "false");
}

#[test]
fn given_failed_load_when_store_empty_then_history_untouched() {
    // Arrange
    let mut store = ClusterStore::default();

    // Act
    let result = store.load(json!({"clusters": []}));

    // Assert
    assert_eq!(result, Err(ValidationError::NoClusters));
    assert!(store.is_empty());
    assert!(store.history().is_empty());
}
