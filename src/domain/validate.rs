//! Snapshot decoding: untrusted JSON value in, validated `Collection` out.
//!
//! Checks run in a fixed order and stop at the first failure. The input is
//! normalized in place before conversion:
//! - `relationships` missing or not an array becomes `[]`
//! - scalar ids, names and relationship entries become strings
//! - self-references are dropped from `relationships`
//! - non-object `metadata` is discarded, metadata values become strings

use itertools::Itertools;
use serde_json::{Map, Value};

use crate::domain::entities::Collection;
use crate::domain::error::ValidationError;

const CLUSTER_KEYS: [&str; 3] = ["id", "name", "members"];
const MEMBER_KEYS: [&str; 2] = ["id", "name"];

/// Validate and convert a raw snapshot.
pub fn decode_collection(mut raw: Value) -> Result<Collection, ValidationError> {
    let root = raw.as_object_mut().ok_or(ValidationError::InvalidJson)?;
    let clusters = root
        .get_mut("clusters")
        .ok_or(ValidationError::MissingClusters)?
        .as_array_mut()
        .ok_or(ValidationError::ClustersNotArray)?;
    if clusters.is_empty() {
        return Err(ValidationError::NoClusters);
    }

    for (i, cluster) in clusters.iter_mut().enumerate() {
        let cluster = cluster
            .as_object_mut()
            .ok_or(ValidationError::ClusterNotObject { cluster: i })?;
        check_cluster(i, cluster)?;
        normalize_cluster(cluster);
    }

    let ids: Vec<String> = clusters.iter().map(|c| stringify(&c["id"])).collect();
    let dupes: Vec<String> = ids.iter().duplicates().cloned().collect();
    if !dupes.is_empty() {
        return Err(ValidationError::DuplicateIds { ids: dupes });
    }

    serde_json::from_value(raw).map_err(|e| ValidationError::Unexpected {
        cause: e.to_string(),
    })
}

fn check_cluster(i: usize, cluster: &Map<String, Value>) -> Result<(), ValidationError> {
    let missing = missing_keys(cluster, &CLUSTER_KEYS);
    if !missing.is_empty() {
        return Err(ValidationError::MissingKeys {
            cluster: i,
            keys: missing,
        });
    }

    let members = cluster["members"]
        .as_array()
        .ok_or(ValidationError::MembersNotArray { cluster: i })?;
    for (j, member) in members.iter().enumerate() {
        let member = member.as_object().ok_or(ValidationError::MemberNotObject {
            cluster: i,
            member: j,
        })?;
        let missing = missing_keys(member, &MEMBER_KEYS);
        if !missing.is_empty() {
            return Err(ValidationError::MemberMissingKeys {
                cluster: i,
                member: j,
                keys: missing,
            });
        }
    }
    Ok(())
}

fn missing_keys(object: &Map<String, Value>, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|key| !object.contains_key(**key))
        .map(|key| key.to_string())
        .collect()
}

fn normalize_cluster(cluster: &mut Map<String, Value>) {
    let id = stringify(&cluster["id"]);
    coerce_string(cluster, "id");
    coerce_string(cluster, "name");

    let relationships = match cluster.remove("relationships") {
        Some(Value::Array(entries)) => entries
            .iter()
            .map(stringify)
            .filter(|r| *r != id)
            .map(Value::String)
            .collect(),
        _ => Vec::new(),
    };
    cluster.insert("relationships".into(), Value::Array(relationships));

    if let Some(Value::Array(members)) = cluster.get_mut("members") {
        for member in members.iter_mut().filter_map(Value::as_object_mut) {
            coerce_string(member, "id");
            coerce_string(member, "name");
            normalize_metadata(member);
        }
    }
}

fn normalize_metadata(member: &mut Map<String, Value>) {
    match member.remove("metadata") {
        Some(Value::Object(entries)) => {
            let entries = entries
                .into_iter()
                .map(|(k, v)| (k, Value::String(stringify(&v))))
                .collect();
            member.insert("metadata".into(), Value::Object(entries));
        }
        Some(_) | None => {}
    }
}

fn coerce_string(object: &mut Map<String, Value>, key: &str) {
    if let Some(value) = object.get_mut(key) {
        if !value.is_string() {
            *value = Value::String(stringify(value));
        }
    }
}

/// String form of an id-like value: strings verbatim, everything else as JSON text.
pub(crate) fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
