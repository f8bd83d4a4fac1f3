//! Integration tests for SnapshotService against the real filesystem.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use cluster_tool::application::services::SnapshotService;
use cluster_tool::application::ApplicationError;
use cluster_tool::config::Settings;
use cluster_tool::infrastructure::traits::RealFileSystem;
use cluster_tool::util::testing;
use cluster_tool::{ClusterStore, Collection};

fn service(settings: &Settings) -> SnapshotService {
    SnapshotService::new(Arc::new(RealFileSystem), settings)
}

#[fixture]
fn workdir() -> TempDir {
    testing::init_test_setup();
    TempDir::new().expect("create temp dir")
}

fn write_snapshot(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("clusters.json");
    fs::write(&path, testing::two_cluster_snapshot().to_string()).unwrap();
    path
}

#[rstest]
fn given_valid_file_when_loading_then_store_populated(workdir: TempDir) {
    // Arrange
    let path = write_snapshot(workdir.path());
    let mut store = ClusterStore::default();

    // Act
    service(&Settings::default())
        .load_into(&mut store, &path)
        .expect("load snapshot");

    // Assert
    assert_eq!(store.metrics().total_clusters, 2);
    assert_eq!(store.metrics().total_members, 3);
    assert_eq!(store.history().len(), 1);
}

#[rstest]
fn given_missing_file_when_reading_then_not_found(workdir: TempDir) {
    // Act
    let result = service(&Settings::default()).read(&workdir.path().join("nope.json"));

    // Assert
    assert!(matches!(result, Err(ApplicationError::NotFound(_))));
}

#[rstest]
fn given_file_over_limit_when_reading_then_too_large(workdir: TempDir) {
    // Arrange
    let path = write_snapshot(workdir.path());
    let settings = Settings {
        max_input_bytes: 16,
        ..Default::default()
    };

    // Act
    let result = service(&settings).read(&path);

    // Assert
    match result {
        Err(ApplicationError::FileTooLarge { size, limit, .. }) => {
            assert_eq!(limit, 16);
            assert!(size > limit);
        }
        other => panic!("expected FileTooLarge, got {other:?}"),
    }
}

#[rstest]
fn given_non_utf8_file_when_reading_then_encoding_error(workdir: TempDir) {
    // Arrange
    let path = workdir.path().join("latin1.json");
    fs::write(&path, [b'{', 0xE9, 0xFF, b'}']).unwrap();

    // Act
    let result = service(&Settings::default()).read(&path);

    // Assert
    assert!(matches!(result, Err(ApplicationError::Encoding { .. })));
}

#[rstest]
fn given_malformed_json_when_reading_then_invalid_json(workdir: TempDir) {
    // Arrange
    let path = workdir.path().join("broken.json");
    fs::write(&path, r#"{"clusters": [}"#).unwrap();

    // Act
    let result = service(&Settings::default()).read(&path);

    // Assert
    assert!(matches!(result, Err(ApplicationError::InvalidJson { .. })));
}

#[rstest]
fn given_structurally_invalid_file_when_loading_then_validation_error(workdir: TempDir) {
    // Arrange
    let path = workdir.path().join("empty.json");
    fs::write(&path, r#"{"clusters": []}"#).unwrap();
    let mut store = ClusterStore::default();

    // Act
    let result = service(&Settings::default()).load_into(&mut store, &path);

    // Assert
    match result {
        Err(ApplicationError::Validation(e)) => assert_eq!(e.kind(), "no_clusters"),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(store.is_empty());
}

#[rstest]
fn given_directory_target_when_writing_then_timestamped_file_created(workdir: TempDir) {
    // Arrange
    let source = write_snapshot(workdir.path());
    let out_dir = workdir.path().join("exports");
    fs::create_dir(&out_dir).unwrap();
    let service = service(&Settings::default());
    let mut store = ClusterStore::default();
    service.load_into(&mut store, &source).unwrap();

    // Act
    let written = service.write(&out_dir, store.collection()).unwrap();

    // Assert
    assert_eq!(written.parent(), Some(out_dir.as_path()));
    let name = written.file_name().unwrap().to_string_lossy();
    assert!(name.starts_with("clusters_updated_"));
    assert!(name.ends_with(".json"));
    assert!(written.exists());
}

#[rstest]
fn given_edited_store_when_exported_then_reloads_to_equal_collection(workdir: TempDir) {
    // Arrange
    let source = write_snapshot(workdir.path());
    let service = service(&Settings::default());
    let mut store = ClusterStore::default();
    service.load_into(&mut store, &source).unwrap();
    assert!(store.merge_clusters("cluster1", "cluster2", "Everyone"));

    // Act
    let target = workdir.path().join("nested/out.json");
    let written = service.write(&target, store.collection()).unwrap();
    let reloaded: Collection =
        serde_json::from_str(&fs::read_to_string(&written).unwrap()).unwrap();

    // Assert
    assert_eq!(written, target);
    assert_eq!(&reloaded, store.collection());
}

#[rstest]
#[case::pretty(true, true)]
#[case::compact(false, false)]
fn given_pretty_setting_when_serializing_then_layout_follows(
    #[case] pretty: bool,
    #[case] multiline: bool,
) {
    // Arrange
    let settings = Settings {
        pretty,
        ..Default::default()
    };
    let mut store = ClusterStore::default();
    store.load(testing::two_cluster_snapshot()).unwrap();

    // Act
    let json = service(&settings).to_json(store.collection()).unwrap();

    // Assert
    assert_eq!(json.contains('\n'), multiline);
    assert!(json.contains(r#""role""#));
}

#[test]
fn given_sample_when_loading_then_three_clusters_six_members() {
    // Arrange
    let mut store = ClusterStore::default();

    // Act
    store.load(SnapshotService::sample().unwrap()).unwrap();

    // Assert
    let metrics = store.metrics();
    assert_eq!(metrics.total_clusters, 3);
    assert_eq!(metrics.total_members, 6);
    assert_eq!(metrics.avg_members_per_cluster, 2.0);
}
