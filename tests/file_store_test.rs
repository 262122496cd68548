//! Tests for durable storage through the ServiceContainer

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use timberyard::application::ApplicationError;
use timberyard::config::{Settings, StorageBackend, ValidationConfig};
use timberyard::domain::{TimberPayload, Tree, TreePayload};
use timberyard::infrastructure::di::ServiceContainer;
use timberyard::infrastructure::store::FileStore;
use timberyard::infrastructure::traits::{
    FileSystem, OrderedStore, RealFileSystem, SystemClock, UuidGenerator,
};
use timberyard::util::testing;

/// In-memory filesystem whose writes can be switched off
#[derive(Default)]
struct MockFileSystem {
    files: Mutex<BTreeMap<PathBuf, String>>,
    fail_writes: AtomicBool,
}

impl MockFileSystem {
    fn content(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.content(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn write_atomic(&self, path: &Path, content: &str) -> io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

fn file_settings(data_dir: PathBuf) -> Settings {
    Settings {
        data_dir,
        storage: StorageBackend::File,
        validation: ValidationConfig::default(),
    }
}

fn real_container(settings: Settings) -> ServiceContainer {
    testing::init_test_setup();
    ServiceContainer::with_runtime(
        settings,
        Arc::new(RealFileSystem),
        Arc::new(UuidGenerator),
        Arc::new(SystemClock::new()),
    )
    .expect("open container")
}

fn spruce() -> TreePayload {
    TreePayload {
        species: "Spruce".into(),
        diameter: 35.5,
        length: 20.0,
    }
}

#[test]
fn given_file_backend_when_reopened_then_records_survive() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let data_dir = temp.path().join("ledger");

    let (tree, timber) = {
        let container = real_container(file_settings(data_dir.clone()));
        let ledger = container.ledger();
        let tree = ledger.add_tree(spruce()).unwrap();
        let timber = ledger
            .add_timber(TimberPayload {
                tree_id: tree.id.clone(),
                merchant_id: "m1".into(),
                price: 99.0,
                status: "listed".into(),
            })
            .unwrap();
        let timber = ledger
            .update_timber(
                &timber.id,
                TimberPayload {
                    tree_id: tree.id.clone(),
                    merchant_id: "m1".into(),
                    price: 99.0,
                    status: "sold".into(),
                },
            )
            .unwrap();
        (tree, timber)
    };

    // Act
    let container = real_container(file_settings(data_dir.clone()));
    let ledger = container.ledger();

    // Assert
    assert!(data_dir.join("trees.json").exists());
    assert!(data_dir.join("timbers.json").exists());
    assert_eq!(ledger.get_tree(&tree.id).unwrap(), tree);
    assert_eq!(ledger.list_timbers().unwrap(), vec![timber]);
}

#[test]
fn given_infinite_diameter_when_adding_then_rejected_and_store_reopens() {
    let temp = TempDir::new().unwrap();
    let settings = file_settings(temp.path().to_path_buf());

    let kept = {
        let container = real_container(settings.clone());
        let ledger = container.ledger();
        let kept = ledger.add_tree(spruce()).unwrap();
        for diameter in [f64::INFINITY, f64::NEG_INFINITY] {
            let err = ledger
                .add_tree(TreePayload {
                    diameter,
                    ..spruce()
                })
                .unwrap_err();
            assert!(err.is_invalid_input());
        }
        let err = ledger
            .update_tree(
                &kept.id,
                TreePayload {
                    length: f64::INFINITY,
                    ..spruce()
                },
            )
            .unwrap_err();
        assert!(err.is_invalid_input());
        kept
    };

    let container = real_container(settings);
    assert_eq!(container.ledger().list_trees().unwrap(), vec![kept]);
}

#[test]
fn given_deleted_record_when_reopened_then_stays_deleted() {
    let temp = TempDir::new().unwrap();
    let settings = file_settings(temp.path().to_path_buf());

    let id = {
        let container = real_container(settings.clone());
        let ledger = container.ledger();
        let tree = ledger.add_tree(spruce()).unwrap();
        ledger.delete_tree(&tree.id).unwrap();
        tree.id
    };

    let container = real_container(settings);
    assert!(container.ledger().get_tree(&id).unwrap_err().is_not_found());
    assert!(container.trees.is_empty().unwrap());
}

#[test]
fn given_file_backend_when_only_reading_then_no_files_created() {
    let temp = TempDir::new().unwrap();
    let data_dir = temp.path().join("untouched");

    let container = real_container(file_settings(data_dir.clone()));
    assert!(container.ledger().list_trees().unwrap().is_empty());
    assert!(container.ledger().get_timber("x").is_err());

    assert!(!data_dir.exists());
}

#[test]
fn given_memory_backend_when_reopened_then_starts_empty() {
    let temp = TempDir::new().unwrap();
    let settings = Settings {
        storage: StorageBackend::Memory,
        ..file_settings(temp.path().to_path_buf())
    };

    real_container(settings.clone())
        .ledger()
        .add_tree(spruce())
        .unwrap();

    let container = real_container(settings);
    assert!(container.ledger().list_trees().unwrap().is_empty());
    assert!(!temp.path().join("trees.json").exists());
}

#[test]
fn given_corrupt_store_file_when_opening_container_then_io_error() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("trees.json"), "[broken").unwrap();

    let result = ServiceContainer::with_runtime(
        file_settings(temp.path().to_path_buf()),
        Arc::new(RealFileSystem),
        Arc::new(UuidGenerator),
        Arc::new(SystemClock::new()),
    );

    assert!(result.is_err());
}

#[test]
fn given_failing_writes_when_mutating_then_storage_error_and_memory_rolled_back() {
    testing::init_test_setup();
    let fs = Arc::new(MockFileSystem::default());
    let path = PathBuf::from("/data/trees.json");
    let store = FileStore::<Tree>::open(fs.clone(), &path).unwrap();
    let tree = Tree {
        id: "t1".into(),
        species: "Birch".into(),
        diameter: 10.0,
        length: 5.0,
        created_at: 1,
        updated_at: None,
    };
    store.insert("t1", tree.clone()).unwrap();
    let snapshot = fs.content(&path).unwrap();

    fs.fail_writes.store(true, Ordering::SeqCst);

    // insert of a new key
    assert!(store.insert("t2", tree.clone()).is_err());
    assert_eq!(store.get("t2").unwrap(), None);
    // modify of an existing key
    assert!(store.modify("t1", &mut |t| t.diameter = 99.0).is_err());
    assert_eq!(store.get("t1").unwrap(), Some(tree.clone()));
    // remove
    assert!(store.remove("t1").is_err());
    assert_eq!(store.len().unwrap(), 1);

    assert_eq!(fs.content(&path).unwrap(), snapshot);
}

#[test]
fn given_failing_writes_when_adding_through_ledger_then_storage_error() {
    testing::init_test_setup();
    let fs = Arc::new(MockFileSystem::default());
    fs.fail_writes.store(true, Ordering::SeqCst);

    let container = ServiceContainer::with_runtime(
        file_settings(PathBuf::from("/data")),
        fs,
        Arc::new(UuidGenerator),
        Arc::new(SystemClock::new()),
    )
    .unwrap();

    let err = container.ledger().add_tree(spruce()).unwrap_err();

    assert!(matches!(err, ApplicationError::Storage { .. }));
    assert!(container.ledger().list_trees().unwrap().is_empty());
}

#[test]
fn given_stored_tree_when_reading_json_then_uses_camel_case_keyed_by_id() {
    let temp = TempDir::new().unwrap();
    let container = real_container(file_settings(temp.path().to_path_buf()));
    let tree = container.ledger().add_tree(spruce()).unwrap();

    let raw = std::fs::read_to_string(temp.path().join("trees.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(doc[&tree.id]["species"], "Spruce");
    assert_eq!(doc[&tree.id]["createdAt"], tree.created_at);
    assert!(doc[&tree.id].get("updatedAt").is_none());
}
