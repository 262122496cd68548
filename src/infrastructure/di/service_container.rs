//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::{Ledger, TimberCollection, TreeCollection};
use crate::config::{Settings, StorageBackend};
use crate::domain::{Timber, Tree};
use crate::infrastructure::store::{FileStore, MemoryStore};
use crate::infrastructure::traits::{
    Clock, FileSystem, IdGenerator, OrderedStore, RealFileSystem, SystemClock, UuidGenerator,
};
use crate::infrastructure::{InfraError, InfraResult};

/// Container holding all application services.
///
/// Stores are opened once here and live as long as the container.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Identifier source shared by both collections
    pub ids: Arc<dyn IdGenerator>,

    /// Time source shared by both collections
    pub clock: Arc<dyn Clock>,

    pub trees: Arc<TreeCollection>,
    pub timbers: Arc<TimberCollection>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        Self::with_runtime(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(UuidGenerator),
            Arc::new(SystemClock::new()),
        )
    }

    /// Create a container with custom id/clock/filesystem, opening stores
    /// according to `settings.storage`.
    pub fn with_runtime(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> InfraResult<Self> {
        let (tree_store, timber_store): (Arc<dyn OrderedStore<Tree>>, Arc<dyn OrderedStore<Timber>>) =
            match settings.storage {
                StorageBackend::File => {
                    let tree_path = settings.tree_store_path();
                    let timber_path = settings.timber_store_path();
                    let trees = FileStore::<Tree>::open(fs.clone(), &tree_path).map_err(|e| {
                        InfraError::io(format!("open tree store {}", tree_path.display()), e)
                    })?;
                    let timbers = FileStore::<Timber>::open(fs.clone(), &timber_path).map_err(|e| {
                        InfraError::io(format!("open timber store {}", timber_path.display()), e)
                    })?;
                    (Arc::new(trees), Arc::new(timbers))
                }
                StorageBackend::Memory => (
                    Arc::new(MemoryStore::<Tree>::new()),
                    Arc::new(MemoryStore::<Timber>::new()),
                ),
            };
        debug!(
            "with_runtime: storage={:?}, data_dir={}",
            settings.storage,
            settings.data_dir.display()
        );

        Ok(Self::with_deps(settings, fs, ids, clock, tree_store, timber_store))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        tree_store: Arc<dyn OrderedStore<Tree>>,
        timber_store: Arc<dyn OrderedStore<Timber>>,
    ) -> Self {
        let settings = Arc::new(settings);
        let rules = settings.validation_rules();

        let trees = Arc::new(TreeCollection::new(
            tree_store,
            ids.clone(),
            clock.clone(),
            rules,
        ));
        let timbers = Arc::new(TimberCollection::new(
            timber_store,
            ids.clone(),
            clock.clone(),
            rules,
        ));

        Self {
            settings,
            fs,
            ids,
            clock,
            trees,
            timbers,
        }
    }

    /// Entry points over both collections.
    pub fn ledger(&self) -> Ledger {
        Ledger::new(self.trees.clone(), self.timbers.clone())
    }
}
