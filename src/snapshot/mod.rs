//! Snapshot Loader - one-time copy of daemon state into the store
//!
//! Containers and images are loaded in two phases inside one transaction. Any
//! failure aborts the whole load; the caller discards the store.

pub mod rows;

pub use rows::{ContainerRow, ImageRow};

use crate::daemon::DaemonClient;
use crate::storage::schema::{self, CONTAINERS, IMAGES};
use crate::storage::RelationalStore;
use crate::Result;

/// Row counts of a loaded snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotStats {
    pub containers: usize,
    pub images: usize,
}

impl std::fmt::Display for SnapshotStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} containers, {} images", self.containers, self.images)
    }
}

/// Build the schema on an empty store and fill it from the daemon
pub fn load_snapshot(client: &dyn DaemonClient, store: &dyn RelationalStore) -> Result<SnapshotStats> {
    schema::build_schema(store)?;

    store.begin()?;
    let containers = load_containers(client, store)?;
    let images = load_images(client, store)?;
    store.commit()?;

    let stats = SnapshotStats { containers, images };
    tracing::info!("Snapshot loaded: {}", stats);
    Ok(stats)
}

fn load_containers(client: &dyn DaemonClient, store: &dyn RelationalStore) -> Result<usize> {
    let records = client.fetch_containers()?;
    for record in &records {
        let row = ContainerRow::from_record(record)?;
        tracing::debug!("Loading container {} ({}, {})", row.id, row.name, row.state);
        store.insert(&CONTAINERS, &row.values())?;
    }
    Ok(records.len())
}

fn load_images(client: &dyn DaemonClient, store: &dyn RelationalStore) -> Result<usize> {
    let records = client.fetch_images()?;
    for record in &records {
        let row = ImageRow::from_record(record)?;
        tracing::debug!("Loading image {} ({})", row.id, row.reference);
        store.insert(&IMAGES, &row.values())?;
    }
    Ok(records.len())
}
