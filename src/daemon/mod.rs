//! Daemon Client - the source of raw container and image records
//!
//! Records are kept close to the daemon's nested shape; flattening into rows
//! happens in the snapshot loader.

pub mod docker;

pub use docker::DockerClient;

use std::collections::HashMap;

use crate::Result;

/// Narrow view of the Docker daemon used while loading a snapshot
pub trait DaemonClient {
    /// Every container, in every state
    fn fetch_containers(&self) -> Result<Vec<ContainerRecord>>;

    /// Every top-level image
    fn fetch_images(&self) -> Result<Vec<ImageRecord>>;
}

/// A container as reported by the daemon
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerRecord {
    pub id: String,
    pub names: Vec<String>,
    pub image: String,
    pub image_id: String,
    pub command: String,
    pub state: String,
    pub status: String,
    /// Unix seconds
    pub created: Option<i64>,
    pub ports: Vec<PortBinding>,
    pub labels: HashMap<String, String>,
}

/// One published or exposed port of a container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortBinding {
    pub ip: Option<String>,
    pub private_port: u16,
    pub public_port: Option<u16>,
    pub protocol: String,
}

/// An image as reported by the daemon
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageRecord {
    pub id: String,
    pub repo_tags: Vec<String>,
    pub parent_id: String,
    pub size: i64,
    /// Unix seconds
    pub created: Option<i64>,
    pub labels: HashMap<String, String>,
}
