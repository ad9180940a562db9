//! bollard-backed Docker client
//!
//! bollard is async; the client owns a current-thread runtime and blocks on
//! every call so the rest of the program stays synchronous.

use bollard::container::ListContainersOptions;
use bollard::image::ListImagesOptions;
use bollard::models::{ContainerSummary, ImageSummary, Port};
use bollard::{Docker, API_DEFAULT_VERSION};
use tokio::runtime::{Builder, Runtime};

use super::{ContainerRecord, DaemonClient, ImageRecord, PortBinding};
use crate::config::Endpoint;
use crate::Result;

/// bollard insists on a request timeout; daemon calls are meant to be unbounded.
const REQUEST_TIMEOUT_SECS: u64 = 60 * 60 * 24 * 365;

pub struct DockerClient {
    docker: Docker,
    runtime: Runtime,
}

impl DockerClient {
    /// Connect to the daemon and verify it answers a ping
    pub fn connect(endpoint: &Endpoint) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let docker = {
            let _guard = runtime.enter();
            match endpoint {
                Endpoint::Unix(path) => Docker::connect_with_unix(
                    &path.to_string_lossy(),
                    REQUEST_TIMEOUT_SECS,
                    API_DEFAULT_VERSION,
                )?,
                Endpoint::Http(addr) => {
                    Docker::connect_with_http(addr, REQUEST_TIMEOUT_SECS, API_DEFAULT_VERSION)?
                }
            }
        };

        let version = runtime.block_on(docker.ping())?;
        tracing::debug!("Docker daemon answered ping: {}", version);

        Ok(Self { docker, runtime })
    }
}

/// Every container, stopped ones included (`docker ps -a`)
fn container_list_options() -> ListContainersOptions<String> {
    ListContainersOptions {
        all: true,
        ..Default::default()
    }
}

/// Top-level images only (`docker images`); intermediate layers are left out
fn image_list_options() -> ListImagesOptions<String> {
    ListImagesOptions {
        all: false,
        ..Default::default()
    }
}

impl DaemonClient for DockerClient {
    fn fetch_containers(&self) -> Result<Vec<ContainerRecord>> {
        let summaries = self
            .runtime
            .block_on(self.docker.list_containers(Some(container_list_options())))?;
        Ok(summaries.into_iter().map(ContainerRecord::from).collect())
    }

    fn fetch_images(&self) -> Result<Vec<ImageRecord>> {
        let summaries = self
            .runtime
            .block_on(self.docker.list_images(Some(image_list_options())))?;
        Ok(summaries.into_iter().map(ImageRecord::from).collect())
    }
}

impl From<ContainerSummary> for ContainerRecord {
    fn from(summary: ContainerSummary) -> Self {
        Self {
            id: summary.id.unwrap_or_default(),
            names: summary.names.unwrap_or_default(),
            image: summary.image.unwrap_or_default(),
            image_id: summary.image_id.unwrap_or_default(),
            command: summary.command.unwrap_or_default(),
            state: summary.state.map(|s| s.to_string()).unwrap_or_default(),
            status: summary.status.unwrap_or_default(),
            created: summary.created,
            ports: summary
                .ports
                .unwrap_or_default()
                .into_iter()
                .map(PortBinding::from)
                .collect(),
            labels: summary.labels.unwrap_or_default(),
        }
    }
}

impl From<Port> for PortBinding {
    fn from(port: Port) -> Self {
        Self {
            ip: port.ip,
            private_port: port.private_port,
            public_port: port.public_port,
            protocol: port.typ.map(|t| t.to_string()).unwrap_or_default(),
        }
    }
}

impl From<ImageSummary> for ImageRecord {
    fn from(summary: ImageSummary) -> Self {
        Self {
            id: summary.id,
            repo_tags: summary.repo_tags,
            parent_id: summary.parent_id,
            size: summary.size,
            created: Some(summary.created),
            labels: summary.labels,
        }
    }
}
