//! Flattening of daemon records into table rows
//!
//! Nested fields become one delimited text column each. Absent values map to
//! an empty string so every row carries every column.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, SecondsFormat};

use crate::daemon::{ContainerRecord, ImageRecord, PortBinding};
use crate::storage::Value;
use crate::{Error, Result};

/// One row of the `containers` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRow {
    pub id: String,
    pub name: String,
    pub names: String,
    pub image: String,
    pub image_id: String,
    pub command: String,
    pub state: String,
    pub status: String,
    pub created: String,
    pub ports: String,
    pub labels: String,
}

impl ContainerRow {
    pub fn from_record(record: &ContainerRecord) -> Result<Self> {
        if record.id.trim().is_empty() {
            return Err(Error::MalformedRecord {
                kind: "container",
                reason: format!("missing id (names: {:?})", record.names),
            });
        }

        let names: Vec<&str> = record.names.iter().map(|n| strip_name(n)).collect();
        Ok(Self {
            id: record.id.clone(),
            name: names.first().map(|n| n.to_string()).unwrap_or_default(),
            names: names.join(","),
            image: record.image.clone(),
            image_id: record.image_id.clone(),
            command: record.command.clone(),
            state: record.state.clone(),
            status: record.status.clone(),
            created: format_timestamp(record.created)?,
            ports: flatten_ports(&record.ports),
            labels: flatten_labels(&record.labels),
        })
    }

    /// Values in `containers` column order
    pub fn values(&self) -> Vec<Value> {
        vec![
            self.id.as_str().into(),
            self.name.as_str().into(),
            self.names.as_str().into(),
            self.image.as_str().into(),
            self.image_id.as_str().into(),
            self.command.as_str().into(),
            self.state.as_str().into(),
            self.status.as_str().into(),
            self.created.as_str().into(),
            self.ports.as_str().into(),
            self.labels.as_str().into(),
        ]
    }
}

/// One row of the `images` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRow {
    pub id: String,
    pub reference: String,
    pub tags: String,
    pub parent_id: String,
    pub size: i64,
    pub created: String,
    pub labels: String,
}

impl ImageRow {
    pub fn from_record(record: &ImageRecord) -> Result<Self> {
        if record.id.trim().is_empty() {
            return Err(Error::MalformedRecord {
                kind: "image",
                reason: format!("missing id (tags: {:?})", record.repo_tags),
            });
        }
        if record.size < 0 {
            return Err(Error::MalformedRecord {
                kind: "image",
                reason: format!("negative size {} for {}", record.size, record.id),
            });
        }

        // Older daemons report untagged images as "<none>:<none>"
        let tags: Vec<&str> = record
            .repo_tags
            .iter()
            .map(String::as_str)
            .filter(|t| *t != "<none>:<none>")
            .collect();

        Ok(Self {
            id: record.id.clone(),
            reference: tags.first().map(|t| t.to_string()).unwrap_or_default(),
            tags: tags.join(","),
            parent_id: record.parent_id.clone(),
            size: record.size,
            created: format_timestamp(record.created)?,
            labels: flatten_labels(&record.labels),
        })
    }

    /// Values in `images` column order
    pub fn values(&self) -> Vec<Value> {
        vec![
            self.id.as_str().into(),
            self.reference.as_str().into(),
            self.tags.as_str().into(),
            self.parent_id.as_str().into(),
            self.size.into(),
            self.created.as_str().into(),
            self.labels.as_str().into(),
        ]
    }
}

fn strip_name(name: &str) -> &str {
    name.strip_prefix('/').unwrap_or(name)
}

/// Unix seconds to RFC 3339 UTC text
pub fn format_timestamp(secs: Option<i64>) -> Result<String> {
    let Some(secs) = secs else {
        return Ok(String::new());
    };
    let ts = DateTime::from_timestamp(secs, 0).ok_or_else(|| Error::MalformedRecord {
        kind: "timestamp",
        reason: format!("{} is out of range", secs),
    })?;
    Ok(ts.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Sorted `key=value` pairs joined by commas
pub fn flatten_labels(labels: &HashMap<String, String>) -> String {
    let sorted: BTreeMap<&String, &String> = labels.iter().collect();
    sorted
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(",")
}

/// `docker ps` style port summary
pub fn flatten_ports(ports: &[PortBinding]) -> String {
    ports.iter().map(format_port).collect::<Vec<_>>().join(", ")
}

fn format_port(port: &PortBinding) -> String {
    let proto = if port.protocol.is_empty() {
        "tcp"
    } else {
        port.protocol.as_str()
    };
    match port.public_port {
        Some(public) => {
            let ip = port.ip.as_deref().filter(|ip| !ip.is_empty()).unwrap_or("0.0.0.0");
            format!("{}:{}->{}/{}", ip, public, port.private_port, proto)
        }
        None => format!("{}/{}", port.private_port, proto),
    }
}
