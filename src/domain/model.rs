use crate::utils::error::{OrbitError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_port_spec};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Store-assigned identifier of a provisioned service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(u64);

impl ServiceId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ServiceId {
    type Err = OrbitError;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| OrbitError::validation("id", s, "Service id must be a non-negative integer"))
    }
}

/// Container image (or template) a service is launched from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageRef(String);

impl ImageRef {
    pub fn parse(raw: &str) -> Result<Self> {
        validate_non_empty_string("type", raw)?;
        if raw.chars().any(char::is_whitespace) || raw.starts_with('-') {
            return Err(OrbitError::validation(
                "type",
                raw,
                "Image reference cannot contain whitespace or start with '-'",
            ));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ImageRef {
    type Error = OrbitError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ImageRef> for String {
    fn from(value: ImageRef) -> Self {
        value.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Host-to-container port binding, kept in the runtime's `-p` syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PortSpec(String);

impl PortSpec {
    pub fn parse(raw: &str) -> Result<Self> {
        validate_port_spec("portExposed", raw)?;
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PortSpec {
    type Error = OrbitError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<PortSpec> for String {
    fn from(value: PortSpec) -> Self {
        value.0
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque handle the container runtime returned for a launched instance.
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContainerId(String);

impl ContainerId {
    /// Builds a handle from raw runtime output, trimming surrounding whitespace.
    pub fn from_output(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ContainerId {
    type Error = OrbitError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_output(&value)
            .ok_or_else(|| OrbitError::validation("containerID", &value, "Container id is empty"))
    }
}

impl From<ContainerId> for String {
    fn from(value: ContainerId) -> Self {
        value.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `POST /services` as the client sent it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewService {
    #[serde(rename = "type", default)]
    pub image: String,
    #[serde(rename = "portExposed", default)]
    pub port_exposed: String,
}

impl NewService {
    pub fn new(image: impl Into<String>, port_exposed: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            port_exposed: port_exposed.into(),
        }
    }
}

/// A launched service that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDraft {
    pub image: ImageRef,
    pub port_exposed: PortSpec,
    pub container_id: ContainerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    #[serde(rename = "type")]
    pub image: ImageRef,
    #[serde(rename = "portExposed")]
    pub port_exposed: PortSpec,
    #[serde(rename = "containerID")]
    pub container_id: ContainerId,
}

impl Service {
    pub fn from_draft(id: ServiceId, draft: ServiceDraft) -> Self {
        Self {
            id,
            image: draft.image,
            port_exposed: draft.port_exposed,
            container_id: draft.container_id,
        }
    }
}

/// Remote repository record returned by the orbit API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "gitPath", default)]
    pub git_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Write,
    Create,
    Remove,
    Rename,
    Metadata,
    Access,
    Other,
}

impl ChangeKind {
    pub fn is_write(self) -> bool {
        matches!(self, ChangeKind::Write)
    }
}

/// A mutation observed under the watched root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub paths: Vec<PathBuf>,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, paths: Vec<PathBuf>) -> Self {
        Self { kind, paths }
    }

    pub fn is_write(&self) -> bool {
        self.kind.is_write()
    }
}

/// What the watcher hands to the sync loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchSignal {
    Change(ChangeEvent),
    /// A delivery problem reported by the watch backend. Not fatal.
    Error(String),
}
