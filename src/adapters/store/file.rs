use crate::domain::model::{Service, ServiceDraft, ServiceId};
use crate::domain::ports::ServiceStore;
use crate::utils::error::{OrbitError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    last_id: u64,
    services: Vec<Service>,
}

#[derive(Debug, Default)]
struct Records {
    last_id: u64,
    services: BTreeMap<ServiceId, Service>,
}

impl Records {
    fn to_file(&self) -> StoreFile {
        StoreFile {
            last_id: self.last_id,
            services: self.services.values().cloned().collect(),
        }
    }
}

/// Service records kept in a single JSON document on disk.
///
/// Every insert rewrites the document through a temporary file and a rename,
/// and only updates the in-memory copy once the rename succeeded. Writes are
/// serialized by an async mutex.
#[derive(Debug)]
pub struct JsonFileServiceStore {
    path: PathBuf,
    records: Mutex<Records>,
}

impl JsonFileServiceStore {
    /// Opens the store at `path`, creating parent directories as needed. A
    /// missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let records = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let file: StoreFile = serde_json::from_slice(&bytes)?;
                let services: BTreeMap<ServiceId, Service> =
                    file.services.into_iter().map(|s| (s.id, s)).collect();
                let max_id = services.keys().next_back().map_or(0, |id| id.get());
                Records {
                    last_id: file.last_id.max(max_id),
                    services,
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Records::default(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(
            path = %path.display(),
            services = records.services.len(),
            "opened service store"
        );
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_atomically(&self, file: &StoreFile) -> Result<()> {
        let data = serde_json::to_vec_pretty(file)?;
        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        tokio::fs::write(&tmp_path, &data).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ServiceStore for JsonFileServiceStore {
    async fn insert(&self, draft: ServiceDraft) -> Result<Service> {
        let mut records = self.records.lock().await;
        let id = ServiceId::new(records.last_id + 1);
        let service = Service::from_draft(id, draft);

        let mut snapshot = records.to_file();
        snapshot.last_id = id.get();
        snapshot.services.push(service.clone());

        self.write_atomically(&snapshot)
            .await
            .map_err(|e| OrbitError::StoreError {
                message: format!("writing {}: {}", self.path.display(), e),
            })?;

        records.last_id = id.get();
        records.services.insert(id, service.clone());
        Ok(service)
    }

    async fn get(&self, id: ServiceId) -> Result<Option<Service>> {
        Ok(self.records.lock().await.services.get(&id).cloned())
    }
}
