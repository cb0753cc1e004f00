use crate::domain::model::{Service, ServiceDraft, ServiceId};
use crate::domain::ports::ServiceStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Records {
    last_id: u64,
    services: BTreeMap<ServiceId, Service>,
}

/// Process-local store. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryServiceStore {
    records: Arc<RwLock<Records>>,
}

impl InMemoryServiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.services.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ServiceStore for InMemoryServiceStore {
    async fn insert(&self, draft: ServiceDraft) -> Result<Service> {
        let mut records = self.records.write().await;
        records.last_id += 1;
        let service = Service::from_draft(ServiceId::new(records.last_id), draft);
        records.services.insert(service.id, service.clone());
        Ok(service)
    }

    async fn get(&self, id: ServiceId) -> Result<Option<Service>> {
        Ok(self.records.read().await.services.get(&id).cloned())
    }
}
