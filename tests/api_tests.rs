use async_trait::async_trait;
use orbit::adapters::InMemoryServiceStore;
use orbit::core::{ProcessLauncher, ServiceStore};
use orbit::domain::model::{ContainerId, ImageRef, PortSpec, ServiceDraft};
use orbit::{api, OrbitError, ProvisioningService, Result, Service, ServiceId};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone)]
struct StubLauncher {
    reply: std::result::Result<String, String>,
    calls: Arc<AtomicUsize>,
}

impl StubLauncher {
    fn returning(id: &str) -> Self {
        Self {
            reply: Ok(id.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing(diagnostic: &str) -> Self {
        Self {
            reply: Err(diagnostic.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl ProcessLauncher for StubLauncher {
    async fn launch(&self, _image: &ImageRef, _ports: &PortSpec) -> Result<ContainerId> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(id) => Ok(ContainerId::from_output(id).unwrap()),
            Err(diagnostic) => Err(OrbitError::LaunchFailed {
                diagnostic: diagnostic.clone(),
            }),
        }
    }
}

struct ReadOnlyStore;

#[async_trait]
impl ServiceStore for ReadOnlyStore {
    async fn insert(&self, _draft: ServiceDraft) -> Result<Service> {
        Err(OrbitError::StoreError {
            message: "read-only file system".to_string(),
        })
    }

    async fn get(&self, _id: ServiceId) -> Result<Option<Service>> {
        Ok(None)
    }
}

async fn spawn_app<S: ServiceStore + 'static>(launcher: StubLauncher, store: S) -> String {
    let service = Arc::new(ProvisioningService::new(launcher, store));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, api::router(service)).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_create_then_get_service() {
    let base = spawn_app(StubLauncher::returning("abc123"), InMemoryServiceStore::new()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/services"))
        .json(&serde_json::json!({"type": "ubuntu", "portExposed": "8080:80"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    let created: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        created,
        serde_json::json!({
            "id": 1,
            "type": "ubuntu",
            "portExposed": "8080:80",
            "containerID": "abc123"
        })
    );

    let response = client
        .get(format!("{base}/api/services/1"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let fetched: serde_json::Value = response.json().await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_unknown_service_is_404() {
    let base = spawn_app(StubLauncher::returning("abc123"), InMemoryServiceStore::new()).await;

    let response = reqwest::get(format!("{base}/api/services/99")).await.unwrap();

    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_non_numeric_id_is_400() {
    let base = spawn_app(StubLauncher::returning("abc123"), InMemoryServiceStore::new()).await;

    let response = reqwest::get(format!("{base}/api/services/abc")).await.unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_invalid_request_is_400_and_launches_nothing() {
    let launcher = StubLauncher::returning("abc123");
    let calls = launcher.calls.clone();
    let store = InMemoryServiceStore::new();
    let base = spawn_app(launcher, store.clone()).await;
    let client = reqwest::Client::new();

    for body in [
        serde_json::json!({"type": "ubuntu", "portExposed": "not-a-port"}),
        serde_json::json!({"type": "", "portExposed": "8080:80"}),
        serde_json::json!({"portExposed": "8080:80"}),
    ] {
        let response = client
            .post(format!("{base}/api/services"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400, "{body}");
        let error: serde_json::Value = response.json().await.unwrap();
        assert_eq!(error["error"], "validation_error");
    }

    let response = client
        .post(format!("{base}/api/services"))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_launch_failure_is_502_without_record() {
    let store = InMemoryServiceStore::new();
    let base = spawn_app(
        StubLauncher::failing("Unable to find image 'nope:latest' locally"),
        store.clone(),
    )
    .await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/services"))
        .json(&serde_json::json!({"type": "nope", "portExposed": "8080:80"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "launch_failed");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Unable to find image 'nope:latest' locally"));
    assert!(store.is_empty().await);

    let response = reqwest::get(format!("{base}/api/services/1")).await.unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_store_failure_after_launch_is_500_with_container_id() {
    let launcher = StubLauncher::returning("orphan42");
    let calls = launcher.calls.clone();
    let base = spawn_app(launcher, ReadOnlyStore).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/services"))
        .json(&serde_json::json!({"type": "ubuntu", "portExposed": "8080:80"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "persistence_failed");
    assert!(body["message"].as_str().unwrap().contains("orphan42"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() {
    let store = InMemoryServiceStore::new();
    let base = spawn_app(StubLauncher::returning("c0ffee"), store.clone()).await;
    let client = reqwest::Client::new();

    let requests = (0..8).map(|i| {
        let client = client.clone();
        let url = format!("{base}/api/services");
        async move {
            let response = client
                .post(url)
                .json(&serde_json::json!({"type": "redis", "portExposed": format!("{}:6379", 7000 + i)}))
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), 201);
            let body: serde_json::Value = response.json().await.unwrap();
            body["id"].as_u64().unwrap()
        }
    });

    let handles: Vec<_> = requests.map(tokio::spawn).collect();
    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap());
    }

    assert_eq!(ids.len(), 8);
    assert_eq!(store.len().await, 8);
}

#[tokio::test]
async fn test_health_endpoint() {
    let base = spawn_app(StubLauncher::returning("abc123"), InMemoryServiceStore::new()).await;

    let response = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(response.status(), 200);
}
