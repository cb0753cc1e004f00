use crate::config::OrbitConfig;
use crate::domain::model::Project;
use crate::domain::ports::ProjectApi;
use crate::utils::error::{OrbitError, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

/// Talks to the orbit server's project endpoint.
pub struct HttpProjectApi {
    client: Client,
    endpoint: Url,
}

impl HttpProjectApi {
    pub fn new(config: &OrbitConfig) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            endpoint: config.api_url("projects")?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ProjectApi for HttpProjectApi {
    async fn create_project(&self) -> Result<Project> {
        let remote_error = |message: String| OrbitError::RemoteCreateFailed { message };

        tracing::debug!("Making API request to: {}", self.endpoint);
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| remote_error(format!("request to {} failed: {}", self.endpoint, e)))?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(remote_error(format!(
                "server answered {}: {}",
                status,
                body.trim()
            )));
        }

        let project: Project = response
            .json()
            .await
            .map_err(|e| remote_error(format!("invalid project response: {}", e)))?;

        Ok(project)
    }
}
