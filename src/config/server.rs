use crate::utils::error::{OrbitError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_socket_addr, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the `orbit-server` binary, usually read from `orbit.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub docker: DockerSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// JSON file holding service records. Records live in memory when unset.
    pub store_path: Option<String>,
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            store_path: None,
            json_logs: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockerSection {
    #[serde(default = "default_docker_binary")]
    pub binary: String,
    /// Shell command that keeps a service container alive.
    #[serde(default = "default_keep_alive")]
    pub keep_alive: String,
}

impl Default for DockerSection {
    fn default() -> Self {
        Self {
            binary: default_docker_binary(),
            keep_alive: default_keep_alive(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:4000".to_string()
}

fn default_docker_binary() -> String {
    "docker".to_string()
}

fn default_keep_alive() -> String {
    "while true; do sleep 1; done".to_string()
}

impl ServerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(OrbitError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| OrbitError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| OrbitError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        validate_socket_addr("server.listen_addr", &self.server.listen_addr)?;
        if let Some(store_path) = &self.server.store_path {
            validate_path("server.store_path", store_path)?;
        }
        validate_non_empty_string("docker.binary", &self.docker.binary)?;
        validate_non_empty_string("docker.keep_alive", &self.docker.keep_alive)?;
        Ok(())
    }
}
