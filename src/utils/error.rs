use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrbitError {
    #[error("Validation error on {field} ({value:?}): {reason}")]
    ValidationError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Service {id} not found")]
    NotFound { id: u64 },

    #[error("Container launch failed: {diagnostic}")]
    LaunchFailed { diagnostic: String },

    #[error("Service record for container {container_id} could not be persisted: {message}")]
    PersistenceFailed {
        container_id: String,
        message: String,
    },

    #[error("Cannot watch {path}: {message}")]
    WatchSetupFailed { path: String, message: String },

    #[error("Sync failed during {step}: {diagnostic}")]
    SyncFailed { step: String, diagnostic: String },

    #[error("Remote project creation failed: {message}")]
    RemoteCreateFailed { message: String },

    #[error("Cloning {url} failed: {diagnostic}")]
    CloneFailed { url: String, diagnostic: String },

    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Store error: {message}")]
    StoreError { message: String },

    #[error("Invalid configuration value for {field} ({value:?}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl OrbitError {
    pub fn validation(field: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable identifier used in API error bodies and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => "validation_error",
            Self::NotFound { .. } => "not_found",
            Self::LaunchFailed { .. } => "launch_failed",
            Self::PersistenceFailed { .. } => "persistence_failed",
            Self::WatchSetupFailed { .. } => "watch_setup_failed",
            Self::SyncFailed { .. } => "sync_failed",
            Self::RemoteCreateFailed { .. } => "remote_create_failed",
            Self::CloneFailed { .. } => "clone_failed",
            Self::CommandFailed { .. } => "command_failed",
            Self::StoreError { .. } => "store_error",
            Self::InvalidConfigValueError { .. } | Self::ConfigValidationError { .. } => {
                "config_error"
            }
            Self::HttpError(_) => "http_error",
            Self::IoError(_) => "io_error",
            Self::SerializationError(_) => "serialization_error",
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound { .. } => ErrorSeverity::Low,
            Self::ValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorSeverity::Medium,
            Self::LaunchFailed { .. }
            | Self::RemoteCreateFailed { .. }
            | Self::CloneFailed { .. }
            | Self::CommandFailed { .. }
            | Self::HttpError(_)
            | Self::SerializationError(_) => ErrorSeverity::High,
            Self::PersistenceFailed { .. }
            | Self::WatchSetupFailed { .. }
            | Self::SyncFailed { .. }
            | Self::StoreError { .. }
            | Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for the binaries.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { field, reason, .. } => {
                format!("Invalid {}: {}", field, reason)
            }
            Self::NotFound { id } => format!("No service with id {}", id),
            Self::LaunchFailed { diagnostic } => {
                format!("The container runtime refused to start the service: {}", diagnostic)
            }
            Self::PersistenceFailed { container_id, .. } => format!(
                "Container {} is running but its service record was not saved",
                container_id
            ),
            Self::WatchSetupFailed { path, .. } => format!("Unable to watch {}", path),
            Self::SyncFailed { step, .. } => {
                format!("Synchronization stopped: the {} step failed", step)
            }
            Self::RemoteCreateFailed { .. } => "Could not create the project on orbit".to_string(),
            Self::CloneFailed { url, .. } => format!("Could not clone {}", url),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => "Check the request fields and try again",
            Self::NotFound { .. } => "List services to find a valid id",
            Self::LaunchFailed { .. } | Self::CommandFailed { .. } => {
                "Make sure the container runtime is installed and running"
            }
            Self::PersistenceFailed { .. } => {
                "Stop the orphaned container manually or re-register it"
            }
            Self::WatchSetupFailed { .. } => {
                "Check that the directory exists and the inotify watch limit is not exhausted"
            }
            Self::SyncFailed { .. } => {
                "Resolve the repository state (conflicts, credentials, remote) and restart the daemon"
            }
            Self::RemoteCreateFailed { .. } | Self::HttpError(_) => {
                "Check the --url value and that the orbit server is reachable"
            }
            Self::CloneFailed { .. } => {
                "The project exists remotely; clone it manually once the problem is fixed"
            }
            Self::InvalidConfigValueError { .. } | Self::ConfigValidationError { .. } => {
                "Fix the configuration value and try again"
            }
            Self::StoreError { .. } | Self::IoError(_) | Self::SerializationError(_) => {
                "Check disk space and permissions of the data directory"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, OrbitError>;
