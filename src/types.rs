//! Core types and errors for the npm specifier loader.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur while resolving a specifier.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("npm install of {install_name} failed ({}): {stderr}", format_status(.status))]
    InstallFailed {
        install_name: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Failed to start package manager {}: {source}", .program.display())]
    InstallSpawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed waiting for npm install of {install_name}: {source}")]
    InstallWait {
        install_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("npm install of {install_name} timed out after {}s", .timeout.as_secs())]
    InstallTimeout {
        install_name: String,
        timeout: Duration,
    },

    #[error("Cannot find module '{name}' from {}: {reason}", .base.display())]
    LookupFailed {
        name: String,
        base: PathBuf,
        reason: String,
    },

    #[error("Failed to resolve '{specifier}': {reason}")]
    FallbackFailed { specifier: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoaderError {
    /// True for every way the package manager step can fail.
    pub fn is_install_failure(&self) -> bool {
        matches!(
            self,
            LoaderError::InstallFailed { .. }
                | LoaderError::InstallSpawn { .. }
                | LoaderError::InstallWait { .. }
                | LoaderError::InstallTimeout { .. }
        )
    }
}

fn format_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, LoaderError>;

/// Context handed to a resolve hook by the host loader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveContext {
    /// URL of the importing module, if any.
    pub parent_url: Option<Url>,
    /// Export conditions active for this import.
    pub conditions: Vec<String>,
}

impl ResolveContext {
    /// Context for an import made from `parent_url`.
    pub fn with_parent(parent_url: Url) -> Self {
        Self {
            parent_url: Some(parent_url),
            conditions: Vec::new(),
        }
    }
}

/// Outcome of a resolve hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResult {
    /// Absolute URL of the module to load.
    pub url: Url,
    /// When set, the host must not consult any further resolvers.
    pub short_circuit: bool,
}

impl ResolveResult {
    /// A final result: no further resolution strategies are tried.
    pub fn short_circuit(url: Url) -> Self {
        Self {
            url,
            short_circuit: true,
        }
    }
}

/// Per-specifier report produced by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveReport {
    pub specifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResolveResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_secs: f64,
}

impl ResolveReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
