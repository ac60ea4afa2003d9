//! Installer backed by the npm executable.

use crate::config::LoaderConfig;
use crate::install::Installer;
use crate::specifier::install_name;
use crate::types::{LoaderError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, info, trace, warn};

/// Runs `npm install --no-package-lock --prefix <cache root> <install name>`.
#[derive(Debug, Clone)]
pub struct NpmInstaller {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl NpmInstaller {
    /// Create an installer running `program` with no timeout.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Create an installer from the loader configuration.
    pub fn from_config(config: &LoaderConfig) -> Self {
        Self::new(&config.npm_path).with_timeout(config.install_timeout)
    }

    /// Kill the install and fail if it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The package manager executable.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

/// Argument vector passed to npm for one install.
pub fn install_args(install_name: &str, cache_root: &Path) -> Vec<OsString> {
    vec![
        "install".into(),
        "--no-package-lock".into(),
        "--prefix".into(),
        cache_root.as_os_str().to_os_string(),
        install_name.into(),
    ]
}

/// An I/O failure while collecting npm's output still belongs to the install step.
fn wait_failed(install_name: &str, source: std::io::Error) -> LoaderError {
    LoaderError::InstallWait {
        install_name: install_name.to_string(),
        source,
    }
}

impl Installer for NpmInstaller {
    async fn install(&self, alias: &str, token: &str, cache_root: &Path) -> Result<()> {
        let install_name = install_name(alias, token);
        let start = Instant::now();

        let mut command = Command::new(&self.program);
        command
            .args(install_args(&install_name, cache_root))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        info!("Installing {} into {}", install_name, cache_root.display());

        let child = command.spawn().map_err(|source| LoaderError::InstallSpawn {
            program: self.program.clone(),
            source,
        })?;

        let waited = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, child.wait_with_output())
                .await
                .map_err(|_| {
                    warn!("Install of {} timed out, killing npm", install_name);
                    LoaderError::InstallTimeout {
                        install_name: install_name.clone(),
                        timeout,
                    }
                })?,
            None => child.wait_with_output().await,
        };
        let output = waited.map_err(|source| wait_failed(&install_name, source))?;

        trace!("npm stdout: {}", String::from_utf8_lossy(&output.stdout));

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("npm install of {} failed: {}", install_name, output.status);
            return Err(LoaderError::InstallFailed {
                install_name,
                status: output.status.code(),
                stderr,
            });
        }

        debug!(
            "Installed {} in {:.2}s",
            install_name,
            start.elapsed().as_secs_f64()
        );
        Ok(())
    }
}
