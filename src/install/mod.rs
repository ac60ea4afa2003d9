//! Package installation.
//!
//! The loader only needs one capability from a package manager: make
//! `<alias>@npm:<token>` available under a cache root. `NpmInstaller`
//! provides it by running the npm executable.

pub mod npm;

pub use npm::{install_args, NpmInstaller};

use crate::types::Result;
use std::future::Future;
use std::path::Path;

/// Materializes a package under a cache root.
///
/// Implementations must be idempotent from the caller's point of view:
/// installing the same alias/token pair again is allowed and must succeed
/// if the first install did.
pub trait Installer: Send + Sync {
    /// Install `token` under the alias `alias` into `cache_root/node_modules/`.
    fn install(
        &self,
        alias: &str,
        token: &str,
        cache_root: &Path,
    ) -> impl Future<Output = Result<()>> + Send;
}
