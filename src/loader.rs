//! Resolve hook for `npm:` specifiers.
//!
//! `npm:<token>` is installed into the cache under an encoded alias and then
//! resolved like a bare import from the package's cache directory. Any other
//! specifier goes to the host's fallback untouched.
//!
//! Every resolve runs its own install. Concurrent resolves are not
//! de-duplicated or locked against each other, not even for the same
//! specifier; two installs racing into one cache root rely entirely on npm's
//! own behaviour.

use crate::config::LoaderConfig;
use crate::install::{Installer, NpmInstaller};
use crate::resolver::{FallbackResolve, NodeResolver, PackageLookup};
use crate::specifier::{strip_npm_prefix, PackageTarget};
use crate::types::{ResolveContext, ResolveReport, ResolveResult, Result};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, trace, warn};

/// Loader owning the `npm:` scheme.
pub struct NpmSpecifierLoader<I = NpmInstaller, L = NodeResolver> {
    cache_root: PathBuf,
    installer: I,
    lookup: L,
}

impl NpmSpecifierLoader {
    /// Loader running the configured npm and resolving with Node rules.
    pub fn from_config(config: &LoaderConfig) -> Self {
        Self::new(
            config.cache_root.clone(),
            NpmInstaller::from_config(config),
            NodeResolver::new(&config.cache_root),
        )
    }
}

impl<I: Installer, L: PackageLookup> NpmSpecifierLoader<I, L> {
    pub fn new(cache_root: impl Into<PathBuf>, installer: I, lookup: L) -> Self {
        Self {
            cache_root: cache_root.into(),
            installer,
            lookup,
        }
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Cache location and install name for an install token.
    pub fn target(&self, token: &str) -> PackageTarget {
        PackageTarget::new(token, &self.cache_root)
    }

    /// Resolve hook.
    ///
    /// Non-`npm:` specifiers return whatever `fallback` returns. For `npm:`
    /// specifiers the package is installed, its entry point looked up, and a
    /// short-circuiting result returned. An install failure skips the lookup.
    pub async fn resolve<F>(
        &self,
        specifier: &str,
        context: &ResolveContext,
        fallback: &F,
    ) -> Result<ResolveResult>
    where
        F: FallbackResolve + ?Sized,
    {
        let Some(token) = strip_npm_prefix(specifier) else {
            trace!("Delegating {} to fallback", specifier);
            return fallback.resolve(specifier, context);
        };

        let target = self.target(token);
        debug!("Resolving {} as {}", specifier, target.install_name);

        self.installer
            .install(&target.alias, &target.token, &self.cache_root)
            .await?;

        let url = self.lookup.lookup(&target.alias, &target.cache_path)?;
        debug!("{} -> {}", specifier, url);

        Ok(ResolveResult::short_circuit(url))
    }

    /// Resolve several specifiers, at most `parallel` at a time.
    ///
    /// Reports come back in input order; one failure does not stop the others.
    pub async fn resolve_many<F>(
        &self,
        specifiers: &[String],
        context: &ResolveContext,
        fallback: &F,
        parallel: usize,
    ) -> Vec<ResolveReport>
    where
        F: FallbackResolve + ?Sized,
    {
        let mut indexed: Vec<(usize, ResolveReport)> = stream::iter(specifiers.iter().enumerate())
            .map(|(index, specifier)| async move {
                let start = Instant::now();
                let outcome = self.resolve(specifier, context, fallback).await;
                let duration_secs = start.elapsed().as_secs_f64();

                let report = match outcome {
                    Ok(result) => ResolveReport {
                        specifier: specifier.clone(),
                        result: Some(result),
                        error: None,
                        duration_secs,
                    },
                    Err(e) => {
                        warn!("Failed to resolve {}: {}", specifier, e);
                        ResolveReport {
                            specifier: specifier.clone(),
                            result: None,
                            error: Some(e.to_string()),
                            duration_secs,
                        }
                    }
                };
                (index, report)
            })
            .buffer_unordered(parallel.max(1))
            .collect()
            .await;

        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, report)| report).collect()
    }
}
