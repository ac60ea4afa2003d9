//! Node.js-compatible resolution using oxc_resolver.
//!
//! Covers what the loader needs from the host:
//! - bare package names through `node_modules`
//! - package.json `exports` (ESM conditions) and `main`
//! - relative and absolute paths with extension probing
//!
//! The fallback honours the import's export conditions when the host passes
//! any. The post-install lookup always uses the default ESM set.

use crate::resolver::{FallbackResolve, PackageLookup};
use crate::types::{LoaderError, ResolveContext, ResolveResult, Result};
use oxc_resolver::{ResolveOptions, Resolver};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use url::Url;

/// Resolver following Node's ESM rules.
pub struct NodeResolver {
    resolver: Resolver,
    options: ResolveOptions,
    base_dir: PathBuf,
}

impl NodeResolver {
    /// Create a resolver; `base_dir` is used when an import has no file parent.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let options = ResolveOptions {
            condition_names: vec!["node".into(), "import".into(), "default".into()],
            extensions: vec![".js".into(), ".mjs".into(), ".cjs".into(), ".json".into()],
            main_fields: vec!["main".into()],
            exports_fields: vec![vec!["exports".into()]],
            ..ResolveOptions::default()
        };

        Self {
            resolver: Resolver::new(options.clone()),
            options,
            base_dir: base_dir.into(),
        }
    }

    /// Resolver sharing this one's cache but matching `conditions` in `exports`.
    fn with_conditions(&self, conditions: &[String]) -> Resolver {
        self.resolver.clone_with_options(ResolveOptions {
            condition_names: conditions.to_vec(),
            ..self.options.clone()
        })
    }

    /// Directory that relative specifiers in `context` are resolved against.
    fn context_dir(&self, context: &ResolveContext) -> PathBuf {
        context
            .parent_url
            .as_ref()
            .filter(|url| url.scheme() == "file")
            .and_then(|url| url.to_file_path().ok())
            .and_then(|path| path.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| self.base_dir.clone())
    }
}

impl PackageLookup for NodeResolver {
    fn lookup(&self, name: &str, base: &Path) -> Result<Url> {
        let lookup_failed = |reason: String| LoaderError::LookupFailed {
            name: name.to_string(),
            base: base.to_path_buf(),
            reason,
        };

        // The install that preceded this lookup may have changed node_modules.
        self.resolver.clear_cache();

        let path = self
            .resolver
            .resolve(base, name)
            .map_err(|e| lookup_failed(e.to_string()))?
            .path()
            .to_path_buf();

        debug!("Resolved {} to {}", name, path.display());
        file_url(&path).ok_or_else(|| lookup_failed(format!("{} is not absolute", path.display())))
    }
}

impl FallbackResolve for NodeResolver {
    fn resolve(&self, specifier: &str, context: &ResolveContext) -> Result<ResolveResult> {
        let not_resolved = |reason: String| LoaderError::FallbackFailed {
            specifier: specifier.to_string(),
            reason,
        };

        // Single letter schemes are Windows drive letters, not URLs.
        if let Ok(url) = Url::parse(specifier) {
            if url.scheme().len() > 1 {
                trace!("{} is already a URL", specifier);
                return Ok(ResolveResult {
                    url,
                    short_circuit: false,
                });
            }
        }

        let custom;
        let resolver = if context.conditions.is_empty() {
            &self.resolver
        } else {
            custom = self.with_conditions(&context.conditions);
            &custom
        };

        let directory = self.context_dir(context);
        let path = resolver
            .resolve(&directory, specifier)
            .map_err(|e| not_resolved(e.to_string()))?
            .path()
            .to_path_buf();

        let url = file_url(&path)
            .ok_or_else(|| not_resolved(format!("{} is not absolute", path.display())))?;
        Ok(ResolveResult {
            url,
            short_circuit: false,
        })
    }
}

fn file_url(path: &Path) -> Option<Url> {
    Url::from_file_path(path).ok()
}
