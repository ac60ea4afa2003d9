//! Host-side resolution seams.
//!
//! The loader only owns `npm:` specifiers. Everything else is handed to a
//! `FallbackResolve`, and the installed package's entry point is located
//! through a `PackageLookup`. `NodeResolver` implements both with
//! Node-compatible rules.

pub mod node;

pub use node::NodeResolver;

use crate::types::{ResolveContext, ResolveResult, Result};
use std::path::Path;
use url::Url;

/// The next resolver in the host's chain.
pub trait FallbackResolve {
    fn resolve(&self, specifier: &str, context: &ResolveContext) -> Result<ResolveResult>;
}

impl<F> FallbackResolve for F
where
    F: Fn(&str, &ResolveContext) -> Result<ResolveResult>,
{
    fn resolve(&self, specifier: &str, context: &ResolveContext) -> Result<ResolveResult> {
        self(specifier, context)
    }
}

/// Locates a package's entry point by bare name.
pub trait PackageLookup: Send + Sync {
    /// Resolve the bare specifier `name` as if imported from a module in `base`.
    fn lookup(&self, name: &str, base: &Path) -> Result<Url>;
}
