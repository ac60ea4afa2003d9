//! npmspec - load `npm:` specifiers from a local package cache.
//!
//! This library provides a module-loader resolve hook that:
//! - Claims specifiers of the form `npm:<name>[@<range>]`
//! - Encodes the install token into a filesystem-safe alias
//! - Runs `npm install` into a shared cache root under that alias
//! - Resolves the installed package's entry point to a `file://` URL
//!
//! Every other specifier is passed to the host's fallback resolver.
//!
//! # Example
//!
//! ```no_run
//! use npmspec::{LoaderConfig, NodeResolver, NpmSpecifierLoader, ResolveContext};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = LoaderConfig::from_env().unwrap();
//!     let loader = NpmSpecifierLoader::from_config(&config);
//!     let fallback = NodeResolver::new(".");
//!     let result = loader
//!         .resolve("npm:react@^18.0.0", &ResolveContext::default(), &fallback)
//!         .await
//!         .unwrap();
//!     println!("{}", result.url);
//! }
//! ```

pub mod config;
pub mod install;
pub mod loader;
pub mod notify;
pub mod resolver;
pub mod specifier;
pub mod types;

pub use config::{AliasConfig, Commands, Config, LoaderConfig, ResolveConfig};
pub use install::{Installer, NpmInstaller};
pub use loader::NpmSpecifierLoader;
pub use resolver::{FallbackResolve, NodeResolver, PackageLookup};
pub use specifier::{encode_alias, install_name, strip_npm_prefix, PackageTarget, NPM_PREFIX};
pub use types::{LoaderError, ResolveContext, ResolveReport, ResolveResult, Result};
