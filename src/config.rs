//! Loader configuration and CLI definitions.

use crate::types::{LoaderError, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Overrides the cache root.
pub const CACHE_PATH_ENV: &str = "NPM_SPECIFIER_LOADER_CACHE_PATH";
/// Overrides the npm executable.
pub const NPM_PATH_ENV: &str = "NPM_SPECIFIER_LOADER_NPM_PATH";
/// Install timeout in seconds (CLI only).
pub const INSTALL_TIMEOUT_ENV: &str = "NPM_SPECIFIER_LOADER_INSTALL_TIMEOUT";

/// Default npm executable, looked up on `PATH`.
pub const DEFAULT_NPM: &str = "npm";
/// Cache directory created under the user's home directory.
pub const DEFAULT_CACHE_DIR: &str = ".npm-specifier-cache";

/// Process-wide loader settings, fixed once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Directory npm installs into (`--prefix`).
    pub cache_root: PathBuf,
    /// npm executable name or path.
    pub npm_path: PathBuf,
    /// Upper bound for a single install; `None` waits forever.
    pub install_timeout: Option<Duration>,
}

impl LoaderConfig {
    pub fn new(cache_root: impl Into<PathBuf>, npm_path: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
            npm_path: npm_path.into(),
            install_timeout: None,
        }
    }

    pub fn with_install_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.install_timeout = timeout;
        self
    }

    /// `~/.npm-specifier-cache`
    pub fn default_cache_root() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| {
            LoaderError::Config("Could not determine home directory".to_string())
        })?;
        Ok(home.join(DEFAULT_CACHE_DIR))
    }

    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_overrides(
            lookup(CACHE_PATH_ENV).map(PathBuf::from),
            lookup(NPM_PATH_ENV).map(PathBuf::from),
        )
    }

    /// Apply optional overrides on top of the defaults.
    ///
    /// Empty paths count as unset.
    pub fn from_overrides(cache_root: Option<PathBuf>, npm_path: Option<PathBuf>) -> Result<Self> {
        let set = |path: Option<PathBuf>| path.filter(|p| !p.as_os_str().is_empty());

        let cache_root = match set(cache_root) {
            Some(path) => path,
            None => Self::default_cache_root()?,
        };
        let npm_path = set(npm_path).unwrap_or_else(|| PathBuf::from(DEFAULT_NPM));

        Ok(Self::new(cache_root, npm_path))
    }
}

/// Resolve `npm:` specifiers by installing packages into a local cache.
#[derive(Parser, Debug, Clone)]
#[command(name = "npmspec")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Cache root directory (defaults to ~/.npm-specifier-cache)
    #[arg(long, env = CACHE_PATH_ENV, global = true)]
    pub cache_path: Option<PathBuf>,

    /// npm executable to run
    #[arg(long, env = NPM_PATH_ENV, global = true)]
    pub npm_path: Option<PathBuf>,

    /// Kill an install after this many seconds (0 disables)
    #[arg(long, env = INSTALL_TIMEOUT_ENV, global = true)]
    pub install_timeout: Option<u64>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve specifiers to module URLs, installing npm: packages as needed
    Resolve(ResolveConfig),
    /// Show the alias and install name for install tokens
    Alias(AliasConfig),
    /// Print the effective cache root
    CachePath,
}

/// Configuration for the resolve command.
#[derive(Parser, Debug, Clone)]
pub struct ResolveConfig {
    /// Specifiers to resolve (e.g. npm:react@^18.0.0, ./local/file.js)
    #[arg(required = true)]
    pub specifiers: Vec<String>,

    /// Importing file that relative specifiers are resolved against
    #[arg(long)]
    pub parent: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Number of specifiers to resolve concurrently
    #[arg(long, short = 'p', default_value = "4")]
    pub parallel: usize,
}

/// Configuration for the alias command.
#[derive(Parser, Debug, Clone)]
pub struct AliasConfig {
    /// Install tokens, with or without the npm: prefix
    #[arg(required = true)]
    pub tokens: Vec<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl Config {
    /// Loader settings from the global flags, falling back to defaults.
    pub fn loader_config(&self) -> Result<LoaderConfig> {
        let timeout = self
            .install_timeout
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(
            LoaderConfig::from_overrides(self.cache_path.clone(), self.npm_path.clone())?
                .with_install_timeout(timeout),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = LoaderConfig::from_lookup(lookup(&[
            (CACHE_PATH_ENV, "/var/cache/npmspec"),
            (NPM_PATH_ENV, "/usr/local/bin/npm"),
        ]))
        .unwrap();

        assert_eq!(config.cache_root, PathBuf::from("/var/cache/npmspec"));
        assert_eq!(config.npm_path, PathBuf::from("/usr/local/bin/npm"));
        assert_eq!(config.install_timeout, None);
    }

    #[test]
    fn test_from_lookup_empty_is_unset() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let config =
            LoaderConfig::from_lookup(lookup(&[(CACHE_PATH_ENV, ""), (NPM_PATH_ENV, "")])).unwrap();

        assert_eq!(config.cache_root, home.join(DEFAULT_CACHE_DIR));
        assert_eq!(config.npm_path, PathBuf::from(DEFAULT_NPM));
    }

    #[test]
    fn test_cli_and_env_share_overrides() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let from_empty = LoaderConfig::from_overrides(Some(PathBuf::new()), Some(PathBuf::new()));
        let env =
            LoaderConfig::from_lookup(lookup(&[(CACHE_PATH_ENV, ""), (NPM_PATH_ENV, "")])).unwrap();
        assert_eq!(from_empty.unwrap(), env);
        assert_eq!(env.cache_root, home.join(DEFAULT_CACHE_DIR));

        let cli = Config::try_parse_from(["npmspec", "--npm-path", "/bin/npm", "cache-path"])
            .unwrap()
            .loader_config()
            .unwrap();
        let expected =
            LoaderConfig::from_overrides(Some(cli.cache_root.clone()), Some("/bin/npm".into()))
                .unwrap();
        assert_eq!(cli, expected);
    }

    #[test]
    fn test_cli_parses_resolve() {
        let config = Config::try_parse_from([
            "npmspec",
            "--cache-path",
            "/tmp/cache",
            "--install-timeout",
            "60",
            "resolve",
            "npm:left-pad",
            "./main.js",
            "-p",
            "2",
        ])
        .unwrap();

        let Commands::Resolve(resolve) = &config.command else {
            panic!("Expected resolve command");
        };
        assert_eq!(resolve.specifiers, vec!["npm:left-pad", "./main.js"]);
        assert_eq!(resolve.parallel, 2);

        let loader = config.loader_config().unwrap();
        assert_eq!(loader.cache_root, PathBuf::from("/tmp/cache"));
        assert_eq!(loader.install_timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_zero_timeout_disables() {
        let config = Config::try_parse_from([
            "npmspec",
            "--cache-path",
            "/tmp/cache",
            "--npm-path",
            "/bin/npm",
            "--install-timeout",
            "0",
            "cache-path",
        ])
        .unwrap();

        let loader = config.loader_config().unwrap();
        assert_eq!(loader.install_timeout, None);
        assert_eq!(loader.npm_path, PathBuf::from("/bin/npm"));
    }
}
