//! npmspec - load `npm:` specifiers from a local package cache.
//!
//! CLI entry point.

use clap::Parser;
use npmspec::notify::ConsoleOutput;
use npmspec::{
    strip_npm_prefix, AliasConfig, Commands, Config, LoaderConfig, NodeResolver,
    NpmSpecifierLoader, PackageTarget, ResolveConfig, ResolveContext,
};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;
use url::Url;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Set up logging
    let filter = if config.verbose {
        EnvFilter::new("npmspec=debug,info")
    } else {
        EnvFilter::new("npmspec=info,warn")
    };

    // Logs go to stderr so --json output stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let loader_config = match config.loader_config() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = match &config.command {
        Commands::Resolve(resolve_config) => {
            run_resolve(resolve_config, &loader_config, config.verbose).await
        }
        Commands::Alias(alias_config) => run_alias(alias_config, &loader_config),
        Commands::CachePath => {
            println!("{}", loader_config.cache_root.display());
            Ok(())
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => code,
    }
}

async fn run_resolve(
    resolve_config: &ResolveConfig,
    loader_config: &LoaderConfig,
    verbose: bool,
) -> Result<(), ExitCode> {
    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            error!("Failed to read current directory: {}", e);
            return Err(ExitCode::FAILURE);
        }
    };

    let context = match &resolve_config.parent {
        Some(parent) => {
            let parent = cwd.join(parent);
            match Url::from_file_path(&parent) {
                Ok(url) => ResolveContext::with_parent(url),
                Err(()) => {
                    error!("Invalid parent path: {}", parent.display());
                    return Err(ExitCode::FAILURE);
                }
            }
        }
        None => ResolveContext::default(),
    };

    let loader = NpmSpecifierLoader::from_config(loader_config);
    let fallback = NodeResolver::new(&cwd);
    let console = ConsoleOutput::new(verbose, resolve_config.json);

    let reports = loader
        .resolve_many(
            &resolve_config.specifiers,
            &context,
            &fallback,
            resolve_config.parallel,
        )
        .await;

    if let Err(e) = console.print_reports(&reports) {
        error!("Failed to write results: {}", e);
        return Err(ExitCode::FAILURE);
    }

    if reports.iter().all(|r| r.is_ok()) {
        Ok(())
    } else {
        Err(ExitCode::FAILURE)
    }
}

fn run_alias(alias_config: &AliasConfig, loader_config: &LoaderConfig) -> Result<(), ExitCode> {
    let targets: Vec<PackageTarget> = alias_config
        .tokens
        .iter()
        .map(|token| {
            let token = strip_npm_prefix(token).unwrap_or(token);
            PackageTarget::new(token, &loader_config.cache_root)
        })
        .collect();

    ConsoleOutput::new(false, alias_config.json)
        .print_targets(&targets)
        .map_err(|e| {
            error!("Failed to write results: {}", e);
            ExitCode::FAILURE
        })
}
