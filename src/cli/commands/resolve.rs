//! Resolve command - fetch or generate a badge artifact

use crate::badge::StaticRegistry;
use crate::cli::args::ResolveArgs;
use crate::config::{Config, ConfigManager};
use crate::error::{BadgerError, BadgerResult};
use crate::metadata::HttpRegistryLookup;
use crate::resolver::ArtifactResolver;
use crate::store::ContentStore;
use std::io::Write;
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

/// Execute the resolve command
pub async fn execute(args: ResolveArgs, manager: &ConfigManager, config: &Config) -> BadgerResult<()> {
    if !config.enabled {
        return Err(BadgerError::Internal(
            "badge resolution is disabled in the configuration".to_string(),
        ));
    }

    let registry_url = args
        .registry
        .as_deref()
        .unwrap_or(config.registry.as_str());
    let (scope, name) = split_package(&args.package);
    debug!(package = %args.package, badge = %args.badge, registry = %registry_url, "resolving");

    let store = Arc::new(ContentStore::open(&manager.store_config(config)).await);
    let resolver = ArtifactResolver::new(
        config.badges.clone(),
        Arc::new(StaticRegistry::builtin()),
        Arc::new(HttpRegistryLookup::new(registry_url)),
        store,
    );

    let artifact = resolver.resolve_artifact(&args.badge, scope, name).await?;

    match args.output {
        Some(path) => {
            fs::write(&path, &artifact)
                .await
                .map_err(|e| BadgerError::io("writing artifact", e))?;
            println!("Wrote {} bytes to {}", artifact.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&artifact)
                .and_then(|()| stdout.write_all(b"\n"))
                .map_err(|e| BadgerError::io("writing artifact to stdout", e))?;
        }
    }

    Ok(())
}

/// Split `@scope/name` into its scope and name parts.
fn split_package(package: &str) -> (Option<&str>, &str) {
    if package.starts_with('@') {
        match package.split_once('/') {
            Some((scope, name)) => (Some(scope), name),
            None => (None, package),
        }
    } else {
        (None, package)
    }
}
