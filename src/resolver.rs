//! The fetch-or-generate pipeline
//!
//! Given a requested artifact name and a package, the resolver finds the
//! configured badge, resolves its generator, and serves the artifact from
//! the cache or by invoking the generator. Only an unresolvable badge or
//! generator is a hard failure; everything downstream of that collapses
//! into the synthesized error badge, so a resolvable badge always yields
//! an artifact.

use crate::badge::{error_badge, generator_id, is_well_formed, Generator, GeneratorRegistry};
use crate::config::BadgeConfig;
use crate::error::{BadgerError, BadgerResult};
use crate::metadata::{MetadataLookup, PackageMetadata};
use crate::store::{derive_key, ContentStore};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Badge artifact resolver.
///
/// Cheap to share: clone the `Arc`s and run one resolution per request
/// task. No mutual exclusion is applied per key; two concurrent misses for
/// the same key may both generate, and the last write wins. Generators are
/// pure, so that is duplicate work, not corruption.
pub struct ArtifactResolver {
    badges: BTreeMap<String, BadgeConfig>,
    registry: Arc<dyn GeneratorRegistry>,
    metadata: Arc<dyn MetadataLookup>,
    store: Arc<ContentStore>,
}

impl ArtifactResolver {
    pub fn new(
        badges: BTreeMap<String, BadgeConfig>,
        registry: Arc<dyn GeneratorRegistry>,
        metadata: Arc<dyn MetadataLookup>,
        store: Arc<ContentStore>,
    ) -> Self {
        Self {
            badges,
            registry,
            metadata,
            store,
        }
    }

    /// Resolve `artifact` (e.g. `cov.svg`) for a package.
    ///
    /// Returns the artifact bytes, or the not-found errors
    /// ([`BadgerError::BadgeNotFound`] / [`BadgerError::GeneratorUnresolved`])
    /// when no configured badge or registered generator matches. Any later
    /// failure degrades to the error badge instead.
    pub async fn resolve_artifact(
        &self,
        artifact: &str,
        scope: Option<&str>,
        name: &str,
    ) -> BadgerResult<Vec<u8>> {
        let (badge_name, badge) = self
            .badges
            .iter()
            .find(|(_, cfg)| cfg.name == artifact)
            .ok_or_else(|| BadgerError::BadgeNotFound(artifact.to_string()))?;

        let gen_id = generator_id(badge_name);
        let generator = self
            .registry
            .resolve(&gen_id)
            .ok_or_else(|| BadgerError::GeneratorUnresolved(gen_id.clone()))?;

        // From here on nothing is fatal to the request.
        match self
            .produce(generator.as_ref(), &gen_id, badge, scope, name)
            .await
        {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                warn!(artifact, generator = %gen_id, error = %e, "serving error badge");
                Ok(error_badge(&gen_id))
            }
        }
    }

    async fn produce(
        &self,
        generator: &dyn Generator,
        gen_id: &str,
        badge: &BadgeConfig,
        scope: Option<&str>,
        name: &str,
    ) -> BadgerResult<Vec<u8>> {
        let module = match scope {
            Some(scope) => format!("{scope}/{name}"),
            None => name.to_string(),
        };
        let metadata = self.metadata.fetch(&module).await?;
        let version = metadata
            .latest()
            .ok_or_else(|| BadgerError::metadata(&module, "no latest dist-tag"))?
            .to_string();

        let key = derive_key(scope, Some(name), Some(&version), Some(gen_id));
        self.fetch_or_generate(generator, gen_id, badge, &metadata, &key)
            .await
    }

    async fn fetch_or_generate(
        &self,
        generator: &dyn Generator,
        gen_id: &str,
        badge: &BadgeConfig,
        metadata: &PackageMetadata,
        key: &str,
    ) -> BadgerResult<Vec<u8>> {
        // Forced bypass deletes before the existence check, so whatever the
        // check still sees afterwards is served as-is. With this backend
        // the delete is immediate and the call regenerates.
        if !badge.use_cache {
            self.store.delete_one(key).await?;
        }

        if self.store.exists(key).await {
            match self.store.read(key).await {
                Ok(bytes) => {
                    debug!(key, "cache hit");
                    return Ok(bytes);
                }
                // The entry vanished between check and read. Worth a
                // warning, but the request just falls through to
                // generation.
                Err(e) => warn!(key, error = %e, "cache entry lost after existence check"),
            }
        }

        debug!(key, generator = %gen_id, "cache miss, generating");
        let bytes = generator.render(metadata, &badge.options).await?;

        if !is_well_formed(&bytes) {
            return Err(BadgerError::MalformedArtifact(gen_id.to_string()));
        }

        if badge.use_cache {
            self.store.write(key, bytes).await
        } else {
            Ok(bytes)
        }
    }
}
