//! Package metadata lookup
//!
//! The resolver treats metadata as opaque input for generators; the only
//! field it inspects itself is the `latest` dist-tag, which pins the cache
//! key to a concrete version.

use crate::error::{BadgerError, BadgerResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// The subset of an npm-style packument the pipeline cares about.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub name: String,

    /// Per-version manifests, kept as raw JSON for generators to pick over.
    #[serde(default)]
    pub versions: BTreeMap<String, serde_json::Value>,

    /// Publish timestamps keyed by version.
    #[serde(default)]
    pub time: BTreeMap<String, String>,

    #[serde(rename = "dist-tags", default)]
    pub dist_tags: BTreeMap<String, String>,
}

impl PackageMetadata {
    /// The version the `latest` dist-tag points at.
    pub fn latest(&self) -> Option<&str> {
        self.dist_tags.get("latest").map(String::as_str)
    }

    /// The manifest of the latest version, if published.
    pub fn latest_manifest(&self) -> Option<&serde_json::Value> {
        self.versions.get(self.latest()?)
    }
}

/// Abstract package metadata lookup
///
/// `module` is the full package identifier, scope included
/// (`@scope/name` or plain `name`).
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    async fn fetch(&self, module: &str) -> BadgerResult<PackageMetadata>;
}

/// Metadata lookup against an npm-compatible HTTP registry.
pub struct HttpRegistryLookup {
    base_url: String,
}

impl HttpRegistryLookup {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    fn packument_url(&self, module: &str) -> String {
        // Scoped names keep their slash; registries expect it encoded.
        format!("{}/{}", self.base_url, module.replace('/', "%2F"))
    }
}

#[async_trait]
impl MetadataLookup for HttpRegistryLookup {
    async fn fetch(&self, module: &str) -> BadgerResult<PackageMetadata> {
        let url = self.packument_url(module);
        let owner = module.to_string();
        debug!(%url, "fetching packument");

        // ureq is blocking; keep it off the async worker threads.
        let body = tokio::task::spawn_blocking(move || -> Result<String, String> {
            let mut response = ureq::get(&url).call().map_err(|e| e.to_string())?;
            response
                .body_mut()
                .read_to_string()
                .map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| BadgerError::metadata(&owner, format!("lookup task failed: {e}")))?
        .map_err(|reason| BadgerError::metadata(&owner, reason))?;

        serde_json::from_str(&body)
            .map_err(|e| BadgerError::metadata(&owner, format!("invalid packument: {e}")))
    }
}
