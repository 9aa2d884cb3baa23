//! Generator registration and lookup
//!
//! Generators are pluggable producers of badge artifacts, resolved by
//! string id from a registry. The resolver only depends on the
//! [`GeneratorRegistry`] trait; [`StaticRegistry`] is the in-process
//! registration-table implementation and ships the built-in generators.

use crate::badge::svg::flat_badge;
use crate::error::{BadgerError, BadgerResult};
use crate::metadata::PackageMetadata;
use async_trait::async_trait;
use serde_json::Map;
use std::collections::HashMap;
use std::sync::Arc;

/// Per-badge generator options, opaque to the pipeline.
pub type GeneratorOptions = Map<String, serde_json::Value>;

/// A badge artifact producer.
///
/// Implementations must be pure with respect to their inputs: the same
/// metadata and options should yield the same bytes, so concurrent
/// duplicate generation for one key stays benign.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn render(
        &self,
        metadata: &PackageMetadata,
        options: &GeneratorOptions,
    ) -> BadgerResult<Vec<u8>>;
}

/// Abstract generator lookup
pub trait GeneratorRegistry: Send + Sync {
    /// Look up a generator by id. Side-effect free; `None` means the
    /// caller must surface a hard not-found, never an error badge.
    fn resolve(&self, id: &str) -> Option<Arc<dyn Generator>>;
}

/// Normalize a configured badge name into its generator id.
///
/// Unscoped names get the `badger-` prefix unless they already carry it;
/// scoped names (`@scope/...`) pass through untouched. Names that cannot
/// be a package name yield an empty id, which never resolves.
pub fn generator_id(badge: &str) -> String {
    if badge.is_empty() || badge.contains(char::is_whitespace) {
        return String::new();
    }

    if badge.starts_with('@') {
        // Must look like @scope/name to count as scoped.
        match badge.split_once('/') {
            Some((scope, name)) if scope.len() > 1 && !name.is_empty() && !name.contains('/') => {
                badge.to_string()
            }
            _ => String::new(),
        }
    } else if badge.contains('/') {
        String::new()
    } else if badge.starts_with("badger") {
        badge.to_string()
    } else {
        format!("badger-{badge}")
    }
}

/// In-process registration table.
#[derive(Default)]
pub struct StaticRegistry {
    generators: HashMap<String, Arc<dyn Generator>>,
}

impl StaticRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the built-in generators.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("badger-version", Arc::new(VersionGenerator));
        registry.register("badger-license", Arc::new(LicenseGenerator));
        registry
    }

    /// Register a generator under `id`, replacing any previous one.
    pub fn register(&mut self, id: impl Into<String>, generator: Arc<dyn Generator>) {
        self.generators.insert(id.into(), generator);
    }
}

impl GeneratorRegistry for StaticRegistry {
    fn resolve(&self, id: &str) -> Option<Arc<dyn Generator>> {
        self.generators.get(id).cloned()
    }
}

fn option_str<'a>(options: &'a GeneratorOptions, key: &str, default: &'a str) -> &'a str {
    options.get(key).and_then(|v| v.as_str()).unwrap_or(default)
}

/// Renders the version the `latest` dist-tag points at.
pub struct VersionGenerator;

#[async_trait]
impl Generator for VersionGenerator {
    async fn render(
        &self,
        metadata: &PackageMetadata,
        options: &GeneratorOptions,
    ) -> BadgerResult<Vec<u8>> {
        let version = metadata.latest().ok_or_else(|| {
            BadgerError::generation("badger-version", "no latest dist-tag")
        })?;

        Ok(flat_badge(
            option_str(options, "label", "version"),
            &format!("v{version}"),
            "#555",
            option_str(options, "color", "#08c"),
        ))
    }
}

/// Renders the license field of the latest published version.
pub struct LicenseGenerator;

#[async_trait]
impl Generator for LicenseGenerator {
    async fn render(
        &self,
        metadata: &PackageMetadata,
        options: &GeneratorOptions,
    ) -> BadgerResult<Vec<u8>> {
        let license = metadata
            .latest_manifest()
            .and_then(|m| m.get("license"))
            .and_then(|l| l.as_str())
            .ok_or_else(|| BadgerError::generation("badger-license", "no license in manifest"))?;

        Ok(flat_badge(
            option_str(options, "label", "license"),
            license,
            "#555",
            option_str(options, "color", "#777"),
        ))
    }
}
