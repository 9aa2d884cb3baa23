//! Configuration schema for Badger
//!
//! Configuration is stored at `~/.config/badger/config.toml`

use crate::badge::GeneratorOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::warn;

/// Longest allowed artifact name stem.
const MAX_STEM: usize = 28;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Master switch; a disabled instance resolves nothing
    pub enabled: bool,

    /// Cache store root. Unset disables caching entirely.
    pub cache: Option<PathBuf>,

    /// Base URL of the package registry to query
    pub registry: String,

    /// Badge table: badge name -> configuration
    pub badges: BTreeMap<String, BadgeConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            cache: None,
            registry: "https://registry.npmjs.org".to_string(),
            badges: BTreeMap::new(),
        }
    }
}

/// Configuration of a single badge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeConfig {
    /// Artifact filename this badge answers to (e.g. `cov.svg`)
    pub name: String,

    /// Whether resolved artifacts may be served from cache
    #[serde(default = "default_true")]
    pub use_cache: bool,

    /// Opaque options forwarded to the generator
    #[serde(default)]
    pub options: GeneratorOptions,
}

fn default_true() -> bool {
    true
}

/// Whether `name` is an acceptable artifact filename:
/// a 1-28 character stem of `[0-9a-z_-]` (case-insensitive) plus `.svg`.
pub fn valid_artifact_name(name: &str) -> bool {
    if name.len() < 5 || !name.is_char_boundary(name.len() - 4) {
        return false;
    }
    let (stem, ext) = name.split_at(name.len() - 4);
    if !ext.eq_ignore_ascii_case(".svg") {
        return false;
    }

    !stem.is_empty()
        && stem.len() <= MAX_STEM
        && stem
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl Config {
    /// Drop badge entries that could never be served.
    ///
    /// Mirrors the permissive config handling of the rest of the system: a
    /// bad badge entry is warned about and skipped, never a hard error.
    pub fn sanitize(mut self) -> Self {
        self.badges.retain(|badge, entry| {
            if valid_artifact_name(&entry.name) {
                true
            } else {
                warn!(badge, artifact = %entry.name, "dropping badge with invalid artifact name");
                false
            }
        });
        self
    }
}
