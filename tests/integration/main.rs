//! Integration tests for Badger

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;

    fn badger() -> Command {
        cargo_bin_cmd!("badger")
    }

    #[test]
    fn help_displays() {
        badger()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("badge resolution"));
    }

    #[test]
    fn version_displays() {
        badger()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("badger"));
    }

    #[test]
    fn unknown_badge_is_a_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        std::fs::write(&config, "").unwrap();

        badger()
            .args(["resolve", "pkg", "--badge", "nope.svg"])
            .args(["--config", config.to_str().unwrap()])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No badge is configured"));
    }

    #[test]
    fn cache_verify_without_cache_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        std::fs::write(&config, "").unwrap();

        badger()
            .args(["cache", "verify"])
            .args(["--config", config.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("caching is disabled"));
    }

    #[test]
    fn cache_clear_with_configured_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        std::fs::write(&config, "cache = \"store\"\n").unwrap();

        badger()
            .args(["cache", "clear"])
            .args(["--config", config.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("Cache cleared"));
        assert!(dir.path().join("store").is_dir());
    }
}

mod pipeline_tests {
    use async_trait::async_trait;
    use badger::badge::{error_badge, Generator, GeneratorOptions, StaticRegistry};
    use badger::config::BadgeConfig;
    use badger::metadata::{MetadataLookup, PackageMetadata};
    use badger::resolver::ArtifactResolver;
    use badger::store::{derive_key, ContentStore, StoreConfig};
    use badger::BadgerResult;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    const COV_SVG: &[u8] = b"<svg xmlns=\"http://www.w3.org/2000/svg\">98%</svg>";

    /// Registry fixture answering every module with dist-tags.latest 2.0.0.
    struct StubRegistry;

    #[async_trait]
    impl MetadataLookup for StubRegistry {
        async fn fetch(&self, module: &str) -> BadgerResult<PackageMetadata> {
            Ok(serde_json::from_value(serde_json::json!({
                "name": module,
                "dist-tags": {"latest": "2.0.0"},
                "versions": {"2.0.0": {"license": "MIT"}},
            }))
            .unwrap())
        }
    }

    struct CovGenerator {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Generator for CovGenerator {
        async fn render(
            &self,
            _metadata: &PackageMetadata,
            _options: &GeneratorOptions,
        ) -> BadgerResult<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(COV_SVG.to_vec())
        }
    }

    fn cov_badges() -> BTreeMap<String, BadgeConfig> {
        let mut badges = BTreeMap::new();
        badges.insert(
            "cov".to_string(),
            BadgeConfig {
                name: "cov.svg".to_string(),
                use_cache: true,
                options: GeneratorOptions::new(),
            },
        );
        badges
    }

    async fn open_store(dir: &TempDir) -> Arc<ContentStore> {
        Arc::new(
            ContentStore::open(&StoreConfig {
                root: Some(dir.path().join("cache")),
            })
            .await,
        )
    }

    #[tokio::test]
    async fn end_to_end_miss_then_hit() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        let calls = Arc::new(AtomicUsize::new(0));

        let mut registry = StaticRegistry::new();
        registry.register("badger-cov", Arc::new(CovGenerator { calls: calls.clone() }));

        let resolver = ArtifactResolver::new(
            cov_badges(),
            Arc::new(registry),
            Arc::new(StubRegistry),
            store.clone(),
        );

        // First request: miss, generate, store.
        let first = resolver.resolve_artifact("cov.svg", None, "pkg").await.unwrap();
        assert_eq!(first, COV_SVG);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let key = derive_key(None, Some("pkg"), Some("2.0.0"), Some("badger-cov"));
        assert!(store.exists(&key).await);

        // Second identical request: hit, byte-for-byte, no generator call.
        let second = resolver.resolve_artifact("cov.svg", None, "pkg").await.unwrap();
        assert_eq!(second, first);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cache_survives_resolver_restart() {
        let dir = TempDir::new().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));

        for expected_calls in [1, 1] {
            let store = open_store(&dir).await;
            let mut registry = StaticRegistry::new();
            registry.register("badger-cov", Arc::new(CovGenerator { calls: calls.clone() }));

            let resolver = ArtifactResolver::new(
                cov_badges(),
                Arc::new(registry),
                Arc::new(StubRegistry),
                store,
            );
            let bytes = resolver.resolve_artifact("cov.svg", None, "pkg").await.unwrap();
            assert_eq!(bytes, COV_SVG);
            assert_eq!(calls.load(Ordering::SeqCst), expected_calls);
        }
    }

    #[tokio::test]
    async fn concurrent_requests_all_succeed() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        let calls = Arc::new(AtomicUsize::new(0));

        let mut registry = StaticRegistry::new();
        registry.register("badger-cov", Arc::new(CovGenerator { calls: calls.clone() }));

        let resolver = Arc::new(ArtifactResolver::new(
            cov_badges(),
            Arc::new(registry),
            Arc::new(StubRegistry),
            store,
        ));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let resolver = resolver.clone();
                tokio::spawn(async move {
                    resolver.resolve_artifact("cov.svg", None, "pkg").await
                })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), COV_SVG);
        }

        // Concurrent misses may each generate (no per-key exclusion), but
        // the duplicate work is bounded by the request count.
        let generated = calls.load(Ordering::SeqCst);
        assert!(generated >= 1 && generated <= 8);
    }

    #[tokio::test]
    async fn builtin_version_badge_end_to_end() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let mut badges = BTreeMap::new();
        badges.insert(
            "version".to_string(),
            BadgeConfig {
                name: "version.svg".to_string(),
                use_cache: true,
                options: GeneratorOptions::new(),
            },
        );

        let resolver = ArtifactResolver::new(
            badges,
            Arc::new(StaticRegistry::builtin()),
            Arc::new(StubRegistry),
            store,
        );

        let bytes = resolver
            .resolve_artifact("version.svg", None, "pkg")
            .await
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("v2.0.0"));
        assert_ne!(text.into_bytes(), error_badge("badger-version"));
    }
}
