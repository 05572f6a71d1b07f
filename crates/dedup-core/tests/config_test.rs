use dedup_core::config::*;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = DedupConfig::from_toml("").unwrap();

    assert_eq!(config.consolidation.similarity_threshold, 0.8);
    assert_eq!(config.consolidation.clustering_mode, ClusteringMode::OneHop);
    assert_eq!(config.consolidation.max_oracle_calls, 0);
    assert_eq!(config.consolidation.max_run_duration_secs, 0);
    assert_eq!(config.consolidation.worker_threads, 1);
    assert!(config.consolidation.clear_canonical_flag);
    assert!(config.consolidation.reconcile_before_run);
    assert_eq!(config.consolidation.min_run_interval_secs, 0);

    assert_eq!(config.storage.db_path, "dedup.db");
    assert_eq!(config.storage.busy_timeout_ms, 5_000);

    assert_eq!(config.observability.log_level, "info");
    assert!(!config.observability.json_logs);
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[consolidation]
similarity_threshold = 0.9
clustering_mode = "transitive"
worker_threads = 4

[storage]
db_path = "/var/lib/dedup/content.db"
"#;
    let config = DedupConfig::from_toml(toml).unwrap();
    assert_eq!(config.consolidation.similarity_threshold, 0.9);
    assert_eq!(config.consolidation.clustering_mode, ClusteringMode::Transitive);
    assert_eq!(config.consolidation.worker_threads, 4);
    // Non-overridden fields keep defaults
    assert!(config.consolidation.clear_canonical_flag);
    assert_eq!(config.storage.db_path, "/var/lib/dedup/content.db");
    assert_eq!(config.storage.busy_timeout_ms, 5_000);
}

#[test]
fn config_serde_roundtrip() {
    let config = DedupConfig::default();
    let toml_str = toml::to_string(&config).unwrap();
    let roundtripped = DedupConfig::from_toml(&toml_str).unwrap();
    assert_eq!(roundtripped.storage.db_path, config.storage.db_path);
    assert_eq!(
        roundtripped.consolidation.clustering_mode,
        config.consolidation.clustering_mode
    );
}

#[test]
fn validate_rejects_threshold_out_of_range() {
    let mut config = DedupConfig::default();
    config.consolidation.similarity_threshold = 1.5;
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_zero_workers() {
    let mut config = DedupConfig::default();
    config.consolidation.worker_threads = 0;
    assert!(config.validate().is_err());
}

#[test]
fn default_config_validates() {
    assert!(DedupConfig::default().validate().is_ok());
}
