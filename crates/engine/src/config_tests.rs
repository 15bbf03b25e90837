use super::*;

#[test]
fn defaults_match_spec_tunables() {
    let config = EngineConfig::default();
    assert_eq!(config.max_remediation_depth, 3);
    assert_eq!(config.max_parallel_agents, 5);
    assert_eq!(config.min_confidence, 0.7);
    assert_eq!(config.analysis_timeout_ms, 60_000);
}

#[test]
fn glob_matches_wildcard_patterns() {
    let config = EngineConfig {
        core_file_patterns: vec!["src/schema/*.rs".to_string(), "migrations/*".to_string()],
        ..EngineConfig::default()
    };
    assert!(config.is_core_file("src/schema/user.rs"));
    assert!(config.is_core_file("migrations/0001_init.sql"));
    assert!(!config.is_core_file("src/handlers/login.rs"));
}

#[test]
fn loads_from_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
        max_parallel_agents = 8
        min_confidence = 0.9
        core_file_patterns = ["src/schema/*"]
        primary_ci_pipelines = ["ci/build"]
        "#,
    )
    .unwrap();

    let config = EngineConfig::load(&path).unwrap();
    assert_eq!(config.max_parallel_agents, 8);
    assert_eq!(config.min_confidence, 0.9);
    assert!(config.is_primary_pipeline("ci/build"));
    assert!(!config.is_primary_pipeline("ci/lint"));
}

#[test]
fn missing_file_is_a_read_error() {
    let result = EngineConfig::load(std::path::Path::new("/nonexistent/config.toml"));
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}
