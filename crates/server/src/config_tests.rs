use super::*;

#[test]
fn env_var_or_falls_back_to_default_when_unset() {
    std::env::remove_var("RELAY_CONFIG_TESTS_UNSET_VAR");
    assert_eq!(env_var_or("RELAY_CONFIG_TESTS_UNSET_VAR", "fallback"), "fallback");
}

#[test]
fn env_var_or_prefers_the_environment_when_set() {
    std::env::set_var("RELAY_CONFIG_TESTS_SET_VAR", "from-env");
    assert_eq!(env_var_or("RELAY_CONFIG_TESTS_SET_VAR", "fallback"), "from-env");
    std::env::remove_var("RELAY_CONFIG_TESTS_SET_VAR");
}

#[test]
fn env_var_errors_when_missing() {
    std::env::remove_var("RELAY_CONFIG_TESTS_REQUIRED_VAR");
    let err = env_var("RELAY_CONFIG_TESTS_REQUIRED_VAR").unwrap_err();
    assert!(matches!(err, ConfigError::MissingEnv("RELAY_CONFIG_TESTS_REQUIRED_VAR")));
}

#[test]
fn from_env_loads_defaults_for_engine_config_when_no_toml_present() {
    std::env::remove_var("RELAY_CONFIG_PATH");
    std::env::set_var("RELAY_WEBHOOK_SECRET", "shh");
    std::env::set_var("RELAY_AGENT_PROVIDER_URL", "https://agents.example");
    std::env::set_var("RELAY_AGENT_PROVIDER_KEY", "k1");
    std::env::set_var("RELAY_VCS_PROVIDER_URL", "https://vcs.example");
    std::env::set_var("RELAY_VCS_PROVIDER_KEY", "k2");
    std::env::set_var("RELAY_AUDITOR_URL", "https://auditor.example");
    std::env::set_var("RELAY_AUDITOR_KEY", "k3");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.engine.max_parallel_agents, EngineConfig::default().max_parallel_agents);
    assert_eq!(config.bind_addr, "0.0.0.0:8080");

    for var in [
        "RELAY_WEBHOOK_SECRET",
        "RELAY_AGENT_PROVIDER_URL",
        "RELAY_AGENT_PROVIDER_KEY",
        "RELAY_VCS_PROVIDER_URL",
        "RELAY_VCS_PROVIDER_KEY",
        "RELAY_AUDITOR_URL",
        "RELAY_AUDITOR_KEY",
    ] {
        std::env::remove_var(var);
    }
}
