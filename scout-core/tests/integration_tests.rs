//! Integration tests for scout-core infrastructure

use scout_core::{
    config_error, validation_error, ErrorContext, LoggingConfig, ScoutConfig, ScoutError,
};

#[test]
fn test_error_handling() {
    // Test error creation with context
    let error = config_error!("Test config error", "test_component");

    match &error {
        ScoutError::Config {
            message, context, ..
        } => {
            assert_eq!(message, "Test config error");
            assert_eq!(context.component, "test_component");
            assert!(!context.error_id.is_empty());
            assert!(!context.recovery_suggestions.is_empty());
        }
        _ => panic!("Expected Config error"),
    }

    // Test error logging (should not panic)
    error.log();

    // Test error recoverability
    let network_error = ScoutError::Network {
        message: "Connection failed".to_string(),
        source: None,
        context: ErrorContext::new("test"),
    };
    assert!(network_error.is_recoverable());
    assert!(network_error.retry_delay_ms().is_some());

    let config_error = config_error!("Invalid config", "test");
    assert!(!config_error.is_recoverable());
    assert!(config_error.retry_delay_ms().is_none());

    let validation = validation_error!("temperature out of range", "temperature", "test");
    assert!(!validation.is_recoverable());
}

#[test]
fn test_default_config_is_valid() {
    let config = ScoutConfig::default();
    config.validate().expect("default config should validate");

    assert_eq!(config.llm.model, "gpt-4o-mini");
    assert_eq!(config.search.max_results, 5);
    assert!(!config.llm.fallback_models.is_empty());
}

#[test]
fn test_model_alias_resolution() {
    let config = ScoutConfig::default();

    assert_eq!(config.resolve_model_alias("default"), Some("gpt-4o-mini"));
    assert_eq!(
        config.resolve_model_alias("deepseek-free"),
        Some("deepseek/deepseek-chat-v3-0324:free")
    );
    assert_eq!(config.resolve_model_alias("not-a-model"), None);
}

#[test]
fn test_config_validation_rejects_bad_temperature() {
    let mut config = ScoutConfig::default();
    config.llm.temperature = 2.5;

    let result = config.validate();
    assert!(result.is_err());
    match result.unwrap_err() {
        ScoutError::Config { message, .. } => {
            assert!(message.contains("temperature"));
        }
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_config_roundtrip_through_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("scout.toml");

    let mut config = ScoutConfig::default();
    config.llm.model = "gpt-4o".to_string();
    config.history.log_path = Some("/tmp/research-log.jsonl".to_string());
    config.save_to_file(&path).expect("save config");

    let loaded = ScoutConfig::from_file(&path).expect("load config");
    assert_eq!(loaded.llm.model, "gpt-4o");
    assert_eq!(
        loaded.history.log_path.as_deref(),
        Some("/tmp/research-log.jsonl")
    );
}

#[test]
fn test_logging_initialization() {
    let config = LoggingConfig {
        level: "debug".to_string(),
        format: scout_core::LogFormat::Compact,
        include_location: false,
        log_file_path: None,
        enable_performance_monitoring: false,
        filter_directives: vec!["scout_core=debug".to_string()],
    };

    // The subscriber can only be installed once per process, so a second
    // initialization may legitimately fail; the call must not panic.
    let _ = scout_core::init_logging(&config);
}
