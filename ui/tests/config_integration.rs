use claims::{assert_err, assert_ok};
use nimbus::app::commands::config::write_default_config;
use nimbus::config::defaults::DEFAULT_CONFIG;
use nimbus::config::{AppConfig, ConfigLoadResult, ConfigValidationError, parse_config};
use nimbus::AppError;
use std::path::Path;
use std::time::Duration;

fn parsed(contents: &str) -> AppConfig {
    match parse_config(contents) {
        ConfigLoadResult::Success(config) => *config,
        other => panic!("expected a parsed config, got {other:?}"),
    }
}

mod loading {
    use super::*;

    #[test]
    fn test_shipped_default_config_is_valid() {
        let config = parsed(DEFAULT_CONFIG);
        assert_ok!(config.validate());
        assert_eq!(config.api().base_url(), "http://localhost:8000");
        assert_eq!(config.api().timeout(), Duration::from_secs(30));
        assert_eq!(config.logging().level(), "info");
    }

    #[test]
    fn test_empty_config_falls_back_to_defaults() {
        let config = parsed("");
        assert_eq!(config.api().base_url(), "http://localhost:8000");
        assert_eq!(config.api().timeout_secs(), 30);
        assert_eq!(config.logging().file_or_default(), "nimbus.log");
        assert!(config.storage().session_file().is_none());
    }

    #[test]
    fn test_sections_are_read() {
        let config = parsed(
            r#"
            [api]
            base_url = "https://console.example.com"
            timeout_secs = 5

            [logging]
            level = "debug"
            file = "/tmp/nimbus-test.log"

            [storage]
            session_file = "/tmp/nimbus-session.json"
            "#,
        );
        assert_eq!(config.api().base_url(), "https://console.example.com");
        assert_eq!(config.api().timeout_secs(), 5);
        assert_eq!(config.logging().file(), Some("/tmp/nimbus-test.log"));
        assert_eq!(
            config.session_file().as_deref(),
            Some(Path::new("/tmp/nimbus-session.json"))
        );

        let effective = config.effective();
        assert_eq!(effective.logging.level, "debug");
        assert_eq!(effective.storage.session_file, "/tmp/nimbus-session.json");
    }

    #[test]
    fn test_wrong_type_is_a_deserialize_error() {
        let result = parse_config("[api]\ntimeout_secs = \"soon\"\n");
        assert!(matches!(result, ConfigLoadResult::DeserializeError(_)));
        assert_err!(result.config());
    }
}

mod validation {
    use super::*;

    #[test]
    fn test_all_problems_are_reported_together() {
        let config = parsed(
            r#"
            [api]
            base_url = "localhost:8000"
            timeout_secs = 0

            [logging]
            level = "loud"
            "#,
        );

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigValidationError::ApiTimeout {
                configured: 0,
                min_limit: 1,
                max_limit: 300
            }
        )));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigValidationError::BaseUrl { configured } if configured == "localhost:8000")));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigValidationError::LogLevel { .. })));
    }

    #[test]
    fn test_upper_timeout_bound_is_inclusive() {
        assert_ok!(parsed("[api]\ntimeout_secs = 300\n").validate());
        assert_err!(parsed("[api]\ntimeout_secs = 301\n").validate());
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        assert_ok!(parsed("[logging]\nlevel = \"WARN\"\n").validate());
    }
}

mod init {
    use super::*;

    #[test]
    fn test_writes_default_config_once() {
        let dir = tempfile::tempdir().unwrap();

        let path = assert_ok!(write_default_config(dir.path(), false));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);

        std::fs::write(&path, "[api]\n").unwrap();
        let refused = write_default_config(dir.path(), false);
        assert!(matches!(refused, Err(AppError::Config(msg)) if msg.contains("--force")));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[api]\n");

        assert_ok!(write_default_config(dir.path(), true));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
