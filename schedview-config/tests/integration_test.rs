//! Integration tests for schedview-config

use schedview_config::domains::logging::{LogFormat, LogLevel};
use schedview_config::domains::output::OutputFormat;
use schedview_config::*;
use std::io::Write;
use std::time::Duration;
use temp_env::with_vars;

// Tests that do not exercise env overrides use their own prefix so they
// never observe variables set by the env tests.
fn isolated_loader() -> ConfigLoader {
    ConfigLoader::with_prefix("SCHEDVIEW_ISOLATED_TEST")
}

#[test]
fn test_default_config_validation() {
    let config = SchedviewConfig::default();
    assert!(config.validate_all().is_ok());
}

#[test]
fn test_config_loader_from_env() {
    let vars = vec![
        ("SCHEDVIEW_ENDPOINT", Some("https://dagit.example.com/graphql")),
        ("SCHEDVIEW_AUTH_TOKEN", Some("secret")),
        ("SCHEDVIEW_HTTP_TIMEOUT", Some("60")),
        ("SCHEDVIEW_LOG_LEVEL", Some("debug")),
        ("SCHEDVIEW_OUTPUT_FORMAT", Some("json")),
    ];

    with_vars(vars, || {
        let loader = ConfigLoader::new();
        let config = loader.from_env().unwrap();

        assert_eq!(config.endpoint.url, "https://dagit.example.com/graphql");
        assert_eq!(config.endpoint.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.http.timeout, Duration::from_secs(60));
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.output.format, OutputFormat::Json);
    });
}

#[test]
fn test_invalid_env_values_are_reported() {
    with_vars(vec![("SCHEDVIEW_HTTP_TIMEOUT", Some("soon"))], || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(matches!(err, ConfigError::EnvError(_)));
    });

    with_vars(vec![("SCHEDVIEW_ENDPOINT", Some("dagit:3000"))], || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(matches!(err, ConfigError::DomainError { .. }));
    });
}

#[test]
fn test_env_overrides_file_values() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "endpoint:\n  url: http://localhost:3000/graphql\nhttp:\n  timeout: 45").unwrap();

    with_vars(vec![("SCHEDVIEW_HTTP_TIMEOUT", Some("90"))], || {
        let config = ConfigLoader::new().from_file(file.path()).unwrap();
        assert_eq!(config.endpoint.url, "http://localhost:3000/graphql");
        assert_eq!(config.http.timeout, Duration::from_secs(90));
    });
}

#[test]
fn test_yaml_config_serialization() {
    let yaml = SchedviewConfig::generate_sample().unwrap();
    let parsed = isolated_loader().from_yaml_str(&yaml).unwrap();
    assert_eq!(parsed, SchedviewConfig::default());
}

#[test]
fn test_empty_file_is_defaults() {
    let config = isolated_loader().from_yaml_str("   \n").unwrap();
    assert_eq!(config, SchedviewConfig::default());
}

#[test]
fn test_comprehensive_config() {
    let yaml = r#"
endpoint:
  url: "https://dagit.internal/graphql"
  auth_token: "abc123"
  headers:
    X-Tenant: analytics

http:
  timeout: 20
  connect_timeout: 5
  max_redirects: 3
  user_agent: "Test Agent"
  verify_ssl: false
  proxy:
    url: "http://proxy.internal:3128"
    no_proxy:
      - localhost
      - .internal

logging:
  level: info
  format: json
  directives:
    - "reqwest=warn"

output:
  format: json
  color: false
  tick_limit: 5
  run_limit: 10
  show_stack: true
"#;

    let config = isolated_loader().from_yaml_str(yaml).unwrap();

    assert_eq!(config.endpoint.url, "https://dagit.internal/graphql");
    assert_eq!(config.endpoint.headers.get("X-Tenant").map(String::as_str), Some("analytics"));
    assert_eq!(config.http.timeout, Duration::from_secs(20));
    assert_eq!(config.http.connect_timeout, Duration::from_secs(5));
    assert!(!config.http.verify_ssl);
    let proxy = config.http.proxy.as_ref().unwrap();
    assert_eq!(proxy.url, "http://proxy.internal:3128");
    assert_eq!(proxy.no_proxy_list().as_deref(), Some("localhost,.internal"));
    assert_eq!(config.logging.level, LogLevel::Info);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.logging.filter_directives(), "info,reqwest=warn");
    assert_eq!(config.output.format, OutputFormat::Json);
    assert!(!config.output.color);
    assert_eq!(config.output.tick_limit, 5);
    assert!(config.output.show_stack);
}

#[test]
fn test_invalid_domain_values_fail_validation() {
    let yaml = r#"
http:
  timeout: 0
"#;
    let err = isolated_loader().from_yaml_str(yaml).unwrap_err();
    assert!(err.to_string().contains("http"));

    let yaml = r#"
output:
  format: yaml
"#;
    assert!(matches!(
        isolated_loader().from_yaml_str(yaml).unwrap_err(),
        ConfigError::ParseError(_)
    ));
}

#[test]
fn test_redacted_output_masks_token() {
    let mut config = SchedviewConfig::default();
    config.endpoint.auth_token = Some("super-secret".to_string());

    let yaml = config.to_redacted_yaml().unwrap();
    assert!(!yaml.contains("super-secret"));
    assert!(yaml.contains("********"));

    let json = config.to_redacted_json().unwrap();
    assert!(!json.contains("super-secret"));
    assert_eq!(config.endpoint.auth_token.as_deref(), Some("super-secret"));
}

#[test]
fn test_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = isolated_loader()
        .from_file(dir.path().join("missing.yaml"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::FileReadError(_)));
}
