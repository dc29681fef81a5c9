//! Configuration parsing and validation tests.

use super::*;
use crate::notify::Color;

fn parse(yaml: &str) -> Config {
    serde_yaml::from_str(yaml).expect("config should parse")
}

const FULL_CONFIG: &str = r#"
api_url: https://chat.example.com/v2
authentications:
  - name: ops
    token: tok-ops
    room: "123"
  - name: dev
    token: tok-dev
    room: "456"
defaults:
  color: green
  notify: true
  html: false
  from: ci-bot
http:
  connect_timeout_ms: 1500
  read_timeout_ms: 2500
"#;

#[test]
fn full_config_parses() {
    let config = parse(FULL_CONFIG);

    assert_eq!(config.api_url, "https://chat.example.com/v2");
    assert_eq!(config.authentications.len(), 2);
    assert_eq!(config.authentications[0].name, "ops");
    assert_eq!(config.authentications[0].token, "tok-ops");
    assert_eq!(config.authentications[0].room, "123");
    assert_eq!(config.defaults.color, Color::Green);
    assert!(config.defaults.notify);
    assert!(!config.defaults.html);
    assert_eq!(config.defaults.from, "ci-bot");
    assert_eq!(config.http.connect_timeout_ms, 1500);
    assert_eq!(config.http.read_timeout_ms, 2500);
}

#[test]
fn minimal_config_applies_defaults() {
    let config = parse(
        r#"
        api_url: https://chat.example.com/v2
        authentications: []
        "#,
    );

    assert_eq!(config.defaults.color, Color::Yellow);
    assert!(!config.defaults.notify);
    assert!(!config.defaults.html);
    assert_eq!(config.defaults.from, "");
    assert_eq!(config.http.connect_timeout_ms, 3000);
    assert_eq!(config.http.read_timeout_ms, 3000);
}

#[test]
fn partial_http_section_fills_missing_timeout() {
    let config = parse(
        r#"
        api_url: https://chat.example.com/v2
        authentications: []
        http:
          connect_timeout_ms: 500
        "#,
    );

    assert_eq!(config.http.connect_timeout_ms, 500);
    assert_eq!(config.http.read_timeout_ms, 3000);
}

#[test]
fn timeouts_convert_to_durations() {
    let http = HttpConfig::default();
    assert_eq!(http.connect_timeout(), std::time::Duration::from_millis(3000));
    assert_eq!(http.read_timeout(), std::time::Duration::from_millis(3000));
}

#[test]
fn config_requires_api_url() {
    let result: Result<Config, _> = serde_yaml::from_str(
        r#"
        authentications: []
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn config_requires_authentications() {
    let result: Result<Config, _> = serde_yaml::from_str(
        r#"
        api_url: https://chat.example.com/v2
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn auth_config_requires_all_fields() {
    let result: Result<Config, _> = serde_yaml::from_str(
        r#"
        api_url: https://chat.example.com/v2
        authentications:
          - name: ops
            token: tok
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn invalid_color_in_defaults_fails_to_parse() {
    let result: Result<Config, _> = serde_yaml::from_str(
        r#"
        api_url: https://chat.example.com/v2
        authentications: []
        defaults:
          color: mauve
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn validate_accepts_full_config() {
    let config = parse(FULL_CONFIG);
    assert!(config.validate().is_ok());
}

#[test]
fn validate_rejects_empty_api_url() {
    let config = parse(
        r#"
        api_url: ""
        authentications: []
        "#,
    );

    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("api_url"));
}

#[test]
fn validate_rejects_non_http_scheme() {
    let config = parse(
        r#"
        api_url: ftp://chat.example.com
        authentications: []
        "#,
    );

    let errors = config.validate().unwrap_err();
    assert!(errors[0].to_string().contains("scheme"));
}

#[test]
fn validate_rejects_blank_auth_fields() {
    let config = parse(
        r#"
        api_url: https://chat.example.com/v2
        authentications:
          - name: ""
            token: ""
            room: "123"
        "#,
    );

    let errors = config.validate().unwrap_err();
    // Empty name and empty token are both reported in one pass.
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().any(|e| e.to_string().contains("name")));
    assert!(errors.iter().any(|e| e.to_string().contains("token")));
}

#[test]
fn validate_collects_errors_across_entries() {
    let config = parse(
        r#"
        api_url: not-a-url
        authentications:
          - name: ops
            token: ""
            room: "123"
          - name: dev
            token: tok
            room: ""
        "#,
    );

    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 3);
}

#[test]
fn validate_allows_duplicate_names() {
    // Duplicates are resolved at lookup time (first match wins).
    let config = parse(
        r#"
        api_url: https://chat.example.com/v2
        authentications:
          - name: ops
            token: tok-a
            room: "1"
          - name: ops
            token: tok-b
            room: "2"
        "#,
    );
    assert!(config.validate().is_ok());
}
