//! Integration tests for config loading across all file formats.

use devgate::config::model::{builtin_rules, Config, Rule};
use devgate::config::sources::parse_config_str;
use devgate::config::validation::validate;
use devgate::filter;

fn load_example(name: &str) -> String {
    let path = format!("example/{name}");
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {path}: {e}"))
}

#[test]
fn yaml_example_loads_and_validates() {
    let content = load_example("devgate.yaml");
    let config = parse_config_str("yaml", &content, "devgate.yaml").unwrap();
    validate(&config).unwrap();
    assert_eq!(config.rules, builtin_rules());
    assert!(config.local.static_dir.is_some());
}

#[test]
fn yaml_full_example_loads_and_validates() {
    let content = load_example("full.yaml");
    let config = parse_config_str("yaml", &content, "full.yaml").unwrap();
    validate(&config).unwrap();
    assert_eq!(config.rules.len(), 5);
    assert_eq!(config.backend.timeout, 10_000);
    assert_eq!(config.backend.headers.strip, ["Referer"]);
    assert!(filter::should_forward(&config.rules, "/api/users"));
}

#[cfg(feature = "json")]
#[test]
fn json_example_loads_and_validates() {
    let content = load_example("devgate.json");
    let config = parse_config_str("json", &content, "devgate.json").unwrap();
    validate(&config).unwrap();
    assert_eq!(config.rules, builtin_rules());
}

#[cfg(feature = "toml")]
#[test]
fn toml_example_loads_and_validates() {
    let content = load_example("devgate.toml");
    let config = parse_config_str("toml", &content, "devgate.toml").unwrap();
    validate(&config).unwrap();
    assert_eq!(config.rules, builtin_rules());
}

#[cfg(all(feature = "json", feature = "toml"))]
#[test]
fn all_formats_produce_equivalent_configs() {
    let yaml = parse_config_str("yaml", &load_example("devgate.yaml"), "yaml").unwrap();
    let json = parse_config_str("json", &load_example("devgate.json"), "json").unwrap();
    let toml = parse_config_str("toml", &load_example("devgate.toml"), "toml").unwrap();

    assert_eq!(yaml.rules, json.rules);
    assert_eq!(yaml.rules, toml.rules);
    assert_eq!(yaml.backend.target, json.backend.target);
    assert_eq!(yaml.backend.target, toml.backend.target);
    assert_eq!(yaml.local.static_dir, toml.local.static_dir);
}

#[test]
fn unsupported_format_returns_error() {
    let result = parse_config_str("xml", "{}", "test.xml");
    assert!(result.is_err());
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let config: Config = serde_json::from_str("{}").unwrap();
    validate(&config).unwrap();
    assert_eq!(config.backend.target, "http://localhost:8081/");
    assert_eq!(config.backend.timeout, 30_000);
    assert_eq!(config.rules, builtin_rules());
    assert_eq!(config.local.index, "index.html");
    assert!(config.local.static_dir.is_none());
}

#[test]
fn explicit_rules_replace_the_builtins() {
    let json = r#"{"rules": [{"kind": "prefix", "pattern": "api/"}]}"#;
    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.rules, vec![Rule::prefix("api/")]);
    assert!(!filter::should_forward(&config.rules, "/graphql"));
}

#[test]
fn unknown_fields_are_rejected() {
    let json = r#"{"backend": {"target": "http://a/", "retries": 3}}"#;
    assert!(serde_json::from_str::<Config>(json).is_err());
}

#[test]
fn unknown_rule_kind_is_rejected() {
    let json = r#"{"rules": [{"kind": "regex", "pattern": "graph.*"}]}"#;
    assert!(serde_json::from_str::<Config>(json).is_err());
}

#[test]
fn empty_rule_list_fails_validation() {
    let config: Config = serde_json::from_str(r#"{"rules": []}"#).unwrap();
    assert!(validate(&config).is_err());
}

#[test]
fn default_config_serializes_to_nothing() {
    let json = serde_json::to_value(Config::default()).unwrap();
    assert_eq!(json, serde_json::json!({}));
}
