//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for structural
//! errors: a malformed backend target, an empty rule set, empty or
//! misshapen patterns, duplicate rules, and a bad index file name.
//! Returns every problem found as a list of [`ValidationError`] values
//! with suggestions where a fix is obvious.

use std::collections::HashSet;
use std::path::Path;

use url::Url;

use super::model::{Config, Rule, RuleKind};
use crate::error::ValidationError;

/// Validate a backend target URL. Returns `Ok(())` or a human-readable error.
pub fn validate_target_url(url: &str) -> Result<(), String> {
    match Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                Err(format!(
                    "unsupported scheme '{scheme}' (expected http or https)"
                ))
            } else if parsed.host_str().map_or(true, str::is_empty) {
                Err(format!("'{url}' has no host"))
            } else if parsed.query().is_some() || parsed.fragment().is_some() {
                Err("target must not carry a query string or fragment".into())
            } else {
                Ok(())
            }
        }
        Err(_) => Err(format!("'{url}' is not a valid URL")),
    }
}

/// Validate a single rule. Returns the offending message and an optional
/// suggestion.
pub fn validate_rule(rule: &Rule) -> Result<(), (String, Option<String>)> {
    let pattern = rule.pattern.as_str();
    if pattern.is_empty() {
        return Err(("pattern cannot be empty".into(), None));
    }
    match rule.kind {
        RuleKind::Segment => {
            if pattern.contains('/') {
                return Err((
                    format!("segment pattern '{pattern}' cannot contain '/'"),
                    Some("use a prefix rule to match across segments".into()),
                ));
            }
        }
        RuleKind::Prefix | RuleKind::Exact => {
            if let Some(stripped) = pattern.strip_prefix('/') {
                return Err((
                    format!("pattern '{pattern}' starts with '/', but rules see the path after its leading '/'"),
                    Some(format!("did you mean '{stripped}'?")),
                ));
            }
        }
    }
    Ok(())
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(msg) = validate_target_url(&config.backend.target) {
        errors.push(ValidationError {
            location: "backend".into(),
            field: "target".into(),
            message: msg,
            suggestion: if config.backend.target.contains("://") {
                None
            } else {
                Some(format!("did you mean 'http://{}'?", config.backend.target))
            },
        });
    }

    if config.backend.timeout == 0 {
        errors.push(ValidationError {
            location: "backend".into(),
            field: "timeout".into(),
            message: "timeout must be greater than zero".into(),
            suggestion: None,
        });
    }

    if config.rules.is_empty() {
        errors.push(ValidationError {
            location: "(root)".into(),
            field: "rules".into(),
            message: "at least one rule must be defined".into(),
            suggestion: Some("remove the 'rules' key to use the built-in rules".into()),
        });
    }

    let mut seen = HashSet::new();
    for (i, rule) in config.rules.iter().enumerate() {
        let location = format!("rules[{i}]");

        if let Err((message, suggestion)) = validate_rule(rule) {
            errors.push(ValidationError {
                location: location.clone(),
                field: "pattern".into(),
                message,
                suggestion,
            });
        }

        if !seen.insert(rule) {
            errors.push(ValidationError {
                location,
                field: "pattern".into(),
                message: format!("duplicate rule {rule}"),
                suggestion: None,
            });
        }
    }

    let index = config.local.index.as_str();
    if index.is_empty() {
        errors.push(ValidationError {
            location: "local".into(),
            field: "index".into(),
            message: "index file name cannot be empty".into(),
            suggestion: None,
        });
    } else if Path::new(index).is_absolute() {
        errors.push(ValidationError {
            location: "local".into(),
            field: "index".into(),
            message: "index must be relative to static_dir".into(),
            suggestion: Some(format!("did you mean '{}'?", index.trim_start_matches('/'))),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    let mut lines = vec![format!(
        "  backend: {} (timeout {}ms)",
        config.backend.target, config.backend.timeout
    )];

    lines.push(format!("  {} rules forward to the backend:", config.rules.len()));
    for rule in &config.rules {
        lines.push(format!("    {rule}"));
    }

    let local = config.local.static_dir.as_ref().map_or_else(
        || "404 (no static_dir)".to_string(),
        |dir| format!("{} (fallback {})", dir.display(), config.local.index),
    );
    lines.push(format!("  everything else: {local}"));

    format!("{} is valid\n{}", path, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{Config, Rule};

    #[test]
    fn default_config_passes() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn empty_rules_fails() {
        let config = Config {
            rules: vec![],
            ..Config::default()
        };
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("at least one rule"));
    }

    #[test]
    fn invalid_target_fails() {
        let mut config = Config::default();
        config.backend.target = "not a url".into();
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("not a valid URL")));
    }

    #[test]
    fn target_without_scheme_gets_suggestion() {
        let mut config = Config::default();
        config.backend.target = "localhost:8081".into();
        let errors = validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.suggestion.as_deref() == Some("did you mean 'http://localhost:8081'?")));
    }

    #[test]
    fn unsupported_scheme_fails() {
        let mut config = Config::default();
        config.backend.target = "ftp://backend/".into();
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("unsupported scheme")));
    }

    #[test]
    fn target_with_query_fails() {
        let mut config = Config::default();
        config.backend.target = "http://backend/?x=1".into();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn zero_timeout_fails() {
        let mut config = Config::default();
        config.backend.timeout = 0;
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors[0].field, "timeout");
    }

    #[test]
    fn empty_pattern_fails() {
        let config = Config {
            rules: vec![Rule::exact("")],
            ..Config::default()
        };
        let errors = validate(&config).unwrap_err();
        assert!(errors[0].message.contains("cannot be empty"));
        assert_eq!(errors[0].location, "rules[0]");
    }

    #[test]
    fn segment_with_slash_fails() {
        let config = Config {
            rules: vec![Rule::segment("api/graphql")],
            ..Config::default()
        };
        let errors = validate(&config).unwrap_err();
        assert!(errors[0].message.contains("cannot contain '/'"));
    }

    #[test]
    fn leading_slash_gets_suggestion() {
        let config = Config {
            rules: vec![Rule::prefix("/oauth/")],
            ..Config::default()
        };
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors[0].suggestion.as_deref(), Some("did you mean 'oauth/'?"));
        assert!(errors[0].message.contains("after its leading '/'"));
    }

    #[test]
    fn duplicate_rule_fails() {
        let config = Config {
            rules: vec![Rule::exact("logout"), Rule::exact("logout")],
            ..Config::default()
        };
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].location, "rules[1]");
        assert!(errors[0].message.contains("duplicate"));
    }

    #[test]
    fn same_pattern_different_kind_is_allowed() {
        let config = Config {
            rules: vec![Rule::exact("logout"), Rule::prefix("logout")],
            ..Config::default()
        };
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn empty_index_fails() {
        let mut config = Config::default();
        config.local.index = String::new();
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors[0].location, "local");
    }

    #[test]
    fn report_lists_rules() {
        let report = format_validation_report("devgate.yaml", &Config::default());
        assert!(report.starts_with("devgate.yaml is valid"));
        assert!(report.contains("segment 'graphql'"));
        assert!(report.contains("prefix 'oauth/'"));
        assert!(report.contains("404 (no static_dir)"));
    }
}
