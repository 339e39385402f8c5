//! `devgate check`: print the route decision for request paths.
//!
//! Uses the rules from a config file when one is given, the built-in
//! rules otherwise. Handy for trying out a rule change before restarting
//! a running proxy.

use std::path::Path;

use serde::Serialize;

use crate::cli::{CheckArgs, OutputFormat};
use crate::config::model::{builtin_rules, Rule};
use crate::config::sources::read_config_file;
use crate::config::validation;
use crate::error::DevgateError;
use crate::filter;

#[derive(Debug, Serialize)]
pub struct Decision {
    pub path: String,
    pub forward: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

#[must_use]
pub fn decide(rules: &[Rule], paths: &[String]) -> Vec<Decision> {
    paths
        .iter()
        .map(|path| {
            let rule = filter::match_rule(rules, path);
            Decision {
                path: path.clone(),
                forward: rule.is_some(),
                rule: rule.map(ToString::to_string),
            }
        })
        .collect()
}

fn load_rules(config: Option<&Path>) -> Result<Vec<Rule>, DevgateError> {
    let Some(path) = config else {
        return Ok(builtin_rules());
    };
    let config = read_config_file(path)?;
    validation::validate(&config).map_err(|errors| DevgateError::ConfigValidation { errors })?;
    Ok(config.rules)
}

pub fn execute(args: &CheckArgs) -> Result<(), DevgateError> {
    let rules = load_rules(args.config.as_deref())?;
    let decisions = decide(&rules, &args.paths);

    match args.format {
        OutputFormat::Text => {
            let width = decisions.iter().map(|d| d.path.len()).max().unwrap_or(0);
            for d in &decisions {
                match d.rule {
                    Some(ref rule) => println!("{:<width$}  -> backend  ({rule})", d.path),
                    None => println!("{:<width$}  -> local", d.path),
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "decisions": decisions }));
        }
    }

    Ok(())
}
