//! `devgate validate`: check a configuration file for errors.
//!
//! Parses and validates the config file, reporting results in either
//! human-readable text or machine-readable JSON format.

use crate::cli::{OutputFormat, ValidateArgs};
use crate::config::sources::read_config_file;
use crate::config::validation;
use crate::error::DevgateError;

pub fn execute(args: &ValidateArgs) -> Result<(), DevgateError> {
    let path = &args.config;
    let config = read_config_file(path)?;

    if let Err(errors) = validation::validate(&config) {
        match args.format {
            OutputFormat::Text => {
                eprintln!("\u{2717} {} has {} errors\n", path.display(), errors.len());
                for error in &errors {
                    eprintln!("{error}");
                }
            }
            OutputFormat::Json => {
                let json_errors: Vec<serde_json::Value> = errors
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "location": e.location,
                            "field": e.field,
                            "message": e.message,
                            "suggestion": e.suggestion,
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "valid": false,
                        "errors": json_errors,
                    })
                );
            }
        }
        return Err(DevgateError::ConfigValidation { errors });
    }

    match args.format {
        OutputFormat::Text => {
            println!(
                "\u{2713} {}",
                validation::format_validation_report(&path.display().to_string(), &config)
            );
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "valid": true,
                    "target": config.backend.target,
                    "rules": config.rules.len(),
                    "static_dir": config.local.static_dir,
                })
            );
        }
    }

    Ok(())
}
