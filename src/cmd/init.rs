//! `devgate init`: generate a starter configuration file.
//!
//! Writes a YAML, JSON, or TOML config, either minimal or with every
//! option documented. Refuses to overwrite an existing file.

use std::path::PathBuf;

use crate::cli::{ConfigFormat, InitArgs};
use crate::error::DevgateError;

#[must_use]
pub const fn template(format: &ConfigFormat, full: bool) -> &'static str {
    match (format, full) {
        (ConfigFormat::Yaml, false) => YAML_MINIMAL,
        (ConfigFormat::Yaml, true) => YAML_FULL,
        (ConfigFormat::Json, false) => JSON_MINIMAL,
        (ConfigFormat::Json, true) => JSON_FULL,
        (ConfigFormat::Toml, false) => TOML_MINIMAL,
        (ConfigFormat::Toml, true) => TOML_FULL,
    }
}

pub fn execute(args: &InitArgs) -> Result<(), DevgateError> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("devgate.{}", args.format.extension())));

    if output.exists() {
        return Err(DevgateError::FileExists { path: output });
    }

    std::fs::write(&output, template(&args.format, args.full))?;
    println!("Created {}", output.display());
    Ok(())
}

const YAML_MINIMAL: &str = r#"# devgate config

backend:
  target: "http://localhost:8081/"
"#;

const YAML_FULL: &str = r#"# devgate config
#
# Values shown are the defaults. Requests whose path matches a rule go
# to the backend; everything else is served locally.

backend:
  target: "http://localhost:8081/"
  # timeout: 30000             # Backend timeout in ms
  # forward_headers: true      # Forward browser headers (cookies included)
  # proxy_headers: true        # Add X-Forwarded-*, Via, X-Correlation-Id
  # strip_hop_by_hop: true     # Strip Connection, TE, etc.
  # headers:
  #   add: {}                  # Headers added to every forwarded request
  #   strip: []                # Headers removed from every forwarded request

# Matching is case-sensitive and ignores one leading '/'.
#   segment: any '/'-separated segment equals the pattern
#   prefix:  the path starts with the pattern
#   exact:   the whole path equals the pattern
rules:
  - kind: segment
    pattern: graphql
  - kind: segment
    pattern: graphiql
  - kind: prefix
    pattern: "oauth/"
  - kind: exact
    pattern: logout

# local:
#   static_dir: "build"        # Serve the built client from here
#   index: "index.html"        # Fallback for client-side routes
"#;

const JSON_MINIMAL: &str = r#"{
  "backend": {
    "target": "http://localhost:8081/"
  }
}
"#;

const JSON_FULL: &str = r#"{
  "backend": {
    "target": "http://localhost:8081/",
    "timeout": 30000,
    "forward_headers": true,
    "proxy_headers": true,
    "strip_hop_by_hop": true,
    "headers": {
      "add": {},
      "strip": []
    }
  },
  "rules": [
    { "kind": "segment", "pattern": "graphql" },
    { "kind": "segment", "pattern": "graphiql" },
    { "kind": "prefix", "pattern": "oauth/" },
    { "kind": "exact", "pattern": "logout" }
  ],
  "local": {
    "index": "index.html"
  }
}
"#;

const TOML_MINIMAL: &str = r#"# devgate config

[backend]
target = "http://localhost:8081/"
"#;

const TOML_FULL: &str = r#"# devgate config
#
# Values shown are the defaults. Requests whose path matches a rule go
# to the backend; everything else is served locally.

rules = [
  { kind = "segment", pattern = "graphql" },
  { kind = "segment", pattern = "graphiql" },
  { kind = "prefix", pattern = "oauth/" },
  { kind = "exact", pattern = "logout" },
]

[backend]
target = "http://localhost:8081/"
# timeout = 30000
# forward_headers = true
# proxy_headers = true
# strip_hop_by_hop = true

# [backend.headers]
# add = {}
# strip = []

# [local]
# static_dir = "build"
# index = "index.html"
"#;
