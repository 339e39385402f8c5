//! Serde data structures for the devgate configuration file.
//!
//! Contains [`Config`] (the root), [`Backend`], [`Rule`], [`LocalConfig`]
//! and [`HeaderRules`]. All types derive `Serialize` and `Deserialize`
//! with `deny_unknown_fields` for strict parsing. Every section is
//! optional and falls back to the same values as [`Config::default`].

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TARGET: &str = "http://localhost:8081/";

const fn default_timeout() -> u64 {
    30_000
}

const fn default_true() -> bool {
    true
}

fn default_target() -> String {
    DEFAULT_TARGET.to_string()
}

fn default_index() -> String {
    "index.html".to_string()
}

fn is_default_timeout(v: &u64) -> bool {
    *v == default_timeout()
}

fn is_default_target(v: &str) -> bool {
    v == DEFAULT_TARGET
}

fn is_default_index(v: &str) -> bool {
    v == "index.html"
}

fn is_true(v: &bool) -> bool {
    *v
}

fn is_builtin_rules(v: &[Rule]) -> bool {
    v == builtin_rules().as_slice()
}

fn is_default_backend(v: &Backend) -> bool {
    v.target == DEFAULT_TARGET
        && v.timeout == default_timeout()
        && v.forward_headers
        && v.proxy_headers
        && v.strip_hop_by_hop
        && v.headers.is_default()
}

fn is_default_local(v: &LocalConfig) -> bool {
    v.static_dir.is_none() && v.index == "index.html"
}

/// The rules a fresh config starts with: GraphQL endpoint and console,
/// OAuth flows, logout.
#[must_use]
pub fn builtin_rules() -> Vec<Rule> {
    vec![
        Rule::segment("graphql"),
        Rule::segment("graphiql"),
        Rule::prefix("oauth/"),
        Rule::exact("logout"),
    ]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "is_default_backend")]
    pub backend: Backend,

    #[serde(default = "builtin_rules", skip_serializing_if = "is_builtin_rules")]
    pub rules: Vec<Rule>,

    #[serde(default, skip_serializing_if = "is_default_local")]
    pub local: LocalConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            rules: builtin_rules(),
            local: LocalConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Backend {
    #[serde(default = "default_target", skip_serializing_if = "is_default_target")]
    pub target: String,

    #[serde(
        default = "default_timeout",
        skip_serializing_if = "is_default_timeout"
    )]
    pub timeout: u64,

    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub forward_headers: bool,

    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub proxy_headers: bool,

    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub strip_hop_by_hop: bool,

    #[serde(default, skip_serializing_if = "HeaderRules::is_default")]
    pub headers: HeaderRules,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            target: default_target(),
            timeout: default_timeout(),
            forward_headers: default_true(),
            proxy_headers: default_true(),
            strip_hop_by_hop: default_true(),
            headers: HeaderRules::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Any `/`-separated segment of the path equals the pattern.
    Segment,
    /// The path starts with the pattern.
    Prefix,
    /// The whole path equals the pattern.
    Exact,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Segment => "segment",
            Self::Prefix => "prefix",
            Self::Exact => "exact",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    pub kind: RuleKind,
    pub pattern: String,
}

impl Rule {
    #[must_use]
    pub fn segment(pattern: &str) -> Self {
        Self {
            kind: RuleKind::Segment,
            pattern: pattern.to_string(),
        }
    }

    #[must_use]
    pub fn prefix(pattern: &str) -> Self {
        Self {
            kind: RuleKind::Prefix,
            pattern: pattern.to_string(),
        }
    }

    #[must_use]
    pub fn exact(pattern: &str) -> Self {
        Self {
            kind: RuleKind::Exact,
            pattern: pattern.to_string(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.pattern)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LocalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,

    #[serde(default = "default_index", skip_serializing_if = "is_default_index")]
    pub index: String,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            static_dir: None,
            index: default_index(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderRules {
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub add: HashMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strip: Vec<String>,
}

impl HeaderRules {
    fn is_default(&self) -> bool {
        self.add.is_empty() && self.strip.is_empty()
    }
}
