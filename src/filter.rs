//! Path router filter: decides whether a request path belongs to the
//! backend.
//!
//! Matching is literal and case-sensitive. Segment rules compare whole
//! `/`-separated segments, so `/api/graphql` matches `graphql` while
//! `/xgraphqly` and `/mylogout` do not. A single leading `/` is ignored
//! so `/logout` and `logout` are the same path; nothing else (trailing
//! slashes, case, percent-encoding) is normalized.
//!
//! Every function here is total over `&str`: an empty or malformed path
//! is simply not a match.

use std::sync::LazyLock;

use crate::config::model::{builtin_rules, Rule, RuleKind};

static BUILTIN: LazyLock<Vec<Rule>> = LazyLock::new(builtin_rules);

/// Route decision for the built-in rule set.
#[must_use]
pub fn is_backend_path(path: &str) -> bool {
    should_forward(&BUILTIN, path)
}

/// Route decision for a configured rule set.
#[must_use]
pub fn should_forward(rules: &[Rule], path: &str) -> bool {
    match_rule(rules, path).is_some()
}

/// First rule in `rules` that matches `path`.
#[must_use]
pub fn match_rule<'a>(rules: &'a [Rule], path: &str) -> Option<&'a Rule> {
    let path = strip_root(path);
    rules.iter().find(|rule| rule.matches_stripped(path))
}

impl Rule {
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.matches_stripped(strip_root(path))
    }

    fn matches_stripped(&self, path: &str) -> bool {
        if self.pattern.is_empty() {
            return false;
        }
        match self.kind {
            RuleKind::Segment => path.split('/').any(|segment| segment == self.pattern),
            RuleKind::Prefix => path.starts_with(&self.pattern),
            RuleKind::Exact => path == self.pattern,
        }
    }
}

fn strip_root(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}
