//! Integration tests for the path router filter.

use devgate::config::model::{builtin_rules, Rule};
use devgate::filter::{is_backend_path, match_rule, should_forward};

#[test]
fn documented_cases() {
    let cases = [
        ("graphql", true),
        ("graphiql", true),
        ("oauth/google/start", true),
        ("oauth/", true),
        ("logout", true),
        ("home", false),
        ("login", false),
    ];
    for (path, expected) in cases {
        assert_eq!(is_backend_path(path), expected, "{path}");
    }
}

#[test]
fn request_paths_with_leading_slash() {
    assert!(is_backend_path("/graphql"));
    assert!(is_backend_path("/graphiql"));
    assert!(is_backend_path("/oauth/fitbit/start"));
    assert!(is_backend_path("/logout"));
    assert!(!is_backend_path("/favicon.ico"));
    assert!(!is_backend_path("/static/app.js"));
    assert!(!is_backend_path("/static/js/main.chunk.js"));
}

#[test]
fn graphql_anywhere_as_a_segment() {
    for path in ["/v1/graphql", "a/b/graphiql/c", "/graphql/", "graphql/schema"] {
        assert!(is_backend_path(path), "{path}");
    }
}

#[test]
fn substrings_are_not_matches() {
    for path in ["mylogout", "logoutX", "xgraphqly", "/graphqlite", "/my-oauth/x", "/oauth"] {
        assert!(!is_backend_path(path), "{path}");
    }
}

#[test]
fn builtin_predicate_equals_builtin_rules() {
    let rules = builtin_rules();
    for path in [
        "", "/", "graphql", "/x/graphiql", "oauth/", "/oauth/a", "logout", "/logout/",
        "/home", "GRAPHQL",
    ] {
        assert_eq!(is_backend_path(path), should_forward(&rules, path), "{path}");
    }
}

#[test]
fn matched_rule_is_reported() {
    let rules = builtin_rules();
    assert_eq!(match_rule(&rules, "/graphiql"), Some(&Rule::segment("graphiql")));
    assert_eq!(match_rule(&rules, "/oauth/google/start"), Some(&Rule::prefix("oauth/")));
    assert_eq!(match_rule(&rules, "logout"), Some(&Rule::exact("logout")));
    assert_eq!(match_rule(&rules, "/login"), None);
}

#[test]
fn safe_to_share_across_threads() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let path = if i % 2 == 0 { "/graphql" } else { "/home" };
                (0..1000).all(|_| is_backend_path(path) == (i % 2 == 0))
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
