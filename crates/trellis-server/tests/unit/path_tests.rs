//! Route path normalization and matching

use serde_json::json;
use trellis_domain::error::Error;
use trellis_server::routing::{PathPattern, cut_route_path, join_route_path};

#[test]
fn paths_start_with_slash_and_never_end_with_one() {
    assert_eq!(cut_route_path("users/"), "/users");
    assert_eq!(cut_route_path("//users//login/"), "/users/login");
    assert_eq!(cut_route_path(""), "/");
    assert_eq!(cut_route_path("/"), "/");
}

#[test]
fn prefix_and_method_path_are_joined() {
    assert_eq!(join_route_path("/users", "/"), "/users");
    assert_eq!(join_route_path("/users/", ":id"), "/users/:id");
    assert_eq!(join_route_path("/", "/ping"), "/ping");
}

#[test]
fn captures_are_extracted_by_name() {
    let pattern = PathPattern::parse("/users/:userId/roles/:role").unwrap();
    let params = pattern.matches("/users/12/roles/admin").unwrap();
    assert_eq!(params["userId"], json!("12"));
    assert_eq!(params["role"], json!("admin"));
    assert!(pattern.matches("/users/12/roles").is_none());
    assert!(pattern.matches("/users/12/groups/admin").is_none());
    assert_eq!(pattern.param_names(), vec!["userId", "role"]);
    assert!(!pattern.is_static());
}

#[test]
fn rocket_syntax_and_shape() {
    let pattern = PathPattern::parse("/users/:id").unwrap();
    assert_eq!(pattern.to_rocket(), "/users/<id>");
    assert_eq!(pattern.shape(), "/users/:");
    assert_eq!(PathPattern::parse("/").unwrap().to_rocket(), "/");
    assert!(PathPattern::parse("/users/login").unwrap().is_static());
}

#[test]
fn static_segments_rank_before_captures() {
    let login = PathPattern::parse("/users/login").unwrap();
    let by_id = PathPattern::parse("/users/:id").unwrap();
    assert!(login.rank() < by_id.rank());
}

#[test]
fn invalid_paths_are_route_initialization_errors() {
    for path in ["/users/:", "/users/:1st", "/users/<id>", "/a/:id/b/:id", "/who?"] {
        let err = PathPattern::parse(path).unwrap_err();
        assert!(
            matches!(err, Error::RouteInitialization { .. }),
            "{path} should be rejected, got {err}"
        );
    }
}
