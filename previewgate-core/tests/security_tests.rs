// Tests for secret comparison, Basic-Auth and redirect handling

use previewgate_core::security::{
    basic_auth_header, redirect_target, safe_compare, sanitize_redirect_path, secret_matches,
};
use secrecy::SecretString;

// ============================================================================
// Constant-time Comparison Tests
// ============================================================================

#[test]
fn test_safe_compare_equal() {
    assert!(safe_compare(b"s3cr3t", b"s3cr3t"));
    assert!(safe_compare(b"", b""));
}

#[test]
fn test_safe_compare_different_content() {
    assert!(!safe_compare(b"s3cr3t", b"s3cr3x"));
}

#[test]
fn test_safe_compare_different_length() {
    assert!(!safe_compare(b"s3cr3t", b"s3cr3"));
    assert!(!safe_compare(b"s3cr3", b"s3cr3t"));
}

#[test]
fn test_safe_compare_zero_padding_is_not_a_match() {
    assert!(!safe_compare(b"abc", b"abc\0"));
}

#[test]
fn test_secret_matches_fails_closed() {
    let configured = SecretString::from("test-secret".to_string());
    let empty = SecretString::from(String::new());

    assert!(secret_matches(Some("test-secret"), Some(&configured)));
    assert!(!secret_matches(Some("wrong"), Some(&configured)));
    assert!(!secret_matches(Some(""), Some(&configured)));
    assert!(!secret_matches(None, Some(&configured)));
    assert!(!secret_matches(Some("anything"), None));
    assert!(!secret_matches(None, None));
    assert!(!secret_matches(Some(""), Some(&empty)));
}

// ============================================================================
// Basic-Auth Tests
// ============================================================================

#[test]
fn test_basic_auth_header_simple() {
    assert_eq!(basic_auth_header("u", "p"), "Basic dTpw");
}

#[test]
fn test_basic_auth_header_application_password() {
    // application passwords contain spaces
    assert_eq!(
        basic_auth_header("bot", "p@ss"),
        "Basic Ym90OnBAc3M="
    );
    assert_eq!(
        basic_auth_header("admin", "abcd efgh"),
        "Basic YWRtaW46YWJjZCBlZmdo"
    );
}

// ============================================================================
// Redirect Path Tests
// ============================================================================

#[test]
fn test_redirect_plain_path() {
    assert_eq!(sanitize_redirect_path("/test-page").as_deref(), Some("/test-page"));
    assert_eq!(sanitize_redirect_path("/").as_deref(), Some("/"));
}

#[test]
fn test_redirect_keeps_query_and_fragment() {
    assert_eq!(
        sanitize_redirect_path("/products?id=7#specs").as_deref(),
        Some("/products?id=7#specs")
    );
}

#[test]
fn test_redirect_encodes_spaces_and_unicode() {
    assert_eq!(
        sanitize_redirect_path("/news/hello world").as_deref(),
        Some("/news/hello%20world")
    );
    assert_eq!(
        sanitize_redirect_path("/de/über-uns").as_deref(),
        Some("/de/%C3%BCber-uns")
    );
}

#[test]
fn test_redirect_normalises_dot_segments() {
    assert_eq!(sanitize_redirect_path("/a/../b").as_deref(), Some("/b"));
    assert_eq!(sanitize_redirect_path("/../../etc").as_deref(), Some("/etc"));
}

#[test]
fn test_redirect_rejects_non_paths() {
    for slug in [
        "",
        "test-page",
        "https://evil.example/",
        "//evil.example",
        "/\\evil.example",
        "\\\\evil.example",
        "/line\nbreak",
        "javascript:alert(1)",
    ] {
        assert_eq!(sanitize_redirect_path(slug), None, "slug {:?}", slug);
    }
}

#[test]
fn test_redirect_target_defaults_to_root() {
    assert_eq!(redirect_target(None), "/");
    assert_eq!(redirect_target(Some("//evil.example")), "/");
    assert_eq!(redirect_target(Some("/ok")), "/ok");
}
