use serde_json::{Value, json};
use sporlrelay::utils::*;

#[test]
fn test_basic_credentials() {
    let header = basic_credentials("client-id", "client-secret");
    assert_eq!(header, "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=");

    // Secrets with a colon must survive, only the first colon separates
    let header = basic_credentials("id", "sec:ret");
    assert_eq!(header, "Basic aWQ6c2VjOnJldA==");
}

#[test]
fn test_parse_scopes_keeps_first_occurrence_order() {
    let scopes = parse_scopes("  user-read-email user-read-private\tuser-read-email\nplaylist-read-private ");
    assert_eq!(
        scopes,
        vec!["user-read-email", "user-read-private", "playlist-read-private"]
    );
}

#[test]
fn test_parse_scopes_empty() {
    assert!(parse_scopes("   ").is_empty());
}

#[test]
fn test_decode_body() {
    assert_eq!(decode_body(b""), Value::Null);
    assert_eq!(decode_body(b" \n"), Value::Null);
    assert_eq!(decode_body(br#"{"id":"abc"}"#), json!({"id": "abc"}));
    assert_eq!(
        decode_body(b"upstream exploded"),
        Value::String("upstream exploded".to_string())
    );
}
