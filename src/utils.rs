use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::Value;

/// Value of the `Authorization` header for the token endpoint:
/// `Basic base64(client_id:client_secret)`.
pub fn basic_credentials(client_id: &str, client_secret: &str) -> String {
    let encoded = STANDARD.encode(format!("{client_id}:{client_secret}"));
    format!("Basic {encoded}")
}

/// Splits a whitespace separated scope list, dropping repeats but keeping
/// the order of first appearance.
pub fn parse_scopes(raw: &str) -> Vec<String> {
    let mut scopes: Vec<String> = Vec::new();
    for scope in raw.split_whitespace() {
        if !scopes.iter().any(|s| s == scope) {
            scopes.push(scope.to_string());
        }
    }
    scopes
}

/// Decodes an upstream body for pass-through. Empty bodies become `null`,
/// anything that is not JSON is handed back as a string.
pub fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }

    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
