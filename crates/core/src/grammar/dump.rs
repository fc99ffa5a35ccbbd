use serde::Serialize;

/// Serialize an engine result to a pretty-printed JSON string.
pub fn to_pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).expect("engine results serialize infallibly")
}
