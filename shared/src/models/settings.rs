//! Server settings Model (`/settings`)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub auto_start: bool,
    /// Base URL encoded into dynamic badges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_base_url: Option<String>,
    /// Keys this client does not know about, sent back untouched on save
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of a server start/stop command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerState {
    pub running: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let raw = json!({"host": "0.0.0.0", "port": 5000, "theme": "dark"});
        let s: ServerSettings = serde_json::from_value(raw).unwrap();
        assert_eq!(s.extra.get("theme"), Some(&json!("dark")));
        let back = serde_json::to_value(&s).unwrap();
        assert_eq!(back["theme"], json!("dark"));
    }
}
