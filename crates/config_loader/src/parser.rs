//! Config parsing
//!
//! TOML (primary) and JSON.

use contracts::{NotifierError, NotifyConfig};

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (recommended)
    Toml,
    /// JSON
    Json,
}

impl ConfigFormat {
    /// Infer format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse TOML configuration
pub fn parse_toml(content: &str) -> Result<NotifyConfig, NotifierError> {
    toml::from_str(content).map_err(|e| NotifierError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse JSON configuration
pub fn parse_json(content: &str) -> Result<NotifyConfig, NotifierError> {
    serde_json::from_str(content).map_err(|e| NotifierError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse configuration in the given format
pub fn parse(content: &str, format: ConfigFormat) -> Result<NotifyConfig, NotifierError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml_minimal() {
        let result = parse_toml(r#"url = "http://localhost:8080/notify""#);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let cfg = result.unwrap();
        assert_eq!(cfg.url, "http://localhost:8080/notify");
        assert_eq!(cfg.num_workers, 0);
    }

    #[test]
    fn test_parse_json_full() {
        let content = r#"{
            "url": "https://hooks.example.com/notify",
            "num_workers": 8,
            "intake_queue_capacity": 16,
            "error_queue_capacity": 32,
            "send_interval_ms": 250,
            "send_interval_buffer_capacity": 50,
            "line_queue_capacity": 100,
            "client": {
                "request_timeout_ms": 3000,
                "connect_timeout_ms": 1000,
                "tls_handshake_timeout_ms": 1000,
                "user_agent": "test-agent"
            }
        }"#;
        let cfg = parse_json(content).unwrap();
        assert_eq!(cfg.num_workers, 8);
        assert_eq!(cfg.send_interval_ms, 250);
        assert_eq!(cfg.client.user_agent, "test-agent");
    }

    #[test]
    fn test_parse_missing_url() {
        let result = parse_toml("num_workers = 2");
        assert!(matches!(result, Err(NotifierError::ConfigParse { .. })));
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let content = "invalid toml [[[";
        let result = parse_toml(content);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, NotifierError::ConfigParse { .. }));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("TOML"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("json"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
