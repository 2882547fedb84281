//! Config validation
//!
//! Rules:
//! - url present
//! - url is an absolute http/https URL with a host
//! - explicit request timeout covers the connect phase

use contracts::{NotifierError, NotifyConfig};
use url::Url;

/// Validate a NotifyConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &NotifyConfig) -> Result<(), NotifierError> {
    config.ensure_url()?;
    validate_url(&config.url)?;
    validate_client(config)?;
    Ok(())
}

fn validate_url(raw: &str) -> Result<(), NotifierError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| NotifierError::config_validation("url", format!("invalid url '{raw}': {e}")))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(NotifierError::config_validation(
                "url",
                format!("unsupported scheme '{other}', expected http or https"),
            ))
        }
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(NotifierError::config_validation("url", "url has no host"));
    }

    Ok(())
}

fn validate_client(config: &NotifyConfig) -> Result<(), NotifierError> {
    let client = &config.client;
    if client.request_timeout_ms != 0
        && client.connect_timeout_ms != 0
        && client.request_timeout_ms < client.connect_timeout_ms
    {
        return Err(NotifierError::config_validation(
            "client.request_timeout_ms",
            format!(
                "request_timeout_ms ({}) must be >= connect_timeout_ms ({})",
                client.request_timeout_ms, client.connect_timeout_ms
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config() -> NotifyConfig {
        NotifyConfig::new("http://localhost:8080/notify")
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&minimal_config()).is_ok());
    }

    #[test]
    fn test_empty_url() {
        let mut cfg = minimal_config();
        cfg.url = String::new();
        let err = validate(&cfg).unwrap_err().to_string();
        assert!(err.contains("url is required"), "got: {err}");
    }

    #[test]
    fn test_unparseable_url() {
        let mut cfg = minimal_config();
        cfg.url = "localhost notify".into();
        let err = validate(&cfg).unwrap_err().to_string();
        assert!(err.contains("invalid url"), "got: {err}");
    }

    #[test]
    fn test_unsupported_scheme() {
        let mut cfg = minimal_config();
        cfg.url = "ftp://localhost/notify".into();
        let err = validate(&cfg).unwrap_err().to_string();
        assert!(err.contains("unsupported scheme"), "got: {err}");
    }

    #[test]
    fn test_request_timeout_shorter_than_connect() {
        let mut cfg = minimal_config();
        cfg.client.request_timeout_ms = 100;
        cfg.client.connect_timeout_ms = 500;
        let err = validate(&cfg).unwrap_err().to_string();
        assert!(err.contains("request_timeout_ms"), "got: {err}");
    }
}
