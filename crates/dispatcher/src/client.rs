//! HttpTransport - one POST per message
//!
//! Each worker builds its own transport, so a slow or failing connection
//! stalls only that worker's client.

use contracts::{ClientConfig, DeliveryError, NotifierError, Transport};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::{debug, instrument};

/// HTTP transport posting plain-text bodies to a fixed URL
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    /// Build a transport with its own HTTP client
    ///
    /// reqwest has a single connect-phase timeout that covers both TCP
    /// connect and TLS handshake, so it is given the sum of the two budgets.
    ///
    /// # Errors
    /// `ClientBuild` if the TLS backend cannot be initialised
    pub fn new(url: impl Into<String>, config: &ClientConfig) -> Result<Self, NotifierError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout() + config.tls_handshake_timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| NotifierError::client_build(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    fn classify(error: reqwest::Error) -> DeliveryError {
        if error.is_timeout() {
            DeliveryError::timeout(error.to_string())
        } else if error.is_connect() {
            DeliveryError::connect(error.to_string())
        } else {
            DeliveryError::transport(error.to_string())
        }
    }
}

impl Transport for HttpTransport {
    fn endpoint(&self) -> &str {
        &self.url
    }

    #[instrument(name = "http_transport_deliver", skip(self, body), fields(url = %self.url, bytes = body.len()))]
    async fn deliver(&self, body: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "text/plain")
            .body(body.to_owned())
            .send()
            .await
            .map_err(Self::classify)?;

        // Only 200 counts; other 2xx codes are failures too.
        let status = response.status();
        if status != StatusCode::OK {
            debug!(status = status.as_u16(), "Unexpected response status");
            return Err(DeliveryError::status(status.as_u16()));
        }

        Ok(())
    }
}
