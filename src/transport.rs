use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Errors raised by the request/response channel.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server returned status {status}")]
    Status { status: u16, body: Option<Value> },
}

impl TransportError {
    /// Structured `result.error` recovered from a failure body, if any.
    /// When present it wins over the per-action fallback message.
    pub fn domain_error(&self) -> Option<String> {
        match self {
            TransportError::Status {
                body: Some(body), ..
            } => body
                .pointer("/result/error")
                .and_then(crate::protocol::error_message),
            _ => None,
        }
    }
}

/// Abstract request/response channel the actions post through.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON body and return the parsed JSON response.
    async fn post(&self, url: &str, body: &Value) -> Result<Value, TransportError>;
}

/// HTTP transport backed by reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &str, body: &Value) -> Result<Value, TransportError> {
        debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            // Keep whatever structured body the failure carried; the caller
            // mines it for result.error before falling back.
            let body = response.json::<Value>().await.ok();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_domain_error_from_failure_body() {
        let err = TransportError::Status {
            status: 500,
            body: Some(json!({"result": {"error": "denied"}})),
        };
        assert_eq!(err.domain_error(), Some("denied".to_string()));
    }

    #[test]
    fn test_domain_error_from_nonstring_failure_value() {
        let err = TransportError::Status {
            status: 500,
            body: Some(json!({"result": {"error": true}})),
        };
        assert_eq!(err.domain_error(), Some("true".to_string()));
    }

    #[test]
    fn test_no_domain_error_without_body() {
        let err = TransportError::Status {
            status: 502,
            body: None,
        };
        assert!(err.domain_error().is_none());
    }

    #[test]
    fn test_no_domain_error_for_unstructured_body() {
        let err = TransportError::Status {
            status: 500,
            body: Some(json!({"detail": "oops"})),
        };
        assert!(err.domain_error().is_none());
    }
}
