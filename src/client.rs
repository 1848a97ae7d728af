use serde_json::{json, Value};

use crate::config::{FileManagerConfig, Translator};
use crate::protocol::ActionRequest;
use crate::transport::{HttpTransport, Transport, TransportError};

/// Everything an entity action needs to reach the server: the channel, the
/// endpoint/pattern configuration and the message lookup.
pub struct ApiClient {
    transport: Box<dyn Transport>,
    config: FileManagerConfig,
    translator: Translator,
}

impl ApiClient {
    pub fn new(config: FileManagerConfig) -> Self {
        Self::with_transport(Box::new(HttpTransport::new()), config)
    }

    pub fn with_transport(transport: Box<dyn Transport>, config: FileManagerConfig) -> Self {
        Self {
            transport,
            config,
            translator: Translator::default(),
        }
    }

    /// Replace the default (echoing) message lookup.
    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = translator;
        self
    }

    pub fn config(&self) -> &FileManagerConfig {
        &self.config
    }

    /// POST one action request inside the `params` envelope the server-side
    /// handler expects.
    pub(crate) async fn post(
        &self,
        url: &str,
        request: &ActionRequest,
    ) -> Result<Value, TransportError> {
        self.transport.post(url, &json!({ "params": request })).await
    }

    /// Localized message for a lookup key.
    pub(crate) fn instant(&self, key: &str) -> String {
        self.translator.instant(key)
    }
}
