use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::FetchError;

/// `{ok, data?, error?, message?}` wrapper shared by every backend response
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// Bodies without an `ok` flag (framework validation errors) count as failures
    #[serde(default)]
    pub ok: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Framework-level error body, e.g. `{"detail": "..."}`
    #[serde(default)]
    pub detail: Option<Value>,
}

/// Acknowledgement of a mutation endpoint
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ack {
    pub message: Option<String>,
}

impl<T: DeserializeOwned> Envelope<T> {
    pub fn decode(endpoint: &str, body: Value) -> Result<Self, FetchError> {
        serde_json::from_value(body).map_err(|source| FetchError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    /// `ok: false` becomes a domain error carrying the backend message
    pub fn into_result(self, endpoint: &str) -> Result<Option<T>, FetchError> {
        if self.ok {
            Ok(self.data)
        } else {
            Err(FetchError::Domain {
                endpoint: endpoint.to_string(),
                message: self
                    .error
                    .or(self.message)
                    .or_else(|| self.detail.as_ref().and_then(Value::as_str).map(str::to_string))
                    .filter(|m| !m.trim().is_empty()),
            })
        }
    }

    pub fn into_data(self, endpoint: &str) -> Result<T, FetchError> {
        self.into_result(endpoint)?.ok_or_else(|| FetchError::MissingData {
            endpoint: endpoint.to_string(),
        })
    }

    pub fn into_ack(self, endpoint: &str) -> Result<Ack, FetchError> {
        let message = self.message.clone();
        self.into_result(endpoint)?;
        Ok(Ack { message })
    }
}
