//! Decoding of the `{success, data, message}` response envelope.
//!
//! Every backend response, error responses included, is wrapped in the same
//! envelope. It is decoded exactly once here; callers only ever see
//! `Result<T, ApiError>`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::HttpResponse;

/// The wire envelope. Extra backend fields (`timestamp`, `statusCode`,
/// `errors`) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Decode an envelope whose `data` must be present.
pub fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    decode_optional(response)?.ok_or(ApiError::MissingData)
}

/// Decode an envelope whose `data` may be absent, as for deletes.
pub fn decode_optional<T: DeserializeOwned>(response: HttpResponse) -> Result<Option<T>, ApiError> {
    let status = response.status;
    let envelope: Envelope<T> = match serde_json::from_str(&response.body) {
        Ok(envelope) => envelope,
        Err(e) => return Err(non_envelope_error(response, e)),
    };

    if !envelope.success {
        tracing::debug!(status, message = ?envelope.message, "backend rejected request");
        return Err(ApiError::Rejected {
            status,
            message: envelope.message,
        });
    }
    if !(200..300).contains(&status) {
        // success:true on an error status is not a shape the backend produces.
        return Err(ApiError::Http {
            status,
            body: response.body,
        });
    }
    Ok(envelope.data)
}

/// A success-status body that is not an envelope is a decoding failure; an
/// error-status one is reported by status.
fn non_envelope_error(response: HttpResponse, cause: serde_json::Error) -> ApiError {
    if response.is_success() {
        return ApiError::Deserialization(cause.to_string());
    }
    if response.status == 404 {
        return ApiError::NotFound;
    }
    // Error bodies may still carry a message without a well-formed `data`.
    if let Ok(bare) = serde_json::from_str::<Envelope<serde_json::Value>>(&response.body) {
        return ApiError::Rejected {
            status: response.status,
            message: bare.message,
        };
    }
    ApiError::Http {
        status: response.status,
        body: response.body,
    }
}
