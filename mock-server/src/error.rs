use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde::Serialize;
use thiserror::Error;

/// A business or lookup failure, always answered with an envelope.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),
}

impl StoreError {
    fn status(&self) -> StatusCode {
        match self {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// `{success, message, data, timestamp, statusCode}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub timestamp: String,
    pub status_code: u16,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(status: StatusCode, success: bool, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success,
            message: message.into(),
            data,
            timestamp: Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S").to_string(),
            status_code: status.as_u16(),
        }
    }
}

pub type Reply<T> = Result<(StatusCode, Json<Envelope<T>>), StoreError>;

pub fn ok<T: Serialize>(message: &str, data: T) -> Reply<T> {
    Ok((StatusCode::OK, Json(Envelope::new(StatusCode::OK, true, message, Some(data)))))
}

pub fn created<T: Serialize>(message: &str, data: T) -> Reply<T> {
    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(StatusCode::CREATED, true, message, Some(data))),
    ))
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(status = status.as_u16(), error = %self, "request failed");
        let body = Envelope::<()>::new(status, false, self.to_string(), None);
        (status, Json(body)).into_response()
    }
}
