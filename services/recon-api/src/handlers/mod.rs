//! HTTP request handlers for the recon map API.

pub mod catalog;
pub mod download;
pub mod health;
pub mod map;
pub mod mission;
pub mod popup;
pub mod selection;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use recon_common::ReconError;

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub type_: &'static str,
    pub status: u16,
    pub detail: String,
}

/// A [`ReconError`] returned from a handler.
#[derive(Debug)]
pub struct ApiError(pub ReconError);

impl From<ReconError> for ApiError {
    fn from(err: ReconError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn type_name(&self) -> &'static str {
        match self.0 {
            ReconError::InvalidParameter { .. } => "InvalidParameterValue",
            ReconError::StormNotFound(_)
            | ReconError::MissionNotFound(_)
            | ReconError::MarkerNotFound(_) => "NotFound",
            ReconError::NoSelection => "NoSelection",
            ReconError::FetchFailed { .. } | ReconError::InvalidData(_) => "UpstreamError",
            _ => "ServerError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, "Request rejected");
        }
        let body = ErrorResponse {
            type_: self.type_name(),
            status: status.as_u16(),
            detail: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
