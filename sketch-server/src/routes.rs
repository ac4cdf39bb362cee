//! HTTP handlers for the history routes.
//!
//! - `POST /api/history/save` - persist one drawing (201 / 400 / 500)
//! - `GET /api/history/{owner_id}` - list an owner's drawings (200 / 400 / 500),
//!   including `GET /api/history/save` for the owner named `save`

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sketch_core::protocol::{
    FETCH_FAILED_MESSAGE, MISSING_FIELDS_MESSAGE, SAVE_FAILED_MESSAGE, SAVE_ROUTE,
};
use sketch_core::{ErrorBody, HistoryListing, SaveAck, SaveRequest};

use crate::metrics::{self, Outcome};
use crate::service::HistoryError;
use crate::validation::ValidationError;
use crate::AppState;

/// Error response with a `{message}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Create an error response.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of the response.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn validation(err: &ValidationError) -> Self {
        metrics::record_validation_failure(err.kind());
        let message = if err.is_missing_field() {
            MISSING_FIELDS_MESSAGE.to_string()
        } else {
            err.to_string()
        };
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn from_rejection(rejection: &JsonRejection) -> Self {
        metrics::record_validation_failure("body");
        let status = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            StatusCode::PAYLOAD_TOO_LARGE
        } else {
            StatusCode::BAD_REQUEST
        };
        Self::new(status, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody::new(self.message))).into_response()
    }
}

/// Save a drawing to its owner's history.
#[tracing::instrument(name = "save_handler", skip(state, payload))]
pub async fn save_handler(
    State(state): State<AppState>,
    payload: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SaveAck>), ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected save body");
        metrics::record_save(Outcome::Invalid);
        ApiError::from_rejection(&rejection)
    })?;
    let bytes = request.image.as_ref().map_or(0, String::len);

    match state.service.save(request).await {
        Ok(_) => {
            metrics::record_save(Outcome::Success);
            metrics::record_artifact_bytes(bytes);
            Ok((StatusCode::CREATED, Json(SaveAck::default())))
        }
        Err(HistoryError::Validation(err)) => {
            tracing::debug!(error = %err, "Save rejected");
            metrics::record_save(Outcome::Invalid);
            Err(ApiError::validation(&err))
        }
        Err(HistoryError::Persistence(err)) => {
            tracing::warn!(error = %err, "Failed to persist drawing");
            metrics::record_save(Outcome::Error);
            Err(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                SAVE_FAILED_MESSAGE,
            ))
        }
    }
}

/// Fetch an owner's drawings in insertion order.
#[tracing::instrument(name = "fetch_handler", skip(state))]
pub async fn fetch_handler(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<Json<HistoryListing>, ApiError> {
    fetch_history(&state, &owner_id).await
}

/// `GET` on the save path: the history of the owner literally named `save`.
///
/// The static save route shadows `/{owner_id}` for that one identifier.
#[tracing::instrument(name = "fetch_handler", skip(state))]
pub async fn fetch_save_owner_handler(
    State(state): State<AppState>,
) -> Result<Json<HistoryListing>, ApiError> {
    fetch_history(&state, SAVE_ROUTE.trim_start_matches('/')).await
}

async fn fetch_history(
    state: &AppState,
    owner_id: &str,
) -> Result<Json<HistoryListing>, ApiError> {
    match state.service.fetch(owner_id).await {
        Ok(history) => {
            metrics::record_fetch(Outcome::Success);
            Ok(Json(HistoryListing { history }))
        }
        Err(HistoryError::Validation(err)) => {
            metrics::record_fetch(Outcome::Invalid);
            Err(ApiError::validation(&err))
        }
        Err(HistoryError::Persistence(err)) => {
            tracing::warn!(error = %err, "Failed to read history");
            metrics::record_fetch(Outcome::Error);
            Err(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                FETCH_FAILED_MESSAGE,
            ))
        }
    }
}
