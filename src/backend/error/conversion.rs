/**
 * Error Conversion
 *
 * All backend errors implement `IntoResponse`, so handlers return
 * `Result<_, BackendError>` and any failure becomes a JSON response.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "message": "Invalid email or password",
 *   "status": 401,
 *   "errorCode": "InvalidAccessToken",
 *   "errors": [{ "path": "email", "message": "Invalid email address" }]
 * }
 * ```
 *
 * `errorCode` and `errors` are only present when they apply.
 */

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::backend::error::types::{BackendError, ErrorCode};
use crate::shared::{FieldError, SharedError};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    message: String,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }

        let errors = match &self {
            BackendError::SharedError(SharedError::ValidationError { errors }) => errors.clone(),
            _ => Vec::new(),
        };

        let body = ErrorBody {
            message: self.message(),
            status: status.as_u16(),
            error_code: self.code(),
            errors,
        };

        (status, Json(body)).into_response()
    }
}
