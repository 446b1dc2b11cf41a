//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Row-level ingestion errors also report the line that stopped the upload.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::ingest::{IngestError, StageError};
use crate::read::ReadError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Upload rejected (400, 500 for server-side failures)
    Ingest(IngestError),

    /// Read failed (404 out of bounds, 500 otherwise)
    Read(ReadError),
}

impl ApiError {
    /// Status, machine code and human message for this error
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            Self::Ingest(e) => match e {
                IngestError::InvalidFileFormat { .. } => (
                    StatusCode::BAD_REQUEST,
                    "invalid_file_format",
                    "Invalid file format".into(),
                ),
                IngestError::StructuralMismatch { .. } | IngestError::Malformed { .. } => (
                    StatusCode::BAD_REQUEST,
                    "structural_mismatch",
                    "An error occurred with the file".into(),
                ),
                IngestError::TypeCoercion { .. } => (
                    StatusCode::BAD_REQUEST,
                    "invalid_data_type",
                    "Encountered invalid data type".into(),
                ),
                IngestError::DuplicateKey { .. } => (
                    StatusCode::BAD_REQUEST,
                    "duplicate_id",
                    "Avoided duplicate id entry".into(),
                ),
                IngestError::Stage(StageError::Upload(_)) => (
                    StatusCode::BAD_REQUEST,
                    "upload_error",
                    e.to_string(),
                ),
                IngestError::Stage(StageError::Io(_))
                | IngestError::Io(_)
                | IngestError::Database(_) => internal(),
            },
            Self::Read(e) => match e {
                ReadError::PageOutOfBounds { .. } => (
                    StatusCode::NOT_FOUND,
                    "page_out_of_bounds",
                    "Page out of bounds".into(),
                ),
                ReadError::Database(_) => internal(),
            },
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Ingest(e) => e.to_string(),
            Self::Read(e) => e.to_string(),
        }
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "an internal error occurred".into(),
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = if status.is_server_error() {
            // Log the actual error, return generic message
            tracing::error!(error = %self.detail(), "request failed");
            json!({ "error": code, "message": message })
        } else {
            let mut body = json!({
                "error": code,
                "message": message,
                "detail": self.detail(),
            });
            if let Self::Ingest(e) = &self {
                if let Some(row) = e.row() {
                    body["row"] = json!(row);
                }
            }
            body
        };

        (status, Json(body)).into_response()
    }
}

impl From<IngestError> for ApiError {
    fn from(e: IngestError) -> Self {
        Self::Ingest(e)
    }
}

impl From<ReadError> for ApiError {
    fn from(e: ReadError) -> Self {
        Self::Read(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbError;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn invalid_format_is_400() {
        let err = ApiError::from(IngestError::InvalidFileFormat {
            filename: "x.txt".into(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "invalid_file_format");
        assert_eq!(body["message"], "Invalid file format");
        assert!(body.get("row").is_none());
    }

    #[tokio::test]
    async fn duplicate_reports_row() {
        let err = ApiError::from(IngestError::DuplicateKey { row: 2, id: 1 });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "duplicate_id");
        assert_eq!(body["message"], "Avoided duplicate id entry");
        assert_eq!(body["row"], 2);
    }

    #[tokio::test]
    async fn out_of_bounds_is_404() {
        let err = ApiError::from(ReadError::PageOutOfBounds { page: 3, pages: 2 });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Page out of bounds");
    }

    #[tokio::test]
    async fn database_errors_are_hidden() {
        let err = ApiError::from(ReadError::Database(DbError::Sqlx(sqlx::Error::PoolClosed)));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["message"], "an internal error occurred");
        assert!(body.get("detail").is_none());
    }
}
