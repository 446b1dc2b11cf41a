//! Color endpoints
//!
//! - `POST /write-objects/`: multipart upload, field `file`,
//!   rows formatted `id;name;hex;red;green;blue;decimal`
//! - `GET /read-objects/?page=N`: one page of stored colors

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::ingest::{IngestError, StageError};
use crate::models::Color;

/// Multipart field carrying the upload
const FILE_FIELD: &str = "file";

/// Upload success response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    /// Rows stored from this upload
    pub rows: usize,
}

/// Page query, 1-indexed
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    pub page: i64,
}

fn first_page() -> i64 {
    1
}

/// POST /write-objects/ - ingest an uploaded color file
async fn write_objects(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let Ok(mut multipart) = multipart else {
        return Err(missing_file().into());
    };

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        IngestError::Stage(StageError::Upload(Box::new(e)))
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_owned();
        let report = state.ingestor.ingest(&filename, field).await?;

        return Ok(Json(UploadResponse {
            message: "File uploaded successfully, GET /read-objects/",
            rows: report.rows,
        }));
    }

    Err(missing_file().into())
}

fn missing_file() -> IngestError {
    IngestError::InvalidFileFormat {
        filename: String::new(),
    }
}

/// GET /read-objects/ - one page of colors in ascending id order
async fn read_objects(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Color>>, ApiError> {
    let colors = state.reader.read(query.page).await?;
    Ok(Json(colors))
}

/// Color routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/write-objects/", post(write_objects))
        .route("/read-objects/", get(read_objects))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_to_first() {
        let query: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
    }
}
