use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, HeaderValue};
use axum::response::{Json, Response};
use doccat_types::{FileName, SearchHit, SearchQuery, UploadedFile};
use futures::{StreamExt, TryStreamExt};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogService;
use crate::error::{ServerError, ServerResult};

/// Multipart field carrying uploaded files.
pub const UPLOAD_FIELD: &str = "files";

pub type AppState = Arc<CatalogService>;

/// Escaped in a `filename*` value: everything but alphanumerics and `-._~`.
const FILENAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub uploaded_files: Vec<UploadedFile>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse {
    pub files: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
}

pub async fn home_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to the doccat file catalog API".into(),
    })
}

/// Store and index every `files` part of a multipart upload, in order.
pub async fn upload_handler(
    State(catalog): State<AppState>,
    mut multipart: Multipart,
) -> ServerResult<Json<UploadResponse>> {
    let mut uploaded_files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            tracing::debug!(field = ?field.name(), "ignoring non-file multipart field");
            continue;
        }
        let Some(raw_name) = field.file_name() else {
            return Err(ServerError::BadRequest(
                "upload part is missing a filename".into(),
            ));
        };
        let name = FileName::parse(raw_name)?;
        let content_type = field.content_type().map(str::to_string);

        let data = field.map_err(std::io::Error::other).boxed();
        let result = catalog.upload_file(&name, content_type, data).await?;
        uploaded_files.push(result);
    }

    if uploaded_files.is_empty() {
        return Err(ServerError::BadRequest(format!(
            "no files provided in multipart field {UPLOAD_FIELD:?}"
        )));
    }

    Ok(Json(UploadResponse { uploaded_files }))
}

pub async fn list_handler(State(catalog): State<AppState>) -> ServerResult<Json<ListResponse>> {
    Ok(Json(ListResponse {
        files: catalog.list_files().await?,
    }))
}

pub async fn download_handler(
    State(catalog): State<AppState>,
    Path(filename): Path<String>,
) -> ServerResult<Response> {
    let name = FileName::parse(filename)?;
    let reader = catalog.open_file(&name).await?;

    Response::builder()
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, reader.size)
        .header(header::CONTENT_DISPOSITION, content_disposition(&name)?)
        .body(Body::from_stream(reader.stream))
        .map_err(|e| ServerError::Internal(e.to_string()))
}

pub async fn delete_handler(
    State(catalog): State<AppState>,
    Path(filename): Path<String>,
) -> ServerResult<Json<MessageResponse>> {
    let name = FileName::parse(filename)?;
    catalog.delete_file(&name).await?;
    Ok(Json(MessageResponse {
        message: format!("File '{name}' has been deleted"),
    }))
}

pub async fn search_handler(
    State(catalog): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ServerResult<Json<SearchResponse>> {
    let query = SearchQuery::from_params(
        params.query.as_deref(),
        params.start_date.as_deref(),
        params.end_date.as_deref(),
        params.content_type.as_deref(),
    )?;
    Ok(Json(SearchResponse {
        results: catalog.search(&query).await?,
    }))
}

/// `attachment` disposition; non-ASCII or quoted names use the RFC 5987
/// `filename*` form.
fn content_disposition(name: &FileName) -> ServerResult<HeaderValue> {
    let name = name.as_str();
    let value = if name.is_ascii() && !name.contains('"') {
        format!("attachment; filename=\"{name}\"")
    } else {
        format!(
            "attachment; filename*=utf-8''{}",
            utf8_percent_encode(name, FILENAME_ENCODE_SET)
        )
    };
    HeaderValue::from_str(&value).map_err(|e| ServerError::Internal(e.to_string()))
}
