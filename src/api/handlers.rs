//! Axum request handlers for the HTTP API.
//!
//! Image positions in paths and queries are 1-based, matching the exported
//! file names (`/images/1` is `image_1.png`).
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::routes::AppState;
use crate::buffer::{ImageBuffer, PrintSelection, ARCHIVE_FILE_NAME};
use crate::error::{AppResult, ValidationError};

pub async fn root() -> &'static str {
    "Coloring Book Generator"
}

pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

fn summary(id: Uuid, buffer: &ImageBuffer) -> Value {
    let images: Vec<Value> = buffer
        .iter()
        .enumerate()
        .map(|(i, img)| {
            json!({
                "position": i + 1,
                "file_name": ImageBuffer::file_name(i),
                "width": img.width(),
                "height": img.height(),
            })
        })
        .collect();
    json!({
        "session_id": id,
        "image_count": buffer.len(),
        "images": images,
    })
}

pub async fn create_session(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let (id, session) = state.sessions.create().await;
    let buffer = session.buffer().await;
    (StatusCode::CREATED, Json(summary(id, &buffer)))
}

pub async fn session_summary(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let session = state.sessions.get(id).await?;
    let buffer = session.buffer().await;
    Ok(Json(summary(id, &buffer)))
}

pub async fn end_session(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
}

pub async fn generate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GenerateRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let session = state.sessions.get(id).await?;
    let generated = session.generate(&state.client, &payload.prompt).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "position": generated.index + 1,
            "file_name": ImageBuffer::file_name(generated.index),
            "width": generated.width,
            "height": generated.height,
            "image_count": generated.image_count,
        })),
    ))
}

pub async fn clear_images(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> AppResult<Json<Value>> {
    let session = state.sessions.get(id).await?;
    session.clear().await;
    tracing::info!(session = %id, "buffer cleared");
    Ok(Json(json!({"session_id": id, "image_count": 0})))
}

#[derive(Debug, Default, Deserialize)]
pub struct ImageQuery {
    #[serde(default)]
    pub download: bool,
}

pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Path((id, position)): Path<(Uuid, usize)>,
    Query(params): Query<ImageQuery>,
) -> AppResult<Response> {
    let index = position_to_index(position)?;
    let session = state.sessions.get(id).await?;
    let png = session.buffer().await.export_single(index)?;
    let disposition = if params.download { "attachment" } else { "inline" };
    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_DISPOSITION, format!("{}; filename=\"{}\"", disposition, ImageBuffer::file_name(index))),
        ],
        png,
    )
        .into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct PrintQuery {
    pub images: Option<String>,
    pub auto_print: Option<bool>,
}

pub async fn print_image(
    State(state): State<Arc<AppState>>,
    Path((id, position)): Path<(Uuid, usize)>,
    Query(params): Query<PrintQuery>,
) -> AppResult<Html<String>> {
    let selection = PrintSelection::Indices(vec![position_to_index(position)?]);
    render_print(&state, id, &selection, params.auto_print.unwrap_or(true)).await
}

pub async fn print_images(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(params): Query<PrintQuery>,
) -> AppResult<Html<String>> {
    let selection = match params.images.as_deref() {
        None | Some("") | Some("all") => PrintSelection::All,
        Some(list) => PrintSelection::Indices(parse_positions(list)?),
    };
    render_print(&state, id, &selection, params.auto_print.unwrap_or(true)).await
}

async fn render_print(
    state: &AppState,
    id: Uuid,
    selection: &PrintSelection,
    auto_print: bool,
) -> AppResult<Html<String>> {
    let session = state.sessions.get(id).await?;
    let document = session.buffer().await.render_printable(selection)?;
    tracing::debug!(session = %id, images = document.image_count(), "print document rendered");
    Ok(Html(document.auto_print(auto_print).render()))
}

pub async fn download_archive(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> AppResult<Response> {
    let session = state.sessions.get(id).await?;
    let zip = session.buffer().await.export_all()?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", ARCHIVE_FILE_NAME)),
        ],
        zip,
    )
        .into_response())
}

fn position_to_index(position: usize) -> Result<usize, ValidationError> {
    position.checked_sub(1).ok_or(ValidationError::InvalidPosition(position))
}

/// Parse `"1,3, 4"` into 0-based indices.
fn parse_positions(list: &str) -> Result<Vec<usize>, ValidationError> {
    list.split(',')
        .map(|p| {
            let position: usize = p
                .trim()
                .parse()
                .map_err(|_| ValidationError::InvalidSelection(list.to_string()))?;
            position_to_index(position)
        })
        .collect()
}
