//! Local stand-in for the image generation provider and its file host.
#![allow(dead_code)]

use std::io::Cursor;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use coloring_book_generator::Config;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub body: Value,
    pub authorization: Option<String>,
}

#[derive(Clone)]
struct MockState {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct MockProvider {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// The picture every successful generation returns.
pub fn sample_image() -> RgbImage {
    RgbImage::from_fn(64, 48, |x, y| Rgb([(x * 4) as u8, (y * 5) as u8, ((x + y) % 256) as u8]))
}

fn sample_png() -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(sample_image())
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

impl MockProvider {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState { base_url: base_url.clone(), requests: requests.clone() };

        let app = Router::new()
            .route("/v1/images/generations", post(generations))
            .route("/files/:name", get(file))
            .with_state(state);
        let server = axum::Server::from_tcp(listener).unwrap().serve(app.into_make_service());
        tokio::spawn(server);

        MockProvider { base_url, requests }
    }

    pub fn api_url(&self) -> String {
        format!("{}/v1", self.base_url)
    }

    pub fn config(&self) -> Config {
        Config {
            openai_api_key: Some("test-key".to_string()),
            openai_api_url: self.api_url(),
            request_timeout_secs: 5,
            ..Config::default()
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn generations(State(state): State<MockState>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let prompt = body.get("prompt").and_then(|p| p.as_str()).unwrap_or_default().to_string();
    state.requests.lock().unwrap().push(RecordedRequest { body, authorization });

    if prompt.contains("forbidden") {
        let err = json!({"error": {
            "code": "content_policy_violation",
            "message": "Your request was rejected as a result of our safety system.",
            "type": "invalid_request_error",
        }});
        return (StatusCode::BAD_REQUEST, Json(err)).into_response();
    }
    if prompt.contains("overloaded") {
        return (StatusCode::SERVICE_UNAVAILABLE, "try again later").into_response();
    }
    if prompt.contains("nothing") {
        return Json(json!({"created": 1, "data": []})).into_response();
    }
    let file = if prompt.contains("broken link") {
        "absent.png"
    } else if prompt.contains("garbage") {
        "garbage.png"
    } else {
        "page.png"
    };
    Json(json!({
        "created": 1,
        "data": [{"url": format!("{}/files/{}", state.base_url, file), "revised_prompt": prompt}],
    }))
    .into_response()
}

async fn file(Path(name): Path<String>) -> Response {
    match name.as_str() {
        "page.png" => ([(header::CONTENT_TYPE, "image/png")], sample_png()).into_response(),
        "garbage.png" => ([(header::CONTENT_TYPE, "image/png")], b"this is not a png".to_vec()).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
