use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Form, Json, State};
use axum::http::{HeaderName, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::config::Config;
use crate::credential::{WifiCredential, redact_ssid};
use crate::error::Error;
use crate::form::{self, FormInput, QrForm, escape_html};
use crate::preview::{self, PNG_MIME, Preview};
use crate::qr::QrImage;
use crate::session::QrSession;

/// Pages and PNGs both carry the submitted credentials.
const NO_STORE: [(HeaderName, &str); 1] = [(header::CACHE_CONTROL, "no-store")];

#[derive(Clone)]
pub struct AppState {
    session: Arc<QrSession>,
    default_scale: u32,
    renders: Arc<Semaphore>,
}

impl AppState {
    pub fn new(session: QrSession, default_scale: u32) -> Self {
        // One raster at a time per core; each may hold a canvas of up to
        // `max_side_px`² RGBA pixels.
        let permits = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(2);
        Self {
            session: Arc::new(session),
            default_scale,
            renders: Arc::new(Semaphore::new(permits)),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let style = config.qr.style().context("invalid qr style")?;
        Ok(Self::new(
            QrSession::new(style, config.cache.capacity),
            config.qr.default_scale,
        ))
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(rerender))
        .route("/qr", post(download))
        .route("/api/qr", post(api_qr))
        .route("/healthz", get(healthz))
        .with_state(state)
}

pub async fn run_ui(config: Config) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let addr: SocketAddr = config.ui.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind UI listener on {addr}"))?;
    info!(?addr, "UI server listening");

    axum::serve(listener, app(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("ui server exited")?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.ok();
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        if let Ok(mut term) = signal(SignalKind::terminate()) {
            term.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown requested");
}

async fn index(State(state): State<AppState>) -> Response {
    let input = FormInput {
        scale: state.default_scale,
        ..FormInput::default()
    };
    render_page(&state, input, None).await
}

async fn rerender(State(state): State<AppState>, Form(form): Form<QrForm>) -> Response {
    match form.collect() {
        Ok(input) => render_page(&state, input, None).await,
        Err(err) => {
            let input = form.collect_lenient(state.default_scale);
            render_page(&state, input, Some(err)).await
        }
    }
}

async fn download(State(state): State<AppState>, Form(form): Form<QrForm>) -> Response {
    let input = match form.collect() {
        Ok(input) => input,
        Err(err) => return (status_for(&err), err.to_string()).into_response(),
    };
    match encode(&state, input.credential, input.scale).await {
        Ok(image) => png_attachment(&image),
        Err(err) => (status_for(&err), err.to_string()).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct ApiRequest {
    #[serde(flatten)]
    credential: WifiCredential,
    #[serde(default)]
    scale: Option<u32>,
}

async fn api_qr(
    State(state): State<AppState>,
    request: Result<Json<ApiRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "rejected api request body");
            return json_error(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };
    let scale = request.scale.unwrap_or(state.default_scale);
    match encode(&state, request.credential, scale).await {
        Ok(image) => png_attachment(&image),
        Err(err) => json_error(status_for(&err), err.to_string()),
    }
}

async fn healthz() -> &'static str {
    "ok"
}

fn json_error(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Runs the session encode on the blocking pool, bounded by `renders`.
async fn encode(
    state: &AppState,
    credential: WifiCredential,
    scale: u32,
) -> Result<Arc<QrImage>, Error> {
    let ssid = redact_ssid(&credential.ssid);
    let security = credential.security;
    let hidden = credential.hidden;
    let result = match Arc::clone(&state.renders).acquire_owned().await {
        Ok(permit) => {
            let session = Arc::clone(&state.session);
            tokio::task::spawn_blocking(move || {
                let _permit = permit;
                session.encode(&credential, scale)
            })
            .await
            .unwrap_or_else(|err| Err(Error::Render(err.to_string())))
        }
        Err(err) => Err(Error::Render(err.to_string())),
    };
    match &result {
        Ok(image) => info!(
            ssid = %ssid,
            security = %security,
            hidden,
            scale,
            side_px = image.side_px(),
            "rendered wifi qr code"
        ),
        Err(err) => warn!(
            ssid = %ssid,
            scale,
            error = %err,
            "wifi qr code rejected"
        ),
    }
    result
}

fn png_attachment(image: &QrImage) -> Response {
    (
        NO_STORE,
        [
            (header::CONTENT_TYPE, PNG_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                preview::attachment_disposition(),
            ),
        ],
        image.png.clone(),
    )
        .into_response()
}

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::Encode(_) | Error::TooLarge { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        Error::InvalidScale { .. } | Error::InvalidField { .. } | Error::InvalidSecurity(_) => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Renders the whole page for `input`. A `rejected` submission skips
/// encoding and shows the error in place of the preview.
async fn render_page(state: &AppState, input: FormInput, rejected: Option<Error>) -> Response {
    let outcome = match rejected {
        Some(err) => Err(err),
        None => encode(state, input.credential.clone(), input.scale)
            .await
            .and_then(|image| preview::present(&image.png)),
    };
    let (status, qr_section) = match outcome {
        Ok(preview) => (StatusCode::OK, render_preview(&preview)),
        Err(err) => (status_for(&err), render_error(&err)),
    };
    let body = format!(
        "<section class=\"panel\"><h2>Parameters</h2><p>Fill in the boxes below to create a QR code for easy login on the specified WiFi.</p>{}</section><section class=\"panel qr\"><h2>QR Code</h2>{}</section><section class=\"panel about\"><h2>About</h2>{}</section>",
        form::render_controls(&input),
        qr_section,
        ABOUT
    );
    (status, NO_STORE, Html(layout(&body))).into_response()
}

fn render_preview(preview: &Preview) -> String {
    format!(
        "<p class=\"size\">{label}</p><img class=\"preview\" src=\"{uri}\" alt=\"WiFi QR code\"><p><a class=\"button\" href=\"{uri}\" download=\"{file}\" type=\"{mime}\">Download QR code</a></p>",
        label = escape_html(&preview.size_label()),
        uri = preview.data_uri,
        file = preview.file_name(),
        mime = preview.mime()
    )
}

fn render_error(err: &Error) -> String {
    format!(
        "<p class=\"error\">{}</p>",
        escape_html(&err.to_string())
    )
}

fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"><title>WiFi QR Code Generator</title><style>{}</style></head><body><main><h1>WiFi QR Code Generator</h1>{}</main></body></html>",
        styles(),
        body
    )
}

fn styles() -> &'static str {
    "body { font-family: sans-serif; margin: 0; padding: 0; background: #f5f5f5; color: #222; }\nmain { max-width: 860px; margin: 0 auto; padding: 24px; background: #fff; min-height: 100vh; box-sizing: border-box; }\nh1, h2 { margin-top: 0; }\n.panel { margin-bottom: 28px; }\n.columns { display: flex; gap: 24px; flex-wrap: wrap; }\n.column { flex: 1 1 280px; }\nlabel { display: flex; flex-direction: column; font-weight: 600; margin-top: 12px; }\nlabel.inline { flex-direction: row; align-items: center; gap: 8px; }\ninput, select { margin-top: 6px; padding: 8px; border-radius: 4px; border: 1px solid #ccc; font-size: 1rem; }\ninput[type=range] { padding: 0; }\ninput:disabled { background: #eee; }\n.preview { display: block; max-width: 100%; image-rendering: pixelated; }\n.size { font-family: monospace; color: #37474f; }\na.button, button { display: inline-block; padding: 8px 14px; border-radius: 4px; border: 1px solid #1976d2; background: #2196f3; color: #fff; text-decoration: none; cursor: pointer; }\na.button:hover, button:hover { background: #1e88e5; }\n.error { background: #ffebee; color: #b71c1c; padding: 12px; border-radius: 4px; }\n.about p, .about li { line-height: 1.6; color: #444; }\n@media (max-width: 600px) { main { padding: 16px; } }"
}

const ABOUT: &str = "<p>A QR code is a two-dimensional barcode that a phone camera can read. For WiFi it carries the network name (SSID), the security type and the password, so guests can join without typing anything.</p><ol><li>Fill in the SSID and password above.</li><li>Scan the code with a phone camera or QR reader.</li><li>The phone offers to join the network with the stored credentials.</li></ol><p>This avoids typos and makes a long, strong password painless to share.</p>";
