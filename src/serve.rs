//! Purpose: Provide the HTTP/JSON boundary for the conversion engine.
//! Exports: `ServeConfig`, `serve`.
//! Role: Axum-based server exposing the convert endpoints the original API shipped.
//! Invariants: Handlers are stateless; every request allocates fresh data.
//! Invariants: Response envelopes are `{success, data}` / `{success, error}`.
//! Invariants: Loopback-only unless explicitly allowed.

use axum::Json;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde::Deserialize;
use serde_json::json;
use std::net::{IpAddr, SocketAddr};
use std::time::{SystemTime, UNIX_EPOCH};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use triform::api::{
    ConversionRequest, Document, Error, ErrorKind, convert, convert_to_json, convert_to_text,
    convert_to_xml,
};

#[derive(Clone, Debug)]
pub struct ServeConfig {
    pub bind: SocketAddr,
    pub allow_non_loopback: bool,
    pub max_body_bytes: u64,
    pub cors_allowed_origins: Vec<String>,
}

pub async fn serve(config: ServeConfig) -> Result<(), Error> {
    validate_config(&config)?;

    init_tracing();

    let max_body_bytes: usize = config
        .max_body_bytes
        .try_into()
        .map_err(|_| Error::new(ErrorKind::InvalidArgument).with_message("--max-body-bytes is too large"))?;

    let app = axum::Router::new()
        .route("/api/health", get(health))
        .route("/api/convert", post(convert_document))
        .route("/api/convert/text", post(convert_to_text_endpoint))
        .route("/api/convert/json", post(convert_to_json_endpoint))
        .route("/api/convert/xml", post(convert_to_xml_endpoint))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors_layer(&config)?)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to bind server")
                .with_source(err)
        })?;

    tracing::info!(bind = %config.bind, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("server failed")
                .with_source(err)
        })
}

fn is_loopback(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(addr) => addr.is_loopback(),
        IpAddr::V6(addr) => addr.is_loopback(),
    }
}

fn validate_config(config: &ServeConfig) -> Result<(), Error> {
    if !is_loopback(config.bind.ip()) && !config.allow_non_loopback {
        return Err(Error::new(ErrorKind::InvalidArgument)
            .with_message("non-loopback bind requires explicit opt-in")
            .with_hint("Re-run with --allow-non-loopback or use a loopback address."));
    }

    if config.max_body_bytes == 0 {
        return Err(Error::new(ErrorKind::InvalidArgument)
            .with_message("--max-body-bytes must be greater than zero")
            .with_hint("Use a positive value like 10485760."));
    }

    for origin in &config.cors_allowed_origins {
        if HeaderValue::from_str(origin).is_err() {
            return Err(Error::new(ErrorKind::InvalidArgument)
                .with_message(format!("invalid CORS origin: {origin}"))
                .with_hint("Use an origin like https://example.com."));
        }
    }

    Ok(())
}

fn cors_layer(config: &ServeConfig) -> Result<CorsLayer, Error> {
    if config.cors_allowed_origins.is_empty() {
        return Ok(CorsLayer::new().allow_origin(Any));
    }
    let mut origins = Vec::with_capacity(config.cors_allowed_origins.len());
    for origin in &config.cors_allowed_origins {
        let value = HeaderValue::from_str(origin).map_err(|_| {
            Error::new(ErrorKind::InvalidArgument)
                .with_message(format!("invalid CORS origin: {origin}"))
        })?;
        origins.push(value);
    }
    Ok(CorsLayer::new().allow_origin(origins))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        let mut signal = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("install SIGTERM handler");
        signal.recv().await;
    };
    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    #[cfg(not(unix))]
    ctrl_c.await;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextConversionRequest {
    document: Document,
    segment_separator: String,
    element_separator: String,
}

#[derive(Debug, Deserialize)]
struct DocumentRequest {
    document: Document,
}

async fn health() -> Response {
    Json(json!({
        "success": true,
        "message": "triform API is running",
        "timestamp": timestamp_now(),
    }))
    .into_response()
}

async fn convert_document(Json(request): Json<ConversionRequest>) -> Response {
    document_response(convert(&request))
}

async fn convert_to_text_endpoint(Json(request): Json<TextConversionRequest>) -> Response {
    document_response(convert_to_text(
        &request.document,
        &request.segment_separator,
        &request.element_separator,
    ))
}

async fn convert_to_json_endpoint(Json(request): Json<DocumentRequest>) -> Response {
    document_response(convert_to_json(&request.document))
}

async fn convert_to_xml_endpoint(Json(request): Json<DocumentRequest>) -> Response {
    document_response(convert_to_xml(&request.document))
}

fn document_response(result: Result<Document, Error>) -> Response {
    match result {
        Ok(document) => Json(json!({ "success": true, "data": document })).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: Error) -> Response {
    let status = match err.kind() {
        ErrorKind::InvalidArgument
        | ErrorKind::EmptyInput
        | ErrorKind::InvalidStructure
        | ErrorKind::ConversionFailed => StatusCode::BAD_REQUEST,
        ErrorKind::Io | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = json!({
        "success": false,
        "error": err.message().unwrap_or("Conversion failed"),
    });
    (status, Json(body)).into_response()
}

fn timestamp_now() -> String {
    use time::format_description::well_known::Rfc3339;
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|duration| {
            time::OffsetDateTime::from_unix_timestamp_nanos(duration.as_nanos() as i128).ok()
        })
        .and_then(|ts| ts.format(&Rfc3339).ok())
        .unwrap_or_default()
}
