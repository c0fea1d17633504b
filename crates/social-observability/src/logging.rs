use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_DIR: &str = "storage/logs";

/// Console filter for `level`, keeping noisy dependencies at `warn`.
pub fn filter_directives(level: &str) -> String {
    format!("social={level},tower_http=warn,hyper=warn,sqlx=warn,reqwest=warn")
}

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `LOG_LEVEL` (default `info`) for the console. The
/// error file only receives `error` events; the JSON file receives `info`
/// and above.
pub fn init_tracing() -> anyhow::Result<()> {
    std::fs::create_dir_all(LOG_DIR)?;

    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(&level)));

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = fmt::layer()
        .with_writer(RollingFileAppender::new(Rotation::DAILY, LOG_DIR, "social.log"))
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_filter(EnvFilter::new("error"));

    let json_layer = fmt::layer()
        .json()
        .with_writer(RollingFileAppender::new(Rotation::DAILY, LOG_DIR, "social.json"))
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(json_layer)
        .try_init()?;

    Ok(())
}

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let request_id = uuid::Uuid::new_v4().to_string();

    info!(request_id = %request_id, method = %method, path = %path, "Incoming request");

    let response = next.run(req).await;
    let latency_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    match status {
        400..=499 => warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms = %latency_ms,
            "Client error"
        ),
        500..=599 => error!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms = %latency_ms,
            "Server error"
        ),
        _ => info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms = %latency_ms,
            "Request completed"
        ),
    }

    response
}
