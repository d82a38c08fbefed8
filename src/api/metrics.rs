use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNT: AtomicU64 = AtomicU64::new(0);

pub fn increment_request_count() {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

/// Counts 4xx and 5xx responses.
pub fn increment_error_count() {
    ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn request_count() -> u64 {
    REQUEST_COUNT.load(Ordering::Relaxed)
}

pub fn error_count() -> u64 {
    ERROR_COUNT.load(Ordering::Relaxed)
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsResponse {
    pub http_requests_total: u64,
    pub http_errors_total: u64,
}

fn render(metrics: &MetricsResponse) -> String {
    format!(
        "# HELP http_requests_total Total number of HTTP requests\n\
         # TYPE http_requests_total counter\n\
         http_requests_total {}\n\
         \n\
         # HELP http_errors_total Total number of HTTP responses with a 4xx or 5xx status\n\
         # TYPE http_errors_total counter\n\
         http_errors_total {}\n",
        metrics.http_requests_total, metrics.http_errors_total
    )
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Request counters in Prometheus text format", body = MetricsResponse)
    )
)]
pub async fn get_metrics() -> HttpResponse {
    let metrics = MetricsResponse {
        http_requests_total: request_count(),
        http_errors_total: error_count(),
    };

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(render(&metrics))
}
