//! Logging middleware
//!
//! Tags every request with a correlation id and logs method, path, status
//! and latency once the response is ready.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, Instrument};

use crate::utils::helpers::generate_request_id;

pub async fn log_requests(request: Request, next: Next) -> Response {
    let request_id = generate_request_id();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let span = tracing::info_span!("request", request_id = %request_id);
    let response = next.run(request).instrument(span).await;

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        request_id = %request_id,
        "Request completed"
    );

    response
}
