//! Executes the client's `HttpRequest` values over the network.
//!
//! # Design
//! `Transport` is the seam between the sans-IO core and the outside world.
//! `UreqTransport` performs a blocking round-trip; `send` moves it onto
//! tokio's blocking pool so a view can await it. Non-2xx statuses come back
//! as data, only connection-level failures become `TransportError`.

use std::sync::Arc;

use tool_tracker_core::{ApiError, HttpMethod, HttpRequest, HttpResponse};
use tracing::debug;

pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let HttpRequest {
            method,
            path,
            headers,
            body,
        } = request;

        let result = match method {
            HttpMethod::Get => with_headers(self.agent.get(&path), &headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&path), &headers).call(),
            HttpMethod::Post => send_body(with_headers(self.agent.post(&path), &headers), body),
            HttpMethod::Put => send_body(with_headers(self.agent.put(&path), &headers), body),
        };
        let mut response = result.map_err(transport_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                let value = value.to_str().ok()?;
                Some((name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(transport_error)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send_body(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<String>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

fn transport_error(err: ureq::Error) -> ApiError {
    ApiError::TransportError(err.to_string())
}

/// Run one request on the blocking pool.
pub async fn send(
    transport: Arc<dyn Transport>,
    request: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    debug!(method = request.method.as_str(), url = %request.path, "sending request");
    let response = tokio::task::spawn_blocking(move || transport.execute(request))
        .await
        .map_err(|err| ApiError::TransportError(err.to_string()))??;
    debug!(status = response.status, "response received");
    Ok(response)
}
