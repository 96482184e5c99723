//! Blocking HTTP transport over ureq.

use std::time::Duration;

use booking_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, Transport};
use ureq::typestate::WithBody;
use ureq::{Body, RequestBuilder};

pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// 4xx/5xx responses come back as data, never as `Err`; the core decides
    /// what they mean.
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send(
    builder: RequestBuilder<WithBody>,
    body: Option<String>,
) -> Result<ureq::http::Response<Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
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
            HttpMethod::Post => send(with_headers(self.agent.post(&path), &headers), body),
            HttpMethod::Put => send(with_headers(self.agent.put(&path), &headers), body),
            HttpMethod::Patch => send(with_headers(self.agent.patch(&path), &headers), body),
        };
        let mut response = result.map_err(|e| {
            tracing::debug!(%method, %path, error = %e, "transport failure");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
