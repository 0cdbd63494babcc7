//! Sends an `HttpRequest` over the shared transport.
//!
//! The executor classifies the outcome by status code and hands back the raw
//! payload; it never parses JSON. HTTP error statuses are ordinary `Err`
//! values carrying the response text, not panics or transport faults.

use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, StatusCode};

use crate::error::RestError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::TransportClient;

/// Execute `request` and return the payload of a 2xx response.
///
/// PUT and POST without a body fail before any I/O. The exchange itself runs
/// on the transport's own runtime, so pooled connections are always driven
/// by a runtime that stays alive, whichever surface opened them.
pub async fn execute(transport: &TransportClient, request: &HttpRequest) -> Result<HttpResponse, RestError> {
    let body = request.body.as_deref().filter(|body| !body.is_empty());
    if request.method.requires_body() && body.is_none() {
        tracing::warn!(method = %request.method, url = %request.url, "refusing to send request without body");
        return Err(RestError::MissingBody);
    }

    let mut builder = transport.http().request(request.method.as_reqwest(), &request.url);
    if let Some(body) = body {
        builder = builder
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_owned());
    }

    let handle = transport.blocking().spawn(dispatch(builder, request.method, request.url.clone()))?;
    handle.await.map_err(|e| RestError::Executor(e.to_string()))?
}

async fn dispatch(builder: RequestBuilder, method: HttpMethod, url: String) -> Result<HttpResponse, RestError> {
    tracing::debug!(%method, %url, "dispatching request");
    let response = builder.send().await.map_err(|e| {
        tracing::warn!(%method, %url, error = %e, "transport fault");
        RestError::from(e)
    })?;

    let status = response.status();
    tracing::debug!(%method, %url, status = status.as_u16(), "response received");

    if status.is_success() {
        let body = response.bytes().await?;
        return Ok(HttpResponse {
            status: status.as_u16(),
            body,
        });
    }

    let text = response.text().await.unwrap_or_default();
    let message = if text.trim().is_empty() {
        status_line(status.as_u16())
    } else {
        text
    };
    tracing::warn!(%method, %url, status = status.as_u16(), "request failed");
    Err(RestError::HttpStatus {
        status: status.as_u16(),
        message,
    })
}

/// `"204 No Content"` style text for a status code.
pub(crate) fn status_line(status: u16) -> String {
    match StatusCode::from_u16(status).ok().and_then(|s| s.canonical_reason()) {
        Some(reason) => format!("{status} {reason}"),
        None => status.to_string(),
    }
}
