//! The CRUD façade.
//!
//! # Design
//! `RestConnection` holds an immutable root path and an `Arc` to the
//! transport; cloning it is cheap and clones share the transport. Each
//! operation is split into a pure `build_*` step that produces an
//! `HttpRequest` and an async step that executes and decodes it. Every
//! failure comes back as `Diagnostics` describing only that call, so there is
//! no mutable per-connection state for concurrent calls to race on.
//!
//! The blocking counterparts live in `blocking.rs`.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::decode::{decode_entity, decode_list};
use crate::error::{Diagnostics, RestError};
use crate::executor::{execute, status_line};
use crate::http::{HttpMethod, HttpRequest};
use crate::transport::TransportClient;
use crate::types::PagedResult;
use crate::url::{build_url, page_query};

const QUERY_SEGMENT: &str = "query";

/// A typed client for one REST API root.
#[derive(Debug, Clone)]
pub struct RestConnection {
    root_path: Arc<str>,
    transport: Arc<TransportClient>,
}

impl RestConnection {
    /// Connect `root_path` through the process-wide shared transport.
    pub fn new(root_path: &str) -> Result<Self, RestError> {
        Ok(Self::with_transport(root_path, TransportClient::shared()?))
    }

    /// Connect `root_path` through an explicitly provided transport.
    pub fn with_transport(root_path: &str, transport: Arc<TransportClient>) -> Self {
        Self {
            root_path: Arc::from(root_path),
            transport,
        }
    }

    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    pub fn transport(&self) -> &Arc<TransportClient> {
        &self.transport
    }

    // -----------------------------------------------------------------------
    // Request construction
    // -----------------------------------------------------------------------

    pub fn build_get(&self, path: &str, id: Option<&str>) -> HttpRequest {
        let url = build_url(None, &[self.root_path(), path, id.unwrap_or("")]);
        HttpRequest::new(HttpMethod::Get, url)
    }

    pub fn build_list(
        &self,
        path: &str,
        page: Option<u32>,
        per_page: Option<u32>,
        query: Option<&str>,
    ) -> HttpRequest {
        let query = page_query(query, page, per_page);
        let url = build_url(query.as_deref(), &[self.root_path(), path]);
        HttpRequest::new(HttpMethod::Get, url)
    }

    /// POST to `<path>/query/` with `criteria` as the body.
    pub fn build_query<C: Serialize + ?Sized>(
        &self,
        path: &str,
        criteria: &C,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<HttpRequest, RestError> {
        let query = page_query(None, page, per_page);
        let url = build_url(query.as_deref(), &[self.root_path(), path, QUERY_SEGMENT]);
        Ok(HttpRequest::new(HttpMethod::Post, url).with_body(serialize_body(criteria)?))
    }

    pub fn build_post<U: Serialize + ?Sized>(&self, path: &str, model: &U) -> Result<HttpRequest, RestError> {
        let url = build_url(None, &[self.root_path(), path]);
        Ok(HttpRequest::new(HttpMethod::Post, url).with_body(serialize_body(model)?))
    }

    pub fn build_put<U: Serialize + ?Sized>(
        &self,
        path: &str,
        id: &str,
        model: &U,
    ) -> Result<HttpRequest, RestError> {
        let url = build_url(None, &[self.root_path(), path, id]);
        Ok(HttpRequest::new(HttpMethod::Put, url).with_body(serialize_body(model)?))
    }

    pub fn build_delete(&self, path: &str, id: &str) -> HttpRequest {
        let url = build_url(None, &[self.root_path(), path, id]);
        HttpRequest::new(HttpMethod::Delete, url)
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Fetch one entity from `<root>/<path>/[<id>/]`.
    ///
    /// A 404, any other error status, a transport fault, or an undecodable
    /// body all come back as `Err` with the reason in the diagnostics.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, id: Option<&str>) -> Result<T, Diagnostics> {
        let request = self.build_get(path, id);
        self.fetch_entity(request).await
    }

    /// Fetch a list, folding `page`/`perPage` into the query string when
    /// given. Accepts a bare array or a wrapped list in the response.
    ///
    /// Callers that want the empty-list fallback use
    /// `list(..).await.unwrap_or_default()`.
    pub async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        page: Option<u32>,
        per_page: Option<u32>,
        query: Option<&str>,
    ) -> Result<PagedResult<T>, Diagnostics> {
        let request = self.build_list(path, page, per_page, query);
        self.fetch_list(request).await
    }

    /// Server-side search: POST `criteria` to `<path>/query/` and decode a
    /// paged result. Matching rules belong to the server.
    pub async fn query<T: DeserializeOwned, C: Serialize + ?Sized>(
        &self,
        path: &str,
        criteria: &C,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<PagedResult<T>, Diagnostics> {
        let request = self.build_query(path, criteria, page, per_page)?;
        self.fetch_list(request).await
    }

    /// Create a record and decode the server's answer as `T`.
    pub async fn post<T: DeserializeOwned, U: Serialize + ?Sized>(
        &self,
        path: &str,
        model: &U,
    ) -> Result<T, Diagnostics> {
        let request = self.build_post(path, model)?;
        self.fetch_entity(request).await
    }

    /// Replace the record at `<path>/<id>/` and decode the answer as `T`.
    pub async fn put<T: DeserializeOwned, U: Serialize + ?Sized>(
        &self,
        path: &str,
        id: &str,
        model: &U,
    ) -> Result<T, Diagnostics> {
        let request = self.build_put(path, id, model)?;
        self.fetch_entity(request).await
    }

    /// Delete the record at `<path>/<id>/`.
    ///
    /// Only a literal `200 OK` counts as success. Other 2xx codes such as
    /// `204` or `202` are reported as failures with the status line as the
    /// diagnostic.
    pub async fn delete(&self, path: &str, id: &str) -> Result<(), Diagnostics> {
        let request = self.build_delete(path, id);
        self.confirm_delete(request).await
    }

    // -----------------------------------------------------------------------
    // Execution + decoding, shared by the async and blocking surfaces
    // -----------------------------------------------------------------------

    pub(crate) async fn fetch_entity<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T, Diagnostics> {
        let response = execute(&self.transport, &request).await?;
        decode_entity(response.bytes()).map_err(|e| {
            tracing::warn!(url = %request.url, error = %e, "entity decode failed");
            Diagnostics::from(e)
        })
    }

    pub(crate) async fn fetch_list<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
    ) -> Result<PagedResult<T>, Diagnostics> {
        let response = execute(&self.transport, &request).await?;
        decode_list(response.bytes()).map_err(|e| {
            tracing::warn!(url = %request.url, error = %e, "list decode failed");
            Diagnostics::from(e)
        })
    }

    pub(crate) async fn confirm_delete(&self, request: HttpRequest) -> Result<(), Diagnostics> {
        let response = execute(&self.transport, &request).await?;
        if response.status == 200 {
            return Ok(());
        }
        tracing::warn!(url = %request.url, status = response.status, "delete did not return 200");
        Err(RestError::HttpStatus {
            status: response.status,
            message: status_line(response.status),
        }
        .into())
    }
}

/// Serialize a request model. A model that serializes to JSON `null` counts
/// as no body at all.
fn serialize_body<U: Serialize + ?Sized>(model: &U) -> Result<Option<String>, RestError> {
    let body = serde_json::to_string(model).map_err(RestError::Serialization)?;
    Ok(if body == "null" { None } else { Some(body) })
}
