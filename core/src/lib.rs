//! Typed REST client for JSON CRUD APIs.
//!
//! # Overview
//! A `RestConnection` performs Get/List/Query/Post/Put/Delete against one API
//! root, through a `TransportClient` that carries the connection pool, the
//! cookie jar, and a fixed `User-Agent`. Every operation has an async form
//! and a `*_blocking` form.
//!
//! # Design
//! - URLs are assembled by `url::build_url`, a pure function.
//! - Requests are shaped as plain `HttpRequest` data (`build_*`), then sent by
//!   the executor, which returns the undecoded payload of a 2xx response.
//! - List payloads may be a bare array or an object wrapping `list`; the
//!   decoder branches on the first structural token.
//! - Failures never escape as panics. Each call returns
//!   `Result<_, Diagnostics>`, where `Diagnostics` is the ordered list of
//!   messages for that call alone.
//! - Requests run on a runtime owned by the transport, not on the caller's
//!   scheduler. Async calls await them there; blocking calls park on them.
//!
//! ```no_run
//! use restful_foundation::RestConnection;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! struct Player {
//!     player_id: i64,
//!     player_name: Option<String>,
//! }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let connection = RestConnection::new("http://localhost:3000")?;
//! match connection.get::<Player>("/api/players", Some("1")).await {
//!     Ok(player) => println!("{player:?}"),
//!     Err(diagnostics) => {
//!         for message in diagnostics.iter() {
//!             eprintln!("{message}");
//!         }
//!     }
//! }
//! let everyone = connection.list::<Player>("/api/players", None, None, None).await.unwrap_or_default();
//! println!("{} players", everyone.len());
//! # Ok(())
//! # }
//! ```

mod blocking;

pub mod connection;
pub mod decode;
pub mod error;
pub mod executor;
pub mod http;
pub mod transport;
pub mod types;
pub mod url;

pub use connection::RestConnection;
pub use error::{DecodeFailure, Diagnostics, FailureKind, RestError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{TransportClient, TransportConfig};
pub use types::{Entity, PagedResult};
pub use url::build_url;
