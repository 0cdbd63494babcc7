//! The HTTP transport shared by connections.
//!
//! # Design
//! One `TransportClient` owns one `reqwest::Client` (and therefore one
//! connection pool), one cookie jar, and one dedicated runtime that drives
//! every request sent through it, async or blocking. It is built explicitly and handed to
//! connections by `Arc`; `TransportClient::shared()` offers a process-wide
//! instance for callers that want every connection to share one session.
//! There is no teardown step. Cookie updates are last-write-wins inside the
//! jar; this layer adds no locking of its own.

use std::fmt;
use std::sync::{Arc, OnceLock};

use reqwest::cookie::Jar;
use serde::Deserialize;

use crate::blocking::BlockingExecutor;
use crate::error::RestError;

pub const DEFAULT_USER_AGENT: &str = "RESTfulFoundation.Client";

const USER_AGENT_ENV: &str = "RESTFUL_USER_AGENT";
const BLOCKING_THREADS_ENV: &str = "RESTFUL_BLOCKING_THREADS";

/// Transport settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Sent as `User-Agent` on every request.
    pub user_agent: String,
    /// Attach a persistent cookie jar.
    pub cookie_store: bool,
    /// Worker threads of the runtime that drives requests.
    pub blocking_threads: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cookie_store: true,
            blocking_threads: 2,
        }
    }
}

impl TransportConfig {
    /// Defaults overlaid with environment variables.
    ///
    /// - `RESTFUL_USER_AGENT`: replaces the user agent when non-empty.
    /// - `RESTFUL_BLOCKING_THREADS`: worker thread count, at least 1.
    pub fn from_env() -> Result<Self, RestError> {
        let mut config = Self::default();
        if let Ok(agent) = std::env::var(USER_AGENT_ENV) {
            if !agent.trim().is_empty() {
                config.user_agent = agent;
            }
        }
        if let Ok(threads) = std::env::var(BLOCKING_THREADS_ENV) {
            config.blocking_threads = threads
                .trim()
                .parse()
                .ok()
                .filter(|&count: &usize| count > 0)
                .ok_or_else(|| {
                    RestError::Config(format!("{BLOCKING_THREADS_ENV} must be a positive integer, got {threads:?}"))
                })?;
        }
        Ok(config)
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

static SHARED: OnceLock<Arc<TransportClient>> = OnceLock::new();

/// HTTP client, cookie jar, and blocking executor used by connections.
pub struct TransportClient {
    http: reqwest::Client,
    cookies: Option<Arc<Jar>>,
    user_agent: String,
    blocking: BlockingExecutor,
}

impl TransportClient {
    pub fn new() -> Result<Self, RestError> {
        Self::with_config(TransportConfig::default())
    }

    pub fn with_config(config: TransportConfig) -> Result<Self, RestError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());

        let cookies = if config.cookie_store {
            let jar = Arc::new(Jar::default());
            builder = builder.cookie_provider(Arc::clone(&jar));
            Some(jar)
        } else {
            None
        };

        let http = builder
            .build()
            .map_err(|e| RestError::Config(format!("failed to build HTTP client: {e}")))?;
        let blocking = BlockingExecutor::new(config.blocking_threads)?;

        tracing::debug!(
            user_agent = %config.user_agent,
            cookie_store = config.cookie_store,
            blocking_threads = config.blocking_threads.max(1),
            "transport initialised"
        );

        Ok(Self {
            http,
            cookies,
            user_agent: config.user_agent,
            blocking,
        })
    }

    /// The process-wide transport, built from `TransportConfig::from_env()`
    /// on first use and reused afterwards.
    pub fn shared() -> Result<Arc<Self>, RestError> {
        if let Some(transport) = SHARED.get() {
            return Ok(Arc::clone(transport));
        }
        let transport = Arc::new(Self::with_config(TransportConfig::from_env()?)?);
        Ok(Arc::clone(SHARED.get_or_init(|| transport)))
    }

    /// The cookie jar, if one is attached.
    pub fn cookies(&self) -> Option<&Arc<Jar>> {
        self.cookies.as_ref()
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn blocking(&self) -> &BlockingExecutor {
        &self.blocking
    }
}

impl fmt::Debug for TransportClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportClient")
            .field("user_agent", &self.user_agent)
            .field("cookie_store", &self.cookies.is_some())
            .finish_non_exhaustive()
    }
}
