//! Blocking call surface.
//!
//! # Design
//! Each transport owns a dedicated runtime. All transport I/O runs there,
//! for the async surface as well, so every pooled connection is driven by a
//! runtime that lives as long as the pool.
//!
//! Each `*_blocking` method shapes its request on the calling thread, then
//! runs the execute-and-decode step as a task on that runtime and parks the
//! caller until the task finishes. The caller's own scheduler, if any, is
//! never asked to drive the request. Calling a blocking method from inside
//! an async task still parks that task's worker thread, so prefer the async
//! methods from async code.

use std::future::Future;

use serde::Serialize;
use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;

use crate::connection::RestConnection;
use crate::error::{Diagnostics, RestError};
use crate::types::{Entity, PagedResult};

const THREAD_NAME: &str = "restful-blocking";

/// Runtime that drives transport I/O and blocking calls.
pub(crate) struct BlockingExecutor {
    runtime: Option<Runtime>,
}

impl BlockingExecutor {
    pub(crate) fn new(threads: usize) -> Result<Self, RestError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(threads.max(1))
            .thread_name(THREAD_NAME)
            .enable_all()
            .build()
            .map_err(|e| RestError::Config(format!("failed to start blocking runtime: {e}")))?;
        Ok(Self { runtime: Some(runtime) })
    }

    /// Start `future` on the dedicated runtime.
    pub(crate) fn spawn<F>(&self, future: F) -> Result<JoinHandle<F::Output>, RestError>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let runtime = self
            .runtime
            .as_ref()
            .ok_or_else(|| RestError::Executor("runtime is shut down".to_string()))?;
        Ok(runtime.spawn(future))
    }

    /// Run `future` to completion on the dedicated runtime.
    pub(crate) fn run<F>(&self, future: F) -> Result<F::Output, RestError>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let handle = self.spawn(future)?;
        futures::executor::block_on(handle).map_err(|e| RestError::Executor(e.to_string()))
    }
}

impl Drop for BlockingExecutor {
    fn drop(&mut self) {
        // shutdown_background is the only teardown allowed inside an async context
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl RestConnection {
    fn run_blocking<F, R>(&self, call: F) -> Result<R, Diagnostics>
    where
        F: Future<Output = Result<R, Diagnostics>> + Send + 'static,
        R: Send + 'static,
    {
        match self.transport().blocking().run(call) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "blocking call did not complete");
                Err(e.into())
            }
        }
    }

    /// Blocking form of [`RestConnection::get`].
    pub fn get_blocking<T: Entity>(&self, path: &str, id: Option<&str>) -> Result<T, Diagnostics> {
        let request = self.build_get(path, id);
        let connection = self.clone();
        self.run_blocking(async move { connection.fetch_entity::<T>(request).await })
    }

    /// Blocking form of [`RestConnection::list`].
    pub fn list_blocking<T: Entity>(
        &self,
        path: &str,
        page: Option<u32>,
        per_page: Option<u32>,
        query: Option<&str>,
    ) -> Result<PagedResult<T>, Diagnostics> {
        let request = self.build_list(path, page, per_page, query);
        let connection = self.clone();
        self.run_blocking(async move { connection.fetch_list::<T>(request).await })
    }

    /// Blocking form of [`RestConnection::query`].
    pub fn query_blocking<T: Entity, C: Serialize + ?Sized>(
        &self,
        path: &str,
        criteria: &C,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<PagedResult<T>, Diagnostics> {
        let request = self.build_query(path, criteria, page, per_page)?;
        let connection = self.clone();
        self.run_blocking(async move { connection.fetch_list::<T>(request).await })
    }

    /// Blocking form of [`RestConnection::post`].
    pub fn post_blocking<T: Entity, U: Serialize + ?Sized>(&self, path: &str, model: &U) -> Result<T, Diagnostics> {
        let request = self.build_post(path, model)?;
        let connection = self.clone();
        self.run_blocking(async move { connection.fetch_entity::<T>(request).await })
    }

    /// Blocking form of [`RestConnection::put`].
    pub fn put_blocking<T: Entity, U: Serialize + ?Sized>(
        &self,
        path: &str,
        id: &str,
        model: &U,
    ) -> Result<T, Diagnostics> {
        let request = self.build_put(path, id, model)?;
        let connection = self.clone();
        self.run_blocking(async move { connection.fetch_entity::<T>(request).await })
    }

    /// Blocking form of [`RestConnection::delete`].
    pub fn delete_blocking(&self, path: &str, id: &str) -> Result<(), Diagnostics> {
        let request = self.build_delete(path, id);
        let connection = self.clone();
        self.run_blocking(async move { connection.confirm_delete(request).await })
    }
}
