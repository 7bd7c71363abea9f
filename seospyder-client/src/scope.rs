use crate::error::{ClientError, Result};
use std::future::Future;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::debug;

/// Lifetime scope for in-flight requests.
///
/// A view (or a CLI command) owns one scope; work run through it is dropped
/// as soon as the scope is cancelled, so a late reply never lands in state
/// that belongs to something else.
#[derive(Debug, Clone, Default)]
pub struct TaskScope {
    token: CancellationToken,
}

impl TaskScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the scope is cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Cancels the scope when the returned guard is dropped.
    pub fn guard(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }

    /// Run `fut` until it completes or the scope is cancelled.
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.token.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                debug!("Scope cancelled, dropping in-flight request");
                Err(ClientError::Cancelled)
            }
            result = fut => result,
        }
    }
}
