//! Access-token refresh
//!
//! When a request is rejected with 401 the dispatcher asks the
//! [`RefreshCoordinator`] for a new access token. Only one refresh runs at a
//! time: callers that hit a 401 while a refresh is in flight await the same
//! shared future, so the refresh endpoint is called once and the
//! [`AuthFailureHandler`] fires once per failed refresh. A 401 that arrives
//! after the refresh has settled is resolved by the dispatcher from the
//! token store without starting another one.

use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use mentiq_common::TokenStore;
use mentiq_domain::constants::TOKEN_REFRESH_ENDPOINT;
use parking_lot::Mutex;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::client::Transport;
use super::request::RequestDescriptor;

/// Callback invoked when the session can no longer be refreshed.
///
/// Injected once at client construction. Implemented for plain closures.
pub trait AuthFailureHandler: Send + Sync {
    fn on_auth_failure(&self);
}

impl<F> AuthFailureHandler for F
where
    F: Fn() + Send + Sync,
{
    fn on_auth_failure(&self) {
        self()
    }
}

/// Why a refresh attempt did not produce a new access token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("token refresh failed: {reason}")]
pub struct RefreshFailure {
    pub reason: String,
}

impl RefreshFailure {
    fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// New access token, or the reason the refresh failed
pub type RefreshOutcome = Result<String, RefreshFailure>;

type PendingRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Single-flight slot for the in-progress refresh
#[derive(Default)]
pub struct RefreshCoordinator {
    pending: Mutex<Option<PendingRefresh>>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Await the in-flight refresh, or start one with `start`.
    ///
    /// `start` is only called when no refresh is pending. The slot is
    /// released by whichever waiter observes completion first.
    pub async fn run<F, Fut>(&self, start: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome> + Send + 'static,
    {
        let refresh = {
            let mut slot = self.pending.lock();
            match slot.as_ref() {
                Some(existing) => {
                    debug!("joining in-flight token refresh");
                    existing.clone()
                }
                None => {
                    let fresh = start().boxed().shared();
                    *slot = Some(fresh.clone());
                    fresh
                }
            }
        };

        let outcome = refresh.clone().await;

        let mut slot = self.pending.lock();
        if slot.as_ref().is_some_and(|current| current.ptr_eq(&refresh)) {
            *slot = None;
        }
        outcome
    }

    pub fn is_pending(&self) -> bool {
        self.pending.lock().is_some()
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator").field("pending", &self.is_pending()).finish()
    }
}

/// Refresh the access token, clearing the session when that is impossible.
///
/// Runs inside the shared future so the failure side effects happen once.
pub(crate) async fn refresh_session(
    transport: Transport,
    tokens: Arc<TokenStore>,
    on_auth_failure: Option<Arc<dyn AuthFailureHandler>>,
) -> RefreshOutcome {
    match exchange_refresh_token(&transport, &tokens).await {
        Ok(access) => Ok(access),
        Err(failure) => {
            warn!(reason = %failure.reason, "token refresh failed, clearing session");
            if let Err(err) = tokens.clear().await {
                warn!(error = %err, "failed to clear stored tokens");
            }
            if let Some(handler) = on_auth_failure {
                handler.on_auth_failure();
            }
            Err(failure)
        }
    }
}

async fn exchange_refresh_token(transport: &Transport, tokens: &TokenStore) -> RefreshOutcome {
    let pair = tokens.get().await.ok_or_else(|| RefreshFailure::new("no stored tokens"))?;
    if pair.refresh.is_empty() {
        return Err(RefreshFailure::new("no refresh token"));
    }

    let request = RequestDescriptor::post(TOKEN_REFRESH_ENDPOINT)
        .json(json!({ "refresh": pair.refresh }))
        .skip_auth();

    let response = transport
        .dispatch(&request, None)
        .await
        .map_err(|err| RefreshFailure::new(format!("refresh request failed: {err}")))?;

    let access = response
        .data
        .get("access")
        .and_then(Value::as_str)
        .filter(|access| !access.is_empty())
        .ok_or_else(|| RefreshFailure::new("refresh response has no access token"))?
        .to_string();

    if response.data.get("refresh").is_some() {
        debug!("refresh response carries a refresh token; keeping the stored one");
    }

    tokens
        .set(pair.with_access(access.clone()))
        .await
        .map_err(|err| RefreshFailure::new(format!("failed to store refreshed token: {err}")))?;

    info!("access token refreshed");
    Ok(access)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn concurrent_callers_share_one_refresh() {
        let coordinator = Arc::new(RefreshCoordinator::new());
        let started = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let coordinator = coordinator.clone();
            let started = started.clone();
            handles.push(tokio::spawn(async move {
                coordinator
                    .run(move || async move {
                        started.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok("fresh".to_string())
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), Ok("fresh".to_string()));
        }
        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert!(!coordinator.is_pending());
    }

    #[tokio::test]
    async fn slot_is_released_after_completion() {
        let coordinator = RefreshCoordinator::new();

        let first = coordinator.run(|| async { Err(RefreshFailure::new("expired")) }).await;
        assert_eq!(first, Err(RefreshFailure::new("expired")));

        let second = coordinator.run(|| async { Ok("next".to_string()) }).await;
        assert_eq!(second, Ok("next".to_string()));
    }

    #[test]
    fn closures_are_handlers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let handler: Arc<dyn AuthFailureHandler> = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        handler.on_auth_failure();
        handler.on_auth_failure();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
