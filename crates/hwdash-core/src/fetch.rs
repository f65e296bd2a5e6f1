// ── Fetch-state container ──
//
// Holds the `{data, error, is_validating}` state of one backend read and
// republishes it through a `watch` channel. Stale data survives both a
// revalidation in progress and a failed one.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CoreError;

type LoadFuture<T> = Pin<Box<dyn Future<Output = Result<T, CoreError>> + Send>>;
type Loader<T> = Arc<dyn Fn() -> LoadFuture<T> + Send + Sync>;

/// Snapshot of one fetch.
#[derive(Debug)]
pub struct FetchState<T> {
    pub data: Option<Arc<T>>,
    /// Last load error, cleared by the next successful load.
    pub error: Option<Arc<CoreError>>,
    pub is_validating: bool,
}

impl<T> Clone for FetchState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            error: self.error.clone(),
            is_validating: self.is_validating,
        }
    }
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_validating: false,
        }
    }
}

impl<T> FetchState<T> {
    /// `true` once any load succeeded.
    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }
}

/// Cheaply cloneable handle to a revalidatable backend read.
pub struct FetchHandle<T> {
    inner: Arc<FetchInner<T>>,
}

struct FetchInner<T> {
    name: &'static str,
    loader: Loader<T>,
    state: watch::Sender<FetchState<T>>,
    /// Ticket of the most recently started load; older loads never write.
    latest: AtomicU64,
}

impl<T> Clone for FetchHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send + Sync + 'static> FetchHandle<T> {
    /// Wrap `loader`. Nothing is fetched until the first
    /// [`revalidate`](Self::revalidate) or [`mutate`](Self::mutate).
    pub fn new<F, Fut>(name: &'static str, loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        let (state, _) = watch::channel(FetchState::default());
        Self {
            inner: Arc::new(FetchInner {
                name,
                loader: Arc::new(move || -> LoadFuture<T> { Box::pin(loader()) }),
                state,
                latest: AtomicU64::new(0),
            }),
        }
    }

    pub fn state(&self) -> FetchState<T> {
        self.inner.state.borrow().clone()
    }

    pub fn data(&self) -> Option<Arc<T>> {
        self.inner.state.borrow().data.clone()
    }

    pub fn error(&self) -> Option<Arc<CoreError>> {
        self.inner.state.borrow().error.clone()
    }

    pub fn is_validating(&self) -> bool {
        self.inner.state.borrow().is_validating
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.inner.state.subscribe()
    }

    /// Run the loader now and return the resulting state.
    ///
    /// When loads overlap, only the most recently started one is applied.
    pub async fn revalidate(&self) -> FetchState<T> {
        let ticket = self.inner.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.state.send_modify(|s| s.is_validating = true);
        debug!(fetch = self.inner.name, ticket, "revalidating");

        let result = (self.inner.loader)().await;

        if self.inner.latest.load(Ordering::SeqCst) != ticket {
            debug!(fetch = self.inner.name, ticket, "superseded load discarded");
            return self.state();
        }

        self.inner.state.send_modify(|s| {
            s.is_validating = false;
            match result {
                Ok(data) => {
                    s.data = Some(Arc::new(data));
                    s.error = None;
                }
                Err(e) => {
                    warn!(fetch = self.inner.name, error = %e, "load failed");
                    s.error = Some(Arc::new(e));
                }
            }
        });
        self.state()
    }

    /// Revalidate in the background. Without a tokio runtime this only logs.
    pub fn mutate(&self) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(fetch = self.inner.name, "no async runtime, mutate ignored");
            return;
        };
        let this = self.clone();
        runtime.spawn(async move {
            this.revalidate().await;
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn counting() -> (FetchHandle<usize>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handle = FetchHandle::new("counter", move || {
            let counter = Arc::clone(&counter);
            async move { Ok(counter.fetch_add(1, Ordering::SeqCst) + 1) }
        });
        (handle, calls)
    }

    #[tokio::test]
    async fn starts_empty_and_loads_on_revalidate() {
        let (handle, calls) = counting();
        assert!(!handle.state().is_loaded());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let state = handle.revalidate().await;
        assert_eq!(*state.data.unwrap(), 1);
        assert!(!state.is_validating);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn error_keeps_stale_data() {
        let fail = Arc::new(AtomicUsize::new(0));
        let flag = Arc::clone(&fail);
        let handle = FetchHandle::new("flaky", move || {
            let flag = Arc::clone(&flag);
            async move {
                if flag.load(Ordering::SeqCst) > 0 {
                    Err(CoreError::Internal("backend down".into()))
                } else {
                    Ok("groups")
                }
            }
        });

        handle.revalidate().await;
        fail.store(1, Ordering::SeqCst);
        let state = handle.revalidate().await;

        assert_eq!(*state.data.unwrap(), "groups");
        assert!(matches!(state.error.as_deref(), Some(CoreError::Internal(_))));

        fail.store(0, Ordering::SeqCst);
        assert!(handle.revalidate().await.error.is_none());
    }

    #[tokio::test]
    async fn mutate_revalidates_in_background() {
        let (handle, _) = counting();
        let mut rx = handle.subscribe();

        handle.mutate();
        rx.wait_for(|s| s.data.is_some() && !s.is_validating)
            .await
            .unwrap();
        assert_eq!(*handle.data().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_loads_apply_only_the_latest() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handle = FetchHandle::new("slow-then-fast", move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                // First load is slow, second is fast.
                let delay = if n == 0 { 500 } else { 10 };
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok(n)
            }
        });

        let slow = handle.clone();
        let first = tokio::spawn(async move { slow.revalidate().await });
        tokio::task::yield_now().await;
        let second = handle.revalidate().await;
        assert_eq!(*second.data.unwrap(), 1);

        first.await.unwrap();
        assert_eq!(*handle.data().unwrap(), 1);
        assert!(!handle.is_validating());
    }
}
