use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;

/// Outcome of a settled refresh: a usable access token, or `None` when the
/// session could not be recovered and the stored credentials were cleared.
pub type RefreshOutcome = Option<String>;

struct LastRefresh {
    generation: u64,
    outcome: RefreshOutcome,
}

/// Cooperative single-flight coordinator for token refreshes.
///
/// A burst of concurrent 401s must produce exactly one call to the refresh
/// endpoint, with every member of the burst observing the same outcome. A
/// caller snapshots [`generation`](Self::generation) when it sees the 401 and
/// passes it to [`acquire`](Self::acquire): if a refresh settled after that
/// snapshot, the recorded outcome is shared; otherwise the caller performs
/// the refresh itself while holding the gate, and everyone queued behind it
/// adopts the result.
#[derive(Clone)]
pub struct RefreshGate {
    inner: Arc<Inner>,
}

struct Inner {
    generation: AtomicU64,
    last: Mutex<LastRefresh>,
}

impl RefreshGate {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                generation: AtomicU64::new(0),
                last: Mutex::new(LastRefresh { generation: 0, outcome: None }),
            }),
        }
    }

    /// Generation of the most recently settled refresh.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    /// Runs `refresh` unless a refresh already settled after `observed`, in
    /// which case its outcome is returned without another endpoint call.
    pub async fn acquire<F, Fut>(&self, observed: u64, refresh: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome>,
    {
        let mut last = self.inner.last.lock().await;
        if last.generation > observed {
            return last.outcome.clone();
        }

        let outcome = refresh().await;
        last.generation += 1;
        last.outcome = outcome.clone();
        self.inner.generation.store(last.generation, Ordering::Release);
        outcome
    }
}

impl Default for RefreshGate {
    fn default() -> Self {
        Self::new()
    }
}
