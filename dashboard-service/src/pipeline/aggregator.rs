use std::{sync::Arc, time::Instant};

use futures::StreamExt;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::pipeline::{CycleOutcome, View};
use crate::sinks::{DisplaySlot, PanelState};

/// What happened to one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub request_id: u64,
    /// False when a newer refresh was issued before this one finished.
    pub published: bool,
}

/// Drives fetch cycles of one view and publishes their results.
///
/// Idle → Fetching on [`refresh`](Self::refresh); Fetching → Ready or Failed
/// when the cycle finishes, unless a newer refresh superseded it.
pub struct SeriesAggregator<V: View> {
    view: V,
    slot: DisplaySlot<V::Key, V::Output>,
}

impl<V: View> SeriesAggregator<V> {
    pub fn new(view: V) -> Self {
        let slot = DisplaySlot::new(view.kind());
        Self { view, slot }
    }

    /// Run one fetch cycle for `key` to completion.
    pub async fn refresh(&self, key: V::Key) -> RefreshOutcome {
        let request_id = self.slot.begin(key.clone());
        let published = self.run_cycle(request_id, key).await;
        RefreshOutcome {
            request_id,
            published,
        }
    }

    /// Start a fetch cycle in the background; the request id is issued before
    /// this returns, so a later call always supersedes this one.
    pub fn spawn_refresh(self: &Arc<Self>, key: V::Key) -> u64 {
        let request_id = self.slot.begin(key.clone());
        let this = Arc::clone(self);
        tokio::spawn(async move {
            this.run_cycle(request_id, key).await;
        });
        request_id
    }

    async fn run_cycle(&self, request_id: u64, key: V::Key) -> bool {
        let kind = self.view.kind();
        tracing::debug!(panel = kind, request_id, key = ?key, "fetch cycle started");

        let started = Instant::now();
        let outcome = self.view.cycle(&key).await;
        metrics::histogram!("fetch_cycle_seconds").record(started.elapsed().as_secs_f64());

        match &outcome {
            CycleOutcome::Complete(_) => {
                tracing::info!(panel = kind, request_id, key = ?key, "fetch cycle ready");
            }
            CycleOutcome::Degraded { errors, .. } => {
                tracing::warn!(
                    panel = kind,
                    request_id,
                    key = ?key,
                    errors = errors.len(),
                    "fetch cycle degraded"
                );
            }
            CycleOutcome::Failed(error) => {
                tracing::warn!(panel = kind, request_id, key = ?key, error = %error, "fetch cycle failed");
            }
        }

        self.slot.complete(request_id, key, outcome)
    }

    pub fn current(&self) -> PanelState<V::Key, V::Output> {
        self.slot.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<PanelState<V::Key, V::Output>> {
        self.slot.subscribe()
    }

    /// Wait until the panel shows a finished cycle and return that state.
    pub async fn settled(&self) -> PanelState<V::Key, V::Output> {
        let mut states = WatchStream::new(self.slot.subscribe());
        while let Some(state) = states.next().await {
            if state.is_settled() {
                return state;
            }
        }
        // The slot owns the sender, so the stream only ends if the slot is gone.
        self.slot.current()
    }
}
