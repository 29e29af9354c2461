use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use time::OffsetDateTime;
use tokio::sync::watch;

use crate::pipeline::{CycleOutcome, PipelineError};

/// What a dashboard panel currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PanelState<K, V> {
    Idle,
    Fetching {
        request_id: u64,
        key: K,
    },
    Ready {
        request_id: u64,
        key: K,
        value: V,
        #[serde(with = "time::serde::rfc3339")]
        updated_at: OffsetDateTime,
    },
    /// The cycle hit an error. `value` holds whatever could still be shown
    /// (fallback or partially unavailable data).
    Failed {
        request_id: u64,
        key: K,
        value: Option<V>,
        errors: Vec<String>,
        #[serde(with = "time::serde::rfc3339")]
        updated_at: OffsetDateTime,
    },
}

impl<K, V> PanelState<K, V> {
    pub fn value(&self) -> Option<&V> {
        match self {
            Self::Ready { value, .. } => Some(value),
            Self::Failed { value, .. } => value.as_ref(),
            Self::Idle | Self::Fetching { .. } => None,
        }
    }

    pub fn key(&self) -> Option<&K> {
        match self {
            Self::Idle => None,
            Self::Fetching { key, .. } | Self::Ready { key, .. } | Self::Failed { key, .. } => {
                Some(key)
            }
        }
    }

    pub fn request_id(&self) -> Option<u64> {
        match self {
            Self::Idle => None,
            Self::Fetching { request_id, .. }
            | Self::Ready { request_id, .. }
            | Self::Failed { request_id, .. } => Some(*request_id),
        }
    }

    /// True once the cycle has finished, successfully or not.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready { .. } | Self::Failed { .. })
    }
}

/// Publication point of one panel.
///
/// Request ids are issued and checked while holding the channel's write lock,
/// so a result is published only if no newer request was issued since it
/// started.
pub struct DisplaySlot<K, V> {
    kind: &'static str,
    latest_request: AtomicU64,
    tx: watch::Sender<PanelState<K, V>>,
}

impl<K, V> DisplaySlot<K, V>
where
    K: Clone + std::fmt::Debug,
    V: Clone,
{
    pub fn new(kind: &'static str) -> Self {
        let (tx, _rx) = watch::channel(PanelState::Idle);
        Self {
            kind,
            latest_request: AtomicU64::new(0),
            tx,
        }
    }

    /// Issue a request id for `key` and show the panel as fetching.
    pub fn begin(&self, key: K) -> u64 {
        let mut issued = 0;
        self.tx.send_modify(|state| {
            issued = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
            *state = PanelState::Fetching {
                request_id: issued,
                key,
            };
        });
        issued
    }

    /// Publish the outcome of request `request_id`; returns false when a newer
    /// request superseded it and the outcome was discarded.
    pub fn complete(&self, request_id: u64, key: K, outcome: CycleOutcome<V>) -> bool {
        self.tx.send_if_modified(|state| {
            let latest = self.latest_request.load(Ordering::SeqCst);
            if latest != request_id {
                tracing::debug!(
                    panel = self.kind,
                    request_id,
                    latest,
                    key = ?key,
                    "discarding stale fetch result"
                );
                metrics::counter!("stale_responses_discarded_total").increment(1);
                return false;
            }

            let updated_at = OffsetDateTime::now_utc();
            *state = match outcome {
                CycleOutcome::Complete(value) => PanelState::Ready {
                    request_id,
                    key,
                    value,
                    updated_at,
                },
                CycleOutcome::Degraded { value, errors } => PanelState::Failed {
                    request_id,
                    key,
                    value: Some(value),
                    errors: error_strings(&errors),
                    updated_at,
                },
                CycleOutcome::Failed(error) => PanelState::Failed {
                    request_id,
                    key,
                    value: None,
                    errors: error_strings(std::slice::from_ref(&error)),
                    updated_at,
                },
            };
            true
        })
    }

    pub fn current(&self) -> PanelState<K, V> {
        self.tx.borrow().clone()
    }

    /// Receiver that wakes on every published change.
    pub fn subscribe(&self) -> watch::Receiver<PanelState<K, V>> {
        self.tx.subscribe()
    }
}

fn error_strings(errors: &[PipelineError]) -> Vec<String> {
    errors.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_request_wins_regardless_of_completion_order() {
        let slot: DisplaySlot<&str, u32> = DisplaySlot::new("test");
        let a = slot.begin("A");
        let b = slot.begin("B");

        assert!(slot.complete(b, "B", CycleOutcome::Complete(2)));
        assert!(!slot.complete(a, "A", CycleOutcome::Complete(1)));

        let state = slot.current();
        assert_eq!(state.key(), Some(&"B"));
        assert_eq!(state.value(), Some(&2));
    }

    #[test]
    fn stale_result_does_not_replace_fetching_state() {
        let slot: DisplaySlot<&str, u32> = DisplaySlot::new("test");
        let a = slot.begin("A");
        let _b = slot.begin("B");

        assert!(!slot.complete(a, "A", CycleOutcome::Complete(1)));
        assert!(matches!(slot.current(), PanelState::Fetching { key: "B", .. }));
    }

    #[test]
    fn degraded_outcome_is_failed_with_value() {
        let slot: DisplaySlot<&str, u32> = DisplaySlot::new("test");
        let id = slot.begin("A");
        slot.complete(
            id,
            "A",
            CycleOutcome::Degraded {
                value: 7,
                errors: vec![PipelineError::NetworkFailure("down".to_string())],
            },
        );

        match slot.current() {
            PanelState::Failed { value, errors, .. } => {
                assert_eq!(value, Some(7));
                assert_eq!(errors, vec!["network failure: down".to_string()]);
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[test]
    fn failed_outcome_clears_previous_value() {
        let slot: DisplaySlot<&str, u32> = DisplaySlot::new("test");
        let a = slot.begin("A");
        slot.complete(a, "A", CycleOutcome::Complete(1));
        let b = slot.begin("B");
        slot.complete(
            b,
            "B",
            CycleOutcome::Failed(PipelineError::MalformedPayload("x".to_string())),
        );

        let state = slot.current();
        assert!(state.is_settled());
        assert_eq!(state.key(), Some(&"B"));
        assert_eq!(state.value(), None);
    }

    #[test]
    fn panel_state_serializes_with_state_tag() {
        let state: PanelState<String, u32> = PanelState::Fetching {
            request_id: 3,
            key: "Balti".to_string(),
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["state"], "fetching");
        assert_eq!(json["request_id"], 3);
    }
}
