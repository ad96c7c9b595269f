use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::core::gather::FlatForm;

/// Receives flattened form data once the submit delay has elapsed.
pub trait SubmissionSink {
    fn submit(&mut self, data: &FlatForm);
}

/// Logs the submitted payload.
#[derive(Debug, Default)]
pub struct LogSink;

impl SubmissionSink for LogSink {
    fn submit(&mut self, data: &FlatForm) {
        match serde_json::to_string(data) {
            Ok(payload) => info!(%payload, "form submitted"),
            Err(err) => warn!(error = %err, "failed to encode submitted form"),
        }
    }
}

/// Busy flag of the simulated submit.
///
/// The delay is fixed once started; it is neither cancelled nor retried.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Submission {
    #[default]
    Idle,
    Busy {
        ready_at: Instant,
        payload: FlatForm,
    },
}

impl Submission {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }

    /// Returns false if a submit is already in flight.
    pub fn start(&mut self, payload: FlatForm, now: Instant, delay: Duration) -> bool {
        if self.is_busy() {
            return false;
        }
        *self = Self::Busy {
            ready_at: now + delay,
            payload,
        };
        true
    }

    /// Hands back the payload once `now` reaches the deadline.
    pub fn poll(&mut self, now: Instant) -> Option<FlatForm> {
        let ready = matches!(self, Self::Busy { ready_at, .. } if now >= *ready_at);
        if !ready {
            return None;
        }
        match std::mem::take(self) {
            Self::Busy { payload, .. } => Some(payload),
            Self::Idle => None,
        }
    }
}
