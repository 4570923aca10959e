//! Double-tap confirmation - gates a destructive action behind a second tap

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use super::Activation;
use crate::feedback::{Feedback, FeedbackKind, FeedbackSink};

/// Default window between the two activations
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapState {
    Idle,
    /// One tap seen, waiting for the second
    AwaitingConfirm { first_tap: Instant, via: Activation },
}

/// What a single `activate` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    FirstTap,
    Confirmed,
}

/// Spoken/status wording for one guarded control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureMessages {
    pub first_tap: String,
    pub first_key: String,
    pub timed_out: String,
    pub timed_out_key: String,
    pub confirmed: String,
}

impl GestureMessages {
    /// "Tap again to confirm <action>" wording with the shared time-out lines
    pub fn confirming(action: &str, confirmed: impl Into<String>) -> Self {
        Self {
            first_tap: format!("Tap again to confirm {}", action),
            first_key: format!("Press Enter again to confirm {}", action),
            timed_out: "Tap timed out. Please try again".into(),
            timed_out_key: "Action timed out. Please try again".into(),
            confirmed: confirmed.into(),
        }
    }

    pub fn quit() -> Self {
        Self::confirming("quit", "Quitting application...")
    }

    pub fn decline() -> Self {
        Self::confirming("decline", "Declining... Action confirmed")
    }
}

impl Default for GestureMessages {
    fn default() -> Self {
        Self::quit()
    }
}

/// Double-tap state machine for one control
///
/// `Idle --activate--> AwaitingConfirm --activate within window--> Idle + action`,
/// and `AwaitingConfirm --deadline--> Idle`. The second tap must arrive strictly
/// before `first_tap + window`; a tap exactly on the boundary starts a new cycle.
///
/// The guarded action runs synchronously inside `activate`. If it kicks off
/// asynchronous work, guarding against a second confirmation while that work
/// is in flight is up to the caller.
pub struct DoubleTap {
    window: Duration,
    messages: GestureMessages,
    state: TapState,
    /// Pending reset. Replacing or clearing it cancels the old one.
    deadline: Option<Instant>,
    sink: Arc<dyn FeedbackSink>,
    action: Box<dyn FnMut() + Send>,
}

impl DoubleTap {
    pub fn new(
        window: Duration,
        messages: GestureMessages,
        sink: Arc<dyn FeedbackSink>,
        action: impl FnMut() + Send + 'static,
    ) -> Self {
        Self {
            window,
            messages,
            state: TapState::Idle,
            deadline: None,
            sink,
            action: Box::new(action),
        }
    }

    /// Handle one qualifying activation at `now`
    pub fn activate(&mut self, via: Activation, now: Instant) -> GestureEvent {
        // Cancel before anything else so no stale reset survives this tap
        self.deadline = None;

        if let TapState::AwaitingConfirm { first_tap, .. } = self.state {
            let elapsed = now.saturating_duration_since(first_tap);
            if elapsed < self.window {
                self.state = TapState::Idle;
                debug!(elapsed_ms = elapsed.as_millis() as u64, "double tap confirmed");
                self.emit(FeedbackKind::Confirmed, self.messages.confirmed.clone());
                (self.action)();
                return GestureEvent::Confirmed;
            }
            debug!(
                elapsed_ms = elapsed.as_millis() as u64,
                "stale first tap, starting over"
            );
        }

        self.state = TapState::AwaitingConfirm { first_tap: now, via };
        // An unrepresentable deadline leaves the tap waiting until reset
        self.deadline = now.checked_add(self.window);
        let message = if via.is_key() {
            self.messages.first_key.clone()
        } else {
            self.messages.first_tap.clone()
        };
        self.emit(FeedbackKind::FirstTap, message);
        GestureEvent::FirstTap
    }

    /// Deliver the pending reset if it is due. Returns true when it fired.
    pub fn expire_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                let via = match self.state {
                    TapState::AwaitingConfirm { via, .. } => via,
                    TapState::Idle => Activation::Click,
                };
                self.deadline = None;
                self.state = TapState::Idle;
                debug!("double tap window elapsed");
                let message = if via.is_key() {
                    self.messages.timed_out_key.clone()
                } else {
                    self.messages.timed_out.clone()
                };
                self.emit(FeedbackKind::TimedOut, message);
                true
            }
            _ => false,
        }
    }

    /// Cancel silently, e.g. when the control is hidden or disabled
    pub fn reset(&mut self) {
        self.deadline = None;
        self.state = TapState::Idle;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn state(&self) -> TapState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == TapState::Idle
    }

    fn emit(&self, kind: FeedbackKind, message: String) {
        self.sink.emit(Feedback::polite(kind, message));
    }
}

impl fmt::Debug for DoubleTap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoubleTap")
            .field("window", &self.window)
            .field("state", &self.state)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}
