//! Feedback sink - the single channel through which components talk to the user
//!
//! Gestures and the session never print or speak directly. They hand a
//! [`Feedback`] to whatever sink they were constructed with: the terminal
//! status line in the binary, a [`MemorySink`] in tests.

use std::fmt;
use std::sync::Mutex;

/// What kind of event produced the feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    /// First activation of a guarded control
    FirstTap,
    /// Second activation arrived inside the window
    Confirmed,
    /// Window elapsed without a second activation
    TimedOut,
    /// Recognition started
    Listening,
    /// Echo of a recognized utterance
    Heard,
    /// A destination was resolved and navigated to
    Navigated,
    /// Utterance matched no command
    Unrecognized,
    /// General status message
    Info,
    /// Something the user must act on
    Error,
}

impl fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeedbackKind::FirstTap => "first-tap",
            FeedbackKind::Confirmed => "confirmed",
            FeedbackKind::TimedOut => "timed-out",
            FeedbackKind::Listening => "listening",
            FeedbackKind::Heard => "heard",
            FeedbackKind::Navigated => "navigated",
            FeedbackKind::Unrecognized => "unrecognized",
            FeedbackKind::Info => "info",
            FeedbackKind::Error => "error",
        };
        f.write_str(name)
    }
}

/// Live-region priority, mirrors how a screen reader would queue the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Politeness {
    #[default]
    Polite,
    /// Interrupts whatever is being read
    Assertive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
    pub politeness: Politeness,
}

impl Feedback {
    pub fn polite(kind: FeedbackKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            politeness: Politeness::Polite,
        }
    }

    pub fn assertive(kind: FeedbackKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            politeness: Politeness::Assertive,
        }
    }
}

/// Receives feedback from gestures and the session
pub trait FeedbackSink: Send + Sync {
    fn emit(&self, feedback: Feedback);
}

/// Collects feedback in memory, used by tests and by embedders that poll
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Feedback>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything emitted so far
    pub fn take(&self) -> Vec<Feedback> {
        std::mem::take(&mut *self.lock())
    }

    /// Kinds emitted so far, without draining
    pub fn kinds(&self) -> Vec<FeedbackKind> {
        self.lock().iter().map(|f| f.kind).collect()
    }

    /// Most recent message, without draining
    pub fn last_message(&self) -> Option<String> {
        self.lock().last().map(|f| f.message.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Feedback>> {
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl FeedbackSink for MemorySink {
    fn emit(&self, feedback: Feedback) {
        self.lock().push(feedback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_take_drains() {
        let sink = MemorySink::new();
        sink.emit(Feedback::polite(FeedbackKind::Info, "one"));
        sink.emit(Feedback::assertive(FeedbackKind::Error, "two"));

        assert_eq!(sink.kinds(), vec![FeedbackKind::Info, FeedbackKind::Error]);
        assert_eq!(sink.last_message().as_deref(), Some("two"));

        let events = sink.take();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].politeness, Politeness::Assertive);
        assert!(sink.take().is_empty());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(FeedbackKind::FirstTap.to_string(), "first-tap");
        assert_eq!(FeedbackKind::TimedOut.to_string(), "timed-out");
    }
}
