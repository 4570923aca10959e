//! Timed touch/key gestures
//!
//! - Double-tap: two activations inside a window confirm a guarded action
//! - Long-press: holding a control past a threshold triggers it
//!
//! Both are plain state machines over `tokio::time::Instant`. Pending timers
//! are owned deadlines, so replacing or clearing one is cancellation. Callers
//! drive expiry from their event loop with `expire_due(now)`.

mod double_tap;
mod long_press;

pub use double_tap::{DEFAULT_WINDOW, DoubleTap, GestureEvent, GestureMessages, TapState};
pub use long_press::{DEFAULT_HOLD, HoldEvent, LongPress};

/// A qualifying user interaction on a control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Pointer click or tap
    Click,
    Enter,
    Space,
    /// Touch released on the control
    TouchEnd,
}

impl Activation {
    /// Map a key name to an activation; only Enter and Space qualify
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Enter" => Some(Activation::Enter),
            " " | "Space" | "Spacebar" => Some(Activation::Space),
            _ => None,
        }
    }

    /// Keyboard activations get "press Enter" wording instead of "tap"
    pub fn is_key(&self) -> bool {
        matches!(self, Activation::Enter | Activation::Space)
    }
}
