//! Press-and-hold detection for the voice button

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

/// Default hold before the press counts
pub const DEFAULT_HOLD: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldEvent {
    /// Released before the threshold, nothing happens
    Cancelled,
    /// Held long enough
    Triggered,
}

/// Long-press state machine
///
/// `press` arms a trigger deadline, `release` before the deadline disarms it.
/// Once triggered the press is spent; releasing afterwards is a no-op.
#[derive(Debug)]
pub struct LongPress {
    hold: Duration,
    deadline: Option<Instant>,
}

impl LongPress {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            deadline: None,
        }
    }

    /// Control pressed (mousedown / touchstart)
    pub fn press(&mut self, now: Instant) {
        self.deadline = now.checked_add(self.hold);
    }

    /// Control released or pointer left it
    pub fn release(&mut self) -> Option<HoldEvent> {
        self.deadline.take().map(|_| {
            debug!("press released before hold threshold");
            HoldEvent::Cancelled
        })
    }

    /// Report the trigger once the hold threshold has passed
    pub fn expire_due(&mut self, now: Instant) -> Option<HoldEvent> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                Some(HoldEvent::Triggered)
            }
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pressed(&self) -> bool {
        self.deadline.is_some()
    }
}

impl Default for LongPress {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hold_triggers_once() {
        let mut press = LongPress::default();
        let t0 = Instant::now();

        press.press(t0);
        assert_eq!(press.expire_due(t0 + Duration::from_millis(299)), None);
        assert_eq!(
            press.expire_due(t0 + Duration::from_millis(300)),
            Some(HoldEvent::Triggered)
        );
        assert_eq!(press.expire_due(t0 + Duration::from_millis(400)), None);
        // Release after trigger does nothing
        assert_eq!(press.release(), None);
    }

    #[test]
    fn test_early_release_cancels() {
        let mut press = LongPress::default();
        let t0 = Instant::now();

        press.press(t0);
        assert!(press.is_pressed());
        assert_eq!(press.release(), Some(HoldEvent::Cancelled));
        assert_eq!(press.expire_due(t0 + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_repress_replaces_deadline() {
        let mut press = LongPress::new(Duration::from_millis(500));
        let t0 = Instant::now();

        press.press(t0);
        press.press(t0 + Duration::from_millis(200));
        assert_eq!(press.expire_due(t0 + Duration::from_millis(500)), None);
        assert_eq!(
            press.expire_due(t0 + Duration::from_millis(700)),
            Some(HoldEvent::Triggered)
        );
    }
}
