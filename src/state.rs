//! Shared runtime state - current page, navigation history and session flags
//!
//! Flags are atomics so the quit action (a `Send` closure owned by the quit
//! gesture) can flip them without borrowing the session.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Navigation {
    current: String,
    history: Vec<String>,
}

pub struct RuntimeState {
    /// Quit was confirmed, the front end should shut down
    pub quit_requested: AtomicBool,
    /// Recognition is running
    pub listening: AtomicBool,
    nav: Mutex<Navigation>,
}

impl RuntimeState {
    pub fn new(start_page: &str) -> Arc<Self> {
        Arc::new(Self {
            quit_requested: AtomicBool::new(false),
            listening: AtomicBool::new(false),
            nav: Mutex::new(Navigation {
                current: start_page.to_string(),
                history: Vec::new(),
            }),
        })
    }

    fn nav(&self) -> MutexGuard<'_, Navigation> {
        self.nav.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn current_page(&self) -> String {
        self.nav().current.clone()
    }

    /// Move to `page`, pushing the current page onto history.
    /// Returns false when already there.
    pub fn navigate(&self, page: &str) -> bool {
        let mut nav = self.nav();
        if nav.current == page {
            return false;
        }
        let previous = std::mem::replace(&mut nav.current, page.to_string());
        nav.history.push(previous);
        true
    }

    pub fn history(&self) -> Vec<String> {
        self.nav().history.clone()
    }

    /// Forget visited pages, returns how many were dropped
    pub fn clear_history(&self) -> usize {
        let mut nav = self.nav();
        let count = nav.history.len();
        nav.history.clear();
        count
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    pub fn set_listening(&self, listening: bool) {
        self.listening.store(listening, Ordering::SeqCst);
    }

    pub fn request_quit(&self) {
        self.quit_requested.store(true, Ordering::SeqCst);
    }

    pub fn is_quit_requested(&self) -> bool {
        self.quit_requested.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for RuntimeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nav = self.nav();
        f.debug_struct("RuntimeState")
            .field("current", &nav.current)
            .field("history", &nav.history.len())
            .field("listening", &self.is_listening())
            .field("quit_requested", &self.is_quit_requested())
            .finish()
    }
}

/// Type alias for shared state
pub type SharedState = Arc<RuntimeState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_pushes_history() {
        let state = RuntimeState::new("home.html");
        assert!(state.navigate("call.html"));
        assert!(state.navigate("settings.html"));
        assert!(!state.navigate("settings.html"));

        assert_eq!(state.current_page(), "settings.html");
        assert_eq!(state.history(), vec!["home.html", "call.html"]);
    }

    #[test]
    fn test_clear_history() {
        let state = RuntimeState::new("home.html");
        state.navigate("call.html");
        assert_eq!(state.clear_history(), 1);
        assert!(state.history().is_empty());
        assert_eq!(state.current_page(), "call.html");
    }

    #[test]
    fn test_flags() {
        let state = RuntimeState::new("home.html");
        assert!(!state.is_listening());
        state.set_listening(true);
        assert!(state.is_listening());
        assert!(!state.is_quit_requested());
        state.request_quit();
        assert!(state.is_quit_requested());
    }
}
