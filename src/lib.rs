//! Voice and gesture interaction core for an accessible, voice-driven app
//!
//! - [`gesture`]: double-tap confirmation and long-press state machines
//! - [`command`]: ordered keyword dispatcher from utterances to pages
//! - [`session`]: the caller layer tying both to navigation and feedback
//! - [`repl`]: terminal front end loop

pub mod command;
pub mod config;
pub mod feedback;
pub mod gesture;
pub mod passkey;
pub mod recognition;
pub mod repl;
pub mod session;
pub mod state;
pub mod ui;
