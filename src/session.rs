//! Session - the caller side of the gestures and the dispatcher
//!
//! Owns the quit and decline controls, the voice button, the voice menu and
//! navigation state for one interactive run. Everything the user sees or hears goes
//! through the injected feedback sink.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::command::{DispatchResult, Dispatcher, HELP, SlashCommand, parse_slash_command};
use crate::config::Config;
use crate::feedback::{Feedback, FeedbackKind, FeedbackSink};
use crate::gesture::{Activation, DoubleTap, GestureEvent, HoldEvent, LongPress};
use crate::passkey::{Passkey, PasskeyFlow, progress_message};
use crate::recognition::{RecognitionError, normalize};
use crate::state::{RuntimeState, SharedState};

pub const IDLE_STATUS: &str = "Hold and speak to select choice";
const LISTENING_PROMPT: &str = "Listening, please say your destination";
const NOT_HEARD: &str = "Sorry, I couldn't hear you. Try again.";
const DECLINED: &str = "Action declined successfully";

/// Time between a confirmed decline and its completion
pub const DECLINE_SETTLE: Duration = Duration::from_millis(800);

pub struct Session {
    home_page: String,
    auto_stop: Duration,
    state: SharedState,
    sink: Arc<dyn FeedbackSink>,
    dispatcher: Dispatcher,
    quit: DoubleTap,
    decline: DoubleTap,
    /// Set while a confirmed decline is completing; activations are ignored
    declining_until: Option<Instant>,
    voice_button: LongPress,
    /// Auto-stop for a running recognition
    listen_deadline: Option<Instant>,
    registered: Option<Passkey>,
}

impl Session {
    pub fn new(config: &Config, sink: Arc<dyn FeedbackSink>) -> Self {
        let state = RuntimeState::new(&config.home_page);

        let quit_state = Arc::clone(&state);
        let quit = DoubleTap::new(
            config.gesture.double_tap_window(),
            config.gesture.quit_messages(),
            Arc::clone(&sink),
            move || quit_state.request_quit(),
        );
        let decline = DoubleTap::new(
            config.gesture.double_tap_window(),
            config.gesture.decline_messages(),
            Arc::clone(&sink),
            || debug!("decline confirmed"),
        );

        Self {
            home_page: config.home_page.clone(),
            auto_stop: config.listening.auto_stop(),
            state,
            sink,
            dispatcher: Dispatcher::new(config.commands.rules.clone()),
            quit,
            decline,
            declining_until: None,
            voice_button: LongPress::new(config.gesture.long_press()),
            listen_deadline: None,
            registered: None,
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn should_exit(&self) -> bool {
        self.state.is_quit_requested()
    }

    /// Route one line of terminal input
    pub fn handle_line(&mut self, line: &str, now: Instant) {
        // Typing anything lets go of a held voice button
        self.release_voice_button();

        let line = line.trim();
        if line.is_empty() {
            self.activate_quit(Activation::Enter, now);
            return;
        }
        match parse_slash_command(line) {
            Some(command) => self.run_slash(command, now),
            None => self.hear(line),
        }
    }

    // ========================================================================
    // Quit control
    // ========================================================================

    pub fn activate_quit(&mut self, via: Activation, now: Instant) {
        // The quit action is one-shot; later taps must not re-run it
        if self.state.is_quit_requested() {
            debug!("quit already confirmed, ignoring activation");
            return;
        }
        if self.quit.activate(via, now) == GestureEvent::Confirmed {
            self.stop_listening();
            self.voice_button.release();
            self.say(FeedbackKind::Info, "Application closed. Goodbye!");
        }
    }

    /// Hide the quit control: drop any half-finished double tap
    pub fn cancel_quit(&mut self) {
        self.quit.reset();
    }

    // ========================================================================
    // Decline control
    // ========================================================================

    pub fn activate_decline(&mut self, via: Activation, now: Instant) {
        if self.declining_until.is_some() {
            debug!("decline in progress, ignoring activation");
            return;
        }
        if self.decline.activate(via, now) == GestureEvent::Confirmed {
            self.declining_until = Some(now.checked_add(DECLINE_SETTLE).unwrap_or(now));
        }
    }

    /// Hide the decline control: drop any half-finished double tap
    pub fn cancel_decline(&mut self) {
        self.decline.reset();
    }

    pub fn is_declining(&self) -> bool {
        self.declining_until.is_some()
    }

    // ========================================================================
    // Voice button and recognition lifecycle
    // ========================================================================

    pub fn press_voice_button(&mut self, now: Instant) {
        self.voice_button.press(now);
    }

    pub fn release_voice_button(&mut self) {
        if self.voice_button.release() == Some(HoldEvent::Cancelled) {
            debug!("voice button released early");
        }
    }

    pub fn start_listening(&mut self, now: Instant) {
        if self.state.is_listening() {
            debug!("already listening");
            return;
        }
        self.state.set_listening(true);
        self.listen_deadline = now.checked_add(self.auto_stop);
        if self.listen_deadline.is_none() {
            warn!(auto_stop = ?self.auto_stop, "auto-stop out of range, listening until a result");
        }
        self.say(FeedbackKind::Listening, LISTENING_PROMPT);
    }

    fn stop_listening(&mut self) {
        self.state.set_listening(false);
        self.listen_deadline = None;
    }

    /// A recognition result arrived
    pub fn hear(&mut self, utterance: &str) {
        self.stop_listening();

        let utterance = utterance.trim();
        if normalize(utterance).is_empty() {
            self.say(FeedbackKind::Error, NOT_HEARD);
            return;
        }
        self.say(FeedbackKind::Heard, format!("You said: {}", utterance));

        match self.dispatcher.dispatch(utterance) {
            DispatchResult::Matched {
                destination,
                keyword,
            } => {
                debug!(%keyword, %destination, "voice command matched");
                self.navigate(&destination);
            }
            DispatchResult::Unmatched => {
                debug!("voice command not recognized");
                let message = format!(
                    "Command not recognized. Try saying {}",
                    self.dispatcher.options()
                );
                self.say(FeedbackKind::Unrecognized, message);
            }
        }
    }

    pub fn recognition_failed(&mut self, error: RecognitionError) {
        warn!(%error, "speech recognition error");
        self.stop_listening();
        self.sink
            .emit(Feedback::assertive(FeedbackKind::Error, error.spoken()));
    }

    // ========================================================================
    // Timers
    // ========================================================================

    /// Earliest pending deadline across gestures and listening
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.quit.deadline(),
            self.decline.deadline(),
            self.declining_until,
            self.voice_button.deadline(),
            self.listen_deadline,
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Deliver every deadline that is due at `now`
    pub fn expire_due(&mut self, now: Instant) {
        self.quit.expire_due(now);
        self.decline.expire_due(now);

        if self.declining_until.is_some_and(|deadline| now >= deadline) {
            self.declining_until = None;
            info!("decline completed");
            self.say(FeedbackKind::Info, DECLINED);
        }

        if self.voice_button.expire_due(now) == Some(HoldEvent::Triggered) {
            self.start_listening(now);
        }

        if self.listen_deadline.is_some_and(|deadline| now >= deadline) {
            debug!("listening auto-stopped");
            self.stop_listening();
            self.say(FeedbackKind::Info, IDLE_STATUS);
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn navigate(&mut self, destination: &str) {
        if self.state.navigate(destination) {
            info!(%destination, "navigating");
            self.say(FeedbackKind::Navigated, format!("Navigating to {}", destination));
        } else {
            self.say(FeedbackKind::Info, format!("Already on {}", destination));
        }
    }

    pub fn go_home(&mut self) {
        let home = self.home_page.clone();
        self.navigate(&home);
    }

    // ========================================================================
    // Passkeys
    // ========================================================================

    pub fn sign_up(&mut self, passkey: &str, confirm: &str) {
        if let Some(progress) = progress_message(passkey, PasskeyFlow::SignUp) {
            self.say(FeedbackKind::Info, progress);
        }
        match Passkey::confirm(passkey, confirm) {
            Ok(passkey) => {
                self.registered = Some(passkey);
                self.say(FeedbackKind::Info, "Passkey created. Welcome!");
            }
            Err(e) => self.sink.emit(Feedback::assertive(FeedbackKind::Error, e.to_string())),
        }
    }

    pub fn sign_in(&mut self, passkey: &str) {
        if let Some(progress) = progress_message(passkey, PasskeyFlow::SignIn) {
            self.say(FeedbackKind::Info, progress);
        }
        if let Err(e) = Passkey::parse(passkey) {
            self.sink
                .emit(Feedback::assertive(FeedbackKind::Error, e.to_string()));
            return;
        }

        self.say(FeedbackKind::Info, "Signing in... Please wait");
        let accepted = self
            .registered
            .as_ref()
            .is_some_and(|registered| registered.matches(passkey));
        if accepted {
            self.say(FeedbackKind::Info, "Sign in successful! Redirecting...");
            self.go_home();
        } else {
            self.sink.emit(Feedback::assertive(
                FeedbackKind::Error,
                "Invalid passkey. Please try again",
            ));
        }
    }

    // ========================================================================
    // Slash commands
    // ========================================================================

    fn run_slash(&mut self, command: SlashCommand, now: Instant) {
        match command {
            SlashCommand::Quit => self.activate_quit(Activation::Click, now),
            SlashCommand::Decline => self.activate_decline(Activation::Click, now),
            SlashCommand::Hold => self.press_voice_button(now),
            SlashCommand::Home => self.go_home(),
            SlashCommand::ClearHistory => {
                let dropped = self.state.clear_history();
                debug!(dropped, "history cleared");
                self.say(FeedbackKind::Info, "App history cleared");
            }
            SlashCommand::Pages => {
                let table = self
                    .dispatcher
                    .rules()
                    .iter()
                    .map(|rule| format!("  {} -> {}", rule.keywords.join(" / "), rule.destination))
                    .collect::<Vec<_>>()
                    .join("\n");
                self.say(FeedbackKind::Info, format!("Voice commands:\n{}", table));
            }
            SlashCommand::Status => {
                let status = format!(
                    "Page: {}, History: {} pages, Listening: {}",
                    self.state.current_page(),
                    self.state.history().len(),
                    if self.state.is_listening() { "yes" } else { "no" },
                );
                self.say(FeedbackKind::Info, status);
            }
            SlashCommand::Help => self.say(FeedbackKind::Info, HELP),
            SlashCommand::RecognitionError(code) => {
                let error = code
                    .parse::<RecognitionError>()
                    .unwrap_or_else(|never| match never {});
                self.recognition_failed(error);
            }
            SlashCommand::SignUp { passkey, confirm } => self.sign_up(&passkey, &confirm),
            SlashCommand::SignIn { passkey } => self.sign_in(&passkey),
            SlashCommand::Unknown(name) => self.say(
                FeedbackKind::Info,
                format!("Unknown command: /{}. Type /help for commands.", name),
            ),
        }
    }

    fn say(&self, kind: FeedbackKind, message: impl Into<String>) {
        self.sink.emit(Feedback::polite(kind, message));
    }
}
