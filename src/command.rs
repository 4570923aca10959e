//! Command system - maps recognized speech and typed slash commands to actions
//!
//! Voice commands go through the [`Dispatcher`]: an ordered table of keyword
//! rules, first match wins. Slash commands are keyboard-only controls for the
//! terminal front end and never reach the dispatcher.

use serde::Deserialize;

use crate::recognition::normalize;

/// One keyword rule. Any keyword found as a substring selects `destination`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CommandRule {
    pub keywords: Vec<String>,
    pub destination: String,
}

impl CommandRule {
    pub fn new<K, S>(keywords: K, destination: impl Into<String>) -> Self
    where
        K: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            // An empty keyword would match every utterance
            keywords: keywords
                .into_iter()
                .map(|k| normalize(k.as_ref()))
                .filter(|k| !k.is_empty())
                .collect(),
            destination: destination.into(),
        }
    }

    /// First keyword contained in `text` (already normalized)
    fn matched_keyword(&self, text: &str) -> Option<&str> {
        self.keywords
            .iter()
            .map(String::as_str)
            .find(|keyword| text.contains(keyword))
    }
}

/// Outcome of dispatching one utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    Matched { destination: String, keyword: String },
    /// Not an error, the caller asks the user to repeat
    Unmatched,
}

impl DispatchResult {
    pub fn destination(&self) -> Option<&str> {
        match self {
            DispatchResult::Matched { destination, .. } => Some(destination),
            DispatchResult::Unmatched => None,
        }
    }
}

/// The home page voice menu, in priority order
pub fn default_rules() -> Vec<CommandRule> {
    vec![
        CommandRule::new(["navigate"], "navigation.html"),
        CommandRule::new(["assistant"], "assistant.html"),
        CommandRule::new(["call"], "call.html"),
        CommandRule::new(["settings"], "settings.html"),
        CommandRule::new(["detect"], "detect.html"),
        CommandRule::new(["translate"], "translate.html"),
    ]
}

/// Ordered keyword dispatcher
///
/// Matching is plain substring search on the normalized utterance, so
/// "recall" hits the "call" rule. Recognition output is noisy and the menu
/// has always been this tolerant.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    rules: Vec<CommandRule>,
}

impl Dispatcher {
    pub fn new(rules: Vec<CommandRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| CommandRule::new(rule.keywords, rule.destination))
            .collect();
        Self { rules }
    }

    pub fn dispatch(&self, utterance: &str) -> DispatchResult {
        let text = normalize(utterance);
        if text.is_empty() {
            return DispatchResult::Unmatched;
        }

        self.rules
            .iter()
            .find_map(|rule| {
                rule.matched_keyword(&text)
                    .map(|keyword| DispatchResult::Matched {
                        destination: rule.destination.clone(),
                        keyword: keyword.to_string(),
                    })
            })
            .unwrap_or(DispatchResult::Unmatched)
    }

    pub fn rules(&self) -> &[CommandRule] {
        &self.rules
    }

    /// Spoken list of valid commands, e.g. "navigate, call, or detect"
    pub fn options(&self) -> String {
        let words: Vec<&str> = self
            .rules
            .iter()
            .filter_map(|rule| rule.keywords.first().map(String::as_str))
            .collect();

        match words.as_slice() {
            [] => String::new(),
            [only] => only.to_string(),
            [first, second] => format!("{} or {}", first, second),
            [rest @ .., last] => format!("{}, or {}", rest.join(", "), last),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

/// Keyboard-only controls of the terminal session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    /// Tap the quit control
    Quit,
    /// Tap the decline control
    Decline,
    /// Press and hold the voice button
    Hold,
    Home,
    ClearHistory,
    Pages,
    Status,
    Help,
    /// Simulate a recognition engine error code
    RecognitionError(String),
    SignUp { passkey: String, confirm: String },
    SignIn { passkey: String },
    Unknown(String),
}

/// Parse a slash command, `None` when the input is not one
pub fn parse_slash_command(input: &str) -> Option<SlashCommand> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    let command = match name.to_lowercase().as_str() {
        "quit" | "exit" => SlashCommand::Quit,
        "decline" => SlashCommand::Decline,
        "hold" | "listen" => SlashCommand::Hold,
        "home" | "back" => SlashCommand::Home,
        "clear" => SlashCommand::ClearHistory,
        "pages" => SlashCommand::Pages,
        "status" => SlashCommand::Status,
        "help" | "commands" => SlashCommand::Help,
        "error" => SlashCommand::RecognitionError(args.to_string()),
        "signup" => {
            let (passkey, confirm) = args.split_once('|').unwrap_or((args, ""));
            SlashCommand::SignUp {
                passkey: passkey.trim().to_string(),
                confirm: confirm.trim().to_string(),
            }
        }
        "signin" => SlashCommand::SignIn {
            passkey: args.to_string(),
        },
        other => SlashCommand::Unknown(other.to_string()),
    };
    Some(command)
}

pub const HELP: &str = "\
Commands:
  <empty line> - Press Enter on the quit control (twice quickly to quit)
  /quit - Tap the quit control
  /decline - Tap the decline control (twice quickly to decline)
  /hold - Press and hold the voice button (next input releases it)
  /home - Back to home page
  /clear - Clear app history
  /pages - List voice commands and their pages
  /status - Show current page and history
  /error <code> - Simulate a recognition error (not-allowed, network, no-speech)
  /signup <four words> | <four words> - Register a passkey
  /signin <four words> - Sign in with the registered passkey
  /help - Show this help

Anything else is treated as recognized speech, e.g. 'open the assistant'.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_substring_match() {
        let dispatcher = Dispatcher::default();

        let result = dispatcher.dispatch("please navigate to the store");
        assert_eq!(
            result,
            DispatchResult::Matched {
                destination: "navigation.html".to_string(),
                keyword: "navigate".to_string(),
            }
        );
        assert_eq!(
            dispatcher.dispatch("open the assistant").destination(),
            Some("assistant.html")
        );
    }

    #[test]
    fn test_unmatched() {
        let dispatcher = Dispatcher::default();
        assert_eq!(dispatcher.dispatch("xyz nonsense"), DispatchResult::Unmatched);
        assert_eq!(dispatcher.dispatch("   "), DispatchResult::Unmatched);
        assert_eq!(dispatcher.dispatch(""), DispatchResult::Unmatched);
    }

    #[test]
    fn test_case_and_whitespace_normalized() {
        let dispatcher = Dispatcher::default();
        assert_eq!(
            dispatcher.dispatch("  Open SETTINGS please \n").destination(),
            Some("settings.html")
        );
    }

    #[test]
    fn test_rule_order_breaks_ties() {
        let dispatcher = Dispatcher::default();
        // "settings" appears first in the sentence, but "call" is ranked higher
        assert_eq!(
            dispatcher.dispatch("settings for call volume").destination(),
            Some("call.html")
        );
        assert_eq!(
            dispatcher.dispatch("translate then navigate").destination(),
            Some("navigation.html")
        );

        let reversed = Dispatcher::new(vec![
            CommandRule::new(["settings"], "settings.html"),
            CommandRule::new(["call"], "call.html"),
        ]);
        assert_eq!(
            reversed.dispatch("settings for call volume").destination(),
            Some("settings.html")
        );
    }

    #[test]
    fn test_substring_inside_longer_word() {
        let dispatcher = Dispatcher::default();
        assert_eq!(dispatcher.dispatch("recall that").destination(), Some("call.html"));
    }

    #[test]
    fn test_rule_with_several_keywords() {
        let dispatcher = Dispatcher::new(vec![CommandRule::new(
            ["Directions", "map"],
            "navigation.html",
        )]);
        let result = dispatcher.dispatch("show me the map");
        assert_eq!(
            result,
            DispatchResult::Matched {
                destination: "navigation.html".to_string(),
                keyword: "map".to_string(),
            }
        );
        assert!(dispatcher.dispatch("directions home").destination().is_some());
    }

    #[test]
    fn test_blank_keywords_dropped() {
        let rule = CommandRule::new(["", "  ", "Phone"], "call.html");
        assert_eq!(rule.keywords, vec!["phone"]);

        let dispatcher = Dispatcher::new(vec![CommandRule::new([""], "x.html")]);
        assert_eq!(dispatcher.dispatch("xyz nonsense"), DispatchResult::Unmatched);
        assert_eq!(dispatcher.options(), "");
    }

    #[test]
    fn test_options_listing() {
        assert_eq!(
            Dispatcher::default().options(),
            "navigate, assistant, call, settings, detect, or translate"
        );
        let two = Dispatcher::new(vec![
            CommandRule::new(["call"], "call.html"),
            CommandRule::new(["detect"], "detect.html"),
        ]);
        assert_eq!(two.options(), "call or detect");
        assert_eq!(Dispatcher::new(Vec::new()).options(), "");
    }

    #[test]
    fn test_slash_commands() {
        assert_eq!(parse_slash_command("/quit"), Some(SlashCommand::Quit));
        assert_eq!(parse_slash_command("/Decline"), Some(SlashCommand::Decline));
        assert_eq!(parse_slash_command("  /HOME "), Some(SlashCommand::Home));
        assert_eq!(
            parse_slash_command("/error network"),
            Some(SlashCommand::RecognitionError("network".to_string()))
        );
        assert_eq!(
            parse_slash_command("/signup a b c d | a b c d"),
            Some(SlashCommand::SignUp {
                passkey: "a b c d".to_string(),
                confirm: "a b c d".to_string(),
            })
        );
        assert_eq!(
            parse_slash_command("/signin one two three four"),
            Some(SlashCommand::SignIn {
                passkey: "one two three four".to_string()
            })
        );
        assert_eq!(
            parse_slash_command("/bogus"),
            Some(SlashCommand::Unknown("bogus".to_string()))
        );
        assert_eq!(parse_slash_command("open settings"), None);
    }
}
