//! Four-word passkeys for the signup and signin pages

use std::fmt;

use thiserror::Error;

pub const PASSKEY_WORDS: usize = 4;

/// Validation failures. `Display` is the sentence spoken to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasskeyError {
    #[error("Please enter your passkey")]
    Empty,
    #[error("Please fill in both passkey fields")]
    MissingField,
    #[error("Passkey must be exactly 4 words")]
    WordCount { found: usize },
    #[error("Passkeys do not match")]
    Mismatch,
}

/// Which page the passkey is typed on, changes progress feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasskeyFlow {
    SignUp,
    SignIn,
}

/// A validated passkey, words separated by single spaces
#[derive(Clone, PartialEq, Eq)]
pub struct Passkey(String);

impl Passkey {
    /// Validate a signin entry
    pub fn parse(input: &str) -> Result<Self, PasskeyError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(PasskeyError::Empty);
        }
        Self::from_words(input)
    }

    /// Validate a signup entry and its confirmation
    pub fn confirm(first: &str, second: &str) -> Result<Self, PasskeyError> {
        let (first, second) = (first.trim(), second.trim());
        if first.is_empty() || second.is_empty() {
            return Err(PasskeyError::MissingField);
        }
        let passkey = Self::from_words(first)?;
        if first != second {
            return Err(PasskeyError::Mismatch);
        }
        Ok(passkey)
    }

    fn from_words(input: &str) -> Result<Self, PasskeyError> {
        let words: Vec<&str> = input.split_whitespace().collect();
        if words.len() != PASSKEY_WORDS {
            return Err(PasskeyError::WordCount { found: words.len() });
        }
        Ok(Self(words.join(" ")))
    }

    /// Whether the entered words are this passkey
    pub fn matches(&self, input: &str) -> bool {
        input.split_whitespace().eq(self.0.split(' '))
    }
}

// Never print the words themselves
impl fmt::Debug for Passkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passkey(****)")
    }
}

pub fn word_count(input: &str) -> usize {
    input.split_whitespace().count()
}

/// Spoken progress while the passkey is typed, if any
pub fn progress_message(input: &str, flow: PasskeyFlow) -> Option<&'static str> {
    match (flow, word_count(input)) {
        (PasskeyFlow::SignIn, 1) => Some("One word entered"),
        (PasskeyFlow::SignIn, 2) => Some("Two words entered"),
        (PasskeyFlow::SignIn, 3) => Some("Three words entered"),
        (PasskeyFlow::SignIn, 4) => Some("Four words entered. Ready to sign in"),
        (PasskeyFlow::SignUp, 4) => Some("Four words entered. Good passkey length"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signin_validation() {
        assert_eq!(Passkey::parse("  "), Err(PasskeyError::Empty));
        assert_eq!(
            Passkey::parse("correct horse battery"),
            Err(PasskeyError::WordCount { found: 3 })
        );
        assert!(Passkey::parse(" correct  horse battery staple ").is_ok());
    }

    #[test]
    fn test_signup_validation() {
        assert_eq!(
            Passkey::confirm("a b c d", ""),
            Err(PasskeyError::MissingField)
        );
        assert_eq!(
            Passkey::confirm("a b c", "a b c"),
            Err(PasskeyError::WordCount { found: 3 })
        );
        assert_eq!(
            Passkey::confirm("a b c d", "a b c e"),
            Err(PasskeyError::Mismatch)
        );
        assert!(Passkey::confirm(" a b c d", "a b c d ").is_ok());
    }

    #[test]
    fn test_error_messages_are_spoken_text() {
        assert_eq!(
            PasskeyError::WordCount { found: 2 }.to_string(),
            "Passkey must be exactly 4 words"
        );
        assert_eq!(PasskeyError::Mismatch.to_string(), "Passkeys do not match");
    }

    #[test]
    fn test_matches_ignores_spacing() {
        let passkey = Passkey::parse("correct horse battery staple").unwrap();
        assert!(passkey.matches("correct   horse battery\tstaple"));
        assert!(!passkey.matches("correct horse battery"));
        assert!(!passkey.matches("Correct horse battery staple"));
    }

    #[test]
    fn test_debug_hides_words() {
        let passkey = Passkey::parse("correct horse battery staple").unwrap();
        assert_eq!(format!("{:?}", passkey), "Passkey(****)");
    }

    #[test]
    fn test_progress_messages() {
        assert_eq!(progress_message("one", PasskeyFlow::SignIn), Some("One word entered"));
        assert_eq!(
            progress_message("a b c d", PasskeyFlow::SignIn),
            Some("Four words entered. Ready to sign in")
        );
        assert_eq!(progress_message("a b c", PasskeyFlow::SignUp), None);
        assert_eq!(
            progress_message("a b c d", PasskeyFlow::SignUp),
            Some("Four words entered. Good passkey length")
        );
        assert_eq!(progress_message("a b c d e", PasskeyFlow::SignIn), None);
    }
}
