//! Speech recognition collaborator contract
//!
//! The engine itself is external. This module owns what the app does with
//! its output: utterance normalization and the user-facing wording of engine
//! errors.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Trim and lower-case a recognized utterance
pub fn normalize(utterance: &str) -> String {
    utterance.trim().to_lowercase()
}

/// Error codes reported by the recognition engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    /// Microphone permission refused
    NotAllowed,
    /// Cloud recognition service unreachable
    Network,
    NoSpeech,
    Aborted,
    Other(String),
}

impl RecognitionError {
    /// Full sentence to speak
    pub fn spoken(&self) -> &'static str {
        match self {
            RecognitionError::NotAllowed => {
                "Microphone access denied. Please allow it in your browser settings."
            }
            RecognitionError::Network => {
                "Network error. Please check your internet connection and try again."
            }
            RecognitionError::NoSpeech | RecognitionError::Aborted => {
                "I couldn't hear you. Try again."
            }
            RecognitionError::Other(_) => "An error occurred. Try again.",
        }
    }
}

impl FromStr for RecognitionError {
    type Err = Infallible;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Ok(match code.trim() {
            "not-allowed" | "service-not-allowed" => RecognitionError::NotAllowed,
            "network" => RecognitionError::Network,
            "no-speech" => RecognitionError::NoSpeech,
            "aborted" => RecognitionError::Aborted,
            other => RecognitionError::Other(other.to_string()),
        })
    }
}

impl fmt::Display for RecognitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecognitionError::NotAllowed => write!(f, "not-allowed"),
            RecognitionError::Network => write!(f, "network"),
            RecognitionError::NoSpeech => write!(f, "no-speech"),
            RecognitionError::Aborted => write!(f, "aborted"),
            RecognitionError::Other(code) => write!(f, "{}", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Open The ASSISTANT \n"), "open the assistant");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_error_codes() {
        let parse = |code: &str| code.parse::<RecognitionError>().unwrap();
        assert_eq!(parse("not-allowed"), RecognitionError::NotAllowed);
        assert_eq!(parse("network"), RecognitionError::Network);
        assert_eq!(parse(" no-speech"), RecognitionError::NoSpeech);
        assert_eq!(
            parse("audio-capture"),
            RecognitionError::Other("audio-capture".to_string())
        );
    }

    #[test]
    fn test_error_wording() {
        assert_eq!(
            RecognitionError::NotAllowed.spoken(),
            "Microphone access denied. Please allow it in your browser settings."
        );
        assert_eq!(
            RecognitionError::Aborted.spoken(),
            RecognitionError::NoSpeech.spoken()
        );
        assert_eq!(
            RecognitionError::Other("x".into()).spoken(),
            "An error occurred. Try again."
        );
        assert_eq!(RecognitionError::Network.to_string(), "network");
    }
}
