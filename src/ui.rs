use std::io::Write;

use crate::feedback::{Feedback, FeedbackKind, FeedbackSink, Politeness};

/// Status line on stdout, stands in for the screen reader / speech output
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl FeedbackSink for ConsoleSink {
    fn emit(&self, feedback: Feedback) {
        let (icon, color) = style(&feedback);
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "\r\x1b[K{}{} {}\x1b[0m", color, icon, feedback.message);
        out.flush().ok();
    }
}

fn style(feedback: &Feedback) -> (&'static str, &'static str) {
    if feedback.politeness == Politeness::Assertive {
        return ("!", "\x1b[31m");
    }
    match feedback.kind {
        FeedbackKind::FirstTap => ("◎", "\x1b[33m"),
        FeedbackKind::Confirmed => ("✓", "\x1b[32m"),
        FeedbackKind::TimedOut => ("◌", "\x1b[90m"),
        FeedbackKind::Listening => ("🎤", "\x1b[35m"),
        FeedbackKind::Heard => (">", "\x1b[0m"),
        FeedbackKind::Navigated => ("→", "\x1b[36m"),
        FeedbackKind::Unrecognized => ("?", "\x1b[33m"),
        FeedbackKind::Info => ("·", "\x1b[90m"),
        FeedbackKind::Error => ("!", "\x1b[31m"),
    }
}

pub fn banner(page: &str) {
    println!("\x1b[1mtapvoice\x1b[0m - on {}", page);
    println!("\x1b[90mType a voice command, /help for controls, Enter twice to quit.\x1b[0m\n");
    std::io::stdout().flush().ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assertive_overrides_kind_style() {
        let polite = Feedback::polite(FeedbackKind::Navigated, "Navigating to call.html");
        let loud = Feedback::assertive(FeedbackKind::Navigated, "Navigating to call.html");
        assert_eq!(style(&polite).0, "→");
        assert_eq!(style(&loud).0, "!");
    }
}
