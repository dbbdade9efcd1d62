//! The waitlist email form.

use std::sync::LazyLock;

use regex::Regex;

use crate::waitlist::WaitlistError;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";

/// Longest address the input accepts.
const MAX_EMAIL_LEN: usize = 254;

/// Check an address before it is sent anywhere.
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    let email = email.trim();
    if email.is_empty() {
        Err(EMAIL_REQUIRED)
    } else if !EMAIL_RE.is_match(email) {
        Err(EMAIL_INVALID)
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Submitted,
    Error(String),
}

/// Input text plus where the signup stands.
#[derive(Debug, Default)]
pub struct EmailForm {
    email: String,
    status: FormStatus,
}

impl EmailForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    /// Whether the input takes keystrokes right now.
    pub fn is_editable(&self) -> bool {
        matches!(self.status, FormStatus::Idle | FormStatus::Error(_))
    }

    pub fn push_char(&mut self, c: char) {
        if !self.is_editable() || c.is_control() || self.email.len() >= MAX_EMAIL_LEN {
            return;
        }
        self.email.push(c);
        self.clear_error();
    }

    pub fn backspace(&mut self) {
        if !self.is_editable() {
            return;
        }
        self.email.pop();
        self.clear_error();
    }

    fn clear_error(&mut self) {
        if matches!(self.status, FormStatus::Error(_)) {
            self.status = FormStatus::Idle;
        }
    }

    /// Validate and move to submitting. Returns the trimmed address to send,
    /// or `None` if the form is busy or the address was rejected.
    pub fn begin_submit(&mut self) -> Option<String> {
        if !self.is_editable() {
            return None;
        }
        match validate_email(&self.email) {
            Ok(()) => {
                self.status = FormStatus::Submitting;
                Some(self.email.trim().to_string())
            }
            Err(message) => {
                self.status = FormStatus::Error(message.to_string());
                None
            }
        }
    }

    /// Record the outcome of a submission.
    pub fn finish(&mut self, result: Result<(), WaitlistError>) {
        if self.status != FormStatus::Submitting {
            return;
        }
        match result {
            Ok(()) => {
                self.email.clear();
                self.status = FormStatus::Submitted;
            }
            Err(e) => self.status = FormStatus::Error(e.user_message().to_string()),
        }
    }

    /// Go back to an empty form after a successful signup.
    pub fn reset(&mut self) {
        if self.status == FormStatus::Submitted {
            self.status = FormStatus::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waitlist::NETWORK_ERROR;
    use pretty_assertions::assert_eq;

    fn typed(text: &str) -> EmailForm {
        let mut form = EmailForm::new();
        text.chars().for_each(|c| form.push_char(c));
        form
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(""), Err(EMAIL_REQUIRED));
        assert_eq!(validate_email("   "), Err(EMAIL_REQUIRED));
        assert_eq!(validate_email("magnus"), Err(EMAIL_INVALID));
        assert_eq!(validate_email("magnus@chess"), Err(EMAIL_INVALID));
        assert_eq!(validate_email("a b@chess.com"), Err(EMAIL_INVALID));
        assert_eq!(validate_email("magnus@chess.com"), Ok(()));
        assert_eq!(validate_email(" first.last+tag@mail.example.org "), Ok(()));
    }

    #[test]
    fn test_empty_submit_shows_required() {
        let mut form = EmailForm::new();
        assert_eq!(form.begin_submit(), None);
        assert_eq!(form.status(), &FormStatus::Error(EMAIL_REQUIRED.to_string()));
    }

    #[test]
    fn test_editing_clears_error() {
        let mut form = typed("bad");
        assert_eq!(form.begin_submit(), None);
        assert_eq!(form.status(), &FormStatus::Error(EMAIL_INVALID.to_string()));
        form.backspace();
        assert_eq!(form.status(), &FormStatus::Idle);
        assert_eq!(form.email(), "ba");
    }

    #[test]
    fn test_successful_submission() {
        let mut form = typed("player@example.com");
        assert_eq!(form.begin_submit(), Some("player@example.com".to_string()));
        assert_eq!(form.status(), &FormStatus::Submitting);

        // Input is locked while the request is in flight.
        form.push_char('x');
        assert_eq!(form.email(), "player@example.com");
        assert_eq!(form.begin_submit(), None);

        form.finish(Ok(()));
        assert_eq!(form.status(), &FormStatus::Submitted);
        assert_eq!(form.email(), "");

        form.reset();
        assert_eq!(form.status(), &FormStatus::Idle);
    }

    #[test]
    fn test_failed_submission_keeps_input() {
        let mut form = typed("player@example.com");
        form.begin_submit();
        form.finish(Err(WaitlistError::Transport("timed out".to_string())));
        assert_eq!(form.status(), &FormStatus::Error(NETWORK_ERROR.to_string()));
        assert_eq!(form.email(), "player@example.com");

        // Retry is allowed straight away.
        assert!(form.begin_submit().is_some());
    }

    #[test]
    fn test_stray_result_is_ignored() {
        let mut form = typed("player@example.com");
        form.finish(Ok(()));
        assert_eq!(form.status(), &FormStatus::Idle);
        assert_eq!(form.email(), "player@example.com");
    }
}
