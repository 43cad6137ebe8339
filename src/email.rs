//! Email addresses and the outgoing mail seam used by the weekly report job.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The error returned when a string is not a plausible email address.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0} is not a valid email address")]
pub struct EmailAddressError(pub String);

/// A validated email address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Create and validate an email address.
    ///
    /// # Errors
    ///
    /// This function will return an error if `raw_email` is not a valid email address.
    pub fn new(raw_email: &str) -> Result<Self, EmailAddressError> {
        // TODO: Use proper regex/email validation.
        if raw_email.contains('@') && !raw_email.is_empty() {
            Ok(Self(raw_email.to_string()))
        } else {
            Err(EmailAddressError(raw_email.to_string()))
        }
    }

    /// Create a new `Email` without any validation.
    ///
    /// The caller should ensure that `raw_email` is a correctly formatted email address,
    /// e.g. one read back from the user table. For emails coming from the user this
    /// function should **not** be used, instead use the checked version.
    pub fn new_unchecked(raw_email: String) -> Self {
        Self(raw_email)
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sends report summary emails.
///
/// The application does not ship an SMTP client. This trait is the seam where
/// one would plug in, and [LogMailer] is the default implementation that
/// writes the email to the application log instead of a socket.
pub trait Mailer: Send + Sync + 'static {
    /// Send `subject` and `body` to `recipient`.
    ///
    /// # Errors
    ///
    /// Returns [crate::Error::EmailSendError] if the message could not be handed off.
    fn send(&self, recipient: &Email, subject: &str, body: &str) -> Result<(), crate::Error>;
}

/// A [Mailer] that logs messages instead of sending them.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, recipient: &Email, subject: &str, body: &str) -> Result<(), crate::Error> {
        tracing::info!("email to {recipient}: {subject}\n{body}");

        Ok(())
    }
}


#[cfg(test)]
mod log_mailer_tests {
    use super::{Email, LogMailer, Mailer};

    #[test]
    fn send_always_succeeds() {
        let mailer = LogMailer;

        let result = mailer.send(&Email::new_unchecked("foo@bar.baz".to_owned()), "hi", "body");

        assert!(result.is_ok());
    }
}
