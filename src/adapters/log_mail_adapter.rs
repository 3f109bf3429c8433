//! Logging mail adapter.
//!
//! Records outgoing messages instead of delivering them. Stands in until a
//! real delivery backend is wired behind the mail port.

use crate::domain::error::FauxtickError;
use crate::ports::mail_port::MailPort;

pub struct LogMailAdapter;

impl MailPort for LogMailAdapter {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), FauxtickError> {
        tracing::info!(to, subject, body_bytes = html_body.len(), "outgoing email");
        Ok(())
    }
}
