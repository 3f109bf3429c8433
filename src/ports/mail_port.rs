//! Outbound email port trait.

use crate::domain::error::FauxtickError;

/// Fire-and-forget email delivery. Content is rendered before it reaches
/// the port; implementations only transport it.
pub trait MailPort {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), FauxtickError>;
}
