use async_trait::async_trait;

use super::{MailError, Mailer, OutgoingMail};

/// Writes messages to the log instead of sending them. Development only.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        tracing::info!(
            from = %mail.from,
            to = ?mail.to,
            subject = %mail.subject,
            body = %mail.body,
            "Mail (console transport)"
        );
        Ok(())
    }
}
