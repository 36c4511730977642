//! Email delivery via Amazon SES.

use aws_sdk_ses::types::{Body, Content, Destination, Message};
use aws_sdk_ses::Client as SesClient;

use crate::error::{Error, Result};

/// An outbound plain-text email.
#[derive(Debug)]
pub struct OutboundEmail<'a> {
    pub to: &'a str,
    pub subject: &'a str,
    pub body: &'a str,
    pub cc: Option<&'a str>,
    pub reply_to: Option<&'a str>,
}

/// Sends plain-text email from the configured sender address.
pub struct Mailer {
    client: SesClient,
    sender: String,
}

impl Mailer {
    pub fn new(client: SesClient, sender: impl Into<String>) -> Self {
        Self {
            client,
            sender: sender.into(),
        }
    }

    /// Send one email; returns the SES message id.
    pub async fn send(&self, email: &OutboundEmail<'_>) -> Result<String> {
        let subject = Content::builder()
            .data(email.subject)
            .charset("UTF-8")
            .build()
            .map_err(|e| Error::Aws(format!("Failed to build subject: {}", e)))?;

        let text = Content::builder()
            .data(email.body)
            .charset("UTF-8")
            .build()
            .map_err(|e| Error::Aws(format!("Failed to build body: {}", e)))?;

        let message = Message::builder()
            .subject(subject)
            .body(Body::builder().text(text).build())
            .build();

        let mut destination = Destination::builder().to_addresses(email.to);
        if let Some(cc) = email.cc {
            destination = destination.cc_addresses(cc);
        }

        let mut request = self
            .client
            .send_email()
            .source(&self.sender)
            .destination(destination.build())
            .message(message);
        if let Some(reply_to) = email.reply_to {
            request = request.reply_to_addresses(reply_to);
        }

        let result = request
            .send()
            .await
            .map_err(|e| Error::Aws(format!("Failed to send email: {}", e)))?;

        Ok(result.message_id().to_string())
    }
}
