use async_trait::async_trait;
use aws_sdk_sesv2::error::DisplayErrorContext;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use aws_sdk_sesv2::Client;

use crate::core::error::{ReportError, ReportResult};

/// An HTML-only message with a single sender.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEmail {
    pub sender: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub html_body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the message, returning the provider's message id.
    async fn send(&self, email: &OutboundEmail) -> ReportResult<String>;
}

pub struct SesMailer {
    client: Client,
}

impl SesMailer {
    /// Build a client from the ambient credential chain for `region`. The
    /// sender must be a verified SES identity in that region.
    pub async fn new(region: &str) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;
        Self {
            client: Client::new(&sdk_config),
        }
    }
}

fn utf8_content(data: &str) -> ReportResult<Content> {
    Content::builder()
        .data(data)
        .charset("UTF-8")
        .build()
        .map_err(|e| ReportError::Email(e.to_string()))
}

#[async_trait]
impl Mailer for SesMailer {
    async fn send(&self, email: &OutboundEmail) -> ReportResult<String> {
        let message = Message::builder()
            .subject(utf8_content(&email.subject)?)
            .body(Body::builder().html(utf8_content(&email.html_body)?).build())
            .build();

        let output = self
            .client
            .send_email()
            .from_email_address(&email.sender)
            .destination(
                Destination::builder()
                    .set_to_addresses(Some(email.recipients.clone()))
                    .build(),
            )
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await
            .map_err(|e| ReportError::Email(DisplayErrorContext(&e).to_string()))?;

        Ok(output.message_id().unwrap_or_default().to_string())
    }
}
