use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info, warn};

use super::{DeliveryReceipt, ReportDelivery};
use crate::config::{DeliveryMode, SmtpSettings};
use crate::error::{DeliveryError, NOT_CONFIGURED};
use crate::reporting::{render_html, RoiReport, REPORT_SUBJECT};

pub const EMAIL_SENT_MESSAGE: &str = "Email sent successfully";
const SEND_FAILED: &str = "Failed to send email";

/// Sends the rendered report as an HTML email through an SMTP relay.
#[derive(Debug, Clone)]
pub struct SmtpDelivery {
    settings: SmtpSettings,
}

impl SmtpDelivery {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    fn build_message(&self, from: &str, report: &RoiReport) -> Result<Message, DeliveryError> {
        let to: Mailbox = report.recipient().parse().map_err(|err| {
            warn!(to = %report.recipient(), ?err, "rejecting unparseable recipient");
            DeliveryError::Validation("Invalid email address".to_string())
        })?;
        let from: Mailbox = from.parse().map_err(|err| {
            error!(from = %from, ?err, "EMAIL_USER is not a valid mailbox");
            DeliveryError::Configuration(NOT_CONFIGURED.to_string())
        })?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(REPORT_SUBJECT)
            .header(ContentType::TEXT_HTML)
            .body(render_html(report))
            .map_err(|err| {
                error!(?err, "failed to assemble report email");
                DeliveryError::Delivery(SEND_FAILED.to_string())
            })
    }
}

#[async_trait]
impl ReportDelivery for SmtpDelivery {
    fn mode(&self) -> DeliveryMode {
        DeliveryMode::Smtp
    }

    async fn deliver(&self, report: &RoiReport) -> Result<DeliveryReceipt, DeliveryError> {
        let Some((user, password)) = self.settings.credentials() else {
            warn!("email configuration not set up properly");
            return Err(DeliveryError::Configuration(NOT_CONFIGURED.to_string()));
        };

        let message = self.build_message(user, report)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.settings.host)
            .map_err(|err| {
                error!(host = %self.settings.host, ?err, "failed to build smtp transport");
                DeliveryError::Delivery(SEND_FAILED.to_string())
            })?
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .build();

        transport.send(message).await.map_err(|err| {
            error!(host = %self.settings.host, to = %report.recipient(), ?err, "smtp send failed");
            DeliveryError::Delivery(SEND_FAILED.to_string())
        })?;

        info!(to = %report.recipient(), "report email sent");
        Ok(DeliveryReceipt::message(EMAIL_SENT_MESSAGE))
    }
}
