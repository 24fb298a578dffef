use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use super::{DeliveryReceipt, ReportDelivery};
use crate::config::DeliveryMode;
use crate::error::DeliveryError;
use crate::reporting::{format_currency, render_text_summary, RoiReport, REPORT_SUBJECT};

pub const MOCK_SENT_MESSAGE: &str =
    "Mock email sent successfully (check console for email content)";

/// Logs the report instead of sending it.
#[derive(Debug, Clone)]
pub struct MockDelivery {
    delay: Duration,
}

impl MockDelivery {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ReportDelivery for MockDelivery {
    fn mode(&self) -> DeliveryMode {
        DeliveryMode::Mock
    }

    async fn deliver(&self, report: &RoiReport) -> Result<DeliveryReceipt, DeliveryError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        info!(
            to = %report.recipient(),
            subject = REPORT_SUBJECT,
            monthly_loss = %format_currency(report.result.monthly_loss),
            break_even_months = report.result.break_even_months,
            annual_savings = %format_currency(report.result.annual_savings),
            "mock email sent"
        );
        info!("\n{}", render_text_summary(report));

        Ok(DeliveryReceipt::message(MOCK_SENT_MESSAGE))
    }
}
