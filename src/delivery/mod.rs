//! Report delivery strategies.
//!
//! Every strategy receives an already validated [`RoiReport`]; payload checks
//! live in [`ReportPayload::into_report`](crate::reporting::ReportPayload::into_report)
//! so they are applied identically regardless of which strategy is active.

mod file;
mod mock;
mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::{AppConfig, DeliveryMode};
use crate::error::DeliveryError;
use crate::reporting::RoiReport;

pub use file::FileDelivery;
pub use mock::MockDelivery;
pub use smtp::SmtpDelivery;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReceipt {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
}

impl DeliveryReceipt {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            filepath: None,
        }
    }
}

#[async_trait]
pub trait ReportDelivery: Send + Sync {
    fn mode(&self) -> DeliveryMode;

    async fn deliver(&self, report: &RoiReport) -> Result<DeliveryReceipt, DeliveryError>;
}

pub type SharedDelivery = Arc<dyn ReportDelivery>;

pub fn build_delivery(mode: DeliveryMode, config: &AppConfig) -> SharedDelivery {
    match mode {
        DeliveryMode::Smtp => Arc::new(SmtpDelivery::new(config.smtp.clone())),
        DeliveryMode::Mock => Arc::new(MockDelivery::new(config.mock_delay)),
        DeliveryMode::File => Arc::new(FileDelivery::new(config.reports_dir.clone())),
    }
}
