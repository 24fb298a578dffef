use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{error, info};

use super::{DeliveryReceipt, ReportDelivery};
use crate::config::DeliveryMode;
use crate::error::DeliveryError;
use crate::reporting::{render_html, RoiReport};

/// Writes each report as a standalone HTML file under `reports_dir`.
#[derive(Debug, Clone)]
pub struct FileDelivery {
    reports_dir: PathBuf,
}

impl FileDelivery {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
        }
    }
}

#[async_trait]
impl ReportDelivery for FileDelivery {
    fn mode(&self) -> DeliveryMode {
        DeliveryMode::File
    }

    async fn deliver(&self, report: &RoiReport) -> Result<DeliveryReceipt, DeliveryError> {
        let html = render_html(report);
        let path = self.reports_dir.join(report.file_name());

        let write = async {
            tokio::fs::create_dir_all(&self.reports_dir).await?;
            tokio::fs::write(&path, html).await
        };
        if let Err(err) = write.await {
            error!(path = %path.display(), ?err, "failed to save email report");
            return Err(DeliveryError::Delivery(
                "Failed to save email report".to_string(),
            ));
        }

        let filepath = path.display().to_string();
        info!(path = %filepath, to = %report.recipient(), "email report saved");

        Ok(DeliveryReceipt {
            message: format!("Report saved successfully! Check: {filepath}"),
            filepath: Some(filepath),
        })
    }
}
