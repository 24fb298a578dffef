pub mod args;
pub mod cli;
pub mod config;
pub mod delivery;
pub mod error;
pub mod reporting;
pub mod roi;
pub mod telemetry;
pub mod web;

use tracing::info;

pub use args::Args;
pub use config::{AppConfig, DeliveryMode};
pub use delivery::{build_delivery, DeliveryReceipt, ReportDelivery};
pub use error::DeliveryError;
pub use reporting::{ReportPayload, RoiReport};
pub use roi::{compute, RoiInputs, RoiResult, ValidationError};

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub inputs: RoiInputs,
    pub result: RoiResult,
    pub receipt: Option<DeliveryReceipt>,
}

/// Validates and computes, then delivers the report when asked to.
/// Configuration is read from the environment only when needed.
pub async fn run(args: Args) -> anyhow::Result<RunOutcome> {
    if args.wants_delivery() {
        let config = AppConfig::from_env()?;
        run_with_config(args, &config).await
    } else {
        run_with_config(args, &AppConfig::default()).await
    }
}

pub async fn run_with_config(args: Args, config: &AppConfig) -> anyhow::Result<RunOutcome> {
    let inputs = args.inputs();
    inputs.validate()?;
    let result = compute(&inputs);

    let mode = args
        .deliver
        .or_else(|| args.send.then_some(config.delivery));
    let receipt = match mode {
        Some(mode) => {
            let delivery = build_delivery(mode, config);
            let report = RoiReport::new(inputs.clone(), result);
            let receipt = delivery.deliver(&report).await?;
            info!(mode = %mode, to = %report.recipient(), "report delivered");
            Some(receipt)
        }
        None => None,
    };

    Ok(RunOutcome {
        inputs,
        result,
        receipt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn args(send: bool, deliver: Option<DeliveryMode>) -> Args {
        Args {
            team_members: 20.0,
            hours_per_week: 40.0,
            hourly_rate: 50.0,
            monthly_error_cost: 1000.0,
            cost_per_error: 0.0,
            email: "ops@example.com".into(),
            send,
            deliver,
        }
    }

    #[tokio::test]
    async fn computes_without_delivering() {
        let outcome = run_with_config(args(false, None), &AppConfig::default())
            .await
            .expect("valid inputs");
        assert_eq!(outcome.result.monthly_loss, 161_000.0);
        assert!(outcome.receipt.is_none());
    }

    #[tokio::test]
    async fn delivers_through_requested_strategy() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config = AppConfig {
            reports_dir: temp.path().to_path_buf(),
            mock_delay: Duration::ZERO,
            ..AppConfig::default()
        };
        let outcome = run_with_config(args(false, Some(DeliveryMode::File)), &config)
            .await
            .expect("file delivery");
        let path = outcome.receipt.and_then(|r| r.filepath).expect("filepath");
        assert!(std::path::Path::new(&path).exists());
    }

    #[tokio::test]
    async fn send_uses_the_configured_strategy() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config = AppConfig {
            delivery: DeliveryMode::File,
            reports_dir: temp.path().to_path_buf(),
            ..AppConfig::default()
        };
        let outcome = run_with_config(args(true, None), &config)
            .await
            .expect("file delivery");
        assert!(outcome.receipt.and_then(|r| r.filepath).is_some());
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn run_without_delivery_skips_configuration() {
        let outcome = run(args(false, None)).await.expect("valid inputs");
        assert_eq!(outcome.result.annual_savings, 1_914_000.0);
        assert!(outcome.receipt.is_none());
    }

    #[tokio::test]
    async fn rejects_invalid_inputs_before_computing() {
        let mut bad = args(false, None);
        bad.hours_per_week = 200.0;
        let err = run_with_config(bad, &AppConfig::default()).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::TooManyHours)
        );
    }
}
