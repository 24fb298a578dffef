use chrono::{DateTime, Utc};
use serde::Deserialize;
use v_htmlescape::escape;

use crate::error::{DeliveryError, MISSING_REQUIRED_FIELDS, NEGATIVE_FIELDS};
use crate::roi::{compute, BreakEvenDisplay, RoiInputs, RoiResult};

pub const REPORT_SUBJECT: &str = "Your Workflow ROI Calculator Report";

/// Body accepted by the report delivery endpoints. Every field is optional on
/// the wire so that missing values surface as a validation error rather than a
/// deserialization failure.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(test, derive(Default))]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub team_members: Option<f64>,
    #[serde(default)]
    pub hours_per_week: Option<f64>,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub monthly_error_cost: Option<f64>,
    #[serde(default)]
    pub cost_per_error: Option<f64>,
    #[serde(default)]
    pub monthly_loss: Option<f64>,
    #[serde(default)]
    pub break_even_months: Option<f64>,
    #[serde(default)]
    pub annual_savings: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoiReport {
    pub inputs: RoiInputs,
    pub result: RoiResult,
    pub generated_at: DateTime<Utc>,
}

fn truthy(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

impl ReportPayload {
    /// Shared validator for every delivery strategy.
    pub fn into_report(self) -> Result<RoiReport, DeliveryError> {
        let email = self
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);

        let (Some(email), Some(team_members), Some(hours_per_week), Some(hourly_rate)) = (
            email,
            truthy(self.team_members),
            truthy(self.hours_per_week),
            truthy(self.hourly_rate),
        ) else {
            return Err(DeliveryError::Validation(MISSING_REQUIRED_FIELDS.to_string()));
        };

        let numbers = [
            Some(team_members),
            Some(hours_per_week),
            Some(hourly_rate),
            self.monthly_error_cost,
            self.cost_per_error,
            self.monthly_loss,
            self.break_even_months,
            self.annual_savings,
        ];
        if numbers.iter().flatten().any(|v| *v < 0.0) {
            return Err(DeliveryError::Validation(NEGATIVE_FIELDS.to_string()));
        }

        let inputs = RoiInputs {
            team_members,
            hours_per_week,
            hourly_rate,
            monthly_error_cost: self.monthly_error_cost.unwrap_or(0.0),
            cost_per_error: self.cost_per_error.unwrap_or(0.0),
            email,
        };
        inputs.validate_figures()?;

        let result = match (self.monthly_loss, self.break_even_months, self.annual_savings) {
            (Some(monthly_loss), Some(break_even_months), Some(annual_savings)) => RoiResult {
                monthly_loss,
                break_even_months,
                annual_savings,
            },
            _ => compute(&inputs),
        };

        Ok(RoiReport {
            inputs,
            result,
            generated_at: Utc::now(),
        })
    }
}

impl RoiReport {
    pub fn new(inputs: RoiInputs, result: RoiResult) -> Self {
        Self {
            inputs,
            result,
            generated_at: Utc::now(),
        }
    }

    pub fn recipient(&self) -> &str {
        &self.inputs.email
    }

    /// `roi-report-<ISO8601 with ':' and '.' replaced by '-'>.html`
    pub fn file_name(&self) -> String {
        let stamp = self
            .generated_at
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string()
            .replace([':', '.'], "-");
        format!("roi-report-{stamp}.html")
    }
}

/// en-US grouping with at most two fraction digits; `.00` is dropped.
pub fn format_currency(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u128;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative && cents > 0 { "-" } else { "" };
    match fraction {
        0 => format!("{sign}{grouped}"),
        f if f % 10 == 0 => format!("{sign}{grouped}.{}", f / 10),
        f => format!("{sign}{grouped}.{f:02}"),
    }
}

fn metric_row(label: &str, value: &str) -> String {
    format!(
        r#"
                    <div class="metric-row">
                        <span class="metric-label">{label}</span>
                        <span class="metric-value">{value}</span>
                    </div>"#
    )
}

pub fn render_html(report: &RoiReport) -> String {
    let inputs = &report.inputs;
    let result = &report.result;
    let break_even = BreakEvenDisplay::from_months(result.break_even_months);

    let mut metrics = String::new();
    metrics.push_str(&metric_row(
        "Employees doing manual work:",
        &format_currency(inputs.team_members),
    ));
    metrics.push_str(&metric_row(
        "Hours per employee/week:",
        &format_currency(inputs.hours_per_week),
    ));
    metrics.push_str(&metric_row(
        "Hourly cost (with overhead):",
        &format!("${}", format_currency(inputs.hourly_rate)),
    ));
    if inputs.monthly_error_cost > 0.0 {
        metrics.push_str(&metric_row(
            "Monthly error cost:",
            &format!("${}", format_currency(inputs.monthly_error_cost)),
        ));
    }
    if inputs.cost_per_error > 0.0 {
        metrics.push_str(&metric_row(
            "Cost per error:",
            &format!("${}", format_currency(inputs.cost_per_error)),
        ));
    }

    let viability_note = if result.is_viable() {
        String::new()
    } else {
        String::from(
            r#"
                <div class="note"><strong>Heads up:</strong> at the current volume, automation does not pay for itself within the first year.</div>"#,
        )
    };

    format!(
        r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Workflow ROI Calculator Report</title>
    <style>
        body {{ font-family: 'Plus Jakarta Sans', Arial, sans-serif; line-height: 1.6; margin: 0; padding: 20px; background-color: #f8f9fa; }}
        .container {{ max-width: 600px; margin: 0 auto; background-color: white; border-radius: 12px; box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1); overflow: hidden; }}
        .header {{ background: linear-gradient(135deg, #04A15B 0%, #038549 100%); color: white; padding: 30px; text-align: center; }}
        .header h1 {{ margin: 0; font-size: 28px; font-weight: 700; }}
        .content {{ padding: 30px; }}
        .metrics-title {{ color: #101F2F; font-size: 20px; font-weight: 600; margin-bottom: 15px; border-bottom: 2px solid #04A15B; padding-bottom: 5px; }}
        .metric-row {{ display: flex; justify-content: space-between; padding: 10px 0; border-bottom: 1px solid #eee; }}
        .metric-label {{ color: #6F7E8A; font-weight: 500; }}
        .metric-value {{ color: #101F2F; font-weight: 600; }}
        .results-section {{ background-color: #f8f9fa; border-radius: 8px; padding: 20px; margin: 20px 0; }}
        .result-card {{ margin: 15px 0; padding: 20px; border-radius: 8px; text-align: center; }}
        .loss-card {{ background-color: #fee; border-left: 4px solid #dc3545; }}
        .break-even-card {{ background-color: #fff3cd; border-left: 4px solid #ffc107; }}
        .savings-card {{ background-color: #d1ecf1; border-left: 4px solid #28a745; }}
        .result-amount {{ font-size: 32px; font-weight: 700; margin: 10px 0; }}
        .footer {{ background-color: #f8f9fa; padding: 20px; text-align: center; color: #6F7E8A; font-size: 14px; }}
        .note {{ background-color: #f7fafc; border: 1px solid #e2e8f0; border-radius: 6px; padding: 15px; margin: 20px 0; color: #6F7E8A; font-size: 14px; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Workflow ROI Calculator Report</h1>
            <p>Your personalized automation ROI analysis</p>
            <p><strong>Recipient:</strong> {recipient}</p>
        </div>
        <div class="content">
            <div class="metrics-section">
                <h2 class="metrics-title">Core Workforce Metrics</h2>{metrics}
            </div>
            <div class="results-section">
                <h2 class="metrics-title">ROI Analysis Results</h2>
                <div class="result-card loss-card">
                    <h3>Current Monthly Loss</h3>
                    <div class="result-amount">${monthly_loss}</div>
                    <p>You're losing this amount per month due to manual processes</p>
                </div>
                <div class="result-card break-even-card">
                    <h3>Break-Even Timeline</h3>
                    <div class="result-amount">{break_even}</div>
                    <p>Time to recover automation investment</p>
                </div>
                <div class="result-card savings-card">
                    <h3>Annual Savings Potential</h3>
                    <div class="result-amount">${annual_savings}</div>
                    <p>Net savings after automation implementation</p>
                </div>
            </div>{viability_note}
            <div class="note">
                <strong>Note:</strong> Results are estimates based on industry averages. Actual savings may vary depending on your specific workflows and automation implementation.
            </div>
        </div>
        <div class="footer">
            <p>This report was generated by the Workflow ROI Calculator</p>
            <p>Generated on: {generated}</p>
        </div>
    </div>
</body>
</html>
"##,
        recipient = escape(report.recipient()),
        metrics = metrics,
        monthly_loss = format_currency(result.monthly_loss),
        break_even = escape(&break_even.to_string()),
        annual_savings = format_currency(result.annual_savings),
        viability_note = viability_note,
        generated = report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

pub fn render_text_summary(report: &RoiReport) -> String {
    let inputs = &report.inputs;
    let result = &report.result;
    let mut lines = vec![
        "ROI Calculator Report".to_string(),
        "=====================".to_string(),
        "Core Workforce Metrics:".to_string(),
        format!(
            "- Employees doing manual work: {}",
            format_currency(inputs.team_members)
        ),
        format!(
            "- Hours per employee/week: {}",
            format_currency(inputs.hours_per_week)
        ),
        format!(
            "- Hourly cost (with overhead): ${}",
            format_currency(inputs.hourly_rate)
        ),
    ];
    if inputs.monthly_error_cost > 0.0 {
        lines.push(format!(
            "- Monthly error cost: ${}",
            format_currency(inputs.monthly_error_cost)
        ));
    }
    if inputs.cost_per_error > 0.0 {
        lines.push(format!(
            "- Cost per error: ${}",
            format_currency(inputs.cost_per_error)
        ));
    }
    lines.push(String::new());
    lines.push("ROI Analysis Results:".to_string());
    lines.push(format!(
        "- Monthly Loss: ${}",
        format_currency(result.monthly_loss)
    ));
    lines.push(format!(
        "- Break-even Timeline: {}",
        BreakEvenDisplay::from_months(result.break_even_months)
    ));
    lines.push(format!(
        "- Annual Savings Potential: ${}",
        format_currency(result.annual_savings)
    ));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn payload() -> ReportPayload {
        ReportPayload {
            email: Some("lead@example.com".into()),
            team_members: Some(20.0),
            hours_per_week: Some(40.0),
            hourly_rate: Some(50.0),
            monthly_error_cost: Some(1000.0),
            ..ReportPayload::default()
        }
    }

    #[test]
    fn formats_currency_like_en_us() {
        assert_eq!(format_currency(1_914_000.0), "1,914,000");
        assert_eq!(format_currency(161_000.0), "161,000");
        assert_eq!(format_currency(999.0), "999");
        assert_eq!(format_currency(1234.5), "1,234.5");
        assert_eq!(format_currency(1234.567), "1,234.57");
        assert_eq!(format_currency(-17_952.0), "-17,952");
        assert_eq!(format_currency(0.0), "0");
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        for strip in 0..4 {
            let mut p = payload();
            match strip {
                0 => p.email = Some("   ".into()),
                1 => p.team_members = None,
                2 => p.hours_per_week = Some(0.0),
                _ => p.hourly_rate = Some(f64::NAN),
            }
            let err = p.into_report().unwrap_err();
            assert_eq!(err.to_string(), MISSING_REQUIRED_FIELDS);
        }
    }

    #[test]
    fn negative_numbers_are_rejected() {
        let mut p = payload();
        p.monthly_error_cost = Some(-1.0);
        assert_eq!(p.into_report().unwrap_err().to_string(), NEGATIVE_FIELDS);
    }

    #[test]
    fn recomputes_missing_results_and_echoes_supplied_ones() {
        let report = payload().into_report().expect("valid");
        assert_eq!(report.result.monthly_loss, 161_000.0);
        assert_eq!(report.result.annual_savings, 1_914_000.0);

        let mut supplied = payload();
        supplied.monthly_loss = Some(1.0);
        supplied.break_even_months = Some(2.0);
        supplied.annual_savings = Some(3.0);
        let report = supplied.into_report().expect("valid");
        assert_eq!(report.result.monthly_loss, 1.0);
        assert_eq!(report.result.break_even_months, 2.0);
    }

    #[test]
    fn file_name_replaces_separators() {
        let mut report = payload().into_report().unwrap();
        report.generated_at = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap()
            + chrono::Duration::milliseconds(89);
        assert_eq!(report.file_name(), "roi-report-2025-03-04T05-06-07-089Z.html");
    }

    #[test]
    fn html_escapes_and_includes_every_field() {
        let mut p = payload();
        p.email = Some("<script>@x.io".into());
        p.cost_per_error = Some(75.0);
        let html = render_html(&p.into_report().unwrap());
        assert!(html.contains("&lt;script&gt;@x.io"));
        assert!(!html.contains("<script>@x.io"));
        assert!(html.contains("$161,000"));
        assert!(html.contains("$1,914,000"));
        assert!(html.contains("Monthly error cost:"));
        assert!(html.contains("Cost per error:"));
        assert!(html.contains("0.1 months"));
    }

    #[test]
    fn optional_rows_hidden_when_zero() {
        let mut p = payload();
        p.monthly_error_cost = None;
        let report = p.into_report().unwrap();
        let html = render_html(&report);
        assert!(!html.contains("Monthly error cost:"));
        assert!(!render_text_summary(&report).contains("Monthly error cost"));
    }

    #[test]
    fn rejects_figures_the_engine_cannot_accept() {
        let mut p = payload();
        p.hours_per_week = Some(500.0);
        let err = p.into_report().unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert_eq!(
            err.to_string(),
            "Hours per week cannot exceed 168 (total hours in a week)"
        );

        let mut p = payload();
        p.team_members = Some(2.5);
        assert_eq!(
            p.into_report().unwrap_err().to_string(),
            "Number of employees must be a whole number"
        );

        let mut p = payload();
        p.email = Some("not-an-address".into());
        assert!(p.into_report().is_ok());
    }

    #[test]
    fn flags_reports_that_do_not_pay_back() {
        let p = ReportPayload {
            email: Some("small@shop.io".into()),
            team_members: Some(1.0),
            hours_per_week: Some(1.0),
            hourly_rate: Some(1.0),
            ..ReportPayload::default()
        };
        let html = render_html(&p.into_report().unwrap());
        assert!(html.contains("does not pay for itself"));
    }
}
