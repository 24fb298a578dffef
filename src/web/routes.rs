use std::any::Any;

use axum::{
    extract::{rejection::JsonRejection, Form, State},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{info, warn};

use super::state::AppState;
use super::views::{render_calculator_page, render_notice, render_results, Notice};
use crate::config::{AppConfig, DeliveryMode};
use crate::delivery::{DeliveryReceipt, SharedDelivery};
use crate::error::DeliveryError;
use crate::reporting::{ReportPayload, RoiReport};
use crate::roi::{
    compute, BreakEvenDisplay, RoiInputs, RoiResult, ValidationError, COST_PER_ERROR_LABEL,
    HOURLY_RATE_LABEL, HOURS_PER_WEEK_LABEL, MONTHLY_ERROR_COST_LABEL, TEAM_MEMBERS_LABEL,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(calculator_page))
        .route("/health", get(health))
        .route("/calculate", post(calculate_form))
        .route("/api/calculate", post(calculate_json))
        .route("/api/send-email", post(send_report))
        .route("/api/send-email-mock", post(send_report_mock))
        .route("/api/send-email-file", post(send_report_file))
        .route("/send-email", post(send_report))
        .route("/send-email-mock", post(send_report_mock))
        .route("/send-email-file", post(send_report_file))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr;
    let mode = config.delivery;
    if mode == DeliveryMode::Smtp && !config.smtp.is_configured() {
        warn!("EMAIL_USER/EMAIL_PASS are not configured; report emails will return 503");
    }

    let app = build_router(AppState::new(config));
    info!(%addr, delivery = %mode, "starting workflow ROI server");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Turns a handler panic into the generic `unexpected` JSON error.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    DeliveryError::from(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}

async fn health() -> &'static str {
    "ok"
}

async fn calculator_page(State(state): State<AppState>) -> Html<String> {
    Html(render_calculator_page(state.active_mode()))
}

async fn send_report(
    State(state): State<AppState>,
    payload: Result<Json<ReportPayload>, JsonRejection>,
) -> Result<Json<DeliveryReceipt>, DeliveryError> {
    dispatch(state.active(), payload).await
}

async fn send_report_mock(
    State(state): State<AppState>,
    payload: Result<Json<ReportPayload>, JsonRejection>,
) -> Result<Json<DeliveryReceipt>, DeliveryError> {
    dispatch(state.delivery(DeliveryMode::Mock), payload).await
}

async fn send_report_file(
    State(state): State<AppState>,
    payload: Result<Json<ReportPayload>, JsonRejection>,
) -> Result<Json<DeliveryReceipt>, DeliveryError> {
    dispatch(state.delivery(DeliveryMode::File), payload).await
}

async fn dispatch(
    delivery: SharedDelivery,
    payload: Result<Json<ReportPayload>, JsonRejection>,
) -> Result<Json<DeliveryReceipt>, DeliveryError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejecting malformed report payload");
        DeliveryError::Validation("Invalid request body".to_string())
    })?;
    let report = payload.into_report()?;
    let receipt = deliver(&delivery, &report).await?;
    Ok(Json(receipt))
}

async fn deliver(
    delivery: &SharedDelivery,
    report: &RoiReport,
) -> Result<DeliveryReceipt, DeliveryError> {
    match delivery.deliver(report).await {
        Ok(receipt) => {
            info!(mode = %delivery.mode(), to = %report.recipient(), "report delivered");
            Ok(receipt)
        }
        Err(err) => {
            warn!(mode = %delivery.mode(), kind = err.kind(), error = %err, "report delivery failed");
            Err(err)
        }
    }
}

/// Calculator inputs as they arrive over JSON. Absent numbers count as zero so
/// the precondition checks can name the missing field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalculateRequest {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    team_members: Option<f64>,
    #[serde(default)]
    hours_per_week: Option<f64>,
    #[serde(default)]
    hourly_rate: Option<f64>,
    #[serde(default)]
    monthly_error_cost: Option<f64>,
    #[serde(default)]
    cost_per_error: Option<f64>,
}

impl CalculateRequest {
    fn into_inputs(self) -> RoiInputs {
        RoiInputs {
            team_members: self.team_members.unwrap_or(0.0),
            hours_per_week: self.hours_per_week.unwrap_or(0.0),
            hourly_rate: self.hourly_rate.unwrap_or(0.0),
            monthly_error_cost: self.monthly_error_cost.unwrap_or(0.0),
            cost_per_error: self.cost_per_error.unwrap_or(0.0),
            email: self.email.unwrap_or_default().trim().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculateResponse {
    #[serde(flatten)]
    result: RoiResult,
    first_year_net: f64,
    break_even: BreakEvenDisplay,
}

async fn calculate_json(
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<Json<CalculateResponse>, DeliveryError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejecting malformed calculator payload");
        DeliveryError::Validation("Invalid request body".to_string())
    })?;
    let inputs = request.into_inputs();
    inputs.validate()?;

    let result = compute(&inputs);
    Ok(Json(CalculateResponse {
        result,
        first_year_net: result.first_year_net(),
        break_even: result.break_even(),
    }))
}

#[derive(Debug, Default, Deserialize)]
struct CalculatorForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    team_members: String,
    #[serde(default)]
    hours_per_week: String,
    #[serde(default)]
    hourly_rate: String,
    #[serde(default)]
    monthly_error_cost: String,
    #[serde(default)]
    cost_per_error: String,
}

fn parse_field(raw: &str, label: &'static str) -> Result<f64, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse::<f64>()
        .map_err(|_| ValidationError::NotANumber(label))
}

impl CalculatorForm {
    fn into_inputs(self) -> Result<RoiInputs, ValidationError> {
        Ok(RoiInputs {
            team_members: parse_field(&self.team_members, TEAM_MEMBERS_LABEL)?,
            hours_per_week: parse_field(&self.hours_per_week, HOURS_PER_WEEK_LABEL)?,
            hourly_rate: parse_field(&self.hourly_rate, HOURLY_RATE_LABEL)?,
            monthly_error_cost: parse_field(&self.monthly_error_cost, MONTHLY_ERROR_COST_LABEL)?,
            cost_per_error: parse_field(&self.cost_per_error, COST_PER_ERROR_LABEL)?,
            email: self.email.trim().to_string(),
        })
    }
}

/// HTMX handler: compute, deliver through the configured strategy, and swap in
/// the results with a notice. Always answers 200 so the fragment is rendered.
async fn calculate_form(
    State(state): State<AppState>,
    Form(form): Form<CalculatorForm>,
) -> Html<String> {
    let inputs = match form.into_inputs().and_then(|inputs| {
        inputs.validate()?;
        Ok(inputs)
    }) {
        Ok(inputs) => inputs,
        Err(err) => return Html(render_notice(&Notice::error(err.to_string()))),
    };

    let result = compute(&inputs);
    let report = RoiReport::new(inputs, result);
    let notice = match deliver(&state.active(), &report).await {
        Ok(_) => Notice::success("Report sent to your email successfully!"),
        Err(err) => Notice::error(err.notice()),
    };

    Html(render_results(&report.inputs, &report.result, &notice))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn explode() -> &'static str {
        panic!("report renderer crashed")
    }

    #[tokio::test]
    async fn handler_panic_becomes_generic_500() {
        let app = Router::new()
            .route("/explode", get(explode))
            .layer(CatchPanicLayer::custom(panic_response));
        let response = app
            .oneshot(Request::builder().uri("/explode").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["kind"], "unexpected");
        assert_eq!(body["error"], "Unexpected error while processing the report");
    }

    #[test]
    fn blank_form_fields_count_as_zero() {
        let form = CalculatorForm {
            email: " lead@example.com ".into(),
            team_members: "3".into(),
            hours_per_week: "10".into(),
            hourly_rate: "40".into(),
            ..CalculatorForm::default()
        };
        let inputs = form.into_inputs().expect("parses");
        assert_eq!(inputs.email, "lead@example.com");
        assert_eq!(inputs.monthly_error_cost, 0.0);
        assert!(inputs.validate().is_ok());
    }

    #[test]
    fn non_numeric_form_field_is_named() {
        let form = CalculatorForm {
            hourly_rate: "lots".into(),
            ..CalculatorForm::default()
        };
        assert_eq!(
            form.into_inputs().unwrap_err().to_string(),
            "Hourly cost must be a number"
        );
    }
}
