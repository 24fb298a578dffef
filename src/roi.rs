use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Fixed up-front investment used for break-even and first-year figures.
pub const AUTOMATION_COST: f64 = 18_000.0;

/// Upper bound for `hours_per_week` (hours in a week).
pub const MAX_HOURS_PER_WEEK: f64 = 168.0;

/// Billing weeks per month used by the labor estimate.
pub const WEEKS_PER_MONTH: f64 = 4.0;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

#[derive(Debug, Clone, PartialEq)]
pub struct RoiInputs {
    pub team_members: f64,
    pub hours_per_week: f64,
    pub hourly_rate: f64,
    pub monthly_error_cost: f64,
    pub cost_per_error: f64,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiResult {
    pub monthly_loss: f64,
    pub break_even_months: f64,
    pub annual_savings: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email is required")]
    MissingEmail,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{0} cannot be negative")]
    Negative(&'static str),
    #[error("{0} must be a whole number")]
    NotWholeNumber(&'static str),
    #[error("{0} must be a number")]
    NotANumber(&'static str),
    #[error("Hours per week cannot exceed 168 (total hours in a week)")]
    TooManyHours,
}

pub const TEAM_MEMBERS_LABEL: &str = "Number of employees";
pub const HOURS_PER_WEEK_LABEL: &str = "Hours per employee/week";
pub const HOURLY_RATE_LABEL: &str = "Hourly cost";
pub const MONTHLY_ERROR_COST_LABEL: &str = "Monthly error cost";
pub const COST_PER_ERROR_LABEL: &str = "Cost per error";

impl RoiInputs {
    /// Checks the engine preconditions in the order a visitor would fix them.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingEmail);
        }
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
        self.validate_figures()
    }

    /// Numeric preconditions only. Report delivery checks the recipient for
    /// presence alone, so it calls this instead of [`RoiInputs::validate`].
    pub fn validate_figures(&self) -> Result<(), ValidationError> {
        let required = [
            (TEAM_MEMBERS_LABEL, self.team_members),
            (HOURS_PER_WEEK_LABEL, self.hours_per_week),
            (HOURLY_RATE_LABEL, self.hourly_rate),
        ];
        for (label, value) in required {
            if value.is_nan() {
                return Err(ValidationError::NotANumber(label));
            }
            if value == 0.0 {
                return Err(ValidationError::Missing(label));
            }
        }

        let all = [
            (TEAM_MEMBERS_LABEL, self.team_members),
            (HOURS_PER_WEEK_LABEL, self.hours_per_week),
            (HOURLY_RATE_LABEL, self.hourly_rate),
            (MONTHLY_ERROR_COST_LABEL, self.monthly_error_cost),
            (COST_PER_ERROR_LABEL, self.cost_per_error),
        ];
        for (label, value) in all {
            if !value.is_finite() {
                return Err(ValidationError::NotANumber(label));
            }
            if value < 0.0 {
                return Err(ValidationError::Negative(label));
            }
        }

        if self.team_members.fract() != 0.0 {
            return Err(ValidationError::NotWholeNumber(TEAM_MEMBERS_LABEL));
        }
        if self.hours_per_week > MAX_HOURS_PER_WEEK {
            return Err(ValidationError::TooManyHours);
        }

        Ok(())
    }

    pub fn labor_cost_per_month(&self) -> f64 {
        self.team_members * self.hours_per_week * self.hourly_rate * WEEKS_PER_MONTH
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Derives the ROI figures. Performs no validation; call
/// [`RoiInputs::validate`] first.
pub fn compute(inputs: &RoiInputs) -> RoiResult {
    let monthly_loss = inputs.labor_cost_per_month() + inputs.monthly_error_cost;
    let break_even_months = if monthly_loss > 0.0 {
        AUTOMATION_COST / monthly_loss
    } else {
        0.0
    };
    let annual_savings = first_year_net(monthly_loss).max(0.0);

    RoiResult {
        monthly_loss,
        break_even_months,
        annual_savings,
    }
}

/// Unclamped first-year savings; negative when automation does not pay back
/// inside twelve months.
pub fn first_year_net(monthly_loss: f64) -> f64 {
    monthly_loss * 12.0 - AUTOMATION_COST
}

impl RoiResult {
    pub fn first_year_net(&self) -> f64 {
        first_year_net(self.monthly_loss)
    }

    pub fn is_viable(&self) -> bool {
        self.first_year_net() > 0.0
    }

    pub fn break_even(&self) -> BreakEvenDisplay {
        BreakEvenDisplay::from_months(self.break_even_months)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakEvenDisplay {
    pub primary: String,
    pub secondary: Option<String>,
}

impl BreakEvenDisplay {
    pub fn from_months(months: f64) -> Self {
        if months < 1.0 {
            let days = (months * 30.0).round() as i64;
            Self {
                primary: format!("{months:.1} months"),
                secondary: Some(format!("(≈ {days} days)")),
            }
        } else if months < 12.0 {
            Self {
                primary: format!("{months:.1} months"),
                secondary: None,
            }
        } else {
            Self {
                primary: format!("{:.1} years", months / 12.0),
                secondary: None,
            }
        }
    }
}

impl std::fmt::Display for BreakEvenDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.secondary {
            Some(secondary) => write!(f, "{} {}", self.primary, secondary),
            None => f.write_str(&self.primary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(team: f64, hours: f64, rate: f64, errors: f64) -> RoiInputs {
        RoiInputs {
            team_members: team,
            hours_per_week: hours,
            hourly_rate: rate,
            monthly_error_cost: errors,
            cost_per_error: 0.0,
            email: "ops@example.com".to_string(),
        }
    }

    #[test]
    fn computes_reference_scenario() {
        let result = compute(&inputs(20.0, 40.0, 50.0, 1000.0));
        assert_eq!(result.monthly_loss, 161_000.0);
        assert!((result.break_even_months - 18_000.0 / 161_000.0).abs() < 1e-12);
        assert_eq!(result.annual_savings, 1_914_000.0);
        assert!(result.is_viable());
    }

    #[test]
    fn clamps_annual_savings_but_keeps_net() {
        let result = compute(&inputs(1.0, 1.0, 1.0, 0.0));
        assert_eq!(result.monthly_loss, 4.0);
        assert_eq!(result.annual_savings, 0.0);
        assert_eq!(result.first_year_net(), -17_952.0);
        assert!(!result.is_viable());
    }

    #[test]
    fn zero_loss_means_zero_break_even() {
        let result = compute(&inputs(0.0, 0.0, 0.0, 0.0));
        assert_eq!(result.monthly_loss, 0.0);
        assert_eq!(result.break_even_months, 0.0);
    }

    #[test]
    fn cost_per_error_does_not_change_result() {
        let base = inputs(3.0, 10.0, 25.0, 200.0);
        let mut with_cost = base.clone();
        with_cost.cost_per_error = 999.0;
        assert_eq!(compute(&base), compute(&with_cost));
    }

    #[test]
    fn rejects_too_many_hours() {
        let err = inputs(2.0, 169.0, 10.0, 0.0).validate().unwrap_err();
        assert_eq!(err, ValidationError::TooManyHours);
        assert!(inputs(2.0, 168.0, 10.0, 0.0).validate().is_ok());
    }

    #[test]
    fn validation_messages_are_specific() {
        let mut missing_email = inputs(2.0, 10.0, 10.0, 0.0);
        missing_email.email = "  ".into();
        assert_eq!(
            missing_email.validate().unwrap_err().to_string(),
            "Email is required"
        );

        let mut bad_email = inputs(2.0, 10.0, 10.0, 0.0);
        bad_email.email = "not-an-email".into();
        assert_eq!(bad_email.validate(), Err(ValidationError::InvalidEmail));

        assert_eq!(
            inputs(0.0, 10.0, 10.0, 0.0).validate().unwrap_err().to_string(),
            "Number of employees is required"
        );
        assert_eq!(
            inputs(2.0, 10.0, 10.0, -5.0).validate().unwrap_err().to_string(),
            "Monthly error cost cannot be negative"
        );
        assert_eq!(
            inputs(2.5, 10.0, 10.0, 0.0).validate(),
            Err(ValidationError::NotWholeNumber(TEAM_MEMBERS_LABEL))
        );
    }

    #[test]
    fn formats_break_even_for_display() {
        let short = BreakEvenDisplay::from_months(18_000.0 / 161_000.0);
        assert_eq!(short.primary, "0.1 months");
        assert_eq!(short.secondary.as_deref(), Some("(≈ 3 days)"));

        let medium = BreakEvenDisplay::from_months(4.5);
        assert_eq!(medium.to_string(), "4.5 months");

        let long = BreakEvenDisplay::from_months(30.0);
        assert_eq!(long.to_string(), "2.5 years");
    }

    #[test]
    fn email_pattern_matches_basic_addresses() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.io"));
    }
}
