use crate::config::DeliveryMode;
use crate::roi::RoiInputs;

#[derive(Clone, Debug)]
pub struct Args {
    /// Employees doing manual work
    pub team_members: f64,

    /// Manual-work hours per employee each week
    pub hours_per_week: f64,

    /// Fully-loaded hourly labor cost
    pub hourly_rate: f64,

    /// Monthly cost of errors caused by manual work
    pub monthly_error_cost: f64,

    /// Average cost of a single error (informational)
    pub cost_per_error: f64,

    /// Recipient of the report
    pub email: String,

    /// Deliver the report through the configured strategy
    pub send: bool,

    /// Strategy override; implies `send`
    pub deliver: Option<DeliveryMode>,
}

impl Args {
    pub fn wants_delivery(&self) -> bool {
        self.send || self.deliver.is_some()
    }

    pub fn inputs(&self) -> RoiInputs {
        RoiInputs {
            team_members: self.team_members,
            hours_per_week: self.hours_per_week,
            hourly_rate: self.hourly_rate,
            monthly_error_cost: self.monthly_error_cost,
            cost_per_error: self.cost_per_error,
            email: self.email.trim().to_string(),
        }
    }
}
