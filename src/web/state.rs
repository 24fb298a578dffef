use std::sync::Arc;

use crate::config::{AppConfig, DeliveryMode};
use crate::delivery::{build_delivery, SharedDelivery};

/// Immutable per-process state shared by all handlers. Strategies are
/// stateless, so requests never contend on anything here.
#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    smtp: SharedDelivery,
    mock: SharedDelivery,
    file: SharedDelivery,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let smtp = build_delivery(DeliveryMode::Smtp, &config);
        let mock = build_delivery(DeliveryMode::Mock, &config);
        let file = build_delivery(DeliveryMode::File, &config);
        Self {
            config: Arc::new(config),
            smtp,
            mock,
            file,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn active_mode(&self) -> DeliveryMode {
        self.config.delivery
    }

    /// Strategy selected by configuration.
    pub fn active(&self) -> SharedDelivery {
        self.delivery(self.active_mode())
    }

    pub fn delivery(&self, mode: DeliveryMode) -> SharedDelivery {
        match mode {
            DeliveryMode::Smtp => self.smtp.clone(),
            DeliveryMode::Mock => self.mock.clone(),
            DeliveryMode::File => self.file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_strategy_follows_configuration() {
        let config = AppConfig {
            delivery: DeliveryMode::File,
            ..AppConfig::default()
        };
        let state = AppState::new(config);
        assert_eq!(state.active().mode(), DeliveryMode::File);
        assert_eq!(state.delivery(DeliveryMode::Mock).mode(), DeliveryMode::Mock);
        assert_eq!(state.delivery(DeliveryMode::Smtp).mode(), DeliveryMode::Smtp);
    }
}
