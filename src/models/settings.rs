use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub id: i32,
    pub initial_capital: f64,
    /// Percent of initial capital risked per trade (0.1 - 5.0).
    pub risk_per_trade: f64,
    /// Growth goal in percent, used for the progress gauge.
    pub target_growth: f64,
    /// When true, realized amounts are entered directly instead of being
    /// derived from risk/reward inputs.
    pub manual_mode: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Settings {
    /// Amount risked on a single trade under these settings.
    pub fn risk_amount(&self) -> f64 {
        self.initial_capital * self.risk_per_trade / 100.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSettingsInput {
    pub initial_capital: Option<f64>,
    pub risk_per_trade: Option<f64>,
    pub target_growth: Option<f64>,
    pub manual_mode: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_amount() {
        let settings = Settings {
            id: 1,
            initial_capital: 10000.0,
            risk_per_trade: 0.5,
            target_growth: 10.0,
            manual_mode: false,
            created_at: 0,
            updated_at: 0,
        };
        assert_eq!(settings.risk_amount(), 50.0);
    }
}
