use std::collections::HashMap;

/// Hourly rates per employee key. Static after load; employees missing
/// from the table silently fall back to the default rate so a
/// misconfigured row never blanks the dashboard.
#[derive(Debug, Clone)]
pub struct RateTable {
    rates: HashMap<String, f64>,
    default_rate: f64,
}

impl RateTable {
    pub fn new(rates: HashMap<String, f64>, default_rate: f64) -> Self {
        Self {
            rates,
            default_rate,
        }
    }

    pub fn rate_for(&self, employee_key: &str) -> f64 {
        match self.rates.get(employee_key) {
            Some(rate) => *rate,
            None => {
                tracing::debug!(
                    "no configured rate for '{}', using default {}",
                    employee_key,
                    self.default_rate
                );
                self.default_rate
            }
        }
    }

    pub fn default_rate(&self) -> f64 {
        self.default_rate
    }
}
