use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};
use crate::schema::Debt;
use serde::{Deserialize, Serialize};

/// A debt as it is stored by the application: rate in percent, minimum
/// payment optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtRecord {
    pub name: String,
    pub total_amount: f64,
    /// Annual rate in percent, e.g. `18.5`.
    pub interest_rate: Option<f64>,
    #[serde(default)]
    pub min_payment: Option<f64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl DebtRecord {
    pub fn new(name: impl Into<String>, total_amount: f64, interest_rate: f64) -> Self {
        Self {
            name: name.into(),
            total_amount,
            interest_rate: Some(interest_rate),
            min_payment: None,
            is_active: true,
        }
    }

    pub fn with_min_payment(mut self, min_payment: f64) -> Self {
        self.min_payment = Some(min_payment);
        self
    }

    pub fn to_debt(&self, config: &PlannerConfig) -> Result<Debt> {
        let apr = match self.interest_rate {
            Some(rate) if rate.is_finite() && rate >= 0.0 => rate / 100.0,
            _ => return Err(PlannerError::InvalidApr(self.name.clone())),
        };

        let min_payment = match self.min_payment {
            Some(min) if min > 0.0 => min,
            _ => estimate_min_payment(self.total_amount, apr, config),
        };

        Ok(Debt::new(self.name.clone(), self.total_amount, apr, min_payment))
    }
}

/// Estimated minimum for a record without one:
/// `max(balance * apr / 12 * fraction, floor)`, never more than the balance.
pub fn estimate_min_payment(balance: f64, apr: f64, config: &PlannerConfig) -> f64 {
    let estimate = (balance * apr / 12.0 * config.min_payment_interest_fraction)
        .max(config.min_payment_floor);
    estimate.min(balance.max(0.0))
}

/// Converts the active records, preserving their order.
pub fn debts_from_records(records: &[DebtRecord], config: &PlannerConfig) -> Result<Vec<Debt>> {
    records
        .iter()
        .filter(|r| r.is_active)
        .map(|r| r.to_debt(config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_is_converted() {
        let debt = DebtRecord::new("Card", 1000.0, 24.0)
            .with_min_payment(40.0)
            .to_debt(&PlannerConfig::default())
            .unwrap();
        assert!((debt.apr - 0.24).abs() < 1e-12);
        assert_eq!(debt.min_payment, 40.0);
    }

    #[test]
    fn test_missing_minimum_is_estimated() {
        let config = PlannerConfig::default();

        let debt = DebtRecord::new("Card", 1000.0, 24.0).to_debt(&config).unwrap();
        assert_eq!(debt.min_payment, 50.0);

        let big = DebtRecord::new("Mortgage", 3_000_000.0, 12.0)
            .to_debt(&config)
            .unwrap();
        // 3,000,000 * 0.12 / 12 * 0.02
        assert!((big.min_payment - 600.0).abs() < 1e-9);

        let tiny = DebtRecord::new("Tab", 20.0, 10.0).to_debt(&config).unwrap();
        assert_eq!(tiny.min_payment, 20.0);
    }

    #[test]
    fn test_missing_rate_is_invalid() {
        let record = DebtRecord {
            name: "Mystery".to_string(),
            total_amount: 100.0,
            interest_rate: None,
            min_payment: None,
            is_active: true,
        };
        let result = record.to_debt(&PlannerConfig::default());
        assert!(matches!(result, Err(PlannerError::InvalidApr(name)) if name == "Mystery"));
    }

    #[test]
    fn test_inactive_records_are_skipped() {
        let json = r#"[
            {"name": "Card", "total_amount": 500.0, "interest_rate": 30.0},
            {"name": "Old", "total_amount": 900.0, "interest_rate": 10.0, "is_active": false}
        ]"#;
        let records: Vec<DebtRecord> = serde_json::from_str(json).unwrap();
        let debts = debts_from_records(&records, &PlannerConfig::default()).unwrap();

        assert_eq!(debts.len(), 1);
        assert_eq!(debts[0].name, "Card");
    }
}
