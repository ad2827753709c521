use crate::error::{PlannerError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Tunable constants for planning, insight text and record ingestion.
///
/// Every field has a default, so a partial JSON document such as
/// `{"currency_symbol": "$"}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PlannerConfig {
    #[schemars(description = "Horizon used when a request does not specify max_months.")]
    pub default_horizon_months: u32,

    #[schemars(
        description = "Hard upper bound on simulated months. Requests above this are rejected."
    )]
    pub max_horizon_months: u32,

    #[schemars(description = "Symbol prefixed to amounts in insight and budget messages.")]
    pub currency_symbol: String,

    #[schemars(
        description = "Interest deltas smaller than this (in currency units) are not reported as insights."
    )]
    pub insight_threshold: f64,

    #[schemars(
        description = "APR (fraction) used for a consolidation scenario that does not state its own rate."
    )]
    pub default_consolidation_rate: f64,

    #[schemars(
        description = "Minimum payment of a consolidated loan, as a fraction of its first month's interest."
    )]
    pub consolidation_min_payment_fraction: f64,

    #[schemars(description = "Lower bound for an estimated minimum payment.")]
    pub min_payment_floor: f64,

    #[schemars(
        description = "Fraction of one month's interest used when estimating a missing minimum payment."
    )]
    pub min_payment_interest_fraction: f64,

    #[schemars(description = "Time limit handed to the one-step solver, in milliseconds.")]
    pub solver_time_limit_ms: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_horizon_months: 60,
            max_horizon_months: 120,
            currency_symbol: "₹".to_string(),
            insight_threshold: 1000.0,
            default_consolidation_rate: 0.12,
            consolidation_min_payment_fraction: 0.02,
            min_payment_floor: 50.0,
            min_payment_interest_fraction: 0.02,
            solver_time_limit_ms: 2000,
        }
    }
}

impl PlannerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: PlannerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_horizon_months == 0 {
            return Err(PlannerError::InvalidConfig(
                "max_horizon_months must be at least 1".to_string(),
            ));
        }

        if self.default_horizon_months == 0
            || self.default_horizon_months > self.max_horizon_months
        {
            return Err(PlannerError::InvalidConfig(format!(
                "default_horizon_months {} must be between 1 and max_horizon_months ({})",
                self.default_horizon_months, self.max_horizon_months
            )));
        }

        let non_negative = [
            ("insight_threshold", self.insight_threshold),
            ("default_consolidation_rate", self.default_consolidation_rate),
            (
                "consolidation_min_payment_fraction",
                self.consolidation_min_payment_fraction,
            ),
            ("min_payment_floor", self.min_payment_floor),
            (
                "min_payment_interest_fraction",
                self.min_payment_interest_fraction,
            ),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(PlannerError::InvalidConfig(format!(
                    "{} must be a non-negative number (got {})",
                    field, value
                )));
            }
        }

        Ok(())
    }

    /// Resolves a requested horizon against the defaults and the hard cap.
    pub fn resolve_horizon(&self, requested: Option<u32>) -> Result<u32> {
        let months = requested.unwrap_or(self.default_horizon_months);
        if months == 0 || months > self.max_horizon_months {
            return Err(PlannerError::InvalidHorizon {
                months,
                max: self.max_horizon_months,
            });
        }
        Ok(months)
    }
}
