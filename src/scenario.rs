use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};
use crate::schema::{Debt, Strategy};
use crate::utils::{monthly_rate, total_minimum_payments};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const CONSOLIDATED_DEBT_NAME: &str = "Consolidated Loan";

/// Entry in `affected_debts` that selects every debt.
pub const ALL_DEBTS: &str = "All";

fn targets_every_debt(affected_debts: &[String]) -> bool {
    affected_debts.is_empty() || affected_debts.iter().any(|name| name == ALL_DEBTS)
}

/// A single what-if adjustment, applied to a copy of the debts and budget
/// before the scenario plan is simulated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "scenario_type", rename_all = "snake_case")]
pub enum ScenarioModifier {
    /// Add a fixed amount to the monthly budget.
    ExtraPayment {
        #[schemars(description = "Additional amount paid every month. Must be non-negative.")]
        amount: f64,
    },

    /// Remove a fixed amount from the monthly budget.
    BudgetReduction {
        #[schemars(
            description = "Amount removed from the monthly budget. The budget never drops below the active minimum payments."
        )]
        amount: f64,
    },

    /// Shift APRs up or down.
    InterestRateChange {
        #[schemars(
            description = "Delta added to the APR, as a fraction (0.02 = +2 points). Resulting APRs are floored at 0."
        )]
        rate_change: f64,
        #[serde(default)]
        #[schemars(description = "Debts to change. Empty, or containing \"All\", means every debt.")]
        affected_debts: Vec<String>,
    },

    /// Replace every debt with one consolidated loan.
    DebtConsolidation {
        #[serde(default)]
        #[schemars(
            description = "APR of the consolidated loan as a fraction. Uses the configured default when omitted."
        )]
        rate: Option<f64>,
        #[serde(default)]
        #[schemars(description = "One-off fee added to the consolidated balance.")]
        fee: f64,
    },

    /// One-time lump sum paid against the highest-APR debt before month 1.
    Windfall {
        #[schemars(description = "Lump sum amount. Must be non-negative.")]
        amount: f64,
    },
}

impl ScenarioModifier {
    /// Returns the modified debts and budget. Inputs are left untouched.
    pub fn apply(
        &self,
        debts: &[Debt],
        budget: f64,
        config: &PlannerConfig,
    ) -> Result<(Vec<Debt>, f64)> {
        self.validate(debts)?;

        let mut scenario_debts = debts.to_vec();
        let mut scenario_budget = budget;

        match self {
            ScenarioModifier::ExtraPayment { amount } => {
                scenario_budget += amount;
            }

            ScenarioModifier::BudgetReduction { amount } => {
                scenario_budget =
                    (budget - amount).max(total_minimum_payments(&scenario_debts));
            }

            ScenarioModifier::InterestRateChange {
                rate_change,
                affected_debts,
            } => {
                let every_debt = targets_every_debt(affected_debts);
                for debt in scenario_debts.iter_mut() {
                    if every_debt || affected_debts.contains(&debt.name) {
                        debt.apr = (debt.apr + rate_change).max(0.0);
                    }
                }
            }

            ScenarioModifier::DebtConsolidation { rate, fee } => {
                let balance: f64 = scenario_debts.iter().map(|d| d.balance).sum::<f64>() + fee;
                // An explicit rate, including 0%, is used as given.
                let apr = rate.unwrap_or(config.default_consolidation_rate);
                scenario_debts = vec![Debt::new(
                    CONSOLIDATED_DEBT_NAME,
                    balance,
                    apr,
                    consolidated_min_payment(balance, apr, config),
                )];
            }

            ScenarioModifier::Windfall { amount } => {
                if let Some(target) = highest_apr_active(&scenario_debts) {
                    let debt = &mut scenario_debts[target];
                    debt.balance = (debt.balance - amount).max(0.0);
                }
            }
        }

        Ok((scenario_debts, scenario_budget))
    }

    fn validate(&self, debts: &[Debt]) -> Result<()> {
        let check_amount = |label: &str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(PlannerError::InvalidScenario(format!(
                    "{} must be a non-negative number (got {})",
                    label, value
                )))
            }
        };

        match self {
            ScenarioModifier::ExtraPayment { amount } => check_amount("extra payment", *amount),
            ScenarioModifier::BudgetReduction { amount } => {
                check_amount("budget reduction", *amount)
            }
            ScenarioModifier::Windfall { amount } => check_amount("windfall amount", *amount),
            ScenarioModifier::DebtConsolidation { rate, fee } => {
                check_amount("consolidation fee", *fee)?;
                if let Some(rate) = rate {
                    check_amount("consolidation rate", *rate)?;
                }
                Ok(())
            }
            ScenarioModifier::InterestRateChange {
                rate_change,
                affected_debts,
            } => {
                if !rate_change.is_finite() {
                    return Err(PlannerError::InvalidScenario(format!(
                        "rate change must be finite (got {})",
                        rate_change
                    )));
                }
                if targets_every_debt(affected_debts) {
                    return Ok(());
                }
                match affected_debts
                    .iter()
                    .find(|name| !debts.iter().any(|d| &d.name == *name))
                {
                    Some(unknown) => Err(PlannerError::InvalidScenario(format!(
                        "unknown debt '{}' in affected_debts",
                        unknown
                    ))),
                    None => Ok(()),
                }
            }
        }
    }
}

/// Minimum payment of the consolidated loan:
/// `balance * apr / 12 * consolidation_min_payment_fraction`.
fn consolidated_min_payment(balance: f64, apr: f64, config: &PlannerConfig) -> f64 {
    balance * monthly_rate(apr) * config.consolidation_min_payment_fraction
}

/// Highest-APR debt that still has a balance; the first one wins ties.
fn highest_apr_active(debts: &[Debt]) -> Option<usize> {
    debts
        .iter()
        .enumerate()
        .filter(|(_, d)| d.is_active())
        .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
            Some((_, apr)) if apr >= d.apr => best,
            _ => Some((i, d.apr)),
        })
        .map(|(i, _)| i)
}

fn default_strategy() -> Strategy {
    Strategy::Avalanche
}

/// Input for a baseline-versus-scenario comparison.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WhatIfRequest {
    #[schemars(description = "The adjustment to evaluate against the baseline")]
    pub scenario: ScenarioModifier,

    #[schemars(description = "Monthly budget of the baseline plan")]
    pub base_budget: f64,

    #[serde(default = "default_strategy")]
    #[schemars(description = "Strategy used for both the baseline and the scenario")]
    pub base_strategy: Strategy,

    #[serde(default)]
    #[schemars(description = "Month cap for both simulations. Defaults to the configured horizon.")]
    pub analysis_months: Option<u32>,
}

impl WhatIfRequest {
    pub fn new(scenario: ScenarioModifier, base_budget: f64) -> Self {
        Self {
            scenario,
            base_budget,
            base_strategy: Strategy::Avalanche,
            analysis_months: None,
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.base_strategy = strategy;
        self
    }

    pub fn with_analysis_months(mut self, months: u32) -> Self {
        self.analysis_months = Some(months);
        self
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(WhatIfRequest)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}
