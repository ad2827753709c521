use crate::allocation::Prioritization;
use crate::utils::{monthly_rate, CLEARED_EPSILON};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[schemars(
        description = "Pay minimums everywhere, then send all extra budget to the highest-APR debt (smaller balance wins ties)."
    )]
    Avalanche,

    #[schemars(
        description = "Pay minimums everywhere, then send all extra budget to the smallest balance (higher APR wins ties)."
    )]
    Snowball,

    #[serde(alias = "optimal")]
    #[schemars(
        description = "Single-month allocation that minimises next month's projected interest. Not a multi-month payoff simulation."
    )]
    OneStepOptimal,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::Avalanche,
        Strategy::Snowball,
        Strategy::OneStepOptimal,
    ];

    /// The month-by-month prioritization rule, if this strategy is simulated.
    pub fn prioritization(&self) -> Option<Prioritization> {
        match self {
            Strategy::Avalanche => Some(Prioritization::Avalanche),
            Strategy::Snowball => Some(Prioritization::Snowball),
            Strategy::OneStepOptimal => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Strategy::Avalanche => "Debt Avalanche",
            Strategy::Snowball => "Debt Snowball",
            Strategy::OneStepOptimal => "Mathematical Optimal",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Strategy::Avalanche => "avalanche",
            Strategy::Snowball => "snowball",
            Strategy::OneStepOptimal => "one_step_optimal",
        };
        write!(f, "{}", tag)
    }
}

/// Snapshot of one debt. Simulations clone these and never touch the caller's copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Debt {
    #[schemars(description = "Identifier, unique within one debt list. Used to join allocations.")]
    pub name: String,

    #[schemars(description = "Outstanding balance in currency units. Must be non-negative.")]
    pub balance: f64,

    #[schemars(description = "Annual percentage rate as a fraction, e.g. 0.24 for 24%.")]
    pub apr: f64,

    #[schemars(
        description = "Amount that must be paid each month while the balance is positive."
    )]
    pub min_payment: f64,
}

impl Debt {
    pub fn new(name: impl Into<String>, balance: f64, apr: f64, min_payment: f64) -> Self {
        Self {
            name: name.into(),
            balance,
            apr,
            min_payment,
        }
    }

    pub fn monthly_rate(&self) -> f64 {
        monthly_rate(self.apr)
    }

    /// Interest accrued on the current balance over one month.
    pub fn monthly_interest(&self) -> f64 {
        if self.is_active() {
            self.balance * self.monthly_rate()
        } else {
            0.0
        }
    }

    /// Balance plus this month's interest: the most that can be paid this month.
    pub fn amount_owed(&self) -> f64 {
        self.balance + self.monthly_interest()
    }

    pub fn is_active(&self) -> bool {
        self.balance > CLEARED_EPSILON
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Allocation {
    pub name: String,
    pub payment: f64,
    pub interest_accrued: f64,
    pub principal_reduction: f64,
}

impl Allocation {
    pub fn new(name: impl Into<String>, payment: f64, interest_accrued: f64) -> Self {
        Self {
            name: name.into(),
            payment,
            interest_accrued,
            principal_reduction: (payment - interest_accrued).max(0.0),
        }
    }

    pub fn zero(name: impl Into<String>) -> Self {
        Self::new(name, 0.0, 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RepaymentMonth {
    /// 1-based.
    pub month_index: u32,
    pub allocations: Vec<Allocation>,
    pub total_interest: f64,
    pub total_paid: f64,
}

impl RepaymentMonth {
    pub fn from_allocations(month_index: u32, allocations: Vec<Allocation>) -> Self {
        let total_interest = allocations.iter().map(|a| a.interest_accrued).sum();
        let total_paid = allocations.iter().map(|a| a.payment).sum();
        Self {
            month_index,
            allocations,
            total_interest,
            total_paid,
        }
    }

    pub fn total_principal(&self) -> f64 {
        self.allocations.iter().map(|a| a.principal_reduction).sum()
    }

    pub fn allocation(&self, name: &str) -> Option<&Allocation> {
        self.allocations.iter().find(|a| a.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Every debt reached the cleared epsilon (possibly before month 1).
    DebtFree,
    /// The month cap was hit with balance still outstanding.
    HorizonReached,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RepaymentPlan {
    pub strategy: Strategy,
    pub months: Vec<RepaymentMonth>,
    pub total_interest_paid: f64,
    /// Months simulated. Zero when the debts were already clear.
    pub months_to_debt_free: u32,
    pub status: PlanStatus,
    /// Sum of balances after the last simulated month.
    pub remaining_balance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

impl RepaymentPlan {
    pub fn new(
        strategy: Strategy,
        months: Vec<RepaymentMonth>,
        status: PlanStatus,
        remaining_balance: f64,
    ) -> Self {
        let total_interest_paid = months.iter().map(|m| m.total_interest).sum();
        Self {
            strategy,
            months_to_debt_free: months.len() as u32,
            months,
            total_interest_paid,
            status,
            remaining_balance,
            fallback_reason: None,
        }
    }

    /// A plan for a debt list with nothing left to pay.
    pub fn already_clear(strategy: Strategy, remaining_balance: f64) -> Self {
        Self::new(strategy, Vec::new(), PlanStatus::DebtFree, remaining_balance)
    }

    pub fn total_paid(&self) -> f64 {
        self.months.iter().map(|m| m.total_paid).sum()
    }

    pub fn is_debt_free(&self) -> bool {
        self.status == PlanStatus::DebtFree
    }
}

/// Input for a single plan computation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PlanRequest {
    #[schemars(description = "Allocation strategy to simulate")]
    pub strategy: Strategy,

    #[schemars(description = "Total amount available for debt payments each month")]
    pub monthly_budget: f64,

    #[serde(default)]
    #[schemars(
        description = "Month cap for the simulation. Falls back to the configured default horizon when omitted."
    )]
    pub max_months: Option<u32>,
}

impl PlanRequest {
    pub fn new(strategy: Strategy, monthly_budget: f64) -> Self {
        Self {
            strategy,
            monthly_budget,
            max_months: None,
        }
    }

    pub fn with_max_months(mut self, months: u32) -> Self {
        self.max_months = Some(months);
        self
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(PlanRequest)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_generation() {
        let schema_json = PlanRequest::schema_as_json().unwrap();
        assert!(schema_json.contains("monthly_budget"));
        assert!(schema_json.contains("max_months"));
        assert!(schema_json.contains("one_step_optimal"));
    }

    #[test]
    fn test_strategy_accepts_optimal_alias() {
        let strategy: Strategy = serde_json::from_str("\"optimal\"").unwrap();
        assert_eq!(strategy, Strategy::OneStepOptimal);

        let json = serde_json::to_string(&Strategy::OneStepOptimal).unwrap();
        assert_eq!(json, "\"one_step_optimal\"");
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(Strategy::Avalanche.display_name(), "Debt Avalanche");
        assert_eq!(Strategy::OneStepOptimal.display_name(), "Mathematical Optimal");
        assert_eq!(Strategy::Snowball.to_string(), "snowball");
    }

    #[test]
    fn test_allocation_principal_is_floored() {
        let alloc = Allocation::new("Card", 10.0, 25.0);
        assert_eq!(alloc.principal_reduction, 0.0);

        let alloc = Allocation::new("Card", 200.0, 24.0);
        assert!((alloc.principal_reduction - 176.0).abs() < 1e-9);
    }

    #[test]
    fn test_cleared_debt_accrues_nothing() {
        let debt = Debt::new("Loan", 0.005, 0.24, 50.0);
        assert!(!debt.is_active());
        assert_eq!(debt.monthly_interest(), 0.0);
    }

    #[test]
    fn test_plan_serialization_skips_missing_fallback() {
        let plan = RepaymentPlan::already_clear(Strategy::Avalanche, 0.0);
        let json = serde_json::to_string(&plan).unwrap();
        assert!(!json.contains("fallback_reason"));
        assert!(json.contains("\"status\":\"debt_free\""));

        let back: RepaymentPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }
}
