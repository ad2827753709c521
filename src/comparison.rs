use crate::reporting::balance_series;
use crate::schema::{Debt, RepaymentPlan, Strategy};
use serde::{Deserialize, Serialize};

/// Headline numbers for one side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub months: u32,
    pub total_interest: f64,
    pub total_payments: f64,
    pub balance_series: Vec<f64>,
    pub plan: RepaymentPlan,
}

impl PlanSummary {
    /// `debts` must be the snapshot `plan` was computed on.
    pub fn from_plan(debts: &[Debt], plan: RepaymentPlan) -> Self {
        Self {
            months: plan.months.len() as u32,
            total_interest: plan.months.iter().map(|m| m.total_interest).sum(),
            total_payments: plan.total_paid(),
            balance_series: balance_series(debts, &plan),
            plan,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDeltas {
    /// Positive when the scenario pays less interest.
    pub interest_savings: f64,
    /// Positive when the scenario finishes sooner.
    pub months_saved: i64,
    /// Positive when the scenario pays more in total.
    pub payment_difference: f64,
}

impl ScenarioDeltas {
    pub fn between(baseline: &PlanSummary, scenario: &PlanSummary) -> Self {
        Self {
            interest_savings: baseline.total_interest - scenario.total_interest,
            months_saved: baseline.months as i64 - scenario.months as i64,
            payment_difference: scenario.total_payments - baseline.total_payments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub baseline: PlanSummary,
    pub scenario: PlanSummary,
    pub interest_savings: f64,
    pub months_saved: i64,
    pub payment_difference: f64,
    pub insights: Vec<String>,
}

impl ScenarioComparison {
    pub fn new(baseline: PlanSummary, scenario: PlanSummary, insights: Vec<String>) -> Self {
        let deltas = ScenarioDeltas::between(&baseline, &scenario);
        Self {
            baseline,
            scenario,
            interest_savings: deltas.interest_savings,
            months_saved: deltas.months_saved,
            payment_difference: deltas.payment_difference,
            insights,
        }
    }

    pub fn deltas(&self) -> ScenarioDeltas {
        ScenarioDeltas {
            interest_savings: self.interest_savings,
            months_saved: self.months_saved,
            payment_difference: self.payment_difference,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub avalanche: RepaymentPlan,
    pub snowball: RepaymentPlan,
    pub optimal: RepaymentPlan,
    pub best_strategy: Strategy,
}

impl StrategyComparison {
    /// Picks the plan with the lowest total interest; earlier entries in
    /// avalanche, snowball, optimal order win ties.
    pub fn new(avalanche: RepaymentPlan, snowball: RepaymentPlan, optimal: RepaymentPlan) -> Self {
        let best_strategy = [&avalanche, &snowball, &optimal]
            .into_iter()
            .fold(None, |best: Option<&RepaymentPlan>, plan| match best {
                Some(current) if current.total_interest_paid <= plan.total_interest_paid => {
                    Some(current)
                }
                _ => Some(plan),
            })
            .map(|plan| plan.strategy)
            .unwrap_or(Strategy::Avalanche);

        Self {
            avalanche,
            snowball,
            optimal,
            best_strategy,
        }
    }

    pub fn plan(&self, strategy: Strategy) -> &RepaymentPlan {
        match strategy {
            Strategy::Avalanche => &self.avalanche,
            Strategy::Snowball => &self.snowball,
            Strategy::OneStepOptimal => &self.optimal,
        }
    }
}
