use crate::allocation::{allocate_month, Prioritization};
use crate::error::Result;
use crate::schema::*;
use crate::utils::{is_all_cleared, total_balance};
use crate::validation::validate_budget_and_aprs;
use log::debug;

/// Drives the month-by-month simulation for one prioritization rule.
pub struct Simulator {
    budget: f64,
    max_months: u32,
    rule: Prioritization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SimulationState {
    Running,
    Cleared,
    HorizonReached,
}

impl Simulator {
    pub fn new(budget: f64, max_months: u32, rule: Prioritization) -> Self {
        Self {
            budget,
            max_months,
            rule,
        }
    }

    /// Runs until every debt is cleared or the month cap is hit.
    ///
    /// `debts` is copied up front; the caller's snapshot is never touched.
    pub fn simulate(&self, debts: &[Debt], strategy: Strategy) -> Result<RepaymentPlan> {
        validate_budget_and_aprs(debts, self.budget)?;

        let mut ledger = debts.to_vec();
        let mut months: Vec<RepaymentMonth> = Vec::new();
        let mut state = SimulationState::Running;

        while state == SimulationState::Running {
            state = if is_all_cleared(&ledger) {
                SimulationState::Cleared
            } else if months.len() as u32 >= self.max_months {
                SimulationState::HorizonReached
            } else {
                let month = self.step(&mut ledger, months.len() as u32 + 1);
                debug!(
                    "{} month {}: paid {:.2}, interest {:.2}, remaining {:.2}",
                    strategy,
                    month.month_index,
                    month.total_paid,
                    month.total_interest,
                    total_balance(&ledger)
                );
                months.push(month);
                SimulationState::Running
            };
        }

        let status = match state {
            SimulationState::HorizonReached => PlanStatus::HorizonReached,
            _ => PlanStatus::DebtFree,
        };
        debug!(
            "{} simulation finished after {} months ({:?})",
            strategy,
            months.len(),
            status
        );

        Ok(RepaymentPlan::new(
            strategy,
            months,
            status,
            total_balance(&ledger),
        ))
    }

    fn step(&self, ledger: &mut [Debt], month_index: u32) -> RepaymentMonth {
        let allocations = allocate_month(ledger, self.budget, self.rule);
        apply_month(ledger, &allocations);
        RepaymentMonth::from_allocations(month_index, allocations)
    }
}

/// Applies one month's allocations to the balances, index-aligned.
///
/// `new_balance = max(0, balance + interest - min(payment, balance + interest))`.
pub fn apply_month(ledger: &mut [Debt], allocations: &[Allocation]) {
    for (debt, alloc) in ledger.iter_mut().zip(allocations) {
        let owed = debt.balance + alloc.interest_accrued;
        let payment = alloc.payment.max(0.0).min(owed);
        debt.balance = (owed - payment).max(0.0);
    }
}

pub fn compute_avalanche_plan(
    debts: &[Debt],
    budget: f64,
    max_months: u32,
) -> Result<RepaymentPlan> {
    Simulator::new(budget, max_months, Prioritization::Avalanche)
        .simulate(debts, Strategy::Avalanche)
}

pub fn compute_snowball_plan(
    debts: &[Debt],
    budget: f64,
    max_months: u32,
) -> Result<RepaymentPlan> {
    Simulator::new(budget, max_months, Prioritization::Snowball).simulate(debts, Strategy::Snowball)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;

    #[test]
    fn test_single_debt_first_month() {
        let debts = vec![Debt::new("Card", 1200.0, 0.24, 50.0)];
        let plan = compute_avalanche_plan(&debts, 200.0, 12).unwrap();

        let first = &plan.months[0];
        assert_eq!(first.month_index, 1);
        assert!((first.total_interest - 24.0).abs() < 1e-9);
        assert!((first.total_paid - 200.0).abs() < 1e-9);
        assert!((first.allocations[0].principal_reduction - 176.0).abs() < 1e-9);

        let mut ledger = debts.clone();
        apply_month(&mut ledger, &first.allocations);
        assert!((ledger[0].balance - 1024.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_debt_pays_off() {
        let debts = vec![Debt::new("Card", 1200.0, 0.24, 50.0)];
        let plan = compute_avalanche_plan(&debts, 200.0, 12).unwrap();

        assert_eq!(plan.status, PlanStatus::DebtFree);
        assert_eq!(plan.months_to_debt_free, 7);
        assert_eq!(plan.months.len(), 7);
        assert!(plan.remaining_balance <= 0.01);

        let indices: Vec<u32> = plan.months.iter().map(|m| m.month_index).collect();
        assert_eq!(indices, (1..=7).collect::<Vec<u32>>());
    }

    #[test]
    fn test_horizon_reached() {
        let debts = vec![Debt::new("Loan", 10_000.0, 0.18, 200.0)];
        let plan = compute_avalanche_plan(&debts, 200.0, 6).unwrap();

        assert_eq!(plan.status, PlanStatus::HorizonReached);
        assert_eq!(plan.months_to_debt_free, 6);
        assert!(plan.remaining_balance > 9000.0);
    }

    #[test]
    fn test_already_clear_is_zero_months() {
        let debts = vec![Debt::new("Paid", 0.0, 0.2, 30.0)];
        let plan = compute_snowball_plan(&debts, 100.0, 12).unwrap();

        assert!(plan.months.is_empty());
        assert_eq!(plan.months_to_debt_free, 0);
        assert_eq!(plan.status, PlanStatus::DebtFree);
        assert_eq!(plan.total_interest_paid, 0.0);
    }

    #[test]
    fn test_invalid_budget_is_an_error() {
        let debts = vec![
            Debt::new("A", 1000.0, 0.24, 30.0),
            Debt::new("B", 500.0, 0.12, 20.0),
        ];
        let result = compute_avalanche_plan(&debts, 10.0, 12);
        assert!(matches!(
            result,
            Err(PlannerError::InsufficientBudget { .. })
        ));
    }

    #[test]
    fn test_caller_snapshot_untouched() {
        let debts = vec![Debt::new("Card", 1200.0, 0.24, 50.0)];
        let before = debts.clone();
        compute_avalanche_plan(&debts, 200.0, 12).unwrap();
        assert_eq!(debts, before);
    }

    #[test]
    fn test_apply_month_caps_overpayment() {
        let mut ledger = vec![Debt::new("Card", 100.0, 0.12, 10.0)];
        let allocs = vec![Allocation::new("Card", 500.0, 1.0)];
        apply_month(&mut ledger, &allocs);
        assert_eq!(ledger[0].balance, 0.0);
    }

    #[test]
    fn test_total_interest_matches_months() {
        let debts = vec![
            Debt::new("A", 1000.0, 0.24, 30.0),
            Debt::new("B", 500.0, 0.12, 20.0),
        ];
        let plan = compute_snowball_plan(&debts, 100.0, 60).unwrap();
        let summed: f64 = plan.months.iter().map(|m| m.total_interest).sum();
        assert!((plan.total_interest_paid - summed).abs() < 1e-9);
    }
}
