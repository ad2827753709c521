//! Monthly allocation engine.
//!
//! One month of payments is split in two passes: every active debt first
//! receives its minimum payment (capped at what it owes), then whatever is
//! left of the budget walks the debts in priority order, topping each one
//! up to its full amount owed before moving to the next.

use crate::schema::{Allocation, Debt};
use crate::utils::total_minimum_payments;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Ordering rule for extra payments. Avalanche and snowball share the
/// budget-splitting loop in [`allocate_month`] and differ only here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Prioritization {
    /// Descending APR, then ascending balance.
    Avalanche,
    /// Ascending balance, then descending APR.
    Snowball,
}

impl Prioritization {
    /// Indices of the active debts, highest priority first.
    ///
    /// The sort is stable, so debts with identical keys keep input order.
    pub fn prioritize(&self, debts: &[Debt]) -> Vec<usize> {
        let mut order: Vec<usize> = debts
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_active())
            .map(|(i, _)| i)
            .collect();

        order.sort_by(|&a, &b| self.compare(&debts[a], &debts[b]));
        order
    }

    fn compare(&self, a: &Debt, b: &Debt) -> Ordering {
        match self {
            Prioritization::Avalanche => b
                .apr
                .total_cmp(&a.apr)
                .then_with(|| a.balance.total_cmp(&b.balance)),
            Prioritization::Snowball => a
                .balance
                .total_cmp(&b.balance)
                .then_with(|| b.apr.total_cmp(&a.apr)),
        }
    }
}

/// Splits `budget` across `debts` for one month.
///
/// The result is index-aligned with `debts` and has one entry per debt;
/// cleared debts get an all-zero allocation. Interest is computed on the
/// balance before any payment, so extra payments never change it.
pub fn allocate_month(debts: &[Debt], budget: f64, rule: Prioritization) -> Vec<Allocation> {
    let mut allocations: Vec<Allocation> = debts
        .iter()
        .map(|debt| {
            if debt.is_active() {
                let payment = debt.amount_owed().min(debt.min_payment);
                Allocation::new(debt.name.clone(), payment, debt.monthly_interest())
            } else {
                Allocation::zero(debt.name.clone())
            }
        })
        .collect();

    let mut remaining = (budget - total_minimum_payments(debts)).max(0.0);

    for idx in rule.prioritize(debts) {
        if remaining <= 0.0 {
            break;
        }

        let due = (debts[idx].amount_owed() - allocations[idx].payment).max(0.0);
        let extra = remaining.min(due);
        allocations[idx].payment += extra;
        remaining -= extra;
    }

    for (alloc, debt) in allocations.iter_mut().zip(debts) {
        alloc.interest_accrued = debt.monthly_interest();
        alloc.principal_reduction = (alloc.payment - alloc.interest_accrued).max(0.0);
    }

    allocations
}
