//! Flattening helpers that turn a plan into tables and series for display.
//!
//! Plans only carry payments and interest, so anything involving balances
//! is replayed from the initial debt snapshot the plan was computed on.

use crate::engine::apply_month;
use crate::error::Result;
use crate::schema::{Allocation, Debt, RepaymentMonth, RepaymentPlan};
use crate::utils::{months_after, total_balance};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    /// Month end this payment falls in, when a start month was supplied.
    pub period_end: Option<NaiveDate>,
    pub total_payment: f64,
    pub total_interest: f64,
    pub total_principal: f64,
    pub remaining_balance: f64,
    pub allocations: Vec<Allocation>,
}

/// One row per debt per month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub month: u32,
    pub debt: String,
    pub payment: f64,
    pub interest_accrued: f64,
    pub principal_reduction: f64,
    pub remaining_balance: f64,
}

/// Allocations of `month` re-ordered to line up with `ledger`, joined by name.
fn aligned_allocations(ledger: &[Debt], month: &RepaymentMonth) -> Vec<Allocation> {
    ledger
        .iter()
        .map(|debt| {
            month
                .allocation(&debt.name)
                .cloned()
                .unwrap_or_else(|| Allocation::zero(debt.name.clone()))
        })
        .collect()
}

/// Replays `plan` over `initial`, yielding the ledger after each month.
fn replay<'a>(
    initial: &'a [Debt],
    plan: &'a RepaymentPlan,
) -> impl Iterator<Item = (&'a RepaymentMonth, Vec<Debt>)> + 'a {
    let mut ledger = initial.to_vec();
    plan.months.iter().map(move |month| {
        let allocations = aligned_allocations(&ledger, month);
        apply_month(&mut ledger, &allocations);
        (month, ledger.clone())
    })
}

/// Total balance before month 1 followed by the total after every month.
pub fn balance_series(initial: &[Debt], plan: &RepaymentPlan) -> Vec<f64> {
    std::iter::once(total_balance(initial))
        .chain(replay(initial, plan).map(|(_, ledger)| total_balance(&ledger)))
        .collect()
}

pub fn schedule_rows(
    initial: &[Debt],
    plan: &RepaymentPlan,
    start_month: Option<NaiveDate>,
) -> Vec<ScheduleRow> {
    replay(initial, plan)
        .map(|(month, ledger)| ScheduleRow {
            month: month.month_index,
            period_end: start_month
                .and_then(|start| months_after(start, month.month_index.saturating_sub(1))),
            total_payment: month.total_paid,
            total_interest: month.total_interest,
            total_principal: month.total_principal(),
            remaining_balance: total_balance(&ledger),
            allocations: month.allocations.clone(),
        })
        .collect()
}

pub fn schedule_records(initial: &[Debt], plan: &RepaymentPlan) -> Vec<ScheduleRecord> {
    replay(initial, plan)
        .flat_map(|(month, ledger)| {
            month
                .allocations
                .iter()
                .map(|alloc| ScheduleRecord {
                    month: month.month_index,
                    debt: alloc.name.clone(),
                    payment: alloc.payment,
                    interest_accrued: alloc.interest_accrued,
                    principal_reduction: alloc.principal_reduction,
                    remaining_balance: ledger
                        .iter()
                        .find(|d| d.name == alloc.name)
                        .map(|d| d.balance)
                        .unwrap_or(0.0),
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Writes `records` as CSV with a header row.
pub fn write_schedule_csv<W: Write>(records: &[ScheduleRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Month end in which the last payment lands, counting `start` as month 1.
///
/// `None` when the plan stopped at its horizon with balance outstanding.
pub fn payoff_date(start: NaiveDate, plan: &RepaymentPlan) -> Option<NaiveDate> {
    if !plan.is_debt_free() {
        return None;
    }
    if plan.months.is_empty() {
        return Some(start);
    }
    months_after(start, plan.months_to_debt_free - 1)
}
