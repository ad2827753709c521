use crate::error::{PlannerError, Result};
use crate::schema::Debt;
use crate::utils::total_minimum_payments;
use std::collections::HashSet;

/// Checks a debt list on its own: names unique, balances and minimums
/// non-negative, APRs present and non-negative.
pub fn validate_debts(debts: &[Debt]) -> Result<()> {
    let mut seen = HashSet::new();

    for debt in debts {
        if !seen.insert(debt.name.as_str()) {
            return Err(PlannerError::DuplicateDebtName(debt.name.clone()));
        }

        if !debt.apr.is_finite() || debt.apr < 0.0 {
            return Err(PlannerError::InvalidApr(debt.name.clone()));
        }

        if !debt.balance.is_finite() || debt.balance < 0.0 {
            return Err(PlannerError::InvalidBalance {
                name: debt.name.clone(),
                balance: debt.balance,
            });
        }

        if !debt.min_payment.is_finite() || debt.min_payment < 0.0 {
            return Err(PlannerError::InvalidMinPayment {
                name: debt.name.clone(),
                min_payment: debt.min_payment,
            });
        }
    }

    Ok(())
}

/// Budget feasibility: non-negative and large enough to cover every
/// active debt's minimum payment.
pub fn validate_budget(debts: &[Debt], budget: f64) -> Result<()> {
    if budget.is_nan() || budget < 0.0 {
        return Err(PlannerError::NegativeBudget(budget));
    }

    let required = total_minimum_payments(debts);
    if required > 0.0 && budget < required {
        return Err(PlannerError::InsufficientBudget { budget, required });
    }

    Ok(())
}

pub fn validate_budget_and_aprs(debts: &[Debt], budget: f64) -> Result<()> {
    validate_budget(debts, budget)?;
    validate_debts(debts)
}
