use crate::config::PlannerConfig;
use crate::schema::Debt;
use crate::utils::{format_currency, total_balance, total_minimum_payments};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtOverview {
    pub name: String,
    pub balance: f64,
    pub apr: f64,
    pub min_payment: f64,
    pub monthly_interest: f64,
}

/// Portfolio-level view of a debt list, used to size a budget before planning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtSummary {
    pub total_debt: f64,
    pub monthly_minimums: f64,
    /// Balance-weighted APR, as a fraction. Zero when there is no balance.
    pub weighted_apr: f64,
    pub monthly_interest: f64,
    pub debt_count: usize,
    pub available_budget: Option<f64>,
    pub debts: Vec<DebtOverview>,
}

impl DebtSummary {
    pub fn from_debts(debts: &[Debt], available_budget: Option<f64>) -> Self {
        let total_debt = total_balance(debts);
        let weighted_apr = if total_debt > 0.0 {
            debts
                .iter()
                .map(|d| d.apr.max(0.0) * d.balance.max(0.0))
                .sum::<f64>()
                / total_debt
        } else {
            0.0
        };

        let mut overviews: Vec<DebtOverview> = debts
            .iter()
            .map(|d| DebtOverview {
                name: d.name.clone(),
                balance: d.balance,
                apr: d.apr,
                min_payment: d.min_payment,
                monthly_interest: d.monthly_interest(),
            })
            .collect();
        overviews.sort_by(|a, b| b.apr.total_cmp(&a.apr).then_with(|| a.name.cmp(&b.name)));

        Self {
            total_debt,
            monthly_minimums: total_minimum_payments(debts),
            weighted_apr,
            monthly_interest: overviews.iter().map(|o| o.monthly_interest).sum(),
            debt_count: debts.len(),
            available_budget,
            debts: overviews,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCheck {
    pub monthly_budget: f64,
    pub minimum_required: f64,
    pub is_valid: bool,
    /// Budget left for extra payments once minimums are covered.
    pub excess_budget: f64,
    pub shortfall: f64,
    pub message: String,
}

impl BudgetCheck {
    pub fn evaluate(debts: &[Debt], monthly_budget: f64, config: &PlannerConfig) -> Self {
        let minimum_required = total_minimum_payments(debts);
        let is_valid = monthly_budget >= 0.0 && monthly_budget >= minimum_required;

        let (excess_budget, shortfall, message) = if is_valid {
            (
                monthly_budget - minimum_required,
                0.0,
                "Budget covers minimums".to_string(),
            )
        } else {
            let shortfall = minimum_required - monthly_budget;
            (
                0.0,
                shortfall,
                format!(
                    "Budget is {} short",
                    format_currency(shortfall, &config.currency_symbol)
                ),
            )
        };

        Self {
            monthly_budget,
            minimum_required,
            is_valid,
            excess_budget,
            shortfall,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debts() -> Vec<Debt> {
        vec![
            Debt::new("Card", 1000.0, 0.24, 30.0),
            Debt::new("Loan", 3000.0, 0.08, 90.0),
            Debt::new("Paid", 0.0, 0.30, 25.0),
        ]
    }

    #[test]
    fn test_summary_totals() {
        let summary = DebtSummary::from_debts(&debts(), Some(500.0));

        assert!((summary.total_debt - 4000.0).abs() < 1e-9);
        assert!((summary.monthly_minimums - 120.0).abs() < 1e-9);
        // (0.24 * 1000 + 0.08 * 3000) / 4000
        assert!((summary.weighted_apr - 0.12).abs() < 1e-12);
        assert!((summary.monthly_interest - 40.0).abs() < 1e-9);
        assert_eq!(summary.debt_count, 3);
        assert_eq!(summary.available_budget, Some(500.0));
        assert_eq!(summary.debts[0].name, "Paid");
        assert_eq!(summary.debts[1].name, "Card");
    }

    #[test]
    fn test_empty_summary() {
        let summary = DebtSummary::from_debts(&[], None);
        assert_eq!(summary.total_debt, 0.0);
        assert_eq!(summary.weighted_apr, 0.0);
        assert!(summary.debts.is_empty());
    }

    #[test]
    fn test_budget_check() {
        let config = PlannerConfig::default();

        let ok = BudgetCheck::evaluate(&debts(), 200.0, &config);
        assert!(ok.is_valid);
        assert!((ok.excess_budget - 80.0).abs() < 1e-9);
        assert_eq!(ok.message, "Budget covers minimums");

        let short = BudgetCheck::evaluate(&debts(), 100.0, &config);
        assert!(!short.is_valid);
        assert!((short.shortfall - 20.0).abs() < 1e-9);
        assert_eq!(short.message, "Budget is ₹20 short");
    }
}
