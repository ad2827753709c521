use crate::comparison::{PlanSummary, ScenarioDeltas};
use crate::config::PlannerConfig;
use crate::scenario::ScenarioModifier;
use crate::utils::format_currency;

/// Human-readable takeaways for a baseline/scenario pair.
pub fn generate_insights(
    baseline: &PlanSummary,
    scenario: &PlanSummary,
    modifier: &ScenarioModifier,
    config: &PlannerConfig,
) -> Vec<String> {
    let deltas = ScenarioDeltas::between(baseline, scenario);
    let symbol = config.currency_symbol.as_str();
    let mut insights = Vec::new();

    if scenario.months == 0 && baseline.months > 0 {
        insights.push("This scenario clears all debts immediately".to_string());
    } else if deltas.months_saved > 0 {
        insights.push(format!(
            "You could be debt-free {} months ({:.1} years) earlier",
            deltas.months_saved,
            deltas.months_saved as f64 / 12.0
        ));
    } else if deltas.months_saved < 0 {
        let longer = deltas.months_saved.unsigned_abs();
        insights.push(format!(
            "This scenario extends debt payoff by {} months ({:.1} years)",
            longer,
            longer as f64 / 12.0
        ));
    }

    if deltas.interest_savings > config.insight_threshold {
        insights.push(format!(
            "Total interest savings: {}",
            format_currency(deltas.interest_savings, symbol)
        ));
    } else if deltas.interest_savings < -config.insight_threshold {
        insights.push(format!(
            "Additional interest cost: {}",
            format_currency(deltas.interest_savings.abs(), symbol)
        ));
    }

    if let ScenarioModifier::ExtraPayment { amount } = modifier {
        if *amount > 0.0 && deltas.interest_savings > 0.0 && scenario.months > 0 {
            let per_unit = deltas.interest_savings / (amount * scenario.months as f64);
            insights.push(format!(
                "ROI: Every extra {}1 saves {}{:.2}",
                symbol, symbol, per_unit
            ));
        }
    }

    if !scenario.plan.is_debt_free() {
        insights.push(format!(
            "Debts are not fully repaid within {} months; {} would remain",
            scenario.months,
            format_currency(scenario.plan.remaining_balance, symbol)
        ));
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PlanStatus, RepaymentMonth, RepaymentPlan, Strategy};

    fn summary(months: u32, total_interest: f64, status: PlanStatus) -> PlanSummary {
        let month_list = (1..=months)
            .map(|i| RepaymentMonth::from_allocations(i, vec![]))
            .collect();
        let remaining = if status == PlanStatus::DebtFree { 0.0 } else { 2500.0 };
        PlanSummary {
            months,
            total_interest,
            total_payments: 0.0,
            balance_series: vec![],
            plan: RepaymentPlan::new(Strategy::Avalanche, month_list, status, remaining),
        }
    }

    #[test]
    fn test_earlier_payoff_and_savings() {
        let insights = generate_insights(
            &summary(36, 9000.0, PlanStatus::DebtFree),
            &summary(24, 5500.0, PlanStatus::DebtFree),
            &ScenarioModifier::ExtraPayment { amount: 100.0 },
            &PlannerConfig::default(),
        );

        assert_eq!(
            insights,
            vec![
                "You could be debt-free 12 months (1.0 years) earlier".to_string(),
                "Total interest savings: ₹3,500".to_string(),
                "ROI: Every extra ₹1 saves ₹1.46".to_string(),
            ]
        );
    }

    #[test]
    fn test_longer_payoff_and_cost() {
        let insights = generate_insights(
            &summary(24, 4000.0, PlanStatus::DebtFree),
            &summary(30, 6000.0, PlanStatus::DebtFree),
            &ScenarioModifier::BudgetReduction { amount: 50.0 },
            &PlannerConfig::default(),
        );

        assert_eq!(
            insights,
            vec![
                "This scenario extends debt payoff by 6 months (0.5 years)".to_string(),
                "Additional interest cost: ₹2,000".to_string(),
            ]
        );
    }

    #[test]
    fn test_small_deltas_are_quiet() {
        let insights = generate_insights(
            &summary(24, 4000.0, PlanStatus::DebtFree),
            &summary(24, 3900.0, PlanStatus::DebtFree),
            &ScenarioModifier::Windfall { amount: 50.0 },
            &PlannerConfig::default(),
        );
        assert!(insights.is_empty());
    }

    #[test]
    fn test_immediate_clear_and_unfinished_scenarios() {
        let cleared = generate_insights(
            &summary(10, 500.0, PlanStatus::DebtFree),
            &summary(0, 0.0, PlanStatus::DebtFree),
            &ScenarioModifier::Windfall { amount: 5000.0 },
            &PlannerConfig::default(),
        );
        assert_eq!(cleared[0], "This scenario clears all debts immediately");

        let unfinished = generate_insights(
            &summary(12, 500.0, PlanStatus::HorizonReached),
            &summary(12, 700.0, PlanStatus::HorizonReached),
            &ScenarioModifier::BudgetReduction { amount: 10.0 },
            &PlannerConfig::default(),
        );
        assert_eq!(
            unfinished,
            vec!["Debts are not fully repaid within 12 months; ₹2,500 would remain".to_string()]
        );
    }
}
