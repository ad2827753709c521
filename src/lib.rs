//! # Debt Repayment Planner
//!
//! A library for turning a set of debts and a monthly budget into a
//! month-by-month repayment plan, and for comparing how "what-if"
//! changes (extra payments, rate changes, consolidation, windfalls)
//! move the payoff date and total interest.
//!
//! ## Core Concepts
//!
//! - **Debt snapshot**: name, balance, APR (as a fraction) and minimum payment
//! - **Monthly allocation**: every active debt gets its minimum, the rest of the
//!   budget goes to debts in priority order (avalanche or snowball)
//! - **Simulation**: allocations are applied month after month until every
//!   balance is cleared or the horizon is reached
//! - **One-step optimal**: a single-month linear program minimising next
//!   month's interest, with a deterministic fallback when no solver is usable
//! - **Comparison**: baseline versus scenario deltas and insight text
//!
//! ## Example
//!
//! ```rust
//! use debt_repayment_planner::*;
//!
//! let debts = vec![
//!     Debt::new("Credit Card", 1000.0, 0.24, 30.0),
//!     Debt::new("Personal Loan", 500.0, 0.12, 20.0),
//! ];
//!
//! let planner = DebtPlanner::default();
//! let plan = planner
//!     .plan(&debts, &PlanRequest::new(Strategy::Avalanche, 100.0).with_max_months(60))
//!     .unwrap();
//!
//! assert!(plan.is_debt_free());
//! println!("Debt-free in {} months", plan.months_to_debt_free);
//! ```

pub mod allocation;
pub mod comparison;
pub mod config;
pub mod engine;
pub mod error;
pub mod ingestion;
pub mod insights;
pub mod optimizer;
pub mod reporting;
pub mod scenario;
pub mod schema;
pub mod summary;
pub mod utils;
pub mod validation;

pub use allocation::{allocate_month, Prioritization};
pub use comparison::{PlanSummary, ScenarioComparison, ScenarioDeltas, StrategyComparison};
pub use config::PlannerConfig;
pub use engine::{apply_month, compute_avalanche_plan, compute_snowball_plan, Simulator};
pub use error::{PlannerError, Result};
pub use ingestion::{debts_from_records, estimate_min_payment, DebtRecord};
pub use insights::generate_insights;
pub use optimizer::{
    one_step_optimal_allocation, BoundedGreedySolver, LinearProgram, OneStepOptimizer, Solver,
    SolverError, SolverOptions,
};
pub use reporting::{
    balance_series, payoff_date, schedule_records, schedule_rows, write_schedule_csv,
    ScheduleRecord, ScheduleRow,
};
pub use scenario::{ScenarioModifier, WhatIfRequest, ALL_DEBTS, CONSOLIDATED_DEBT_NAME};
pub use schema::*;
pub use summary::{BudgetCheck, DebtOverview, DebtSummary};
pub use validation::{validate_budget, validate_budget_and_aprs, validate_debts};

use log::info;

/// Entry point bundling configuration with an optional LP backend.
///
/// Each call works on its own copy of the debts, so one planner can serve
/// concurrent requests.
pub struct DebtPlanner {
    config: PlannerConfig,
    solver: Option<Box<dyn Solver + Send + Sync>>,
}

impl Default for DebtPlanner {
    fn default() -> Self {
        Self {
            config: PlannerConfig::default(),
            solver: Some(Box::new(BoundedGreedySolver)),
        }
    }
}

impl DebtPlanner {
    pub fn new(config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn with_solver(mut self, solver: Box<dyn Solver + Send + Sync>) -> Self {
        self.solver = Some(solver);
        self
    }

    /// Drops the solver; one-step requests then always use the fallback.
    pub fn without_solver(mut self) -> Self {
        self.solver = None;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    fn optimizer(&self) -> OneStepOptimizer<'_> {
        OneStepOptimizer::new(self.solver.as_deref().map(|s| s as &dyn Solver)).with_options(
            SolverOptions::with_time_limit_ms(self.config.solver_time_limit_ms),
        )
    }

    fn run_strategy(
        &self,
        debts: &[Debt],
        budget: f64,
        strategy: Strategy,
        max_months: u32,
    ) -> Result<RepaymentPlan> {
        match strategy.prioritization() {
            Some(rule) => Simulator::new(budget, max_months, rule).simulate(debts, strategy),
            None => self.optimizer().allocate(debts, budget),
        }
    }

    pub fn plan(&self, debts: &[Debt], request: &PlanRequest) -> Result<RepaymentPlan> {
        let max_months = self.config.resolve_horizon(request.max_months)?;
        info!(
            "Planning {} ({}) for {} debts: budget {:.2}, horizon {} months",
            request.strategy.display_name(),
            request.strategy,
            debts.len(),
            request.monthly_budget,
            max_months
        );
        self.run_strategy(debts, request.monthly_budget, request.strategy, max_months)
    }

    pub fn compare_strategies(
        &self,
        debts: &[Debt],
        monthly_budget: f64,
        max_months: Option<u32>,
    ) -> Result<StrategyComparison> {
        let max_months = self.config.resolve_horizon(max_months)?;
        info!(
            "Comparing strategies for {} debts: budget {:.2}, horizon {} months",
            debts.len(),
            monthly_budget,
            max_months
        );

        let avalanche = self.run_strategy(debts, monthly_budget, Strategy::Avalanche, max_months)?;
        let snowball = self.run_strategy(debts, monthly_budget, Strategy::Snowball, max_months)?;
        let optimal =
            self.run_strategy(debts, monthly_budget, Strategy::OneStepOptimal, max_months)?;

        Ok(StrategyComparison::new(avalanche, snowball, optimal))
    }

    pub fn what_if(&self, debts: &[Debt], request: &WhatIfRequest) -> Result<ScenarioComparison> {
        let max_months = self.config.resolve_horizon(request.analysis_months)?;
        info!(
            "What-if {:?} on {} debts: base budget {:.2}, strategy {}",
            request.scenario,
            debts.len(),
            request.base_budget,
            request.base_strategy
        );

        let baseline_plan = self.run_strategy(
            debts,
            request.base_budget,
            request.base_strategy,
            max_months,
        )?;
        let baseline = PlanSummary::from_plan(debts, baseline_plan);

        let (scenario_debts, scenario_budget) =
            request
                .scenario
                .apply(debts, request.base_budget, &self.config)?;
        let scenario_plan = self.run_strategy(
            &scenario_debts,
            scenario_budget,
            request.base_strategy,
            max_months,
        )?;
        let scenario = PlanSummary::from_plan(&scenario_debts, scenario_plan);

        let insights = generate_insights(&baseline, &scenario, &request.scenario, &self.config);
        Ok(ScenarioComparison::new(baseline, scenario, insights))
    }

    pub fn summarize(&self, debts: &[Debt], available_budget: Option<f64>) -> DebtSummary {
        DebtSummary::from_debts(debts, available_budget)
    }

    pub fn check_budget(&self, debts: &[Debt], monthly_budget: f64) -> BudgetCheck {
        BudgetCheck::evaluate(debts, monthly_budget, &self.config)
    }
}
