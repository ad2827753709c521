//! One-step optimal allocation.
//!
//! For a single month, choose payments `p_i` that minimise next month's
//! projected interest `sum((owed_i - p_i) * r_i)` subject to
//! `sum(p_i) <= budget` and `min_i <= p_i <= owed_i`. The solver is an
//! injected capability; when it is missing or fails, the allocator falls
//! back to a one-month plan under a fixed prioritization rule.

use crate::allocation::Prioritization;
use crate::engine::{apply_month, Simulator};
use crate::error::Result;
use crate::schema::*;
use crate::utils::{is_all_cleared, total_balance};
use crate::validation::validate_budget_and_aprs;
use log::{debug, warn};
use std::time::{Duration, Instant};
use thiserror::Error;

const SOLUTION_TOLERANCE: f64 = 1e-6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Solver unavailable: {0}")]
    Unavailable(String),

    #[error("Problem is infeasible: {0}")]
    Infeasible(String),

    #[error("Solver exceeded its time limit of {0:?}")]
    Timeout(Duration),

    #[error("Malformed problem: {0}")]
    InvalidProblem(String),

    #[error("Solver returned an invalid solution: {0}")]
    InvalidSolution(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    pub time_limit: Duration,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(2),
        }
    }
}

impl SolverOptions {
    pub fn with_time_limit_ms(ms: u64) -> Self {
        Self {
            time_limit: Duration::from_millis(ms),
        }
    }
}

/// Minimise `constant + sum(costs[i] * x[i])` subject to
/// `lower[i] <= x[i] <= upper[i]` and `sum(x) <= budget`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram {
    pub constant: f64,
    pub costs: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub budget: f64,
}

impl LinearProgram {
    /// Builds the next-month interest minimisation for `debts`.
    ///
    /// Cleared debts are pinned to zero. An active debt's lower bound is its
    /// minimum payment, capped at what it owes so the box stays non-empty.
    pub fn interest_minimization(debts: &[Debt], budget: f64) -> Self {
        let mut constant = 0.0;
        let mut costs = Vec::with_capacity(debts.len());
        let mut lower = Vec::with_capacity(debts.len());
        let mut upper = Vec::with_capacity(debts.len());

        for debt in debts {
            if debt.is_active() {
                let rate = debt.monthly_rate();
                let owed = debt.amount_owed();
                constant += owed * rate;
                costs.push(-rate);
                lower.push(debt.min_payment.min(owed));
                upper.push(owed);
            } else {
                costs.push(0.0);
                lower.push(0.0);
                upper.push(0.0);
            }
        }

        Self {
            constant,
            costs,
            lower,
            upper,
            budget,
        }
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    pub fn objective(&self, x: &[f64]) -> f64 {
        self.constant
            + self
                .costs
                .iter()
                .zip(x)
                .map(|(c, v)| c * v)
                .sum::<f64>()
    }

    /// Confirms `x` satisfies every constraint within a small tolerance.
    pub fn check_solution(&self, x: &[f64]) -> std::result::Result<(), SolverError> {
        if x.len() != self.len() {
            return Err(SolverError::InvalidSolution(format!(
                "expected {} values, got {}",
                self.len(),
                x.len()
            )));
        }

        for (i, &value) in x.iter().enumerate() {
            if !value.is_finite()
                || value < self.lower[i] - SOLUTION_TOLERANCE
                || value > self.upper[i] + SOLUTION_TOLERANCE
            {
                return Err(SolverError::InvalidSolution(format!(
                    "x[{}] = {} outside [{}, {}]",
                    i, value, self.lower[i], self.upper[i]
                )));
            }
        }

        let total: f64 = x.iter().sum();
        if total > self.budget + SOLUTION_TOLERANCE {
            return Err(SolverError::InvalidSolution(format!(
                "payments {} exceed budget {}",
                total, self.budget
            )));
        }

        Ok(())
    }
}

/// A linear-program backend for the one-step allocator.
pub trait Solver {
    fn name(&self) -> &str;

    fn solve(
        &self,
        problem: &LinearProgram,
        options: &SolverOptions,
    ) -> std::result::Result<Vec<f64>, SolverError>;
}

/// Exact solver for box-bounded programs with a single budget row.
///
/// Starts every variable at its lower bound, then spends the remaining
/// budget on the most negative costs first. Variables with non-negative
/// cost stay at their lower bound.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoundedGreedySolver;

impl Solver for BoundedGreedySolver {
    fn name(&self) -> &str {
        "bounded_greedy"
    }

    fn solve(
        &self,
        problem: &LinearProgram,
        options: &SolverOptions,
    ) -> std::result::Result<Vec<f64>, SolverError> {
        let started = Instant::now();
        let n = problem.len();

        if problem.lower.len() != n || problem.upper.len() != n {
            return Err(SolverError::InvalidProblem(
                "costs and bounds differ in length".to_string(),
            ));
        }

        for i in 0..n {
            if problem.lower[i] > problem.upper[i] + SOLUTION_TOLERANCE {
                return Err(SolverError::Infeasible(format!(
                    "lower bound {} above upper bound {} for x[{}]",
                    problem.lower[i], problem.upper[i], i
                )));
            }
        }

        let required: f64 = problem.lower.iter().sum();
        if required > problem.budget + SOLUTION_TOLERANCE {
            return Err(SolverError::Infeasible(format!(
                "lower bounds sum to {} but budget is {}",
                required, problem.budget
            )));
        }

        let mut x = problem.lower.clone();
        let mut remaining = problem.budget - required;

        let mut order: Vec<usize> = (0..n).filter(|&i| problem.costs[i] < 0.0).collect();
        order.sort_by(|&a, &b| problem.costs[a].total_cmp(&problem.costs[b]));

        for i in order {
            if started.elapsed() >= options.time_limit {
                return Err(SolverError::Timeout(options.time_limit));
            }
            if remaining <= 0.0 {
                break;
            }
            let add = remaining.min(problem.upper[i] - x[i]).max(0.0);
            x[i] += add;
            remaining -= add;
        }

        Ok(x)
    }
}

pub struct OneStepOptimizer<'a> {
    solver: Option<&'a dyn Solver>,
    fallback: Prioritization,
    options: SolverOptions,
}

impl<'a> OneStepOptimizer<'a> {
    pub fn new(solver: Option<&'a dyn Solver>) -> Self {
        Self {
            solver,
            fallback: Prioritization::Avalanche,
            options: SolverOptions::default(),
        }
    }

    pub fn with_fallback(mut self, rule: Prioritization) -> Self {
        self.fallback = rule;
        self
    }

    pub fn with_options(mut self, options: SolverOptions) -> Self {
        self.options = options;
        self
    }

    /// Computes the one-month allocation. Solver trouble is never an error:
    /// it is logged and the fallback rule produces the month instead.
    pub fn allocate(&self, debts: &[Debt], budget: f64) -> Result<RepaymentPlan> {
        validate_budget_and_aprs(debts, budget)?;

        if is_all_cleared(debts) {
            return Ok(RepaymentPlan::already_clear(
                Strategy::OneStepOptimal,
                total_balance(debts),
            ));
        }

        let problem = LinearProgram::interest_minimization(debts, budget);
        let outcome = match self.solver {
            None => Err(SolverError::Unavailable("no solver configured".to_string())),
            Some(solver) => {
                debug!("Solving one-step allocation with '{}'", solver.name());
                solver
                    .solve(&problem, &self.options)
                    .and_then(|x| problem.check_solution(&x).map(|_| x))
            }
        };

        match outcome {
            Ok(payments) => {
                debug!(
                    "One-step objective: {:.4} (next-month interest)",
                    problem.objective(&payments)
                );
                Ok(plan_from_payments(debts, &payments))
            }
            Err(err) => {
                warn!(
                    "One-step solver failed ({}); falling back to {:?}",
                    err, self.fallback
                );
                let mut plan = Simulator::new(budget, 1, self.fallback)
                    .simulate(debts, Strategy::OneStepOptimal)?;
                plan.fallback_reason = Some(err.to_string());
                Ok(plan)
            }
        }
    }
}

fn plan_from_payments(debts: &[Debt], payments: &[f64]) -> RepaymentPlan {
    let allocations: Vec<Allocation> = debts
        .iter()
        .zip(payments)
        .map(|(debt, &payment)| {
            if debt.is_active() {
                let payment = payment.max(0.0).min(debt.amount_owed());
                Allocation::new(debt.name.clone(), payment, debt.monthly_interest())
            } else {
                Allocation::zero(debt.name.clone())
            }
        })
        .collect();

    let mut ledger = debts.to_vec();
    apply_month(&mut ledger, &allocations);

    let status = if is_all_cleared(&ledger) {
        PlanStatus::DebtFree
    } else {
        PlanStatus::HorizonReached
    };

    RepaymentPlan::new(
        Strategy::OneStepOptimal,
        vec![RepaymentMonth::from_allocations(1, allocations)],
        status,
        total_balance(&ledger),
    )
}

/// One-step allocation with the built-in solver and an avalanche fallback.
pub fn one_step_optimal_allocation(debts: &[Debt], budget: f64) -> Result<RepaymentPlan> {
    OneStepOptimizer::new(Some(&BoundedGreedySolver)).allocate(debts, budget)
}
