use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Budget cannot be negative (got {0})")]
    NegativeBudget(f64),

    #[error("Budget ({budget:.2}) is less than total minimum payments ({required:.2})")]
    InsufficientBudget { budget: f64, required: f64 },

    #[error("Invalid APR for debt '{0}'")]
    InvalidApr(String),

    #[error("Invalid balance for debt '{name}': {balance}")]
    InvalidBalance { name: String, balance: f64 },

    #[error("Invalid minimum payment for debt '{name}': {min_payment}")]
    InvalidMinPayment { name: String, min_payment: f64 },

    #[error("Debt name '{0}' appears more than once")]
    DuplicateDebtName(String),

    #[error("Invalid horizon of {months} months: must be between 1 and {max}")]
    InvalidHorizon { months: u32, max: u32 },

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
