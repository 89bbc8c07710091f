use thiserror::Error;

use crate::domain::{Cents, ExpenseId, SubscriptionId};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),

    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(SubscriptionId),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount must not be negative (got {0} cents)")]
    NegativeAmount(Cents),

    #[error("Invalid preference: {0}")]
    InvalidPreference(String),

    #[error("Not logged in. Run `outlay login <name>` first")]
    NotAuthenticated,

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
