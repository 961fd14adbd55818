//! Totals for a set of transactions.

use serde::Serialize;

use crate::transaction::{Transaction, TransactionType};

/// The income and expense totals of a set of transactions and their difference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    /// The sum of the amounts of income transactions.
    pub income: f64,
    /// The sum of the amounts of expense transactions.
    pub expenses: f64,
    /// `income - expenses`.
    pub balance: f64,
}

impl Summary {
    /// Add up the income and expenses in `transactions`.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let (income, expenses) = transactions.iter().fold(
            (0.0, 0.0),
            |(income, expenses), transaction| match transaction.transaction_type {
                TransactionType::Income => (income + transaction.amount, expenses),
                TransactionType::Expense => (income, expenses + transaction.amount),
            },
        );

        Self {
            income,
            expenses,
            balance: income - expenses,
        }
    }
}
