use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Cents, LedgerEntry, PaymentMethod};

pub type ExpenseId = u64;

/// A single recorded expense. Edits replace the whole record by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    pub amount_cents: Cents,
    pub category: String,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
}

/// An expense as submitted, before the ledger assigns its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpense {
    pub description: String,
    pub amount_cents: Cents,
    pub category: String,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
}

impl NewExpense {
    pub fn into_expense(self, id: ExpenseId) -> Expense {
        Expense {
            id,
            description: self.description,
            amount_cents: self.amount_cents,
            category: self.category,
            date: self.date,
            payment_method: self.payment_method,
        }
    }
}

impl LedgerEntry for Expense {
    fn label(&self) -> &str {
        &self.description
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn weight(&self) -> Cents {
        self.amount_cents
    }
}

/// Search term and category selector for the expense list.
/// `None` on either side means "all".
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl ExpenseFilter {
    pub fn by_category(category: impl Into<String>) -> Self {
        Self {
            search: None,
            category: Some(category.into()),
        }
    }

    pub fn by_search(search: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            category: None,
        }
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(term) = &self.search {
            if !expense.matches_search(term) {
                return false;
            }
        }
        match &self.category {
            Some(category) => expense.category == *category,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coffee() -> Expense {
        Expense {
            id: 3,
            description: "Coffee Shop".to_string(),
            amount_cents: 1250,
            category: "Food".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
            payment_method: PaymentMethod::Cash,
        }
    }

    #[test]
    fn test_search_matches_description_or_category() {
        let expense = coffee();
        assert!(ExpenseFilter::by_search("coffee").matches(&expense));
        assert!(ExpenseFilter::by_search("FOOD").matches(&expense));
        assert!(ExpenseFilter::by_search("hop").matches(&expense));
        assert!(!ExpenseFilter::by_search("gas").matches(&expense));
    }

    #[test]
    fn test_search_term_is_not_trimmed() {
        let expense = coffee();
        assert!(!ExpenseFilter::by_search("food ").matches(&expense));
        assert!(!ExpenseFilter::by_search("  ").matches(&expense));
        assert!(ExpenseFilter::by_search("coffee shop").matches(&expense));
        assert!(ExpenseFilter::by_search("e s").matches(&expense));
    }

    #[test]
    fn test_category_filter_is_exact() {
        let expense = coffee();
        assert!(ExpenseFilter::by_category("Food").matches(&expense));
        assert!(!ExpenseFilter::by_category("food").matches(&expense));
        assert!(!ExpenseFilter::by_category("Foo").matches(&expense));
    }

    #[test]
    fn test_search_and_category_intersect() {
        let expense = coffee();
        let filter = ExpenseFilter {
            search: Some("coffee".to_string()),
            category: Some("Entertainment".to_string()),
        };
        assert!(!filter.matches(&expense));

        let filter = ExpenseFilter {
            search: Some("".to_string()),
            category: None,
        };
        assert!(filter.matches(&expense));
    }

    #[test]
    fn test_into_expense_keeps_fields() {
        let expense = coffee();
        let new = NewExpense {
            description: expense.description.clone(),
            amount_cents: expense.amount_cents,
            category: expense.category.clone(),
            date: expense.date,
            payment_method: expense.payment_method,
        };
        assert_eq!(new.into_expense(3), expense);
    }
}
