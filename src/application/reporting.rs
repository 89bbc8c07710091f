use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{CategoryTotal, Cents, Expense, Subscription};

/// Totals over a filtered expense list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseSummary {
    pub expenses: Vec<Expense>,
    pub total: Cents,
    pub count: usize,
    pub categories: Vec<CategoryTotal>,
    /// Distinct categories across all expenses, ignoring the filter.
    pub available_categories: Vec<String>,
}

/// A subscription with its derived figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionView {
    pub subscription: Subscription,
    pub monthly_equivalent: Cents,
    pub days_until_renewal: i64,
    pub renewing_soon: bool,
    pub overdue: bool,
}

/// Totals over a filtered subscription list.
///
/// The counts, monthly total and soonest renewal cover every subscription;
/// only `subscriptions` is narrowed by the filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionSummary {
    pub subscriptions: Vec<SubscriptionView>,
    pub monthly_total: Cents,
    pub active_count: usize,
    pub paused_count: usize,
    pub cancelled_count: usize,
    /// Days until the next active renewal; None when nothing is active.
    pub soonest_renewal: Option<i64>,
    pub available_categories: Vec<String>,
}

/// Spending against the monthly budget for the current month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub monthly_budget: Cents,
    pub spent: Cents,
    pub remaining: Cents,
    /// None when no budget is set.
    pub percentage: Option<f64>,
    pub alert_threshold: u8,
    pub alert: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySpending {
    pub month_start: NaiveDate,
    pub total: Cents,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub user_name: String,
    pub total_expenses: Cents,
    pub expense_count: usize,
    pub this_month: Cents,
    pub subscriptions_monthly: Cents,
    pub active_subscriptions: usize,
    pub budget: BudgetStatus,
    pub recent_expenses: Vec<Expense>,
    pub upcoming_renewals: Vec<SubscriptionView>,
    pub history: Vec<MonthlySpending>,
}
