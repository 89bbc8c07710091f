use std::collections::HashMap;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::subscription::round_scaled;
use super::{
    Cents, Expense, ExpenseFilter, ExpenseId, NewExpense, NewSubscription, Subscription,
    SubscriptionFilter, SubscriptionId, SubscriptionStatus,
};

/// Common view over expenses and subscriptions used by search and grouping.
pub trait LedgerEntry {
    /// Free-text label searched alongside the category (description or name).
    fn label(&self) -> &str;
    fn category(&self) -> &str;
    /// Amount used when totalling entries.
    fn weight(&self) -> Cents;

    /// Case-insensitive substring match against the label or the category.
    /// The term is used as typed, so surrounding spaces must match too.
    /// An empty term matches everything.
    fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        term.is_empty()
            || self.label().to_lowercase().contains(&term)
            || self.category().to_lowercase().contains(&term)
    }
}

/// Total and count for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Cents,
    pub count: usize,
    /// Share of the grouped set's total, 0-100.
    pub percentage: f64,
}

/// In-memory expense and subscription collections.
///
/// The ledger owns id assignment: each collection has a counter that starts past
/// the highest id it was loaded with and only ever moves forward, so an id is
/// never handed out twice, even after the record holding it is deleted.
/// Newly added records go to the front of their collection.
#[derive(Debug, Clone)]
pub struct Ledger {
    expenses: Vec<Expense>,
    subscriptions: Vec<Subscription>,
    next_expense_id: ExpenseId,
    next_subscription_id: SubscriptionId,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            expenses: Vec::new(),
            subscriptions: Vec::new(),
            next_expense_id: 1,
            next_subscription_id: 1,
        }
    }

    /// Build a ledger from existing records, in display order.
    pub fn from_records(expenses: Vec<Expense>, subscriptions: Vec<Subscription>) -> Self {
        let next_expense_id = expenses.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        let next_subscription_id = subscriptions.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        Self {
            expenses,
            subscriptions,
            next_expense_id,
            next_subscription_id,
        }
    }

    /// Advance the id counters to at least the given values.
    /// Counters never move backwards.
    pub fn with_counters(
        mut self,
        next_expense_id: ExpenseId,
        next_subscription_id: SubscriptionId,
    ) -> Self {
        self.next_expense_id = self.next_expense_id.max(next_expense_id);
        self.next_subscription_id = self.next_subscription_id.max(next_subscription_id);
        self
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    pub fn next_expense_id(&self) -> ExpenseId {
        self.next_expense_id
    }

    pub fn next_subscription_id(&self) -> SubscriptionId {
        self.next_subscription_id
    }

    // ========================
    // Expenses
    // ========================

    pub fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn add_expense(&mut self, new: NewExpense) -> Expense {
        let expense = new.into_expense(self.next_expense_id);
        self.next_expense_id += 1;
        self.expenses.insert(0, expense.clone());
        expense
    }

    /// Replace the expense carrying the same id. Returns false if there is none.
    pub fn replace_expense(&mut self, expense: Expense) -> bool {
        match self.expenses.iter_mut().find(|e| e.id == expense.id) {
            Some(slot) => {
                *slot = expense;
                true
            }
            None => false,
        }
    }

    pub fn remove_expense(&mut self, id: ExpenseId) -> Option<Expense> {
        let index = self.expenses.iter().position(|e| e.id == id)?;
        Some(self.expenses.remove(index))
    }

    pub fn filter_expenses(&self, filter: &ExpenseFilter) -> Vec<&Expense> {
        self.expenses.iter().filter(|e| filter.matches(e)).collect()
    }

    /// Distinct expense categories across the whole collection, first-seen order.
    pub fn expense_categories(&self) -> Vec<String> {
        distinct_categories(&self.expenses)
    }

    // ========================
    // Subscriptions
    // ========================

    pub fn subscription(&self, id: SubscriptionId) -> Option<&Subscription> {
        self.subscriptions.iter().find(|s| s.id == id)
    }

    pub fn add_subscription(&mut self, new: NewSubscription) -> Subscription {
        let subscription = new.into_subscription(self.next_subscription_id);
        self.next_subscription_id += 1;
        self.subscriptions.insert(0, subscription.clone());
        subscription
    }

    pub fn replace_subscription(&mut self, subscription: Subscription) -> bool {
        match self
            .subscriptions
            .iter_mut()
            .find(|s| s.id == subscription.id)
        {
            Some(slot) => {
                *slot = subscription;
                true
            }
            None => false,
        }
    }

    pub fn remove_subscription(&mut self, id: SubscriptionId) -> Option<Subscription> {
        let index = self.subscriptions.iter().position(|s| s.id == id)?;
        Some(self.subscriptions.remove(index))
    }

    pub fn set_subscription_status(
        &mut self,
        id: SubscriptionId,
        status: SubscriptionStatus,
    ) -> Option<&Subscription> {
        let subscription = self.subscriptions.iter_mut().find(|s| s.id == id)?;
        subscription.status = status;
        Some(&*subscription)
    }

    pub fn filter_subscriptions(&self, filter: &SubscriptionFilter) -> Vec<&Subscription> {
        self.subscriptions
            .iter()
            .filter(|s| filter.matches(s))
            .collect()
    }

    pub fn subscription_categories(&self) -> Vec<String> {
        distinct_categories(&self.subscriptions)
    }

    /// Drop every record. Id counters keep their position.
    pub fn clear(&mut self) {
        self.expenses.clear();
        self.subscriptions.clear();
    }
}

// ========================
// Derivations
// ========================

/// Sum of expense amounts.
pub fn total_amount<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Cents {
    expenses.into_iter().map(|e| e.amount_cents).sum()
}

/// Monthly-normalized cost of all active subscriptions.
/// Paused and cancelled subscriptions contribute nothing.
pub fn monthly_subscription_total<'a>(
    subscriptions: impl IntoIterator<Item = &'a Subscription>,
) -> Cents {
    let scaled: i128 = subscriptions
        .into_iter()
        .filter(|s| s.is_active())
        .map(|s| s.billing_cycle.scaled_monthly(s.amount_cents))
        .sum();
    round_scaled(scaled)
}

/// Smallest renewal countdown among active subscriptions, or None when nothing is active.
pub fn soonest_renewal<'a>(
    subscriptions: impl IntoIterator<Item = &'a Subscription>,
    today: NaiveDate,
) -> Option<i64> {
    subscriptions
        .into_iter()
        .filter(|s| s.is_active())
        .map(|s| s.days_until_renewal(today))
        .min()
}

/// Group entries by category. Sorted by total descending, then by name.
pub fn summarize_by_category<'a, T>(entries: impl IntoIterator<Item = &'a T>) -> Vec<CategoryTotal>
where
    T: LedgerEntry + 'a,
{
    let mut groups: HashMap<&str, (Cents, usize)> = HashMap::new();
    let mut grand_total: Cents = 0;

    for entry in entries {
        let group = groups.entry(entry.category()).or_insert((0, 0));
        group.0 += entry.weight();
        group.1 += 1;
        grand_total += entry.weight();
    }

    let mut totals: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category: category.to_string(),
            total,
            count,
            percentage: percentage_of(total, grand_total).unwrap_or(0.0),
        })
        .collect();

    totals.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    totals
}

/// Distinct categories in first-seen order.
pub fn distinct_categories<T: LedgerEntry>(entries: &[T]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for entry in entries {
        if !seen.iter().any(|c| c == entry.category()) {
            seen.push(entry.category().to_string());
        }
    }
    seen
}

/// `part` as a percentage of `whole`, or None when `whole` is not positive.
pub fn percentage_of(part: Cents, whole: Cents) -> Option<f64> {
    if whole <= 0 {
        return None;
    }
    Some(part as f64 / whole as f64 * 100.0)
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Total of expenses dated within the calendar month containing `today`.
pub fn month_to_date_total<'a>(
    expenses: impl IntoIterator<Item = &'a Expense>,
    today: NaiveDate,
) -> Cents {
    let start = month_start(today);
    expenses
        .into_iter()
        .filter(|e| month_start(e.date) == start)
        .map(|e| e.amount_cents)
        .sum()
}

/// Per-month expense totals for the `months` calendar months ending with the
/// month containing `today`, oldest first. Months without expenses are zero.
pub fn monthly_totals(
    expenses: &[Expense],
    today: NaiveDate,
    months: u32,
) -> Vec<(NaiveDate, Cents, usize)> {
    let current = month_start(today);
    let mut buckets: Vec<(NaiveDate, Cents, usize)> = (0..months)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .map(|start| (start, 0, 0))
        .collect();

    for expense in expenses {
        let start = month_start(expense.date);
        if let Some(bucket) = buckets.iter_mut().find(|(s, _, _)| *s == start) {
            bucket.1 += expense.amount_cents;
            bucket.2 += 1;
        }
    }

    buckets
}

/// The `limit` most recent expenses by date; ties go to the higher id.
pub fn recent_expenses(expenses: &[Expense], limit: usize) -> Vec<&Expense> {
    let mut sorted: Vec<&Expense> = expenses.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BillingCycle, PaymentMethod};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn new_expense(description: &str, amount: Cents, category: &str, day: &str) -> NewExpense {
        NewExpense {
            description: description.to_string(),
            amount_cents: amount,
            category: category.to_string(),
            date: date(day),
            payment_method: PaymentMethod::CreditCard,
        }
    }

    fn new_subscription(name: &str, amount: Cents, cycle: BillingCycle) -> NewSubscription {
        NewSubscription {
            name: name.to_string(),
            amount_cents: amount,
            billing_cycle: cycle,
            next_renewal: date("2024-02-15"),
            category: "Entertainment".to_string(),
            description: None,
        }
    }

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add_expense(new_expense("Grocery Store", 8732, "Food", "2024-01-15"));
        ledger.add_expense(new_expense("Gas Station", 4520, "Transportation", "2024-01-13"));
        ledger.add_expense(new_expense("Movie Theater", 2800, "Entertainment", "2024-01-10"));
        ledger
    }

    #[test]
    fn test_add_assigns_increasing_ids_and_prepends() {
        let ledger = sample_ledger();
        let ids: Vec<ExpenseId> = ledger.expenses().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(ledger.next_expense_id(), 4);
    }

    #[test]
    fn test_add_after_delete_never_reuses_ids() {
        let mut ledger = sample_ledger();
        ledger.remove_expense(3);
        let added = ledger.add_expense(new_expense("Pharmacy", 1575, "Healthcare", "2024-01-08"));
        assert_eq!(added.id, 4);
    }

    #[test]
    fn test_from_records_counter_starts_past_max() {
        let expenses = vec![
            new_expense("A", 100, "Food", "2024-01-01").into_expense(41),
            new_expense("B", 100, "Food", "2024-01-01").into_expense(7),
        ];
        let mut ledger = Ledger::from_records(expenses, Vec::new());
        assert_eq!(ledger.next_expense_id(), 42);
        assert_eq!(ledger.next_subscription_id(), 1);

        let added = ledger.add_expense(new_expense("C", 100, "Food", "2024-01-02"));
        assert!(ledger.expenses().iter().skip(1).all(|e| e.id < added.id));
    }

    #[test]
    fn test_with_counters_never_moves_backwards() {
        let ledger = sample_ledger().with_counters(2, 10);
        assert_eq!(ledger.next_expense_id(), 4);
        assert_eq!(ledger.next_subscription_id(), 10);
    }

    #[test]
    fn test_replace_touches_only_matching_record() {
        let mut ledger = sample_ledger();
        let before = ledger.expenses().to_vec();

        let mut edited = ledger.expense(2).unwrap().clone();
        edited.amount_cents = 5000;
        edited.description = "Fuel".to_string();
        assert!(ledger.replace_expense(edited.clone()));

        for (old, new) in before.iter().zip(ledger.expenses()) {
            if old.id == 2 {
                assert_eq!(new, &edited);
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn test_replace_missing_id_is_noop() {
        let mut ledger = sample_ledger();
        let before = ledger.expenses().to_vec();
        let ghost = new_expense("Ghost", 1, "Other", "2024-01-01").into_expense(99);
        assert!(!ledger.replace_expense(ghost));
        assert_eq!(ledger.expenses(), before.as_slice());
    }

    #[test]
    fn test_remove_keeps_order_of_remainder() {
        let mut ledger = sample_ledger();
        let removed = ledger.remove_expense(2).unwrap();
        assert_eq!(removed.description, "Gas Station");
        let ids: Vec<ExpenseId> = ledger.expenses().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 1]);

        assert!(ledger.remove_expense(2).is_none());
        assert_eq!(ledger.expenses().len(), 2);
    }

    #[test]
    fn test_filter_single_food_record() {
        let ledger = sample_ledger();
        let filtered = ledger.filter_expenses(&ExpenseFilter::by_category("Food"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].description, "Grocery Store");
        assert_eq!(total_amount(filtered), 8732);
    }

    #[test]
    fn test_distinct_categories_ignore_filter() {
        let ledger = sample_ledger();
        assert_eq!(
            ledger.expense_categories(),
            vec!["Entertainment", "Transportation", "Food"]
        );
    }

    #[test]
    fn test_summarize_by_category() {
        let mut ledger = sample_ledger();
        ledger.add_expense(new_expense("Coffee Shop", 1250, "Food", "2024-01-12"));

        let totals = summarize_by_category(ledger.expenses());
        assert_eq!(totals.len(), 3);
        assert_eq!(totals[0].category, "Food");
        assert_eq!(totals[0].total, 9982);
        assert_eq!(totals[0].count, 2);

        let sum: f64 = totals.iter().map(|t| t.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_empty_set() {
        let empty: Vec<Expense> = Vec::new();
        let totals = summarize_by_category(&empty);
        assert!(totals.is_empty());
    }

    #[test]
    fn test_monthly_subscription_total() {
        let mut ledger = Ledger::new();
        ledger.add_subscription(new_subscription("Amazon Prime", 13900, BillingCycle::Yearly));
        assert_eq!(monthly_subscription_total(ledger.subscriptions()), 1158);

        let mut ledger = Ledger::new();
        ledger.add_subscription(new_subscription("Lessons", 1000, BillingCycle::Weekly));
        assert_eq!(monthly_subscription_total(ledger.subscriptions()), 4330);

        let gym = ledger
            .add_subscription(new_subscription("Gym", 2999, BillingCycle::Monthly))
            .id;
        ledger.set_subscription_status(gym, SubscriptionStatus::Paused);
        assert_eq!(monthly_subscription_total(ledger.subscriptions()), 4330);
    }

    #[test]
    fn test_monthly_total_rounds_once() {
        let mut ledger = Ledger::new();
        // Each is 0.005 per month; rounding per item would give 0.02.
        ledger.add_subscription(new_subscription("A", 6, BillingCycle::Yearly));
        ledger.add_subscription(new_subscription("B", 6, BillingCycle::Yearly));
        assert_eq!(monthly_subscription_total(ledger.subscriptions()), 1);
    }

    #[test]
    fn test_soonest_renewal() {
        let mut ledger = Ledger::new();
        assert_eq!(soonest_renewal(ledger.subscriptions(), date("2024-02-01")), None);

        let mut late = new_subscription("Late", 100, BillingCycle::Monthly);
        late.next_renewal = date("2024-02-20");
        ledger.add_subscription(late);

        let mut early = new_subscription("Early", 100, BillingCycle::Monthly);
        early.next_renewal = date("2024-02-03");
        let early_id = ledger.add_subscription(early).id;

        assert_eq!(soonest_renewal(ledger.subscriptions(), date("2024-02-01")), Some(2));

        ledger.set_subscription_status(early_id, SubscriptionStatus::Cancelled);
        assert_eq!(soonest_renewal(ledger.subscriptions(), date("2024-02-01")), Some(19));
    }

    #[test]
    fn test_month_to_date_and_history() {
        let ledger = sample_ledger();
        assert_eq!(month_to_date_total(ledger.expenses(), date("2024-01-31")), 16052);
        assert_eq!(month_to_date_total(ledger.expenses(), date("2024-02-01")), 0);

        let history = monthly_totals(ledger.expenses(), date("2024-03-10"), 3);
        assert_eq!(history.len(), 3);
        assert_eq!(history[0], (date("2024-01-01"), 16052, 3));
        assert_eq!(history[1], (date("2024-02-01"), 0, 0));
        assert_eq!(history[2], (date("2024-03-01"), 0, 0));
    }

    #[test]
    fn test_recent_expenses() {
        let ledger = sample_ledger();
        let recent = recent_expenses(ledger.expenses(), 2);
        let names: Vec<&str> = recent.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(names, vec!["Grocery Store", "Gas Station"]);
    }

    #[test]
    fn test_percentage_of() {
        assert_eq!(percentage_of(50, 200), Some(25.0));
        assert_eq!(percentage_of(50, 0), None);
    }
}
