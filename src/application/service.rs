use std::time::Duration;

use chrono::NaiveDate;

use crate::domain::{
    EXPENSE_CATEGORIES, Expense, ExpenseFilter, ExpenseId, Ledger, NewExpense, NewSubscription,
    SUBSCRIPTION_CATEGORIES, Subscription, SubscriptionFilter, SubscriptionId,
    SubscriptionStatus, month_to_date_total, monthly_subscription_total, monthly_totals,
    normalize_category, percentage_of, recent_expenses, soonest_renewal, summarize_by_category,
    total_amount,
};
use crate::storage::{EXPENSE_COUNTER, Repository, SUBSCRIPTION_COUNTER};

use super::reporting::{
    BudgetStatus, Dashboard, ExpenseSummary, MonthlySpending, SubscriptionSummary,
    SubscriptionView,
};
use super::session::{
    ALERT_THRESHOLDS, KEY_AUTHENTICATED, KEY_USER_EMAIL, KEY_USER_NAME, LOGOUT_KEYS, Preferences,
    Profile, Session,
};
use super::{AppError, sample};

pub const PROFILE_SAVED: &str = "Profile updated successfully!";
pub const PROFILE_SAVE_FAILED: &str = "Failed to update profile. Please try again.";
pub const PREFERENCES_SAVED: &str = "Preferences saved successfully!";
pub const PREFERENCES_SAVE_FAILED: &str = "Failed to save preferences. Please try again.";
pub const DATA_EXPORTED: &str = "Data exported successfully!";

/// Days ahead that count as "renewing soon".
pub const RENEWAL_WINDOW_DAYS: i64 = 7;

/// Runtime knobs for the service.
#[derive(Debug, Clone, Default)]
pub struct TrackerConfig {
    /// Artificial latency applied before profile and preference saves.
    pub save_delay: Duration,
}

/// Application service providing every operation on expenses, subscriptions
/// and the user session. This is the primary interface for any client.
///
/// Mutations are applied to the in-memory ledger and written through to the
/// repository; reads are derived from the ledger without touching storage.
pub struct TrackerService {
    repo: Repository,
    ledger: Ledger,
    session: Session,
    config: TrackerConfig,
}

impl TrackerService {
    /// Open (creating if needed) the database at the given path and load its state.
    pub async fn open(database_path: &str, config: TrackerConfig) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Self::load(repo, config).await
    }

    /// Load the ledger and session from an initialized repository.
    pub async fn load(repo: Repository, config: TrackerConfig) -> Result<Self, AppError> {
        let expenses = repo.list_expenses().await?;
        let subscriptions = repo.list_subscriptions().await?;
        let last_expense_id = repo.get_counter(EXPENSE_COUNTER).await?;
        let last_subscription_id = repo.get_counter(SUBSCRIPTION_COUNTER).await?;
        let settings = repo.load_settings().await?;

        let ledger = Ledger::from_records(expenses, subscriptions)
            .with_counters(last_expense_id + 1, last_subscription_id + 1);
        let session = Session::from_settings(&settings);

        tracing::debug!(
            expenses = ledger.expenses().len(),
            subscriptions = ledger.subscriptions().len(),
            authenticated = session.authenticated,
            "loaded tracker state"
        );

        Ok(Self {
            repo,
            ledger,
            session,
            config,
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The current session, or NotAuthenticated when nobody is logged in.
    pub fn require_login(&self) -> Result<&Session, AppError> {
        if self.session.authenticated {
            Ok(&self.session)
        } else {
            Err(AppError::NotAuthenticated)
        }
    }

    // ========================
    // Session operations
    // ========================

    /// Mark the session as logged in with the given profile.
    pub async fn login(&mut self, name: &str, email: &str) -> Result<&Session, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::MissingField("name"));
        }

        let profile = Profile {
            name: name.to_string(),
            email: email.trim().to_string(),
        };
        self.repo
            .save_settings(&[
                (KEY_AUTHENTICATED, "true".to_string()),
                (KEY_USER_NAME, profile.name.clone()),
                (KEY_USER_EMAIL, profile.email.clone()),
            ])
            .await?;

        self.session.authenticated = true;
        self.session.profile = profile;
        tracing::info!(user = %self.session.profile.name, "logged in");
        Ok(&self.session)
    }

    /// Clear the login flag and profile. Preferences are kept.
    pub async fn logout(&mut self) -> Result<(), AppError> {
        self.repo.remove_settings(&LOGOUT_KEYS).await?;
        self.session.authenticated = false;
        self.session.profile = Profile::default();
        tracing::info!("logged out");
        Ok(())
    }

    pub async fn save_profile(&mut self, profile: Profile) -> Result<(), AppError> {
        self.simulate_latency().await;

        let updated = Session {
            profile,
            ..self.session.clone()
        };
        self.repo.save_settings(&updated.profile_settings()).await?;
        self.session = updated;
        tracing::debug!(user = %self.session.profile.name, "profile saved");
        Ok(())
    }

    pub async fn save_preferences(&mut self, preferences: Preferences) -> Result<(), AppError> {
        if preferences.monthly_budget < 0 {
            return Err(AppError::NegativeAmount(preferences.monthly_budget));
        }
        if !ALERT_THRESHOLDS.contains(&preferences.alert_threshold) {
            return Err(AppError::InvalidPreference(format!(
                "alert threshold must be one of {:?}, got {}",
                ALERT_THRESHOLDS, preferences.alert_threshold
            )));
        }

        self.simulate_latency().await;

        let updated = Session {
            preferences,
            ..self.session.clone()
        };
        self.repo
            .save_settings(&updated.preference_settings())
            .await?;
        self.session = updated;
        tracing::debug!("preferences saved");
        Ok(())
    }

    /// Remove every record and setting.
    pub async fn delete_account(&mut self) -> Result<(), AppError> {
        self.repo.clear_all().await?;
        self.ledger.clear();
        self.session = Session::default();
        tracing::info!("account deleted");
        Ok(())
    }

    async fn simulate_latency(&self) {
        if !self.config.save_delay.is_zero() {
            tokio::time::sleep(self.config.save_delay).await;
        }
    }

    // ========================
    // Expense operations
    // ========================

    pub fn get_expense(&self, id: ExpenseId) -> Result<&Expense, AppError> {
        self.ledger
            .expense(id)
            .ok_or(AppError::ExpenseNotFound(id))
    }

    /// Record a new expense. The ledger assigns its id.
    pub async fn add_expense(&mut self, new: NewExpense) -> Result<Expense, AppError> {
        let new = validate_expense(new)?;
        let expense = self.ledger.add_expense(new);

        if let Err(err) = self.repo.insert_expense(&expense).await {
            self.ledger.remove_expense(expense.id);
            return Err(err.into());
        }

        tracing::debug!(id = expense.id, amount = expense.amount_cents, "expense added");
        Ok(expense)
    }

    /// Replace the expense with the same id.
    pub async fn edit_expense(&mut self, expense: Expense) -> Result<Expense, AppError> {
        let id = expense.id;
        self.get_expense(id)?;

        let validated = validate_expense(NewExpense {
            description: expense.description,
            amount_cents: expense.amount_cents,
            category: expense.category,
            date: expense.date,
            payment_method: expense.payment_method,
        })?
        .into_expense(id);

        self.repo.update_expense(&validated).await?;
        self.ledger.replace_expense(validated.clone());
        tracing::debug!(id, "expense replaced");
        Ok(validated)
    }

    pub async fn delete_expense(&mut self, id: ExpenseId) -> Result<Expense, AppError> {
        self.get_expense(id)?;
        self.repo.delete_expense(id).await?;
        let removed = self
            .ledger
            .remove_expense(id)
            .ok_or(AppError::ExpenseNotFound(id))?;
        tracing::debug!(id, "expense deleted");
        Ok(removed)
    }

    /// Filtered expenses with their totals.
    pub fn expense_summary(&self, filter: &ExpenseFilter) -> ExpenseSummary {
        let filtered = self.ledger.filter_expenses(filter);

        ExpenseSummary {
            total: total_amount(filtered.iter().copied()),
            count: filtered.len(),
            categories: summarize_by_category(filtered.iter().copied()),
            available_categories: self.ledger.expense_categories(),
            expenses: filtered.into_iter().cloned().collect(),
        }
    }

    // ========================
    // Subscription operations
    // ========================

    pub fn get_subscription(&self, id: SubscriptionId) -> Result<&Subscription, AppError> {
        self.ledger
            .subscription(id)
            .ok_or(AppError::SubscriptionNotFound(id))
    }

    /// Record a new subscription. It starts active.
    pub async fn add_subscription(
        &mut self,
        new: NewSubscription,
    ) -> Result<Subscription, AppError> {
        let new = validate_subscription(new)?;
        let subscription = self.ledger.add_subscription(new);

        if let Err(err) = self.repo.insert_subscription(&subscription).await {
            self.ledger.remove_subscription(subscription.id);
            return Err(err.into());
        }

        tracing::debug!(id = subscription.id, name = %subscription.name, "subscription added");
        Ok(subscription)
    }

    /// Replace the subscription with the same id, status included.
    pub async fn edit_subscription(
        &mut self,
        subscription: Subscription,
    ) -> Result<Subscription, AppError> {
        let id = subscription.id;
        let status = subscription.status;
        self.get_subscription(id)?;

        let mut validated = validate_subscription(NewSubscription {
            name: subscription.name,
            amount_cents: subscription.amount_cents,
            billing_cycle: subscription.billing_cycle,
            next_renewal: subscription.next_renewal,
            category: subscription.category,
            description: subscription.description,
        })?
        .into_subscription(id);
        validated.status = status;

        self.repo.update_subscription(&validated).await?;
        self.ledger.replace_subscription(validated.clone());
        tracing::debug!(id, "subscription replaced");
        Ok(validated)
    }

    pub async fn delete_subscription(
        &mut self,
        id: SubscriptionId,
    ) -> Result<Subscription, AppError> {
        self.get_subscription(id)?;
        self.repo.delete_subscription(id).await?;
        let removed = self
            .ledger
            .remove_subscription(id)
            .ok_or(AppError::SubscriptionNotFound(id))?;
        tracing::debug!(id, "subscription deleted");
        Ok(removed)
    }

    /// Change a subscription's status (pause, resume, cancel).
    pub async fn set_subscription_status(
        &mut self,
        id: SubscriptionId,
        status: SubscriptionStatus,
    ) -> Result<Subscription, AppError> {
        let mut updated = self.get_subscription(id)?.clone();
        updated.status = status;

        self.repo.update_subscription(&updated).await?;
        self.ledger.set_subscription_status(id, status);
        tracing::debug!(id, %status, "subscription status changed");
        Ok(updated)
    }

    /// Filtered subscriptions with derived figures.
    pub fn subscription_summary(
        &self,
        filter: &SubscriptionFilter,
        today: NaiveDate,
    ) -> SubscriptionSummary {
        let all = self.ledger.subscriptions();
        let count = |status: SubscriptionStatus| all.iter().filter(|s| s.status == status).count();

        SubscriptionSummary {
            subscriptions: self
                .ledger
                .filter_subscriptions(filter)
                .into_iter()
                .map(|s| subscription_view(s, today))
                .collect(),
            monthly_total: monthly_subscription_total(all),
            active_count: count(SubscriptionStatus::Active),
            paused_count: count(SubscriptionStatus::Paused),
            cancelled_count: count(SubscriptionStatus::Cancelled),
            soonest_renewal: soonest_renewal(all, today),
            available_categories: self.ledger.subscription_categories(),
        }
    }

    /// Active subscriptions renewing within `window_days`, soonest first.
    pub fn upcoming_renewals(&self, today: NaiveDate, window_days: i64) -> Vec<SubscriptionView> {
        let mut upcoming: Vec<SubscriptionView> = self
            .ledger
            .subscriptions()
            .iter()
            .filter(|s| s.renews_within(today, window_days))
            .map(|s| subscription_view(s, today))
            .collect();
        upcoming.sort_by_key(|v| (v.days_until_renewal, v.subscription.id));
        upcoming
    }

    // ========================
    // Reports
    // ========================

    /// Spending this month against the monthly budget preference.
    pub fn budget_status(&self, today: NaiveDate) -> BudgetStatus {
        let prefs = &self.session.preferences;
        let spent = month_to_date_total(self.ledger.expenses(), today);
        let percentage = percentage_of(spent, prefs.monthly_budget);
        let alert = prefs.budget_alerts
            && percentage.is_some_and(|p| p >= f64::from(prefs.alert_threshold));

        if alert {
            tracing::warn!(
                spent,
                budget = prefs.monthly_budget,
                threshold = prefs.alert_threshold,
                "monthly budget threshold reached"
            );
        }

        BudgetStatus {
            monthly_budget: prefs.monthly_budget,
            spent,
            remaining: prefs.monthly_budget - spent,
            percentage,
            alert_threshold: prefs.alert_threshold,
            alert,
        }
    }

    /// Expense totals for the last `months` calendar months, oldest first.
    pub fn monthly_spending(&self, today: NaiveDate, months: u32) -> Vec<MonthlySpending> {
        monthly_totals(self.ledger.expenses(), today, months)
            .into_iter()
            .map(|(month_start, total, count)| MonthlySpending {
                month_start,
                total,
                count,
            })
            .collect()
    }

    pub fn dashboard(&self, today: NaiveDate) -> Dashboard {
        let expenses = self.ledger.expenses();
        let subscriptions = self.ledger.subscriptions();

        Dashboard {
            user_name: self.session.profile.name.clone(),
            total_expenses: total_amount(expenses),
            expense_count: expenses.len(),
            this_month: month_to_date_total(expenses, today),
            subscriptions_monthly: monthly_subscription_total(subscriptions),
            active_subscriptions: subscriptions.iter().filter(|s| s.is_active()).count(),
            budget: self.budget_status(today),
            recent_expenses: recent_expenses(expenses, 5).into_iter().cloned().collect(),
            upcoming_renewals: self.upcoming_renewals(today, RENEWAL_WINDOW_DAYS),
            history: self.monthly_spending(today, 6),
        }
    }

    // ========================
    // Demo data
    // ========================

    /// Add the demo expenses and subscriptions. Returns how many records were added.
    pub async fn seed_sample_data(&mut self) -> Result<usize, AppError> {
        let mut added = 0;

        for new in sample::sample_expenses() {
            self.add_expense(new).await?;
            added += 1;
        }

        for (new, status) in sample::sample_subscriptions() {
            let subscription = self.add_subscription(new).await?;
            if status != subscription.status {
                self.set_subscription_status(subscription.id, status).await?;
            }
            added += 1;
        }

        tracing::info!(added, "seeded sample data");
        Ok(added)
    }
}

fn subscription_view(subscription: &Subscription, today: NaiveDate) -> SubscriptionView {
    SubscriptionView {
        monthly_equivalent: subscription.monthly_equivalent(),
        days_until_renewal: subscription.days_until_renewal(today),
        renewing_soon: subscription.renews_within(today, RENEWAL_WINDOW_DAYS),
        overdue: subscription.is_overdue(today),
        subscription: subscription.clone(),
    }
}

/// Required fields and amount checks for an expense submission.
fn validate_expense(new: NewExpense) -> Result<NewExpense, AppError> {
    let description = new.description.trim().to_string();
    if description.is_empty() {
        return Err(AppError::MissingField("description"));
    }
    let category = normalize_category(&new.category, EXPENSE_CATEGORIES)
        .ok_or(AppError::MissingField("category"))?;
    if new.amount_cents < 0 {
        return Err(AppError::NegativeAmount(new.amount_cents));
    }

    Ok(NewExpense {
        description,
        category,
        ..new
    })
}

/// Required fields and amount checks for a subscription submission.
fn validate_subscription(new: NewSubscription) -> Result<NewSubscription, AppError> {
    let name = new.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::MissingField("name"));
    }
    let category = normalize_category(&new.category, SUBSCRIPTION_CATEGORIES)
        .ok_or(AppError::MissingField("category"))?;
    if new.amount_cents <= 0 {
        return Err(AppError::InvalidAmount(
            "Subscription amount must be positive".to_string(),
        ));
    }

    Ok(NewSubscription {
        name,
        category,
        description: new
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        ..new
    })
}
