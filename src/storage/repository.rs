use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

use crate::domain::{
    BillingCycle, Expense, ExpenseId, PaymentMethod, Subscription, SubscriptionId,
    SubscriptionStatus,
};

use super::{MIGRATION_001_INITIAL, MIGRATION_002_SETTINGS};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub const EXPENSE_COUNTER: &str = "expense_id";
pub const SUBSCRIPTION_COUNTER: &str = "subscription_id";

/// Repository for persisting expenses, subscriptions and session settings.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations. Safe to run on every start.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        sqlx::raw_sql(MIGRATION_002_SETTINGS)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 002")?;

        Ok(())
    }

    /// Connect and migrate.
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Settings
    // ========================

    pub async fn load_settings(&self) -> Result<HashMap<String, String>> {
        let rows = sqlx::query("SELECT key, value FROM settings")
            .fetch_all(&self.pool)
            .await
            .context("Failed to load settings")?;

        Ok(rows
            .iter()
            .map(|row| (row.get("key"), row.get("value")))
            .collect())
    }

    /// Insert or overwrite settings in one transaction.
    pub async fn save_settings(&self, entries: &[(&str, String)]) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to start transaction")?;

        for (key, value) in entries {
            sqlx::query(
                r#"
                INSERT INTO settings (key, value) VALUES (?, ?)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value
                "#,
            )
            .bind(*key)
            .bind(value)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to save setting {}", key))?;
        }

        tx.commit().await.context("Failed to commit settings")?;
        Ok(())
    }

    pub async fn remove_settings(&self, keys: &[&str]) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to start transaction")?;

        for key in keys {
            sqlx::query("DELETE FROM settings WHERE key = ?")
                .bind(*key)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to remove setting {}", key))?;
        }

        tx.commit().await.context("Failed to commit settings")?;
        Ok(())
    }

    // ========================
    // Id counters
    // ========================

    /// Last id issued for a collection (0 when none yet).
    pub async fn get_counter(&self, name: &str) -> Result<u64> {
        let row = sqlx::query("SELECT value FROM sequence_counter WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to read id counter")?;

        Ok(row.map(|r| r.get::<i64, _>("value") as u64).unwrap_or(0))
    }

    /// Raise a counter to `last_issued` inside an open transaction. Never lowers it.
    async fn bump_counter(
        tx: &mut Transaction<'_, Sqlite>,
        name: &str,
        last_issued: u64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sequence_counter (name, value) VALUES (?, ?)
            ON CONFLICT(name) DO UPDATE SET value = MAX(value, excluded.value)
            "#,
        )
        .bind(name)
        .bind(last_issued as i64)
        .execute(&mut **tx)
        .await
        .with_context(|| format!("Failed to update id counter {}", name))?;
        Ok(())
    }

    // ========================
    // Expenses
    // ========================

    /// All expenses, newest id first.
    pub async fn list_expenses(&self) -> Result<Vec<Expense>> {
        let rows = sqlx::query(
            r#"
            SELECT id, description, amount_cents, category, date, payment_method
            FROM expenses
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list expenses")?;

        rows.iter().map(Self::row_to_expense).collect()
    }

    /// Insert a new expense and record its id as issued, atomically.
    pub async fn insert_expense(&self, expense: &Expense) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to start transaction")?;

        sqlx::query(
            r#"
            INSERT INTO expenses (id, description, amount_cents, category, date, payment_method)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(expense.id as i64)
        .bind(&expense.description)
        .bind(expense.amount_cents)
        .bind(&expense.category)
        .bind(expense.date.format(DATE_FORMAT).to_string())
        .bind(expense.payment_method.as_str())
        .execute(&mut *tx)
        .await
        .context("Failed to save expense")?;

        Self::bump_counter(&mut tx, EXPENSE_COUNTER, expense.id).await?;

        tx.commit().await.context("Failed to commit expense")?;
        Ok(())
    }

    pub async fn update_expense(&self, expense: &Expense) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE expenses
            SET description = ?, amount_cents = ?, category = ?, date = ?, payment_method = ?
            WHERE id = ?
            "#,
        )
        .bind(&expense.description)
        .bind(expense.amount_cents)
        .bind(&expense.category)
        .bind(expense.date.format(DATE_FORMAT).to_string())
        .bind(expense.payment_method.as_str())
        .bind(expense.id as i64)
        .execute(&self.pool)
        .await
        .context("Failed to update expense")?;
        Ok(())
    }

    pub async fn delete_expense(&self, id: ExpenseId) -> Result<()> {
        sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id as i64)
            .execute(&self.pool)
            .await
            .context("Failed to delete expense")?;
        Ok(())
    }

    fn row_to_expense(row: &sqlx::sqlite::SqliteRow) -> Result<Expense> {
        let date_str: String = row.get("date");
        let method_str: String = row.get("payment_method");

        Ok(Expense {
            id: row.get::<i64, _>("id") as ExpenseId,
            description: row.get("description"),
            amount_cents: row.get("amount_cents"),
            category: row.get("category"),
            date: NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
                .with_context(|| format!("Invalid expense date: {}", date_str))?,
            payment_method: method_str
                .parse::<PaymentMethod>()
                .map_err(|e| anyhow::anyhow!(e))?,
        })
    }

    // ========================
    // Subscriptions
    // ========================

    /// All subscriptions, newest id first.
    pub async fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, amount_cents, billing_cycle, next_renewal, status, category, description
            FROM subscriptions
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list subscriptions")?;

        rows.iter().map(Self::row_to_subscription).collect()
    }

    /// Insert a new subscription and record its id as issued, atomically.
    pub async fn insert_subscription(&self, subscription: &Subscription) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to start transaction")?;

        sqlx::query(
            r#"
            INSERT INTO subscriptions (id, name, amount_cents, billing_cycle, next_renewal, status, category, description)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(subscription.id as i64)
        .bind(&subscription.name)
        .bind(subscription.amount_cents)
        .bind(subscription.billing_cycle.as_str())
        .bind(subscription.next_renewal.format(DATE_FORMAT).to_string())
        .bind(subscription.status.as_str())
        .bind(&subscription.category)
        .bind(&subscription.description)
        .execute(&mut *tx)
        .await
        .context("Failed to save subscription")?;

        Self::bump_counter(&mut tx, SUBSCRIPTION_COUNTER, subscription.id).await?;

        tx.commit().await.context("Failed to commit subscription")?;
        Ok(())
    }

    pub async fn update_subscription(&self, subscription: &Subscription) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE subscriptions
            SET name = ?, amount_cents = ?, billing_cycle = ?, next_renewal = ?, status = ?,
                category = ?, description = ?
            WHERE id = ?
            "#,
        )
        .bind(&subscription.name)
        .bind(subscription.amount_cents)
        .bind(subscription.billing_cycle.as_str())
        .bind(subscription.next_renewal.format(DATE_FORMAT).to_string())
        .bind(subscription.status.as_str())
        .bind(&subscription.category)
        .bind(&subscription.description)
        .bind(subscription.id as i64)
        .execute(&self.pool)
        .await
        .context("Failed to update subscription")?;
        Ok(())
    }

    pub async fn delete_subscription(&self, id: SubscriptionId) -> Result<()> {
        sqlx::query("DELETE FROM subscriptions WHERE id = ?")
            .bind(id as i64)
            .execute(&self.pool)
            .await
            .context("Failed to delete subscription")?;
        Ok(())
    }

    fn row_to_subscription(row: &sqlx::sqlite::SqliteRow) -> Result<Subscription> {
        let cycle_str: String = row.get("billing_cycle");
        let renewal_str: String = row.get("next_renewal");
        let status_str: String = row.get("status");

        Ok(Subscription {
            id: row.get::<i64, _>("id") as SubscriptionId,
            name: row.get("name"),
            amount_cents: row.get("amount_cents"),
            billing_cycle: cycle_str
                .parse::<BillingCycle>()
                .map_err(|e| anyhow::anyhow!(e))?,
            next_renewal: NaiveDate::parse_from_str(&renewal_str, DATE_FORMAT)
                .with_context(|| format!("Invalid renewal date: {}", renewal_str))?,
            status: status_str
                .parse::<SubscriptionStatus>()
                .map_err(|e| anyhow::anyhow!(e))?,
            category: row.get("category"),
            description: row.get("description"),
        })
    }

    // ========================
    // Account
    // ========================

    /// Remove every record and setting. Id counters are kept.
    pub async fn clear_all(&self) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to start transaction")?;

        for statement in [
            "DELETE FROM expenses",
            "DELETE FROM subscriptions",
            "DELETE FROM settings",
        ] {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to run {}", statement))?;
        }

        tx.commit().await.context("Failed to commit account removal")?;
        Ok(())
    }
}
