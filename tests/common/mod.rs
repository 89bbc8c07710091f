// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use outlay::application::{TrackerConfig, TrackerService};
use outlay::domain::{BillingCycle, NewExpense, NewSubscription, PaymentMethod};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Helper to create a logged-in test service with a temporary database
pub async fn test_service() -> Result<(TrackerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let mut service = open_service(&temp_dir).await?;
    service.login("Test User", "test@example.com").await?;
    Ok((service, temp_dir))
}

/// Open (or reopen) the service backed by the database inside `temp_dir`
pub async fn open_service(temp_dir: &TempDir) -> Result<TrackerService> {
    let path = db_path(temp_dir);
    let service = TrackerService::open(path.to_str().unwrap(), TrackerConfig::default()).await?;
    Ok(service)
}

pub fn db_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("test.db")
}

/// Make every write to the id counters fail, through a second connection
pub async fn reject_counter_writes(temp_dir: &TempDir) -> Result<()> {
    let url = format!("sqlite:{}", db_path(temp_dir).display());
    let pool = SqlitePool::connect(&url).await?;
    sqlx::raw_sql(
        r#"
        CREATE TRIGGER reject_counter_update BEFORE UPDATE ON sequence_counter
        BEGIN SELECT RAISE(ABORT, 'counter is read-only'); END;
        CREATE TRIGGER reject_counter_insert BEFORE INSERT ON sequence_counter
        BEGIN SELECT RAISE(ABORT, 'counter is read-only'); END;
        "#,
    )
    .execute(&pool)
    .await?;
    pool.close().await;
    Ok(())
}

/// Helper to parse a YYYY-MM-DD string
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

pub fn expense(description: &str, amount_cents: i64, category: &str, date: &str) -> NewExpense {
    NewExpense {
        description: description.to_string(),
        amount_cents,
        category: category.to_string(),
        date: parse_date(date),
        payment_method: PaymentMethod::CreditCard,
    }
}

pub fn subscription(
    name: &str,
    amount_cents: i64,
    billing_cycle: BillingCycle,
    next_renewal: &str,
    category: &str,
) -> NewSubscription {
    NewSubscription {
        name: name.to_string(),
        amount_cents,
        billing_cycle,
        next_renewal: parse_date(next_renewal),
        category: category.to_string(),
        description: None,
    }
}
