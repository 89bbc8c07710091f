mod repository;

pub use repository::*;

/// SQL migration for expenses, subscriptions and id counters
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

/// SQL migration for the settings table
pub const MIGRATION_002_SETTINGS: &str = include_str!("migrations/002_settings.sql");
