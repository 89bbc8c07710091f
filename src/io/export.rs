use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::{Currency, Session, Theme, TrackerService};
use crate::domain::format_cents;

/// Default file name for the settings export.
pub const SETTINGS_EXPORT_FILE: &str = "expense-tracker-data.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedProfile {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedPreferences {
    pub theme: Theme,
    pub currency: Currency,
    /// Decimal string, e.g. "2500.00".
    #[serde(rename = "monthlyBudget")]
    pub monthly_budget: String,
}

/// Profile and preference snapshot written by `settings export`.
/// Expenses and subscriptions are not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsExport {
    pub profile: ExportedProfile,
    pub preferences: ExportedPreferences,
    #[serde(rename = "exportDate")]
    pub export_date: DateTime<Utc>,
}

impl SettingsExport {
    pub fn from_session(session: &Session, export_date: DateTime<Utc>) -> Self {
        Self {
            profile: ExportedProfile {
                name: session.profile.name.clone(),
                email: session.profile.email.clone(),
            },
            preferences: ExportedPreferences {
                theme: session.preferences.theme,
                currency: session.preferences.currency,
                monthly_budget: format_cents(session.preferences.monthly_budget),
            },
            export_date,
        }
    }
}

/// Exporter for writing tracker data to files or streams
pub struct Exporter<'a> {
    service: &'a TrackerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a TrackerService) -> Self {
        Self { service }
    }

    /// Write the settings snapshot as pretty-printed JSON, stamped with the current time.
    pub fn export_settings_json<W: Write>(&self, writer: W) -> Result<SettingsExport> {
        self.export_settings_json_at(writer, Utc::now())
    }

    pub fn export_settings_json_at<W: Write>(
        &self,
        mut writer: W,
        export_date: DateTime<Utc>,
    ) -> Result<SettingsExport> {
        let export = SettingsExport::from_session(self.service.session(), export_date);

        let json = serde_json::to_string_pretty(&export)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        tracing::info!(user = %export.profile.name, "exported settings");
        Ok(export)
    }

    /// Export expenses to CSV, newest first
    pub fn export_expenses_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let expenses = self.service.ledger().expenses();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "date",
            "description",
            "category",
            "amount",
            "payment_method",
        ])?;

        for expense in expenses {
            csv_writer.write_record([
                expense.id.to_string(),
                expense.date.format("%Y-%m-%d").to_string(),
                expense.description.clone(),
                expense.category.clone(),
                format_cents(expense.amount_cents),
                expense.payment_method.as_str().to_string(),
            ])?;
        }

        csv_writer.flush()?;
        tracing::info!(count = expenses.len(), "exported expenses");
        Ok(expenses.len())
    }

    /// Export subscriptions to CSV, with their monthly equivalent
    pub fn export_subscriptions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let subscriptions = self.service.ledger().subscriptions();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "name",
            "amount",
            "billing_cycle",
            "monthly_equivalent",
            "next_renewal",
            "status",
            "category",
            "description",
        ])?;

        for sub in subscriptions {
            csv_writer.write_record([
                sub.id.to_string(),
                sub.name.clone(),
                format_cents(sub.amount_cents),
                sub.billing_cycle.as_str().to_string(),
                format_cents(sub.monthly_equivalent()),
                sub.next_renewal.format("%Y-%m-%d").to_string(),
                sub.status.as_str().to_string(),
                sub.category.clone(),
                sub.description.clone().unwrap_or_default(),
            ])?;
        }

        csv_writer.flush()?;
        tracing::info!(count = subscriptions.len(), "exported subscriptions");
        Ok(subscriptions.len())
    }
}
