use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Cents, LedgerEntry, ParseEnumError};

pub type SubscriptionId = u64;

/// Monthly amounts are accumulated in 1/1200ths of a cent so that yearly (/12)
/// and weekly (x4.33) conversions stay exact until the final rounding.
pub(crate) const MONTHLY_SCALE: i128 = 1200;

/// Average weeks per month, in hundredths.
const WEEKS_PER_MONTH_X100: i128 = 433;

/// Recurrence period of a subscription charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Weekly,
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Weekly => "weekly",
            BillingCycle::Monthly => "monthly",
            BillingCycle::Yearly => "yearly",
        }
    }

    /// Monthly cost of `amount` in MONTHLY_SCALE units.
    pub(crate) fn scaled_monthly(&self, amount: Cents) -> i128 {
        let amount = amount as i128;
        match self {
            BillingCycle::Weekly => amount * WEEKS_PER_MONTH_X100 * (MONTHLY_SCALE / 100),
            BillingCycle::Monthly => amount * MONTHLY_SCALE,
            BillingCycle::Yearly => amount * (MONTHLY_SCALE / 12),
        }
    }

    /// Monthly-equivalent of one charge, rounded to the nearest cent.
    pub fn monthly_equivalent(&self, amount: Cents) -> Cents {
        round_scaled(self.scaled_monthly(amount))
    }
}

/// Round a MONTHLY_SCALE value to whole cents, half away from zero.
pub(crate) fn round_scaled(scaled: i128) -> Cents {
    let half = MONTHLY_SCALE / 2;
    let cents = if scaled >= 0 {
        (scaled + half) / MONTHLY_SCALE
    } else {
        -((-scaled + half) / MONTHLY_SCALE)
    };
    cents as Cents
}

impl FromStr for BillingCycle {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(BillingCycle::Weekly),
            "monthly" => Ok(BillingCycle::Monthly),
            "yearly" | "annual" | "annually" => Ok(BillingCycle::Yearly),
            _ => Err(ParseEnumError {
                kind: "billing cycle",
                value: s.to_string(),
                expected: "weekly, monthly, yearly",
            }),
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Paused,
    Cancelled,
}

impl SubscriptionStatus {
    pub const ALL: [SubscriptionStatus; 3] = [
        SubscriptionStatus::Active,
        SubscriptionStatus::Paused,
        SubscriptionStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Paused => "paused",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(SubscriptionStatus::Active),
            "paused" => Ok(SubscriptionStatus::Paused),
            "cancelled" | "canceled" => Ok(SubscriptionStatus::Cancelled),
            _ => Err(ParseEnumError {
                kind: "subscription status",
                value: s.to_string(),
                expected: "active, paused, cancelled",
            }),
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whole calendar days from `today` until `renewal`.
/// Zero on the renewal day itself, negative once the date has passed.
pub fn days_until_renewal(renewal: NaiveDate, today: NaiveDate) -> i64 {
    (renewal - today).num_days()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub name: String,
    pub amount_cents: Cents,
    pub billing_cycle: BillingCycle,
    pub next_renewal: NaiveDate,
    pub status: SubscriptionStatus,
    pub category: String,
    pub description: Option<String>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }

    pub fn monthly_equivalent(&self) -> Cents {
        self.billing_cycle.monthly_equivalent(self.amount_cents)
    }

    pub fn days_until_renewal(&self, today: NaiveDate) -> i64 {
        days_until_renewal(self.next_renewal, today)
    }

    /// Active and renewing between today and `window_days` from now, inclusive.
    pub fn renews_within(&self, today: NaiveDate, window_days: i64) -> bool {
        let days = self.days_until_renewal(today);
        self.is_active() && (0..=window_days).contains(&days)
    }

    /// Active with a renewal date already behind us.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_active() && self.days_until_renewal(today) < 0
    }
}

impl LedgerEntry for Subscription {
    fn label(&self) -> &str {
        &self.name
    }

    fn category(&self) -> &str {
        &self.category
    }

    /// Subscriptions are weighed by their monthly cost so that cycles can be compared.
    fn weight(&self) -> Cents {
        self.monthly_equivalent()
    }
}

/// A subscription as submitted. New subscriptions always start active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubscription {
    pub name: String,
    pub amount_cents: Cents,
    pub billing_cycle: BillingCycle,
    pub next_renewal: NaiveDate,
    pub category: String,
    pub description: Option<String>,
}

impl NewSubscription {
    pub fn into_subscription(self, id: SubscriptionId) -> Subscription {
        Subscription {
            id,
            name: self.name,
            amount_cents: self.amount_cents,
            billing_cycle: self.billing_cycle,
            next_renewal: self.next_renewal,
            status: SubscriptionStatus::Active,
            category: self.category,
            description: self.description.filter(|d| !d.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubscriptionFilter {
    pub search: Option<String>,
    pub status: Option<SubscriptionStatus>,
    pub category: Option<String>,
}

impl SubscriptionFilter {
    pub fn by_status(status: SubscriptionStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn matches(&self, subscription: &Subscription) -> bool {
        if let Some(term) = &self.search {
            if !subscription.matches_search(term) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if subscription.status != status {
                return false;
            }
        }
        match &self.category {
            Some(category) => subscription.category == *category,
            None => true,
        }
    }
}
