use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{Cents, ParseEnumError, format_cents, parse_cents};

// Settings keys, kept identical to the keys the web client stored.
pub const KEY_AUTHENTICATED: &str = "isAuthenticated";
pub const KEY_USER_NAME: &str = "userName";
pub const KEY_USER_EMAIL: &str = "userEmail";
pub const KEY_THEME: &str = "theme";
pub const KEY_CURRENCY: &str = "currency";
pub const KEY_MONTHLY_BUDGET: &str = "monthlyBudget";
pub const KEY_EMAIL_NOTIFICATIONS: &str = "emailNotifications";
pub const KEY_PUSH_NOTIFICATIONS: &str = "pushNotifications";
pub const KEY_WEEKLY_REPORTS: &str = "weeklyReports";
pub const KEY_BUDGET_ALERTS: &str = "budgetAlerts";
pub const KEY_ALERT_THRESHOLD: &str = "alertThreshold";

/// Keys removed on logout. Preferences survive a logout.
pub const LOGOUT_KEYS: [&str; 3] = [KEY_AUTHENTICATED, KEY_USER_EMAIL, KEY_USER_NAME];

pub const DEFAULT_USER_NAME: &str = "User";
pub const DEFAULT_MONTHLY_BUDGET: Cents = 250_000;
pub const DEFAULT_ALERT_THRESHOLD: u8 = 80;
pub const ALERT_THRESHOLDS: [u8; 4] = [50, 70, 80, 90];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

impl FromStr for Theme {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            _ => Err(ParseEnumError {
                kind: "theme",
                value: s.to_string(),
                expected: "light, dark, system",
            }),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Jpy,
    Cad,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Cad => "CAD",
        }
    }
}

impl FromStr for Currency {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "JPY" => Ok(Currency::Jpy),
            "CAD" => Ok(Currency::Cad),
            _ => Err(ParseEnumError {
                kind: "currency",
                value: s.to_string(),
                expected: "USD, EUR, GBP, JPY, CAD",
            }),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: DEFAULT_USER_NAME.to_string(),
            email: String::new(),
        }
    }
}

impl Profile {
    /// Initials shown next to the profile, e.g. "Ada Lovelace" -> "AL".
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: Theme,
    pub currency: Currency,
    pub monthly_budget: Cents,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub weekly_reports: bool,
    pub budget_alerts: bool,
    pub alert_threshold: u8,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            currency: Currency::Usd,
            monthly_budget: DEFAULT_MONTHLY_BUDGET,
            email_notifications: true,
            push_notifications: false,
            weekly_reports: true,
            budget_alerts: true,
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
        }
    }
}

/// Application state for one user: login flag, profile and preferences.
///
/// Loaded once from the settings table when the service opens, and written back
/// only by the service's session operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub authenticated: bool,
    pub profile: Profile,
    pub preferences: Preferences,
}

impl Session {
    /// Rebuild the session from stored key/value settings.
    /// Unreadable values fall back to their defaults.
    pub fn from_settings(settings: &HashMap<String, String>) -> Self {
        let defaults = Preferences::default();
        let get = |key: &str| settings.get(key).map(String::as_str);

        let preferences = Preferences {
            theme: parse_setting(KEY_THEME, get(KEY_THEME), defaults.theme),
            currency: parse_setting(KEY_CURRENCY, get(KEY_CURRENCY), defaults.currency),
            monthly_budget: match get(KEY_MONTHLY_BUDGET).map(parse_cents) {
                Some(Ok(cents)) if cents >= 0 => cents,
                Some(_) => {
                    tracing::warn!(key = KEY_MONTHLY_BUDGET, "ignoring unreadable setting");
                    defaults.monthly_budget
                }
                None => defaults.monthly_budget,
            },
            email_notifications: parse_setting(
                KEY_EMAIL_NOTIFICATIONS,
                get(KEY_EMAIL_NOTIFICATIONS),
                defaults.email_notifications,
            ),
            push_notifications: parse_setting(
                KEY_PUSH_NOTIFICATIONS,
                get(KEY_PUSH_NOTIFICATIONS),
                defaults.push_notifications,
            ),
            weekly_reports: parse_setting(
                KEY_WEEKLY_REPORTS,
                get(KEY_WEEKLY_REPORTS),
                defaults.weekly_reports,
            ),
            budget_alerts: parse_setting(
                KEY_BUDGET_ALERTS,
                get(KEY_BUDGET_ALERTS),
                defaults.budget_alerts,
            ),
            alert_threshold: match get(KEY_ALERT_THRESHOLD).map(str::parse::<u8>) {
                Some(Ok(threshold)) if ALERT_THRESHOLDS.contains(&threshold) => threshold,
                Some(_) => {
                    tracing::warn!(key = KEY_ALERT_THRESHOLD, "ignoring unreadable setting");
                    defaults.alert_threshold
                }
                None => defaults.alert_threshold,
            },
        };

        let profile = Profile {
            name: get(KEY_USER_NAME)
                .filter(|n| !n.is_empty())
                .unwrap_or(DEFAULT_USER_NAME)
                .to_string(),
            email: get(KEY_USER_EMAIL).unwrap_or_default().to_string(),
        };

        Self {
            authenticated: get(KEY_AUTHENTICATED).is_some_and(|v| v == "true"),
            profile,
            preferences,
        }
    }

    pub fn profile_settings(&self) -> Vec<(&'static str, String)> {
        vec![
            (KEY_USER_NAME, self.profile.name.clone()),
            (KEY_USER_EMAIL, self.profile.email.clone()),
        ]
    }

    pub fn preference_settings(&self) -> Vec<(&'static str, String)> {
        let p = &self.preferences;
        vec![
            (KEY_THEME, p.theme.as_str().to_string()),
            (KEY_CURRENCY, p.currency.as_str().to_string()),
            (KEY_MONTHLY_BUDGET, format_cents(p.monthly_budget)),
            (KEY_EMAIL_NOTIFICATIONS, p.email_notifications.to_string()),
            (KEY_PUSH_NOTIFICATIONS, p.push_notifications.to_string()),
            (KEY_WEEKLY_REPORTS, p.weekly_reports.to_string()),
            (KEY_BUDGET_ALERTS, p.budget_alerts.to_string()),
            (KEY_ALERT_THRESHOLD, p.alert_threshold.to_string()),
        ]
    }
}

fn parse_setting<T: FromStr>(key: &str, raw: Option<&str>, default: T) -> T {
    match raw {
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value, "ignoring unreadable setting");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_settings_give_defaults() {
        let session = Session::from_settings(&HashMap::new());
        assert!(!session.authenticated);
        assert_eq!(session.profile.name, "User");
        assert_eq!(session.preferences, Preferences::default());
        assert_eq!(session.preferences.monthly_budget, 250_000);
    }

    #[test]
    fn test_settings_roundtrip() {
        let mut session = Session {
            authenticated: true,
            ..Session::default()
        };
        session.profile.name = "Ada Lovelace".to_string();
        session.profile.email = "ada@example.com".to_string();
        session.preferences.theme = Theme::Dark;
        session.preferences.currency = Currency::Eur;
        session.preferences.monthly_budget = 180_050;
        session.preferences.alert_threshold = 90;
        session.preferences.push_notifications = true;

        let mut stored: HashMap<String, String> = session
            .profile_settings()
            .into_iter()
            .chain(session.preference_settings())
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        stored.insert(KEY_AUTHENTICATED.to_string(), "true".to_string());

        assert_eq!(Session::from_settings(&stored), session);
    }

    #[test]
    fn test_unreadable_values_fall_back() {
        let session = Session::from_settings(&settings(&[
            (KEY_THEME, "neon"),
            (KEY_CURRENCY, "eur"),
            (KEY_MONTHLY_BUDGET, "lots"),
            (KEY_ALERT_THRESHOLD, "high"),
            (KEY_USER_NAME, ""),
        ]));
        assert_eq!(session.preferences.theme, Theme::System);
        assert_eq!(session.preferences.currency, Currency::Eur);
        assert_eq!(session.preferences.monthly_budget, DEFAULT_MONTHLY_BUDGET);
        assert_eq!(session.preferences.alert_threshold, 80);
        assert_eq!(session.profile.name, "User");
    }

    #[test]
    fn test_alert_threshold_outside_allowed_steps_falls_back() {
        let session = Session::from_settings(&settings(&[(KEY_ALERT_THRESHOLD, "55")]));
        assert_eq!(session.preferences.alert_threshold, DEFAULT_ALERT_THRESHOLD);

        let session = Session::from_settings(&settings(&[(KEY_ALERT_THRESHOLD, "90")]));
        assert_eq!(session.preferences.alert_threshold, 90);
    }

    #[test]
    fn test_monthly_budget_accepts_whole_units() {
        let session = Session::from_settings(&settings(&[(KEY_MONTHLY_BUDGET, "2500")]));
        assert_eq!(session.preferences.monthly_budget, 250_000);
    }

    #[test]
    fn test_initials() {
        let profile = Profile {
            name: "ada byron lovelace".to_string(),
            email: String::new(),
        };
        assert_eq!(profile.initials(), "ABL");
    }
}
