use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Labels offered for expenses. Any other non-empty label is accepted as a custom category.
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Food",
    "Transportation",
    "Entertainment",
    "Healthcare",
    "Shopping",
    "Utilities",
    "Education",
    "Travel",
    "Other",
];

/// Labels offered for subscriptions.
pub const SUBSCRIPTION_CATEGORIES: &[&str] = &[
    "Entertainment",
    "Software",
    "Health",
    "Shopping",
    "Education",
    "News",
    "Productivity",
    "Gaming",
    "Other",
];

/// Trim a category label and snap it to the canonical spelling of a known label.
/// Returns None for an empty label.
pub fn normalize_category(label: &str, known: &[&str]) -> Option<String> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    let canonical = known
        .iter()
        .find(|k| k.eq_ignore_ascii_case(label))
        .map(|k| k.to_string());
    Some(canonical.unwrap_or_else(|| label.to_string()))
}

/// Error returned when a closed enumeration cannot be parsed from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {} '{}' (expected one of: {})",
            self.kind, self.value, self.expected
        )
    }
}

impl std::error::Error for ParseEnumError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Debit Card")]
    DebitCard,
    Cash,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "Digital Wallet")]
    DigitalWallet,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Cash,
        PaymentMethod::BankTransfer,
        PaymentMethod::DigitalWallet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::DebitCard => "Debit Card",
            PaymentMethod::Cash => "Cash",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::DigitalWallet => "Digital Wallet",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ParseEnumError;

    /// Accepts the display label or a compact form: "Credit Card", "credit-card", "credit_card".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "creditcard" | "credit" => Ok(PaymentMethod::CreditCard),
            "debitcard" | "debit" => Ok(PaymentMethod::DebitCard),
            "cash" => Ok(PaymentMethod::Cash),
            "banktransfer" | "bank" => Ok(PaymentMethod::BankTransfer),
            "digitalwallet" | "wallet" => Ok(PaymentMethod::DigitalWallet),
            _ => Err(ParseEnumError {
                kind: "payment method",
                value: s.to_string(),
                expected: "credit-card, debit-card, cash, bank-transfer, digital-wallet",
            }),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
