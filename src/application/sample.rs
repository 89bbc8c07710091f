use chrono::NaiveDate;

use crate::domain::{
    BillingCycle, Cents, NewExpense, NewSubscription, PaymentMethod, SubscriptionStatus,
};

/// Demo expenses, oldest first.
pub fn sample_expenses() -> Vec<NewExpense> {
    #[rustfmt::skip]
    let rows: [(&str, Cents, &str, (i32, u32, u32), PaymentMethod); 6] = [
        ("Restaurant", 6540, "Food", (2024, 1, 7), PaymentMethod::CreditCard),
        ("Pharmacy", 1575, "Healthcare", (2024, 1, 8), PaymentMethod::CreditCard),
        ("Movie Theater", 2800, "Entertainment", (2024, 1, 10), PaymentMethod::CreditCard),
        ("Coffee Shop", 1250, "Food", (2024, 1, 12), PaymentMethod::Cash),
        ("Gas Station", 4520, "Transportation", (2024, 1, 13), PaymentMethod::DebitCard),
        ("Grocery Store", 8732, "Food", (2024, 1, 15), PaymentMethod::CreditCard),
    ];

    rows.into_iter()
        .filter_map(|(description, amount_cents, category, (y, m, d), payment_method)| {
            Some(NewExpense {
                description: description.to_string(),
                amount_cents,
                category: category.to_string(),
                date: NaiveDate::from_ymd_opt(y, m, d)?,
                payment_method,
            })
        })
        .collect()
}

/// Demo subscriptions with the status each should end up in.
pub fn sample_subscriptions() -> Vec<(NewSubscription, SubscriptionStatus)> {
    #[rustfmt::skip]
    let rows: [(&str, Cents, BillingCycle, (i32, u32, u32), SubscriptionStatus, &str, &str); 6] = [
        ("Amazon Prime", 13900, BillingCycle::Yearly, (2024, 6, 15), SubscriptionStatus::Active, "Shopping", "Prime membership benefits"),
        ("Gym Membership", 2999, BillingCycle::Monthly, (2024, 1, 30), SubscriptionStatus::Paused, "Health", "Local fitness center"),
        ("GitHub Pro", 400, BillingCycle::Monthly, (2024, 1, 25), SubscriptionStatus::Active, "Software", "Developer tools"),
        ("Adobe Creative Cloud", 5299, BillingCycle::Monthly, (2024, 2, 5), SubscriptionStatus::Active, "Software", "Creative suite subscription"),
        ("Spotify", 999, BillingCycle::Monthly, (2024, 1, 20), SubscriptionStatus::Active, "Entertainment", "Premium music streaming"),
        ("Netflix", 1599, BillingCycle::Monthly, (2024, 2, 15), SubscriptionStatus::Active, "Entertainment", "Premium streaming plan"),
    ];

    rows.into_iter()
        .filter_map(
            |(name, amount_cents, billing_cycle, (y, m, d), status, category, description)| {
                let subscription = NewSubscription {
                    name: name.to_string(),
                    amount_cents,
                    billing_cycle,
                    next_renewal: NaiveDate::from_ymd_opt(y, m, d)?,
                    category: category.to_string(),
                    description: Some(description.to_string()),
                };
                Some((subscription, status))
            },
        )
        .collect()
}
