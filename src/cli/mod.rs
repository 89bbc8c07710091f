use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::application::{
    Currency, PREFERENCES_SAVE_FAILED, PREFERENCES_SAVED, PROFILE_SAVE_FAILED, PROFILE_SAVED,
    Profile, RENEWAL_WINDOW_DAYS, SubscriptionView, Theme, TrackerConfig, TrackerService,
};
use crate::domain::{
    BillingCycle, Cents, EXPENSE_CATEGORIES, ExpenseFilter, NewExpense, NewSubscription,
    PaymentMethod, SUBSCRIPTION_CATEGORIES, SubscriptionFilter, SubscriptionStatus, format_money,
    parse_cents,
};

/// Outlay - Expense and Subscription Tracker
#[derive(Parser)]
#[command(name = "outlay")]
#[command(about = "Track everyday expenses and recurring subscriptions")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, global = true, env = "OUTLAY_DB", default_value = "outlay.db")]
    pub database: String,

    /// Delay applied before saving profile and preferences, in milliseconds
    #[arg(long, global = true, env = "OUTLAY_SAVE_DELAY_MS", default_value_t = 0)]
    pub save_delay_ms: u64,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with a display name
    Login {
        /// Display name
        name: String,

        /// Email address
        #[arg(short, long, default_value = "")]
        email: String,
    },

    /// Log out. Preferences are kept
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Expense management commands
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Subscription management commands
    #[command(subcommand)]
    Subscription(SubscriptionCommands),

    /// Overview of spending, budget and upcoming renewals
    Dashboard {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Profile and preference commands
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Export records to CSV
    Export {
        /// What to export: expenses, subscriptions
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Load demo expenses and subscriptions
    Seed,
}

#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// What the money was spent on
        description: String,

        /// Amount (e.g., "12.50" or "12")
        amount: String,

        /// Category (e.g., Food, Transportation)
        #[arg(short, long)]
        category: String,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Payment method: credit-card, debit-card, cash, bank-transfer, digital-wallet
        #[arg(short = 'm', long = "method", default_value = "credit-card")]
        payment_method: String,
    },

    /// Change fields of an existing expense
    Edit {
        /// Expense ID
        id: u64,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        amount: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        /// YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,

        #[arg(short = 'm', long = "method")]
        payment_method: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: u64,
    },

    /// List expenses, newest first
    List {
        /// Case-insensitive match on description or category
        #[arg(short, long)]
        search: Option<String>,

        /// Only this category
        #[arg(short, long)]
        category: Option<String>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Spending per category
    Categories,
}

#[derive(Subcommand)]
pub enum SubscriptionCommands {
    /// Record a new subscription
    Add {
        /// Service name
        name: String,

        /// Amount charged per billing cycle
        amount: String,

        /// Billing cycle: weekly, monthly, yearly
        #[arg(long, default_value = "monthly")]
        cycle: String,

        /// Next renewal date (YYYY-MM-DD)
        #[arg(long)]
        renewal: String,

        /// Category (e.g., Entertainment, Software)
        #[arg(short, long)]
        category: String,

        /// Free-form note
        #[arg(long)]
        description: Option<String>,
    },

    /// Change fields of an existing subscription
    Edit {
        /// Subscription ID
        id: u64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        amount: Option<String>,

        #[arg(long)]
        cycle: Option<String>,

        /// YYYY-MM-DD
        #[arg(long)]
        renewal: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// active, paused, cancelled
        #[arg(long)]
        status: Option<String>,
    },

    /// Delete a subscription
    Delete {
        /// Subscription ID
        id: u64,
    },

    /// Pause a subscription
    Pause {
        /// Subscription ID
        id: u64,
    },

    /// Resume a paused or cancelled subscription
    Resume {
        /// Subscription ID
        id: u64,
    },

    /// Cancel a subscription
    Cancel {
        /// Subscription ID
        id: u64,
    },

    /// List subscriptions with monthly cost and renewal countdown
    List {
        /// Case-insensitive match on name or category
        #[arg(short, long)]
        search: Option<String>,

        /// Only this status: active, paused, cancelled
        #[arg(long)]
        status: Option<String>,

        /// Only this category
        #[arg(short, long)]
        category: Option<String>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Active subscriptions renewing soon
    Upcoming {
        /// Look-ahead window in days
        #[arg(long, default_value_t = RENEWAL_WINDOW_DAYS)]
        days: i64,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show profile and preferences
    Show,

    /// Update the profile
    Profile {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },

    /// Update preferences
    Preferences {
        /// light, dark, system
        #[arg(long)]
        theme: Option<String>,

        /// USD, EUR, GBP, JPY, CAD
        #[arg(long)]
        currency: Option<String>,

        /// Monthly budget (e.g., "2500.00")
        #[arg(long)]
        budget: Option<String>,

        #[arg(long)]
        email_notifications: Option<bool>,

        #[arg(long)]
        push_notifications: Option<bool>,

        #[arg(long)]
        weekly_reports: Option<bool>,

        #[arg(long)]
        budget_alerts: Option<bool>,

        /// Percentage of the budget that triggers an alert: 50, 70, 80, 90
        #[arg(long)]
        alert_threshold: Option<u8>,
    },

    /// Write profile and preferences to a JSON file
    Export {
        /// Output file ("-" for stdout)
        #[arg(short, long, default_value = crate::io::SETTINGS_EXPORT_FILE)]
        output: String,
    },

    /// Delete all records and settings
    DeleteAccount {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    pub fn config(&self) -> TrackerConfig {
        TrackerConfig {
            save_delay: Duration::from_millis(self.save_delay_ms),
        }
    }

    pub async fn run(self) -> Result<()> {
        let mut service = TrackerService::open(&self.database, self.config()).await?;
        let today = Local::now().date_naive();

        match self.command {
            Commands::Login { name, email } => {
                let session = service.login(&name, &email).await?;
                println!("Logged in as {}", session.profile.name);
            }

            Commands::Logout => {
                service.logout().await?;
                println!("Logged out.");
            }

            Commands::Whoami => {
                let session = service.require_login()?;
                println!(
                    "{} ({})",
                    session.profile.name,
                    if session.profile.email.is_empty() {
                        "no email"
                    } else {
                        session.profile.email.as_str()
                    }
                );
            }

            Commands::Expense(cmd) => {
                service.require_login()?;
                run_expense_command(&mut service, cmd).await?;
            }

            Commands::Subscription(cmd) => {
                service.require_login()?;
                run_subscription_command(&mut service, cmd, today).await?;
            }

            Commands::Dashboard { format } => {
                service.require_login()?;
                run_dashboard_command(&service, &format, today)?;
            }

            Commands::Settings(cmd) => {
                service.require_login()?;
                run_settings_command(&mut service, cmd).await?;
            }

            Commands::Export {
                export_type,
                output,
            } => {
                service.require_login()?;
                run_export_command(&service, &export_type, output.as_deref())?;
            }

            Commands::Seed => {
                service.require_login()?;
                let added = service.seed_sample_data().await?;
                println!("Added {} sample records", added);
            }
        }

        Ok(())
    }
}

async fn run_expense_command(service: &mut TrackerService, cmd: ExpenseCommands) -> Result<()> {
    match cmd {
        ExpenseCommands::Add {
            description,
            amount,
            category,
            date,
            payment_method,
        } => {
            let date = match date {
                Some(date_str) => parse_date(&date_str)?,
                None => Local::now().date_naive(),
            };
            let expense = service
                .add_expense(NewExpense {
                    description,
                    amount_cents: parse_amount(&amount)?,
                    category,
                    date,
                    payment_method: parse_payment_method(&payment_method)?,
                })
                .await?;

            println!(
                "Recorded expense #{}: {} {} ({})",
                expense.id,
                money(service, expense.amount_cents),
                expense.description,
                expense.category
            );
        }

        ExpenseCommands::Edit {
            id,
            description,
            amount,
            category,
            date,
            payment_method,
        } => {
            let mut expense = service.get_expense(id)?.clone();
            if let Some(description) = description {
                expense.description = description;
            }
            if let Some(amount) = amount {
                expense.amount_cents = parse_amount(&amount)?;
            }
            if let Some(category) = category {
                expense.category = category;
            }
            if let Some(date) = date {
                expense.date = parse_date(&date)?;
            }
            if let Some(method) = payment_method {
                expense.payment_method = parse_payment_method(&method)?;
            }

            let expense = service.edit_expense(expense).await?;
            println!("Updated expense #{}", expense.id);
        }

        ExpenseCommands::Delete { id } => {
            let expense = service.delete_expense(id).await?;
            println!("Deleted expense #{}: {}", expense.id, expense.description);
        }

        ExpenseCommands::List {
            search,
            category,
            format,
        } => {
            let filter = ExpenseFilter { search, category };
            let summary = service.expense_summary(&filter);

            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
                _ => {
                    if summary.expenses.is_empty() {
                        println!("No expenses found.");
                    } else {
                        println!(
                            "{:<5} {:<12} {:<25} {:<15} {:<15} {:>12}",
                            "ID", "DATE", "DESCRIPTION", "CATEGORY", "METHOD", "AMOUNT"
                        );
                        println!("{}", "-".repeat(89));
                        for expense in &summary.expenses {
                            println!(
                                "{:<5} {:<12} {:<25} {:<15} {:<15} {:>12}",
                                expense.id,
                                expense.date.format("%Y-%m-%d"),
                                truncate(&expense.description, 25),
                                truncate(&expense.category, 15),
                                expense.payment_method,
                                money(service, expense.amount_cents)
                            );
                        }
                        println!("{}", "-".repeat(89));
                        println!(
                            "{:<75} {:>12}",
                            format!("{} expense(s)", summary.count),
                            money(service, summary.total)
                        );
                    }
                }
            }
        }

        ExpenseCommands::Categories => {
            let summary = service.expense_summary(&ExpenseFilter::default());
            if summary.categories.is_empty() {
                println!("No expenses found.");
                println!("Known categories: {}", EXPENSE_CATEGORIES.join(", "));
            } else {
                println!("{:<20} {:>6} {:>12} {:>8}", "CATEGORY", "COUNT", "TOTAL", "%");
                println!("{}", "-".repeat(49));
                for cat in &summary.categories {
                    println!(
                        "{:<20} {:>6} {:>12} {:>7.1}%",
                        truncate(&cat.category, 20),
                        cat.count,
                        money(service, cat.total),
                        cat.percentage
                    );
                }
            }
        }
    }
    Ok(())
}

async fn run_subscription_command(
    service: &mut TrackerService,
    cmd: SubscriptionCommands,
    today: NaiveDate,
) -> Result<()> {
    match cmd {
        SubscriptionCommands::Add {
            name,
            amount,
            cycle,
            renewal,
            category,
            description,
        } => {
            let subscription = service
                .add_subscription(NewSubscription {
                    name,
                    amount_cents: parse_amount(&amount)?,
                    billing_cycle: parse_cycle(&cycle)?,
                    next_renewal: parse_date(&renewal)?,
                    category,
                    description,
                })
                .await?;

            println!(
                "Added subscription #{}: {} {} {}",
                subscription.id,
                subscription.name,
                money(service, subscription.amount_cents),
                subscription.billing_cycle
            );
        }

        SubscriptionCommands::Edit {
            id,
            name,
            amount,
            cycle,
            renewal,
            category,
            description,
            status,
        } => {
            let mut subscription = service.get_subscription(id)?.clone();
            if let Some(name) = name {
                subscription.name = name;
            }
            if let Some(amount) = amount {
                subscription.amount_cents = parse_amount(&amount)?;
            }
            if let Some(cycle) = cycle {
                subscription.billing_cycle = parse_cycle(&cycle)?;
            }
            if let Some(renewal) = renewal {
                subscription.next_renewal = parse_date(&renewal)?;
            }
            if let Some(category) = category {
                subscription.category = category;
            }
            if let Some(description) = description {
                subscription.description = Some(description);
            }
            if let Some(status) = status {
                subscription.status = parse_status(&status)?;
            }

            let subscription = service.edit_subscription(subscription).await?;
            println!("Updated subscription #{}", subscription.id);
        }

        SubscriptionCommands::Delete { id } => {
            let subscription = service.delete_subscription(id).await?;
            println!(
                "Deleted subscription #{}: {}",
                subscription.id, subscription.name
            );
        }

        SubscriptionCommands::Pause { id } => {
            let subscription = service
                .set_subscription_status(id, SubscriptionStatus::Paused)
                .await?;
            println!("Paused subscription: {}", subscription.name);
        }

        SubscriptionCommands::Resume { id } => {
            let subscription = service
                .set_subscription_status(id, SubscriptionStatus::Active)
                .await?;
            println!("Resumed subscription: {}", subscription.name);
        }

        SubscriptionCommands::Cancel { id } => {
            let subscription = service
                .set_subscription_status(id, SubscriptionStatus::Cancelled)
                .await?;
            println!("Cancelled subscription: {}", subscription.name);
        }

        SubscriptionCommands::List {
            search,
            status,
            category,
            format,
        } => {
            let filter = SubscriptionFilter {
                search,
                status: status.as_deref().map(parse_status).transpose()?,
                category,
            };
            let summary = service.subscription_summary(&filter, today);

            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
                _ => {
                    if summary.subscriptions.is_empty() {
                        println!("No subscriptions found.");
                        println!("Known categories: {}", SUBSCRIPTION_CATEGORIES.join(", "));
                    } else {
                        print_subscription_table(service, &summary.subscriptions);
                    }
                    println!();
                    println!(
                        "Monthly total:   {}",
                        money(service, summary.monthly_total)
                    );
                    println!(
                        "Active:          {} ({} paused, {} cancelled)",
                        summary.active_count, summary.paused_count, summary.cancelled_count
                    );
                    println!(
                        "Next renewal:    {}",
                        match summary.soonest_renewal {
                            Some(days) => describe_countdown(days),
                            None => "no upcoming renewal".to_string(),
                        }
                    );
                }
            }
        }

        SubscriptionCommands::Upcoming { days } => {
            let upcoming = service.upcoming_renewals(today, days);
            if upcoming.is_empty() {
                println!("No renewals in the next {} days.", days);
            } else {
                print_subscription_table(service, &upcoming);
            }
        }
    }
    Ok(())
}

fn print_subscription_table(service: &TrackerService, views: &[SubscriptionView]) {
    println!(
        "{:<5} {:<22} {:>10} {:<8} {:>10} {:<10} {:<12} RENEWS",
        "ID", "NAME", "AMOUNT", "CYCLE", "MONTHLY", "STATUS", "NEXT"
    );
    println!("{}", "-".repeat(96));
    for view in views {
        let sub = &view.subscription;
        println!(
            "{:<5} {:<22} {:>10} {:<8} {:>10} {:<10} {:<12} {}",
            sub.id,
            truncate(&sub.name, 22),
            money(service, sub.amount_cents),
            sub.billing_cycle,
            money(service, view.monthly_equivalent),
            sub.status,
            sub.next_renewal.format("%Y-%m-%d"),
            if sub.is_active() {
                describe_countdown(view.days_until_renewal)
            } else {
                "-".to_string()
            }
        );
    }
}

fn run_dashboard_command(service: &TrackerService, format: &str, today: NaiveDate) -> Result<()> {
    let dashboard = service.dashboard(today);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    println!("Welcome back, {}", dashboard.user_name);
    println!();
    println!(
        "  Total expenses:     {} ({} records)",
        money(service, dashboard.total_expenses),
        dashboard.expense_count
    );
    println!(
        "  This month:         {}",
        money(service, dashboard.this_month)
    );
    println!(
        "  Subscriptions:      {}/month ({} active)",
        money(service, dashboard.subscriptions_monthly),
        dashboard.active_subscriptions
    );

    let budget = &dashboard.budget;
    match budget.percentage {
        Some(pct) => println!(
            "  Budget:             {} of {} ({:.0}%){}",
            money(service, budget.spent),
            money(service, budget.monthly_budget),
            pct,
            if budget.alert { "  ALERT" } else { "" }
        ),
        None => println!("  Budget:             not set"),
    }

    println!();
    println!("Monthly spending:");
    for month in &dashboard.history {
        println!(
            "  {:<10} {:>12} ({})",
            month.month_start.format("%Y-%m"),
            money(service, month.total),
            month.count
        );
    }

    println!();
    println!("Recent expenses:");
    if dashboard.recent_expenses.is_empty() {
        println!("  none");
    }
    for expense in &dashboard.recent_expenses {
        println!(
            "  {:<12} {:<25} {:>12}",
            expense.date.format("%Y-%m-%d"),
            truncate(&expense.description, 25),
            money(service, expense.amount_cents)
        );
    }

    println!();
    println!("Upcoming renewals:");
    if dashboard.upcoming_renewals.is_empty() {
        println!("  none");
    }
    for view in &dashboard.upcoming_renewals {
        println!(
            "  {:<22} {:>10} {}",
            truncate(&view.subscription.name, 22),
            money(service, view.subscription.amount_cents),
            describe_countdown(view.days_until_renewal)
        );
    }

    Ok(())
}

async fn run_settings_command(service: &mut TrackerService, cmd: SettingsCommands) -> Result<()> {
    match cmd {
        SettingsCommands::Show => {
            let session = service.session();
            let profile = &session.profile;
            let prefs = &session.preferences;

            println!("Profile:");
            println!("  Name:                {} ({})", profile.name, profile.initials());
            println!("  Email:               {}", profile.email);
            println!();
            println!("Preferences:");
            println!("  Theme:               {}", prefs.theme);
            println!("  Currency:            {}", prefs.currency);
            println!(
                "  Monthly budget:      {}",
                format_money(prefs.monthly_budget, prefs.currency.as_str())
            );
            println!("  Email notifications: {}", on_off(prefs.email_notifications));
            println!("  Push notifications:  {}", on_off(prefs.push_notifications));
            println!("  Weekly reports:      {}", on_off(prefs.weekly_reports));
            println!("  Budget alerts:       {}", on_off(prefs.budget_alerts));
            println!("  Alert threshold:     {}%", prefs.alert_threshold);
        }

        SettingsCommands::Profile { name, email } => {
            let current = &service.session().profile;
            let profile = Profile {
                name: name.unwrap_or_else(|| current.name.clone()),
                email: email.unwrap_or_else(|| current.email.clone()),
            };

            match service.save_profile(profile).await {
                Ok(()) => println!("{}", PROFILE_SAVED),
                Err(err) => {
                    tracing::warn!(error = %err, "profile save failed");
                    eprintln!("{}", PROFILE_SAVE_FAILED);
                    return Err(err.into());
                }
            }
        }

        SettingsCommands::Preferences {
            theme,
            currency,
            budget,
            email_notifications,
            push_notifications,
            weekly_reports,
            budget_alerts,
            alert_threshold,
        } => {
            let mut prefs = service.session().preferences.clone();
            if let Some(theme) = theme {
                prefs.theme = theme
                    .parse::<Theme>()
                    .map_err(|e| anyhow::anyhow!(e))?;
            }
            if let Some(currency) = currency {
                prefs.currency = currency
                    .parse::<Currency>()
                    .map_err(|e| anyhow::anyhow!(e))?;
            }
            if let Some(budget) = budget {
                prefs.monthly_budget = parse_amount(&budget)?;
            }
            if let Some(value) = email_notifications {
                prefs.email_notifications = value;
            }
            if let Some(value) = push_notifications {
                prefs.push_notifications = value;
            }
            if let Some(value) = weekly_reports {
                prefs.weekly_reports = value;
            }
            if let Some(value) = budget_alerts {
                prefs.budget_alerts = value;
            }
            if let Some(value) = alert_threshold {
                prefs.alert_threshold = value;
            }

            match service.save_preferences(prefs).await {
                Ok(()) => println!("{}", PREFERENCES_SAVED),
                Err(err) => {
                    tracing::warn!(error = %err, "preferences save failed");
                    eprintln!("{}", PREFERENCES_SAVE_FAILED);
                    return Err(err.into());
                }
            }
        }

        SettingsCommands::Export { output } => {
            use crate::application::DATA_EXPORTED;
            use crate::io::Exporter;
            use std::fs::File;
            use std::io::stdout;

            let exporter = Exporter::new(service);
            if output == "-" {
                exporter.export_settings_json(stdout())?;
            } else {
                let file = File::create(&output)
                    .with_context(|| format!("Failed to create output file: {}", output))?;
                exporter.export_settings_json(file)?;
                println!("{} ({})", DATA_EXPORTED, output);
            }
        }

        SettingsCommands::DeleteAccount { yes } => {
            if !yes {
                anyhow::bail!(
                    "This removes every expense, subscription and setting. Re-run with --yes to confirm"
                );
            }
            service.delete_account().await?;
            println!("Account deleted.");
        }
    }
    Ok(())
}

fn run_export_command(
    service: &TrackerService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "expenses" => {
            let count = exporter.export_expenses_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} expenses", count);
            }
        }
        "subscriptions" => {
            let count = exporter.export_subscriptions_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} subscriptions", count);
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: expenses, subscriptions",
                export_type
            );
        }
    }

    Ok(())
}

/// Amount in the user's preferred currency.
fn money(service: &TrackerService, cents: Cents) -> String {
    format_money(cents, service.session().preferences.currency.as_str())
}

fn describe_countdown(days: i64) -> String {
    match days {
        0 => "today".to_string(),
        1 => "in 1 day".to_string(),
        d if d > 0 => format!("in {} days", d),
        -1 => "overdue by 1 day".to_string(),
        d => format!("overdue by {} days", -d),
    }
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

fn parse_amount(amount: &str) -> Result<Cents> {
    parse_cents(amount).context("Invalid amount format. Use '50.00' or '50'")
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))
}

fn parse_payment_method(method: &str) -> Result<PaymentMethod> {
    method
        .parse::<PaymentMethod>()
        .map_err(|e| anyhow::anyhow!(e))
}

fn parse_cycle(cycle: &str) -> Result<BillingCycle> {
    cycle.parse::<BillingCycle>().map_err(|e| anyhow::anyhow!(e))
}

fn parse_status(status: &str) -> Result<SubscriptionStatus> {
    status
        .parse::<SubscriptionStatus>()
        .map_err(|e| anyhow::anyhow!(e))
}
