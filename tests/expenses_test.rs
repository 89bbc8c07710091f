mod common;

use anyhow::Result;
use common::{expense, open_service, parse_date, reject_counter_writes, test_service};
use outlay::application::AppError;
use outlay::domain::{ExpenseFilter, PaymentMethod};

#[tokio::test]
async fn test_add_assigns_increasing_ids_newest_first() -> Result<()> {
    let (mut service, _temp) = test_service().await?;

    let first = service
        .add_expense(expense("Coffee Shop", 1250, "Food", "2024-01-12"))
        .await?;
    let second = service
        .add_expense(expense("Gas Station", 4520, "Transportation", "2024-01-13"))
        .await?;

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);

    let ids: Vec<u64> = service.ledger().expenses().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![2, 1]);

    Ok(())
}

#[tokio::test]
async fn test_expenses_survive_reopen() -> Result<()> {
    let (mut service, temp) = test_service().await?;

    service
        .add_expense(expense("Pharmacy", 1575, "Healthcare", "2024-01-08"))
        .await?;
    service
        .add_expense(expense("Restaurant", 6540, "Food", "2024-01-07"))
        .await?;
    drop(service);

    let reopened = open_service(&temp).await?;
    let expenses = reopened.ledger().expenses();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0].description, "Restaurant");
    assert_eq!(expenses[0].date, parse_date("2024-01-07"));
    assert_eq!(expenses[1].amount_cents, 1575);

    Ok(())
}

#[tokio::test]
async fn test_deleted_ids_are_never_reused() -> Result<()> {
    let (mut service, temp) = test_service().await?;

    service
        .add_expense(expense("One", 100, "Other", "2024-01-01"))
        .await?;
    let second = service
        .add_expense(expense("Two", 200, "Other", "2024-01-02"))
        .await?;
    service.delete_expense(second.id).await?;

    let third = service
        .add_expense(expense("Three", 300, "Other", "2024-01-03"))
        .await?;
    assert_eq!(third.id, 3);

    // The highest id is gone before the reopen; the counter still remembers it.
    service.delete_expense(third.id).await?;
    drop(service);

    let mut reopened = open_service(&temp).await?;
    let fourth = reopened
        .add_expense(expense("Four", 400, "Other", "2024-01-04"))
        .await?;
    assert_eq!(fourth.id, 4);

    Ok(())
}

#[tokio::test]
async fn test_edit_replaces_record_with_same_id() -> Result<()> {
    let (mut service, temp) = test_service().await?;

    let original = service
        .add_expense(expense("Movie", 2800, "Entertainment", "2024-01-10"))
        .await?;
    service
        .add_expense(expense("Snacks", 600, "Food", "2024-01-10"))
        .await?;

    let mut edited = original.clone();
    edited.description = "Movie Theater".to_string();
    edited.amount_cents = 3000;
    edited.payment_method = PaymentMethod::Cash;
    service.edit_expense(edited).await?;

    let stored = service.get_expense(original.id)?;
    assert_eq!(stored.description, "Movie Theater");
    assert_eq!(stored.amount_cents, 3000);
    assert_eq!(service.ledger().expenses().len(), 2);
    // Position in the list is kept.
    assert_eq!(service.ledger().expenses()[1].id, original.id);
    drop(service);

    let reopened = open_service(&temp).await?;
    assert_eq!(reopened.get_expense(original.id)?.payment_method, PaymentMethod::Cash);

    Ok(())
}

#[tokio::test]
async fn test_edit_and_delete_unknown_id() -> Result<()> {
    let (mut service, _temp) = test_service().await?;

    let kept = service
        .add_expense(expense("Kept", 100, "Other", "2024-01-01"))
        .await?;

    let mut ghost = kept.clone();
    ghost.id = 99;
    assert!(matches!(
        service.edit_expense(ghost).await,
        Err(AppError::ExpenseNotFound(99))
    ));
    assert!(matches!(
        service.delete_expense(99).await,
        Err(AppError::ExpenseNotFound(99))
    ));

    assert_eq!(service.ledger().expenses(), &[kept]);
    Ok(())
}

#[tokio::test]
async fn test_validation_of_required_fields() -> Result<()> {
    let (mut service, _temp) = test_service().await?;

    assert!(matches!(
        service.add_expense(expense("   ", 100, "Food", "2024-01-01")).await,
        Err(AppError::MissingField("description"))
    ));
    assert!(matches!(
        service.add_expense(expense("Lunch", 100, "", "2024-01-01")).await,
        Err(AppError::MissingField("category"))
    ));
    assert!(matches!(
        service.add_expense(expense("Refund", -500, "Food", "2024-01-01")).await,
        Err(AppError::NegativeAmount(-500))
    ));

    // Zero is allowed, and rejected submissions consumed no ids.
    let free = service
        .add_expense(expense("Free sample", 0, "food", "2024-01-01"))
        .await?;
    assert_eq!(free.id, 1);
    assert_eq!(free.category, "Food");

    Ok(())
}

#[tokio::test]
async fn test_filtered_summary() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    service.seed_sample_data().await?;

    let all = service.expense_summary(&ExpenseFilter::default());
    assert_eq!(all.count, 6);
    assert_eq!(all.total, 25417);
    assert_eq!(all.categories[0].category, "Food");
    assert_eq!(all.categories[0].total, 8732 + 1250 + 6540);

    let food = service.expense_summary(&ExpenseFilter::by_category("Food"));
    assert_eq!(food.count, 3);
    assert_eq!(food.total, 16522);
    // Filtering never narrows the category picker.
    assert_eq!(food.available_categories.len(), 4);

    let search = service.expense_summary(&ExpenseFilter::by_search("STATION"));
    assert_eq!(search.count, 1);
    assert_eq!(search.expenses[0].description, "Gas Station");

    let by_category_text = service.expense_summary(&ExpenseFilter::by_search("health"));
    assert_eq!(by_category_text.count, 1);

    let nothing = service.expense_summary(&ExpenseFilter {
        search: Some("coffee".to_string()),
        category: Some("Transportation".to_string()),
    });
    assert_eq!(nothing.count, 0);
    assert_eq!(nothing.total, 0);
    assert!(nothing.categories.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_failed_add_leaves_nothing_behind() -> Result<()> {
    let (mut service, temp) = test_service().await?;
    reject_counter_writes(&temp).await?;

    let result = service
        .add_expense(expense("Coffee Shop", 1250, "Food", "2024-01-12"))
        .await;
    assert!(matches!(result, Err(AppError::Database(_))));
    assert!(service.ledger().expenses().is_empty());
    drop(service);

    let reopened = open_service(&temp).await?;
    assert!(reopened.ledger().expenses().is_empty());

    Ok(())
}
