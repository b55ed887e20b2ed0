use super::{MemoryRepository, StoreError, TransactionRepository};

use std::str::FromStr;

use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::models::Transaction;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

fn transaction(id: &str, offset_secs: i64) -> Transaction {
    Transaction {
        id: id.to_string(),
        date: base_time() + Duration::seconds(offset_secs),
        gas_type: "LPG".to_string(),
        kgs: Decimal::from_str("12.5").unwrap(),
        payment_method: "Cash".to_string(),
        total: Decimal::from_str("3200").unwrap(),
        currency: "PKR".to_string(),
        customer_name: None,
        phone_number: None,
        due_date: None,
        paid: None,
        paid_date: None,
        card_details: None,
        is_restock: None,
        reason: None,
    }
}

#[tokio::test]
async fn test_insert_exists_and_count() -> Result<()> {
    let repository = MemoryRepository::new();

    assert!(!repository.exists("missing").await?);

    repository.insert(transaction("a", 0)).await;

    assert!(repository.exists("a").await?);
    assert_eq!(repository.count().await, 1);

    Ok(())
}

#[tokio::test]
async fn test_list_all_returns_date_ascending_order() -> Result<()> {
    let repository = MemoryRepository::new();
    repository.insert(transaction("late", 300)).await;
    repository.insert(transaction("early", 0)).await;
    repository.insert(transaction("middle", 60)).await;

    let all = repository.list_all().await?;
    let ids: Vec<&str> = all.iter().map(|t| t.id.as_str()).collect();

    assert_eq!(ids, vec!["early", "middle", "late"]);

    Ok(())
}

#[tokio::test]
async fn test_delete_batch_removes_every_listed_document() -> Result<()> {
    let repository = MemoryRepository::new();
    repository.insert(transaction("a", 0)).await;
    repository.insert(transaction("b", 10)).await;
    repository.insert(transaction("c", 20)).await;

    repository.delete_batch(&["a".to_string(), "c".to_string()]).await?;

    assert!(!repository.exists("a").await?);
    assert!(repository.exists("b").await?);
    assert!(!repository.exists("c").await?);

    Ok(())
}

#[tokio::test]
async fn test_delete_batch_aborts_whole_commit_when_a_document_is_missing() -> Result<()> {
    let repository = MemoryRepository::new();
    repository.insert(transaction("a", 0)).await;

    let result = repository
        .delete_batch(&["a".to_string(), "ghost".to_string()])
        .await;

    assert!(matches!(result, Err(StoreError::BatchAborted(_))));
    // Nothing was deleted, including the document that did exist.
    assert!(repository.exists("a").await?);

    Ok(())
}

#[tokio::test]
async fn test_list_since_filters_by_event_date_inclusive() -> Result<()> {
    let repository = MemoryRepository::new();
    repository.insert(transaction("before", 0)).await;
    repository.insert(transaction("at-cutoff", 120)).await;
    repository.insert(transaction("after", 240)).await;

    let cutoff = base_time() + Duration::seconds(120);
    let recent = repository.list_since(cutoff).await?;
    let ids: Vec<&str> = recent.iter().map(|t| t.id.as_str()).collect();

    assert_eq!(ids, vec!["at-cutoff", "after"]);

    Ok(())
}
