mod common;

use anyhow::Result;
use chrono::{Duration, Utc};
use common::{given, taken, test_service};
use lendbook::domain::Status;
use lendbook::io::{Exporter, LedgerSnapshot};

#[tokio::test]
async fn test_toggle_settle_flips_both_ways() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = service.open_profile("alice").await?;

    let tx = service.create(owner, given(50_000)).await?;

    let settled = service.toggle_settle(owner, tx.id).await?;
    assert_eq!(settled.status, Status::Settled);

    // Persisted, not just returned
    assert_eq!(service.list(owner).await?[0].status, Status::Settled);

    // Toggling again reopens the loan
    let reopened = service.toggle_settle(owner, tx.id).await?;
    assert_eq!(reopened.status, Status::Active);
    assert_eq!(service.list(owner).await?[0].status, Status::Active);

    Ok(())
}

#[tokio::test]
async fn test_summary_excludes_settled() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = service.open_profile("alice").await?;

    // Given 500 + Given 300 (settled) + Taken 200
    service.create(owner, given(50_000)).await?;
    let to_settle = service.create(owner, given(30_000)).await?;
    service.create(owner, taken(20_000)).await?;
    service.toggle_settle(owner, to_settle.id).await?;

    let summary = service.summary(owner, Utc::now()).await?;
    assert_eq!(summary.total_given_outstanding, 50_000);
    assert_eq!(summary.total_taken_outstanding, 20_000);
    assert_eq!(summary.net_balance, 30_000);
    assert_eq!(summary.active_count, 2);
    assert_eq!(summary.settled_count, 1);

    Ok(())
}

#[tokio::test]
async fn test_settling_removes_principal_from_exposure() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = service.open_profile("alice").await?;

    let tx = service.create(owner, given(50_000)).await?;
    assert_eq!(
        service.summary(owner, Utc::now()).await?.total_given_outstanding,
        50_000
    );

    service.toggle_settle(owner, tx.id).await?;
    let summary = service.summary(owner, Utc::now()).await?;
    assert_eq!(summary.total_given_outstanding, 0);
    assert_eq!(summary.net_balance, 0);

    // Settled, not deleted: the record is still there
    assert_eq!(service.list(owner).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_delete_removes_record() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = service.open_profile("alice").await?;

    let tx = service.create(owner, given(50_000)).await?;
    let deleted = service.delete(owner, tx.id).await?;
    assert_eq!(deleted.id, tx.id);

    assert!(service.list(owner).await?.is_empty());
    assert_eq!(
        service.summary(owner, Utc::now()).await?.total_given_outstanding,
        0
    );

    Ok(())
}

#[tokio::test]
async fn test_export_transactions_csv() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = service.open_profile("alice").await?;

    let start = Utc::now() - Duration::days(60);
    let mut input = common::new_tx(lendbook::domain::Direction::Given, 100_000, 5.0);
    input.start_date = Some(start);
    service.create(owner, input).await?;
    service.create(owner, taken(20_000)).await?;

    let mut buffer = Vec::new();
    let exporter = Exporter::new(&service);
    let count = exporter
        .export_transactions_csv(owner, Utc::now(), &mut buffer)
        .await?;
    assert_eq!(count, 2);

    let output = String::from_utf8(buffer)?;
    let mut lines = output.lines();
    assert!(lines.next().unwrap().starts_with("id,counterparty,direction"));
    assert_eq!(lines.count(), 2);
    assert!(output.contains("given"));
    assert!(output.contains("taken"));

    Ok(())
}

#[tokio::test]
async fn test_export_snapshot_json_round_trips() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = service.open_profile("alice").await?;

    service.create(owner, given(50_000)).await?;
    let settled = service.create(owner, given(30_000)).await?;
    service.toggle_settle(owner, settled.id).await?;

    let mut buffer = Vec::new();
    let exporter = Exporter::new(&service);
    let count = exporter
        .export_snapshot_json(owner, "alice", Utc::now(), &mut buffer)
        .await?;
    assert_eq!(count, 2);

    let snapshot: LedgerSnapshot = serde_json::from_slice(&buffer)?;
    assert_eq!(snapshot.profile, "alice");
    assert_eq!(snapshot.transactions.len(), 2);
    assert_eq!(snapshot.summary.total_given_outstanding, 50_000);
    assert_eq!(snapshot.summary.settled_count, 1);

    Ok(())
}
