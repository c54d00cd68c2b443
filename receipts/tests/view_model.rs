//! Integration tests for the receipt view-model
//!
//! Drives the full stack (view-model, combined reducers, store runtime) against
//! mock and failing ports.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use futures::future::BoxFuture;
use receipts::{
    FailingAnalyticsClient, FailingReceiptClient, MockAnalyticsClient, MockReceiptClient, Receipt,
    ReceiptAction, ReceiptClient, ReceiptEnvironment, ReceiptError, ReceiptRequest,
    ReceiptViewModel, StaleFetchPolicy, ViewModelConfig,
};
use receipts_runtime::StoreError;
use tokio::sync::Notify;

// ============================================================================
// Test Fixtures
// ============================================================================

fn view_model_with(client: MockReceiptClient) -> (ReceiptViewModel, MockAnalyticsClient) {
    let analytics = MockAnalyticsClient::new();
    let view_model = ReceiptViewModel::new(ReceiptEnvironment::new(client, analytics.clone()));
    (view_model, analytics)
}

async fn dispatch_and_wait(view_model: &ReceiptViewModel, action: ReceiptAction) {
    view_model
        .dispatch(action)
        .await
        .wait_with_timeout(Duration::from_secs(5))
        .await
        .expect("effects should complete without panicking");
}

/// First fetch blocks until released; later fetches answer immediately.
#[derive(Clone, Default)]
struct GatedClient {
    calls: Arc<AtomicUsize>,
    first_started: Arc<Notify>,
    release_first: Arc<Notify>,
    first_fails: bool,
}

impl GatedClient {
    fn failing_first() -> Self {
        Self {
            first_fails: true,
            ..Self::default()
        }
    }
}

impl ReceiptClient for GatedClient {
    fn create_receipt(&self, _request: ReceiptRequest) -> BoxFuture<'_, Result<(), ReceiptError>> {
        Box::pin(async { Ok(()) })
    }

    fn fetch_receipts(&self) -> BoxFuture<'_, Result<Vec<Receipt>, ReceiptError>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            if call > 0 {
                return Ok(vec![Receipt::new("new", "Fast fetch")]);
            }
            self.first_started.notify_one();
            self.release_first.notified().await;
            if self.first_fails {
                Err(ReceiptError::message("Slow fetch failed"))
            } else {
                Ok(vec![Receipt::new("old", "Slow fetch")])
            }
        })
    }
}

/// Create blocks until released; fetch lists the created receipt once the
/// create has finished.
#[derive(Clone, Default)]
struct SlowCreateClient {
    created: Arc<AtomicBool>,
    create_started: Arc<Notify>,
    release_create: Arc<Notify>,
}

fn existing_receipt() -> Receipt {
    Receipt::new("1", "Old")
}

fn created_receipt() -> Receipt {
    Receipt::new("2", "New")
}

impl ReceiptClient for SlowCreateClient {
    fn create_receipt(&self, _request: ReceiptRequest) -> BoxFuture<'_, Result<(), ReceiptError>> {
        Box::pin(async move {
            self.create_started.notify_one();
            self.release_create.notified().await;
            self.created.store(true, Ordering::SeqCst);
            Ok(())
        })
    }

    fn fetch_receipts(&self) -> BoxFuture<'_, Result<Vec<Receipt>, ReceiptError>> {
        let mut receipts = vec![existing_receipt()];
        if self.created.load(Ordering::SeqCst) {
            receipts.push(created_receipt());
        }
        Box::pin(async move { Ok(receipts) })
    }
}

/// Starts a slow fetch, lets a second fetch overtake it, then releases the
/// slow one.
async fn overlapping_fetches(gated: GatedClient, policy: StaleFetchPolicy) -> ReceiptViewModel {
    let view_model = ReceiptViewModel::with_config(
        ReceiptEnvironment::new(gated.clone(), MockAnalyticsClient::new()),
        ViewModelConfig::default().with_stale_fetches(policy),
    );

    let mut slow = view_model.dispatch(ReceiptAction::FetchReceipts).await;
    gated.first_started.notified().await;

    dispatch_and_wait(&view_model, ReceiptAction::FetchReceipts).await;
    assert_eq!(view_model.receipts().await, [Receipt::new("new", "Fast fetch")]);

    gated.release_first.notify_one();
    slow.wait_with_timeout(Duration::from_secs(5)).await.unwrap();

    view_model
}

// ============================================================================
// Fetch
// ============================================================================

#[tokio::test]
async fn fetch_replaces_receipts() {
    receipts_testing::init_test_tracing();
    let (view_model, _) = view_model_with(
        MockReceiptClient::unstubbed().with_receipts(vec![Receipt::new("1", "Fancy receipt")]),
    );

    dispatch_and_wait(&view_model, ReceiptAction::FetchReceipts).await;

    assert_eq!(view_model.receipts().await, [Receipt::new("1", "Fancy receipt")]);
    assert_eq!(view_model.error().await, None);
    assert!(!view_model.is_error_presented().await);
}

#[tokio::test]
async fn fetch_failure_sets_and_presents_error() {
    let (view_model, _) = view_model_with(
        MockReceiptClient::unstubbed().with_fetch(Err(ReceiptError::message("Too many requests"))),
    );

    dispatch_and_wait(&view_model, ReceiptAction::FetchReceipts).await;

    let error = view_model.error().await;
    assert_eq!(error, Some(ReceiptError::message("Too many requests")));
    assert_eq!(
        error.map(|e| e.to_string()).as_deref(),
        Some("[ReceiptError] Too many requests")
    );
    assert!(view_model.is_error_presented().await);
    assert!(view_model.receipts().await.is_empty());
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn create_then_refreshes_from_fetch() {
    let client = MockReceiptClient::unstubbed()
        .with_create(Ok(()))
        .with_receipts(vec![Receipt::new("x", "Fanciest receipt")]);
    let (view_model, _) = view_model_with(client.clone());

    dispatch_and_wait(
        &view_model,
        ReceiptAction::CreateReceipt(ReceiptRequest::new("Fancy receipt")),
    )
    .await;

    assert_eq!(view_model.receipts().await, [Receipt::new("x", "Fanciest receipt")]);
    assert_eq!(client.created_requests(), [ReceiptRequest::new("Fancy receipt")]);
    assert_eq!(client.fetch_count(), 1);
}

#[tokio::test]
async fn create_failure_keeps_receipts() {
    let client = MockReceiptClient::new().with_create(Err(ReceiptError::message("Error 500")));
    let (view_model, _) = view_model_with(client.clone());
    dispatch_and_wait(&view_model, ReceiptAction::FetchReceipts).await;
    let before = view_model.receipts().await;

    dispatch_and_wait(
        &view_model,
        ReceiptAction::CreateReceipt(ReceiptRequest::new("Fancy receipt")),
    )
    .await;

    assert_eq!(view_model.receipts().await, before);
    assert_eq!(view_model.error().await, Some(ReceiptError::message("Error 500")));
    assert!(view_model.is_error_presented().await);
    assert_eq!(client.fetch_count(), 1);
}

#[tokio::test]
async fn create_is_tracked_once_without_synthetic_fetch() {
    let (view_model, analytics) = view_model_with(MockReceiptClient::new());

    dispatch_and_wait(
        &view_model,
        ReceiptAction::CreateReceipt(ReceiptRequest::new("Fancy receipt")),
    )
    .await;

    assert_eq!(
        analytics.events(),
        [r#"DomainAction.createReceipt [ReceiptRequest(name: "Fancy receipt")]"#]
    );
}

// ============================================================================
// Errors and alert
// ============================================================================

#[tokio::test]
async fn set_error_presents_and_dismiss_hides() {
    let view_model = ReceiptViewModel::new(ReceiptEnvironment::new(
        FailingReceiptClient,
        MockAnalyticsClient::new(),
    ));

    view_model
        .set_error(ReceiptError::message("offline"))
        .await
        .wait()
        .await
        .unwrap();
    assert!(view_model.is_error_presented().await);

    dispatch_and_wait(&view_model, ReceiptAction::DismissErrorAlert).await;

    assert!(!view_model.is_error_presented().await);
    assert_eq!(view_model.error().await, Some(ReceiptError::message("offline")));
    assert!(view_model.receipts().await.is_empty());
}

#[tokio::test]
async fn same_error_again_re_presents_alert() {
    let view_model = ReceiptViewModel::new(ReceiptEnvironment::new(
        FailingReceiptClient,
        MockAnalyticsClient::new(),
    ));

    view_model.set_error(ReceiptError::message("offline")).await;
    dispatch_and_wait(&view_model, ReceiptAction::DismissErrorAlert).await;
    view_model.set_error(ReceiptError::message("offline")).await;

    assert!(view_model.is_error_presented().await);
}

#[tokio::test]
async fn set_error_is_not_tracked() {
    let (view_model, analytics) = view_model_with(MockReceiptClient::unstubbed());

    view_model.set_error(ReceiptError::message("offline")).await;

    assert!(analytics.events().is_empty());
}

// ============================================================================
// Analytics
// ============================================================================

#[tokio::test]
async fn every_dispatch_is_tracked_exactly_once() {
    let (view_model, analytics) = view_model_with(
        MockReceiptClient::new().with_fetch(Err(ReceiptError::message("Error 500"))),
    );

    dispatch_and_wait(&view_model, ReceiptAction::FetchReceipts).await;
    dispatch_and_wait(&view_model, ReceiptAction::DismissErrorAlert).await;
    dispatch_and_wait(
        &view_model,
        ReceiptAction::CreateReceipt(ReceiptRequest::new("Lunch")),
    )
    .await;
    dispatch_and_wait(&view_model, ReceiptAction::FetchReceipts).await;

    assert_eq!(
        analytics.events(),
        [
            "DomainAction.fetchReceipts",
            "DomainAction.dismissErrorAlert",
            r#"DomainAction.createReceipt [ReceiptRequest(name: "Lunch")]"#,
            "DomainAction.fetchReceipts",
        ]
    );
}

// ============================================================================
// Failing ports
// ============================================================================

#[tokio::test]
async fn failing_client_panic_surfaces_through_handle() {
    let view_model = ReceiptViewModel::new(ReceiptEnvironment::new(
        FailingReceiptClient,
        MockAnalyticsClient::new(),
    ));

    let result = view_model
        .dispatch(ReceiptAction::FetchReceipts)
        .await
        .wait()
        .await;

    assert_eq!(
        result,
        Err(StoreError::EffectPanicked(
            "ReceiptClient.fetch_receipts not implemented".to_string()
        ))
    );
    assert!(view_model.receipts().await.is_empty());
    assert_eq!(view_model.error().await, None);
}

#[tokio::test]
async fn dismiss_never_touches_the_repository() {
    let view_model = ReceiptViewModel::new(ReceiptEnvironment::new(
        FailingReceiptClient,
        MockAnalyticsClient::new(),
    ));

    dispatch_and_wait(&view_model, ReceiptAction::DismissErrorAlert).await;
}

#[tokio::test]
async fn failing_analytics_panic_surfaces_through_handle() {
    let view_model = ReceiptViewModel::new(ReceiptEnvironment::new(
        MockReceiptClient::new(),
        FailingAnalyticsClient,
    ));

    let result = view_model
        .dispatch(ReceiptAction::DismissErrorAlert)
        .await
        .wait()
        .await;

    assert_eq!(
        result,
        Err(StoreError::EffectPanicked(
            "AnalyticsClient.track_event not implemented".to_string()
        ))
    );
}

// ============================================================================
// Overlapping fetches
// ============================================================================

#[tokio::test]
async fn overlapping_fetches_last_completion_wins_by_default() {
    let view_model = overlapping_fetches(GatedClient::default(), StaleFetchPolicy::LastWriterWins).await;
    assert_eq!(view_model.receipts().await, [Receipt::new("old", "Slow fetch")]);
}

#[tokio::test]
async fn overlapping_fetches_drop_stale_keeps_newest() {
    let view_model = overlapping_fetches(GatedClient::default(), StaleFetchPolicy::DropStale).await;
    assert_eq!(view_model.receipts().await, [Receipt::new("new", "Fast fetch")]);
}

#[tokio::test]
async fn overlapping_fetches_late_failure_still_alerts_by_default() {
    let view_model =
        overlapping_fetches(GatedClient::failing_first(), StaleFetchPolicy::LastWriterWins).await;

    assert_eq!(view_model.error().await, Some(ReceiptError::message("Slow fetch failed")));
    assert!(view_model.is_error_presented().await);
}

#[tokio::test]
async fn overlapping_fetches_drop_stale_ignores_superseded_failure() {
    let view_model =
        overlapping_fetches(GatedClient::failing_first(), StaleFetchPolicy::DropStale).await;

    assert_eq!(view_model.error().await, None);
    assert!(!view_model.is_error_presented().await);
    assert_eq!(view_model.receipts().await, [Receipt::new("new", "Fast fetch")]);
}

#[tokio::test]
async fn refresh_after_overtaken_create_is_applied_under_drop_stale() {
    let client = SlowCreateClient::default();
    let view_model = ReceiptViewModel::with_config(
        ReceiptEnvironment::new(client.clone(), MockAnalyticsClient::new()),
        ViewModelConfig::default().with_stale_fetches(StaleFetchPolicy::DropStale),
    );

    let mut create = view_model
        .dispatch(ReceiptAction::CreateReceipt(ReceiptRequest::new("New")))
        .await;
    client.create_started.notified().await;

    dispatch_and_wait(&view_model, ReceiptAction::FetchReceipts).await;
    assert_eq!(view_model.receipts().await, [existing_receipt()]);

    client.release_create.notify_one();
    create.wait_with_timeout(Duration::from_secs(5)).await.unwrap();

    assert_eq!(
        view_model.receipts().await,
        [existing_receipt(), created_receipt()]
    );
}

// ============================================================================
// Observation
// ============================================================================

#[tokio::test]
async fn subscribers_see_state_changes() {
    let view_model = ReceiptViewModel::preview();
    let mut updates = view_model.subscribe();
    assert!(updates.borrow_and_update().receipts().is_empty());

    dispatch_and_wait(&view_model, ReceiptAction::FetchReceipts).await;

    assert!(updates.has_changed().unwrap());
    let snapshot = updates.borrow_and_update().clone();
    assert_eq!(snapshot.receipts().len(), 4);
    assert_eq!(snapshot, view_model.snapshot().await);
}

#[tokio::test]
async fn clones_share_state() {
    let view_model = ReceiptViewModel::preview();
    let other = view_model.clone();

    dispatch_and_wait(&other, ReceiptAction::FetchReceipts).await;

    assert_eq!(view_model.receipts().await.len(), 4);
}
