//! Failures surface to the caller and stop the pipeline where they occur.

use std::sync::Arc;

use market::mocks::MockWallet;
use market::{Cluster, MarketConfig, MarketError, WalletAdapter};

use crate::common::ConsoleHarness;

#[tokio::test]
async fn test_sdk_rejection_fails_action_without_submitting() {
    let h = ConsoleHarness::new();
    h.sdk.set_fail(Some("Bid account already exists")).await;

    let result = h.actions.create_bid(&h.ctx()).await;

    match result {
        Err(MarketError::Sdk(msg)) => assert_eq!(msg, "Bid account already exists"),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(h.sdk.calls().await.len(), 1);
    assert_eq!(h.wallet.sent_count().await, 0);
    assert_eq!(h.connection.submitted_count().await, 0);
}

#[tokio::test]
async fn test_wallet_rejection_fails_action() {
    let h = ConsoleHarness::new();
    h.wallet.set_reject(Some("User rejected the request.")).await;

    let result = h.actions.create_listing(&h.ctx()).await;

    match result {
        Err(MarketError::Wallet(msg)) => assert_eq!(msg, "User rejected the request."),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(h.sdk.calls().await.len(), 1);
    assert_eq!(h.wallet.sent_count().await, 1);
    assert_eq!(h.connection.submitted_count().await, 0);
}

#[tokio::test]
async fn test_network_failure_fails_action() {
    let h = ConsoleHarness::new();
    h.connection.set_fail_sends(true);

    let result = h.actions.delete_listing(&h.ctx()).await;

    assert!(matches!(result, Err(MarketError::Wallet(_))));
    assert_eq!(h.connection.submitted_count().await, 0);
}

#[tokio::test]
async fn test_recovers_after_failure_cleared() {
    let h = ConsoleHarness::new();
    h.sdk.set_fail(Some("rpc unavailable")).await;
    assert!(h.actions.delete_bid(&h.ctx()).await.is_err());

    h.sdk.set_fail(None).await;
    assert!(h.actions.delete_bid(&h.ctx()).await.is_ok());
    assert_eq!(h.connection.submitted_count().await, 1);
}

#[tokio::test]
async fn test_disconnected_wallet_is_rejected_up_front() {
    let mut h = ConsoleHarness::new();
    h.wallet_handle = Arc::new(MockWallet::disconnected()) as Arc<dyn WalletAdapter>;

    for result in [
        h.actions.create_listing(&h.ctx()).await,
        h.actions.create_bid(&h.ctx()).await,
        h.actions.delete_bid(&h.ctx()).await,
        h.actions.delete_listing(&h.ctx()).await,
    ] {
        assert!(matches!(result, Err(MarketError::WalletNotConnected)));
    }
    assert!(h.sdk.calls().await.is_empty());
}

#[tokio::test]
async fn test_wallet_disconnecting_between_actions_is_reported() {
    let h = ConsoleHarness::new();
    h.actions.create_bid(&h.ctx()).await.unwrap();

    h.wallet.set_connected(false);
    let result = h.actions.create_bid(&h.ctx()).await;

    assert!(matches!(result, Err(MarketError::WalletNotConnected)));
}

#[tokio::test]
async fn test_airdrop_refused_on_mainnet() {
    let config = MarketConfig {
        cluster: Cluster::MainnetBeta,
        ..MarketConfig::default()
    };
    let h = ConsoleHarness::with_config(config);

    let result = h.actions.request_airdrop(&h.ctx()).await;

    assert!(matches!(result, Err(MarketError::Validation(_))));
    assert!(h.connection.airdrops().await.is_empty());
}
