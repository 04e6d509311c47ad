//! SDK clients are rebuilt only when the wallet or connection object changes.

use std::sync::Arc;

use market::WalletAdapter;

use crate::common::ConsoleHarness;

#[tokio::test]
async fn test_repeated_actions_reuse_clients() {
    let h = ConsoleHarness::new();

    h.actions.create_listing(&h.ctx()).await.unwrap();
    h.actions.create_bid(&h.ctx()).await.unwrap();
    h.actions.delete_bid(&h.ctx()).await.unwrap();
    h.actions.delete_listing(&h.ctx()).await.unwrap();

    assert_eq!(h.actions.cache().generation(), 1);
    assert_eq!(h.sdk.bid_clients_built(), 1);
    assert_eq!(h.sdk.listing_clients_built(), 1);
}

#[test]
fn test_same_handles_return_same_provider() {
    let h = ConsoleHarness::new();

    let first = h.actions.cache().clients(&h.ctx());
    let second = h.actions.cache().clients(&h.ctx());

    assert!(Arc::ptr_eq(&first.provider, &second.provider));
    assert!(Arc::ptr_eq(&first.bids, &second.bids));
    assert!(Arc::ptr_eq(&first.listings, &second.listings));
}

#[tokio::test]
async fn test_new_wallet_rebuilds_clients() {
    let mut h = ConsoleHarness::new();
    h.actions.create_bid(&h.ctx()).await.unwrap();

    let new_wallet = h.swap_wallet();
    h.actions.create_bid(&h.ctx()).await.unwrap();

    assert_eq!(h.actions.cache().generation(), 2);
    assert_eq!(h.sdk.bid_clients_built(), 2);
    let calls = h.sdk.calls().await;
    assert_eq!(calls[1].payer, Some(new_wallet.pubkey()));
}

#[tokio::test]
async fn test_rewrapped_wallet_counts_as_new_reference() {
    let mut h = ConsoleHarness::new();
    h.actions.delete_bid(&h.ctx()).await.unwrap();

    // Same underlying wallet state, different handle object.
    h.wallet_handle = Arc::new(h.wallet.clone()) as Arc<dyn WalletAdapter>;
    h.actions.delete_bid(&h.ctx()).await.unwrap();

    assert_eq!(h.actions.cache().generation(), 2);
}

#[tokio::test]
async fn test_new_connection_rebuilds_clients() {
    let mut h = ConsoleHarness::new();
    h.actions.create_listing(&h.ctx()).await.unwrap();

    let connection = h.swap_connection();
    h.actions.create_listing(&h.ctx()).await.unwrap();

    assert_eq!(h.actions.cache().generation(), 2);
    assert_eq!(h.sdk.listing_clients_built(), 2);
    assert_eq!(connection.submitted_count().await, 1);
    let sent = h.wallet.sent().await;
    assert_eq!(sent[1].connection_addr, h.connection_addr());
}

#[test]
fn test_cloned_context_keeps_identity() {
    let h = ConsoleHarness::new();
    let ctx = h.ctx();
    let cloned = ctx.clone();

    h.actions.cache().clients(&ctx);
    h.actions.cache().clients(&cloned);

    assert_eq!(h.actions.cache().generation(), 1);
}

#[test]
fn test_invalidate_forces_rebuild() {
    let h = ConsoleHarness::new();
    h.actions.cache().clients(&h.ctx());

    h.actions.cache().invalidate();
    h.actions.cache().clients(&h.ctx());

    assert_eq!(h.actions.cache().generation(), 2);
}
