//! Each action: one SDK call, one transaction, one wallet submission.

use market::mocks::MockSdk;
use market::{BidPolicy, ChainConnection, MarketAction, MarketConfig, ProviderOptions, SdkRequest};
use solana_sdk::commitment_config::CommitmentConfig;

use crate::common::harness::START_TIME;
use crate::common::ConsoleHarness;

/// 2025-01-01T00:00:00Z, one calendar year after `START_TIME`.
const START_TIME_PLUS_ONE_YEAR: i64 = 1_735_689_600;

#[tokio::test]
async fn test_create_listing_calls_sdk_once_with_asset_and_quantity() {
    let h = ConsoleHarness::new();

    h.actions.create_listing(&h.ctx()).await.unwrap();

    let calls = h.sdk.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].request,
        SdkRequest::CreateListing {
            asset: h.asset().to_string(),
            quantity: 1,
        }
    );
    assert_eq!(calls[0].payer, Some(h.payer()));
}

#[tokio::test]
async fn test_create_bid_uses_one_sol_and_one_year_expiry() {
    let h = ConsoleHarness::new();

    h.actions.create_bid(&h.ctx()).await.unwrap();

    let calls = h.sdk.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].request,
        SdkRequest::PlaceBid {
            asset: h.asset().to_string(),
            amount: 1_000_000_000,
            expiry_ts: START_TIME_PLUS_ONE_YEAR,
        }
    );
}

#[tokio::test]
async fn test_create_bid_expiry_follows_clock() {
    let h = ConsoleHarness::new();
    h.time.advance(3600);

    h.actions.create_bid(&h.ctx()).await.unwrap();

    match &h.sdk.calls().await[0].request {
        SdkRequest::PlaceBid { expiry_ts, .. } => {
            assert_eq!(*expiry_ts, START_TIME_PLUS_ONE_YEAR + 3600);
        }
        other => panic!("unexpected request {other:?}"),
    }
}

#[tokio::test]
async fn test_create_bid_honours_configured_policy() {
    let config = MarketConfig {
        bid_policy: BidPolicy {
            amount_lamports: 250_000_000,
            expiry_secs: Some(7 * 24 * 60 * 60),
        },
        ..MarketConfig::default()
    };
    let h = ConsoleHarness::with_config(config);

    h.actions.create_bid(&h.ctx()).await.unwrap();

    assert_eq!(
        h.sdk.calls().await[0].request,
        SdkRequest::PlaceBid {
            asset: h.asset().to_string(),
            amount: 250_000_000,
            expiry_ts: (START_TIME + 604_800) as i64,
        }
    );
}

#[tokio::test]
async fn test_delete_bid_and_delete_listing_target_asset() {
    let h = ConsoleHarness::new();
    let asset = h.asset().to_string();

    h.actions.delete_bid(&h.ctx()).await.unwrap();
    h.actions.delete_listing(&h.ctx()).await.unwrap();

    let requests: Vec<_> = h.sdk.calls().await.into_iter().map(|c| c.request).collect();
    assert_eq!(
        requests,
        vec![
            SdkRequest::DeleteBid {
                asset: asset.clone()
            },
            SdkRequest::DeleteListing { asset },
        ]
    );
}

#[tokio::test]
async fn test_instruction_is_sole_content_of_one_transaction() {
    let h = ConsoleHarness::new();

    h.actions.delete_listing(&h.ctx()).await.unwrap();

    let sent = h.wallet.sent().await;
    assert_eq!(sent.len(), 1);

    let request = h.sdk.calls().await[0].request.clone();
    let expected = MockSdk::instruction_for(&h.payer(), &h.asset(), &request);
    assert_eq!(sent[0].transaction.instructions(), &[expected]);
}

#[tokio::test]
async fn test_wallet_receives_current_connection() {
    let h = ConsoleHarness::new();

    h.actions.create_listing(&h.ctx()).await.unwrap();

    let sent = h.wallet.sent().await;
    assert_eq!(sent[0].connection_addr, h.connection_addr());
    assert_eq!(sent[0].endpoint, h.connection.endpoint());
}

#[tokio::test]
async fn test_receipt_matches_submitted_transaction() {
    let h = ConsoleHarness::new();

    let receipt = h.actions.create_bid(&h.ctx()).await.unwrap();

    let submitted = h.connection.submitted().await;
    assert_eq!(submitted.len(), 1);
    assert_eq!(receipt.action, MarketAction::CreateBid);
    assert_eq!(receipt.signature, submitted[0].signatures[0]);
    assert_eq!(
        receipt.explorer_url,
        format!(
            "https://explorer.solana.com/tx/{}?cluster=devnet",
            receipt.signature
        )
    );
}

#[tokio::test]
async fn test_run_dispatches_every_action() {
    let h = ConsoleHarness::new();

    for action in MarketAction::ALL {
        let receipt = h.actions.run(&h.ctx(), action).await.unwrap();
        assert_eq!(receipt.action, action);
    }

    let calls = h.sdk.calls().await;
    let actions: Vec<_> = calls.iter().map(|c| c.request.action()).collect();
    assert_eq!(actions, MarketAction::ALL.to_vec());
    assert_eq!(h.connection.submitted_count().await, 4);
}

#[tokio::test]
async fn test_airdrop_credits_connected_wallet() {
    let h = ConsoleHarness::new();

    h.actions.request_airdrop(&h.ctx()).await.unwrap();

    assert_eq!(
        h.connection.airdrops().await,
        vec![(h.payer(), 1_000_000_000)]
    );
    assert_eq!(h.actions.balance(&h.ctx()).await.unwrap(), 1_000_000_000);
}

#[tokio::test]
async fn test_submission_uses_provider_options() {
    let h = ConsoleHarness::new();
    h.actions.delete_bid(&h.ctx()).await.unwrap();

    let options = h.connection.submitted_options().await;
    assert_eq!(options, vec![ProviderOptions::default()]);
    assert_eq!(options[0].preflight_commitment, CommitmentConfig::processed());
    assert!(!options[0].skip_preflight);
}

#[tokio::test]
async fn test_configured_skip_preflight_reaches_connection() {
    let config = MarketConfig {
        skip_preflight: true,
        ..MarketConfig::default()
    };
    let h = ConsoleHarness::with_config(config);

    h.actions.create_listing(&h.ctx()).await.unwrap();
    h.actions.create_bid(&h.ctx()).await.unwrap();

    let options = h.connection.submitted_options().await;
    assert_eq!(options.len(), 2);
    assert!(options.iter().all(|o| o.skip_preflight));
}
