//! Mock marketplace SDK for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use tokio::sync::RwLock;

use crate::marketplace::SdkRequest;
use crate::provider::Provider;
use crate::traits::{BidInstructions, ListingInstructions, MarketplaceSdk};

/// Program id stamped on every mock instruction.
pub const MOCK_PROGRAM_ID: Pubkey = Pubkey::new_from_array([7u8; 32]);

/// One SDK method invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkCall {
    pub request: SdkRequest,
    /// Wallet key of the provider the client was built from.
    pub payer: Option<Pubkey>,
}

#[derive(Default)]
struct MockSdkInner {
    calls: RwLock<Vec<SdkCall>>,
    fail_with: RwLock<Option<String>>,
    bid_clients_built: AtomicUsize,
    listing_clients_built: AtomicUsize,
}

/// SDK double that records every call and returns a deterministic
/// instruction: the request JSON as data, the payer as signer, the asset
/// as a read-only account.
#[derive(Clone, Default)]
pub struct MockSdk {
    inner: Arc<MockSdkInner>,
}

impl MockSdk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every following call with `reason`; `None` to succeed again.
    pub async fn set_fail(&self, reason: Option<&str>) {
        *self.inner.fail_with.write().await = reason.map(str::to_string);
    }

    pub async fn calls(&self) -> Vec<SdkCall> {
        self.inner.calls.read().await.clone()
    }

    pub fn bid_clients_built(&self) -> usize {
        self.inner.bid_clients_built.load(Ordering::SeqCst)
    }

    pub fn listing_clients_built(&self) -> usize {
        self.inner.listing_clients_built.load(Ordering::SeqCst)
    }

    /// The instruction the mock returns for `request`.
    pub fn instruction_for(payer: &Pubkey, asset: &Pubkey, request: &SdkRequest) -> Instruction {
        let data = serde_json::to_vec(request).unwrap_or_default();
        Instruction::new_with_bytes(
            MOCK_PROGRAM_ID,
            &data,
            vec![
                AccountMeta::new(*payer, true),
                AccountMeta::new_readonly(*asset, false),
            ],
        )
    }

    async fn record(
        &self,
        provider: &Provider,
        asset: &Pubkey,
        request: SdkRequest,
    ) -> Result<Instruction> {
        let payer = provider.wallet().public_key();
        self.inner.calls.write().await.push(SdkCall {
            request: request.clone(),
            payer,
        });

        if let Some(reason) = self.inner.fail_with.read().await.clone() {
            return Err(anyhow!("{reason}"));
        }
        let payer = provider.payer()?;
        Ok(Self::instruction_for(&payer, asset, &request))
    }
}

impl MarketplaceSdk for MockSdk {
    fn bid_client(&self, provider: Arc<Provider>) -> Arc<dyn BidInstructions> {
        self.inner.bid_clients_built.fetch_add(1, Ordering::SeqCst);
        Arc::new(MockClient {
            sdk: self.clone(),
            provider,
        })
    }

    fn listing_client(&self, provider: Arc<Provider>) -> Arc<dyn ListingInstructions> {
        self.inner.listing_clients_built.fetch_add(1, Ordering::SeqCst);
        Arc::new(MockClient {
            sdk: self.clone(),
            provider,
        })
    }
}

struct MockClient {
    sdk: MockSdk,
    provider: Arc<Provider>,
}

#[async_trait]
impl BidInstructions for MockClient {
    async fn place_bid(
        &self,
        asset: &Pubkey,
        amount_lamports: u64,
        expiry_ts: i64,
    ) -> Result<Instruction> {
        let request = SdkRequest::PlaceBid {
            asset: asset.to_string(),
            amount: amount_lamports,
            expiry_ts,
        };
        self.sdk.record(&self.provider, asset, request).await
    }

    async fn delete_bid(&self, asset: &Pubkey) -> Result<Instruction> {
        let request = SdkRequest::DeleteBid {
            asset: asset.to_string(),
        };
        self.sdk.record(&self.provider, asset, request).await
    }
}

#[async_trait]
impl ListingInstructions for MockClient {
    async fn create_listing(&self, asset: &Pubkey, quantity: u64) -> Result<Instruction> {
        let request = SdkRequest::CreateListing {
            asset: asset.to_string(),
            quantity,
        };
        self.sdk.record(&self.provider, asset, request).await
    }

    async fn delete_listing(&self, asset: &Pubkey) -> Result<Instruction> {
        let request = SdkRequest::DeleteListing {
            asset: asset.to_string(),
        };
        self.sdk.record(&self.provider, asset, request).await
    }
}
