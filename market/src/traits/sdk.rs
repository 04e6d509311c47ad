//! Marketplace SDK abstraction.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;

use crate::provider::Provider;

/// Bid-side SDK client.
#[async_trait]
pub trait BidInstructions: Send + Sync {
    /// Build a bid of `amount_lamports` on `asset`, valid until `expiry_ts`
    /// (Unix seconds).
    async fn place_bid(
        &self,
        asset: &Pubkey,
        amount_lamports: u64,
        expiry_ts: i64,
    ) -> Result<Instruction>;

    /// Build the instruction withdrawing the wallet's bid on `asset`.
    async fn delete_bid(&self, asset: &Pubkey) -> Result<Instruction>;
}

/// Listing-side SDK client.
#[async_trait]
pub trait ListingInstructions: Send + Sync {
    async fn create_listing(&self, asset: &Pubkey, quantity: u64) -> Result<Instruction>;

    async fn delete_listing(&self, asset: &Pubkey) -> Result<Instruction>;
}

/// Factory for SDK clients bound to a provider.
///
/// Clients are cheap to hold but tied to the wallet and connection inside
/// the provider, so a new provider means new clients.
pub trait MarketplaceSdk: Send + Sync {
    fn bid_client(&self, provider: Arc<Provider>) -> Arc<dyn BidInstructions>;

    fn listing_client(&self, provider: Arc<Provider>) -> Arc<dyn ListingInstructions>;
}
