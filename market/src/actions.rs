//! The console's on-chain actions.
//!
//! Every action has the same shape: ask one SDK client for an instruction,
//! put it in a fresh transaction, and hand that to the wallet together with
//! the current connection. Failures are returned to the caller untouched
//! apart from classification into `MarketError`.

use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use tracing::{debug, info};

use crate::config::{BidPolicy, Cluster, MarketConfig, AIRDROP_LAMPORTS};
use crate::error::{MarketError, MarketResult};
use crate::marketplace::{MarketAction, PendingTransaction};
use crate::provider::{ChainContext, ClientCache, SdkClients};
use crate::traits::{MarketplaceSdk, TimeProvider};
use crate::util::{explorer_tx_url, format_sol};

/// Outcome of a submitted action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReceipt {
    pub action: MarketAction,
    pub signature: Signature,
    pub explorer_url: String,
}

/// Keep `MarketError`s raised below the trait boundary, wrap anything else.
fn classify(e: anyhow::Error, wrap: fn(String) -> MarketError) -> MarketError {
    match e.downcast::<MarketError>() {
        Ok(market) => market,
        Err(other) => wrap(format!("{other:#}")),
    }
}

/// Action handlers bound to one asset and one SDK.
pub struct MarketActions<S: MarketplaceSdk, T: TimeProvider> {
    cache: ClientCache<S>,
    time: T,
    asset: Pubkey,
    bid_policy: BidPolicy,
    listing_quantity: u64,
    cluster: Cluster,
}

impl<S: MarketplaceSdk, T: TimeProvider> MarketActions<S, T> {
    pub fn new(sdk: S, time: T, config: &MarketConfig) -> Self {
        Self {
            cache: ClientCache::with_options(sdk, config.provider_options()),
            time,
            asset: config.asset_mint,
            bid_policy: config.bid_policy,
            listing_quantity: config.listing_quantity,
            cluster: config.cluster,
        }
    }

    pub const fn asset(&self) -> &Pubkey {
        &self.asset
    }

    pub const fn bid_policy(&self) -> BidPolicy {
        self.bid_policy
    }

    pub const fn cluster(&self) -> Cluster {
        self.cluster
    }

    pub const fn cache(&self) -> &ClientCache<S> {
        &self.cache
    }

    /// Run `action` against `ctx`.
    pub async fn run(&self, ctx: &ChainContext, action: MarketAction) -> MarketResult<ActionReceipt> {
        match action {
            MarketAction::CreateListing => self.create_listing(ctx).await,
            MarketAction::CreateBid => self.create_bid(ctx).await,
            MarketAction::DeleteBid => self.delete_bid(ctx).await,
            MarketAction::DeleteListing => self.delete_listing(ctx).await,
        }
    }

    /// List `listing_quantity` units of the asset.
    pub async fn create_listing(&self, ctx: &ChainContext) -> MarketResult<ActionReceipt> {
        ensure_connected(ctx)?;
        let clients = self.cache.clients(ctx);
        let ix = clients
            .listings
            .create_listing(&self.asset, self.listing_quantity)
            .await
            .map_err(|e| classify(e, MarketError::Sdk))?;
        self.submit(ctx, &clients, MarketAction::CreateListing, ix).await
    }

    /// Bid `bid_policy.amount_lamports` on the asset, expiring one
    /// calendar year from now unless the policy fixes a window.
    pub async fn create_bid(&self, ctx: &ChainContext) -> MarketResult<ActionReceipt> {
        ensure_connected(ctx)?;
        let clients = self.cache.clients(ctx);
        let expiry_ts = self.bid_policy.expiry_timestamp(self.time.now_unix());
        debug!(
            "Placing bid of {} expiring at {}",
            format_sol(self.bid_policy.amount_lamports),
            expiry_ts
        );
        let ix = clients
            .bids
            .place_bid(&self.asset, self.bid_policy.amount_lamports, expiry_ts)
            .await
            .map_err(|e| classify(e, MarketError::Sdk))?;
        self.submit(ctx, &clients, MarketAction::CreateBid, ix).await
    }

    pub async fn delete_bid(&self, ctx: &ChainContext) -> MarketResult<ActionReceipt> {
        ensure_connected(ctx)?;
        let clients = self.cache.clients(ctx);
        let ix = clients
            .bids
            .delete_bid(&self.asset)
            .await
            .map_err(|e| classify(e, MarketError::Sdk))?;
        self.submit(ctx, &clients, MarketAction::DeleteBid, ix).await
    }

    pub async fn delete_listing(&self, ctx: &ChainContext) -> MarketResult<ActionReceipt> {
        ensure_connected(ctx)?;
        let clients = self.cache.clients(ctx);
        let ix = clients
            .listings
            .delete_listing(&self.asset)
            .await
            .map_err(|e| classify(e, MarketError::Sdk))?;
        self.submit(ctx, &clients, MarketAction::DeleteListing, ix).await
    }

    /// Fund the connected wallet from the cluster faucet.
    pub async fn request_airdrop(&self, ctx: &ChainContext) -> MarketResult<Signature> {
        if !self.cluster.supports_airdrop() {
            return Err(MarketError::Validation(format!(
                "Airdrops are not available on {}",
                self.cluster
            )));
        }
        let to = ctx
            .wallet
            .public_key()
            .ok_or(MarketError::WalletNotConnected)?;
        let signature = ctx
            .connection
            .request_airdrop(&to, AIRDROP_LAMPORTS)
            .await
            .map_err(|e| classify(e, MarketError::Rpc))?;
        info!(
            "airdrop of {} to {} tx: {}",
            format_sol(AIRDROP_LAMPORTS),
            to,
            explorer_tx_url(&signature, self.cluster, &ctx.connection.endpoint())
        );
        Ok(signature)
    }

    /// Lamport balance of the connected wallet.
    pub async fn balance(&self, ctx: &ChainContext) -> MarketResult<u64> {
        let key = ctx
            .wallet
            .public_key()
            .ok_or(MarketError::WalletNotConnected)?;
        ctx.connection
            .balance(&key)
            .await
            .map_err(|e| classify(e, MarketError::Rpc))
    }

    async fn submit(
        &self,
        ctx: &ChainContext,
        clients: &SdkClients,
        action: MarketAction,
        ix: Instruction,
    ) -> MarketResult<ActionReceipt> {
        let mut tx = PendingTransaction::new();
        tx.add(ix);

        let options = clients.provider.options();
        let signature = ctx
            .wallet
            .send_transaction(tx, ctx.connection.as_ref(), &options)
            .await
            .map_err(|e| classify(e, MarketError::Wallet))?;

        let explorer_url = explorer_tx_url(&signature, self.cluster, &ctx.connection.endpoint());
        info!("{} tx: {}", action, explorer_url);

        Ok(ActionReceipt {
            action,
            signature,
            explorer_url,
        })
    }
}

fn ensure_connected(ctx: &ChainContext) -> MarketResult<()> {
    if ctx.wallet.is_connected() {
        Ok(())
    } else {
        Err(MarketError::WalletNotConnected)
    }
}
