//! Provider and memoized SDK clients.
//!
//! A `Provider` pairs the wallet with the connection it submits through.
//! SDK clients are bound to one provider, so `ClientCache` rebuilds the
//! provider and both clients together, and only when the wallet or the
//! connection handle is swapped for a different object.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::error::{MarketError, MarketResult};
use crate::traits::{
    BidInstructions, ChainConnection, ListingInstructions, MarketplaceSdk, WalletAdapter,
};

/// Submission options carried by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderOptions {
    pub commitment: CommitmentConfig,
    pub preflight_commitment: CommitmentConfig,
    pub skip_preflight: bool,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            commitment: CommitmentConfig::processed(),
            preflight_commitment: CommitmentConfig::processed(),
            skip_preflight: false,
        }
    }
}

/// The wallet and connection handles supplied by the surrounding app.
#[derive(Clone)]
pub struct ChainContext {
    pub wallet: Arc<dyn WalletAdapter>,
    pub connection: Arc<dyn ChainConnection>,
}

impl ChainContext {
    pub fn new(wallet: Arc<dyn WalletAdapter>, connection: Arc<dyn ChainConnection>) -> Self {
        Self { wallet, connection }
    }
}

impl fmt::Debug for ChainContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainContext")
            .field("wallet", &self.wallet.public_key())
            .field("endpoint", &self.connection.endpoint())
            .finish()
    }
}

/// Wallet + connection + options, the handle SDK clients are built from.
pub struct Provider {
    wallet: Arc<dyn WalletAdapter>,
    connection: Arc<dyn ChainConnection>,
    options: ProviderOptions,
}

impl Provider {
    pub fn new(
        wallet: Arc<dyn WalletAdapter>,
        connection: Arc<dyn ChainConnection>,
        options: ProviderOptions,
    ) -> Self {
        Self {
            wallet,
            connection,
            options,
        }
    }

    pub fn wallet(&self) -> &Arc<dyn WalletAdapter> {
        &self.wallet
    }

    pub fn connection(&self) -> &Arc<dyn ChainConnection> {
        &self.connection
    }

    pub const fn options(&self) -> ProviderOptions {
        self.options
    }

    /// Fee payer and authority for SDK instructions.
    pub fn payer(&self) -> MarketResult<Pubkey> {
        self.wallet
            .public_key()
            .ok_or(MarketError::WalletNotConnected)
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("wallet", &self.wallet.public_key())
            .field("endpoint", &self.connection.endpoint())
            .field("options", &self.options)
            .finish()
    }
}

/// The provider and the two SDK clients derived from it.
#[derive(Clone)]
pub struct SdkClients {
    pub provider: Arc<Provider>,
    pub bids: Arc<dyn BidInstructions>,
    pub listings: Arc<dyn ListingInstructions>,
}

/// Identity comparison that ignores trait-object metadata.
fn same_handle<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}

/// Memoizes `SdkClients` on the identity of the wallet and connection.
pub struct ClientCache<S: MarketplaceSdk> {
    sdk: S,
    options: ProviderOptions,
    slot: Mutex<Option<SdkClients>>,
    generation: AtomicU64,
}

impl<S: MarketplaceSdk> ClientCache<S> {
    pub fn new(sdk: S) -> Self {
        Self::with_options(sdk, ProviderOptions::default())
    }

    pub fn with_options(sdk: S, options: ProviderOptions) -> Self {
        Self {
            sdk,
            options,
            slot: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Clients for `ctx`, reusing the cached set while both handles are the
    /// same objects as last time.
    pub fn clients(&self, ctx: &ChainContext) -> SdkClients {
        let mut slot = self.slot.lock();
        if let Some(cached) = slot.as_ref() {
            if same_handle(cached.provider.wallet(), &ctx.wallet)
                && same_handle(cached.provider.connection(), &ctx.connection)
            {
                return cached.clone();
            }
        }

        let provider = Arc::new(Provider::new(
            ctx.wallet.clone(),
            ctx.connection.clone(),
            self.options,
        ));
        let clients = SdkClients {
            bids: self.sdk.bid_client(provider.clone()),
            listings: self.sdk.listing_client(provider.clone()),
            provider,
        };
        *slot = Some(clients.clone());
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            "Built SDK clients (generation {}) for {:?}",
            generation, clients.provider
        );
        clients
    }

    /// Number of times the clients have been (re)built.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Drop the cached clients so the next call rebuilds them.
    pub fn invalidate(&self) {
        self.slot.lock().take();
    }
}
