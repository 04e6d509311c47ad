//! Shared application state for both the GUI and headless binaries.
//!
//! `SharedAppState` plays the part of the wallet and connection context
//! providers: it owns the connection handle, holds whichever wallet is
//! currently connected, and routes action requests to `MarketActions`.

use std::sync::Arc;

use parking_lot::RwLock;
use solana_sdk::pubkey::Pubkey;
use tracing::info;

use crate::actions::{ActionReceipt, MarketActions};
use crate::config::{Cluster, MarketConfig};
use crate::error::{MarketError, MarketResult};
use crate::marketplace::MarketAction;
use crate::provider::ChainContext;
use crate::solana::{KeypairWallet, RpcConnection, SidecarSdk};
use crate::traits::{ChainConnection, MarketplaceSdk, SystemTimeProvider, TimeProvider, WalletAdapter};

/// Snapshot of the wallet/connection pair for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletStatus {
    pub pubkey: Option<String>,
    pub endpoint: String,
    pub cluster: String,
}

/// Bundled state shared between the UI (or IPC loop) and the actions.
pub struct SharedAppState<S = SidecarSdk, T = SystemTimeProvider>
where
    S: MarketplaceSdk,
    T: TimeProvider,
{
    pub config: Arc<MarketConfig>,
    pub wallet_holder: Arc<RwLock<Option<Arc<dyn WalletAdapter>>>>,
    pub connection: Arc<dyn ChainConnection>,
    pub actions: Arc<MarketActions<S, T>>,
}

impl<S: MarketplaceSdk, T: TimeProvider> Clone for SharedAppState<S, T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            wallet_holder: self.wallet_holder.clone(),
            connection: self.connection.clone(),
            actions: self.actions.clone(),
        }
    }
}

impl SharedAppState {
    /// Production wiring: RPC connection and SDK sidecar from `config`.
    /// No wallet is connected yet.
    pub fn from_config(config: MarketConfig) -> MarketResult<Self> {
        let connection: Arc<dyn ChainConnection> = Arc::new(RpcConnection::from_config(&config));
        let sdk = SidecarSdk::from_config(&config)?;
        let actions = MarketActions::new(sdk, SystemTimeProvider::new(), &config);
        Ok(Self::new(config, connection, actions))
    }

    /// Load the configured keypair file and connect it.
    pub fn connect_keypair_file(&self) -> MarketResult<Pubkey> {
        let wallet = KeypairWallet::from_file(&self.config.keypair_path)?;
        let pubkey = wallet.public_key().ok_or(MarketError::WalletNotConnected)?;
        self.connect_wallet(Arc::new(wallet));
        Ok(pubkey)
    }
}

impl<S: MarketplaceSdk, T: TimeProvider> SharedAppState<S, T> {
    pub fn new(
        config: MarketConfig,
        connection: Arc<dyn ChainConnection>,
        actions: MarketActions<S, T>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            wallet_holder: Arc::new(RwLock::new(None)),
            connection,
            actions: Arc::new(actions),
        }
    }

    /// Replace the connected wallet. SDK clients are rebuilt on next use.
    pub fn connect_wallet(&self, wallet: Arc<dyn WalletAdapter>) {
        if let Some(key) = wallet.public_key() {
            info!("Wallet connected: {}", key);
        }
        *self.wallet_holder.write() = Some(wallet);
    }

    pub fn disconnect_wallet(&self) {
        if self.wallet_holder.write().take().is_some() {
            info!("Wallet disconnected");
        }
    }

    /// Get a snapshot of the connected wallet (if any).
    pub fn wallet(&self) -> Option<Arc<dyn WalletAdapter>> {
        self.wallet_holder.read().clone()
    }

    pub fn cluster(&self) -> Cluster {
        self.config.cluster
    }

    /// Wallet and connection handles for one action.
    pub fn context(&self) -> MarketResult<ChainContext> {
        let wallet = self.wallet().ok_or(MarketError::WalletNotConnected)?;
        Ok(ChainContext::new(wallet, self.connection.clone()))
    }

    pub fn wallet_status(&self) -> WalletStatus {
        WalletStatus {
            pubkey: self
                .wallet()
                .and_then(|w| w.public_key())
                .map(|k| k.to_string()),
            endpoint: self.connection.endpoint(),
            cluster: self.config.cluster.to_string(),
        }
    }

    pub async fn run(&self, action: MarketAction) -> MarketResult<ActionReceipt> {
        let ctx = self.context()?;
        self.actions.run(&ctx, action).await
    }

    pub async fn airdrop(&self) -> MarketResult<String> {
        let ctx = self.context()?;
        let signature = self.actions.request_airdrop(&ctx).await?;
        Ok(signature.to_string())
    }

    pub async fn balance(&self) -> MarketResult<u64> {
        let ctx = self.context()?;
        self.actions.balance(&ctx).await
    }
}
