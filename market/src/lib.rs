pub mod actions;
pub mod config;
pub mod error;
pub mod marketplace;
pub mod provider;
pub mod shared_state;
pub mod solana;
pub mod traits;
pub mod util;

#[cfg(any(test, feature = "test-support"))]
pub mod mocks;

pub use actions::{ActionReceipt, MarketActions};
pub use config::{BidPolicy, Cluster, MarketConfig};
pub use error::{MarketError, MarketResult};
pub use marketplace::{InstructionPayload, MarketAction, PendingTransaction, SdkRequest};
pub use provider::{ChainContext, ClientCache, Provider, ProviderOptions, SdkClients};
pub use shared_state::{SharedAppState, WalletStatus};
pub use solana::{KeypairWallet, RpcConnection, SdkSidecar, SidecarSdk};
pub use traits::{
    BidInstructions, ChainConnection, ListingInstructions, MarketplaceSdk, SystemTimeProvider,
    TimeProvider, WalletAdapter,
};
