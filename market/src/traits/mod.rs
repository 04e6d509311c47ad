//! Trait abstractions for the console's external collaborators.
//!
//! The wallet, the network connection and the marketplace SDK are all owned
//! by someone else. Hiding each behind a trait lets the actions be exercised
//! without a validator, a keypair on disk, or the SDK sidecar.

pub mod connection;
pub mod sdk;
pub mod time;
pub mod wallet;

// Re-export all traits for crate-internal use.
// The public API surface is controlled by lib.rs re-exports.
pub use connection::ChainConnection;
pub use sdk::{BidInstructions, ListingInstructions, MarketplaceSdk};
pub use time::TimeProvider;
pub use wallet::WalletAdapter;

// Re-export default implementations
pub use time::SystemTimeProvider;
