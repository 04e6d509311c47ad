//! Mock implementations for testing.
//!
//! These stand in for the wallet, the RPC connection and the marketplace SDK
//! and record every interaction for assertions.

pub mod connection;
pub mod sdk;
pub mod time;
pub mod wallet;

pub use connection::MockConnection;
pub use sdk::{MockSdk, SdkCall, MOCK_PROGRAM_ID};
pub use time::MockTime;
pub use wallet::{MockWallet, SentTransaction};
