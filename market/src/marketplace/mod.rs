//! Marketplace domain values shared by the actions, the SDK seam and the UI.

pub mod action;
pub mod payload;
pub mod transaction;

pub use action::MarketAction;
pub use payload::{AccountMetaPayload, InstructionPayload, SdkRequest};
pub use transaction::PendingTransaction;
