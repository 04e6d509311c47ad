//! Production collaborators: RPC connection, file-backed wallet, SDK sidecar.

pub mod connection;
pub mod sdk;
pub mod wallet;

pub use connection::RpcConnection;
pub use sdk::{SdkSidecar, SidecarSdk};
pub use wallet::KeypairWallet;
