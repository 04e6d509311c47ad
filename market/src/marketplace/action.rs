use std::fmt;

use serde::{Deserialize, Serialize};

/// The four on-chain actions the console can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketAction {
    CreateListing,
    CreateBid,
    DeleteBid,
    DeleteListing,
}

impl MarketAction {
    /// Every action, in the order the UI presents them.
    pub const ALL: [Self; 4] = [
        Self::CreateListing,
        Self::CreateBid,
        Self::DeleteBid,
        Self::DeleteListing,
    ];

    /// Human-readable label used for buttons and log lines.
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreateListing => "create listing",
            Self::CreateBid => "create bid",
            Self::DeleteBid => "delete bid",
            Self::DeleteListing => "delete listing",
        }
    }
}

impl fmt::Display for MarketAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
