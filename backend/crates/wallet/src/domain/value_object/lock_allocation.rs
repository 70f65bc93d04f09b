//! Lock allocation
//!
//! Records how many coins a withdrawal actually locked in each sub-wallet,
//! so a rejection can return them to exactly where they came from.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockAllocation {
    pub mining: u64,
    pub purchase: u64,
}

impl LockAllocation {
    pub const fn mining(coins: u64) -> Self {
        Self {
            mining: coins,
            purchase: 0,
        }
    }

    pub const fn purchase(coins: u64) -> Self {
        Self {
            mining: 0,
            purchase: coins,
        }
    }

    /// `None` on overflow, which a valid allocation can never reach
    pub fn total(&self) -> Option<u64> {
        self.mining.checked_add(self.purchase)
    }
}
