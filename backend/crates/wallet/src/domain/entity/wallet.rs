//! Wallet Entity
//!
//! One wallet per user, split into two independent sub-wallets: coins earned
//! by mining and coins bought with money. Each sub-wallet keeps an available
//! and a locked amount; locked coins are reserved for a pending withdrawal.
//!
//! Every mutating operation is all-or-nothing. Multi-step operations are
//! applied to a staged copy which replaces `self` only after every step has
//! succeeded.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde::Serialize;

use crate::domain::value_object::{Coins, LockAllocation, WalletType};
use crate::error::{WalletError, WalletResult};

// ============================================================================
// SubWallet
// ============================================================================

/// Available / locked pair owned by a [`Wallet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SubWallet {
    available: u64,
    locked: u64,
}

impl SubWallet {
    pub const fn new(available: u64, locked: u64) -> Self {
        Self { available, locked }
    }

    #[inline]
    pub const fn available(&self) -> u64 {
        self.available
    }

    #[inline]
    pub const fn locked(&self) -> u64 {
        self.locked
    }

    #[inline]
    pub fn total(&self) -> u64 {
        self.available.saturating_add(self.locked)
    }

    fn credit(&mut self, coins: u64) -> WalletResult<()> {
        self.available = self
            .available
            .checked_add(coins)
            .ok_or_else(|| WalletError::invariant_violation("Balance overflow"))?;
        Ok(())
    }

    fn lock(&mut self, coins: u64) -> WalletResult<()> {
        if self.available < coins {
            return Err(WalletError::InsufficientFunds {
                requested: coins,
                available: self.available,
            });
        }
        self.available -= coins;
        self.locked += coins;
        Ok(())
    }

    fn unlock(&mut self, coins: u64, label: &str) -> WalletResult<()> {
        if self.locked < coins {
            return Err(WalletError::invariant_violation(format!(
                "Cannot unlock {coins} {label} coins, only {} locked",
                self.locked
            )));
        }
        let available = self
            .available
            .checked_add(coins)
            .ok_or_else(|| WalletError::invariant_violation("Balance overflow"))?;
        self.locked -= coins;
        self.available = available;
        Ok(())
    }

    fn commit(&mut self, coins: u64, label: &str) -> WalletResult<()> {
        if self.locked < coins {
            return Err(WalletError::invariant_violation(format!(
                "Cannot commit {coins} {label} coins, only {} locked",
                self.locked
            )));
        }
        self.locked -= coins;
        Ok(())
    }
}

// ============================================================================
// Wallet
// ============================================================================

/// Per-user coin balances
///
/// Fields are private: balances only change through the operations below.
/// `version` is the optimistic-concurrency counter of the stored row; a
/// wallet that has never been stored has version 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wallet {
    user_id: UserId,
    mining: SubWallet,
    purchase: SubWallet,
    total_mined: u64,
    total_withdrawn: u64,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Empty, not yet persisted wallet
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            mining: SubWallet::default(),
            purchase: SubWallet::default(),
            total_mined: 0,
            total_withdrawn: 0,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild from storage
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        user_id: UserId,
        mining: SubWallet,
        purchase: SubWallet,
        total_mined: u64,
        total_withdrawn: u64,
        version: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            mining,
            purchase,
            total_mined,
            total_withdrawn,
            version,
            created_at,
            updated_at,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn mining(&self) -> SubWallet {
        self.mining
    }

    pub fn purchase(&self) -> SubWallet {
        self.purchase
    }

    pub fn total_available(&self) -> u64 {
        self.mining.available.saturating_add(self.purchase.available)
    }

    pub fn total_locked(&self) -> u64 {
        self.mining.locked.saturating_add(self.purchase.locked)
    }

    pub fn total_mined(&self) -> u64 {
        self.total_mined
    }

    pub fn total_withdrawn(&self) -> u64 {
        self.total_withdrawn
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn is_persisted(&self) -> bool {
        self.version > 0
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Version the stored row has after this wallet is committed
    pub(crate) fn mark_committed(&mut self) {
        self.version += 1;
    }

    // ------------------------------------------------------------------
    // Credits
    // ------------------------------------------------------------------

    pub fn add_purchase_coins(&mut self, coins: Coins) -> WalletResult<()> {
        self.apply(|w| w.purchase.credit(coins.get()))
    }

    /// Mining-session earnings; also counted in `total_mined`
    pub fn add_mining_coins(&mut self, coins: Coins) -> WalletResult<()> {
        self.apply(|w| {
            w.mining.credit(coins.get())?;
            w.total_mined = w
                .total_mined
                .checked_add(coins.get())
                .ok_or_else(|| WalletError::invariant_violation("Mined total overflow"))?;
            Ok(())
        })
    }

    /// Referral bonus lands in the earned (mining) sub-wallet but is not
    /// mining output, so `total_mined` is left alone.
    pub fn credit_referral(&mut self, coins: Coins) -> WalletResult<()> {
        self.apply(|w| w.mining.credit(coins.get()))
    }

    // ------------------------------------------------------------------
    // Lock / unlock
    // ------------------------------------------------------------------

    /// Move coins from available to locked
    ///
    /// `Auto` takes from mining first and the remainder from purchase; it
    /// fails only when the combined available balance is short.
    pub fn lock_coins(
        &mut self,
        wallet_type: WalletType,
        coins: Coins,
    ) -> WalletResult<LockAllocation> {
        let amount = coins.get();
        self.apply(|w| match wallet_type {
            WalletType::Mining => {
                w.mining.lock(amount)?;
                Ok(LockAllocation::mining(amount))
            }
            WalletType::Purchase => {
                w.purchase.lock(amount)?;
                Ok(LockAllocation::purchase(amount))
            }
            WalletType::Auto => {
                let combined = w.total_available();
                if combined < amount {
                    return Err(WalletError::InsufficientFunds {
                        requested: amount,
                        available: combined,
                    });
                }
                let from_mining = w.mining.available.min(amount);
                let from_purchase = amount - from_mining;
                w.mining.lock(from_mining)?;
                w.purchase.lock(from_purchase)?;
                Ok(LockAllocation {
                    mining: from_mining,
                    purchase: from_purchase,
                })
            }
        })
    }

    pub fn unlock_mining_coins(&mut self, coins: Coins) -> WalletResult<()> {
        self.apply(|w| w.mining.unlock(coins.get(), "mining"))
    }

    pub fn unlock_purchase_coins(&mut self, coins: Coins) -> WalletResult<()> {
        self.apply(|w| w.purchase.unlock(coins.get(), "purchase"))
    }

    /// Legacy unlock for withdrawals that recorded no allocation: the whole
    /// amount goes back to whichever sub-wallet holds enough locked coins,
    /// mining preferred.
    pub fn unlock_coins(&mut self, coins: Coins) -> WalletResult<()> {
        self.apply(|w| {
            let amount = coins.get();
            if w.mining.locked >= amount {
                w.mining.unlock(amount, "mining")
            } else if w.purchase.locked >= amount {
                w.purchase.unlock(amount, "purchase")
            } else {
                Err(WalletError::invariant_violation(format!(
                    "Cannot unlock {amount} coins: neither sub-wallet holds that much locked"
                )))
            }
        })
    }

    /// Exact refund of a recorded lock
    pub fn release_allocation(&mut self, allocation: &LockAllocation) -> WalletResult<()> {
        self.apply(|w| {
            w.mining.unlock(allocation.mining, "mining")?;
            w.purchase.unlock(allocation.purchase, "purchase")
        })
    }

    // ------------------------------------------------------------------
    // Commit
    // ------------------------------------------------------------------

    /// Remove locked coins for good (approved payout)
    ///
    /// `Auto` uses the same sub-wallet selection as [`Self::unlock_coins`].
    pub fn commit_locked_coins(&mut self, wallet_type: WalletType, coins: Coins) -> WalletResult<()> {
        let amount = coins.get();
        self.apply(|w| {
            match wallet_type {
                WalletType::Mining => w.mining.commit(amount, "mining")?,
                WalletType::Purchase => w.purchase.commit(amount, "purchase")?,
                WalletType::Auto => {
                    if w.mining.locked >= amount {
                        w.mining.commit(amount, "mining")?
                    } else if w.purchase.locked >= amount {
                        w.purchase.commit(amount, "purchase")?
                    } else {
                        return Err(WalletError::invariant_violation(format!(
                            "Cannot commit {amount} coins: neither sub-wallet holds that much locked"
                        )));
                    }
                }
            }
            w.add_withdrawn(amount)
        })
    }

    /// Commit exactly what a recorded lock reserved
    pub fn commit_allocation(&mut self, allocation: &LockAllocation) -> WalletResult<()> {
        self.apply(|w| {
            w.mining.commit(allocation.mining, "mining")?;
            w.purchase.commit(allocation.purchase, "purchase")?;
            let total = allocation
                .total()
                .ok_or_else(|| WalletError::invariant_violation("Allocation overflow"))?;
            w.add_withdrawn(total)
        })
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn add_withdrawn(&mut self, coins: u64) -> WalletResult<()> {
        self.total_withdrawn = self
            .total_withdrawn
            .checked_add(coins)
            .ok_or_else(|| WalletError::invariant_violation("Withdrawn total overflow"))?;
        Ok(())
    }

    /// Run `op` on a staged copy; keep the result only on success
    fn apply<T>(&mut self, op: impl FnOnce(&mut Wallet) -> WalletResult<T>) -> WalletResult<T> {
        let mut staged = self.clone();
        let out = op(&mut staged)?;
        staged.updated_at = Utc::now();
        *self = staged;
        Ok(out)
    }
}
