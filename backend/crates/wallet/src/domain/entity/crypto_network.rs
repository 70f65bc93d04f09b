//! Crypto Network Entity
//!
//! A deposit channel (e.g. USDT on TRC20) managed by administrators. Users
//! send funds to `wallet_address` and record the deposit against the
//! network; only active networks accept new deposits.

use chrono::{DateTime, Utc};
use kernel::id::CryptoNetworkId;

use crate::error::{WalletError, WalletResult};

const DEFAULT_SYMBOL: &str = "USDT";
const MAX_LABEL_LEN: usize = 32;
const MAX_ADDRESS_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoNetwork {
    pub id: CryptoNetworkId,
    /// Token standard shown to users, e.g. `TRC20`
    pub name: String,
    pub symbol: String,
    /// Underlying chain, e.g. `TRON`
    pub network: String,
    pub wallet_address: String,
    pub qr_code_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for registering a network
#[derive(Debug, Clone, Default)]
pub struct NewCryptoNetwork {
    pub name: String,
    /// Defaults to `USDT`
    pub symbol: Option<String>,
    pub network: String,
    pub wallet_address: String,
    pub qr_code_url: Option<String>,
}

/// Partial update; `None` leaves a field unchanged
///
/// An empty `qr_code_url` clears the stored one.
#[derive(Debug, Clone, Default)]
pub struct CryptoNetworkChanges {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub network: Option<String>,
    pub wallet_address: Option<String>,
    pub qr_code_url: Option<String>,
    pub is_active: Option<bool>,
}

impl CryptoNetwork {
    pub fn create(input: NewCryptoNetwork) -> WalletResult<Self> {
        let name = label(&input.name, "Network name", MAX_LABEL_LEN)?;
        let network = label(&input.network, "Chain", MAX_LABEL_LEN)?;
        let wallet_address = label(&input.wallet_address, "Wallet address", MAX_ADDRESS_LEN)?;
        let symbol = match input.symbol.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_SYMBOL.to_string(),
            Some(raw) => label(raw, "Symbol", MAX_LABEL_LEN)?,
        };

        let now = Utc::now();
        Ok(Self {
            id: CryptoNetworkId::new(),
            name,
            symbol,
            network,
            wallet_address,
            qr_code_url: optional(input.qr_code_url),
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply `changes`; on error nothing is modified
    pub fn apply(&mut self, changes: CryptoNetworkChanges) -> WalletResult<()> {
        let name = changes
            .name
            .map(|v| label(&v, "Network name", MAX_LABEL_LEN))
            .transpose()?;
        let symbol = changes
            .symbol
            .map(|v| label(&v, "Symbol", MAX_LABEL_LEN))
            .transpose()?;
        let network = changes
            .network
            .map(|v| label(&v, "Chain", MAX_LABEL_LEN))
            .transpose()?;
        let wallet_address = changes
            .wallet_address
            .map(|v| label(&v, "Wallet address", MAX_ADDRESS_LEN))
            .transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(symbol) = symbol {
            self.symbol = symbol;
        }
        if let Some(network) = network {
            self.network = network;
        }
        if let Some(wallet_address) = wallet_address {
            self.wallet_address = wallet_address;
        }
        if let Some(qr_code_url) = changes.qr_code_url {
            self.qr_code_url = optional(Some(qr_code_url));
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn ensure_accepts_deposits(&self) -> WalletResult<()> {
        if !self.is_active {
            return Err(WalletError::invalid_input(format!(
                "Crypto network {} is not accepting deposits",
                self.name
            )));
        }
        Ok(())
    }
}

fn label(raw: &str, field: &str, max_len: usize) -> WalletResult<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(WalletError::invalid_input(format!("{field} is required")));
    }
    if value.chars().count() > max_len {
        return Err(WalletError::invalid_input(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(value.to_string())
}

fn optional(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
