//! Domain Entities

pub mod crypto_network;
pub mod notification;
pub mod payment_proof;
pub mod transaction;
pub mod wallet;

pub use crypto_network::{CryptoNetwork, CryptoNetworkChanges, NewCryptoNetwork};
pub use notification::{Notification, NotificationType};
pub use payment_proof::PaymentProof;
pub use transaction::Transaction;
pub use wallet::{SubWallet, Wallet};
