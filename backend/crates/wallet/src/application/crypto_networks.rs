//! Crypto Network Registry Use Case
//!
//! Administrators register the networks users may deposit through and
//! switch them on or off.

use std::sync::Arc;

use kernel::id::{AdminId, CryptoNetworkId};

use crate::domain::entity::{CryptoNetwork, CryptoNetworkChanges, NewCryptoNetwork};
use crate::domain::repository::CryptoNetworkRepository;
use crate::error::{WalletError, WalletResult};

pub struct CryptoNetworkUseCase<R>
where
    R: CryptoNetworkRepository,
{
    repo: Arc<R>,
}

impl<R> CryptoNetworkUseCase<R>
where
    R: CryptoNetworkRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        input: NewCryptoNetwork,
        admin_id: AdminId,
    ) -> WalletResult<CryptoNetwork> {
        let network = CryptoNetwork::create(input)?;
        self.repo.save_network(&network).await?;

        tracing::info!(
            network_id = %network.id,
            name = %network.name,
            symbol = %network.symbol,
            admin_id = %admin_id,
            "Crypto network created"
        );

        Ok(network)
    }

    /// All networks for admins, active ones for users
    pub async fn list(&self, active_only: bool) -> WalletResult<Vec<CryptoNetwork>> {
        self.repo.list_networks(active_only).await
    }

    pub async fn update(
        &self,
        id: CryptoNetworkId,
        changes: CryptoNetworkChanges,
        admin_id: AdminId,
    ) -> WalletResult<CryptoNetwork> {
        let mut network = self.load(&id).await?;
        network.apply(changes)?;
        self.repo.save_network(&network).await?;

        tracing::info!(
            network_id = %network.id,
            is_active = network.is_active,
            admin_id = %admin_id,
            "Crypto network updated"
        );

        Ok(network)
    }

    /// Recorded deposits keep their amounts; only the link to the network goes
    pub async fn delete(&self, id: CryptoNetworkId, admin_id: AdminId) -> WalletResult<()> {
        if !self.repo.delete_network(&id).await? {
            return Err(WalletError::NotFound("Crypto network"));
        }

        tracing::info!(network_id = %id, admin_id = %admin_id, "Crypto network deleted");
        Ok(())
    }

    async fn load(&self, id: &CryptoNetworkId) -> WalletResult<CryptoNetwork> {
        self.repo
            .find_network(id)
            .await?
            .ok_or(WalletError::NotFound("Crypto network"))
    }
}
