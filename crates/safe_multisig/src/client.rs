use alloy_primitives::{Address, U256};
use tracing::debug;

use crate::{
    builder::build,
    error::SafeError,
    executor::Executor,
    network::{resolve, NetworkContext, NetworkOverrides},
    rpc::SafeRpc,
    signatures::SignatureOrdering,
    transaction_data::{Batch, NonceEpoch, SafeTransactionData},
};

/// A Safe on the chain served by `rpc`.
#[derive(Debug)]
pub struct SafeClient<R> {
    rpc: R,
    safe: Address,
    network: NetworkContext,
}

impl<R: SafeRpc> SafeClient<R> {
    /// Reads the chain id and resolves the relay contracts for it.
    pub async fn init(
        rpc: R,
        safe: Address,
        overrides: NetworkOverrides,
    ) -> Result<Self, SafeError> {
        let chain_id = rpc.chain_id().await?;
        let network = resolve(chain_id, overrides);
        debug!(%safe, chain_id, "initialized safe client");

        Ok(Self { rpc, safe, network })
    }

    pub fn safe(&self) -> Address {
        self.safe
    }

    pub fn network(&self) -> &NetworkContext {
        &self.network
    }

    /// Snapshots the Safe nonce and builds the transaction for `batch` against it.
    pub async fn create_transaction(
        &self,
        batch: &Batch,
    ) -> Result<SafeTransactionData, SafeError> {
        let nonce = self.rpc.nonce(self.safe).await?;
        self.create_transaction_at(batch, nonce)
    }

    /// Builds the transaction for `batch` at a nonce the owners already signed for. Nothing is
    /// read, so a Safe that moved past `nonce` is only caught when the executor revalidates.
    pub fn create_transaction_at(
        &self,
        batch: &Batch,
        nonce: U256,
    ) -> Result<SafeTransactionData, SafeError> {
        let epoch = NonceEpoch::new(self.safe, self.network.chain_id, nonce);
        build(batch, &self.network, epoch)
    }

    pub fn into_executor(self, ordering: SignatureOrdering) -> Executor<R> {
        Executor::new(self.rpc).with_ordering(ordering)
    }
}
