use tracing::{debug, info};

use crate::{
    calls::exec_transaction,
    error::SafeError,
    rpc::SafeRpc,
    signatures::{aggregate, SignatureBlob, SignatureOrdering},
    transaction_data::{ExecutionReceipt, PendingExecution, SafeTransactionData},
    typed_data::SigningPayload,
};

/// Submits signed Safe transactions through `execTransaction`.
#[derive(Debug)]
pub struct Executor<R> {
    rpc: R,
    ordering: SignatureOrdering,
}

impl<R: SafeRpc> Executor<R> {
    pub fn new(rpc: R) -> Self {
        Self { rpc, ordering: SignatureOrdering::default() }
    }

    pub fn with_ordering(mut self, ordering: SignatureOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Aggregates `signatures`, re-checks the nonce epoch `tx` was built in and sends the
    /// `execTransaction` call. Returns as soon as the node accepted it.
    pub async fn submit(
        &self,
        tx: &SafeTransactionData,
        signatures: &[SignatureBlob],
    ) -> Result<PendingExecution, SafeError> {
        let digest = SigningPayload::new(tx).digest();
        let signatures = aggregate(signatures, self.ordering, digest)?;

        let chain_id = self.rpc.chain_id().await?;
        let current_nonce = self.rpc.nonce(tx.safe()).await?;
        tx.epoch.revalidate(chain_id, current_nonce)?;
        debug!(safe = %tx.safe(), nonce = %current_nonce, %digest, "nonce epoch still valid");

        let exec = exec_transaction(tx, signatures.as_bytes());
        let tx_hash = self.rpc.submit(exec.safe_address, exec.input_data).await?;
        info!(safe = %exec.safe_address, %tx_hash, "submitted execTransaction");

        Ok(PendingExecution { safe_address: exec.safe_address, tx_hash })
    }

    /// Waits for `pending` to be mined. A reverted transaction is an [`SafeError::Execution`].
    pub async fn confirm(&self, pending: &PendingExecution) -> Result<ExecutionReceipt, SafeError> {
        let receipt = self.rpc.wait_for_receipt(pending.tx_hash).await?;
        if !receipt.success {
            return Err(SafeError::Execution(format!("transaction {} reverted", pending.tx_hash)));
        }
        info!(tx_hash = %receipt.tx_hash, block = ?receipt.block_number, "execution confirmed");

        Ok(receipt)
    }

    pub async fn execute(
        &self,
        tx: &SafeTransactionData,
        signatures: &[SignatureBlob],
    ) -> Result<ExecutionReceipt, SafeError> {
        let pending = self.submit(tx, signatures).await?;
        self.confirm(&pending).await
    }
}
