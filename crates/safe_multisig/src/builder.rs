use alloy_primitives::{Address, U256};
use multisend::{multi_send_call_only_calldata, multi_send_calldata, MultiSendTx};
use tracing::debug;

use crate::{
    error::{RelayContract, SafeError},
    network::NetworkContext,
    transaction_data::{Batch, NonceEpoch, OperationType, SafeTransactionData},
    typed_data::SigningPayload,
};

/// Builds the Safe transaction for `batch` at the nonce captured in `epoch`.
///
/// A single entry is executed directly. Anything else is routed through a MultiSend relay:
/// the call-only deployment when no entry is a delegatecall, the full one otherwise. The Safe
/// always reaches the relay by delegatecall so the sub-calls originate from the Safe itself.
pub fn build(
    batch: &Batch,
    network: &NetworkContext,
    epoch: NonceEpoch,
) -> Result<SafeTransactionData, SafeError> {
    if network.chain_id != epoch.chain_id {
        return Err(SafeError::ChainMismatch { expected: epoch.chain_id, actual: network.chain_id });
    }

    let (to, value, data, operation) = match batch.single() {
        Some(tx) => (tx.to, tx.value, tx.data.clone(), tx.operation),
        None => {
            let txs: Vec<MultiSendTx> = batch.transactions().iter().map(Into::into).collect();
            let (relay, data) = if batch.only_calls() {
                (
                    network.relay(RelayContract::MultiSendCallOnly)?,
                    multi_send_call_only_calldata(&txs)?,
                )
            } else {
                (network.relay(RelayContract::MultiSend)?, multi_send_calldata(&txs)?)
            };
            (relay, U256::ZERO, data, OperationType::DelegateCall)
        }
    };

    let tx = SafeTransactionData {
        to,
        value,
        data,
        operation,
        safe_tx_gas: U256::ZERO,
        base_gas: U256::ZERO,
        gas_price: U256::ZERO,
        gas_token: Address::ZERO,
        refund_receiver: Address::ZERO,
        epoch,
    };
    debug!(
        safe = %epoch.safe,
        to = %tx.to,
        operation = ?tx.operation,
        nonce = %tx.nonce(),
        entries = batch.len(),
        "built safe transaction"
    );

    Ok(tx)
}

pub fn signing_payload(tx: &SafeTransactionData) -> SigningPayload {
    SigningPayload::new(tx)
}
