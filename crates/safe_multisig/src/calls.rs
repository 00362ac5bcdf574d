use alloy_primitives::Bytes;
use alloy_sol_types::SolCall;

use crate::{
    contracts::ISafe,
    transaction_data::{ExecutableSafeTransaction, SafeTransactionData},
};

/// Encodes `execTransaction` for `safe_tx` carrying the aggregated owner `signatures`.
pub fn exec_transaction(
    safe_tx: &SafeTransactionData,
    signatures: &[u8],
) -> ExecutableSafeTransaction {
    let call = ISafe::execTransactionCall {
        to: safe_tx.to,
        value: safe_tx.value,
        data: safe_tx.data.clone(),
        operation: safe_tx.operation.into(),
        safeTxGas: safe_tx.safe_tx_gas,
        baseGas: safe_tx.base_gas,
        gasPrice: safe_tx.gas_price,
        gasToken: safe_tx.gas_token,
        refundReceiver: safe_tx.refund_receiver,
        signatures: Bytes::copy_from_slice(signatures),
    };

    ExecutableSafeTransaction { safe_address: safe_tx.safe(), input_data: call.abi_encode().into() }
}

/// Calldata for the Safe's `nonce()` getter.
pub fn nonce() -> Bytes {
    ISafe::nonceCall {}.abi_encode().into()
}
