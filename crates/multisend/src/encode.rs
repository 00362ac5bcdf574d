use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;

use crate::{contract::IMultiSend, error::MultiSendError};

/// `operation` value for a plain call.
pub const CALL: u8 = 0;
/// `operation` value for a delegatecall.
pub const DELEGATE_CALL: u8 = 1;

/// One entry of a MultiSend batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSendTx {
    /// call = 0, delegatecall = 1
    pub operation: u8,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

impl MultiSendTx {
    /// Appends the packed encoding of this entry to `out`.
    ///
    /// Layout: `uint8 operation | address to | uint256 value | uint256 dataLength | bytes data`.
    pub fn encode_packed_to(&self, out: &mut Vec<u8>) -> Result<(), MultiSendError> {
        if self.operation > DELEGATE_CALL {
            return Err(MultiSendError::InvalidOperation(self.operation));
        }

        out.reserve(1 + 20 + 32 + 32 + self.data.len());
        out.push(self.operation);
        out.extend_from_slice(self.to.as_slice());
        out.extend_from_slice(&self.value.to_be_bytes::<32>());
        out.extend_from_slice(&U256::from(self.data.len()).to_be_bytes::<32>());
        out.extend_from_slice(&self.data);

        Ok(())
    }
}

/// Packs `txs` into the `transactions` blob consumed by `multiSend(bytes)`.
pub fn encode_transactions(txs: &[MultiSendTx]) -> Result<Vec<u8>, MultiSendError> {
    let mut out = Vec::new();
    for tx in txs {
        tx.encode_packed_to(&mut out)?;
    }
    Ok(out)
}

/// ABI encodes a `multiSend(bytes)` call for `txs`.
pub fn multi_send_calldata(txs: &[MultiSendTx]) -> Result<Bytes, MultiSendError> {
    let transactions = encode_transactions(txs)?;
    let call = IMultiSend::multiSendCall { transactions: transactions.into() };
    Ok(call.abi_encode().into())
}

/// Same as [`multi_send_calldata`], but rejects entries MultiSendCallOnly would revert on.
pub fn multi_send_call_only_calldata(txs: &[MultiSendTx]) -> Result<Bytes, MultiSendError> {
    if let Some(tx) = txs.iter().find(|tx| tx.operation == DELEGATE_CALL) {
        return Err(MultiSendError::DelegateCallNotAllowed(tx.to));
    }
    multi_send_calldata(txs)
}
