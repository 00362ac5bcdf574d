use alloy_primitives::{Address, Bytes, TxHash, U256};
use multisend::MultiSendTx;
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::error::SafeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum OperationType {
    Call = 0,
    DelegateCall = 1,
}

impl From<OperationType> for u8 {
    fn from(operation: OperationType) -> Self {
        operation as u8
    }
}

impl TryFrom<u8> for OperationType {
    type Error = InvalidOperation;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Call),
            1 => Ok(Self::DelegateCall),
            other => Err(InvalidOperation(other.into())),
        }
    }
}

impl TryFrom<u64> for OperationType {
    type Error = InvalidOperation;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        u8::try_from(value).map_err(|_| InvalidOperation(value))?.try_into()
    }
}

/// An operation code other than `0` (call) or `1` (delegatecall).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidOperation(pub u64);

impl fmt::Display for InvalidOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid operation {}, expected 0 (call) or 1 (delegatecall)", self.0)
    }
}

/// One call of a batch, as listed in the batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTransaction {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub operation: OperationType,
}

impl From<&SubTransaction> for MultiSendTx {
    fn from(tx: &SubTransaction) -> Self {
        Self { operation: tx.operation.into(), to: tx.to, value: tx.value, data: tx.data.clone() }
    }
}

/// An ordered list of sub-transactions. Order is execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch(Vec<SubTransaction>);

impl Batch {
    pub fn new(transactions: Vec<SubTransaction>) -> Self {
        Self(transactions)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn transactions(&self) -> &[SubTransaction] {
        &self.0
    }

    /// Returns the only entry of a single-transaction batch.
    pub fn single(&self) -> Option<&SubTransaction> {
        match self.0.as_slice() {
            [tx] => Some(tx),
            _ => None,
        }
    }

    /// `true` when no entry is a delegatecall (vacuously true for an empty batch).
    pub fn only_calls(&self) -> bool {
        self.0.iter().all(|tx| tx.operation == OperationType::Call)
    }
}

/// The point-in-time Safe state a transaction was built against.
///
/// The nonce is read once while building. Anything else may execute a Safe transaction in the
/// meantime, so the epoch has to be re-validated right before submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonceEpoch {
    pub safe: Address,
    pub chain_id: u64,
    pub nonce: U256,
}

impl NonceEpoch {
    pub fn new(safe: Address, chain_id: u64, nonce: U256) -> Self {
        Self { safe, chain_id, nonce }
    }

    /// Checks the epoch against freshly read chain state.
    pub fn revalidate(&self, chain_id: u64, current_nonce: U256) -> Result<(), SafeError> {
        if chain_id != self.chain_id {
            return Err(SafeError::ChainMismatch { expected: self.chain_id, actual: chain_id });
        }
        if current_nonce != self.nonce {
            return Err(SafeError::StaleNonce { expected: self.nonce, current: current_nonce });
        }
        Ok(())
    }
}

/// The canonical transaction the Safe executes and whose EIP-712 hash the owners sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeTransactionData {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub operation: OperationType,
    pub safe_tx_gas: U256,
    pub base_gas: U256,
    pub gas_price: U256,
    pub gas_token: Address,
    pub refund_receiver: Address,
    pub epoch: NonceEpoch,
}

impl SafeTransactionData {
    pub fn safe(&self) -> Address {
        self.epoch.safe
    }

    pub fn chain_id(&self) -> u64 {
        self.epoch.chain_id
    }

    /// The signed nonce is always the one the epoch was read at.
    pub fn nonce(&self) -> U256 {
        self.epoch.nonce
    }
}

/// `execTransaction` calldata ready to be sent to a Safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableSafeTransaction {
    pub safe_address: Address,
    pub input_data: Bytes,
}

/// An execution that the node accepted but that may not be mined yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingExecution {
    pub safe_address: Address,
    pub tx_hash: TxHash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub success: bool,
}

#[cfg(test)]
mod test {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn operation_codes() {
        assert_eq!(OperationType::try_from(0u8), Ok(OperationType::Call));
        assert_eq!(OperationType::try_from(1u64), Ok(OperationType::DelegateCall));
        assert_eq!(OperationType::try_from(2u8), Err(InvalidOperation(2)));
        assert_eq!(OperationType::try_from(256u64), Err(InvalidOperation(256)));
    }

    #[test]
    fn operation_serializes_as_number() {
        assert_eq!(serde_json::to_string(&OperationType::DelegateCall).unwrap(), "1");
        assert!(serde_json::from_str::<OperationType>("3").is_err());
    }

    #[test]
    fn epoch_revalidation() {
        let safe = address!("0x2222222222222222222222222222222222222222");
        let epoch = NonceEpoch::new(safe, 1, U256::from(5));

        assert!(epoch.revalidate(1, U256::from(5)).is_ok());
        assert!(matches!(
            epoch.revalidate(1, U256::from(6)),
            Err(SafeError::StaleNonce { expected, current })
                if expected == U256::from(5) && current == U256::from(6)
        ));
        assert!(matches!(
            epoch.revalidate(10, U256::from(5)),
            Err(SafeError::ChainMismatch { expected: 1, actual: 10 })
        ));
    }

    #[test]
    fn nonce_follows_epoch() {
        let safe = address!("0x2222222222222222222222222222222222222222");
        let mut tx = SafeTransactionData {
            to: address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1111"),
            value: U256::ZERO,
            data: Bytes::new(),
            operation: OperationType::Call,
            safe_tx_gas: U256::ZERO,
            base_gas: U256::ZERO,
            gas_price: U256::ZERO,
            gas_token: Address::ZERO,
            refund_receiver: Address::ZERO,
            epoch: NonceEpoch::new(safe, 1, U256::from(5)),
        };
        assert_eq!(tx.nonce(), U256::from(5));

        tx.epoch = NonceEpoch::new(safe, 1, U256::from(9));
        assert_eq!(tx.nonce(), U256::from(9));
        assert!(tx.epoch.revalidate(1, tx.nonce()).is_ok());
    }
}
