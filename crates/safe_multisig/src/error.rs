use alloy_primitives::{Address, U256};
use multisend::MultiSendError;

use std::fmt;

/// The batch relay contracts a multi-entry Safe transaction can be routed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayContract {
    MultiSend,
    MultiSendCallOnly,
}

impl fmt::Display for RelayContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultiSend => f.write_str("multiSend"),
            Self::MultiSendCallOnly => f.write_str("multiSendCallOnly"),
        }
    }
}

/// A batch file that does not have the shape `[{ to, value, data, operation }]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBatch {
    /// Position of the first offending entry, `None` when the input as a whole is malformed.
    pub index: Option<usize>,
    pub reason: String,
}

impl InvalidBatch {
    pub(crate) fn whole(reason: impl Into<String>) -> Self {
        Self { index: None, reason: reason.into() }
    }

    pub(crate) fn at(index: usize, reason: impl Into<String>) -> Self {
        Self { index: Some(index), reason: reason.into() }
    }
}

impl fmt::Display for InvalidBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "transaction #{index}: {}", self.reason),
            None => f.write_str(&self.reason),
        }
    }
}

impl std::error::Error for InvalidBatch {}

#[derive(Debug, thiserror::Error)]
pub enum SafeError {
    #[error("transaction file is not valid ({0}). Need an array of {{ to, value, data, operation }}")]
    InvalidBatch(#[from] InvalidBatch),

    #[error("unknown {contract} contract address for chain {chain_id}")]
    UnresolvedNetworkContract { contract: RelayContract, chain_id: u64 },

    #[error("RPC request failed: {0}")]
    NetworkConnectivity(String),

    #[error("unexpected response from {contract}: {reason}")]
    UnexpectedResponse { contract: Address, reason: String },

    #[error("transaction was built for chain {expected} but the RPC serves chain {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    #[error("stale nonce: transaction was built for nonce {expected} but the Safe is at nonce {current}")]
    StaleNonce { expected: U256, current: U256 },

    #[error("execution rejected: {0}")]
    Execution(String),

    #[error("at least one signature is required")]
    NoSignatures,

    #[error("invalid signature #{index}: {reason}")]
    InvalidSignature { index: usize, reason: String },

    #[error("signatures are not sorted by ascending owner address: {previous} is followed by {next}")]
    SignatureOrder { previous: Address, next: Address },

    #[error("{0} is not set")]
    MissingCredential(&'static str),

    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    #[error("signing request was cancelled")]
    SigningCancelled,

    #[error("interactive signer failed: {0}")]
    Signer(String),

    #[error(transparent)]
    MultiSend(#[from] MultiSendError),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn invalid_batch_names_the_entry() {
        let err = InvalidBatch::at(2, "`operation` must be 0 or 1");
        assert_eq!(err.to_string(), "transaction #2: `operation` must be 0 or 1");

        let err = InvalidBatch::whole("expected a JSON array");
        assert_eq!(err.to_string(), "expected a JSON array");
    }

    #[test]
    fn relay_contract_display() {
        let err = SafeError::UnresolvedNetworkContract {
            contract: RelayContract::MultiSendCallOnly,
            chain_id: 31337,
        };
        assert_eq!(err.to_string(), "unknown multiSendCallOnly contract address for chain 31337");
    }
}
