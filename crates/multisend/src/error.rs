use alloy_primitives::Address;

/// Errors raised while encoding a MultiSend batch.
#[derive(Debug, thiserror::Error)]
pub enum MultiSendError {
    #[error("operation {0} is not a valid MultiSend operation (expected 0 or 1)")]
    InvalidOperation(u8),

    #[error("MultiSendCallOnly cannot relay a delegatecall to {0}")]
    DelegateCallNotAllowed(Address),
}
