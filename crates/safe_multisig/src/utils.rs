use crate::typed_data::{EIP712Field, EIP712TxTypes};

/// Typed-data schema for `SafeTx`, as expected by `eth_signTypedData_v4`.
pub fn get_eip712_tx_types() -> EIP712TxTypes {
    EIP712TxTypes {
        eip712_domain: eip712_domain(),
        safe_tx: vec![
            EIP712Field::new("address", "to"),
            EIP712Field::new("uint256", "value"),
            EIP712Field::new("bytes", "data"),
            EIP712Field::new("uint8", "operation"),
            EIP712Field::new("uint256", "safeTxGas"),
            EIP712Field::new("uint256", "baseGas"),
            EIP712Field::new("uint256", "gasPrice"),
            EIP712Field::new("address", "gasToken"),
            EIP712Field::new("address", "refundReceiver"),
            EIP712Field::new("uint256", "nonce"),
        ],
    }
}

// Domain for v1.3.0 and later. Older Safes omit `chainId` and are not supported.
fn eip712_domain() -> Vec<EIP712Field> {
    vec![EIP712Field::new("uint256", "chainId"), EIP712Field::new("address", "verifyingContract")]
}
