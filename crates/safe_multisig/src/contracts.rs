use alloy_sol_types::sol;

sol! {
    /// The subset of the Safe (>= v1.3.0) interface used to execute transactions.
    #[derive(Debug, PartialEq, Eq)]
    interface ISafe {
        function nonce() external view returns (uint256);

        function execTransaction(
            address to,
            uint256 value,
            bytes calldata data,
            uint8 operation,
            uint256 safeTxGas,
            uint256 baseGas,
            uint256 gasPrice,
            address gasToken,
            address payable refundReceiver,
            bytes memory signatures
        ) external payable returns (bool success);
    }

    /// EIP-712 struct owners sign. Field order and types are fixed by the Safe contract.
    #[derive(Debug, PartialEq, Eq)]
    struct SafeTx {
        address to;
        uint256 value;
        bytes data;
        uint8 operation;
        uint256 safeTxGas;
        uint256 baseGas;
        uint256 gasPrice;
        address gasToken;
        address refundReceiver;
        uint256 nonce;
    }
}
