use alloy_sol_types::sol;

sol! {
    /// Reference: <https://github.com/safe-global/safe-smart-account/blob/main/contracts/libraries/MultiSend.sol>
    ///
    /// MultiSendCallOnly exposes the same entry point but rejects delegatecall entries.
    #[derive(Debug, PartialEq, Eq)]
    interface IMultiSend {
        /// @dev Sends multiple transactions and reverts all if one fails.
        /// @param transactions Encoded transactions. Each transaction is encoded as a packed bytes of
        /// operation as a uint8 with 0 for a call or 1 for a delegatecall (=> 1 byte),
        /// to as a address (=> 20 bytes),
        /// value as a uint256 (=> 32 bytes),
        /// data length as a uint256 (=> 32 bytes),
        /// data as bytes.
        function multiSend(bytes memory transactions) external payable;
    }
}
