use alloy_primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

use crate::{error::SafeError, signatures::SignatureBlob, typed_data::SigningPayload};

/// A plain transaction the interactive signer sends itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawTransaction {
    #[serde(skip)]
    pub chain_id: u64,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

/// What an interactive signer is asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningRequest {
    /// Sign the typed data with `eth_signTypedData_v4`.
    TypedData(SigningPayload),
    /// Send the transaction with `eth_sendTransaction`.
    SendTransaction(RawTransaction),
}

impl SigningRequest {
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::TypedData(payload) => payload.chain_id(),
            Self::SendTransaction(tx) => tx.chain_id,
        }
    }

    /// The wallet RPC method the request maps to.
    pub fn method(&self) -> &'static str {
        match self {
            Self::TypedData(_) => "eth_signTypedData_v4",
            Self::SendTransaction(_) => "eth_sendTransaction",
        }
    }

    /// The request as handed to the wallet page: `{ method, chainId, params }`.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        let params = match self {
            Self::TypedData(payload) => serde_json::to_value(payload.typed_data())?,
            Self::SendTransaction(tx) => serde_json::to_value(tx)?,
        };

        Ok(json!({
            "method": self.method(),
            "chainId": format!("{:#x}", self.chain_id()),
            "params": params,
        }))
    }

    /// Interprets the raw string the wallet returned for this request.
    pub fn parse_response(&self, raw: &str) -> Result<SignerResponse, SafeError> {
        let raw = raw.trim();
        match self {
            Self::TypedData(_) => raw.parse().map(SignerResponse::Signature).map_err(|e| {
                SafeError::Signer(format!("wallet returned a malformed signature: {e}"))
            }),
            Self::SendTransaction(_) => raw
                .parse()
                .map(SignerResponse::TransactionHash)
                .map_err(|e| SafeError::Signer(format!("wallet returned a malformed hash: {e}"))),
        }
    }
}

/// What came back from the signer. Not verified in any way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerResponse {
    Signature(SignatureBlob),
    TransactionHash(TxHash),
}

/// An out-of-process party, typically a browser wallet, that signs on an owner's behalf.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait InteractiveSigner: Send + Sync {
    /// Hands `request` over and waits for exactly one response.
    async fn request(&self, request: SigningRequest) -> Result<SignerResponse, SafeError>;
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::transaction_data::{NonceEpoch, OperationType, SafeTransactionData};
    use alloy_primitives::address;

    fn typed_data_request() -> SigningRequest {
        let safe = address!("0x5afe5afe5afe5afe5afe5afe5afe5afe5afe5afe");
        let tx = SafeTransactionData {
            to: address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1111"),
            value: U256::ZERO,
            data: Bytes::new(),
            operation: OperationType::Call,
            safe_tx_gas: U256::ZERO,
            base_gas: U256::ZERO,
            gas_price: U256::ZERO,
            gas_token: Address::ZERO,
            refund_receiver: Address::ZERO,
            epoch: NonceEpoch::new(safe, 100, U256::from(5)),
        };
        SigningRequest::TypedData(SigningPayload::new(&tx))
    }

    fn raw_request() -> SigningRequest {
        SigningRequest::SendTransaction(RawTransaction {
            chain_id: 11155111,
            to: address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1111"),
            value: U256::from(16),
            data: Bytes::from_static(&[0xab]),
        })
    }

    #[test]
    fn typed_data_request_json() {
        let json = typed_data_request().to_json().unwrap();

        assert_eq!(json["method"], "eth_signTypedData_v4");
        assert_eq!(json["chainId"], "0x64");
        assert_eq!(json["params"]["primaryType"], "SafeTx");
        assert_eq!(json["params"]["domain"]["chainId"], "0x64");
    }

    #[test]
    fn raw_request_json() {
        let json = raw_request().to_json().unwrap();

        assert_eq!(json["method"], "eth_sendTransaction");
        assert_eq!(json["chainId"], "0xaa36a7");
        assert_eq!(json["params"]["value"], "0x10");
        assert_eq!(json["params"]["data"], "0xab");
        assert!(json["params"].get("chain_id").is_none());
    }

    #[test]
    fn parses_responses() {
        let sig = format!("0x{}", "11".repeat(65));
        assert!(matches!(
            typed_data_request().parse_response(&sig),
            Ok(SignerResponse::Signature(blob)) if blob.as_bytes().len() == 65
        ));
        assert!(matches!(
            typed_data_request().parse_response("not hex"),
            Err(SafeError::Signer(_))
        ));

        let hash = format!("0x{}", "22".repeat(32));
        assert!(matches!(
            raw_request().parse_response(&hash),
            Ok(SignerResponse::TransactionHash(_))
        ));
        assert!(raw_request().parse_response("0x1234").is_err());
    }

    #[tokio::test]
    async fn mock_signer() {
        let mut signer = MockInteractiveSigner::new();
        signer
            .expect_request()
            .withf(|req| req.method() == "eth_signTypedData_v4")
            .returning(|_| Err(SafeError::SigningCancelled));

        let err = signer.request(typed_data_request()).await.unwrap_err();
        assert!(matches!(err, SafeError::SigningCancelled));
    }
}
