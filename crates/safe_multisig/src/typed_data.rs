use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{Eip712Domain, SolStruct};
use serde::Serialize;

use crate::{contracts::SafeTx, transaction_data::SafeTransactionData, utils::get_eip712_tx_types};

pub const PRIMARY_TYPE: &str = "SafeTx";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EIP712Field {
    #[serde(rename = "type")]
    pub field_type: String,
    pub name: String,
}

impl EIP712Field {
    pub fn new(field_type: &str, name: &str) -> Self {
        Self { field_type: field_type.to_string(), name: name.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EIP712TxTypes {
    #[serde(rename = "EIP712Domain")]
    pub eip712_domain: Vec<EIP712Field>,
    #[serde(rename = "SafeTx")]
    pub safe_tx: Vec<EIP712Field>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EIP712Domain {
    pub verifying_contract: Address,
    /// `0x`-prefixed hex, the form wallets expect for `wallet_switchEthereumChain`.
    pub chain_id: String,
}

/// `SafeTx` values in the shape browser wallets accept: integers as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeTxMessage {
    pub to: Address,
    pub value: String,
    pub data: Bytes,
    pub operation: u8,
    pub safe_tx_gas: String,
    pub base_gas: String,
    pub gas_price: String,
    pub gas_token: Address,
    pub refund_receiver: Address,
    pub nonce: String,
}

/// The `{ domain, message, primaryType, types }` object handed to `eth_signTypedData_v4`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EIP712TypedData {
    pub domain: EIP712Domain,
    pub message: SafeTxMessage,
    pub primary_type: &'static str,
    pub types: EIP712TxTypes,
}

impl From<&SafeTransactionData> for SafeTx {
    fn from(tx: &SafeTransactionData) -> Self {
        Self {
            to: tx.to,
            value: tx.value,
            data: tx.data.clone(),
            operation: tx.operation.into(),
            safeTxGas: tx.safe_tx_gas,
            baseGas: tx.base_gas,
            gasPrice: tx.gas_price,
            gasToken: tx.gas_token,
            refundReceiver: tx.refund_receiver,
            nonce: tx.nonce(),
        }
    }
}

/// The typed data every owner signs for one Safe transaction, together with its digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningPayload {
    chain_id: u64,
    safe: Address,
    safe_tx: SafeTx,
    digest: B256,
}

impl SigningPayload {
    pub fn new(tx: &SafeTransactionData) -> Self {
        let safe_tx = SafeTx::from(tx);
        let domain = eip712_domain(tx.chain_id(), tx.safe());
        let digest = safe_tx.eip712_signing_hash(&domain);

        Self { chain_id: tx.chain_id(), safe: tx.safe(), safe_tx, digest }
    }

    /// The `safeTxHash`: `keccak256(0x1901 ‖ domainSeparator ‖ hashStruct(SafeTx))`.
    pub fn digest(&self) -> B256 {
        self.digest
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn safe(&self) -> Address {
        self.safe
    }

    pub fn domain(&self) -> Eip712Domain {
        eip712_domain(self.chain_id, self.safe)
    }

    pub fn typed_data(&self) -> EIP712TypedData {
        let tx = &self.safe_tx;
        EIP712TypedData {
            domain: EIP712Domain {
                verifying_contract: self.safe,
                chain_id: format!("{:#x}", self.chain_id),
            },
            message: SafeTxMessage {
                to: tx.to,
                value: tx.value.to_string(),
                data: tx.data.clone(),
                operation: tx.operation,
                safe_tx_gas: tx.safeTxGas.to_string(),
                base_gas: tx.baseGas.to_string(),
                gas_price: tx.gasPrice.to_string(),
                gas_token: tx.gasToken,
                refund_receiver: tx.refundReceiver,
                nonce: tx.nonce.to_string(),
            },
            primary_type: PRIMARY_TYPE,
            types: get_eip712_tx_types(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.typed_data())
    }
}

fn eip712_domain(chain_id: u64, safe: Address) -> Eip712Domain {
    Eip712Domain::new(None, None, Some(U256::from(chain_id)), Some(safe), None)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::transaction_data::{NonceEpoch, OperationType};
    use alloy_primitives::{address, b256, keccak256};

    /// `SAFE_TX_TYPEHASH` from the Safe contract.
    const SAFE_TX_TYPEHASH: B256 =
        b256!("0xbb8310d486368db6bd6f849402fdd73ad53d316b5a4b2644ad6efe0f941286d8");
    /// `DOMAIN_SEPARATOR_TYPEHASH` from the Safe contract.
    const DOMAIN_SEPARATOR_TYPEHASH: B256 =
        b256!("0x47e79534a245952e8b16893a336b85a3d9ea9fa8c573f3d803afb92a79469218");

    const SAFE: Address = address!("0x5afe5afe5afe5afe5afe5afe5afe5afe5afe5afe");

    fn safe_tx(nonce: u64) -> SafeTransactionData {
        SafeTransactionData {
            to: address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1111"),
            value: U256::from(1),
            data: Bytes::from_static(&[0x12, 0x34]),
            operation: OperationType::Call,
            safe_tx_gas: U256::ZERO,
            base_gas: U256::ZERO,
            gas_price: U256::ZERO,
            gas_token: Address::ZERO,
            refund_receiver: Address::ZERO,
            epoch: NonceEpoch::new(SAFE, 1, U256::from(nonce)),
        }
    }

    fn encode_type(name: &str, fields: &[EIP712Field]) -> String {
        let fields: Vec<_> =
            fields.iter().map(|f| format!("{} {}", f.field_type, f.name)).collect();
        format!("{name}({})", fields.join(","))
    }

    #[test]
    fn schema_matches_contract_type_hashes() {
        let types = get_eip712_tx_types();

        assert_eq!(encode_type(PRIMARY_TYPE, &types.safe_tx), SafeTx::eip712_encode_type());
        assert_eq!(keccak256(encode_type(PRIMARY_TYPE, &types.safe_tx)), SAFE_TX_TYPEHASH);
        assert_eq!(
            keccak256(encode_type("EIP712Domain", &types.eip712_domain)),
            DOMAIN_SEPARATOR_TYPEHASH
        );
    }

    #[test]
    fn digest_is_domain_separated_struct_hash() {
        let payload = SigningPayload::new(&safe_tx(5));

        let mut separator_input = DOMAIN_SEPARATOR_TYPEHASH.to_vec();
        separator_input.extend_from_slice(&U256::from(1).to_be_bytes::<32>());
        separator_input.extend_from_slice(B256::left_padding_from(SAFE.as_slice()).as_slice());
        let separator = keccak256(separator_input);
        assert_eq!(payload.domain().separator(), separator);

        let mut digest_input = vec![0x19, 0x01];
        digest_input.extend_from_slice(separator.as_slice());
        digest_input.extend_from_slice(SafeTx::from(&safe_tx(5)).eip712_hash_struct().as_slice());
        assert_eq!(payload.digest(), keccak256(digest_input));
    }

    #[test]
    fn digest_is_deterministic() {
        let a = SigningPayload::new(&safe_tx(5));
        let b = SigningPayload::new(&safe_tx(5));
        assert_eq!(a, b);
        assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());

        assert_ne!(a.digest(), SigningPayload::new(&safe_tx(6)).digest());
    }

    #[test]
    fn typed_data_json_shape() {
        let payload = SigningPayload::new(&safe_tx(5));
        let json: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();

        assert_eq!(json["primaryType"], "SafeTx");
        assert_eq!(json["domain"]["chainId"], "0x1");
        assert_eq!(
            json["domain"]["verifyingContract"].as_str().unwrap().to_lowercase(),
            SAFE.to_string().to_lowercase()
        );
        assert_eq!(json["message"]["value"], "1");
        assert_eq!(json["message"]["data"], "0x1234");
        assert_eq!(json["message"]["operation"], 0);
        assert_eq!(json["message"]["safeTxGas"], "0");
        assert_eq!(json["message"]["nonce"], "5");
        assert_eq!(json["types"]["SafeTx"][3]["type"], "uint8");
        assert_eq!(json["types"]["SafeTx"][3]["name"], "operation");
        assert_eq!(json["types"]["EIP712Domain"].as_array().unwrap().len(), 2);
    }
}
