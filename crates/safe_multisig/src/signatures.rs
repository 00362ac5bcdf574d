use alloy_primitives::{hex, Address, Bytes, Signature, B256, U256};
use tracing::trace;

use std::{fmt, str::FromStr};

use crate::error::SafeError;

/// `r ‖ s ‖ v`
pub const SIGNATURE_LENGTH: usize = 65;

/// One owner's signature as handed over by the operator. Never inspected unless the ordering
/// check is requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureBlob(Bytes);

impl SignatureBlob {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for SignatureBlob {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode(s.trim()).map(Self::new)
    }
}

impl fmt::Display for SignatureBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How [`aggregate`] treats the order the operator supplied signatures in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignatureOrdering {
    /// Concatenate as given. The contract rejects out-of-order owners on its own.
    #[default]
    AsSupplied,
    /// Recover every owner and fail unless they are strictly ascending.
    RequireAscending,
}

/// The `signatures` argument of `execTransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedSignature(Bytes);

impl AggregatedSignature {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Concatenates `blobs` in the given order. Never reorders.
///
/// `digest` is the `safeTxHash` the blobs sign and is only used for
/// [`SignatureOrdering::RequireAscending`].
pub fn aggregate(
    blobs: &[SignatureBlob],
    ordering: SignatureOrdering,
    digest: B256,
) -> Result<AggregatedSignature, SafeError> {
    if blobs.is_empty() {
        return Err(SafeError::NoSignatures);
    }

    if ordering == SignatureOrdering::RequireAscending {
        check_ascending(blobs, digest)?;
    }

    let signatures: Vec<u8> = blobs.iter().flat_map(|b| b.as_bytes().iter().copied()).collect();
    trace!(count = blobs.len(), len = signatures.len(), "aggregated signatures");

    Ok(AggregatedSignature(signatures.into()))
}

fn check_ascending(blobs: &[SignatureBlob], digest: B256) -> Result<(), SafeError> {
    let mut previous: Option<Address> = None;
    for (index, blob) in blobs.iter().enumerate() {
        let owner = recover_owner(blob.as_bytes(), digest)
            .map_err(|reason| SafeError::InvalidSignature { index, reason })?;
        trace!(index, %owner, "recovered signer");

        if let Some(previous) = previous {
            if owner <= previous {
                return Err(SafeError::SignatureOrder { previous, next: owner });
            }
        }
        previous = Some(owner);
    }
    Ok(())
}

/// Determines the owner a single 65 byte signature stands for, following the Safe contract's
/// `checkNSignatures` rules:
///
/// * `v = 0`: contract signature, owner is `r`
/// * `v = 1`: approved hash, owner is `r`
/// * `v > 30`: `eth_sign` over the EIP-191 prefixed digest, with `v - 4`
/// * otherwise: ECDSA over the digest
pub fn recover_owner(signature: &[u8], digest: B256) -> Result<Address, String> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(format!("expected {SIGNATURE_LENGTH} bytes, got {}", signature.len()));
    }

    let r = U256::from_be_slice(&signature[..32]);
    let s = U256::from_be_slice(&signature[32..64]);
    let v = signature[64];

    match v {
        0 | 1 => Ok(Address::from_slice(&signature[12..32])),
        31 | 32 => Signature::new(r, s, v - 4 == 28)
            .recover_address_from_msg(digest)
            .map_err(|e| e.to_string()),
        27 | 28 => Signature::new(r, s, v == 28)
            .recover_address_from_prehash(&digest)
            .map_err(|e| e.to_string()),
        other => Err(format!("unsupported v value {other}")),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloy_primitives::{address, b256};
    use alloy_signer::SignerSync;
    use alloy_signer_local::PrivateKeySigner;

    const DIGEST: B256 =
        b256!("0x1111111111111111111111111111111111111111111111111111111111111111");

    /// Two fresh owners, sorted by address.
    fn owners() -> (PrivateKeySigner, PrivateKeySigner) {
        let a = PrivateKeySigner::random();
        let b = PrivateKeySigner::random();
        if a.address() < b.address() {
            (a, b)
        } else {
            (b, a)
        }
    }

    fn sign(signer: &PrivateKeySigner) -> SignatureBlob {
        let sig = signer.sign_hash_sync(&DIGEST).unwrap();
        SignatureBlob::new(sig.as_bytes().to_vec())
    }

    fn approved_hash(owner: Address) -> SignatureBlob {
        let mut bytes = B256::left_padding_from(owner.as_slice()).to_vec();
        bytes.extend_from_slice(&[0u8; 32]);
        bytes.push(1);
        SignatureBlob::new(bytes)
    }

    #[test]
    fn no_signatures() {
        assert!(matches!(
            aggregate(&[], SignatureOrdering::AsSupplied, DIGEST),
            Err(SafeError::NoSignatures)
        ));
    }

    #[test]
    fn concatenates_in_caller_order() {
        let s1 = SignatureBlob::new(vec![1u8; 65]);
        let s2 = SignatureBlob::new(vec![2u8; 65]);

        let forward = aggregate(&[s1.clone(), s2.clone()], SignatureOrdering::AsSupplied, DIGEST)
            .unwrap();
        let backward = aggregate(&[s2, s1], SignatureOrdering::AsSupplied, DIGEST).unwrap();

        assert_ne!(forward, backward);
        assert_eq!(forward.as_bytes()[..65], [1u8; 65]);
        assert_eq!(backward.as_bytes()[..65], [2u8; 65]);
        assert_eq!(forward.as_bytes().len(), 130);
    }

    #[test]
    fn recovers_ecdsa_owner() {
        let signer = PrivateKeySigner::random();
        assert_eq!(recover_owner(sign(&signer).as_bytes(), DIGEST).unwrap(), signer.address());
    }

    #[test]
    fn recovers_eth_sign_owner() {
        let signer = PrivateKeySigner::random();
        let mut bytes = signer.sign_message_sync(DIGEST.as_slice()).unwrap().as_bytes();
        bytes[64] += 4;

        assert_eq!(recover_owner(&bytes, DIGEST).unwrap(), signer.address());
    }

    #[test]
    fn approved_hash_owner_is_r() {
        let owner = address!("0x00000000000000000000000000000000000000aa");
        assert_eq!(recover_owner(approved_hash(owner).as_bytes(), DIGEST).unwrap(), owner);
    }

    #[test]
    fn ascending_owners_are_accepted() {
        let (low, high) = owners();

        let aggregated =
            aggregate(&[sign(&low), sign(&high)], SignatureOrdering::RequireAscending, DIGEST)
                .unwrap();
        assert_eq!(aggregated.as_bytes().len(), 2 * SIGNATURE_LENGTH);
    }

    #[test]
    fn descending_owners_are_rejected() {
        let (low, high) = owners();

        let blobs = [sign(&high), sign(&low)];
        let err = aggregate(&blobs, SignatureOrdering::RequireAscending, DIGEST).unwrap_err();
        assert!(matches!(
            err,
            SafeError::SignatureOrder { previous, next }
                if previous == high.address() && next == low.address()
        ));

        // the default ordering leaves this to the contract
        let blobs = [sign(&high), sign(&low)];
        assert!(aggregate(&blobs, SignatureOrdering::AsSupplied, DIGEST).is_ok());
    }

    #[test]
    fn duplicate_owner_is_rejected() {
        let signer = PrivateKeySigner::random();
        let blobs = [sign(&signer), sign(&signer)];
        let err = aggregate(&blobs, SignatureOrdering::RequireAscending, DIGEST).unwrap_err();
        assert!(matches!(err, SafeError::SignatureOrder { .. }));
    }

    #[test]
    fn malformed_signature_is_reported_by_index() {
        let signer = PrivateKeySigner::random();
        let blobs = [sign(&signer), SignatureBlob::new(vec![0u8; 10])];

        assert!(matches!(
            aggregate(&blobs, SignatureOrdering::RequireAscending, DIGEST),
            Err(SafeError::InvalidSignature { index: 1, .. })
        ));
    }

    #[test]
    fn parses_hex() {
        let blob: SignatureBlob = "0xdeadbeef".parse().unwrap();
        assert_eq!(blob.as_bytes(), &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(blob.to_string(), "0xdeadbeef");
        assert!("0xzz".parse::<SignatureBlob>().is_err());
    }
}
