use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use clap::Args;
use safe_multisig::{NetworkOverrides, SafeError};
use zeroize::{Zeroize, ZeroizeOnDrop};

use std::{convert::Infallible, fmt, str::FromStr};

/// Relay contract addresses for chains without a known deployment.
#[derive(Debug, Clone, Default, Args)]
pub struct NetworkArgs {
    /// MultiSend contract to use instead of the canonical deployment.
    #[arg(long = "multi-send", value_name = "ADDRESS", env = "CUSTOM_MULTISEND_ADDRESS")]
    pub multi_send: Option<Address>,

    /// MultiSendCallOnly contract to use instead of the canonical deployment.
    #[arg(
        long = "multi-send-call-only",
        value_name = "ADDRESS",
        env = "CUSTOM_MULTISEND_CALLONLY_ADDRESS"
    )]
    pub multi_send_call_only: Option<Address>,
}

impl NetworkArgs {
    pub fn overrides(&self) -> NetworkOverrides {
        NetworkOverrides {
            multi_send: self.multi_send,
            multi_send_call_only: self.multi_send_call_only,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct SignerArgs {
    /// Local port the signing page is served on.
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
}

/// A hex encoded private key. Wiped from memory on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(String);

impl PrivateKey {
    pub fn signer(&self) -> Result<PrivateKeySigner, SafeError> {
        self.0.trim().parse().map_err(|e| {
            SafeError::InvalidCredential(format!("PRIVATE_KEY is not a valid key: {e}"))
        })
    }
}

impl FromStr for PrivateKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn parses_signer() {
        let key: PrivateKey = KEY.parse().unwrap();
        assert_eq!(
            key.signer().unwrap().address(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse::<Address>().unwrap()
        );
    }

    #[test]
    fn invalid_key() {
        let key: PrivateKey = "0x1234".parse().unwrap();
        assert!(matches!(key.signer(), Err(SafeError::InvalidCredential(_))));
    }

    #[test]
    fn debug_is_redacted() {
        let key: PrivateKey = KEY.parse().unwrap();
        assert!(!format!("{key:?}").contains("ac0974"));
    }
}
