use alloy_chains::NamedChain;
use alloy_primitives::{address, Address};

/// Canonical Safe v1.3.0 `MultiSend` deployment.
pub const MULTI_SEND_V130: Address = address!("0xA238CBeb142c10Ef7Ad8442C6D1f9E89e07e7761");

/// Canonical Safe v1.3.0 `MultiSendCallOnly` deployment.
pub const MULTI_SEND_CALL_ONLY_V130: Address =
    address!("0x40A2aCCbd92BCA938b02010E17A5b8929b49130D");

/// The pair of batch relay contracts a Safe can delegate into on a given chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiSendDeployment {
    pub multi_send: Address,
    pub multi_send_call_only: Address,
}

const CANONICAL_V130: MultiSendDeployment = MultiSendDeployment {
    multi_send: MULTI_SEND_V130,
    multi_send_call_only: MULTI_SEND_CALL_ONLY_V130,
};

/// Chains where the canonical v1.3.0 deployments are known to exist.
pub const SUPPORTED_CHAINS: &[NamedChain] = &[
    NamedChain::Mainnet,
    NamedChain::Optimism,
    NamedChain::BinanceSmartChain,
    NamedChain::Gnosis,
    NamedChain::Polygon,
    NamedChain::Base,
    NamedChain::Arbitrum,
    NamedChain::ArbitrumNova,
    NamedChain::Avalanche,
    NamedChain::Sepolia,
    NamedChain::Holesky,
    NamedChain::ArbitrumSepolia,
    NamedChain::BaseSepolia,
    NamedChain::OptimismSepolia,
];

/// Looks up the registered MultiSend deployment for `chain_id`.
///
/// Returns `None` for chains that are not in the registry; callers are expected to fall back
/// to operator supplied addresses.
pub fn multi_send_deployment(chain_id: u64) -> Option<MultiSendDeployment> {
    let chain = NamedChain::try_from(chain_id).ok()?;
    SUPPORTED_CHAINS.contains(&chain).then_some(CANONICAL_V130)
}
