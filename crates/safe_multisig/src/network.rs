use alloy_primitives::Address;
use multisend::multi_send_deployment;
use tracing::debug;

use crate::error::{RelayContract, SafeError};

/// Where a resolved contract address came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressSource {
    /// Supplied by the operator.
    Override,
    /// Looked up in the built-in deployment registry.
    Registry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub address: Address,
    pub source: AddressSource,
}

/// Operator supplied relay contract addresses. Each one wins over the registry independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetworkOverrides {
    pub multi_send: Option<Address>,
    pub multi_send_call_only: Option<Address>,
}

/// The chain a Safe lives on plus the auxiliary contracts needed to batch calls on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkContext {
    pub chain_id: u64,
    pub multi_send: Option<ResolvedAddress>,
    pub multi_send_call_only: Option<ResolvedAddress>,
}

impl NetworkContext {
    /// Returns the address of `contract`, failing if neither the registry nor the operator
    /// provided one for this chain.
    pub fn relay(&self, contract: RelayContract) -> Result<Address, SafeError> {
        let resolved = match contract {
            RelayContract::MultiSend => self.multi_send,
            RelayContract::MultiSendCallOnly => self.multi_send_call_only,
        };

        resolved
            .map(|r| r.address)
            .ok_or(SafeError::UnresolvedNetworkContract { contract, chain_id: self.chain_id })
    }
}

/// Resolves the relay contracts for `chain_id`. Never fails: unknown addresses stay `None`.
pub fn resolve(chain_id: u64, overrides: NetworkOverrides) -> NetworkContext {
    let deployment = multi_send_deployment(chain_id);

    let pick = |custom: Option<Address>, registered: Option<Address>| match custom {
        Some(address) => Some(ResolvedAddress { address, source: AddressSource::Override }),
        None => registered.map(|address| ResolvedAddress { address, source: AddressSource::Registry }),
    };

    let context = NetworkContext {
        chain_id,
        multi_send: pick(overrides.multi_send, deployment.map(|d| d.multi_send)),
        multi_send_call_only: pick(
            overrides.multi_send_call_only,
            deployment.map(|d| d.multi_send_call_only),
        ),
    };
    debug!(?context, "resolved network context");

    context
}
