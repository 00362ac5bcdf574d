use alloy_network::{EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::SolCall;
use alloy_transport::{RpcError, TransportError};
use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, trace};
use url::Url;

use std::{fmt, time::Duration};

use crate::{calls, contracts::ISafe, error::SafeError, transaction_data::ExecutionReceipt};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// The chain reads and writes needed to execute a Safe transaction.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait SafeRpc: Send + Sync {
    async fn chain_id(&self) -> Result<u64, SafeError>;

    /// Current nonce of `safe`.
    async fn nonce(&self, safe: Address) -> Result<U256, SafeError>;

    /// Sends a transaction from the operator account. Returns once the node accepted it.
    async fn submit(&self, to: Address, input: Bytes) -> Result<TxHash, SafeError>;

    /// Waits until `tx_hash` is mined with the configured number of confirmations.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<ExecutionReceipt, SafeError>;
}

/// [`SafeRpc`] over a JSON-RPC endpoint.
#[derive(Clone)]
pub struct RpcClient {
    provider: DynProvider,
    confirmations: u64,
    poll_interval: Duration,
    timeout: Option<Duration>,
}

impl RpcClient {
    /// Read-only client. [`SafeRpc::submit`] fails without a signer.
    pub fn connect(url: Url) -> Self {
        Self::from_provider(ProviderBuilder::new().connect_http(url).erased())
    }

    pub fn connect_with_signer(url: Url, signer: PrivateKeySigner) -> Self {
        debug!(sender = %signer.address(), "using operator account");
        let provider =
            ProviderBuilder::new().wallet(EthereumWallet::from(signer)).connect_http(url).erased();
        Self::from_provider(provider)
    }

    fn from_provider(provider: DynProvider) -> Self {
        Self { provider, confirmations: 1, poll_interval: DEFAULT_POLL_INTERVAL, timeout: None }
    }

    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations.max(1);
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Upper bound for [`SafeRpc::wait_for_receipt`]. Waits indefinitely when `None`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn poll_receipt(&self, tx_hash: TxHash) -> Result<ExecutionReceipt, SafeError> {
        let receipt = loop {
            match self.provider.get_transaction_receipt(tx_hash).await.map_err(read_error)? {
                Some(receipt) => break receipt,
                None => {
                    trace!(%tx_hash, "transaction not mined yet");
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        };

        let block_number = ReceiptResponse::block_number(&receipt);
        if let Some(mined_at) = block_number {
            let target = mined_at + self.confirmations - 1;
            while self.provider.get_block_number().await.map_err(read_error)? < target {
                trace!(%tx_hash, target, "waiting for confirmations");
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        Ok(ExecutionReceipt { tx_hash, block_number, success: ReceiptResponse::status(&receipt) })
    }
}

impl fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcClient")
            .field("confirmations", &self.confirmations)
            .field("poll_interval", &self.poll_interval)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SafeRpc for RpcClient {
    async fn chain_id(&self) -> Result<u64, SafeError> {
        self.provider.get_chain_id().await.map_err(read_error)
    }

    async fn nonce(&self, safe: Address) -> Result<U256, SafeError> {
        let tx = TransactionRequest::default().with_to(safe).with_input(calls::nonce());
        let output = self.provider.call(tx).await.map_err(read_error)?;

        ISafe::nonceCall::abi_decode_returns(&output)
            .map_err(|e| SafeError::UnexpectedResponse { contract: safe, reason: e.to_string() })
    }

    async fn submit(&self, to: Address, input: Bytes) -> Result<TxHash, SafeError> {
        let tx = TransactionRequest::default().with_to(to).with_input(input);
        let pending = self.provider.send_transaction(tx).await.map_err(submit_error)?;

        Ok(*pending.tx_hash())
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<ExecutionReceipt, SafeError> {
        let started = Instant::now();
        let receipt = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.poll_receipt(tx_hash))
                .await
                .map_err(|_| {
                    SafeError::NetworkConnectivity(format!(
                        "no receipt for {tx_hash} after {}s",
                        timeout.as_secs()
                    ))
                })??,
            None => self.poll_receipt(tx_hash).await?,
        };
        debug!(%tx_hash, elapsed = ?started.elapsed(), "received receipt");

        Ok(receipt)
    }
}

/// Error responses to reads (rate limits, bad API keys, ...) are an unusable endpoint, not a
/// rejected execution.
fn read_error(err: TransportError) -> SafeError {
    SafeError::NetworkConnectivity(err.to_string())
}

/// A node rejecting the execution carries a reason worth showing verbatim.
fn submit_error(err: TransportError) -> SafeError {
    match err {
        RpcError::ErrorResp(payload) => SafeError::Execution(payload.message.to_string()),
        other => read_error(other),
    }
}
