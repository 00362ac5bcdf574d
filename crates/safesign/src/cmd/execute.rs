use std::{path::PathBuf, time::Duration};

use alloy_primitives::{Address, U256};
use clap::Parser;
use colored::Colorize;
use safe_multisig::{
    load_batch, RpcClient, SafeClient, SafeError, SignatureBlob, SignatureOrdering,
};
use safesign_cli_runner::CliContext;
use tracing::debug;
use url::Url;

use crate::{
    common::{NetworkArgs, PrivateKey},
    utils::{etherscan_tx_url, print_loading_until_async},
};

#[derive(Debug, Parser)]
pub struct ExecuteCommand {
    #[arg(value_name = "BATCH_FILE", help = "JSON file listing the transactions to batch.")]
    batch_file: PathBuf,

    #[arg(value_name = "SAFE_ADDRESS", help = "The Safe executing the batch.")]
    safe: Address,

    #[arg(value_name = "RPC_URL", help = "RPC endpoint of the Safe's chain.")]
    rpc_url: Url,

    /// Owner signatures, concatenated in the order given.
    #[arg(value_name = "SIGNATURE")]
    signatures: Vec<SignatureBlob>,

    /// Key of the account sending the execution transaction.
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<PrivateKey>,

    /// Fail unless the signatures are sorted by ascending owner address.
    #[arg(long)]
    require_ascending_order: bool,

    /// The number of confirmations until the receipt is fetched.
    #[arg(long, default_value = "1")]
    confirmations: u64,

    /// Timeout in seconds for the transaction to be mined.
    #[arg(long, env = "ETH_TIMEOUT")]
    timeout: Option<u64>,

    /// Nonce the owners signed for. Defaults to the Safe's current nonce.
    #[arg(long, value_name = "NONCE")]
    nonce: Option<u64>,

    #[clap(flatten)]
    network: NetworkArgs,
}

impl ExecuteCommand {
    pub async fn execute(self, _ctx: CliContext) -> eyre::Result<()> {
        let Self {
            batch_file,
            safe,
            rpc_url,
            signatures,
            private_key,
            require_ascending_order,
            confirmations,
            timeout,
            nonce,
            network,
        } = self;

        let operator = private_key.ok_or(SafeError::MissingCredential("PRIVATE_KEY"))?.signer()?;
        debug!(operator = %operator.address(), "loaded operator key");

        let batch = load_batch(&batch_file).map_err(SafeError::from)?;
        if signatures.is_empty() {
            return Err(SafeError::NoSignatures.into());
        }

        let ordering = match require_ascending_order {
            true => SignatureOrdering::RequireAscending,
            false => SignatureOrdering::AsSupplied,
        };
        let rpc = RpcClient::connect_with_signer(rpc_url, operator)
            .with_confirmations(confirmations)
            .with_timeout(timeout.map(Duration::from_secs));

        let client = print_loading_until_async(
            "Reading Safe state",
            SafeClient::init(rpc, safe, network.overrides()),
        )
        .await?;
        let chain_id = client.network().chain_id;
        let tx = match nonce {
            Some(nonce) => client.create_transaction_at(&batch, U256::from(nonce))?,
            None => client.create_transaction(&batch).await?,
        };

        let executor = client.into_executor(ordering);
        let pending = executor.submit(&tx, &signatures).await?;

        println!("{}{:#x}", "tx hash: ".bright_cyan(), pending.tx_hash);
        if let Some(url) = etherscan_tx_url(chain_id, pending.tx_hash) {
            println!("{}{}", "Etherscan link: ".bright_cyan(), url);
        }

        let receipt = print_loading_until_async(
            &format!("Waiting for {confirmations} confirmation(s)"),
            executor.confirm(&pending),
        )
        .await?;
        debug!(block = ?receipt.block_number, "execution mined");

        println!("{}", "Transaction executed successfully".bright_cyan());
        Ok(())
    }
}
