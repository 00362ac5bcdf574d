use std::path::PathBuf;

use alloy_primitives::{Address, U256};
use clap::Parser;
use colored::Colorize;
use safe_multisig::{
    load_batch, signing_payload, InteractiveSigner, RpcClient, SafeClient, SafeError,
    SignerResponse, SigningRequest,
};
use safesign_cli_runner::CliContext;
use url::Url;

use crate::{
    browser::BrowserSigner,
    common::{NetworkArgs, SignerArgs},
    utils::{print_loading_until_async, write_to_json_file},
};

#[derive(Debug, Parser)]
pub struct SignCommand {
    #[arg(value_name = "BATCH_FILE", help = "JSON file listing the transactions to batch.")]
    batch_file: PathBuf,

    #[arg(value_name = "SAFE_ADDRESS", help = "The Safe executing the batch.")]
    safe: Address,

    #[arg(value_name = "RPC_URL", help = "RPC endpoint of the Safe's chain.")]
    rpc_url: Url,

    /// Also write the typed data to sign to this file.
    #[arg(long, value_name = "FILE")]
    payload_out: Option<PathBuf>,

    #[clap(flatten)]
    signer: SignerArgs,

    /// Nonce to sign for, e.g. to queue behind pending transactions. Defaults to the current one.
    #[arg(long, value_name = "NONCE")]
    nonce: Option<u64>,

    #[clap(flatten)]
    network: NetworkArgs,
}

impl SignCommand {
    pub async fn execute(self, ctx: CliContext) -> eyre::Result<()> {
        let Self { batch_file, safe, rpc_url, payload_out, signer, nonce, network } = self;

        let batch = load_batch(&batch_file).map_err(SafeError::from)?;

        let client = print_loading_until_async(
            "Reading Safe state",
            SafeClient::init(RpcClient::connect(rpc_url), safe, network.overrides()),
        )
        .await?;
        let tx = match nonce {
            Some(nonce) => client.create_transaction_at(&batch, U256::from(nonce))?,
            None => client.create_transaction(&batch).await?,
        };
        let payload = signing_payload(&tx);

        println!("{}{}", "Safe transaction hash: ".bright_cyan(), payload.digest());
        println!("{}{}", "Nonce: ".bright_cyan(), tx.nonce());

        if let Some(path) = payload_out {
            write_to_json_file(&path, &payload.typed_data())?;
            println!("{}{}", "Typed data written to ".bright_cyan(), path.display());
        }

        let browser = BrowserSigner::new(signer.port, ctx.cancellation());
        match browser.request(SigningRequest::TypedData(payload)).await? {
            SignerResponse::Signature(signature) => {
                println!("{}{}", "Signature: ".bright_cyan(), signature);
                Ok(())
            }
            SignerResponse::TransactionHash(hash) => {
                eyre::bail!("Wallet sent transaction {hash} instead of signing")
            }
        }
    }
}
