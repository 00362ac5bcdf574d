use alloy_primitives::{Address, Bytes, U256};
use clap::Parser;
use colored::Colorize;
use safe_multisig::{InteractiveSigner, RawTransaction, SignerResponse, SigningRequest};
use safesign_cli_runner::CliContext;

use crate::{browser::BrowserSigner, common::SignerArgs, utils::etherscan_tx_url};

#[derive(Debug, Parser)]
pub struct SendRawCommand {
    #[arg(value_name = "CHAIN_ID", help = "Chain the wallet should send on.")]
    chain_id: u64,

    #[arg(value_name = "TO", help = "Recipient of the transaction.")]
    to: Address,

    #[arg(value_name = "VALUE", help = "Amount of wei to send.")]
    value: U256,

    #[arg(value_name = "DATA", help = "Hex encoded calldata, 0x for none.")]
    data: Bytes,

    #[clap(flatten)]
    signer: SignerArgs,
}

impl SendRawCommand {
    pub async fn execute(self, ctx: CliContext) -> eyre::Result<()> {
        let Self { chain_id, to, value, data, signer } = self;

        let request = SigningRequest::SendTransaction(RawTransaction { chain_id, to, value, data });
        let browser = BrowserSigner::new(signer.port, ctx.cancellation());

        match browser.request(request).await? {
            SignerResponse::TransactionHash(tx_hash) => {
                println!("{}{:#x}", "tx hash: ".bright_cyan(), tx_hash);
                if let Some(url) = etherscan_tx_url(chain_id, tx_hash) {
                    println!("{}{}", "Etherscan link: ".bright_cyan(), url);
                }
                Ok(())
            }
            SignerResponse::Signature(_) => eyre::bail!("Wallet returned a signature, not a hash"),
        }
    }
}
