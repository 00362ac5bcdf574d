//! Building, signing and executing batched Safe transactions.

pub mod batch;
pub mod builder;
pub mod calls;
pub mod client;
pub mod error;
pub mod executor;
pub mod network;
pub mod rpc;
pub mod signatures;
pub mod signer;
pub mod transaction_data;
pub mod typed_data;

mod contracts;
mod utils;

pub use batch::{load_batch, validate};
pub use builder::{build, signing_payload};
pub use client::SafeClient;
pub use error::{InvalidBatch, RelayContract, SafeError};
pub use executor::Executor;
pub use network::{resolve, NetworkContext, NetworkOverrides};
pub use rpc::{RpcClient, SafeRpc};
pub use signatures::{aggregate, SignatureBlob, SignatureOrdering};
pub use signer::{InteractiveSigner, RawTransaction, SignerResponse, SigningRequest};
pub use transaction_data::{Batch, OperationType, SafeTransactionData, SubTransaction};
pub use typed_data::SigningPayload;
