use std::{
    fs,
    future::Future,
    io::Write,
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use alloy_chains::Chain;
use alloy_primitives::TxHash;
use eyre::WrapErr;
use safe_multisig::{RelayContract, SafeError};
use serde::Serialize;

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Runs a loading animation until a future completes.
pub async fn print_loading_until_async<F, T>(message: &str, future: F) -> T
where
    F: Future<Output = T>,
{
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    let message = message.to_string();

    let animation = std::thread::spawn(move || {
        let mut stdout = std::io::stdout();
        let mut i = 0;
        while running_clone.load(Ordering::Relaxed) {
            let _ = write!(stdout, "\r{} {} ", message, SPINNER[i]);
            let _ = stdout.flush();
            i = (i + 1) % SPINNER.len();
            std::thread::sleep(Duration::from_millis(100));
        }

        // Clear the line when done
        let _ = write!(stdout, "\r{}\r", " ".repeat(message.chars().count() + 2));
        let _ = stdout.flush();
    });

    let result = future.await;

    running.store(false, Ordering::Relaxed);
    let _ = animation.join();

    result
}

/// Block explorer link for `tx_hash`, if the chain has a known explorer.
pub fn etherscan_tx_url(chain_id: u64, tx_hash: TxHash) -> Option<String> {
    let (_, base) = Chain::from_id(chain_id).etherscan_urls()?;
    Some(format!("{}/tx/{tx_hash:#x}", base.trim_end_matches('/')))
}

/// Writes `contents` to `path` as pretty printed JSON, replacing an existing file.
pub fn write_to_json_file<P: AsRef<Path>, S: Serialize>(
    path: P,
    contents: &S,
) -> eyre::Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(contents)?;
    fs::write(path, json).wrap_err_with(|| format!("Failed to write {}", path.display()))
}

/// What the operator can do about `err`, for the errors where that is not obvious.
pub fn error_hint(err: &eyre::Report) -> Option<String> {
    let hint = match err.downcast_ref::<SafeError>()? {
        SafeError::UnresolvedNetworkContract { contract, chain_id } => {
            let (var, flag) = match contract {
                RelayContract::MultiSend => ("CUSTOM_MULTISEND_ADDRESS", "--multi-send"),
                RelayContract::MultiSendCallOnly => {
                    ("CUSTOM_MULTISEND_CALLONLY_ADDRESS", "--multi-send-call-only")
                }
            };
            format!(
                "No {contract} deployment is known for chain {chain_id}. Set {var} or pass {flag}."
            )
        }
        SafeError::MissingCredential(var) => {
            format!("Export {var} with the key of the account paying for execution.")
        }
        SafeError::StaleNonce { .. } => {
            "Another Safe transaction was executed in the meantime. Sign the batch again.".into()
        }
        SafeError::SignatureOrder { .. } => {
            "Pass the signatures sorted by owner address, lowest first.".into()
        }
        SafeError::InvalidBatch(_) => {
            "Expected a JSON array of { \"to\", \"value\", \"data\", \"operation\" } objects.".into()
        }
        _ => return None,
    };
    Some(hint)
}

#[cfg(test)]
mod test {
    use super::*;
    use alloy_primitives::b256;

    #[test]
    fn explorer_links() {
        let hash = b256!("0x00000000000000000000000000000000000000000000000000000000000000ff");

        assert_eq!(
            etherscan_tx_url(1, hash).unwrap(),
            format!("https://etherscan.io/tx/{hash:#x}")
        );
        assert!(etherscan_tx_url(11155111, hash).unwrap().contains("sepolia"));
        assert_eq!(etherscan_tx_url(31337, hash), None);
    }

    #[test]
    fn hints_match_error_kind() {
        let err = eyre::Report::new(SafeError::UnresolvedNetworkContract {
            contract: RelayContract::MultiSendCallOnly,
            chain_id: 31337,
        });
        assert!(error_hint(&err).unwrap().contains("CUSTOM_MULTISEND_CALLONLY_ADDRESS"));

        let err = eyre::Report::new(SafeError::UnresolvedNetworkContract {
            contract: RelayContract::MultiSend,
            chain_id: 31337,
        });
        let hint = error_hint(&err).unwrap();
        assert!(hint.contains("CUSTOM_MULTISEND_ADDRESS"));
        assert!(!hint.contains("CALLONLY"));

        let err = eyre::Report::new(SafeError::MissingCredential("PRIVATE_KEY"));
        assert!(error_hint(&err).unwrap().contains("PRIVATE_KEY"));

        assert_eq!(error_hint(&eyre::eyre!("something else")), None);
        assert_eq!(error_hint(&eyre::Report::new(SafeError::NoSignatures)), None);
    }

    #[test]
    fn writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.json");

        write_to_json_file(&path, &serde_json::json!({ "primaryType": "SafeTx" })).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["primaryType"], "SafeTx");
    }

    #[tokio::test]
    async fn spinner_returns_future_output() {
        assert_eq!(print_loading_until_async("Working", async { 7 }).await, 7);
    }
}
