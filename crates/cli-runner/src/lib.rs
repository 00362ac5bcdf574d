//! Entrypoint for running commands.

use std::{future::Future, time::Duration};

use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// How long a command gets to wind down after the operator interrupted it.
const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Executes CLI commands.
///
/// Provides utilities for running a cli command to completion.
#[derive(Debug)]
pub struct CliRunner {
    tokio_runtime: Runtime,
}

impl CliRunner {
    /// Creates a new runner on top of an existing tokio runtime.
    pub fn from_runtime(tokio_runtime: Runtime) -> Self {
        Self { tokio_runtime }
    }

    /// Executes the given _async_ command on the tokio runtime until the command future resolves
    /// or until the process receives a `SIGINT`.
    ///
    /// On `SIGINT` the command's [`CliContext`] is cancelled and the command is given
    /// [`GRACEFUL_SHUTDOWN_TIMEOUT`] to return on its own.
    pub fn run_command_until_exit<F>(
        self,
        command: impl FnOnce(CliContext) -> F,
    ) -> eyre::Result<()>
    where
        F: Future<Output = eyre::Result<()>>,
    {
        let cancel = CancellationToken::new();
        let context = CliContext { cancel: cancel.clone() };

        let result = self.tokio_runtime.block_on(run_until_ctrl_c(command(context), cancel));

        debug!(target: "safesign::cli", "command finished, shutting down runtime");
        self.tokio_runtime.shutdown_timeout(GRACEFUL_SHUTDOWN_TIMEOUT);

        result
    }
}

impl Default for CliRunner {
    fn default() -> Self {
        Self::from_runtime(tokio_runtime().expect("failed to build tokio runtime"))
    }
}

/// Additional context provided by the [`CliRunner`] when executing commands.
#[derive(Debug, Clone)]
pub struct CliContext {
    cancel: CancellationToken,
}

impl CliContext {
    /// A token that is cancelled once the operator interrupts the process.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

/// Creates a new default tokio multi-thread [Runtime] with all features enabled.
pub fn tokio_runtime() -> Result<Runtime, std::io::Error> {
    tokio::runtime::Builder::new_multi_thread().enable_all().build()
}

async fn run_until_ctrl_c<F>(fut: F, cancel: CancellationToken) -> eyre::Result<()>
where
    F: Future<Output = eyre::Result<()>>,
{
    tokio::pin!(fut);

    tokio::select! {
        res = &mut fut => res,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            debug!(target: "safesign::cli", "received ctrl-c");
            cancel.cancel();

            match tokio::time::timeout(GRACEFUL_SHUTDOWN_TIMEOUT, fut).await {
                Ok(res) => res,
                Err(_) => {
                    warn!(target: "safesign::cli", "command did not stop in time, exiting");
                    Ok(())
                }
            }
        }
    }
}
