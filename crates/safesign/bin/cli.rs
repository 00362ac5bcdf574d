use clap::{
    builder::{styling::AnsiColor, Styles},
    ArgAction, Parser, Subcommand,
};
use safesign::cmd::{execute::ExecuteCommand, send_raw::SendRawCommand, sign::SignCommand};
use safesign_cli_runner::CliRunner;
use safesign_version::{version_with_platform, SHORT_VERSION};
use tracing_subscriber::EnvFilter;

/// The verbosity level.
pub type Verbosity = u8;

#[derive(Debug, Parser)]
#[command(
    name = "safesign",
    about = "Sign and execute batched Safe transactions from the command line.",
    author = "Hyve <support@thehyve.xyz>",
    version = SHORT_VERSION.as_str(),
    term_width = 80,
    styles = get_color_style()
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable debug logging")]
    pub debug: bool,

    /// Verbosity level of the log messages.
    ///
    /// Pass multiple times to increase the verbosity (e.g. -v, -vv, -vvv).
    /// `RUST_LOG` takes precedence when set.
    #[arg(help_heading = "Display options", global = true, short, long, verbatim_doc_comment, action = ArgAction::Count)]
    verbosity: Verbosity,
}

impl Cli {
    pub fn run(self) -> eyre::Result<()> {
        self.init_tracing();

        let runner = CliRunner::default();
        match self.command {
            Commands::Sign(sign) => runner.run_command_until_exit(|ctx| sign.execute(ctx)),
            Commands::Execute(execute) => {
                runner.run_command_until_exit(|ctx| execute.execute(ctx))
            }
            Commands::SendRaw(send_raw) => {
                runner.run_command_until_exit(|ctx| send_raw.execute(ctx))
            }
        }
    }

    fn init_tracing(&self) {
        let level = match (self.debug, self.verbosity) {
            (true, _) | (_, 2) => "debug",
            (_, 0) => "warn",
            (_, 1) => "info",
            _ => "trace",
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
        tracing::debug!(version = %version_with_platform(), "starting safesign");
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the Safe transaction for a batch and sign it with a browser wallet.
    #[command(name = "sign")]
    Sign(SignCommand),

    /// Execute a batch with collected owner signatures.
    #[command(name = "execute")]
    Execute(ExecuteCommand),

    /// Send a plain transaction through a browser wallet.
    #[command(name = "send-raw")]
    SendRaw(SendRawCommand),
}

fn get_color_style() -> Styles {
    Styles::styled()
        .usage(AnsiColor::Green.on_default().bold().underline())
        .header(AnsiColor::Yellow.on_default().bold().underline())
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}
