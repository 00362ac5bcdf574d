mod cli;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use safesign::utils::error_hint;

fn main() {
    if let Err(err) = Cli::parse().run() {
        eprintln!("Error: {err:?}");
        if let Some(hint) = error_hint(&err) {
            eprintln!("{}", hint.yellow());
        }
        std::process::exit(1);
    }
}
