use std::path::PathBuf;

use crate::prelude::*;
use clap::Parser;

mod config;
mod error;
mod input;
mod parse;
mod prelude;
mod rows;
mod tokens;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Infer terms and courses from the layout of academic transcripts"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Parser configuration file (TOML)
    #[clap(long, env = "TRANSCRIPT_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Whether to display additional information.
    #[clap(long, env = "TRANSCRIPT_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Parse a transcript into terms and courses (JSON)
    Parse(crate::parse::ParseOptions),

    /// Show grouped rows and how each one is classified
    Rows(crate::rows::RowsOptions),

    /// Convert the input into a JSON token dump
    Tokens(crate::tokens::TokensOptions),

    /// Print the effective parser configuration as TOML
    Config(crate::config::ConfigOptions),
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let app = App::parse();
    init_logging(app.global.verbose);

    match app.command {
        SubCommands::Parse(options) => crate::parse::run(options, app.global),
        SubCommands::Rows(options) => crate::rows::run(options, app.global),
        SubCommands::Tokens(options) => crate::tokens::run(options, app.global),
        SubCommands::Config(options) => crate::config::run(options, app.global),
    }
}
