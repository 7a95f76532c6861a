//! Entry point for the `weftpack` binary.

use clap::Parser;
use weftpack_cli::{cli, commands, error, logger};

#[tokio::main]
async fn main() -> miette::Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);

    let result = match args.command {
        cli::Command::Build(build_args) => commands::build_execute(build_args).await,
    };

    result.map_err(error::cli_error_to_miette)
}
