mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use context::Context;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries JSON only
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = Context::new(cli.config.as_deref()).and_then(|ctx| match &cli.command {
        Commands::Convert {
            page,
            mappings,
            out,
            pretty,
        } => commands::convert::run(&ctx, page, mappings.as_deref(), out.as_deref(), *pretty),
        Commands::Export {
            page,
            mappings,
            dir,
        } => commands::export::run(&ctx, page, mappings.as_deref(), dir.as_deref()),
        Commands::Css { page } => commands::css::run(page),
        Commands::Bridge {
            page,
            export_on_exit,
        } => commands::bridge::run(&ctx, page, *export_on_exit),
    });

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
