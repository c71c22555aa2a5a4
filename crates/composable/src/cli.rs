//! CLI command structure using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use url::Url;

#[derive(Parser)]
#[command(name = "composable")]
#[command(version, about = "Convert HTML pages into composable component trees", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./composable.toml when present)
    #[arg(short, long, global = true, env = "COMPOSABLE_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a page and print the component tree
    Convert {
        #[command(flatten)]
        page: PageArgs,

        /// Component mapping JSON file
        #[arg(long)]
        mappings: Option<PathBuf>,

        /// Write the result to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Convert a page and save it under a timestamped file name
    Export {
        #[command(flatten)]
        page: PageArgs,

        /// Component mapping JSON file
        #[arg(long)]
        mappings: Option<PathBuf>,

        /// Target directory (overrides export.directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Print the CSS collected from a page
    Css {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Answer conversion requests read as JSON lines from stdin
    Bridge {
        #[command(flatten)]
        page: PageArgs,

        /// Save the session's last result to export.directory when stdin closes
        #[arg(long)]
        export_on_exit: bool,
    },
}

/// Where the page comes from
#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// HTML file to convert
    pub html: PathBuf,

    /// URL the page is served from (defaults to the file URL)
    #[arg(long)]
    pub url: Option<Url>,

    /// Directory serving same-origin stylesheets
    #[arg(long)]
    pub site_root: Option<PathBuf>,
}
