use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use doccat_server::DuplicatePolicy;

#[derive(Parser)]
#[command(
    name = "doccat",
    about = "doccat: a file catalog with metadata search",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the catalog HTTP server
    Serve(ServeArgs),
    /// Check the search engine and storage root
    Check(ConfigSource),
    /// Print the effective configuration as TOML
    Config(ConfigSource),
}

/// Where to load configuration from; defaults apply when absent.
#[derive(Args, Default)]
pub struct ConfigSource {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub source: ConfigSource,
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Directory holding uploaded files
    #[arg(long)]
    pub root: Option<PathBuf>,
    #[arg(long)]
    pub search_url: Option<String>,
    #[arg(long)]
    pub index: Option<String>,
    /// `always` or `skip-existing`
    #[arg(long)]
    pub duplicate_policy: Option<DuplicatePolicy>,
}
