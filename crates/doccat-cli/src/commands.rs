use colored::Colorize;
use doccat_index::OpenSearchIndex;
use doccat_server::{CatalogServer, ServerConfig};

use crate::cli::{Cli, Command, ConfigSource, ServeArgs};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Check(source) => cmd_check(source),
        Command::Config(source) => cmd_config(source),
    }
}

fn load_config(source: &ConfigSource) -> anyhow::Result<ServerConfig> {
    match &source.config {
        Some(path) => Ok(ServerConfig::load(path)?),
        None => Ok(ServerConfig::default()),
    }
}

fn apply_overrides(mut config: ServerConfig, args: ServeArgs) -> ServerConfig {
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(root) = args.root {
        config.storage_root = root;
    }
    if let Some(url) = args.search_url {
        config.search.url = url;
    }
    if let Some(index) = args.index {
        config.search.index_name = index;
    }
    if let Some(policy) = args.duplicate_policy {
        config.duplicate_policy = policy;
    }
    config
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = load_config(&args.source)?;
    let config = apply_overrides(config, args);
    println!(
        "doccat server on {} (root: {}, search: {})",
        config.bind_addr.to_string().bold(),
        config.storage_root.display(),
        config.search.url.cyan()
    );
    let server = CatalogServer::new(config)?;
    runtime()?.block_on(server.serve())?;
    println!("{} Server stopped.", "✓".green());
    Ok(())
}

fn cmd_check(source: ConfigSource) -> anyhow::Result<()> {
    let config = load_config(&source)?;
    let mut healthy = true;

    let root = &config.storage_root;
    if root.is_dir() {
        println!("{} Storage root {}", "✓".green().bold(), root.display());
    } else if root.exists() {
        healthy = false;
        println!("{} Storage root {} is not a directory", "✗".red().bold(), root.display());
    } else {
        println!(
            "{} Storage root {} does not exist yet (created on serve)",
            "!".yellow().bold(),
            root.display()
        );
    }

    let index = OpenSearchIndex::new(&config.search)?;
    match runtime()?.block_on(index.ping()) {
        Ok(info) => println!(
            "{} Search engine {} ({} {}, cluster {})",
            "✓".green().bold(),
            config.search.url.cyan(),
            info.distribution,
            info.version,
            info.cluster_name.bold()
        ),
        Err(e) => {
            healthy = false;
            println!("{} Search engine {}: {e}", "✗".red().bold(), config.search.url.cyan());
        }
    }
    println!("  Index: {}", config.search.index_name.yellow());

    if !healthy {
        anyhow::bail!("health check failed");
    }
    Ok(())
}

fn cmd_config(source: ConfigSource) -> anyhow::Result<()> {
    let config = load_config(&source)?;
    print!("{}", config.to_toml()?);
    Ok(())
}
