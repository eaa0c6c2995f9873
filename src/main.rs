use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use microftpd::config::Config;
use microftpd::constants::DEFAULT_CONFIG_PATH;
use microftpd::core_auth::helper::hash_password;
use microftpd::core_cli::Cli;
use microftpd::core_log::logger::init_logger;
use microftpd::server;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    if let Some(password) = args.hash_password.as_deref() {
        let hash = hash_password(password).context("Failed to hash password")?;
        println!("{}", hash);
        return Ok(());
    }

    init_logger(args.verbose);

    let mut config = load_config(&args.config)?;

    // Command-line overrides
    if let Some(root) = args.root {
        config.server.root_dir = root;
    }
    if let Some(port) = args.port {
        config.server.listen_port = port;
    }
    if let Some(max_clients) = args.max_clients {
        config.server.max_clients = max_clients;
    }

    info!("Starting microftpd {}", env!("CARGO_PKG_VERSION"));
    server::run(config).await
}

/// An explicit `--config` must exist; the default path is optional.
fn load_config(path: &str) -> Result<Config> {
    if !path.is_empty() {
        return Config::load_from_file(path);
    }
    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        Config::load_from_file(DEFAULT_CONFIG_PATH)
    } else {
        warn!(
            "No configuration file at {}, using built-in defaults",
            DEFAULT_CONFIG_PATH
        );
        Ok(Config::default())
    }
}
