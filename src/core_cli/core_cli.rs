use clap::Parser;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "microftpd", about = "A small FTP server for constrained hosts.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "")]
    pub config: String,

    /// Directory served as "/" (overrides root_dir)
    #[arg(short, long)]
    pub root: Option<String>,

    /// Control port (overrides listen_port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Concurrent data transfers (overrides max_clients)
    #[arg(short, long)]
    pub max_clients: Option<usize>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the bcrypt hash of a password for the [users] table and exit
    #[arg(long, value_name = "PASSWORD")]
    pub hash_password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_are_optional() {
        let cli = Cli::parse_from(["microftpd"]);
        assert!(cli.config.is_empty());
        assert!(cli.root.is_none() && cli.port.is_none() && cli.max_clients.is_none());
        assert!(!cli.verbose);

        let cli = Cli::parse_from([
            "microftpd", "-c", "/tmp/ftp.toml", "--root", "/srv", "-p", "2121", "-m", "4", "-v",
        ]);
        assert_eq!(cli.config, "/tmp/ftp.toml");
        assert_eq!(cli.root.as_deref(), Some("/srv"));
        assert_eq!(cli.port, Some(2121));
        assert_eq!(cli.max_clients, Some(4));
        assert!(cli.verbose);
    }
}
