use crate::config::Config;
use crate::core_admission::Admission;
use crate::core_auth::Credentials;
use crate::core_fs::Storage;
use crate::core_ftpcommand::handlers::{
    initialize_command_handlers, validate_command_handlers, CommandHandlers,
};
use crate::core_network::network;
use crate::helpers::log_config;
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

/// Process-wide state shared by every session: configuration, credentials,
/// the data-channel gate and the storage root.
#[derive(Debug)]
pub struct ServerState {
    pub config: Config,
    pub credentials: Option<Credentials>,
    pub admission: Admission,
    pub storage: Storage,
    stopped: AtomicBool,
    shutdown: broadcast::Sender<()>,
}

impl ServerState {
    pub fn new(config: Config) -> Self {
        let credentials = config.users.as_ref().map(Credentials::new);
        match &credentials {
            Some(table) if table.is_empty() => {
                warn!("Credential table is empty, every USER will be refused")
            }
            Some(table) => info!("Credential table loaded: {} user(s)", table.len()),
            None => info!("No credential table, authentication disabled"),
        }
        let admission = Admission::new(config.server.max_clients);
        let storage = Storage::new(&config.server.root_dir);
        let (shutdown, _) = broadcast::channel(1);
        Self {
            config,
            credentials,
            admission,
            storage,
            stopped: AtomicBool::new(false),
            shutdown,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Stops accepting, fails transfers waiting for a slot and tells every
    /// session to close once its current command is done.
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("Server stopping");
        self.admission.close();
        // No receiver just means no session is connected.
        let _ = self.shutdown.send(());
    }

    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown.subscribe()
    }
}

/// Stops a running server from another task.
#[derive(Debug, Clone)]
pub struct ServerHandle {
    state: Arc<ServerState>,
}

impl ServerHandle {
    pub fn shutdown(&self) {
        self.state.stop();
    }
}

pub struct Server {
    listener: TcpListener,
    state: Arc<ServerState>,
    handlers: Arc<CommandHandlers>,
}

impl Server {
    /// Validates the configuration and the command table, then binds the
    /// control port.
    pub async fn bind(config: Config) -> Result<Self> {
        config.validate()?;
        let handlers = initialize_command_handlers();
        validate_command_handlers(&handlers)?;

        let addr = SocketAddr::new(config.bind_ip()?, config.server.listen_port);
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind control port {}", addr))?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            state: Arc::new(ServerState::new(config)),
            handlers: Arc::new(handlers),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            state: self.state(),
        }
    }

    /// Accepts control connections until stopped, one task per connection.
    pub async fn run(self) -> Result<()> {
        let mut shutdown = self.state.subscribe_shutdown();
        loop {
            if self.state.is_stopped() {
                break;
            }
            let (socket, addr) = tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                        continue;
                    }
                },
                _ = shutdown.recv() => break,
            };
            info!("New connection from {}", addr);

            let state = Arc::clone(&self.state);
            let handlers = Arc::clone(&self.handlers);
            tokio::spawn(async move {
                if let Err(e) = network::handle_connection(socket, state, handlers).await {
                    debug!("Connection error for {}: {}", addr, e);
                }
                info!("Connection closed for {}", addr);
            });
        }
        info!("Server stopped accepting connections");
        Ok(())
    }
}

/// Runs the FTP server with the provided configuration until Ctrl-C.
pub async fn run(config: Config) -> Result<()> {
    log_config(&config);
    let server = Server::bind(config).await?;
    let handle = server.handle();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received");
                handle.shutdown();
            }
            Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    server.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_for(root: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.server.bind_ip = "127.0.0.1".into();
        config.server.listen_port = 0;
        config.server.root_dir = root.to_string_lossy().to_string();
        config
    }

    #[test]
    fn stop_is_idempotent_and_closes_admission() {
        let root = tempfile::tempdir().unwrap();
        let state = ServerState::new(config_for(root.path()));
        let mut rx = state.subscribe_shutdown();
        assert!(!state.is_stopped());

        state.stop();
        state.stop();
        assert!(state.is_stopped());
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn credentials_follow_users_table() {
        let root = tempfile::tempdir().unwrap();
        let state = ServerState::new(config_for(root.path()));
        assert!(state.credentials.is_none());

        let mut config = config_for(root.path());
        config.users = Some([("Alice".to_string(), "pw".to_string())].into());
        let state = ServerState::new(config);
        let credentials = state.credentials.as_ref().unwrap();
        assert!(credentials.has_user("alice"));
        assert_eq!(credentials.len(), 1);

        let mut config = config_for(root.path());
        config.users = Some(HashMap::new());
        let state = ServerState::new(config);
        assert!(state.credentials.as_ref().unwrap().is_empty());
    }

    #[tokio::test]
    async fn bind_rejects_invalid_config() {
        let mut config = Config::default();
        config.server.root_dir = "/definitely/not/here/microftpd".into();
        assert!(Server::bind(config).await.is_err());
    }

    #[tokio::test]
    async fn run_returns_after_shutdown() {
        let root = tempfile::tempdir().unwrap();
        let server = Server::bind(config_for(root.path())).await.unwrap();
        assert_ne!(server.local_addr().unwrap().port(), 0);
        let handle = server.handle();
        let task = tokio::spawn(server.run());

        handle.shutdown();
        task.await.unwrap().unwrap();
    }
}
