use crate::core_error::FtpError;
use crate::core_path::resolver::{is_normalized, resolve};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type SharedSession = Arc<Mutex<Session>>;

/// Transfer mode; stream is the only one supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Stream,
}

/// Per-connection state. Owned by the task serving one control connection.
#[derive(Debug)]
pub struct Session {
    pub peer_addr: SocketAddr,
    pub is_authenticated: bool,
    pub pending_user: Option<String>, // Set by USER, consumed by PASS
    pub binary: bool,                 // Representation type, TYPE I
    pub mode: TransferMode,
    current_dir: String,
    pub rename_from: Option<String>, // Staged by RNFR, consumed by RNTO
    pub data_addr: Option<SocketAddr>, // Set by PORT
}

impl Session {
    pub fn new(peer_addr: SocketAddr) -> Self {
        Self {
            peer_addr,
            is_authenticated: false,
            pending_user: None,
            binary: true,
            mode: TransferMode::Stream,
            current_dir: String::from("/"),
            rename_from: None,
            data_addr: None,
        }
    }

    pub fn shared(peer_addr: SocketAddr) -> SharedSession {
        Arc::new(Mutex::new(Self::new(peer_addr)))
    }

    /// Guard for commands that need a logged-in user.
    pub fn require_login(&self) -> Result<(), FtpError> {
        if self.is_authenticated {
            Ok(())
        } else {
            Err(FtpError::NotLoggedIn)
        }
    }

    pub fn current_dir(&self) -> &str {
        &self.current_dir
    }

    /// Resolves a command argument against this session's directory.
    pub fn resolve(&self, arg: Option<&str>) -> String {
        resolve(&self.current_dir, arg)
    }

    /// `dir` must come from `resolve`.
    pub fn set_current_dir(&mut self, dir: String) {
        debug_assert!(is_normalized(&dir), "unnormalized cwd {:?}", dir);
        self.current_dir = dir;
    }
}
