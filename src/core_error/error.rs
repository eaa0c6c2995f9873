// Error taxonomy shared by every command handler.
use std::io;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FtpError {
    #[error("not logged in")]
    NotLoggedIn,

    #[error("{0}: no such file or directory")]
    NotFound(String),

    #[error("{0}: not a directory")]
    NotADirectory(String),

    #[error("{0}: not a regular file")]
    NotAFile(String),

    #[error("{path}: {source}")]
    Storage {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{0}: short write, storage is full")]
    ShortWrite(String),

    #[error("missing parameter")]
    MissingParameter,

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("{0} not implemented")]
    Unsupported(String),

    #[error("cannot open data connection to {addr}: {source}")]
    DataChannel {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("data connection failed: {0}")]
    Transfer(#[source] io::Error),

    #[error("server is shutting down")]
    ShuttingDown,

    #[error("control connection failed: {0}")]
    Control(#[from] io::Error),
}

impl FtpError {
    /// Wraps a storage `io::Error`, keeping "not found" distinct from the
    /// other I/O failures.
    pub fn storage(path: &str, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            FtpError::NotFound(path.to_string())
        } else {
            FtpError::Storage {
                path: path.to_string(),
                source,
            }
        }
    }

    /// Errors after which the control connection must be closed.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FtpError::NotLoggedIn | FtpError::ShuttingDown | FtpError::Control(_)
        )
    }

    pub fn to_ftp_response(&self) -> String {
        match self {
            FtpError::NotLoggedIn => "530 Not logged in.\r\n".to_string(),
            FtpError::NotFound(path) => format!("550 {}: No such file or directory.\r\n", path),
            FtpError::NotADirectory(_) => "550 Not a directory.\r\n".to_string(),
            FtpError::NotAFile(_) => "550 Not a regular file.\r\n".to_string(),
            FtpError::Storage { source, .. } => format!("550 {}.\r\n", source),
            FtpError::ShortWrite(_) => "550 Insufficient storage space.\r\n".to_string(),
            FtpError::MissingParameter => "550 Missing parameter.\r\n".to_string(),
            FtpError::Syntax(_) => "501 Syntax error in parameters or arguments.\r\n".to_string(),
            FtpError::Unsupported(what) => format!("504 {} not implement.\r\n", what),
            FtpError::DataChannel { .. } => "550 Can't open data connection.\r\n".to_string(),
            FtpError::Transfer(_) => "550 File i/o error.\r\n".to_string(),
            FtpError::ShuttingDown => "421 Server shutting down.\r\n".to_string(),
            FtpError::Control(_) => "421 Service not available, closing control connection.\r\n".to_string(),
        }
    }
}
