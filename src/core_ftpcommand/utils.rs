use crate::core_error::FtpError;
use crate::core_network::data_channel::data_target;
use crate::server::ServerState;
use crate::session::SharedSession;
use std::net::SocketAddr;

/// Returns the argument or a missing-parameter error.
pub fn require_arg(arg: Option<String>) -> Result<String, FtpError> {
    arg.ok_or(FtpError::MissingParameter)
}

/// Login check and path resolution for commands touching storage.
pub async fn resolve_protected(session: &SharedSession, arg: Option<&str>) -> Result<String, FtpError> {
    let session = session.lock().await;
    session.require_login()?;
    Ok(session.resolve(arg))
}

/// Everything a data transfer needs from the session, copied out so the
/// session lock is not held while streaming.
#[derive(Debug)]
pub struct TransferPlan {
    pub path: String,
    pub target: SocketAddr,
    pub binary: bool,
}

pub async fn prepare_transfer(
    session: &SharedSession,
    state: &ServerState,
    arg: Option<&str>,
) -> Result<TransferPlan, FtpError> {
    let session = session.lock().await;
    session.require_login()?;
    Ok(TransferPlan {
        path: session.resolve(arg),
        target: data_target(&session, state.config.server.data_port),
        binary: session.binary,
    })
}
