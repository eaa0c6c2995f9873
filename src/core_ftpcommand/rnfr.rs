use crate::core_ftpcommand::handlers::{CommandOutcome, HandlerResult};
use crate::core_ftpcommand::utils::require_arg;
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerState;
use crate::session::SharedSession;
use log::debug;
use std::sync::Arc;

/// Handles the RNFR (Rename From) FTP command.
///
/// Only stages the resolved source in the session; storage is untouched
/// until RNTO.
pub async fn handle_rnfr_command(
    writer: ControlWriter,
    _state: Arc<ServerState>,
    session: SharedSession,
    arg: Option<String>,
) -> HandlerResult {
    {
        let mut session = session.lock().await;
        session.require_login()?;
        let source = session.resolve(Some(require_arg(arg)?.as_str()));
        debug!("Rename source staged: {}", source);
        session.rename_from = Some(source);
    }

    send_response(&writer, b"200 Ready for RNTO.\r\n").await?;
    Ok(CommandOutcome::ok())
}
