use crate::core_ftpcommand::handlers::{CommandOutcome, HandlerResult};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerState;
use crate::session::SharedSession;
use log::info;
use std::sync::Arc;

/// Handles the SYST (System) FTP command with the configured system type.
pub async fn handle_syst_command(
    writer: ControlWriter,
    state: Arc<ServerState>,
    _session: SharedSession,
    _arg: Option<String>,
) -> HandlerResult {
    info!("Responding to SYST command with system type.");
    let response = format!("215 {}.\r\n", state.config.server.system_type);
    send_response(&writer, response.as_bytes()).await?;
    Ok(CommandOutcome::ok())
}
