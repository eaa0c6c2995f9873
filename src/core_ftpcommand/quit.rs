use crate::core_ftpcommand::handlers::{CommandOutcome, HandlerResult};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerState;
use crate::session::SharedSession;
use log::info;
use std::sync::Arc;

/// Handles the QUIT FTP command. The dispatcher closes the connection after
/// the reply is sent.
pub async fn handle_quit_command(
    writer: ControlWriter,
    _state: Arc<ServerState>,
    _session: SharedSession,
    _arg: Option<String>,
) -> HandlerResult {
    info!("Received QUIT command. Closing connection.");
    send_response(&writer, b"221 Bye!.\r\n").await?;
    Ok(CommandOutcome::close())
}
