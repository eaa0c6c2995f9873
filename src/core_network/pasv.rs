use crate::core_ftpcommand::handlers::{CommandOutcome, HandlerResult};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerState;
use crate::session::SharedSession;
use log::debug;
use std::sync::Arc;

/// Passive mode is not offered; data connections are always opened by the
/// server towards the PORT address.
pub async fn handle_pasv_command(
    writer: ControlWriter,
    _state: Arc<ServerState>,
    _session: SharedSession,
    _arg: Option<String>,
) -> HandlerResult {
    debug!("Refusing PASV");
    send_response(&writer, b"550 not support now.\r\n").await?;
    Ok(CommandOutcome::failed())
}
