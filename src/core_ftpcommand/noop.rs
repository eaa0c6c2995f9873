use crate::core_ftpcommand::handlers::{CommandOutcome, HandlerResult};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerState;
use crate::session::SharedSession;
use std::sync::Arc;

pub async fn handle_noop_command(
    writer: ControlWriter,
    _state: Arc<ServerState>,
    _session: SharedSession,
    _arg: Option<String>,
) -> HandlerResult {
    send_response(&writer, b"200 OK.\r\n").await?;
    Ok(CommandOutcome::ok())
}
