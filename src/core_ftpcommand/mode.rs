use crate::core_error::FtpError;
use crate::core_ftpcommand::handlers::{CommandOutcome, HandlerResult};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerState;
use crate::session::{SharedSession, TransferMode};
use std::sync::Arc;

/// Handles the MODE FTP command. Only stream mode is supported.
pub async fn handle_mode_command(
    writer: ControlWriter,
    _state: Arc<ServerState>,
    session: SharedSession,
    arg: Option<String>,
) -> HandlerResult {
    let requested = arg.unwrap_or_default();
    if !requested.trim().eq_ignore_ascii_case("S") {
        return Err(FtpError::Unsupported(if requested.is_empty() {
            "MODE".to_string()
        } else {
            requested
        }));
    }

    session.lock().await.mode = TransferMode::Stream;
    send_response(&writer, b"200 Stream mode.\r\n").await?;
    Ok(CommandOutcome::ok())
}
