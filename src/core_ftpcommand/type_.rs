use crate::core_error::FtpError;
use crate::core_ftpcommand::handlers::{CommandOutcome, HandlerResult};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerState;
use crate::session::SharedSession;
use std::sync::Arc;

/// Handles the TYPE FTP command. Only image (binary) type is supported.
pub async fn handle_type_command(
    writer: ControlWriter,
    _state: Arc<ServerState>,
    session: SharedSession,
    arg: Option<String>,
) -> HandlerResult {
    let requested = arg.unwrap_or_default();
    if !requested.trim().eq_ignore_ascii_case("I") {
        return Err(FtpError::Unsupported(if requested.is_empty() {
            "TYPE".to_string()
        } else {
            requested
        }));
    }

    session.lock().await.binary = true;
    send_response(&writer, b"200 Binary mode.\r\n").await?;
    Ok(CommandOutcome::ok())
}
