use crate::core_ftpcommand::handlers::{CommandOutcome, HandlerResult};
use crate::core_ftpcommand::utils::{require_arg, resolve_protected};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerState;
use crate::session::SharedSession;
use log::info;
use std::sync::Arc;

/// Handles the DELE (Delete File) FTP command.
pub async fn handle_dele_command(
    writer: ControlWriter,
    state: Arc<ServerState>,
    session: SharedSession,
    arg: Option<String>,
) -> HandlerResult {
    let file_path = resolve_protected(&session, arg.as_deref()).await?;
    require_arg(arg)?;

    state.storage.remove_file(&file_path).await?;
    info!("File deleted: {}", file_path);
    send_response(&writer, b"257 Okey.\r\n").await?;
    Ok(CommandOutcome::ok())
}
