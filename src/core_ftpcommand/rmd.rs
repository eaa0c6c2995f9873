use crate::core_ftpcommand::handlers::{CommandOutcome, HandlerResult};
use crate::core_ftpcommand::utils::{require_arg, resolve_protected};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerState;
use crate::session::SharedSession;
use log::info;
use std::sync::Arc;

/// Handles the RMD (Remove Directory) FTP command. Only empty directories
/// can be removed.
pub async fn handle_rmd_command(
    writer: ControlWriter,
    state: Arc<ServerState>,
    session: SharedSession,
    arg: Option<String>,
) -> HandlerResult {
    let dir_path = resolve_protected(&session, arg.as_deref()).await?;
    require_arg(arg)?;

    state.storage.remove_dir(&dir_path).await?;
    info!("Directory removed successfully: {}", dir_path);
    send_response(&writer, b"257 Okey.\r\n").await?;
    Ok(CommandOutcome::ok())
}
