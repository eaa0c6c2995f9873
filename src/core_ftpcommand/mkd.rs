use crate::core_ftpcommand::handlers::{CommandOutcome, HandlerResult};
use crate::core_ftpcommand::utils::{require_arg, resolve_protected};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerState;
use crate::session::SharedSession;
use log::info;
use std::sync::Arc;

/// Handles the MKD (Make Directory) FTP command.
///
/// # Arguments
///
/// * `writer` - The control connection writer.
/// * `state` - Shared server state holding the storage.
/// * `session` - The session of the client.
/// * `arg` - The directory to create, relative or absolute.
pub async fn handle_mkd_command(
    writer: ControlWriter,
    state: Arc<ServerState>,
    session: SharedSession,
    arg: Option<String>,
) -> HandlerResult {
    let dir_path = resolve_protected(&session, arg.as_deref()).await?;
    require_arg(arg)?;

    state.storage.create_dir(&dir_path).await?;
    info!("Directory created successfully: {}", dir_path);
    send_response(&writer, b"257 Okey.\r\n").await?;
    Ok(CommandOutcome::ok())
}
