use crate::core_error::FtpError;
use crate::core_ftpcommand::handlers::{CommandOutcome, HandlerResult};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerState;
use crate::session::SharedSession;
use log::info;
use std::sync::Arc;

/// Handles the RNTO (Rename To) FTP command.
///
/// Consumes the source staged by RNFR; the staged source is cleared whether
/// or not the rename succeeds.
pub async fn handle_rnto_command(
    writer: ControlWriter,
    state: Arc<ServerState>,
    session: SharedSession,
    arg: Option<String>,
) -> HandlerResult {
    let (old_path, new_path) = {
        let mut session = session.lock().await;
        session.require_login()?;
        let staged = session.rename_from.take().filter(|source| !source.is_empty());
        match (staged, arg) {
            (Some(source), Some(dest)) => (source, session.resolve(Some(dest.as_str()))),
            _ => return Err(FtpError::MissingParameter),
        }
    };

    state.storage.rename(&old_path, &new_path).await?;
    info!("Renamed {} to {}", old_path, new_path);
    send_response(&writer, b"200 Okey.\r\n").await?;
    Ok(CommandOutcome::ok())
}
