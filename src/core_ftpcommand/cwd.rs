use crate::core_ftpcommand::handlers::{CommandOutcome, HandlerResult};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerState;
use crate::session::SharedSession;
use log::info;
use std::sync::Arc;

/// Handles the CWD FTP command.
///
/// The target is resolved against the session's virtual directory and must
/// be an existing directory; the session directory only changes on success.
pub async fn handle_cwd_command(
    writer: ControlWriter,
    state: Arc<ServerState>,
    session: SharedSession,
    arg: Option<String>,
) -> HandlerResult {
    change_directory(&writer, &state, &session, arg.as_deref()).await
}

pub(crate) async fn change_directory(
    writer: &ControlWriter,
    state: &ServerState,
    session: &SharedSession,
    arg: Option<&str>,
) -> HandlerResult {
    let mut session = session.lock().await;
    session.require_login()?;
    let target = session.resolve(arg);

    state.storage.require_dir(&target).await?;
    info!("Directory changed to: {}", target);
    session.set_current_dir(target);
    drop(session);

    send_response(writer, b"250 Okey.\r\n").await?;
    Ok(CommandOutcome::ok())
}
