use crate::core_ftpcommand::handlers::{CommandOutcome, HandlerResult};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerState;
use crate::session::SharedSession;
use log::{info, warn};
use std::sync::Arc;

/// Handles the USER FTP command.
///
/// The username is lowercased and, when a credential table is configured,
/// must be listed in it. The session stays unauthenticated until PASS.
///
/// # Arguments
///
/// * `writer` - The control connection writer.
/// * `state` - Shared server state holding the credential table.
/// * `session` - The session of the client.
/// * `arg` - The username provided by the client.
///
/// # Returns
///
/// HandlerResult telling the dispatcher whether the command succeeded.
pub async fn handle_user_command(
    writer: ControlWriter,
    state: Arc<ServerState>,
    session: SharedSession,
    arg: Option<String>,
) -> HandlerResult {
    let username = arg.unwrap_or_default().to_lowercase();
    info!("Received USER command with username: {}", username);

    let accepted = match &state.credentials {
        Some(credentials) => credentials.has_user(&username),
        None => true,
    };

    {
        let mut session = session.lock().await;
        session.is_authenticated = false;
        session.pending_user = if accepted { Some(username.clone()) } else { None };
    }

    if accepted {
        send_response(&writer, b"331 Okey.\r\n").await?;
        Ok(CommandOutcome::ok())
    } else {
        warn!("Unknown user: {}", username);
        send_response(&writer, b"550 Unknown user.\r\n").await?;
        Ok(CommandOutcome::failed())
    }
}
