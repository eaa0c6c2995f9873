use crate::core_ftpcommand::handlers::{CommandOutcome, HandlerResult};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerState;
use crate::session::SharedSession;
use log::{info, warn};
use std::sync::Arc;

/// Handles the PASS FTP command.
///
/// Without a credential table every PASS logs the session in. Otherwise the
/// password is checked against the user staged by USER; a mismatch leaves
/// the session logged out.
pub async fn handle_pass_command(
    writer: ControlWriter,
    state: Arc<ServerState>,
    session: SharedSession,
    arg: Option<String>,
) -> HandlerResult {
    let mut session = session.lock().await;
    let pending = session.pending_user.take();

    let credentials = match &state.credentials {
        Some(credentials) => credentials,
        None => {
            session.is_authenticated = true;
            drop(session);
            send_response(&writer, b"230 Okey.\r\n").await?;
            return Ok(CommandOutcome::ok());
        }
    };

    let username = match pending {
        Some(username) => username,
        None => {
            session.is_authenticated = false;
            drop(session);
            send_response(&writer, b"550 Send USER first.\r\n").await?;
            return Ok(CommandOutcome::failed());
        }
    };

    let password = arg.unwrap_or_default();
    session.is_authenticated = credentials.check(&username, &password);
    let authenticated = session.is_authenticated;
    drop(session);

    if authenticated {
        info!("User {} logged in", username);
        send_response(&writer, b"230 Okey.\r\n").await?;
        Ok(CommandOutcome::ok())
    } else {
        warn!("Login incorrect for user {}", username);
        send_response(&writer, b"550 Login incorrect.\r\n").await?;
        Ok(CommandOutcome::failed())
    }
}
