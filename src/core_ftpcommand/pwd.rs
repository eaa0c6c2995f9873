// src/core_ftpcommand/pwd.rs
use crate::core_ftpcommand::handlers::{CommandOutcome, HandlerResult};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerState;
use crate::session::SharedSession;
use std::sync::Arc;

pub async fn handle_pwd_command(
    writer: ControlWriter,
    _state: Arc<ServerState>,
    session: SharedSession,
    _arg: Option<String>,
) -> HandlerResult {
    let current_dir = {
        let session = session.lock().await;
        session.require_login()?;
        session.current_dir().to_string()
    };
    let response = format!("250 \"{}\".\r\n", current_dir);
    send_response(&writer, response.as_bytes()).await?;
    Ok(CommandOutcome::ok())
}
