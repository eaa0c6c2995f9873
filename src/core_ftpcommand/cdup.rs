use crate::core_ftpcommand::cwd::change_directory;
use crate::core_ftpcommand::handlers::HandlerResult;
use crate::helpers::ControlWriter;
use crate::server::ServerState;
use crate::session::SharedSession;
use std::sync::Arc;

/// Handles the CDUP FTP command: CWD to the parent, clamped at `/`.
pub async fn handle_cdup_command(
    writer: ControlWriter,
    state: Arc<ServerState>,
    session: SharedSession,
    _arg: Option<String>,
) -> HandlerResult {
    change_directory(&writer, &state, &session, Some("..")).await
}
