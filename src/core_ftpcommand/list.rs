use crate::core_error::FtpError;
use crate::core_ftpcommand::handlers::{CommandOutcome, HandlerResult};
use crate::core_ftpcommand::utils::prepare_transfer;
use crate::core_network::data_channel::{close_data_connection, open_data_connection};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerState;
use crate::session::SharedSession;
use chrono::{DateTime, Local};
use log::{debug, info};
use std::fs::Metadata;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Handles the LIST FTP command.
///
/// Sends one `ls -l` style record per entry of the target directory, or a
/// single record when the target is a file. The target is checked before the
/// data connection is opened, so a missing path never connects.
pub async fn handle_list_command(
    writer: ControlWriter,
    state: Arc<ServerState>,
    session: SharedSession,
    arg: Option<String>,
) -> HandlerResult {
    let arg = strip_list_options(arg.as_deref());
    let plan = prepare_transfer(&session, &state, arg).await?;
    let _slot = state.admission.acquire().await?;

    let metadata = state.storage.metadata(&plan.path).await?;
    let records = if metadata.is_dir() {
        state
            .storage
            .list_dir(&plan.path)
            .await?
            .iter()
            .map(|(name, meta)| record_for(name, meta))
            .collect()
    } else {
        let name = plan.path.rsplit('/').next().unwrap_or_default();
        vec![record_for(name, &metadata)]
    };
    debug!("Listing {} ({} entries)", plan.path, records.len());

    send_response(&writer, b"150 Here comes the directory listing.\r\n").await?;
    let mut stream =
        open_data_connection(plan.target, state.config.server.connect_timeout()).await?;
    let sent = send_records(&mut stream, &records).await;
    close_data_connection(stream).await;
    sent?;

    info!("Directory listing sent: {}", plan.path);
    send_response(&writer, b"226 Directory send okey.\r\n").await?;
    Ok(CommandOutcome::ok())
}

/// Drops leading `-xyz` option tokens (`LIST -la`), keeping the rest of the
/// argument untouched so paths with spaces survive.
fn strip_list_options(arg: Option<&str>) -> Option<&str> {
    let mut rest = arg?.trim_start();
    while rest.starts_with('-') {
        rest = match rest.split_once(char::is_whitespace) {
            Some((_, tail)) => tail.trim_start(),
            None => "",
        };
    }
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

fn record_for(name: &str, metadata: &Metadata) -> String {
    let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
    format_list_record(name, metadata.is_dir(), metadata.len(), modified.into())
}

/// One listing line, e.g.
/// `drwxrwxrwx 1 user group       4096 Mar  5 07:09 docs\r\n`.
pub fn format_list_record(name: &str, is_dir: bool, size: u64, modified: DateTime<Local>) -> String {
    format!(
        "{}rwxrwxrwx 1 user group {:>10} {} {}\r\n",
        if is_dir { 'd' } else { '-' },
        size,
        modified.format("%b %e %H:%M"),
        name
    )
}

async fn send_records<W: AsyncWrite + Unpin>(
    stream: &mut W,
    records: &[String],
) -> Result<(), FtpError> {
    for record in records {
        stream
            .write_all(record.as_bytes())
            .await
            .map_err(FtpError::Transfer)?;
    }
    Ok(())
}
