use crate::core_error::FtpError;
use crate::core_ftpcommand::handlers::{CommandOutcome, HandlerResult};
use crate::core_ftpcommand::utils::{prepare_transfer, require_arg};
use crate::core_network::data_channel::{close_data_connection, open_data_connection};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerState;
use crate::session::SharedSession;
use log::{debug, info};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Handles the RETR (Retrieve) FTP command.
///
/// The file must exist and be a regular file before the data connection is
/// opened. Its size at that point is what gets sent, `chunk_size` bytes at a
/// time.
///
/// # Arguments
///
/// * `writer` - The control connection writer.
/// * `state` - Shared server state (storage, admission, chunk size).
/// * `session` - The session of the client.
/// * `arg` - The file to send.
pub async fn handle_retr_command(
    writer: ControlWriter,
    state: Arc<ServerState>,
    session: SharedSession,
    arg: Option<String>,
) -> HandlerResult {
    let plan = prepare_transfer(&session, &state, arg.as_deref()).await?;
    require_arg(arg)?;
    let _slot = state.admission.acquire().await?;

    let metadata = state.storage.metadata(&plan.path).await?;
    if !metadata.is_file() {
        return Err(FtpError::NotAFile(plan.path));
    }
    let mut file = state.storage.open_read(&plan.path).await?;
    debug!("Sending {} ({} bytes, binary={})", plan.path, metadata.len(), plan.binary);

    send_response(&writer, b"150 Opening data connection.\r\n").await?;
    let mut stream =
        open_data_connection(plan.target, state.config.server.connect_timeout()).await?;
    let sent = send_file(&mut file, &mut stream, metadata.len(), state.config.server.chunk_size).await;
    close_data_connection(stream).await;
    let sent = sent?;

    info!("File sent successfully: {} ({} bytes)", plan.path, sent);
    send_response(&writer, b"226 Transfer complete.\r\n").await?;
    Ok(CommandOutcome::ok())
}

/// Copies exactly `size` bytes from `source` to `data`.
///
/// A source that ends early (the file shrank meanwhile) fails the transfer.
pub async fn send_file<R, W>(
    source: &mut R,
    data: &mut W,
    size: u64,
    chunk_size: usize,
) -> Result<u64, FtpError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = vec![0u8; chunk_size];
    let mut remaining = size;
    while remaining > 0 {
        let want = remaining.min(chunk_size as u64) as usize;
        let n = source
            .read(&mut buffer[..want])
            .await
            .map_err(FtpError::Transfer)?;
        if n == 0 {
            return Err(FtpError::Transfer(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("file ended {} bytes early", remaining),
            )));
        }
        data.write_all(&buffer[..n])
            .await
            .map_err(FtpError::Transfer)?;
        remaining -= n as u64;
    }
    data.flush().await.map_err(FtpError::Transfer)?;
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sends_whole_file_across_chunks() {
        let content: Vec<u8> = (0..2000u32).map(|i| (i % 251) as u8).collect();
        let mut source = content.as_slice();
        let mut out = Vec::new();

        let sent = send_file(&mut source, &mut out, content.len() as u64, 512)
            .await
            .unwrap();
        assert_eq!(sent, 2000);
        assert_eq!(out, content);
    }

    #[tokio::test]
    async fn stops_at_recorded_size() {
        // Bytes appended after the size was taken are not sent.
        let mut source: &[u8] = b"hello world";
        let mut out = Vec::new();
        send_file(&mut source, &mut out, 5, 3).await.unwrap();
        assert_eq!(out, b"hello");
    }

    #[tokio::test]
    async fn shrunken_file_is_an_io_error() {
        let mut source: &[u8] = b"abc";
        let mut out = Vec::new();
        let err = send_file(&mut source, &mut out, 10, 4).await.unwrap_err();
        assert!(matches!(err, FtpError::Transfer(ref e) if e.kind() == io::ErrorKind::UnexpectedEof));
        assert_eq!(err.to_ftp_response(), "550 File i/o error.\r\n");
    }

    #[tokio::test]
    async fn empty_file_sends_nothing() {
        let mut source: &[u8] = b"";
        let mut out = Vec::new();
        assert_eq!(send_file(&mut source, &mut out, 0, 512).await.unwrap(), 0);
        assert!(out.is_empty());
    }
}
