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

/// Handles the STOR (Store) FTP command.
///
/// The destination is created (or truncated) before the data connection is
/// opened, then filled until the client closes its end.
pub async fn handle_stor_command(
    writer: ControlWriter,
    state: Arc<ServerState>,
    session: SharedSession,
    arg: Option<String>,
) -> HandlerResult {
    let plan = prepare_transfer(&session, &state, arg.as_deref()).await?;
    require_arg(arg)?;
    let _slot = state.admission.acquire().await?;

    let mut file = state.storage.open_write(&plan.path).await?;
    debug!("Receiving {} (binary={})", plan.path, plan.binary);

    send_response(&writer, b"150 Opening data connection.\r\n").await?;
    let mut stream =
        open_data_connection(plan.target, state.config.server.connect_timeout()).await?;
    let received =
        receive_file(&mut stream, &mut file, &plan.path, state.config.server.chunk_size).await;
    close_data_connection(stream).await;
    let received = received?;

    info!("File stored successfully: {} ({} bytes)", plan.path, received);
    send_response(&writer, b"226 Transfer complete.\r\n").await?;
    Ok(CommandOutcome::ok())
}

/// Copies `data` into `dest` until end of stream, then flushes `dest`.
///
/// Each chunk is handed to storage in a single write; a write that takes
/// fewer bytes than were read, or a `StorageFull` error from the write or
/// the final flush, means the storage is full.
pub async fn receive_file<R, W>(
    data: &mut R,
    dest: &mut W,
    path: &str,
    chunk_size: usize,
) -> Result<u64, FtpError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = vec![0u8; chunk_size];
    let mut total = 0u64;
    loop {
        let n = data.read(&mut buffer).await.map_err(FtpError::Transfer)?;
        if n == 0 {
            break;
        }
        let written = dest
            .write(&buffer[..n])
            .await
            .map_err(|e| write_error(path, e))?;
        if written != n {
            return Err(FtpError::ShortWrite(path.to_string()));
        }
        total += n as u64;
    }
    dest.flush().await.map_err(|e| write_error(path, e))?;
    Ok(total)
}

/// Buffered files report a full disk on a later write or flush rather than
/// as a short write.
fn write_error(path: &str, e: io::Error) -> FtpError {
    if e.kind() == io::ErrorKind::StorageFull {
        FtpError::ShortWrite(path.to_string())
    } else {
        FtpError::storage(path, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    /// Storage that accepts only `room` more bytes.
    struct FullDisk {
        room: usize,
        taken: Vec<u8>,
    }

    impl AsyncWrite for FullDisk {
        fn poll_write(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            let n = buf.len().min(self.room);
            self.room -= n;
            self.taken.extend_from_slice(&buf[..n]);
            Poll::Ready(Ok(n))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    /// Storage that takes every write but fails the flush.
    struct DeferredError {
        kind: io::ErrorKind,
    }

    impl AsyncWrite for DeferredError {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::from(self.kind)))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn full_disk_on_flush_means_out_of_space() {
        let mut data: &[u8] = b"payload";
        let mut dest = DeferredError {
            kind: io::ErrorKind::StorageFull,
        };
        let err = receive_file(&mut data, &mut dest, "/up", 4).await.unwrap_err();
        assert!(matches!(err, FtpError::ShortWrite(ref p) if p == "/up"));
        assert_eq!(err.to_ftp_response(), "550 Insufficient storage space.\r\n");
    }

    #[tokio::test]
    async fn other_flush_errors_stay_storage_errors() {
        let mut data: &[u8] = b"payload";
        let mut dest = DeferredError {
            kind: io::ErrorKind::PermissionDenied,
        };
        let err = receive_file(&mut data, &mut dest, "/up", 4).await.unwrap_err();
        assert!(matches!(err, FtpError::Storage { .. }));
    }

    #[tokio::test]
    async fn copies_until_end_of_stream() {
        let content: Vec<u8> = (0..1500u32).map(|i| (i % 7) as u8).collect();
        let mut data = content.as_slice();
        let mut dest = Vec::new();

        let total = receive_file(&mut data, &mut dest, "/up.bin", 512).await.unwrap();
        assert_eq!(total, 1500);
        assert_eq!(dest, content);
    }

    #[tokio::test]
    async fn empty_upload_creates_empty_file() {
        let mut data: &[u8] = b"";
        let mut dest = Vec::new();
        assert_eq!(receive_file(&mut data, &mut dest, "/e", 512).await.unwrap(), 0);
        assert!(dest.is_empty());
    }

    #[tokio::test]
    async fn short_write_means_out_of_space() {
        let mut data: &[u8] = b"0123456789";
        let mut dest = FullDisk {
            room: 6,
            taken: Vec::new(),
        };

        let err = receive_file(&mut data, &mut dest, "/big", 4).await.unwrap_err();
        assert!(matches!(err, FtpError::ShortWrite(ref p) if p == "/big"));
        assert_eq!(err.to_ftp_response(), "550 Insufficient storage space.\r\n");
        assert_eq!(dest.taken, b"012345");
    }
}
