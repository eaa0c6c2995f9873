use crate::constants::{COMMAND_TOO_LONG_REPLY, MAX_COMMAND_LENGTH, UNKNOWN_COMMAND_REPLY};
use crate::core_error::FtpError;
use crate::core_ftpcommand::ftpcommand::{CommandLine, FtpCommand};
use crate::core_ftpcommand::handlers::CommandHandlers;
use crate::helpers::{control_writer, loggable_line, send_response, ControlWriter};
use crate::server::ServerState;
use crate::session::{Session, SharedSession};
use log::{debug, info, warn};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Serves one accepted control connection until QUIT, a fatal error, EOF or
/// server shutdown.
pub async fn handle_connection(
    socket: TcpStream,
    state: Arc<ServerState>,
    handlers: Arc<CommandHandlers>,
) -> io::Result<()> {
    let peer_addr = socket.peer_addr()?;
    let (read_half, write_half) = socket.into_split();
    let reader = BufReader::new(read_half);
    let writer = control_writer(write_half);
    let session = Session::shared(peer_addr);

    serve_session(reader, writer, state, session, handlers).await
}

/// The dispatch loop. The control connection is flushed and shut down on
/// every exit path.
pub async fn serve_session<R>(
    mut reader: R,
    writer: ControlWriter,
    state: Arc<ServerState>,
    session: SharedSession,
    handlers: Arc<CommandHandlers>,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let result = dispatch(&mut reader, &writer, &state, &session, &handlers).await;

    let mut w = writer.lock().await;
    if let Err(e) = w.shutdown().await {
        debug!("Error shutting down control connection: {}", e);
    }
    result
}

async fn dispatch<R>(
    reader: &mut R,
    writer: &ControlWriter,
    state: &Arc<ServerState>,
    session: &SharedSession,
    handlers: &CommandHandlers,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let peer = session.lock().await.peer_addr;
    let mut shutdown = state.subscribe_shutdown();
    if state.is_stopped() {
        send_response(writer, FtpError::ShuttingDown.to_ftp_response().as_bytes()).await?;
        return Ok(());
    }

    let greeting = format!("220 {}\r\n", state.config.server.greeting);
    send_response(writer, greeting.as_bytes()).await?;

    loop {
        let read = tokio::select! {
            read = read_command_line(reader) => read?,
            _ = shutdown.recv() => {
                info!("[{}] Closing session for shutdown", peer);
                send_response(writer, FtpError::ShuttingDown.to_ftp_response().as_bytes()).await?;
                return Ok(());
            }
        };

        let raw = match read {
            ControlLine::Line(raw) => raw,
            ControlLine::TooLong => {
                warn!("[{}] Command line over {} bytes dropped", peer, MAX_COMMAND_LENGTH);
                send_response(writer, COMMAND_TOO_LONG_REPLY).await?;
                continue;
            }
            ControlLine::Eof => {
                info!("[{}] Client disconnected", peer);
                return Ok(());
            }
        };

        info!("[{}] Received command: {}", peer, loggable_line(&raw));
        let line = CommandLine::parse(&raw);
        let command = line.command();

        // A staged rename source only survives into the very next command.
        if command != Some(FtpCommand::RNTO) {
            session.lock().await.rename_from = None;
        }

        let handler = match command.and_then(|cmd| handlers.get(&cmd)) {
            Some(handler) => handler,
            None => {
                debug!("[{}] Unknown command: {}", peer, line.verb);
                send_response(writer, UNKNOWN_COMMAND_REPLY).await?;
                continue;
            }
        };

        let result = tokio::select! {
            biased;
            result = handler(
                Arc::clone(writer),
                Arc::clone(state),
                Arc::clone(session),
                line.arg,
            ) => result,
            _ = control_closed(reader) => {
                // Dropping the handler drops its data connection and slot.
                info!("[{}] Control connection lost during {}, aborting", peer, line.verb);
                return Ok(());
            }
        };

        match result {
            Ok(outcome) => {
                debug!("[{}] {} done (success={})", peer, line.verb, outcome.success);
                if !outcome.keep_open {
                    return Ok(());
                }
            }
            Err(e) if e.is_fatal() => {
                warn!("[{}] {} failed, closing: {}", peer, line.verb, e);
                if !matches!(e, FtpError::Control(_)) {
                    send_response(writer, e.to_ftp_response().as_bytes()).await?;
                }
                return Ok(());
            }
            Err(e) => {
                warn!("[{}] {} failed: {}", peer, line.verb, e);
                send_response(writer, e.to_ftp_response().as_bytes()).await?;
            }
        }
    }
}

/// Resolves once the client has closed (or broken) the control connection.
/// Pipelined commands already buffered do not count as a close.
async fn control_closed<R>(reader: &mut R)
where
    R: AsyncBufRead + Unpin,
{
    let open = matches!(reader.fill_buf().await, Ok(buf) if !buf.is_empty());
    if open {
        std::future::pending::<()>().await;
    }
}

enum ControlLine {
    Line(String),
    TooLong,
    Eof,
}

/// Reads one control line of at most `MAX_COMMAND_LENGTH` bytes, terminator
/// included. Longer lines are consumed up to their newline and reported as
/// `TooLong`.
async fn read_command_line<R>(reader: &mut R) -> io::Result<ControlLine>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let n = (&mut *reader)
        .take(MAX_COMMAND_LENGTH as u64)
        .read_until(b'\n', &mut buf)
        .await?;
    if n == 0 {
        return Ok(ControlLine::Eof);
    }

    if buf.last() != Some(&b'\n') && buf.len() >= MAX_COMMAND_LENGTH {
        loop {
            let mut rest = Vec::new();
            let n = (&mut *reader)
                .take(MAX_COMMAND_LENGTH as u64)
                .read_until(b'\n', &mut rest)
                .await?;
            if n == 0 || rest.last() == Some(&b'\n') {
                break;
            }
        }
        return Ok(ControlLine::TooLong);
    }

    Ok(ControlLine::Line(String::from_utf8_lossy(&buf).into_owned()))
}
