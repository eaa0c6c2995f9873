use crate::config::Config;
use log::info;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

/// Write side of a control connection, shared between the dispatcher and
/// the handler it is currently running.
pub type ControlWriter = Arc<Mutex<Box<dyn AsyncWrite + Send + Unpin>>>;

pub fn control_writer<W>(writer: W) -> ControlWriter
where
    W: AsyncWrite + Send + Unpin + 'static,
{
    Arc::new(Mutex::new(Box::new(writer)))
}

/// Sends a response to the client.
pub async fn send_response(writer: &ControlWriter, message: &[u8]) -> Result<(), std::io::Error> {
    let mut writer = writer.lock().await;
    writer.write_all(message).await?;
    writer.flush().await?;
    Ok(())
}

/// Hides PASS arguments from the command log.
pub fn loggable_line(line: &str) -> String {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    match trimmed.split_once(char::is_whitespace) {
        Some((verb, _)) if verb.eq_ignore_ascii_case("PASS") => format!("{} ****", verb),
        _ => trimmed.to_string(),
    }
}

// Helper function to log configuration options
pub fn log_config(config: &Config) {
    info!("  Bind Address: {}:{}", config.server.bind_ip, config.server.listen_port);
    info!("  Root Directory: {}", config.server.root_dir);
    info!("  Data Port Hint: {}", config.server.data_port);
    info!("  Max Data Channels: {}", config.server.max_clients);
    info!("  Chunk Size: {} bytes", config.server.chunk_size);
    info!(
        "  Data Connect Timeout: {}",
        match config.server.data_connect_timeout {
            0 => "disabled".to_string(),
            secs => format!("{}s", secs),
        }
    );
    match &config.users {
        Some(users) => info!("  Authentication: {} user(s)", users.len()),
        None => info!("  Authentication: disabled"),
    }
}
