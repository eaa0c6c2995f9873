use crate::core_error::FtpError;
use crate::session::Session;
use log::debug;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Where the next data connection goes: the PORT address, or the client's
/// host at the configured data port if PORT was never sent.
pub fn data_target(session: &Session, data_port: u16) -> SocketAddr {
    session
        .data_addr
        .unwrap_or_else(|| SocketAddr::new(session.peer_addr.ip(), data_port))
}

/// Opens the outbound (active mode) data connection.
pub async fn open_data_connection(
    addr: SocketAddr,
    connect_timeout: Option<Duration>,
) -> Result<TcpStream, FtpError> {
    debug!("Opening data connection to {}", addr);
    let connect = TcpStream::connect(addr);
    let stream = match connect_timeout {
        Some(limit) => match timeout(limit, connect).await {
            Ok(result) => result,
            Err(_) => Err(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "data connection timed out",
            )),
        },
        None => connect.await,
    }
    .map_err(|source| FtpError::DataChannel { addr, source })?;
    debug!("Data connection established with {}", addr);
    Ok(stream)
}

/// Flushes and closes a data connection. Failures only matter for logging:
/// the transfer result has already been decided.
pub async fn close_data_connection(mut stream: TcpStream) {
    if let Err(e) = stream.shutdown().await {
        debug!("Error shutting down data stream: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[test]
    fn falls_back_to_peer_host_without_port() {
        let mut session = Session::new("10.0.0.7:50123".parse().unwrap());
        assert_eq!(
            data_target(&session, 20),
            "10.0.0.7:20".parse::<SocketAddr>().unwrap()
        );

        session.data_addr = Some("10.0.0.8:4000".parse().unwrap());
        assert_eq!(
            data_target(&session, 20),
            "10.0.0.8:4000".parse::<SocketAddr>().unwrap()
        );
    }

    #[tokio::test]
    async fn open_write_and_close() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let client = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            socket.read_to_end(&mut received).await.unwrap();
            received
        });

        let mut stream = open_data_connection(addr, Some(Duration::from_secs(5)))
            .await
            .unwrap();
        stream.write_all(b"payload").await.unwrap();
        close_data_connection(stream).await;

        assert_eq!(client.await.unwrap(), b"payload");
    }

    #[tokio::test]
    async fn refused_connection_is_a_data_channel_error() {
        // Bind then drop to get a port nobody listens on.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let err = open_data_connection(addr, None).await.unwrap_err();
        assert!(matches!(err, FtpError::DataChannel { addr: a, .. } if a == addr));
        assert!(!err.is_fatal());
    }
}
