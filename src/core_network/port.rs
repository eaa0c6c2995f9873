use crate::core_error::FtpError;
use crate::core_ftpcommand::handlers::{CommandOutcome, HandlerResult};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerState;
use crate::session::SharedSession;
use log::info;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

/// Parses `h1,h2,h3,h4,p1,p2` into the data connection address.
pub fn parse_port_argument(arg: &str) -> Result<SocketAddr, FtpError> {
    let parts: Vec<&str> = arg.trim().split(',').map(str::trim).collect();
    if parts.len() != 6 {
        return Err(FtpError::Syntax(arg.to_string()));
    }

    let octets: Vec<u8> = parts
        .iter()
        .map(|x| x.parse::<u8>())
        .collect::<Result<_, _>>()
        .map_err(|_| FtpError::Syntax(arg.to_string()))?;

    let ip = Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]);
    let port = (octets[4] as u16) << 8 | octets[5] as u16;
    Ok(SocketAddr::new(ip.into(), port))
}

/// Handles the PORT (Active Mode) FTP command.
///
/// Only records the address; the connection is opened by the next transfer.
pub async fn handle_port_command(
    writer: ControlWriter,
    _state: Arc<ServerState>,
    session: SharedSession,
    arg: Option<String>,
) -> HandlerResult {
    let arg = arg.ok_or_else(|| FtpError::Syntax(String::new()))?;
    let addr = parse_port_argument(&arg)?;
    info!("Received PORT command with address: {}", addr);

    session.lock().await.data_addr = Some(addr);
    send_response(&writer, b"220 Got the port.\r\n").await?;
    Ok(CommandOutcome::ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_legacy_representation() {
        let addr = parse_port_argument("192,168,0,10,4,1").unwrap();
        assert_eq!(addr, "192.168.0.10:1025".parse::<SocketAddr>().unwrap());

        let addr = parse_port_argument("127,0,0,1,0,21").unwrap();
        assert_eq!(addr.port(), 21);
    }

    #[test]
    fn malformed_input_is_a_syntax_error() {
        for bad in [
            "",
            "127,0,0,1,4",
            "127,0,0,1,4,1,9",
            "127,0,0,1,x,1",
            "256,0,0,1,4,1",
            "127,0,0,1,4,-1",
            "127.0.0.1:1025",
        ] {
            assert!(
                matches!(parse_port_argument(bad), Err(FtpError::Syntax(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }
}
