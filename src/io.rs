use crate::ParserError;
use log::{debug, info};
use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Default BGPmon live feed serving the XML update stream.
pub const DEFAULT_BGPMON_HOST: &str = "livebgp.netsec.colostate.edu";
pub const DEFAULT_BGPMON_PORT: u16 = 50001;

/// Opens a TCP connection to a BGPmon server.
///
/// Every resolved address is tried in turn. With a `timeout`, each connection attempt is
/// bounded by it and so is every later read, letting a silent server surface as a read error
/// instead of blocking forever.
pub fn connect(addr: &str, port: u16, timeout: Option<Duration>) -> Result<TcpStream, ParserError> {
    let target = format!("{}:{}", addr.trim(), port);
    let connection_error = |source: io::Error| ParserError::ConnectionError {
        addr: target.clone(),
        source,
    };

    info!("connecting to BGPmon Update XML stream ({})", target);
    let addrs = target.to_socket_addrs().map_err(connection_error)?;

    let mut last_err = io::Error::new(io::ErrorKind::NotFound, "address resolved to nothing");
    for sock_addr in addrs {
        debug!("trying {}", sock_addr);
        let attempt = match timeout {
            Some(t) => TcpStream::connect_timeout(&sock_addr, t),
            None => TcpStream::connect(sock_addr),
        };
        match attempt {
            Ok(stream) => {
                stream
                    .set_read_timeout(timeout)
                    .map_err(connection_error)?;
                info!("connected to {}", sock_addr);
                return Ok(stream);
            }
            Err(e) => last_err = e,
        }
    }
    Err(connection_error(last_err))
}
