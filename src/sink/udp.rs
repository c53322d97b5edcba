use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use super::{EmitSink, SinkError};
use crate::payload::OutboundMapping;

/// Sends each mapping as one JSON datagram to the host
#[derive(Debug)]
pub struct UdpSink {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpSink {
    /// Resolve `target` and bind an ephemeral local socket of the same family
    pub fn connect(target: &str) -> Result<Self, SinkError> {
        let target = target.to_socket_addrs()?.next().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("no address for {target}"),
            )
        })?;
        let local: SocketAddr = if target.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(local)?;
        socket.set_nonblocking(true)?;
        Ok(Self { socket, target })
    }

    pub const fn target(&self) -> SocketAddr {
        self.target
    }
}

impl EmitSink for UdpSink {
    fn deliver(&self, mapping: &OutboundMapping) -> Result<(), SinkError> {
        let datagram = mapping.to_json()?;
        self.socket.send_to(datagram.as_bytes(), self.target)?;
        Ok(())
    }
}
