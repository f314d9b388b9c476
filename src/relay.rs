use crate::error::RelayError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::{lookup_host, UdpSocket};
use tracing::debug;

/// Fire-and-forget sender; one fresh socket per datagram.
#[derive(Debug, Clone)]
pub struct RelayClient {
    target: String,
}

impl RelayClient {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub async fn send(&self, payload: &[u8]) -> Result<(), RelayError> {
        let dst = lookup_host(self.target.as_str())
            .await
            .map_err(|source| RelayError::Resolve {
                target: self.target.clone(),
                source,
            })?
            .next()
            .ok_or_else(|| RelayError::NoAddress {
                target: self.target.clone(),
            })?;

        let local: SocketAddr = if dst.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await?;
        let sent = socket.send_to(payload, dst).await?;
        if sent != payload.len() {
            return Err(RelayError::Truncated {
                sent,
                len: payload.len(),
            });
        }

        debug!(%dst, bytes = sent, "Datagram relayed");
        Ok(())
    }
}
