use crate::error::ReceiverError;
use crate::store::RecordStore;
use std::io;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tokio::sync::watch;
use tracing::{error, info, warn};

#[derive(Debug)]
pub struct DatagramReceiver {
    socket: UdpSocket,
    buffer_size: usize,
}

impl DatagramReceiver {
    pub async fn bind(addr: &str, buffer_size: usize) -> Result<Self, ReceiverError> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| ReceiverError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        Ok(Self {
            socket,
            buffer_size,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    // Takes the store by value: the receiver is its only writer.
    pub async fn run(
        self,
        store: RecordStore,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), ReceiverError> {
        let mut buf = vec![0u8; self.buffer_size];

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                received = self.socket.recv_from(&mut buf) => {
                    let (len, src) = received.map_err(ReceiverError::Recv)?;
                    handle_datagram(&buf[..len], src, &store).await;
                }
            }
        }

        info!("Datagram receiver stopped");
        Ok(())
    }
}

async fn handle_datagram(data: &[u8], src: SocketAddr, store: &RecordStore) {
    let payload = match std::str::from_utf8(data) {
        Ok(p) => p,
        Err(e) => {
            warn!(%src, error = %e, "Dropping datagram that is not valid UTF-8");
            return;
        }
    };

    info!(%src, payload, "Datagram received");

    match store.append(payload).await {
        Ok(key) => info!(key, "Submission stored"),
        Err(e) => error!(error = %e, "Error saving submission"),
    }
}
