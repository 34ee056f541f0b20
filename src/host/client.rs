//! Probe a running device node and summarise what it said.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    /// `"ok"` when the message was served, `"busy"` when another session held the device.
    pub status: String,
    pub message: String,
    pub bytes: usize,
}

impl ProbeReport {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Connect to `addr`, read until the node closes the connection, and classify the reply.
pub async fn probe(addr: SocketAddr, timeout: Duration) -> Result<ProbeReport> {
    let exchange = async {
        let mut stream = TcpStream::connect(addr).await?;
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await?;
        Ok::<_, std::io::Error>(raw)
    };

    let raw = tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| anyhow!("Timed out after {:?} waiting for {}", timeout, addr))?
        .map_err(|e| anyhow!("Probe of {} failed: {}", addr, e))?;

    let message = String::from_utf8_lossy(&raw).into_owned();
    let status = if message.starts_with("error:") {
        "busy"
    } else {
        "ok"
    };
    Ok(ProbeReport {
        status: status.to_string(),
        bytes: raw.len(),
        message,
    })
}
