//! TCP device node.
//!
//! Each accepted connection opens the device, receives the message in
//! `server.chunk_size`-byte reads, and is closed after the end-of-message signal.
//! While one connection holds the device every other connection is told it is busy.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};

use super::{open_device, release_device};
use crate::config::Config;
use crate::device::{Clock, DeviceEndpoint, FileOperations, OpenFile};
use crate::logutil::escape_chunk;
use crate::metrics;

pub struct DeviceServer<C: Clock + 'static> {
    config: Config,
    endpoint: Arc<DeviceEndpoint<C>>,
    listener: TcpListener,
}

impl<C: Clock + 'static> DeviceServer<C> {
    /// Register the device node: bind the listener configured in `server.bind`.
    pub async fn bind(config: Config, endpoint: Arc<DeviceEndpoint<C>>) -> Result<Self> {
        let addr = config.bind_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| anyhow!("Registering device node on {} failed: {}", addr, e))?;
        let local = listener.local_addr()?;
        info!("I was assigned address {}.", local);
        info!(
            "Device created on /dev/{} (mode {:o})",
            config.device.name, config.device.mode
        );
        Ok(Self {
            config,
            endpoint,
            listener,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Received shutdown signal");
        })
        .await
    }

    /// Serve until `shutdown` completes.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let chunk_size = self.config.server.chunk_size;

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            debug!("Connection from {}", peer);
                            let endpoint = self.endpoint.clone();
                            tokio::spawn(async move {
                                if let Err(e) = serve_connection(endpoint, stream, peer, chunk_size).await {
                                    warn!("Connection {} ended with error: {}", peer, e);
                                }
                            });
                        }
                        Err(e) => warn!("accept error: {}", e),
                    }
                }
                _ = &mut shutdown => break,
            }
        }

        self.shutdown();
        Ok(())
    }

    fn shutdown(&self) {
        let stats = metrics::snapshot();
        info!(
            "Served {} bytes over {} opens ({} busy, {} writes refused)",
            stats.bytes_served, stats.opens, stats.busy_rejections, stats.write_rejections
        );
        info!("Shutting down.");
        info!("I don't hate you.");
    }
}

async fn serve_connection<C: Clock>(
    endpoint: Arc<DeviceEndpoint<C>>,
    mut stream: TcpStream,
    peer: SocketAddr,
    chunk_size: usize,
) -> io::Result<()> {
    let mut file = match open_device(endpoint.as_ref()) {
        Ok(file) => file,
        Err(e) => {
            stream.write_all(format!("error: {}\n", e).as_bytes()).await?;
            return stream.shutdown().await;
        }
    };

    let pumped = pump(endpoint.as_ref(), &mut file, &mut stream, peer, chunk_size).await;
    let _ = release_device(endpoint.as_ref(), file);
    pumped?;
    stream.shutdown().await
}

async fn pump<C: Clock>(
    endpoint: &DeviceEndpoint<C>,
    file: &mut OpenFile,
    stream: &mut TcpStream,
    peer: SocketAddr,
    chunk_size: usize,
) -> io::Result<()> {
    let mut chunk = vec![0u8; chunk_size.max(1)];
    loop {
        let n = endpoint
            .read(file, &mut chunk)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        if n == 0 {
            metrics::inc_cycles_completed();
            return Ok(());
        }
        debug!("{} <- \"{}\"", peer, escape_chunk(&chunk[..n]));
        metrics::add_bytes_served(n);
        stream.write_all(&chunk[..n]).await?;
    }
}
