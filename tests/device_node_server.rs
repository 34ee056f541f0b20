use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use isfri::config::Config;
use isfri::device::{DeviceEndpoint, FileOperations, FixedClock};
use isfri::host::client::probe;
use isfri::host::server::DeviceServer;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
mod common;

struct Node {
    addr: SocketAddr,
    endpoint: Arc<DeviceEndpoint<FixedClock>>,
    stop: oneshot::Sender<()>,
    task: tokio::task::JoinHandle<anyhow::Result<()>>,
}

async fn start_node(day: u32, chunk_size: usize) -> Node {
    let mut config = Config::default();
    config.server.bind = "127.0.0.1:0".to_string();
    config.server.chunk_size = chunk_size;
    config.logging.file = None;

    let endpoint = Arc::new(common::device_on(day));
    let server = DeviceServer::bind(config, endpoint.clone())
        .await
        .expect("bind");
    let addr = server.local_addr().expect("local addr");
    let (stop, rx) = oneshot::channel::<()>();
    let task = tokio::spawn(server.run_until(async {
        let _ = rx.await;
    }));
    Node {
        addr,
        endpoint,
        stop,
        task,
    }
}

const WAIT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn serves_whole_message_in_chunks() {
    let node = start_node(15, 2).await;

    let mut stream = TcpStream::connect(node.addr).await.unwrap();
    let mut got = Vec::new();
    tokio::time::timeout(WAIT, stream.read_to_end(&mut got))
        .await
        .expect("timeout")
        .unwrap();
    assert_eq!(got, b"IT IS!\n");

    // released before the connection was closed
    assert!(!node.endpoint.is_open());

    node.stop.send(()).unwrap();
    node.task.await.unwrap().unwrap();
}

#[tokio::test]
async fn busy_while_someone_holds_the_device() {
    let node = start_node(17, 4).await;

    let held = node.endpoint.open().expect("open in test");
    let report = probe(node.addr, WAIT).await.unwrap();
    assert_eq!(report.status, "busy");
    assert_eq!(report.message, "error: device or resource busy\n");
    assert!(!report.is_ok());

    node.endpoint.release(held).unwrap();
    let report = probe(node.addr, WAIT).await.unwrap();
    assert!(report.is_ok());
    assert_eq!(report.message, "No, but it's still the weekend!\n");
    assert_eq!(report.bytes, 32);

    node.stop.send(()).unwrap();
    node.task.await.unwrap().unwrap();
}

#[tokio::test]
async fn sequential_clients_each_get_a_fresh_cycle() {
    let node = start_node(11, 80).await;
    for _ in 0..5 {
        let report = probe(node.addr, WAIT).await.unwrap();
        assert_eq!(report.message, "Nope.\n");
    }
    assert!(!node.endpoint.is_open());

    node.stop.send(()).unwrap();
    node.task.await.unwrap().unwrap();
}

#[tokio::test]
async fn probe_times_out_or_fails_without_node() {
    // Bind then drop to get a port nobody is listening on.
    let addr = {
        let l = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        l.local_addr().unwrap()
    };
    assert!(probe(addr, Duration::from_millis(500)).await.is_err());
}
