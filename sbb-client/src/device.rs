//! Fake SBB controller for client tests
//!
//! Listens on a random localhost port and answers every received command
//! with the lines returned by a responder closure. An empty answer leaves
//! the client waiting, which is how tests provoke timeouts.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

type Responder = dyn Fn(&str) -> Vec<String> + Send + Sync;

pub(crate) struct FakeDevice {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<String>>>,
    connections: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl FakeDevice {
    /// Start a device answering each command with the responder's lines
    pub(crate) async fn start<F>(respond: F) -> Self
    where
        F: Fn(&str) -> Vec<String> + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let received = Arc::new(Mutex::new(Vec::new()));
        let connections = Arc::new(AtomicUsize::new(0));
        let respond: Arc<Responder> = Arc::new(respond);

        let task = {
            let received = received.clone();
            let connections = connections.clone();
            tokio::spawn(async move {
                loop {
                    let Ok((stream, _)) = listener.accept().await else {
                        return;
                    };
                    connections.fetch_add(1, Ordering::SeqCst);
                    let received = received.clone();
                    let respond = respond.clone();
                    tokio::spawn(async move {
                        let (read_half, mut write_half) = stream.into_split();
                        let mut lines = BufReader::new(read_half).lines();
                        while let Ok(Some(command)) = lines.next_line().await {
                            received.lock().unwrap().push(command.clone());
                            for line in respond(&command) {
                                let framed = format!("{}\r\n", line);
                                if write_half.write_all(framed.as_bytes()).await.is_err() {
                                    return;
                                }
                            }
                        }
                    });
                }
            })
        };

        Self {
            addr,
            received,
            connections,
            task,
        }
    }

    pub(crate) fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Every command received so far, across all connections
    pub(crate) fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    /// Number of accepted connections
    pub(crate) fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

impl Drop for FakeDevice {
    fn drop(&mut self) {
        self.task.abort();
    }
}
