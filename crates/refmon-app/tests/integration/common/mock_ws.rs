//! Mock WebSocket server for integration tests.
//!
//! Each accepted connection plays the next script from the list:
//! - `Step::Send` pushes a text frame
//! - `Step::Close` sends a close frame and drops the connection
//!
//! A connection whose script ends without `Close` stays open and records
//! any text frames the client sends. Connections beyond the scripts just
//! stay open.

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::{accept_async, tungstenite::Message};

#[derive(Debug, Clone)]
pub enum Step {
    Send(String),
    Close,
}

/// A scripted mock WebSocket server.
pub struct MockWsServer {
    addr: SocketAddr,
    shutdown_tx: mpsc::Sender<()>,
    received: Arc<Mutex<Vec<String>>>,
    connections: Arc<AtomicUsize>,
}

impl MockWsServer {
    /// Start a server on an available port.
    pub async fn start(scripts: Vec<Vec<Step>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let received: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let connections = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let received_clone = received.clone();
        let connections_clone = connections.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    Ok((stream, _)) = listener.accept() => {
                        let index = connections_clone.fetch_add(1, Ordering::SeqCst);
                        let script = scripts.get(index).cloned().unwrap_or_default();
                        tokio::spawn(handle_connection(stream, script, received_clone.clone()));
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            shutdown_tx,
            received,
            connections,
        }
    }

    /// Snapshot endpoint URL.
    pub fn url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Number of connections accepted so far.
    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Text frames sent by clients.
    pub async fn received_messages(&self) -> Vec<String> {
        self.received.lock().await.clone()
    }

    /// Stop accepting connections.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

async fn handle_connection(stream: TcpStream, script: Vec<Step>, received: Arc<Mutex<Vec<String>>>) {
    let Ok(mut ws) = accept_async(stream).await else {
        return;
    };

    for step in script {
        match step {
            Step::Send(text) => {
                if ws.send(Message::Text(text)).await.is_err() {
                    return;
                }
            }
            Step::Close => {
                let _ = ws.close(None).await;
                return;
            }
        }
    }

    while let Some(Ok(msg)) = ws.next().await {
        match msg {
            Message::Text(text) => received.lock().await.push(text),
            Message::Close(_) => break,
            _ => {}
        }
    }
}
