//! Snapshot channel lifecycle integration tests.
//!
//! Tests the application against a scripted WebSocket server:
//! - Reconnect after a server close
//! - Malformed payloads on an open connection
//! - Unreachable endpoint retries
//! - Shutdown
//! - End-to-end rendering

mod integration;
use integration::common::mock_ws::{MockWsServer, Step};
use integration::common::{snapshot_json, test_config};

use refmon::Application;
use refmon_dashboard::{RecordingSurface, StatusTag};
use refmon_ws::ChannelState;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// Spawn `app` and return a trigger that shuts it down.
fn spawn_app(app: Application) -> (oneshot::Sender<()>, JoinHandle<refmon::AppResult<()>>) {
    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(app.run_until(async {
        let _ = rx.await;
    }));
    (tx, handle)
}

/// Poll `condition` until it holds or `limit` elapses.
async fn wait_for<F>(limit: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    timeout(limit, async {
        loop {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .is_ok()
}

/// A server close followed by a valid snapshot on the next connection
/// publishes exactly one update, after the reconnect delay.
#[tokio::test]
async fn test_reconnect_then_single_publish() {
    let server = MockWsServer::start(vec![
        vec![Step::Close],
        vec![Step::Send(snapshot_json("R", 10))],
    ])
    .await;

    let surface = RecordingSurface::new();
    let app = Application::with_surface(test_config(server.url(), 200), surface.clone()).unwrap();
    let bus = app.bus();
    let channel = app.channel();

    let started = Instant::now();
    let (stop, handle) = spawn_app(app);

    assert!(
        wait_for(Duration::from_secs(5), || bus.published() == 1).await,
        "snapshot should be published after reconnect"
    );
    assert!(started.elapsed() >= Duration::from_millis(200));
    assert_eq!(server.connection_count(), 2);
    assert!(channel.stats().reconnects() >= 1);

    // No duplicate publishes while the second connection stays open.
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(bus.published(), 1);
    assert_eq!(surface.len(), 2);
    assert_eq!(channel.state(), ChannelState::Open);

    stop.send(()).unwrap();
    handle.await.unwrap().unwrap();
    server.shutdown().await;
}

/// A malformed frame is dropped without closing the connection.
#[tokio::test]
async fn test_malformed_payload_keeps_connection() {
    let server = MockWsServer::start(vec![vec![
        Step::Send("{not json".to_string()),
        Step::Send(r#"{"reflector_name": "R"}"#.to_string()),
        Step::Send(snapshot_json("R", 10)),
    ]])
    .await;

    let app =
        Application::with_surface(test_config(server.url(), 200), RecordingSurface::new()).unwrap();
    let bus = app.bus();
    let channel = app.channel();
    let (stop, handle) = spawn_app(app);

    assert!(wait_for(Duration::from_secs(5), || bus.published() == 1).await);
    assert_eq!(channel.stats().parse_failures(), 2);
    assert_eq!(channel.stats().snapshots_received(), 1);
    assert_eq!(server.connection_count(), 1);
    assert_eq!(channel.state(), ChannelState::Open);

    stop.send(()).unwrap();
    handle.await.unwrap().unwrap();
    server.shutdown().await;
}

/// An endpoint nobody listens on is retried until shutdown.
#[tokio::test]
async fn test_unreachable_endpoint_keeps_retrying() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let app = Application::with_surface(
        test_config(format!("ws://{addr}/ws"), 50),
        RecordingSurface::new(),
    )
    .unwrap();
    let channel = app.channel();
    let (stop, handle) = spawn_app(app);

    assert!(
        wait_for(Duration::from_secs(5), || {
            channel.stats().connect_attempts() >= 3
        })
        .await
    );
    assert!(channel.stats().reconnects() >= 2);

    stop.send(()).unwrap();
    timeout(Duration::from_secs(2), handle)
        .await
        .expect("shutdown during retry should be prompt")
        .unwrap()
        .unwrap();
    assert_eq!(channel.state(), ChannelState::Disconnected);
}

/// Shutdown closes an open connection and ends in `Disconnected`.
#[tokio::test]
async fn test_shutdown_disconnects() {
    let server = MockWsServer::start(vec![vec![Step::Send(snapshot_json("R", 1))]]).await;

    let app =
        Application::with_surface(test_config(server.url(), 200), RecordingSurface::new()).unwrap();
    let bus = app.bus();
    let channel = app.channel();
    let (stop, handle) = spawn_app(app);

    assert!(wait_for(Duration::from_secs(5), || bus.published() == 1).await);

    stop.send(()).unwrap();
    handle.await.unwrap().unwrap();
    assert_eq!(channel.state(), ChannelState::Disconnected);
    assert!(channel.is_shutdown());

    // The client never sends application messages.
    assert!(server.received_messages().await.is_empty());
    assert_eq!(server.connection_count(), 1);
    server.shutdown().await;
}

/// Snapshots flow through tracker and views: the first frame is Loading,
/// a counter increase on the next one shows the peer as Active.
#[tokio::test]
async fn test_end_to_end_render() {
    let server = MockWsServer::start(vec![vec![
        Step::Send(snapshot_json("M17-M17", 10)),
        Step::Send(snapshot_json("M17-M17", 25)),
    ]])
    .await;

    let surface = RecordingSurface::new();
    let app = Application::with_surface(test_config(server.url(), 200), surface.clone()).unwrap();
    let bus = app.bus();
    let tracker = app.tracker();
    // Tracker plus one renderer per view.
    assert_eq!(bus.subscriber_count(), 3);
    let (stop, handle) = spawn_app(app);

    assert!(wait_for(Duration::from_secs(5), || bus.published() == 2).await);

    let frames = surface.frames();
    assert_eq!(frames.len(), 4);
    assert_eq!(frames[0].view, "summary");
    assert_eq!(frames[1].view, "modules");
    assert_eq!(frames[0].title, "M17-M17 Dashboard");
    assert!(frames[1].statuses().iter().all(|s| **s == StatusTag::Loading));

    let modules = surface.last_of("modules").unwrap();
    let section = modules.section("Module A (Peers: 1)").unwrap();
    assert_eq!(section.status, Some(StatusTag::Idle));
    assert_eq!(section.table.column(3), vec!["Active"]);

    let summary = surface.last_of("summary").unwrap();
    assert_eq!(summary.stat("Uptime"), Some("1h 1m 1s"));
    assert_eq!(summary.section("Modules").unwrap().table.column(2), vec!["Inactive"]);

    assert!(tracker.read().is_warmed_up());
    assert_eq!(tracker.read().last_packets("N0CALL"), Some(25));

    stop.send(()).unwrap();
    handle.await.unwrap().unwrap();
    server.shutdown().await;
}
