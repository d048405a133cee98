//! Integration tests for the WebSocket transport.

use buzzline_transport::{Connection, Transport, WebSocketTransport};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

async fn bind_local() -> (WebSocketTransport, String) {
    let transport = WebSocketTransport::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let addr = transport
        .local_addr()
        .expect("should have local addr")
        .to_string();
    (transport, addr)
}

#[tokio::test]
async fn test_accept_captures_request_path() {
    let (mut transport, addr) = bind_local().await;

    let client = tokio::spawn(async move {
        let (ws, _) = tokio_tungstenite::connect_async(format!(
            "ws://{addr}/game/lobby"
        ))
        .await
        .expect("client connect");
        ws
    });

    let conn = transport.accept().await.expect("accept");
    assert_eq!(conn.path(), "/game/lobby");

    let _ws = client.await.unwrap();
}

#[tokio::test]
async fn test_send_and_recv_text_round_trip() {
    let (mut transport, addr) = bind_local().await;

    let client = tokio::spawn(async move {
        let (mut ws, _) = tokio_tungstenite::connect_async(format!(
            "ws://{addr}/game/echo"
        ))
        .await
        .expect("client connect");
        ws.send(Message::text("hello server"))
            .await
            .expect("client send");
        let reply = ws.next().await.unwrap().expect("client recv");
        reply.into_text().expect("text frame").as_str().to_owned()
    });

    let conn = transport.accept().await.expect("accept");
    let inbound = conn.recv().await.expect("recv").expect("open");
    assert_eq!(inbound, "hello server");

    conn.send("hello client").await.expect("send");
    assert_eq!(client.await.unwrap(), "hello client");
}

#[tokio::test]
async fn test_recv_returns_none_on_client_close() {
    let (mut transport, addr) = bind_local().await;

    let client = tokio::spawn(async move {
        let (mut ws, _) = tokio_tungstenite::connect_async(format!(
            "ws://{addr}/game/bye"
        ))
        .await
        .expect("client connect");
        ws.close(None).await.expect("client close");
    });

    let conn = transport.accept().await.expect("accept");
    let inbound = conn.recv().await.expect("recv");
    assert!(inbound.is_none(), "clean close should yield None");

    client.await.unwrap();
}

#[tokio::test]
async fn test_connection_ids_are_unique() {
    let (mut transport, addr) = bind_local().await;

    let addr2 = addr.clone();
    let clients = tokio::spawn(async move {
        let a = tokio_tungstenite::connect_async(format!("ws://{addr2}/a"))
            .await
            .expect("connect a");
        let b = tokio_tungstenite::connect_async(format!("ws://{addr2}/b"))
            .await
            .expect("connect b");
        (a, b)
    });

    let c1 = transport.accept().await.expect("accept 1");
    let c2 = transport.accept().await.expect("accept 2");
    assert_ne!(c1.id(), c2.id());

    let _ws = clients.await.unwrap();
}
