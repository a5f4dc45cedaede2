//! WebSocket socket task.
//!
//! [`WsConnector`] dials the counter service with tokio-tungstenite and
//! spawns one task per connection attempt. The task owns the socket for its
//! whole life: it pumps inbound frames out as [`TransportEvent`]s and
//! drains [`TransportCommand`]s from the handle, so nothing else ever
//! touches the stream.
//!
//! A dial that fails emits `Errored` followed by `Closed`, the same
//! sequence a live socket produces when it dies, so the manager has a
//! single code path for both.

// ============================================================================
// Imports
// ============================================================================

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};
use url::Url;

use super::{Connector, TransportCommand, TransportEvent, TransportHandle};

// ============================================================================
// WsConnector
// ============================================================================

/// Production [`Connector`] backed by tokio-tungstenite.
///
/// Each [`connect`](Connector::connect) call spawns an independent socket
/// task; the connector itself is stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

impl Connector for WsConnector {
    fn connect(
        &self,
        endpoint: &Url,
        events: mpsc::UnboundedSender<TransportEvent>,
    ) -> TransportHandle {
        let (handle, command_rx) = TransportHandle::pair();
        tokio::spawn(run_socket(endpoint.clone(), command_rx, events));
        handle
    }
}

// ============================================================================
// Socket Task
// ============================================================================

/// Dials the endpoint and services one connection until it ends.
async fn run_socket(
    endpoint: Url,
    mut command_rx: mpsc::UnboundedReceiver<TransportCommand>,
    events: mpsc::UnboundedSender<TransportEvent>,
) {
    let ws_stream = match connect_async(endpoint.as_str()).await {
        Ok((ws_stream, _response)) => ws_stream,
        Err(e) => {
            warn!(endpoint = %endpoint, error = %e, "WebSocket connect failed");
            let _ = events.send(TransportEvent::Errored(e.to_string()));
            let _ = events.send(TransportEvent::Closed);
            return;
        }
    };

    debug!(endpoint = %endpoint, "WebSocket connection established");
    let _ = events.send(TransportEvent::Opened);

    let (mut ws_write, mut ws_read) = ws_stream.split();

    loop {
        tokio::select! {
            // Inbound traffic from the service
            message = ws_read.next() => {
                match message {
                    Some(Ok(Message::Text(text))) => {
                        let _ = events.send(TransportEvent::Frame(text.to_string()));
                    }

                    Some(Ok(Message::Close(_))) => {
                        debug!("WebSocket closed by remote");
                        let _ = events.send(TransportEvent::Closed);
                        break;
                    }

                    Some(Err(e)) => {
                        warn!(error = %e, "WebSocket read error");
                        let _ = events.send(TransportEvent::Errored(e.to_string()));
                        let _ = events.send(TransportEvent::Closed);
                        break;
                    }

                    None => {
                        debug!("WebSocket stream ended");
                        let _ = events.send(TransportEvent::Closed);
                        break;
                    }

                    // Ignore Binary, Ping, Pong
                    _ => {}
                }
            }

            // Commands from the transport handle
            command = command_rx.recv() => {
                match command {
                    Some(TransportCommand::Send(frame)) => {
                        if let Err(e) = ws_write.send(Message::Text(frame.into())).await {
                            warn!(error = %e, "WebSocket send failed");
                            let _ = events.send(TransportEvent::Errored(e.to_string()));
                        }
                    }

                    Some(TransportCommand::Close) | None => {
                        debug!("closing WebSocket");
                        let _ = ws_write.close().await;
                        let _ = events.send(TransportEvent::Closed);
                        break;
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    #[tokio::test]
    async fn test_loopback_session() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let mut ws = accept_async(stream).await.expect("upgrade");

            ws.send(Message::Text(r#"{"type":"update","value":7}"#.into()))
                .await
                .expect("send update");

            let frame = ws.next().await.expect("frame").expect("frame ok");
            assert_eq!(
                frame.into_text().expect("text").as_str(),
                r#"{"action":"increment"}"#
            );

            ws.close(None).await.expect("close");
        });

        let endpoint = Url::parse(&format!("ws://{addr}/v1/counter")).expect("url");
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let handle = WsConnector.connect(&endpoint, events_tx);

        assert_eq!(events_rx.recv().await, Some(TransportEvent::Opened));
        assert_eq!(
            events_rx.recv().await,
            Some(TransportEvent::Frame(
                r#"{"type":"update","value":7}"#.to_string()
            ))
        );

        handle
            .send(r#"{"action":"increment"}"#.to_string())
            .expect("handle ready");

        assert_eq!(events_rx.recv().await, Some(TransportEvent::Closed));
        server.await.expect("server task");
    }

    #[tokio::test]
    async fn test_dial_failure_emits_error_then_closed() {
        // Grab a free port, then close the listener so the dial is refused.
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let endpoint = Url::parse(&format!("ws://{addr}")).expect("url");
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let _handle = WsConnector.connect(&endpoint, events_tx);

        assert!(matches!(
            events_rx.recv().await,
            Some(TransportEvent::Errored(_))
        ));
        assert_eq!(events_rx.recv().await, Some(TransportEvent::Closed));
    }

    #[tokio::test]
    async fn test_local_close_emits_closed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let mut ws = accept_async(stream).await.expect("upgrade");

            // Drain until the client goes away.
            while let Some(Ok(_)) = ws.next().await {}
        });

        let endpoint = Url::parse(&format!("ws://{addr}")).expect("url");
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let handle = WsConnector.connect(&endpoint, events_tx);

        assert_eq!(events_rx.recv().await, Some(TransportEvent::Opened));

        handle.close();
        assert_eq!(events_rx.recv().await, Some(TransportEvent::Closed));
        server.await.expect("server task");
    }
}
