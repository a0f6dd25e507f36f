//! WebSocket transport.
//!
//! Each socket gets a [`ChannelConnection`]; a writer task drains its
//! channel into the socket while the reader loop feeds frames to the
//! [`SessionHandler`].

use crate::connection::{ChannelConnection, ConnectionHandle, Outbound};
use crate::messages::CommunicationErrorMessage;
use crate::{ConnectParams, Message, SessionHandler};
use axum::{
    Router,
    extract::{
        Path, Query, State,
        ws::{Message as Frame, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, instrument, warn};

/// Builds the router serving `GET /chess/{user_id}`.
pub fn router(handler: SessionHandler) -> Router {
    Router::new()
        .route("/chess/{user_id}", get(chess_socket))
        .with_state(handler)
}

async fn chess_socket(
    ws: WebSocketUpgrade,
    Path(user_id): Path<String>,
    Query(params): Query<ConnectParams>,
    State(handler): State<SessionHandler>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, user_id, params, handler))
}

#[instrument(skip(socket, handler, params))]
async fn handle_socket(
    socket: WebSocket,
    user_id: String,
    params: ConnectParams,
    handler: SessionHandler,
) {
    info!("Player connected");
    let (sink, mut stream) = socket.split();
    let (connection, outbound) = ChannelConnection::new();
    let writer = tokio::spawn(write_frames(sink, outbound));
    let connection: ConnectionHandle = Arc::new(connection);

    if handler.on_player_connect(user_id.clone(), connection.clone(), params) {
        while let Some(Ok(frame)) = stream.next().await {
            let text = match frame {
                Frame::Text(text) => text,
                Frame::Close(_) => break,
                _ => continue,
            };
            match serde_json::from_str::<Message>(text.as_str()) {
                Ok(message) => {
                    if !handler.on_player_message(&user_id, &connection, message) {
                        break;
                    }
                }
                Err(error) => {
                    warn!(%error, "Unparseable frame");
                    let reply = CommunicationErrorMessage {
                        user_message: "That message could not be understood.".to_string(),
                    };
                    if let Err(error) = connection.send(reply.into()) {
                        warn!(%error, "Failed to report unparseable frame");
                    }
                }
            }
        }
    }

    handler.on_player_disconnect(&user_id, &connection);
    connection.close();
    if let Err(error) = writer.await {
        warn!(%error, "Writer task failed");
    }
    info!("Player disconnected");
}

/// Drains queued frames into the socket until asked to close or the peer
/// goes away.
async fn write_frames<S>(mut sink: S, mut outbound: UnboundedReceiver<Outbound>)
where
    S: SinkExt<Frame> + Unpin,
{
    while let Some(next) = outbound.recv().await {
        match next {
            Outbound::Message(message) => {
                let json = match serde_json::to_string(&message) {
                    Ok(json) => json,
                    Err(error) => {
                        warn!(%error, "Failed to encode outbound message");
                        continue;
                    }
                };
                if sink.send(Frame::Text(json.into())).await.is_err() {
                    debug!("Socket closed while sending");
                    break;
                }
            }
            Outbound::Close => {
                // Peer may already be gone.
                let _ = sink.send(Frame::Close(None)).await;
                break;
            }
        }
    }
}
