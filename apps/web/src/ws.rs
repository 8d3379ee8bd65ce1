//! Notification WebSocket
//!
//! Authenticated socket endpoint bridging the in-process notification
//! hub to the browser. The auth gate runs before the upgrade, so the
//! handler always has a resolved [`CurrentUser`].

use std::sync::Arc;

use auth::middleware::CurrentUser;
use axum::Extension;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use relay::NotificationHub;

pub async fn notifications(
    State(hub): State<Arc<NotificationHub>>,
    Extension(current): Extension<CurrentUser>,
    upgrade: WebSocketUpgrade,
) -> Response {
    let user_id = current.profile.id.clone();
    upgrade.on_upgrade(move |socket| relay_loop(socket, hub, user_id))
}

/// Pump hub notifications to the socket until either side closes.
///
/// Inbound frames are drained but ignored except for close; this channel
/// is push-only.
async fn relay_loop(socket: WebSocket, hub: Arc<NotificationHub>, user_id: String) {
    let mut rx = hub.subscribe(&user_id).await;
    let (mut sink, mut stream) = socket.split();

    tracing::debug!(user_id = %user_id, "Notification socket connected");

    loop {
        tokio::select! {
            note = rx.recv() => {
                let Ok(note) = note else {
                    // Lagged or channel closed; drop the connection and
                    // let the client reconnect for a clean stream
                    break;
                };
                let Ok(body) = serde_json::to_string(&note) else {
                    continue;
                };
                if sink.send(Message::Text(body.into())).await.is_err() {
                    break;
                }
            }
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!(user_id = %user_id, "Notification socket disconnected");
    drop(rx);
    hub.prune().await;
}
