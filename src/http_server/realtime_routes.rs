//! Realtime HTTP Routes and WebSocket Handler
//!
//! `GET /ws/forms/:id` upgrades to a WebSocket that receives one
//! `response_created` frame per accepted submission. Inbound frames are
//! ignored apart from ping and close.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;

use super::response::{run_blocking, ApiResult};
use crate::core::FormService;
use crate::observability::{log_event_with_fields, Event};
use crate::realtime::{RealtimeError, Subscription};

#[derive(Debug, Serialize)]
pub struct FormSubscribers {
    pub form_id: String,
    pub subscribers: usize,
}

#[derive(Debug, Serialize)]
pub struct RealtimeStatsResponse {
    pub total_subscribers: usize,
    pub forms: Vec<FormSubscribers>,
}

/// Create realtime routes with WebSocket support
pub fn realtime_routes(service: Arc<FormService>) -> Router {
    Router::new()
        .route("/ws/forms/:id", get(websocket_handler))
        .route("/realtime/stats", get(stats_handler))
        .with_state(service)
}

/// Handle WebSocket upgrade request. Unknown forms are refused before upgrading.
async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(form_id): Path<String>,
    State(service): State<Arc<FormService>>,
) -> ApiResult<Response> {
    let (lookup, id) = (Arc::clone(&service), form_id.clone());
    run_blocking(move || lookup.load_form(&id)).await?;
    Ok(ws
        .on_upgrade(move |socket| handle_websocket(socket, service, form_id))
        .into_response())
}

/// Pump frames from the registry to the socket until either side goes away
async fn handle_websocket(socket: WebSocket, service: Arc<FormService>, form_id: String) {
    let Subscription {
        handle,
        mut receiver,
    } = service.registry().subscribe(&form_id);
    service.metrics().increment_subscribers_connected();

    let (mut sender, mut inbound) = socket.split();

    loop {
        tokio::select! {
            outbound = receiver.recv() => match outbound {
                Some(message) => {
                    let Ok(text) = message.to_json() else { continue };
                    if sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                // Evicted by the registry; our receiver is alive, so the buffer filled up
                None => {
                    let err = RealtimeError::SubscriberLagging(handle.id());
                    let close = CloseFrame {
                        code: err.close_code(),
                        reason: err.to_string().into(),
                    };
                    let _ = sender.send(Message::Close(Some(close))).await;
                    break;
                }
            },
            incoming = inbound.next() => match incoming {
                Some(Ok(Message::Ping(data))) => {
                    if sender.send(Message::Pong(data)).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    service.registry().unsubscribe(&handle);
    log_event_with_fields(
        Event::SubscriberDisconnected,
        &[
            ("form_id", handle.form_id()),
            ("subscriber", &handle.id().to_string()),
        ],
    );
}

/// Active observers per form
async fn stats_handler(State(service): State<Arc<FormService>>) -> Json<RealtimeStatsResponse> {
    let forms: Vec<FormSubscribers> = service
        .registry()
        .stats()
        .into_iter()
        .map(|(form_id, subscribers)| FormSubscribers {
            form_id,
            subscribers,
        })
        .collect();
    let total_subscribers = forms.iter().map(|f| f.subscribers).sum();

    Json(RealtimeStatsResponse {
        total_subscribers,
        forms,
    })
}
