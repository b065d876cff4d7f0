//! WebSocket handler for notification clients
//!
//! Streams booking events to UI clients as JSON. Fire-and-forget from the
//! engine's point of view; a slow client only lags its own stream.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::select;
use tracing::{debug, error, info, warn};

use crate::notifications::{EventMessage, SharedEventBus};

/// Query parameters for filtering events
#[derive(Debug, Deserialize)]
pub struct EventFilter {
    /// Filter by unit type ID (optional)
    pub unit_type_id: Option<i32>,
    /// Filter by event types (comma-separated, optional)
    pub event_types: Option<String>,
}

impl EventFilter {
    /// Check if event matches the filter
    pub fn matches(&self, event: &EventMessage) -> bool {
        if let Some(unit_type_id) = self.unit_type_id {
            if event.event.unit_type_id() != unit_type_id {
                return false;
            }
        }

        if let Some(ref types) = self.event_types {
            let allowed_types: Vec<&str> = types.split(',').map(|s| s.trim()).collect();
            if !allowed_types.contains(&event.event.event_type()) {
                return false;
            }
        }

        true
    }
}

/// State for notification WebSocket handler
#[derive(Clone)]
pub struct NotificationState {
    pub event_bus: SharedEventBus,
}

/// WebSocket upgrade handler for notifications
pub async fn ws_events_handler(
    ws: WebSocketUpgrade,
    State(state): State<NotificationState>,
    Query(filter): Query<EventFilter>,
) -> impl IntoResponse {
    info!(
        "New notification WebSocket connection: unit_type={:?}, event_types={:?}",
        filter.unit_type_id, filter.event_types
    );

    ws.on_upgrade(move |socket| handle_events_socket(socket, state, filter))
}

/// Handle a WebSocket connection for notifications
async fn handle_events_socket(socket: WebSocket, state: NotificationState, filter: EventFilter) {
    let (mut sender, mut receiver) = socket.split();
    let mut subscriber = state.event_bus.subscribe();

    // Send welcome message
    let welcome = serde_json::json!({
        "type": "connected",
        "message": "Connected to booking event stream",
        "filter": {
            "unit_type_id": filter.unit_type_id,
            "event_types": filter.event_types
        }
    });

    if let Err(e) = sender.send(Message::Text(welcome.to_string().into())).await {
        error!("Failed to send welcome message: {}", e);
        return;
    }

    loop {
        select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        debug!("Received text message: {}", text);
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if let Err(e) = sender.send(Message::Pong(data)).await {
                            error!("Failed to send pong: {}", e);
                            break;
                        }
                    }
                    Some(Ok(Message::Pong(_))) => {
                        debug!("Received pong");
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("Client sent close");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    None => {
                        info!("WebSocket stream ended");
                        break;
                    }
                    _ => {}
                }
            }

            event = subscriber.recv() => {
                match event {
                    Some(event_msg) => {
                        if !filter.matches(&event_msg) {
                            continue;
                        }

                        match serde_json::to_string(&event_msg) {
                            Ok(json) => {
                                if let Err(e) = sender.send(Message::Text(json.into())).await {
                                    error!("Failed to send event: {}", e);
                                    break;
                                }
                                debug!("Event sent to client: {}", event_msg.event.event_type());
                            }
                            Err(e) => {
                                error!("Failed to serialize event: {}", e);
                            }
                        }
                    }
                    None => {
                        warn!("Event bus closed");
                        break;
                    }
                }
            }
        }
    }

    info!("Notification WebSocket client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::events::{Event, ReservationLifecycleEvent};
    use chrono::Utc;

    fn cancelled_event(unit_type_id: i32) -> EventMessage {
        EventMessage::new(Event::ReservationCancelled(ReservationLifecycleEvent {
            reservation_id: "r-1".into(),
            unit_type_id,
            status: "Cancelled".into(),
            timestamp: Utc::now(),
        }))
    }

    #[test]
    fn filter_by_unit_type() {
        let filter = EventFilter {
            unit_type_id: Some(7),
            event_types: None,
        };
        assert!(filter.matches(&cancelled_event(7)));
        assert!(!filter.matches(&cancelled_event(8)));
    }

    #[test]
    fn filter_by_event_type_list() {
        let filter = EventFilter {
            unit_type_id: None,
            event_types: Some("reservation_admitted, reservation_cancelled".into()),
        };
        assert!(filter.matches(&cancelled_event(1)));

        let narrow = EventFilter {
            unit_type_id: None,
            event_types: Some("reservation_admitted".into()),
        };
        assert!(!narrow.matches(&cancelled_event(1)));
    }
}
