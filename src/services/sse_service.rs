use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::{
    broadcast::{self, error::RecvError},
    mpsc,
};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

use crate::{
    dto::{
        game::GameStateSnapshot,
        sse::{ServerEvent, StateChangedEvent},
    },
    services::sse_events::EVENT_STATE_CHANGED,
    state::SharedState,
};

/// Subscribe to the live-sync stream, returning the receiver together with the events a new
/// client must see first.
///
/// The receiver is created before the initial snapshot is taken, so an update racing with
/// the connection is delivered twice rather than lost.
pub fn subscribe(state: &SharedState) -> (broadcast::Receiver<ServerEvent>, Vec<ServerEvent>) {
    let receiver = state.sse().subscribe();
    let snapshot = StateChangedEvent(GameStateSnapshot::from(state.snapshot().as_ref()));
    let initial = match ServerEvent::json(Some(EVENT_STATE_CHANGED.to_string()), &snapshot) {
        Ok(event) => vec![event],
        Err(err) => {
            warn!(error = %err, "failed to serialize initial snapshot");
            Vec::new()
        }
    };
    (receiver, initial)
}

fn to_event(payload: ServerEvent) -> Event {
    let event = Event::default().data(payload.data);
    match payload.event {
        Some(name) => event.event(name),
        None => event,
    }
}

/// Convert a broadcast receiver into an SSE response, sending `initial` first and then
/// forwarding events until the client disconnects.
pub fn to_sse_stream(
    mut receiver: broadcast::Receiver<ServerEvent>,
    initial: Vec<ServerEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    tokio::spawn(async move {
        for payload in initial {
            if tx.send(Ok(to_event(payload))).await.is_err() {
                return;
            }
        }

        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(payload) => {
                            if tx.send(Ok(to_event(payload))).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            // Keep the stream alive; the next state.changed carries the full snapshot.
                            debug!(skipped, "SSE client lagging behind");
                            continue;
                        }
                    }
                }
            }
        }

        info!("SSE stream disconnected");
    });

    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
