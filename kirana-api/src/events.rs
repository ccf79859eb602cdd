use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::Stream;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::state::AppState;

/// GET /v1/events
/// Store-change notifications as server-sent events, so the presentation
/// layer re-renders on change instead of polling or holding state.
pub async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let receiver = state.store.read().await.subscribe();
    let stream = BroadcastStream::new(receiver).filter_map(|event| match event {
        Ok(event) => Some(Event::default().json_data(&event)),
        // Lagged receivers just skip the missed events
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
