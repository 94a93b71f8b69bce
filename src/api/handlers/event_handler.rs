//! Server-sent change notifications.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use std::{convert::Infallible, time::Duration};

use crate::api::AppState;
use crate::config::SSE_KEEP_ALIVE_SECONDS;

/// Subscribe to `staffUpdate`, `importantInfoUpdate` and `themeChange`
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    responses((status = 200, description = "Event stream", content_type = "text/event-stream", body = String))
)]
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!(
        subscribers = state.events.subscriber_count() + 1,
        "SSE client connected"
    );

    Sse::new(state.events.stream())
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(SSE_KEEP_ALIVE_SECONDS)))
}
