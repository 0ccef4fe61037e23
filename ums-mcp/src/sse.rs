//! Server-Sent Events framing for JSON-RPC responses
//!
//! Every response becomes one `data: <json>` event; the stream always ends
//! with a `data: [DONE]` sentinel event.

use axum::response::sse::Event;
use futures::stream::{self, Stream, StreamExt};

use crate::protocol::JsonRpcResponse;

/// Payload of the terminating event
pub const DONE_SENTINEL: &str = "[DONE]";

/// Encode one response as an SSE event
pub fn encode(message: &JsonRpcResponse) -> Result<Event, axum::Error> {
    Event::default().json_data(message)
}

/// The terminating `[DONE]` event
pub fn done() -> Event {
    Event::default().data(DONE_SENTINEL)
}

/// Frame a stream of responses, preserving input order, then append the
/// sentinel. Messages are emitted as soon as the input stream yields them.
pub fn frame<S>(messages: S) -> impl Stream<Item = Result<Event, axum::Error>> + Send
where
    S: Stream<Item = JsonRpcResponse> + Send,
{
    messages
        .map(|message| encode(&message))
        .chain(stream::once(async { Ok(done()) }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::{IntoResponse, Sse};
    use serde_json::json;

    async fn render<S>(messages: S) -> String
    where
        S: Stream<Item = JsonRpcResponse> + Send + 'static,
    {
        let response = Sse::new(frame(messages)).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_stream_is_only_sentinel() {
        let body = render(stream::empty::<JsonRpcResponse>()).await;
        assert_eq!(body, "data: [DONE]\n\n");
    }

    #[tokio::test]
    async fn test_messages_keep_order() {
        let first = JsonRpcResponse::success(Some(json!(1)), json!({"n": 1}));
        let second = JsonRpcResponse::success(Some(json!(2)), json!({"n": 2}));
        let expected = format!(
            "data: {}\n\ndata: {}\n\ndata: [DONE]\n\n",
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );

        let body = render(stream::iter([first, second])).await;

        assert_eq!(body, expected);
    }

    #[tokio::test]
    async fn test_deferred_message_framed_before_sentinel() {
        let messages = stream::once(async {
            tokio::task::yield_now().await;
            JsonRpcResponse::success(Some(json!("late")), json!({}))
        });

        let body = render(messages).await;

        let frames: Vec<&str> = body.split("\n\n").filter(|f| !f.is_empty()).collect();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].contains("\"id\":\"late\""));
        assert_eq!(frames[1], "data: [DONE]");
    }
}
