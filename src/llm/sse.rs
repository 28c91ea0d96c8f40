//! Server-Sent Events framing for streamed chat completions.
//!
//! OpenAI-compatible endpoints deliver streamed replies as newline-delimited
//! `data:` frames terminated by `data: [DONE]`.  TCP does not align network
//! chunks with frame boundaries, so [`SseLineBuffer`] accumulates partial
//! lines across `bytes_stream()` chunks and emits complete events only when a
//! full line is available.  [`delta_stream`] wraps a raw byte stream into a
//! stream of text deltas ready for display.

use std::collections::VecDeque;
use std::mem;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::stream::unfold;
use futures_util::{Stream, StreamExt};

use super::client::{ChatError, ReplyStream};

// ---------------------------------------------------------------------------
// SseEvent / SseLineBuffer
// ---------------------------------------------------------------------------

/// A parsed SSE event from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A `data:` payload with the JSON string (prefix stripped).
    Data(String),
    /// The `data: [DONE]` termination signal.
    Done,
}

/// Line-buffering SSE parser that handles partial lines across TCP chunk
/// boundaries.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    /// Accumulated bytes not yet terminated by a newline.
    buffer: String,
}

impl SseLineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes from a network chunk, returning any complete events.
    ///
    /// Complete lines (terminated by `\n`) are extracted and parsed; a
    /// trailing partial line stays in the buffer for the next `feed` call.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        let text = String::from_utf8_lossy(bytes);
        self.buffer.push_str(&text);

        let mut events = Vec::new();

        while let Some(newline_pos) = self.buffer.find('\n') {
            let line = self.buffer[..newline_pos].trim_end_matches('\r').to_owned();
            self.buffer = self.buffer[newline_pos + 1..].to_owned();

            if let Some(event) = parse_line(&line) {
                events.push(event);
            }
        }

        events
    }

    /// Flush any remaining buffered content as a final event.
    ///
    /// Called when the byte stream ends with a partial line (no trailing
    /// newline) still in the buffer.
    pub fn flush(&mut self) -> Option<SseEvent> {
        let remaining = mem::take(&mut self.buffer);
        parse_line(&remaining)
    }
}

fn parse_line(line: &str) -> Option<SseEvent> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed == "data: [DONE]" {
        return Some(SseEvent::Done);
    }
    // Non-data SSE fields (event:, id:, retry:, comments) are ignored.
    let data = trimmed.strip_prefix("data: ")?;
    if data.trim().is_empty() {
        return None;
    }
    Some(SseEvent::Data(data.to_owned()))
}

// ---------------------------------------------------------------------------
// Delta extraction
// ---------------------------------------------------------------------------

/// Extract the text delta from one streamed chat-completion payload.
///
/// Returns `None` for metadata-only frames (role announcements, finish
/// markers) and for unparseable payloads — a single bad frame must not kill
/// the whole stream.
pub fn extract_delta(json_str: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(json_str).ok()?;
    let delta = value["choices"][0]["delta"]["content"].as_str()?;
    if delta.is_empty() {
        return None;
    }
    Some(delta.to_owned())
}

// ---------------------------------------------------------------------------
// delta_stream
// ---------------------------------------------------------------------------

/// Internal state for the unfold below.
struct DeltaStreamState {
    parser: SseLineBuffer,
    pending: VecDeque<Result<String, ChatError>>,
    ended: bool,
}

/// Wrap a raw `bytes_stream()` into a stream of reply text deltas.
///
/// The stream ends after `data: [DONE]` or when the underlying byte stream
/// closes.  A transport error mid-stream is yielded as the final item.
pub fn delta_stream<S>(byte_stream: S) -> ReplyStream
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
{
    let state = DeltaStreamState {
        parser: SseLineBuffer::new(),
        pending: VecDeque::new(),
        ended: false,
    };

    let stream = unfold(
        (
            Box::pin(byte_stream) as Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>,
            state,
        ),
        |(mut byte_stream, mut state)| async move {
            loop {
                // Drain pending deltas first — one TCP chunk can carry
                // several SSE events.
                if let Some(item) = state.pending.pop_front() {
                    return Some((item, (byte_stream, state)));
                }

                if state.ended {
                    return None;
                }

                match byte_stream.next().await {
                    Some(Ok(bytes)) => {
                        for event in state.parser.feed(&bytes) {
                            match event {
                                SseEvent::Data(json_str) => {
                                    if let Some(delta) = extract_delta(&json_str) {
                                        state.pending.push_back(Ok(delta));
                                    }
                                }
                                SseEvent::Done => {
                                    state.ended = true;
                                }
                            }
                        }
                    }
                    Some(Err(e)) => {
                        state.ended = true;
                        return Some((
                            Err(ChatError::Request(format!("stream read error: {e}"))),
                            (byte_stream, state),
                        ));
                    }
                    None => {
                        state.ended = true;
                        if let Some(SseEvent::Data(json_str)) = state.parser.flush() {
                            if let Some(delta) = extract_delta(&json_str) {
                                state.pending.push_back(Ok(delta));
                            }
                        }
                    }
                }
            }
        },
    );

    Box::pin(stream)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    // ---- SseLineBuffer ---

    #[test]
    fn single_complete_event() {
        let mut buf = SseLineBuffer::new();
        let events = buf.feed(b"data: {\"x\":1}\n");
        assert_eq!(events, vec![SseEvent::Data("{\"x\":1}".into())]);
    }

    #[test]
    fn multiple_events_in_one_chunk() {
        let mut buf = SseLineBuffer::new();
        let events = buf.feed(b"data: {\"a\":1}\n\ndata: {\"b\":2}\n\ndata: [DONE]\n");
        assert_eq!(
            events,
            vec![
                SseEvent::Data("{\"a\":1}".into()),
                SseEvent::Data("{\"b\":2}".into()),
                SseEvent::Done,
            ]
        );
    }

    #[test]
    fn partial_line_across_chunks() {
        let mut buf = SseLineBuffer::new();
        assert!(buf.feed(b"data: {\"content\":\"sawa").is_empty());
        let events = buf.feed(b"sdee\"}\n");
        assert_eq!(
            events,
            vec![SseEvent::Data("{\"content\":\"sawasdee\"}".into())]
        );
    }

    #[test]
    fn crlf_line_endings_are_stripped() {
        let mut buf = SseLineBuffer::new();
        let events = buf.feed(b"data: {\"x\":1}\r\n");
        assert_eq!(events, vec![SseEvent::Data("{\"x\":1}".into())]);
    }

    #[test]
    fn non_data_fields_are_ignored() {
        let mut buf = SseLineBuffer::new();
        let events = buf.feed(b"event: ping\nid: 3\nretry: 100\n: comment\n");
        assert!(events.is_empty());
    }

    #[test]
    fn flush_returns_trailing_partial_event() {
        let mut buf = SseLineBuffer::new();
        assert!(buf.feed(b"data: {\"x\":1}").is_empty());
        assert_eq!(buf.flush(), Some(SseEvent::Data("{\"x\":1}".into())));
        // Second flush is empty.
        assert_eq!(buf.flush(), None);
    }

    // ---- extract_delta ---

    #[test]
    fn extracts_content_delta() {
        let json = r#"{"choices":[{"delta":{"content":"สวัสดี"}}]}"#;
        assert_eq!(extract_delta(json), Some("สวัสดี".into()));
    }

    #[test]
    fn skips_role_announcement_frame() {
        let json = r#"{"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert_eq!(extract_delta(json), None);
    }

    #[test]
    fn skips_empty_delta() {
        let json = r#"{"choices":[{"delta":{"content":""}}]}"#;
        assert_eq!(extract_delta(json), None);
    }

    #[test]
    fn skips_unparseable_frame() {
        assert_eq!(extract_delta("not json"), None);
    }

    // ---- delta_stream ---

    fn sse_frame(content: &str) -> String {
        format!(
            "data: {{\"choices\":[{{\"delta\":{{\"content\":\"{content}\"}}}}]}}\n\n"
        )
    }

    #[tokio::test]
    async fn delta_stream_yields_chunks_in_order() {
        let frames: Vec<Result<Bytes, reqwest::Error>> = vec![
            Ok(Bytes::from(sse_frame("Hi"))),
            Ok(Bytes::from(sse_frame(" there!"))),
            Ok(Bytes::from("data: [DONE]\n\n")),
        ];
        let mut stream = delta_stream(stream::iter(frames));

        let mut out = Vec::new();
        while let Some(item) = stream.next().await {
            out.push(item.unwrap());
        }
        assert_eq!(out, vec!["Hi", " there!"]);
    }

    #[tokio::test]
    async fn delta_stream_ends_without_done_marker() {
        let frames: Vec<Result<Bytes, reqwest::Error>> = vec![Ok(Bytes::from(sse_frame("only")))];
        let mut stream = delta_stream(stream::iter(frames));

        assert_eq!(stream.next().await.unwrap().unwrap(), "only");
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn delta_stream_handles_split_frames() {
        let full = sse_frame("hello");
        let (a, b) = full.split_at(10);
        let frames: Vec<Result<Bytes, reqwest::Error>> = vec![
            Ok(Bytes::from(a.to_owned())),
            Ok(Bytes::from(b.to_owned())),
            Ok(Bytes::from("data: [DONE]\n")),
        ];
        let mut stream = delta_stream(stream::iter(frames));

        assert_eq!(stream.next().await.unwrap().unwrap(), "hello");
        assert!(stream.next().await.is_none());
    }
}
