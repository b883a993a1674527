use futures::StreamExt;
use std::future::Future;
use tracing::{info, warn};

use crate::core::auth::Session;
use crate::error::FaucetError;
use crate::types::{ContinuationSignal, StreamEvent, StreamExit};

// HTTP 420 is the service's historical rate-limit status; newer
// deployments send 429.
const RATE_LIMIT_STATUSES: [u16; 2] = [420, 429];

/// What to do with a connect response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusDecision {
    /// 2xx, start consuming events.
    Proceed,
    /// Rate limit, close the stream for good.
    Stop,
    /// Any other error status, log and reconnect.
    Retry,
}

pub(crate) fn classify_status(status: u16) -> StatusDecision {
    if RATE_LIMIT_STATUSES.contains(&status) {
        StatusDecision::Stop
    } else if (200..300).contains(&status) {
        StatusDecision::Proceed
    } else {
        StatusDecision::Retry
    }
}

/// Splits an arbitrary chunk sequence into newline-delimited payloads.
///
/// The service delimits events with `\r\n` and sends blank keep-alive
/// lines while idle; chunk boundaries fall anywhere, including inside a
/// multi-byte UTF-8 character. The buffer therefore holds raw bytes and
/// a line is decoded only once its terminator has arrived, so a
/// character split across chunks is reassembled intact.
#[derive(Default)]
pub(crate) struct LineFramer {
    buffer: Vec<u8>,
}

impl LineFramer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning every completed non-blank line.
    pub(crate) fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
            while matches!(line.last(), Some(&b'\n') | Some(&b'\r')) {
                line.pop();
            }
            if !line.iter().all(u8::is_ascii_whitespace) {
                lines.push(String::from_utf8_lossy(&line).into_owned());
            }
        }
        lines
    }
}

/// Push-driven, non-restartable event stream over the filtered
/// streaming endpoint.
///
/// Events are delivered to the handler one at a time; each handler
/// future is awaited to completion before the next event is framed, so
/// there is no concurrent event processing. The handler's return value
/// controls continuation.
pub struct TweetListener {
    stream_url: String,
}

impl TweetListener {
    pub fn new(stream_url: impl Into<String>) -> Self {
        Self {
            stream_url: stream_url.into(),
        }
    }

    /// Open the keyword-filtered stream and pump events through
    /// `handler` until the service rate-limits us or the handler asks
    /// to stop.
    ///
    /// Transport errors other than the rate-limit status are logged and
    /// the connection is reopened immediately, with no backoff.
    pub async fn run<F, Fut>(
        &self,
        session: &Session,
        keywords: &[String],
        mut handler: F,
    ) -> Result<StreamExit, FaucetError>
    where
        F: FnMut(StreamEvent) -> Fut,
        Fut: Future<Output = ContinuationSignal>,
    {
        let track = keywords.join(",");

        loop {
            let response = session
                .http
                .get(&self.stream_url)
                .bearer_auth(&session.bearer_token)
                .query(&[("track", track.as_str())])
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, "stream connect failed, reconnecting");
                    continue;
                }
            };

            let status = response.status().as_u16();
            match classify_status(status) {
                StatusDecision::Stop => {
                    warn!(status, "rate limit from streaming service, closing stream");
                    return Ok(StreamExit::RateLimited);
                }
                StatusDecision::Retry => {
                    warn!(status, "stream error status, reconnecting");
                    continue;
                }
                StatusDecision::Proceed => {}
            }

            info!(track = %track, "stream connected");

            let mut body = response.bytes_stream();
            let mut framer = LineFramer::new();

            while let Some(chunk) = body.next().await {
                let chunk = match chunk {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!(error = %e, "transport error mid-stream, reconnecting");
                        break;
                    }
                };

                for line in framer.push(&chunk) {
                    if handler(StreamEvent::new(line)).await == ContinuationSignal::Stop {
                        info!("handler requested stop, closing stream");
                        return Ok(StreamExit::Stopped);
                    }
                }
            }

            warn!("stream ended, reconnecting");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_statuses_stop_the_stream() {
        assert_eq!(classify_status(420), StatusDecision::Stop);
        assert_eq!(classify_status(429), StatusDecision::Stop);
    }

    #[test]
    fn success_proceeds_other_errors_retry() {
        assert_eq!(classify_status(200), StatusDecision::Proceed);
        assert_eq!(classify_status(401), StatusDecision::Retry);
        assert_eq!(classify_status(503), StatusDecision::Retry);
    }

    #[test]
    fn frames_lines_across_chunk_boundaries() {
        let mut framer = LineFramer::new();
        assert!(framer.push(b"{\"text\":\"par").is_empty());
        assert_eq!(
            framer.push(b"tial\"}\r\n{\"text\":\"whole\"}\r\n"),
            vec![r#"{"text":"partial"}"#, r#"{"text":"whole"}"#]
        );
    }

    #[test]
    fn skips_keep_alive_blank_lines() {
        let mut framer = LineFramer::new();
        assert_eq!(
            framer.push(b"\r\n\r\n{\"text\":\"hi\"}\r\n\r\n"),
            vec![r#"{"text":"hi"}"#]
        );
    }

    #[test]
    fn multibyte_character_split_across_chunks_is_preserved() {
        let payload = "{\"text\":\"café ☕ 0xABCDEF0123456789ABCDEF0123456789ABCDEF01\"}";
        let bytes = format!("{payload}\r\n").into_bytes();

        // Break the chunk inside every character of the payload in
        // turn; the framed line must come back byte-identical.
        for split in 1..bytes.len() {
            let mut framer = LineFramer::new();
            let mut lines = framer.push(&bytes[..split]);
            lines.extend(framer.push(&bytes[split..]));
            assert_eq!(lines, vec![payload], "split at byte {split}");
        }
    }

    #[test]
    fn partial_line_is_held_until_terminated() {
        let mut framer = LineFramer::new();
        assert!(framer.push(b"no newline yet").is_empty());
        assert_eq!(framer.push(b"\n"), vec!["no newline yet"]);
    }
}
