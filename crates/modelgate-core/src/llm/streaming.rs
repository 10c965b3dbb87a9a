//! Unified text streams
//!
//! Every backend's streaming body is reduced to the same thing: a lazy,
//! finite, non-restartable sequence of text fragments in backend order.

use super::frame_decoder::{Frame, FrameDecoder};
use crate::error::{GateError, GateResult};
use futures::{Stream, StreamExt};
use std::collections::VecDeque;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};
use tracing::debug;

/// Boxed stream of text fragments
pub type FragmentStream = Pin<Box<dyn Stream<Item = GateResult<String>> + Send>>;

/// What a backend-specific extractor found in one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameContent {
    /// A non-empty text fragment
    Text(String),
    /// A terminal marker; nothing after it is read
    Done,
    /// Malformed JSON, or a frame without text
    Skip,
}

/// Turns one decoded frame into a fragment
pub type FrameExtractor = fn(&Frame) -> FrameContent;

#[derive(Debug, Default)]
struct StreamCounters {
    fragments: AtomicUsize,
    dropped: AtomicUsize,
}

/// A cancellable stream of text fragments.
///
/// Yields `Ok(fragment)` items until the backend closes the body or sends a
/// terminal marker. A transport failure after the stream was opened is
/// yielded once as `Err(GateError::StreamInterrupted)`, after which the
/// stream ends.
///
/// Dropping the stream, or calling [`close`](Self::close), releases the
/// underlying connection.
pub struct TextStream {
    inner: Option<FragmentStream>,
    counters: Arc<StreamCounters>,
    platform: &'static str,
}

impl TextStream {
    /// Decode a raw response body into fragments using `extractor`
    pub fn from_body<S, B, E>(body: S, extractor: FrameExtractor, platform: &'static str) -> Self
    where
        S: Stream<Item = Result<B, E>> + Send + 'static,
        B: AsRef<[u8]> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let counters = Arc::new(StreamCounters::default());
        let state = DecodeState {
            body: Box::pin(body),
            decoder: FrameDecoder::new(),
            pending: VecDeque::new(),
            finished: false,
            counters: Arc::clone(&counters),
            extractor,
            platform,
        };

        Self {
            inner: Some(Box::pin(futures::stream::unfold(state, next_fragment))),
            counters,
            platform,
        }
    }

    /// Wrap an already-unified fragment stream
    pub fn from_fragments(stream: FragmentStream, platform: &'static str) -> Self {
        Self {
            inner: Some(stream),
            counters: Arc::new(StreamCounters::default()),
            platform,
        }
    }

    /// Stop reading and release the connection.
    ///
    /// Subsequent polls return `None`.
    pub fn close(&mut self) {
        if self.inner.take().is_some() {
            debug!(platform = self.platform, "stream closed by caller");
        }
    }

    /// Whether the stream has ended or been closed
    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    /// Fragments yielded so far
    pub fn fragments(&self) -> usize {
        self.counters.fragments.load(Ordering::Relaxed)
    }

    /// Frames skipped because they were malformed or carried no text
    pub fn dropped_frames(&self) -> usize {
        self.counters.dropped.load(Ordering::Relaxed)
    }

    /// Drain the stream into one string.
    ///
    /// # Errors
    ///
    /// Returns the `StreamInterrupted` error if the transport failed midway.
    pub async fn collect_text(mut self) -> GateResult<String> {
        let mut text = String::new();
        while let Some(fragment) = self.next().await {
            text.push_str(&fragment?);
        }
        Ok(text)
    }
}

impl Stream for TextStream {
    type Item = GateResult<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let Some(inner) = self.inner.as_mut() else {
            return Poll::Ready(None);
        };
        match inner.as_mut().poll_next(cx) {
            Poll::Ready(None) => {
                self.inner = None;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

impl fmt::Debug for TextStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextStream")
            .field("platform", &self.platform)
            .field("closed", &self.is_closed())
            .field("fragments", &self.fragments())
            .field("dropped_frames", &self.dropped_frames())
            .finish()
    }
}

impl Drop for TextStream {
    fn drop(&mut self) {
        debug!(
            platform = self.platform,
            fragments = self.fragments(),
            dropped_frames = self.dropped_frames(),
            "stream released"
        );
    }
}

struct DecodeState<S> {
    body: Pin<Box<S>>,
    decoder: FrameDecoder,
    pending: VecDeque<Frame>,
    finished: bool,
    counters: Arc<StreamCounters>,
    extractor: FrameExtractor,
    platform: &'static str,
}

async fn next_fragment<S, B, E>(
    mut state: DecodeState<S>,
) -> Option<(GateResult<String>, DecodeState<S>)>
where
    S: Stream<Item = Result<B, E>> + Send,
    B: AsRef<[u8]>,
    E: fmt::Display,
{
    loop {
        if let Some(frame) = state.pending.pop_front() {
            match (state.extractor)(&frame) {
                FrameContent::Text(text) => {
                    state.counters.fragments.fetch_add(1, Ordering::Relaxed);
                    return Some((Ok(text), state));
                }
                FrameContent::Done => {
                    state.pending.clear();
                    return None;
                }
                FrameContent::Skip => {
                    state.counters.dropped.fetch_add(1, Ordering::Relaxed);
                    continue;
                }
            }
        }

        if state.finished {
            return None;
        }

        match state.body.next().await {
            Some(Ok(chunk)) => {
                let frames = state.decoder.feed(chunk.as_ref());
                state.pending.extend(frames);
            }
            Some(Err(e)) => {
                state.finished = true;
                state.pending.clear();
                let error = GateError::stream_interrupted(state.platform, e.to_string());
                return Some((Err(error), state));
            }
            None => {
                state.finished = true;
                state.pending.extend(state.decoder.finish());
            }
        }
    }
}
