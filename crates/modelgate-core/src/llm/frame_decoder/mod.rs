//! Line-oriented frame decoder for streaming responses
//!
//! Backends stream either Server-Sent Events (`data: {...}` lines separated
//! by blank lines) or newline-delimited JSON. Both reduce to "one payload per
//! line", so the decoder splits on newlines and strips SSE field prefixes.
//!
//! Network chunks can end anywhere: in the middle of a line, or in the middle
//! of a multi-byte UTF-8 character. Both are buffered until the next chunk.

mod frame;

pub use frame::Frame;

/// Buffered decoder turning raw body chunks into [`Frame`]s
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Text received after the last complete line
    buffer: String,
    /// Trailing bytes of an unfinished UTF-8 sequence
    incomplete_utf8: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes and collect every frame completed by them
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Frame> {
        let bytes = if self.incomplete_utf8.is_empty() {
            chunk.to_vec()
        } else {
            let mut combined = std::mem::take(&mut self.incomplete_utf8);
            combined.extend_from_slice(chunk);
            combined
        };

        let (text, remainder) = decode_utf8_with_remainder(&bytes);
        self.incomplete_utf8 = remainder;
        self.buffer.push_str(&text);

        let mut frames = Vec::new();
        while let Some(end) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=end).collect();
            if let Some(frame) = parse_line(&line) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Flush a final line that arrived without a trailing newline
    pub fn finish(&mut self) -> Option<Frame> {
        let mut rest = std::mem::take(&mut self.buffer);
        if !self.incomplete_utf8.is_empty() {
            rest.push_str(&String::from_utf8_lossy(&std::mem::take(
                &mut self.incomplete_utf8,
            )));
        }
        parse_line(&rest)
    }

    /// Check if there's buffered data that has not formed a frame yet
    pub fn has_remaining(&self) -> bool {
        !self.buffer.is_empty() || !self.incomplete_utf8.is_empty()
    }

    /// Number of buffered bytes of an unfinished UTF-8 character
    pub fn incomplete_utf8_len(&self) -> usize {
        self.incomplete_utf8.len()
    }
}

/// Extract the payload of one line, skipping blanks, comments and
/// non-data SSE fields
fn parse_line(line: &str) -> Option<Frame> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(':') {
        return None;
    }

    if let Some(data) = line.strip_prefix("data:") {
        let data = data.trim_start();
        return (!data.is_empty()).then(|| Frame::new(data));
    }

    if ["event:", "id:", "retry:"]
        .iter()
        .any(|field| line.starts_with(field))
    {
        return None;
    }

    // Bare NDJSON line
    Some(Frame::new(line))
}

/// Decode bytes as UTF-8, returning the valid text and any trailing bytes of
/// an unfinished character
fn decode_utf8_with_remainder(bytes: &[u8]) -> (String, Vec<u8>) {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return (s.to_string(), Vec::new());
    }

    // Walk back over at most 3 continuation bytes to the start of the
    // last character and check whether it is complete.
    let mut valid_end = bytes.len();
    for back in 1..=4.min(bytes.len()) {
        let pos = bytes.len() - back;
        if !is_continuation_byte(bytes[pos]) {
            if back < utf8_char_len(bytes[pos]) {
                valid_end = pos;
            }
            break;
        }
    }

    match std::str::from_utf8(&bytes[..valid_end]) {
        Ok(s) => (s.to_string(), bytes[valid_end..].to_vec()),
        Err(e) => {
            tracing::warn!(
                position = e.valid_up_to(),
                "invalid UTF-8 in stream body, replacing undecodable bytes"
            );
            (
                String::from_utf8_lossy(&bytes[..valid_end]).into_owned(),
                bytes[valid_end..].to_vec(),
            )
        }
    }
}

#[inline]
fn is_continuation_byte(byte: u8) -> bool {
    (byte & 0b1100_0000) == 0b1000_0000
}

/// Expected length of a UTF-8 character from its first byte
#[inline]
fn utf8_char_len(first_byte: u8) -> usize {
    if first_byte & 0b1000_0000 == 0 {
        1
    } else if first_byte & 0b1110_0000 == 0b1100_0000 {
        2
    } else if first_byte & 0b1111_0000 == 0b1110_0000 {
        3
    } else if first_byte & 0b1111_1000 == 0b1111_0000 {
        4
    } else {
        1
    }
}
