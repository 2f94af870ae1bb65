//! Incremental server-sent-event frame parser.
//!
//! The upstream feed is a long-lived `text/event-stream` response read as a
//! sequence of byte chunks. Chunk boundaries fall anywhere, including inside
//! a UTF-8 sequence, so the parser buffers bytes and only converts complete
//! lines. Each completed frame yields one raw record: the `data` lines of
//! the frame joined with `\n`, or an empty string for keepalive frames that
//! carry no data (comments, bare `event:`/`id:` fields). The supervisor
//! counts those empty records as heartbeats.

/// Streaming parser turning raw bytes into per-frame data records.
#[derive(Debug, Default)]
pub struct SseParser {
    /// Bytes received but not yet terminated by a newline.
    buf: Vec<u8>,
    /// Data lines of the frame in progress.
    data: Vec<String>,
    /// Whether the frame in progress has seen any line at all.
    frame_started: bool,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of stream bytes, returning the records completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut records = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = &raw[..raw.len() - 1];
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            let line = String::from_utf8_lossy(line);
            self.consume_line(&line, &mut records);
        }
        records
    }

    /// Process one complete line per the event-stream framing rules.
    fn consume_line(&mut self, line: &str, records: &mut Vec<String>) {
        if line.is_empty() {
            // Blank line dispatches the frame in progress, if any.
            if self.frame_started {
                records.push(self.data.join("\n"));
                self.data.clear();
                self.frame_started = false;
            }
            return;
        }

        self.frame_started = true;

        // Comment lines are keepalives; they start a frame but carry no data.
        if line.starts_with(':') {
            return;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        if field == "data" {
            self.data.push(value.to_string());
        }
        // event:, id:, and retry: fields are not used by this pipeline.
    }
}
