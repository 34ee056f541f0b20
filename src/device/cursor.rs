//! The offset-addressed read protocol.
//!
//! Every read re-renders the message from the clock before copying, so a reader that
//! takes its time across a UTC midnight can see the tail of a different message than
//! the head it already consumed. Callers who want a stable answer should read it in
//! one go.

use chrono::{DateTime, Utc};

use super::selector;

/// Longest message the buffer can hold, not counting the terminating null.
pub const BUF_LEN: usize = 80;

/// Fixed-size, null-terminated text buffer.
#[derive(Debug, Clone)]
pub struct MessageBuffer {
    bytes: [u8; BUF_LEN + 1],
}

impl MessageBuffer {
    pub fn new() -> Self {
        Self {
            bytes: [0; BUF_LEN + 1],
        }
    }

    /// Overwrite the buffer with `text` followed by a null. Anything past `BUF_LEN` is cut.
    pub fn fill(&mut self, text: &str) {
        let n = text.len().min(BUF_LEN);
        self.bytes[..n].copy_from_slice(&text.as_bytes()[..n]);
        self.bytes[n] = 0;
    }

    /// Bytes before the first null.
    pub fn len(&self) -> usize {
        self.bytes.iter().position(|&b| b == 0).unwrap_or(BUF_LEN)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }
}

impl Default for MessageBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-session read state: the session's own message buffer.
///
/// The offset is not stored here; it belongs to the caller's open-file record and is
/// passed in on every read.
#[derive(Debug, Clone, Default)]
pub struct StreamCursor {
    buffer: MessageBuffer,
}

impl StreamCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve the next slice of the message as of `now`.
    ///
    /// Returns the number of bytes copied into `out`. When `offset` is at or past the
    /// end of the message, it is reset to 0 and the call returns 0.
    pub fn read(&mut self, now: DateTime<Utc>, offset: &mut usize, out: &mut [u8]) -> usize {
        self.buffer.fill(selector::select(now));
        self.copy_out(offset, out)
    }

    fn copy_out(&self, offset: &mut usize, out: &mut [u8]) -> usize {
        let msg = self.buffer.as_bytes();
        if *offset >= msg.len() {
            *offset = 0;
            return 0;
        }

        let n = out.len().min(msg.len() - *offset);
        out[..n].copy_from_slice(&msg[*offset..*offset + n]);
        *offset += n;
        n
    }

    /// The message as rendered by the most recent read.
    pub fn buffer(&self) -> &MessageBuffer {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn friday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 9, 15, 12, 0, 0).unwrap()
    }

    fn sunday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 9, 17, 12, 0, 0).unwrap()
    }

    #[test]
    fn buffer_fill_and_len() {
        let mut buf = MessageBuffer::new();
        assert!(buf.is_empty());
        buf.fill("You just missed it!\n");
        assert_eq!(buf.as_bytes(), b"You just missed it!\n");
        // shorter text overwrites and re-terminates
        buf.fill("Nope.\n");
        assert_eq!(buf.len(), 6);
        assert_eq!(buf.as_bytes(), b"Nope.\n");
    }

    #[test]
    fn buffer_truncates_oversized_text() {
        let mut buf = MessageBuffer::new();
        let long = "x".repeat(BUF_LEN + 20);
        buf.fill(&long);
        assert_eq!(buf.len(), BUF_LEN);
    }

    #[test]
    fn byte_at_a_time_then_eof() {
        let mut cursor = StreamCursor::new();
        let mut offset = 0;
        let mut collected = Vec::new();
        let mut one = [0u8; 1];
        loop {
            let n = cursor.read(friday(), &mut offset, &mut one);
            if n == 0 {
                break;
            }
            assert_eq!(n, 1);
            collected.push(one[0]);
            assert_eq!(offset, collected.len());
        }
        assert_eq!(collected, b"IT IS!\n");
        assert_eq!(offset, 0);
    }

    #[test]
    fn zero_length_read_leaves_offset() {
        let mut cursor = StreamCursor::new();
        let mut offset = 3;
        let n = cursor.read(friday(), &mut offset, &mut [0u8; 0]);
        assert_eq!(n, 0);
        assert_eq!(offset, 3);
    }

    #[test]
    fn whole_message_in_one_read() {
        let mut cursor = StreamCursor::new();
        let mut offset = 0;
        let mut out = [0u8; 80];
        let n = cursor.read(sunday(), &mut offset, &mut out);
        assert_eq!(&out[..n], b"No, but it's still the weekend!\n");
        assert_eq!(offset, n);

        let n = cursor.read(sunday(), &mut offset, &mut out);
        assert_eq!(n, 0);
        assert_eq!(offset, 0);
    }

    #[test]
    fn offset_far_past_end_resets() {
        let mut cursor = StreamCursor::new();
        let mut offset = 10_000;
        let mut out = [0u8; 8];
        assert_eq!(cursor.read(friday(), &mut offset, &mut out), 0);
        assert_eq!(offset, 0);
    }

    #[test]
    fn next_cycle_starts_fresh() {
        let mut cursor = StreamCursor::new();
        let mut offset = 0;
        let mut out = [0u8; 80];
        let n = cursor.read(friday(), &mut offset, &mut out);
        assert_eq!(n, 7);
        assert_eq!(cursor.read(friday(), &mut offset, &mut out), 0);
        let n = cursor.read(friday(), &mut offset, &mut out);
        assert_eq!(&out[..n], b"IT IS!\n");
    }

    #[test]
    fn midnight_mid_stream_mixes_messages() {
        let mut cursor = StreamCursor::new();
        let mut offset = 0;
        let mut out = [0u8; 3];
        let mut seen = Vec::new();

        let n = cursor.read(friday(), &mut offset, &mut out);
        seen.extend_from_slice(&out[..n]);

        let saturday = Utc.with_ymd_and_hms(2023, 9, 16, 0, 0, 1).unwrap();
        loop {
            let n = cursor.read(saturday, &mut offset, &mut out);
            if n == 0 {
                break;
            }
            seen.extend_from_slice(&out[..n]);
        }
        assert_eq!(seen, b"IT  just missed it!\n");
        assert_eq!(cursor.buffer().as_bytes(), b"You just missed it!\n");
    }
}
