/*!
Frame reassembly for BGPmon XML streams.

The feed is a never-ending concatenation of `<BGP_MONITOR_MESSAGE>` documents, delivered
in whatever pieces the transport chooses. [FrameReassembler] accumulates those pieces and
cuts a [RawFrame] at every closing `</BGP_MONITOR_MESSAGE>` tag.
*/
use crate::models::{RawFrame, MESSAGE_DELIMITER};
use bytes::BytesMut;
use log::error;

/// Stream artifact inserted by the server between messages; never part of a frame.
pub const NOISE_TOKEN: &[u8] = b"<xml>";

#[derive(Debug, Default)]
pub struct FrameReassembler {
    buf: BytesMut,
    /// Delimiter search resumes here; everything before it is known not to start a delimiter.
    search_from: usize,
    /// Everything before this offset is free of noise tokens.
    clean_upto: usize,
    max_buffer_len: Option<usize>,
    discarded: u64,
}

impl FrameReassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reassembler that drops its pending bytes once they exceed `max_buffer_len`
    /// without completing a frame.
    pub fn with_max_buffer_len(max_buffer_len: Option<usize>) -> Self {
        FrameReassembler {
            max_buffer_len,
            ..Default::default()
        }
    }

    /// Appends `chunk` and returns every frame completed by it, in stream order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<RawFrame> {
        self.buf.extend_from_slice(chunk);
        self.strip_noise();

        let mut frames = vec![];
        while let Some(pos) = find(&self.buf[self.search_from..], MESSAGE_DELIMITER) {
            let end = self.search_from + pos + MESSAGE_DELIMITER.len();
            frames.push(RawFrame::new(self.buf.split_to(end).freeze()));
            self.search_from = 0;
            self.clean_upto -= end;
        }
        // a delimiter may still straddle the end of the buffer
        self.search_from = self
            .buf
            .len()
            .saturating_sub(MESSAGE_DELIMITER.len() - 1);

        if let Some(max) = self.max_buffer_len {
            if self.buf.len() > max {
                error!(
                    "discarding {} buffered bytes without a closing {} tag",
                    self.buf.len(),
                    String::from_utf8_lossy(MESSAGE_DELIMITER)
                );
                self.discarded += self.buf.len() as u64;
                self.reset();
            }
        }
        frames
    }

    /// Bytes received but not yet part of a complete frame.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    /// Total number of bytes dropped because the buffer cap was exceeded.
    pub fn discarded_bytes(&self) -> u64 {
        self.discarded
    }

    pub fn reset(&mut self) {
        self.buf.clear();
        self.search_from = 0;
        self.clean_upto = 0;
    }

    /// Removes noise tokens from the not yet cleaned tail of the buffer. The region is
    /// widened by one token length so a token split across two chunks is still caught.
    ///
    /// Removing a token can join its neighbours into a new one (`<x<xml>ml>`), so scanning
    /// resumes just before every cut.
    fn strip_noise(&mut self) {
        let mut from = self.clean_upto.saturating_sub(NOISE_TOKEN.len() - 1);
        while let Some(pos) = find(&self.buf[from..], NOISE_TOKEN) {
            let at = from + pos;
            let tail = self.buf.split_off(at);
            self.buf.extend_from_slice(&tail[NOISE_TOKEN.len()..]);
            from = at.saturating_sub(NOISE_TOKEN.len() - 1);
            // bytes before the cut may now start a delimiter
            self.search_from = self.search_from.min(from);
        }
        self.clean_upto = self.buf.len();
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
