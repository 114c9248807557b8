use std::io::{ErrorKind, Read};
use std::net::TcpStream;
use std::time::Duration;

pub mod filter;
pub mod interpreter;
pub mod iters;
pub mod reassembler;

pub use crate::error::ParserError;
pub use filter::{admit, AsnFilter, Filterable};
pub use interpreter::{classify, interpret, parse_bgpmon_message, MessageClass, MonitorSource};
pub use reassembler::FrameReassembler;

use crate::io::connect;
use crate::models::RawFrame;
use log::warn;

/// Read size used when pulling bytes off the feed.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

pub struct BgpmonParser<R> {
    reader: R,
    reassembler: FrameReassembler,
    chunk: Vec<u8>,
    options: ParserOptions,
}

#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Maximum number of bytes requested per read.
    pub chunk_size: usize,
    /// Cap on bytes buffered without completing a frame; `None` means unbounded.
    pub max_buffer_len: Option<usize>,
    /// Origin ASN filter applied to interpreted events.
    pub filter: Option<AsnFilter>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_buffer_len: None,
            filter: None,
        }
    }
}

impl BgpmonParser<TcpStream> {
    /// Connects to a BGPmon server and creates a parser reading its XML stream.
    ///
    /// `timeout` bounds both connection setup and the time between two reads.
    pub fn connect(
        addr: &str,
        port: u16,
        timeout: Option<Duration>,
    ) -> Result<BgpmonParser<TcpStream>, ParserError> {
        let stream = connect(addr, port, timeout)?;
        Ok(BgpmonParser::new(stream))
    }
}

impl<R> BgpmonParser<R> {
    /// Creating a new parser from a object that implements [Read] trait.
    pub fn new(reader: R) -> BgpmonParser<R> {
        BgpmonParser::new_with_options(reader, ParserOptions::default())
    }

    pub fn new_with_options(reader: R, options: ParserOptions) -> BgpmonParser<R> {
        BgpmonParser {
            reader,
            reassembler: FrameReassembler::with_max_buffer_len(options.max_buffer_len),
            chunk: vec![0; options.chunk_size.max(1)],
            options,
        }
    }

    pub fn with_filter(self, filter: Option<AsnFilter>) -> BgpmonParser<R> {
        let mut options = self.options;
        options.filter = filter;
        BgpmonParser { options, ..self }
    }

    pub fn asn_filter(&self) -> Option<&AsnFilter> {
        self.options.filter.as_ref()
    }
}

impl<R: Read> BgpmonParser<R> {
    /// Reads one chunk from the feed and returns the frames it completed.
    ///
    /// Returns `Ok(None)` once the stream has ended.
    pub fn next_frames(&mut self) -> Result<Option<Vec<RawFrame>>, ParserError> {
        loop {
            match self.reader.read(&mut self.chunk) {
                Ok(0) => {
                    let pending = self.reassembler.pending().len();
                    if pending > 0 {
                        warn!("stream ended with {} bytes of an incomplete message", pending);
                    }
                    return Ok(None);
                }
                Ok(n) => return Ok(Some(self.reassembler.feed(&self.chunk[..n]))),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Hands out at most one byte per read.
    struct TrickleReader<R>(R);

    impl<R: Read> Read for TrickleReader<R> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let len = buf.len().min(1);
            self.0.read(&mut buf[..len])
        }
    }

    #[test]
    fn test_next_frames() {
        let data = "<xml><BGP_MONITOR_MESSAGE/></BGP_MONITOR_MESSAGE><xml><BGP_MONITOR_MESSAGE/></BGP_MONITOR_MESSAGE>";
        let options = ParserOptions {
            chunk_size: 50,
            ..Default::default()
        };
        let mut parser = BgpmonParser::new_with_options(Cursor::new(data), options);
        let mut frames = vec![];
        while let Some(chunk_frames) = parser.next_frames().unwrap() {
            frames.extend(chunk_frames);
        }
        assert_eq!(frames.len(), 2);
        assert_eq!(
            frames[0].to_string(),
            "<BGP_MONITOR_MESSAGE/></BGP_MONITOR_MESSAGE>"
        );
    }

    #[test]
    fn test_single_byte_reads() {
        let data = "<BGP_MONITOR_MESSAGE>a</BGP_MONITOR_MESSAGE><BGP_MONITOR_MESSAGE>b</BGP_MONITOR_MESSAGE>";
        let mut parser = BgpmonParser::new(TrickleReader(Cursor::new(data)));
        let mut frames = vec![];
        while let Some(chunk_frames) = parser.next_frames().unwrap() {
            frames.extend(chunk_frames);
        }
        assert_eq!(
            frames.iter().map(|f| f.to_string()).collect::<Vec<_>>(),
            vec![
                "<BGP_MONITOR_MESSAGE>a</BGP_MONITOR_MESSAGE>",
                "<BGP_MONITOR_MESSAGE>b</BGP_MONITOR_MESSAGE>"
            ]
        );
    }

    #[test]
    fn test_with_filter() {
        let parser = BgpmonParser::new(Cursor::new("")).with_filter(Some(AsnFilter::new(["1"])));
        assert!(parser.asn_filter().unwrap().contains("1"));
    }
}
