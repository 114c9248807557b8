/*!
Output formats for the BGPmon stream.

- [OutputFormat::Json]: one JSON object per interpreted and filtered [BgpEvent]
- [OutputFormat::Xml]: every received frame, pretty-printed, with no interpretation
*/
mod json;
mod xml;

pub use json::format_event_json;
pub use xml::format_frame_xml;

use crate::error::ParserError;
use crate::parser::BgpmonParser;
use log::error;
use std::io::{Read, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Xml,
}

/// Drives `parser` to the end of its stream, writing one line per output unit to `out` and
/// flushing after each. Returns the number of lines written.
///
/// In [OutputFormat::Xml] mode every frame is echoed regardless of content or filter.
/// A closed downstream pipe ends the run without error.
pub fn write_output<R: Read, W: Write>(
    parser: BgpmonParser<R>,
    format: OutputFormat,
    out: &mut W,
) -> Result<u64, ParserError> {
    let mut count = 0;
    match format {
        OutputFormat::Json => {
            for event in parser.into_event_iter() {
                let line = match format_event_json(&event) {
                    Ok(line) => line,
                    Err(e) => {
                        error!("{}", e);
                        continue;
                    }
                };
                if !write_line(out, &line)? {
                    break;
                }
                count += 1;
            }
        }
        OutputFormat::Xml => {
            for frame in parser.into_frame_iter() {
                let text = match format_frame_xml(&frame) {
                    Ok(text) => text,
                    Err(e) => {
                        error!("cannot format frame: {}: {}", e, frame);
                        continue;
                    }
                };
                if !write_line(out, &text)? {
                    break;
                }
                count += 1;
            }
        }
    }
    Ok(count)
}

/// Writes and flushes one output unit; returns `false` once the reader has gone away.
fn write_line<W: Write>(out: &mut W, line: &str) -> Result<bool, ParserError> {
    match writeln!(out, "{}", line.trim()).and_then(|_| out.flush()) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(false),
        Err(e) => Err(e.into()),
    }
}
