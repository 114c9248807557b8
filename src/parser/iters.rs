/*!
Provides parser iterator implementation.

- [FrameIterator]: raw frames as cut from the stream, no interpretation
- [EventIterator]: interpreted and filtered events; bad frames are logged and skipped
- [FallibleEventIterator]: like [EventIterator] but yields per-frame errors
*/
use crate::error::ParserError;
use crate::models::{BgpEvent, RawFrame};
use crate::parser::{admit, interpret, AsnFilter, BgpmonParser};
use log::{debug, error, warn};
use std::collections::VecDeque;
use std::io::Read;

/// Use [EventIterator] as the default iterator to return [BgpEvent]s instead of [RawFrame]s.
impl<R: Read> IntoIterator for BgpmonParser<R> {
    type Item = BgpEvent;
    type IntoIter = EventIterator<R>;

    fn into_iter(self) -> Self::IntoIter {
        EventIterator::new(self)
    }
}

impl<R> BgpmonParser<R> {
    pub fn into_frame_iter(self) -> FrameIterator<R> {
        FrameIterator::new(self)
    }

    pub fn into_event_iter(self) -> EventIterator<R> {
        EventIterator::new(self)
    }

    pub fn into_fallible_event_iter(self) -> FallibleEventIterator<R> {
        FallibleEventIterator::new(self)
    }
}

/// Interprets a frame and applies the filter. `Ok(None)` means nothing to emit.
fn process_frame(
    frame: &RawFrame,
    filter: Option<&AsnFilter>,
) -> Result<Option<BgpEvent>, ParserError> {
    let event = match interpret(frame)? {
        Some(event) => event,
        None => return Ok(None),
    };
    if !admit(&event, filter) {
        debug!(
            "filtered out announcement with origin AS {}",
            event.origin_asn().unwrap_or_default()
        );
        return Ok(None);
    }
    Ok(Some(event))
}

/*********
RawFrame Iterator
**********/

pub struct FrameIterator<R> {
    parser: BgpmonParser<R>,
    pending: VecDeque<RawFrame>,
    finished: bool,
    pub count: u64,
}

impl<R> FrameIterator<R> {
    fn new(parser: BgpmonParser<R>) -> Self {
        FrameIterator {
            parser,
            pending: VecDeque::new(),
            finished: false,
            count: 0,
        }
    }

    pub fn asn_filter(&self) -> Option<&AsnFilter> {
        self.parser.asn_filter()
    }
}

impl<R: Read> FrameIterator<R> {
    /// Returns the next frame, or the read error that ended the stream.
    fn next_frame(&mut self) -> Option<Result<RawFrame, ParserError>> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                self.count += 1;
                return Some(Ok(frame));
            }
            if self.finished {
                return None;
            }
            match self.parser.next_frames() {
                Ok(Some(frames)) => self.pending.extend(frames),
                Ok(None) => self.finished = true,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<R: Read> Iterator for FrameIterator<R> {
    type Item = RawFrame;

    fn next(&mut self) -> Option<RawFrame> {
        match self.next_frame()? {
            Ok(frame) => Some(frame),
            Err(e) => {
                // when reaching IO error, stop iterating
                error!("reading BGPmon stream failed: {}", e);
                None
            }
        }
    }
}

/*********
BgpEvent Iterator
**********/

pub struct EventIterator<R> {
    frames: FrameIterator<R>,
}

impl<R> EventIterator<R> {
    fn new(parser: BgpmonParser<R>) -> Self {
        EventIterator {
            frames: FrameIterator::new(parser),
        }
    }
}

impl<R: Read> Iterator for EventIterator<R> {
    type Item = BgpEvent;

    fn next(&mut self) -> Option<BgpEvent> {
        loop {
            let frame = self.frames.next()?;
            match process_frame(&frame, self.frames.asn_filter()) {
                Ok(Some(event)) => return Some(event),
                Ok(None) => continue,
                Err(e @ ParserError::SemanticIncompleteError(_)) => {
                    warn!("{}: {}", e, frame);
                }
                Err(e) => {
                    error!("{}: {}", e, frame);
                }
            }
        }
    }
}

/*********
Fallible BgpEvent Iterator
**********/

pub struct FallibleEventIterator<R> {
    frames: FrameIterator<R>,
}

impl<R> FallibleEventIterator<R> {
    fn new(parser: BgpmonParser<R>) -> Self {
        FallibleEventIterator {
            frames: FrameIterator::new(parser),
        }
    }
}

impl<R: Read> Iterator for FallibleEventIterator<R> {
    type Item = Result<BgpEvent, ParserError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = match self.frames.next_frame()? {
                Ok(frame) => frame,
                Err(e) => return Some(Err(e)),
            };
            match process_frame(&frame, self.frames.asn_filter()) {
                Ok(Some(event)) => return Some(Ok(event)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventType;
    use std::io::Cursor;

    const HEADER: &str = r#"<BGP_MONITOR_MESSAGE xmlns="urn:ietf:params:xml:ns:bgp_monitor" xmlns:bgp="urn:ietf:params:xml:ns:xfb"><SOURCE><ADDRESS>192.0.2.1</ADDRESS><ASN2>64512</ASN2></SOURCE>"#;

    fn announcement(path: &[&str], prefix: &str) -> String {
        let hops = path
            .iter()
            .map(|asn| format!("<bgp:ASN2>{}</bgp:ASN2>", asn))
            .collect::<String>();
        format!(
            "{}<bgp:UPDATE><bgp:AS_PATH><bgp:AS_SEG>{}</bgp:AS_SEG></bgp:AS_PATH><bgp:NLRI>{}</bgp:NLRI></bgp:UPDATE></BGP_MONITOR_MESSAGE>",
            HEADER, hops, prefix
        )
    }

    fn keep_alive() -> String {
        format!("{}<bgp:KEEP_ALIVE/></BGP_MONITOR_MESSAGE>", HEADER)
    }

    #[test]
    fn test_invalid_frame_isolated() {
        let stream = format!(
            "<xml>{}<xml><BGP_MONITOR_MESSAGE><SOURCE></BGP_MONITOR_MESSAGE><xml>{}",
            announcement(&["64512", "64500"], "10.0.0.0/24"),
            announcement(&["64512", "64501"], "10.0.1.0/24"),
        );
        let events = BgpmonParser::new(Cursor::new(stream))
            .into_event_iter()
            .collect::<Vec<_>>();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].prefixes, vec!["10.0.0.0/24"]);
        assert_eq!(events[1].prefixes, vec!["10.0.1.0/24"]);
    }

    #[test]
    fn test_fallible_reports_invalid_frame() {
        let stream = format!(
            "{}<BGP_MONITOR_MESSAGE><SOURCE></BGP_MONITOR_MESSAGE>{}",
            announcement(&["64500"], "10.0.0.0/24"),
            announcement(&["64501"], "10.0.1.0/24"),
        );
        let results = BgpmonParser::new(Cursor::new(stream))
            .into_fallible_event_iter()
            .collect::<Vec<_>>();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(ParserError::StructuralParseError(_))
        ));
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_keep_alive_suppressed() {
        let stream = format!("{}{}", keep_alive(), keep_alive());
        let parser = BgpmonParser::new(Cursor::new(stream));
        assert_eq!(parser.into_event_iter().count(), 0);
    }

    #[test]
    fn test_filter_applied() {
        let stream = format!(
            "{}{}{}",
            announcement(&["64500", "64501"], "10.0.0.0/24"),
            announcement(&["64501", "64500"], "10.0.1.0/24"),
            announcement(&[], "10.0.2.0/24"),
        );
        let parser = BgpmonParser::new(Cursor::new(stream))
            .with_filter(Some(AsnFilter::new(["64500"])));
        let events = parser.into_iter().collect::<Vec<_>>();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].path, vec!["64501", "64500"]);
        assert!(events[1].path.is_empty());
        assert!(events.iter().all(|e| e.event_type == EventType::Announcement));
    }

    #[test]
    fn test_frame_iter_passes_everything() {
        let stream = format!(
            "{}<BGP_MONITOR_MESSAGE>broken</BGP_MONITOR_MESSAGE>{}trailing",
            keep_alive(),
            announcement(&["64500"], "10.0.0.0/24"),
        );
        let mut frames = BgpmonParser::new(Cursor::new(stream)).into_frame_iter();
        assert_eq!(frames.by_ref().count(), 3);
        assert_eq!(frames.count, 3);
    }
}
