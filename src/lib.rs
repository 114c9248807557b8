/*!
bgpmon-parser is a streaming parser for [BGPmon](https://bgpmon.io) XML update feeds.

A BGPmon server emits an endless stream of concatenated `<BGP_MONITOR_MESSAGE>` XML
documents over TCP. This crate cuts that stream into complete message frames, interprets
each frame as a BGP announcement, withdrawal or keep-alive, optionally filters the result
by origin AS, and renders it as JSON or pretty-printed XML.

# Examples

## Parsing events from a stream

Any [std::io::Read] can serve as the source. Keep-alives and malformed frames are skipped;
the latter are logged through the [log] facade.

```
use bgpmon_parser::{BgpmonParser, EventType};
use std::io::Cursor;

let stream = concat!(
    "<xml>",
    r#"<BGP_MONITOR_MESSAGE xmlns="urn:ietf:params:xml:ns:bgp_monitor" xmlns:bgp="urn:ietf:params:xml:ns:xfb">"#,
    "<SOURCE><ADDRESS>192.0.2.1</ADDRESS><ASN2>64512</ASN2></SOURCE>",
    "<bgp:UPDATE><bgp:WITHDRAW>10.0.0.0/24</bgp:WITHDRAW></bgp:UPDATE>",
    "</BGP_MONITOR_MESSAGE>",
);

let events = BgpmonParser::new(Cursor::new(stream)).into_event_iter().collect::<Vec<_>>();
assert_eq!(events.len(), 1);
assert_eq!(events[0].event_type, EventType::Withdrawal);
assert_eq!(events[0].prefixes, vec!["10.0.0.0/24"]);
```

## Filtering by origin AS

```
use bgpmon_parser::{AsnFilter, BgpmonParser};
use std::io::Cursor;

let parser = BgpmonParser::new(Cursor::new(""))
    .with_filter(Some(AsnFilter::from_list("64500,64501")));
assert_eq!(parser.into_event_iter().count(), 0);
```

## Reading from a live feed

```no_run
use bgpmon_parser::{write_output, BgpmonParser, OutputFormat};
use std::time::Duration;

let parser = BgpmonParser::connect("livebgp.netsec.colostate.edu", 50001, Some(Duration::from_secs(60))).unwrap();
let mut stdout = std::io::stdout();
write_output(parser, OutputFormat::Json, &mut stdout).unwrap();
```
*/

pub mod error;
pub mod formats;
pub mod io;
pub mod models;
pub mod parser;

pub use error::ParserError;
pub use formats::{format_event_json, format_frame_xml, write_output, OutputFormat};
pub use models::{BgpEvent, EventType, RawFrame};
pub use parser::iters::{EventIterator, FallibleEventIterator, FrameIterator};
pub use parser::{AsnFilter, BgpmonParser, FrameReassembler, ParserOptions};
