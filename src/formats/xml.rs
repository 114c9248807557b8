use crate::error::ParserError;
use crate::models::RawFrame;
use quick_xml::events::{BytesDecl, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

/// Re-indents a raw frame for human consumption.
///
/// The frame is checked for well-formedness first, so a truncated or garbled frame is
/// reported instead of being echoed half-formatted. Whitespace-only text between elements
/// is dropped and replaced by tab indentation; element text is kept as is.
pub fn format_frame_xml(frame: &RawFrame) -> Result<String, ParserError> {
    let text = frame.as_str()?;
    roxmltree::Document::parse(text)?;

    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
    loop {
        match reader.read_event()? {
            Event::Eof => break,
            // replaced by our own declaration above
            Event::Decl(_) => {}
            Event::Text(e) if e.iter().all(u8::is_ascii_whitespace) => {}
            event => writer.write_event(event)?,
        }
    }
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}
