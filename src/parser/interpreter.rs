/*!
Interpretation of a single BGPmon XML message.

A message looks like this (namespaces shortened):

```text
<BGP_MONITOR_MESSAGE xmlns="urn:ietf:params:xml:ns:bgp_monitor"
                     xmlns:bgp="urn:ietf:params:xml:ns:xfb">
  <SOURCE><ADDRESS>192.0.2.1</ADDRESS><ASN2>64512</ASN2></SOURCE>
  <bgp:UPDATE>
    <bgp:WITHDRAW>10.0.0.0/24</bgp:WITHDRAW>
    <bgp:AS_PATH><bgp:AS_SEG><bgp:ASN2>64512</bgp:ASN2></bgp:AS_SEG></bgp:AS_PATH>
    <bgp:NLRI>10.1.0.0/16</bgp:NLRI>
  </bgp:UPDATE>
</BGP_MONITOR_MESSAGE>
```

There is no explicit message type: a message with at least one `WITHDRAW` is a withdrawal,
otherwise an `UPDATE` is an announcement, and a `KEEP_ALIVE` element marks a keep-alive.
*/
use crate::error::ParserError;
use crate::models::{BgpEvent, EventType, RawFrame};
use log::{debug, info};
use roxmltree::{Document, Node};

pub const BGP_MONITOR_NS: &str = "urn:ietf:params:xml:ns:bgp_monitor";
pub const XFB_NS: &str = "urn:ietf:params:xml:ns:xfb";

const ASN_TAGS: [&str; 2] = ["ASN2", "ASN4"];

/// The BGPmon instance and peering session that reported a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSource {
    pub address: String,
    pub asn: String,
}

/// Message kind, decided once per frame from the elements present.
#[derive(Debug, Clone, Copy)]
pub enum MessageClass<'a, 'input: 'a> {
    KeepAlive,
    /// Carries the `UPDATE` element holding at least one `WITHDRAW`.
    Withdrawal(Node<'a, 'input>),
    /// Carries the `UPDATE` element without any `WITHDRAW`.
    Announcement(Node<'a, 'input>),
}

/// Interprets one frame, returning `Ok(None)` for keep-alive messages.
pub fn interpret(frame: &RawFrame) -> Result<Option<BgpEvent>, ParserError> {
    parse_bgpmon_message(frame.as_str()?)
}

/// Parses one `<BGP_MONITOR_MESSAGE>` document into a [BgpEvent].
///
/// Withdrawals take precedence: if the update carries any `WITHDRAW` element, the AS path
/// and NLRI of the message are ignored.
pub fn parse_bgpmon_message(msg_str: &str) -> Result<Option<BgpEvent>, ParserError> {
    let doc = Document::parse(msg_str)?;
    let root = doc.root_element();
    debug!("root: {}", root.tag_name().name());

    let source = parse_monitor_source(root)?;

    let (event_type, update) = match classify(root)? {
        MessageClass::KeepAlive => {
            info!("BGP KEEP ALIVE {} (AS {})", source.address, source.asn);
            return Ok(None);
        }
        MessageClass::Withdrawal(update) => (EventType::Withdrawal, update),
        MessageClass::Announcement(update) => (EventType::Announcement, update),
    };

    let event = match event_type {
        EventType::Withdrawal => {
            let prefixes = element_texts(update, "WITHDRAW");
            for prefix in &prefixes {
                info!("BGP WITHDRAW {} by AS {}", prefix, source.asn);
            }
            BgpEvent {
                event_type,
                monitor_asn: source.asn,
                monitor_address: source.address,
                prefixes,
                path: vec![],
            }
        }
        EventType::Announcement => {
            let path = match child(update, XFB_NS, "AS_PATH") {
                Some(as_path) => descendants(as_path)
                    .filter(|n| ASN_TAGS.iter().any(|tag| n.has_tag_name((XFB_NS, *tag))))
                    .filter_map(node_text)
                    .collect(),
                None => vec![],
            };
            BgpEvent {
                event_type,
                monitor_asn: source.asn,
                monitor_address: source.address,
                prefixes: element_texts(update, "NLRI"),
                path,
            }
        }
    };
    Ok(Some(event))
}

/// Extracts the monitoring source from the root element.
///
/// The `ADDRESS` and `ASN2`/`ASN4` elements must be present, but may be empty. The ASN is
/// taken from the first of them that carries text.
pub fn parse_monitor_source(root: Node) -> Result<MonitorSource, ParserError> {
    let source = child(root, BGP_MONITOR_NS, "SOURCE")
        .ok_or(ParserError::SemanticIncompleteError("SOURCE"))?;
    let address = child(source, BGP_MONITOR_NS, "ADDRESS")
        .ok_or(ParserError::SemanticIncompleteError("ADDRESS"))?;
    let asn_nodes = ASN_TAGS
        .iter()
        .filter_map(|tag| child(source, BGP_MONITOR_NS, tag))
        .collect::<Vec<_>>();
    if asn_nodes.is_empty() {
        return Err(ParserError::SemanticIncompleteError("ASN2"));
    }
    Ok(MonitorSource {
        address: node_text(address).unwrap_or_default(),
        asn: asn_nodes.into_iter().find_map(node_text).unwrap_or_default(),
    })
}

/// Classifies a message by the presence of its marker elements.
///
/// Messages without a keep-alive marker must carry an `UPDATE` element.
pub fn classify<'a, 'input>(
    root: Node<'a, 'input>,
) -> Result<MessageClass<'a, 'input>, ParserError> {
    let keep_alive = root.children().any(|n| {
        n.has_tag_name((XFB_NS, "KEEP_ALIVE")) || n.has_tag_name((BGP_MONITOR_NS, "KEEP_ALIVE"))
    });
    if keep_alive {
        return Ok(MessageClass::KeepAlive);
    }
    let update =
        child(root, XFB_NS, "UPDATE").ok_or(ParserError::SemanticIncompleteError("UPDATE"))?;
    if descendants(update).any(|n| n.has_tag_name((XFB_NS, "WITHDRAW"))) {
        Ok(MessageClass::Withdrawal(update))
    } else {
        Ok(MessageClass::Announcement(update))
    }
}

fn child<'a, 'input>(node: Node<'a, 'input>, ns: &str, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name((ns, name)))
}

/// All descendants of `node`, excluding `node` itself, in document order.
fn descendants<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants().skip(1)
}

/// Texts of all `name` elements below `node`; elements without text are skipped.
fn element_texts(node: Node, name: &str) -> Vec<String> {
    descendants(node)
        .filter(|n| n.has_tag_name((XFB_NS, name)))
        .filter_map(node_text)
        .collect()
}

fn node_text(node: Node) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
}
