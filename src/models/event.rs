use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// # EventType
///
/// Type of a routing event emitted downstream. Keep-alive messages are recognized by the
/// interpreter but never become events.
///
/// Serialized as `"announcement"` or `"withdraw"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "announcement")]
    Announcement,
    #[serde(rename = "withdraw")]
    Withdrawal,
}

impl EventType {
    pub fn is_announce(&self) -> bool {
        match self {
            EventType::Announcement => true,
            EventType::Withdrawal => false,
        }
    }
}

impl Display for EventType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::Announcement => write!(f, "A"),
            EventType::Withdrawal => write!(f, "W"),
        }
    }
}

/// BgpEvent represents one BGP update reported by a BGPmon monitor.
///
/// ASNs and prefixes are kept as the tokens found in the feed; no numeric or address
/// normalization is applied.
///
/// The JSON form carries exactly the keys `type`, `asn`, `prefixes` and `path`:
///
/// ```
/// use bgpmon_parser::models::{BgpEvent, EventType};
///
/// let event = BgpEvent {
///     event_type: EventType::Withdrawal,
///     monitor_asn: "64512".to_string(),
///     monitor_address: "192.0.2.1".to_string(),
///     prefixes: vec!["10.0.0.0/24".to_string()],
///     path: vec![],
/// };
/// assert_eq!(
///     serde_json::to_string(&event).unwrap(),
///     r#"{"type":"withdraw","asn":"64512","prefixes":["10.0.0.0/24"],"path":[]}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BgpEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// ASN of the monitoring source that reported the update, not the route's origin.
    #[serde(rename = "asn")]
    pub monitor_asn: String,
    /// Address of the monitoring source; not part of the serialized form.
    #[serde(skip)]
    pub monitor_address: String,
    /// Withdrawn prefixes for withdrawals, NLRI prefixes for announcements.
    pub prefixes: Vec<String>,
    /// AS path hops, nearest to the monitor first. Always empty for withdrawals.
    pub path: Vec<String>,
}

impl BgpEvent {
    /// The last hop of the AS path, i.e. the AS that originated the route.
    pub fn origin_asn(&self) -> Option<&str> {
        self.path.last().map(|s| s.as_str())
    }
}

impl Display for BgpEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}",
            self.event_type,
            self.monitor_address,
            self.monitor_asn,
            self.prefixes.iter().join(","),
            self.path.iter().join(" "),
        )
    }
}
