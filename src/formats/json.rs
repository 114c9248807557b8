use crate::error::ParserError;
use crate::models::BgpEvent;

/// Serializes an event as a single-line JSON object with the keys `type`, `asn`,
/// `prefixes` and `path`.
pub fn format_event_json(event: &BgpEvent) -> Result<String, ParserError> {
    Ok(serde_json::to_string(event)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventType;

    #[test]
    fn test_announcement_json() {
        let event = BgpEvent {
            event_type: EventType::Announcement,
            monitor_asn: "64512".to_string(),
            monitor_address: "192.0.2.1".to_string(),
            prefixes: vec!["10.0.0.0/24".to_string()],
            path: vec!["64512".to_string(), "64500".to_string()],
        };
        let json = format_event_json(&event).unwrap();
        assert_eq!(
            json,
            r#"{"type":"announcement","asn":"64512","prefixes":["10.0.0.0/24"],"path":["64512","64500"]}"#
        );

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 4);
        assert!(value.get("monitor_address").is_none());
    }
}
