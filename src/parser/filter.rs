/*!
Origin ASN filtering.

An [AsnFilter] holds a set of ASN tokens. An event passes the filter when the last hop of
its AS path (the origin AS) is in the set. Events without an AS path, which includes all
withdrawals, cannot be judged and always pass.

ASNs are compared as plain strings: `"64512"` and `"AS64512"` are different tokens.

Filters can be built from a comma-separated list:

```
use bgpmon_parser::AsnFilter;

let filter = AsnFilter::from_list("64500,64501");
assert!(filter.contains("64500"));
assert!(!filter.contains("AS64500"));
```

or read from a CSV file with [AsnFilter::from_file], where the first field of each line is
taken and lines whose first field is not numeric (headers, comments) are ignored.
*/
use crate::error::ParserError;
use crate::models::BgpEvent;
use log::{info, warn};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsnFilter {
    asns: HashSet<String>,
}

impl AsnFilter {
    pub fn new<I, S>(asns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AsnFilter {
            asns: asns.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a filter from a comma-separated list of ASN tokens. Empty tokens are skipped.
    pub fn from_list(list: &str) -> Self {
        AsnFilter::new(list.split(',').map(str::trim).filter(|s| !s.is_empty()))
    }

    /// Reads a filter from a file with one record per line, using the first comma-separated
    /// field of every line whose first field is numeric.
    ///
    /// Returns `Ok(None)` when the file contains no usable ASN, so callers fall back to
    /// no filtering.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Option<AsnFilter>, ParserError> {
        let path = path.as_ref();
        info!("reading ASN filter from {}", path.display());
        let content =
            std::fs::read_to_string(path).map_err(|e| ParserError::FilterLoadError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let filter = AsnFilter::new(content.lines().filter_map(|line| {
            let field = line.split(',').next()?.trim();
            match u32::from_str(field) {
                Ok(_) => Some(field),
                Err(_) => None,
            }
        }));
        if filter.is_empty() {
            warn!("no ASN found in filter file {}", path.display());
            return Ok(None);
        }
        Ok(Some(filter))
    }

    pub fn contains(&self, asn: &str) -> bool {
        self.asns.contains(asn)
    }

    pub fn len(&self) -> usize {
        self.asns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asns.is_empty()
    }
}

impl FromStr for AsnFilter {
    type Err = ParserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(AsnFilter::from_list(s))
    }
}

pub trait Filterable {
    fn match_filter(&self, filter: &AsnFilter) -> bool;
}

impl Filterable for BgpEvent {
    fn match_filter(&self, filter: &AsnFilter) -> bool {
        match self.origin_asn() {
            Some(origin) => filter.contains(origin),
            None => true,
        }
    }
}

/// Decides whether `event` passes the optional `filter`; no filter admits everything.
pub fn admit(event: &BgpEvent, filter: Option<&AsnFilter>) -> bool {
    match filter {
        Some(filter) => event.match_filter(filter),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventType;
    use std::io::Write;

    fn announcement(path: &[&str]) -> BgpEvent {
        BgpEvent {
            event_type: EventType::Announcement,
            monitor_asn: "64512".to_string(),
            monitor_address: "192.0.2.1".to_string(),
            prefixes: vec!["10.0.0.0/24".to_string()],
            path: path.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_admit_by_origin() {
        let filter = AsnFilter::new(["64500"]);
        assert!(!admit(&announcement(&["64500", "64501"]), Some(&filter)));
        assert!(admit(&announcement(&["64501", "64500"]), Some(&filter)));
    }

    #[test]
    fn test_pathless_always_admitted() {
        let filter = AsnFilter::new(["64500"]);
        assert!(admit(&announcement(&[]), Some(&filter)));
        assert!(admit(&announcement(&[]), None));

        let mut withdrawal = announcement(&[]);
        withdrawal.event_type = EventType::Withdrawal;
        assert!(admit(&withdrawal, Some(&filter)));
    }

    #[test]
    fn test_no_filter() {
        assert!(admit(&announcement(&["64500", "64501"]), None));
    }

    #[test]
    fn test_exact_token_match() {
        let filter = AsnFilter::from_list("AS64500");
        assert!(!admit(&announcement(&["64500"]), Some(&filter)));
        assert!(admit(&announcement(&["AS64500"]), Some(&filter)));
    }

    #[test]
    fn test_from_list() {
        let filter: AsnFilter = "64500, 64501,,64502".parse().unwrap();
        assert_eq!(filter.len(), 3);
        assert!(filter.contains("64501"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "asn,name").unwrap();
        writeln!(file, "64500,EXAMPLE-NET").unwrap();
        writeln!(file, "64501").unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "AS64502,OTHER").unwrap();
        file.flush().unwrap();

        let filter = AsnFilter::from_file(file.path()).unwrap().unwrap();
        assert_eq!(filter, AsnFilter::new(["64500", "64501"]));
    }

    #[test]
    fn test_from_file_without_asns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "asn,name").unwrap();
        file.flush().unwrap();
        assert!(AsnFilter::from_file(file.path()).unwrap().is_none());
    }

    #[test]
    fn test_from_missing_file() {
        assert!(matches!(
            AsnFilter::from_file("/nonexistent/filter.csv"),
            Err(ParserError::FilterLoadError { .. })
        ));
    }
}
