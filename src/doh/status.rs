//! Response status codes reported in the `Status` field of a DoH JSON body.

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ErrorEntry {
    pub name: &'static str,
    pub description: &'static str,
}

const fn entry(name: &'static str, description: &'static str) -> ErrorEntry {
    ErrorEntry { name, description }
}

/// RCODE table, indexed by status code.
pub static RESPONSE_CODES: [ErrorEntry; 10] = [
    entry("NoError", "No Error."),
    entry("FormErr", "Format Error."),
    entry("ServFail", "Server Failure."),
    entry("NXDomain", "Non-Existent Domain."),
    entry("NotImp", "Not Implemented."),
    entry("Refused", "Query Refused."),
    entry("YXDomain", "Name Exists when it should not."),
    entry("YXRRSet", "RR Set Exists when it should not."),
    entry("NXRRSet", "RR Set that should exist does not."),
    entry("NotAuth", "Not Authorized."),
];

/// Returns the table entry for `code`, or `None` when the upstream reported
/// a value outside 0..=9.
pub fn lookup(code: i64) -> Option<&'static ErrorEntry> {
    usize::try_from(code)
        .ok()
        .and_then(|index| RESPONSE_CODES.get(index))
}

/// Text shown to the caller for a non-zero status.
pub fn failure_message(code: i64) -> String {
    match lookup(code) {
        Some(entry) => format!("Error: {}", entry.description),
        None => format!("Error: Unknown status code {code}."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_code() {
        assert_eq!(lookup(0).map(|e| e.name), Some("NoError"));
        assert_eq!(lookup(3).map(|e| e.name), Some("NXDomain"));
        assert_eq!(lookup(9).map(|e| e.name), Some("NotAuth"));
    }

    #[test]
    fn out_of_range_codes_are_unmapped() {
        assert!(lookup(10).is_none());
        assert!(lookup(-1).is_none());
        assert!(lookup(i64::MAX).is_none());
    }

    #[test]
    fn failure_message_uses_description() {
        assert_eq!(failure_message(2), "Error: Server Failure.");
        assert_eq!(failure_message(5), "Error: Query Refused.");
        assert_eq!(failure_message(23), "Error: Unknown status code 23.");
    }
}
