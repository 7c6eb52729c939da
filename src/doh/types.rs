use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::InputError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Caa,
    Cname,
    Ds,
    Dnskey,
    Mx,
    Ns,
    Nsec,
    Nsec3,
    Rrsig,
    Soa,
    Txt,
}

impl RecordType {
    /// Every record type accepted by [`dns_record`](super::dns_record).
    pub const ALL: [RecordType; 13] = [
        Self::A,
        Self::Aaaa,
        Self::Caa,
        Self::Cname,
        Self::Ds,
        Self::Dnskey,
        Self::Mx,
        Self::Ns,
        Self::Nsec,
        Self::Nsec3,
        Self::Rrsig,
        Self::Soa,
        Self::Txt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Caa => "CAA",
            Self::Cname => "CNAME",
            Self::Ds => "DS",
            Self::Dnskey => "DNSKEY",
            Self::Mx => "MX",
            Self::Ns => "NS",
            Self::Nsec => "NSEC",
            Self::Nsec3 => "NSEC3",
            Self::Rrsig => "RRSIG",
            Self::Soa => "SOA",
            Self::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(InputError::EmptyRecordType);
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| InputError::unknown_record_type(normalized))
    }
}

/// Trimmed, lower-cased, non-empty domain name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Domain(String);

impl Domain {
    pub fn parse(input: &str) -> Result<Self, InputError> {
        let normalized = input.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(InputError::EmptyDomain);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsQuery {
    pub record_type: RecordType,
    pub domain: Domain,
}

impl DnsQuery {
    pub fn new(record_type: RecordType, domain: Domain) -> Self {
        Self {
            record_type,
            domain,
        }
    }

    /// Validates raw caller input. Checks run in a fixed order: empty record
    /// type, empty domain, unknown record type.
    pub fn parse(record_type: &str, domain: &str) -> Result<Self, InputError> {
        if record_type.trim().is_empty() {
            return Err(InputError::EmptyRecordType);
        }
        let domain = Domain::parse(domain)?;
        let record_type = record_type.parse()?;
        Ok(Self::new(record_type, domain))
    }
}

/// `data` fields of the answer section, in upstream order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DnsAnswer(Vec<String>);

impl DnsAnswer {
    pub fn new(records: Vec<String>) -> Self {
        Self(records)
    }

    pub fn records(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma-joined form, without spacing or trailing separator.
    pub fn joined(&self) -> String {
        self.0.join(",")
    }
}

/// JSON body returned by the DoH endpoint (`application/dns-json`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct DohBody {
    #[serde(rename = "Status")]
    pub status: i64,
    #[serde(rename = "Answer", default)]
    pub answer: Option<Vec<DohRecord>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct DohRecord {
    #[serde(default)]
    pub data: String,
}
