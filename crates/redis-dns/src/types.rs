//! DNS record types and data structures.
//!
//! - `Record`: the JSON document stored under a hostname (or wildcard) key
//! - `QueryType`: the question types the answer builder distinguishes
//! - `Answer` / `AnswerData`: synthesized answers, independent of the wire codec

use std::fmt;
use std::net::Ipv4Addr;
use std::net::Ipv6Addr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

// ============================================================================
// Stored Record
// ============================================================================

/// DNS data stored for one name or wildcard pattern.
///
/// Serialized as JSON with the field names writers already use:
///
/// ```json
/// { "cname": "", "ipv4_public_ips": ["10.0.0.5"], "ipv6_public_ips": [],
///   "mx_servers": [], "name_servers": [], "mbox": "", "ttl": 0 }
/// ```
///
/// Every field is optional and `null` reads as the empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Alias target.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub cname: String,

    /// IPv4 addresses, in the order they are answered.
    #[serde(
        rename = "ipv4_public_ips",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub ipv4_addresses: Vec<Ipv4Addr>,

    /// IPv6 addresses, in the order they are answered.
    #[serde(
        rename = "ipv6_public_ips",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub ipv6_addresses: Vec<Ipv6Addr>,

    /// Mail exchangers. All share the configured MX preference.
    #[serde(
        rename = "mx_servers",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub mail_servers: Vec<String>,

    /// Name servers authoritative for this name.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub name_servers: Vec<String>,

    /// Administrative contact in dotted form (`hostmaster.example.com.`).
    #[serde(
        rename = "mbox",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub mailbox: String,

    /// TTL in seconds. Zero means "use the zone default".
    #[serde(default, deserialize_with = "null_as_default")]
    pub ttl: u32,
}

impl Record {
    /// Parse a stored JSON value.
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Serialize to the stored JSON form.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// True when no data field is populated.
    ///
    /// Such a record answers nothing and is handled exactly like a missing key.
    /// The TTL is not a data field.
    pub fn is_empty(&self) -> bool {
        self.cname.is_empty()
            && self.ipv4_addresses.is_empty()
            && self.ipv6_addresses.is_empty()
            && self.mail_servers.is_empty()
            && self.name_servers.is_empty()
            && self.mailbox.is_empty()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Query Type
// ============================================================================

/// Question types the answer builder handles.
///
/// Anything else is carried as `Other` with its numeric code and gets no answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    /// IPv4 address (1).
    A,
    /// IPv6 address (28).
    AAAA,
    /// Canonical name (5).
    CNAME,
    /// Mail exchange (15).
    MX,
    /// Name server (2).
    NS,
    /// Start of authority (6).
    SOA,
    /// Any type (255).
    ANY,
    /// Unsupported type code.
    Other(u16),
}

impl From<u16> for QueryType {
    fn from(code: u16) -> Self {
        match code {
            1 => QueryType::A,
            28 => QueryType::AAAA,
            5 => QueryType::CNAME,
            15 => QueryType::MX,
            2 => QueryType::NS,
            6 => QueryType::SOA,
            255 => QueryType::ANY,
            other => QueryType::Other(other),
        }
    }
}

impl From<QueryType> for u16 {
    fn from(query_type: QueryType) -> Self {
        match query_type {
            QueryType::A => 1,
            QueryType::AAAA => 28,
            QueryType::CNAME => 5,
            QueryType::MX => 15,
            QueryType::NS => 2,
            QueryType::SOA => 6,
            QueryType::ANY => 255,
            QueryType::Other(code) => code,
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryType::A => write!(f, "A"),
            QueryType::AAAA => write!(f, "AAAA"),
            QueryType::CNAME => write!(f, "CNAME"),
            QueryType::MX => write!(f, "MX"),
            QueryType::NS => write!(f, "NS"),
            QueryType::SOA => write!(f, "SOA"),
            QueryType::ANY => write!(f, "ANY"),
            QueryType::Other(code) => write!(f, "TYPE{code}"),
        }
    }
}

// ============================================================================
// Synthesized Answers
// ============================================================================

/// One synthesized answer record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// Owner name (FQDN).
    pub name: String,
    /// TTL in seconds.
    pub ttl: u32,
    /// Type-specific data.
    pub data: AnswerData,
}

/// Type-specific answer data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerData {
    /// IPv4 address.
    A(Ipv4Addr),
    /// IPv6 address.
    AAAA(Ipv6Addr),
    /// Alias target.
    CNAME(String),
    /// Mail exchanger.
    MX {
        /// Lower is preferred.
        preference: u16,
        /// Exchanger hostname.
        exchange: String,
    },
    /// Name server hostname.
    NS(String),
    /// Start of authority.
    SOA(SoaData),
}

impl AnswerData {
    /// Query type this data answers.
    pub fn query_type(&self) -> QueryType {
        match self {
            AnswerData::A(_) => QueryType::A,
            AnswerData::AAAA(_) => QueryType::AAAA,
            AnswerData::CNAME(_) => QueryType::CNAME,
            AnswerData::MX { .. } => QueryType::MX,
            AnswerData::NS(_) => QueryType::NS,
            AnswerData::SOA(_) => QueryType::SOA,
        }
    }
}

/// SOA fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoaData {
    /// Primary name server.
    pub mname: String,
    /// Responsible mailbox, dotted form.
    pub rname: String,
    /// Zone serial.
    pub serial: u32,
    /// Refresh interval (seconds).
    pub refresh: u32,
    /// Retry interval (seconds).
    pub retry: u32,
    /// Expire interval (seconds).
    pub expire: u32,
    /// Negative caching TTL (seconds).
    pub minimum: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_json_full() {
        let json = br#"{
            "cname": "alias.example.com.",
            "ipv4_public_ips": ["10.0.0.5", "10.0.0.6"],
            "ipv6_public_ips": ["2001:db8::1"],
            "mx_servers": ["mail.example.com."],
            "name_servers": ["ns1.example.com."],
            "mbox": "hostmaster.example.com.",
            "ttl": 120
        }"#;
        let record = Record::from_json(json).unwrap();
        assert_eq!(record.cname, "alias.example.com.");
        assert_eq!(record.ipv4_addresses, vec![Ipv4Addr::new(10, 0, 0, 5), Ipv4Addr::new(10, 0, 0, 6)]);
        assert_eq!(record.ipv6_addresses, vec!["2001:db8::1".parse::<Ipv6Addr>().unwrap()]);
        assert_eq!(record.mail_servers, vec!["mail.example.com."]);
        assert_eq!(record.name_servers, vec!["ns1.example.com."]);
        assert_eq!(record.mailbox, "hostmaster.example.com.");
        assert_eq!(record.ttl, 120);
    }

    #[test]
    fn test_record_missing_and_null_fields() {
        let record = Record::from_json(br#"{"ipv4_public_ips":["10.0.0.5"],"ttl":0}"#).unwrap();
        assert_eq!(record.ipv4_addresses, vec![Ipv4Addr::new(10, 0, 0, 5)]);
        assert!(record.cname.is_empty());
        assert_eq!(record.ttl, 0);

        let record = Record::from_json(br#"{"cname":null,"ipv6_public_ips":null,"mx_servers":null,"ttl":null}"#).unwrap();
        assert_eq!(record, Record::default());
    }

    #[test]
    fn test_record_rejects_bad_address() {
        assert!(Record::from_json(br#"{"ipv4_public_ips":["not-an-ip"]}"#).is_err());
        assert!(Record::from_json(b"not json").is_err());
    }

    #[test]
    fn test_record_is_empty_ignores_ttl() {
        assert!(Record::default().is_empty());
        assert!(Record { ttl: 300, ..Default::default() }.is_empty());
        assert!(!Record { mailbox: "hostmaster.example.com.".into(), ..Default::default() }.is_empty());
        assert!(
            !Record {
                ipv6_addresses: vec![Ipv6Addr::LOCALHOST],
                ..Default::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn test_record_json_uses_stored_field_names() {
        let record = Record {
            ipv4_addresses: vec![Ipv4Addr::new(192, 0, 2, 1)],
            mailbox: "hostmaster.example.com.".into(),
            ttl: 60,
            ..Default::default()
        };
        let value: serde_json::Value = serde_json::from_slice(&record.to_json().unwrap()).unwrap();
        assert_eq!(value["ipv4_public_ips"][0], "192.0.2.1");
        assert_eq!(value["mbox"], "hostmaster.example.com.");
        assert_eq!(value["ttl"], 60);
        assert!(value.get("cname").is_none());
    }

    #[test]
    fn test_query_type_codes() {
        assert_eq!(QueryType::from(1), QueryType::A);
        assert_eq!(QueryType::from(28), QueryType::AAAA);
        assert_eq!(QueryType::from(5), QueryType::CNAME);
        assert_eq!(QueryType::from(15), QueryType::MX);
        assert_eq!(QueryType::from(2), QueryType::NS);
        assert_eq!(QueryType::from(6), QueryType::SOA);
        assert_eq!(QueryType::from(255), QueryType::ANY);
        assert_eq!(QueryType::from(16), QueryType::Other(16));
        assert_eq!(u16::from(QueryType::Other(16)), 16);
        assert_eq!(u16::from(QueryType::AAAA), 28);
    }

    #[test]
    fn test_query_type_display() {
        assert_eq!(QueryType::MX.to_string(), "MX");
        assert_eq!(QueryType::Other(99).to_string(), "TYPE99");
    }

    #[test]
    fn test_answer_data_query_type() {
        assert_eq!(AnswerData::NS("ns1.example.com.".into()).query_type(), QueryType::NS);
        let mx = AnswerData::MX {
            preference: 10,
            exchange: "mail.example.com.".into(),
        };
        assert_eq!(mx.query_type(), QueryType::MX);
    }
}
