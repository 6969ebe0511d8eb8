//! Record seeding from a JSON file.
//!
//! The file is a single JSON object mapping store keys to values:
//!
//! ```json
//! {
//!   "redis-dns-server-serial-no": "2024060101",
//!   "redis-dns-server-name-servers": "ns1.example.com.,ns2.example.com.",
//!   "www.example.com.": { "ipv4_public_ips": ["10.0.0.5"], "ttl": 0 }
//! }
//! ```
//!
//! String values are stored verbatim. Object values must parse as a
//! [`Record`] and are stored in its canonical JSON form.

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use redis_dns::Record;
use serde_json::Value;
use snafu::ResultExt;
use snafu::Snafu;

/// Seed file loading errors.
#[derive(Debug, Snafu)]
pub enum SeedError {
    #[snafu(display("failed to read seed file {}: {source}", path.display()))]
    ReadSeed { path: PathBuf, source: std::io::Error },

    #[snafu(display("seed file {} is not a JSON object of keys to values: {source}", path.display()))]
    ParseSeed { path: PathBuf, source: serde_json::Error },

    #[snafu(display("seed entry '{key}' is not a valid record: {source}"))]
    InvalidRecord { key: String, source: serde_json::Error },
}

/// Read `path` into `(key, value)` pairs ready to store, in key order.
pub fn load_seed_file(path: &Path) -> Result<Vec<(String, Vec<u8>)>, SeedError> {
    let content = std::fs::read_to_string(path).context(ReadSeedSnafu { path })?;
    let entries: BTreeMap<String, Value> = serde_json::from_str(&content).context(ParseSeedSnafu { path })?;
    entries.into_iter().map(|(key, value)| encode_entry(key, value)).collect()
}

fn encode_entry(key: String, value: Value) -> Result<(String, Vec<u8>), SeedError> {
    match value {
        Value::String(text) => Ok((key, text.into_bytes())),
        other => {
            let record: Record = serde_json::from_value(other).context(InvalidRecordSnafu { key: key.as_str() })?;
            let bytes = record.to_json().context(InvalidRecordSnafu { key: key.as_str() })?;
            Ok((key, bytes))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_seed(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_load_seed_file() {
        let file = write_seed(
            r#"{
                "www.example.com.": {"ipv4_public_ips": ["10.0.0.5"], "ttl": 0},
                "redis-dns-server-serial-no": "7"
            }"#,
        );
        let entries = load_seed_file(file.path()).unwrap();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0], ("redis-dns-server-serial-no".to_string(), b"7".to_vec()));
        assert_eq!(entries[1].0, "www.example.com.");
        let record = Record::from_json(&entries[1].1).unwrap();
        assert_eq!(record.ipv4_addresses, vec![std::net::Ipv4Addr::new(10, 0, 0, 5)]);
    }

    #[test]
    fn test_invalid_record_is_rejected() {
        let file = write_seed(r#"{"www.example.com.": {"ipv4_public_ips": ["not-an-ip"]}}"#);
        let result = load_seed_file(file.path());
        assert!(matches!(result, Err(SeedError::InvalidRecord { key, .. }) if key == "www.example.com."));
    }

    #[test]
    fn test_seed_file_errors() {
        assert!(matches!(load_seed_file(Path::new("/nonexistent/seed.json")), Err(SeedError::ReadSeed { .. })));

        let file = write_seed(r#"["not", "an", "object"]"#);
        assert!(matches!(load_seed_file(file.path()), Err(SeedError::ParseSeed { .. })));
    }
}
