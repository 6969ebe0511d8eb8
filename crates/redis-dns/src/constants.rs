//! Constants for the DNS engine.
//!
//! These are the defaults a [`ZoneConfig`](crate::ZoneConfig) starts from.
//! Nothing reads them as ambient state at query time.

use std::time::Duration;

// ============================================================================
// Well-Known Store Keys
// ============================================================================

/// Store key holding the zone serial number as decimal text.
pub const SERIAL_NUMBER_KEY: &str = "redis-dns-server-serial-no";

/// Store key holding the name-server list when it is not configured statically.
///
/// The value is a comma-separated list of hostnames, e.g.
/// `ns1.example.com.,ns2.example.com.`.
pub const NAME_SERVERS_KEY: &str = "redis-dns-server-name-servers";

/// Separator between entries of [`NAME_SERVERS_KEY`].
pub const NAME_SERVER_DELIMITER: char = ',';

// ============================================================================
// TTL Constants
// ============================================================================

/// TTL applied to records stored with `ttl = 0` (5 minutes).
pub const DEFAULT_TTL: u32 = 300;

/// TTL of synthesized SOA records.
///
/// Kept short and separate from the data TTL so negative answers expire fast.
pub const SOA_TTL: u32 = 60;

// ============================================================================
// Record Synthesis Constants
// ============================================================================

/// Preference value given to every MX record.
pub const MX_PREFERENCE: u16 = 10;

/// SOA refresh interval in seconds.
pub const SOA_REFRESH: u32 = 86_400;

/// SOA retry interval in seconds.
pub const SOA_RETRY: u32 = 7_200;

/// SOA expire interval in seconds.
///
/// RFC 1912 suggests 2-4 weeks for zones with secondaries; this server has
/// none, so a short value is used.
pub const SOA_EXPIRE: u32 = 3_600;

/// SOA minimum (negative caching) TTL in seconds.
pub const SOA_MINIMUM: u32 = 60;

// ============================================================================
// Name Constants
// ============================================================================

/// Label separator in domain names. Also the root label marker at the end of an FQDN.
pub const LABEL_SEPARATOR: char = '.';

/// Label that replaces the leftmost label in a wildcard key.
pub const WILDCARD_LABEL: &str = "*";

/// How many labels below the apex a name must reach, beyond the first, before
/// wildcard fallback is attempted.
///
/// With the default of 1 and apex `example.com.`, `a.b.example.com.` may fall
/// back to `*.b.example.com.` but `a.example.com.` never falls back.
pub const WILDCARD_DEPTH_MARGIN: usize = 1;

// ============================================================================
// Server Constants
// ============================================================================

/// Standard DNS port.
pub const DEFAULT_DNS_PORT: u16 = 53;

/// Idle timeout for TCP connections.
pub const TCP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
