//! Domain name helpers.
//!
//! Names here are plain strings in presentation form. Queried names arrive
//! fully qualified (`host.example.com.`), and configured names are normalized
//! to match with [`normalize_fqdn`].

use super::constants::LABEL_SEPARATOR;
use super::constants::WILDCARD_LABEL;
use super::error::DnsError;
use super::error::DnsResult;

/// Append the root separator if missing and lower-case the name.
///
/// ```
/// use redis_dns::names::normalize_fqdn;
///
/// assert_eq!(normalize_fqdn("Example.COM"), "example.com.");
/// assert_eq!(normalize_fqdn("example.com."), "example.com.");
/// ```
pub fn normalize_fqdn(name: &str) -> String {
    let mut fqdn = name.trim().to_ascii_lowercase();
    if !fqdn.ends_with(LABEL_SEPARATOR) {
        fqdn.push(LABEL_SEPARATOR);
    }
    fqdn
}

/// Append the root separator if missing, leaving case untouched.
pub fn ensure_trailing_dot(name: &str) -> String {
    if name.ends_with(LABEL_SEPARATOR) {
        name.to_string()
    } else {
        format!("{name}{LABEL_SEPARATOR}")
    }
}

/// Number of non-root labels in `name`.
///
/// `example.com.` and `example.com` both have two labels; `.` has none.
pub fn label_count(name: &str) -> usize {
    name.split(LABEL_SEPARATOR).filter(|label| !label.is_empty()).count()
}

/// Key under which a wildcard record covering `name` is stored.
///
/// The leftmost label is replaced by `*`; every other label and the trailing
/// separator are kept as-is, so `host.example.com.` maps to `*.example.com.`.
/// A name that is already a wildcard loses its `*` and wildcards the next
/// label: `*.example.com.` maps to `*.com.`. `*.` maps to itself.
pub fn wildcard_key(name: &str) -> String {
    let suffix = if is_wildcard(name) {
        name.split_once(LABEL_SEPARATOR).map_or("", |(_, rest)| rest)
    } else {
        name
    };
    match suffix.split_once(LABEL_SEPARATOR) {
        Some((_, rest)) => format!("{WILDCARD_LABEL}{LABEL_SEPARATOR}{rest}"),
        None if is_wildcard(name) => format!("{WILDCARD_LABEL}{LABEL_SEPARATOR}"),
        None => WILDCARD_LABEL.to_string(),
    }
}

/// Check if a name is a wildcard pattern.
pub fn is_wildcard(name: &str) -> bool {
    name.split(LABEL_SEPARATOR).next() == Some(WILDCARD_LABEL)
}

/// Validate and normalize a configured domain name.
pub fn validate_domain(name: &str) -> DnsResult<String> {
    let fqdn = normalize_fqdn(name);
    if label_count(&fqdn) == 0 {
        return Err(DnsError::InvalidName {
            name: name.to_string(),
            reason: "name has no labels".to_string(),
        });
    }
    if fqdn.contains("..") {
        return Err(DnsError::InvalidName {
            name: name.to_string(),
            reason: "empty label (consecutive dots)".to_string(),
        });
    }
    Ok(fqdn)
}

/// Validate and normalize the administrative mailbox.
///
/// SOA RNAME encodes `hostmaster@example.com` as `hostmaster.example.com.`;
/// the `@` form is rejected rather than rewritten.
pub fn validate_mailbox(mbox: &str) -> DnsResult<String> {
    if mbox.contains('@') {
        return Err(DnsError::InvalidMailbox { mbox: mbox.to_string() });
    }
    validate_domain(mbox)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_normalize_fqdn() {
        assert_eq!(normalize_fqdn("example.com"), "example.com.");
        assert_eq!(normalize_fqdn("example.com."), "example.com.");
        assert_eq!(normalize_fqdn(" NS1.Example.com "), "ns1.example.com.");
    }

    #[test]
    fn test_ensure_trailing_dot() {
        assert_eq!(ensure_trailing_dot("mail.example.com"), "mail.example.com.");
        assert_eq!(ensure_trailing_dot("Mail.example.com."), "Mail.example.com.");
    }

    #[test]
    fn test_label_count() {
        assert_eq!(label_count("example.com."), 2);
        assert_eq!(label_count("example.com"), 2);
        assert_eq!(label_count("a.b.example.com."), 4);
        assert_eq!(label_count("."), 0);
    }

    #[test]
    fn test_wildcard_key() {
        assert_eq!(wildcard_key("a.b.c."), "*.b.c.");
        assert_eq!(wildcard_key("*.b.c."), "*.c.");
        assert_eq!(wildcard_key("host.example.com."), "*.example.com.");
        assert_eq!(wildcard_key("server.domain.local."), "*.domain.local.");
    }

    #[test]
    fn test_wildcard_key_short_names() {
        assert_eq!(wildcard_key("com."), "*.");
        assert_eq!(wildcard_key("*.com."), "*.");
        assert_eq!(wildcard_key("*."), "*.");
        assert_eq!(wildcard_key("localhost"), "*");
    }

    #[test]
    fn test_wildcard_key_of_wildcard_strips_a_label() {
        assert_eq!(wildcard_key("*.a.example.com."), "*.example.com.");
        assert_ne!(wildcard_key("*.a.example.com."), "*.a.example.com.");
    }

    #[test]
    fn test_is_wildcard() {
        assert!(is_wildcard("*.example.com."));
        assert!(!is_wildcard("www.example.com."));
        assert!(!is_wildcard("a*.example.com."));
    }

    #[test]
    fn test_validate_domain() {
        assert_eq!(validate_domain("Example.com").unwrap(), "example.com.");
        assert!(validate_domain("").is_err());
        assert!(validate_domain(".").is_err());
        assert!(validate_domain("bad..example.com").is_err());
    }

    #[test]
    fn test_validate_mailbox() {
        assert_eq!(validate_mailbox("hostmaster.example.com").unwrap(), "hostmaster.example.com.");
        assert!(matches!(validate_mailbox("hostmaster@example.com"), Err(DnsError::InvalidMailbox { .. })));
    }

    proptest! {
        #[test]
        fn test_wildcard_key_keeps_suffix(labels in prop::collection::vec("[a-z0-9]{1,12}", 2..6)) {
            let name = format!("{}.", labels.join("."));
            let key = wildcard_key(&name);
            let suffix = format!(".{}.", labels[1..].join("."));
            prop_assert!(key.starts_with('*'));
            prop_assert!(key.ends_with(&suffix));
            prop_assert_eq!(label_count(&key), label_count(&name));
            prop_assert!(is_wildcard(&key));

            let parent = wildcard_key(&key);
            prop_assert_eq!(label_count(&parent), label_count(&key) - 1);
        }

        #[test]
        fn test_normalize_fqdn_idempotent(name in "[a-zA-Z0-9]{1,10}(\\.[a-zA-Z0-9]{1,10}){0,3}\\.?") {
            let once = normalize_fqdn(&name);
            prop_assert_eq!(normalize_fqdn(&once), once.clone());
            prop_assert!(once.ends_with('.'));
        }
    }
}
