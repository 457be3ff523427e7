//! Header-field knowledge shared by bounce parsers: which fields of an
//! embedded original message are worth keeping, and which hosts a
//! `Received` header names.

use lazy_static::lazy_static;
use regex::Regex;

/// Header fields retained from the original message, lower-cased.
const HEADER_FIELDS: &[&str] = &[
    // Message identity
    "message-id",
    "subject",
    "list-id",
    // Dates
    "date",
    "posted-date",
    "posted",
    "resent-date",
    // Sender side
    "from",
    "return-path",
    "reply-to",
    "errors-to",
    "reverse-path",
    "x-postfix-sender",
    "envelope-from",
    "x-envelope-from",
    // Recipient side
    "to",
    "delivered-to",
    "forward-path",
    "envelope-to",
    "x-envelope-to",
    "resent-to",
    "apparently-to",
];

/// Retained fields whose value may continue on indented lines.
const LONG_FIELDS: &[&str] = &["to", "from", "subject", "message-id"];

lazy_static! {
    // "from" and "by" must start a clause, not end a word like "envelope-from"
    static ref FROM_HOST: Regex =
        Regex::new(r"(?i)(?:\A|\s)from\s+(\S+)(?:\s+\(([^)\s]+)[^)]*\))?").unwrap();
    static ref BY_HOST: Regex = Regex::new(r"(?i)(?:\A|\s)by\s+(\S+)").unwrap();
}

/// True if `name` (lower-cased) is kept when copying original headers.
pub fn is_header_field(name: &str) -> bool {
    HEADER_FIELDS.contains(&name)
}

/// True if `name` (lower-cased) may be folded across lines.
pub fn is_long_field(name: &str) -> bool {
    LONG_FIELDS.contains(&name)
}

/// Hosts named by a `Received` header, in `[from, by]` order.
///
/// Either may be missing. When the `from` clause is an address literal
/// followed by a parenthesized name, the name is preferred.
pub fn received(header: &str) -> Vec<String> {
    let mut hosts = Vec::new();

    if let Some(caps) = FROM_HOST.captures(header) {
        let literal = clean_host(&caps[1]);
        let named = caps.get(2).map(|m| clean_host(m.as_str()));
        let host = match named {
            Some(name) if is_address_literal(&literal) && looks_like_hostname(&name) => name,
            _ => literal,
        };
        if !host.is_empty() && !host.contains('@') {
            hosts.push(host);
        }
    }

    if let Some(caps) = BY_HOST.captures(header) {
        let host = clean_host(&caps[1]);
        if !host.is_empty() && !host.contains('@') {
            hosts.push(host);
        }
    }

    hosts
}

fn clean_host(raw: &str) -> String {
    raw.trim_matches(|c: char| matches!(c, '[' | ']' | '(' | ')' | ';' | '<' | '>'))
        .to_lowercase()
}

fn is_address_literal(host: &str) -> bool {
    host.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ':')
        || host.starts_with("ipv6:")
}

fn looks_like_hostname(host: &str) -> bool {
    host.contains('.') && !is_address_literal(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_fields() {
        assert!(is_header_field("from"));
        assert!(is_header_field("message-id"));
        assert!(!is_header_field("content-type"));
        assert!(!is_header_field("x-mailer"));
    }

    #[test]
    fn test_long_fields() {
        assert!(is_long_field("subject"));
        assert!(is_long_field("to"));
        assert!(!is_long_field("date"));
        assert!(!is_long_field(""));
    }

    #[test]
    fn test_received_from_and_by() {
        assert_eq!(
            received("from mx1.example.jp (mx1.example.jp [192.0.2.1]) by mail.example.com with ESMTP id 0123"),
            vec!["mx1.example.jp", "mail.example.com"]
        );
    }

    #[test]
    fn test_received_prefers_named_host_over_literal() {
        assert_eq!(
            received("from [192.0.2.25] (relay.example.org [192.0.2.25]) by mx.example.net;"),
            vec!["relay.example.org", "mx.example.net"]
        );
    }

    #[test]
    fn test_received_by_only() {
        assert_eq!(
            received("by exchange.example.co.jp with Internet Mail Service (5.5.2657.72)"),
            vec!["exchange.example.co.jp"]
        );
        assert!(received("id 0123 for <user@example.jp>").is_empty());
    }

    #[test]
    fn test_received_ignores_envelope_from() {
        assert_eq!(
            received("by mx.example.jp (Postfix, envelope-from <bounce@example.org>) id 1234"),
            vec!["mx.example.jp"]
        );
    }

    #[test]
    fn test_received_skips_address_tokens() {
        assert_eq!(
            received("from bounce@example.org by mx.example.jp with ESMTP"),
            vec!["mx.example.jp"]
        );
    }
}
