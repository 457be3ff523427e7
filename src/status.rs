//! Pseudo status codes for bounce reasons.
//!
//! A reason that has no SMTP status of its own in the bounce text is
//! reported with the `5.0.9xx` code assigned to it here.

/// Reason names and their permanent-failure status codes.
const PERMANENT_CODES: &[(&str, &str)] = &[
    ("onhold", "5.0.901"),
    ("syntaxerror", "5.0.902"),
    ("filtered", "5.0.910"),
    ("userunknown", "5.0.911"),
    ("hostunknown", "5.0.912"),
    ("hasmoved", "5.0.916"),
    ("rejected", "5.0.918"),
    ("suspend", "5.0.921"),
    ("mailboxfull", "5.0.922"),
    ("exceedlimit", "5.0.923"),
    ("mesgtoobig", "5.0.924"),
    ("systemerror", "5.0.930"),
    ("systemfull", "5.0.931"),
    ("networkerror", "5.0.932"),
    ("notaccept", "5.0.932"),
    ("expired", "5.0.947"),
    ("contenterror", "5.0.960"),
    ("norelaying", "5.0.970"),
    ("securityerror", "5.0.970"),
    ("blocked", "5.0.971"),
    ("toomanyconn", "5.0.972"),
    ("spamdetected", "5.0.980"),
    ("mailererror", "5.0.981"),
];

/// Status code for `reason`, or "" when the reason has none.
pub fn code(reason: &str) -> &'static str {
    PERMANENT_CODES
        .iter()
        .find(|(name, _)| *name == reason)
        .map(|(_, status)| *status)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_reasons() {
        assert_eq!(code("userunknown"), "5.0.911");
        assert_eq!(code("onhold"), "5.0.901");
        assert_eq!(code("filtered"), "5.0.910");
        assert_eq!(code("networkerror"), "5.0.932");
    }

    #[test]
    fn test_unknown_reasons() {
        assert_eq!(code(""), "");
        assert_eq!(code("contenterr"), "");
        assert_eq!(code("UserUnknown"), "");
    }
}
