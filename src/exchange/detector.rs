use crate::message::HeaderBag;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // X-Mailer: Internet Mail Service (5.0.1461.28)
    // X-Mailer: Microsoft Exchange Server Internet Mail Connector Version 4.0.994.63
    static ref X_MAILER: Regex = Regex::new(
        r"\A(?:Internet Mail Service [(][\d.]+[)]\z|Microsoft Exchange Server Internet Mail Connector)"
    )
    .unwrap();
    // X-MimeOLE: Produced By Microsoft Exchange V6.5
    static ref X_MIMEOLE: Regex = Regex::new(r"\AProduced By Microsoft Exchange").unwrap();
    // Received: by ***.**.** with Internet Mail Service (5.5.2657.72)
    static ref RECEIVED: Regex =
        Regex::new(r"\Aby .+ with Internet Mail Service [(][\d.]+[)]").unwrap();
}

/// Decide from the header alone whether the body is an Exchange bounce.
///
/// The first matching signal wins; the body is never looked at.
pub fn matches(headers: &HeaderBag) -> bool {
    if headers
        .get("x-ms-embedded-report")
        .is_some_and(|v| !v.is_empty())
    {
        log::debug!("Exchange: X-MS-Embedded-Report present");
        return true;
    }

    if let Some(mailer) = headers.get("x-mailer") {
        if X_MAILER.is_match(mailer) {
            log::debug!("Exchange: X-Mailer matched: {mailer}");
            return true;
        }
    }

    if let Some(mimeole) = headers.get("x-mimeole") {
        if X_MIMEOLE.is_match(mimeole) {
            log::debug!("Exchange: X-MimeOLE matched: {mimeole}");
            return true;
        }
    }

    headers.received().iter().any(|r| {
        let hit = RECEIVED.is_match(r);
        if hit {
            log::debug!("Exchange: Received matched: {r}");
        }
        hit
    })
}
