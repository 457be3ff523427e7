use super::parser::{ConnectionHeader, RecordBuilder};
use super::SMTP_AGENT;
use crate::report::DeliveryStatus;
use crate::{rfc5322, status, sweep::sweep};
use lazy_static::lazy_static;
use regex::Regex;

/// Exchange error codes, as printed in `MSEXCH:` lines, by reason.
pub const ERROR_CODE_TABLE: &[(&str, &[&str])] = &[
    (
        "onhold",
        &[
            "000B099C", // Host Unknown, Message exceeds size limit, ...
            "000B09AA", // Unable to relay for, Message exceeds size limit,...
            "000B09B6", // Error messages by remote MTA
        ],
    ),
    ("userunknown", &["000C05A6"]), // Unknown Recipient
    (
        "systemerror",
        &[
            "00010256", // Too many recipients
            "000D06B5", // No proxy for recipient (non-smtp mail?)
        ],
    ),
    ("networkerror", &["00120270"]), // Too Many Hops
    (
        "contenterr",
        &[
            "00050311", // Conversion to Internet format failed
            "000502CC", // Conversion to Internet format failed
        ],
    ),
    ("securityerr", &["000B0981"]), // 502 Server does not support AUTH
    ("filtered", &["000C0595"]),    // Ambiguous Recipient
];

lazy_static! {
    //     MSEXCH:IMS:KIJITORA CAT:EXAMPLE:EXCHANGE 0 (000C05A6) Unknown Recipient
    static ref CODED_DIAGNOSIS: Regex =
        Regex::new(r"\AMSEXCH:.+\s*[(]([0-9A-F]{8})[)]\s*(.*)\z").unwrap();
}

/// Reason for an 8-digit Exchange error code, if the code is known.
pub fn classify(code: &str) -> Option<&'static str> {
    ERROR_CODE_TABLE
        .iter()
        .find(|(_, codes)| codes.contains(&code))
        .map(|(reason, _)| *reason)
}

/// Turn every builder into a finished record.
pub fn finalize(records: Vec<RecordBuilder>, received: &[String]) -> Vec<DeliveryStatus> {
    records
        .into_iter()
        .map(|builder| {
            let mut record = builder.status;
            refine(&mut record, builder.alterrors, received);
            record
        })
        .collect()
}

/// Resolve hosts, classify the diagnosis, and fill derived fields.
///
/// Running it again on its own output changes nothing.
pub fn refine(record: &mut DeliveryStatus, alterrors: Option<String>, received: &[String]) {
    if let (Some(first), Some(last)) = (received.first(), received.last()) {
        if record.lhost.is_empty() {
            record.lhost = rfc5322::received(first)
                .into_iter()
                .next()
                .unwrap_or_default();
        }
        if record.rhost.is_empty() {
            record.rhost = rfc5322::received(last).pop().unwrap_or_default();
        }
    }

    record.diagnosis = sweep(&record.diagnosis);

    if let Some(caps) = CODED_DIAGNOSIS.captures(&record.diagnosis) {
        let code = &caps[1];
        if let Some(reason) = classify(code) {
            log::debug!("Exchange: code {code} for {} is {reason}", record.recipient);
            record.reason = reason.to_string();
            let pseudo = status::code(reason);
            if !pseudo.is_empty() {
                record.status = pseudo.to_string();
            }
        } else {
            log::debug!("Exchange: unknown code {code} for {}", record.recipient);
        }
        record.diagnosis = caps[2].to_string();
    }

    if record.reason.is_empty() {
        // Could not detect the reason from the value of "diagnosis"
        if let Some(alt) = alterrors.filter(|a| !a.is_empty()) {
            record.diagnosis = sweep(&format!("{} {}", alt, record.diagnosis));
        }
    }

    record.spec = if record.reason == "mailererror" {
        "X-UNIX".to_string()
    } else {
        "SMTP".to_string()
    };
    if record.status.starts_with('4') || record.status.starts_with('5') {
        record.action = "failed".to_string();
    }
    record.agent = SMTP_AGENT.to_string();
}

/// Minimal header for the original message when none was attached.
///
/// The echoed `To:` value is written as `From:`.
pub fn synthesize_rfc822(connection: &ConnectionHeader) -> String {
    format!(
        "From: {}\nDate: {}\nSubject: {}\n",
        connection.to, connection.date, connection.subject
    )
}
