//! Line-by-line walk over an Exchange bounce body.
//!
//! A typical body looks like:
//!
//! ```text
//! Your message
//!
//!   To:      shironeko@example.jp
//!   Subject: test
//!   Sent:    Thu, 29 Apr 2010 18:14:35 +0000
//!
//! did not reach the following recipient(s):
//!
//! kijitora@example.co.jp on Thu, 29 Apr 2010 18:14:41 +0000
//!     The recipient name is not recognized
//!     MSEXCH:IMS:KIJITORA CAT:EXAMPLE:EXCHANGE 0 (000C05A6) Unknown Recipient
//! ```
//!
//! optionally followed by a `message/rfc822` part holding the original
//! message.

use crate::error::ScanError;
use crate::report::DeliveryStatus;
use crate::rfc5322;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref BEGIN: Regex = Regex::new(r"\AYour message").unwrap();
    static ref RFC822: Regex = Regex::new(r"\AContent-Type: message/rfc822").unwrap();

    static ref ECHO_TO: Regex = Regex::new(r"\A\s+To:\s+(.+)\z").unwrap();
    static ref ECHO_SUBJECT: Regex = Regex::new(r"\A\s+Subject:\s+(.+)\z").unwrap();
    // Sent:    Thu, 29 Apr 2010 18:14:35 +0000
    static ref ECHO_SENT_RFC2822: Regex =
        Regex::new(r"\A\s+Sent:\s+([A-Z][a-z]{2},.+[-+]\d{4})\z").unwrap();
    // Sent:    4/29/99 9:19:59 AM
    static ref ECHO_SENT_US: Regex =
        Regex::new(r"\A\s+Sent:\s+(\d+/\d+/\d+\s+\d+:\d+:\d+\s.+)").unwrap();

    // kijitora@example.co.jp on Thu, 29 Apr 2007 16:51:51 -0500
    static ref RECIPIENT: Regex = Regex::new(r"\A\s*([^ ]+@[^ ]+) on\s*.*\z").unwrap();
    // Kijitora Cat SMTP=kijitora@example.com on 4/29/99 9:19:59 AM
    static ref RECIPIENT_SMTP: Regex =
        Regex::new(r"\A\s*.+(?:SMTP|smtp)=([^ ]+@[^ ]+) on\s*.*\z").unwrap();
    static ref MSEXCH_LINE: Regex = Regex::new(r"\A\s+(MSEXCH:.+)\z").unwrap();
    static ref MSEXCH_DIAGNOSIS: Regex = Regex::new(r"\AMSEXCH:.+").unwrap();

    static ref FIELD: Regex = Regex::new(r"\A([-0-9A-Za-z]+?):[ ]*.+\z").unwrap();
    static ref CONTINUATION: Regex = Regex::new(r"\A\s+").unwrap();
}

/// Header lines echoed in the bounce body, used to rebuild the original
/// message's header when it was not attached.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConnectionHeader {
    pub to: String,
    pub date: String,
    pub subject: String,
}

impl ConnectionHeader {
    fn is_complete(&self) -> bool {
        !self.to.is_empty() && !self.date.is_empty() && !self.subject.is_empty()
    }
}

/// A record still being assembled from body lines.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordBuilder {
    pub status: DeliveryStatus,
    /// Set once the line following an `MSEXCH:` code line has been taken.
    pub msexch: bool,
    /// Free-text error lines that were not part of an `MSEXCH:` line.
    pub alterrors: Option<String>,
}

/// Raw output of the body walk, before normalization.
#[derive(Debug, Default)]
pub struct ScannedBody {
    pub records: Vec<RecordBuilder>,
    pub rfc822: String,
    pub connection: ConnectionHeader,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting for "Your message".
    Preamble,
    /// Collecting the echoed To/Subject/Sent lines.
    HeaderEcho,
    /// Reading recipient lines and their diagnostics.
    PerRecipient,
    /// Diagnostic text is complete; remaining report lines are ignored.
    StatuspartClosed,
    /// Inside the attached original message.
    OriginalHeaders,
}

/// Copies allow-listed header lines out of the original message.
#[derive(Debug, Default)]
struct HeaderCapture {
    text: String,
    current: String,
    closed: HashSet<String>,
}

impl HeaderCapture {
    fn feed(&mut self, line: &str) {
        if let Some(caps) = FIELD.captures(line) {
            let name = caps[1].to_lowercase();
            self.current.clear();
            if !rfc5322::is_header_field(&name) {
                return;
            }
            self.current = name;
            self.text.push_str(line);
            self.text.push('\n');
        } else if CONTINUATION.is_match(line) {
            if self.closed.contains(&self.current) {
                return;
            }
            if rfc5322::is_long_field(&self.current) {
                self.text.push_str(line);
                self.text.push('\n');
            }
        } else if rfc5322::is_long_field(&self.current) && line.is_empty() {
            // End of the header block
            self.closed.insert(self.current.clone());
        }
    }
}

struct BodyParser {
    phase: Phase,
    records: Vec<RecordBuilder>,
    current: RecordBuilder,
    connection: ConnectionHeader,
    capture: HeaderCapture,
    recipients: usize,
}

impl BodyParser {
    fn new() -> Self {
        Self {
            phase: Phase::Preamble,
            records: Vec::new(),
            current: RecordBuilder::default(),
            connection: ConnectionHeader::default(),
            capture: HeaderCapture::default(),
            recipients: 0,
        }
    }

    fn feed(&mut self, line: &str) {
        if self.phase == Phase::Preamble && BEGIN.is_match(line) {
            log::debug!("Exchange: delivery status part begins");
            self.phase = Phase::HeaderEcho;
            return;
        }

        if self.phase != Phase::OriginalHeaders && RFC822.is_match(line) {
            log::debug!("Exchange: message/rfc822 part begins");
            self.phase = Phase::OriginalHeaders;
            return;
        }

        match self.phase {
            Phase::OriginalHeaders => self.capture.feed(line),
            Phase::HeaderEcho => self.echo(line),
            Phase::PerRecipient => self.recipient_detail(line),
            Phase::Preamble | Phase::StatuspartClosed => {}
        }
    }

    fn echo(&mut self, line: &str) {
        let (slot, value) = if let Some(caps) = ECHO_TO.captures(line) {
            (&mut self.connection.to, caps[1].to_string())
        } else if let Some(caps) = ECHO_SUBJECT.captures(line) {
            (&mut self.connection.subject, caps[1].to_string())
        } else if let Some(caps) = ECHO_SENT_RFC2822
            .captures(line)
            .or_else(|| ECHO_SENT_US.captures(line))
        {
            (&mut self.connection.date, caps[1].to_string())
        } else {
            return;
        };

        if slot.is_empty() {
            *slot = value;
        }

        if self.connection.is_complete() {
            self.phase = Phase::PerRecipient;
        }
    }

    fn recipient_detail(&mut self, line: &str) {
        let address = RECIPIENT
            .captures(line)
            .or_else(|| RECIPIENT_SMTP.captures(line))
            .map(|caps| caps[1].to_string());

        if let Some(address) = address {
            if !self.current.status.recipient.is_empty() {
                // There are multiple recipient addresses in the message body
                let done = std::mem::take(&mut self.current);
                self.records.push(done);
            }
            log::debug!("Exchange: recipient {address}");
            self.current.status.recipient = address;
            self.current.msexch = false;
            self.recipients += 1;
        } else if let Some(caps) = MSEXCH_LINE.captures(line) {
            self.current.status.diagnosis.push_str(&caps[1]);
        } else if self.current.msexch {
            // Unreachable today: setting msexch also closes the status part.
            // Kept so the per-recipient rules stay a complete ordered list.
        } else if MSEXCH_DIAGNOSIS.is_match(&self.current.status.diagnosis) {
            self.current.msexch = true;
            self.current.status.diagnosis.push(' ');
            self.current.status.diagnosis.push_str(line);
            log::debug!("Exchange: status part closed");
            self.phase = Phase::StatuspartClosed;
        } else {
            let alterrors = self.current.alterrors.get_or_insert_with(String::new);
            alterrors.push(' ');
            alterrors.push_str(line);
        }
    }

    fn finish(mut self) -> Result<ScannedBody, ScanError> {
        if self.recipients == 0 {
            return Err(ScanError::NoDeliveryStatus);
        }
        self.records.push(self.current);

        Ok(ScannedBody {
            records: self.records,
            rfc822: self.capture.text,
            connection: self.connection,
        })
    }
}

/// Walk `body` once, top to bottom.
///
/// Fails with `NoDeliveryStatus` when no recipient line was found.
pub fn parse(body: &str) -> Result<ScannedBody, ScanError> {
    let mut parser = BodyParser::new();
    for line in body.lines() {
        parser.feed(line);
    }
    parser.finish()
}
