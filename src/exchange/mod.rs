//! Bounce messages produced by Microsoft Exchange Server and its Internet
//! Mail Service / Internet Mail Connector.
//!
//! ```text
//! headers ──► detector ──► parser (body lines) ──► normalizer ──► BounceReport
//! ```

pub mod detector;
pub mod normalizer;
pub mod parser;

use crate::engine::BounceParser;
use crate::error::ScanError;
use crate::message::HeaderBag;
use crate::report::BounceReport;

/// Value of `agent` in every record this parser produces.
pub const SMTP_AGENT: &str = "Exchange";

const HEADER_LIST: &[&str] = &["X-MS-Embedded-Report", "X-MimeOLE"];

/// Parser for Microsoft Exchange Server bounces.
#[derive(Debug, Default, Clone, Copy)]
pub struct Exchange;

impl BounceParser for Exchange {
    fn name(&self) -> &str {
        SMTP_AGENT
    }

    fn description(&self) -> &str {
        "Microsoft Exchange Server"
    }

    fn headerlist(&self) -> &[&str] {
        HEADER_LIST
    }

    fn scan(
        &self,
        mhead: Option<&HeaderBag>,
        mbody: Option<&str>,
    ) -> Result<BounceReport, ScanError> {
        let headers =
            mhead.ok_or_else(|| ScanError::InvalidInput("missing header fields".to_string()))?;
        let body = mbody.ok_or_else(|| ScanError::InvalidInput("missing body".to_string()))?;

        if !detector::matches(headers) {
            return Err(ScanError::NotRecognized);
        }

        let scanned = parser::parse(body)?;
        let rfc822 = if scanned.rfc822.is_empty() {
            // The original message was not attached
            normalizer::synthesize_rfc822(&scanned.connection)
        } else {
            scanned.rfc822
        };
        let ds = normalizer::finalize(scanned.records, headers.received());

        Ok(BounceReport { ds, rfc822 })
    }
}
