use crate::error::ScanError;
use crate::exchange::Exchange;
use crate::message::{HeaderBag, Message};
use crate::report::BounceReport;

/// A parser for one dialect of bounce message.
pub trait BounceParser: Send + Sync {
    /// Short identifier, also used as the `agent` of every record.
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// Header fields the parser looks at besides the usual ones, so a
    /// caller that filters headers knows to keep them.
    fn headerlist(&self) -> &[&str];
    fn scan(
        &self,
        mhead: Option<&HeaderBag>,
        mbody: Option<&str>,
    ) -> Result<BounceReport, ScanError>;
}

/// Tries each registered parser in order until one recognizes the message.
pub struct Engine {
    parsers: Vec<Box<dyn BounceParser>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            parsers: vec![Box::new(Exchange)],
        }
    }

    pub fn with_parsers(parsers: Vec<Box<dyn BounceParser>>) -> Self {
        Self { parsers }
    }

    pub fn parsers(&self) -> impl Iterator<Item = &dyn BounceParser> {
        self.parsers.iter().map(|p| p.as_ref())
    }

    /// Union of every parser's extra header fields, without duplicates.
    pub fn headerlist(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for parser in &self.parsers {
            for field in parser.headerlist() {
                if !fields.iter().any(|f| f.eq_ignore_ascii_case(field)) {
                    fields.push(*field);
                }
            }
        }
        fields
    }

    /// Scan `message` with the first parser that recognizes it.
    ///
    /// `NotRecognized` moves on to the next parser; any other failure from
    /// a parser that did recognize the format is returned as is.
    pub fn scan(&self, message: &Message) -> Result<BounceReport, ScanError> {
        for parser in &self.parsers {
            match parser.scan(Some(&message.headers), Some(&message.body)) {
                Ok(report) => {
                    log::info!(
                        "{} recognized the message: {} recipient(s)",
                        parser.name(),
                        report.ds.len()
                    );
                    return Ok(report);
                }
                Err(ScanError::NotRecognized) => {
                    log::debug!("{} did not recognize the message", parser.name());
                }
                Err(e) => return Err(e),
            }
        }
        Err(ScanError::NotRecognized)
    }
}
