pub mod config;
pub mod engine;
pub mod error;
pub mod exchange;
pub mod message;
pub mod report;
pub mod rfc5322;
pub mod status;
pub mod sweep;

pub use engine::{BounceParser, Engine};
pub use error::ScanError;
pub use exchange::Exchange;
pub use message::{HeaderBag, Message};
pub use report::{BounceReport, DeliveryStatus};

/// Scan one bounce with the Exchange parser.
pub fn scan(mhead: Option<&HeaderBag>, mbody: Option<&str>) -> Result<BounceReport, ScanError> {
    Exchange.scan(mhead, mbody)
}
