/// Reasons a bounce message could not be turned into delivery-status records.
///
/// None of these are faults: a caller holding several parsers treats
/// `NotRecognized` as "try the next one".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Format not recognized")]
    NotRecognized,
    #[error("No delivery-status entries found")]
    NoDeliveryStatus,
}
