use serde::{Deserialize, Serialize};

/// One failed recipient extracted from a bounce message.
///
/// Every field is a plain string; anything the bounce did not reveal is
/// left empty rather than absent.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryStatus {
    pub recipient: String,
    pub diagnosis: String,
    pub reason: String,
    pub status: String,
    pub action: String,
    pub spec: String,
    pub lhost: String,
    pub rhost: String,
    pub agent: String,
}

/// Everything a bounce parser recovered from one message.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BounceReport {
    /// Per-recipient delivery status, in body order.
    pub ds: Vec<DeliveryStatus>,
    /// Header lines of the bounced message, one per line.
    pub rfc822: String,
}
