use serde::Deserialize;
use serde::Serialize;

/// Identifies a message offered by a given source
///
/// The source uses the header to recognize the message
/// when a target later asks to consume it.
/// A header with id `0` is the default, invalid header.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct MessageHeader {
    id: i64,
}

impl MessageHeader {
    pub fn new(id: i64) -> Self {
        MessageHeader { id }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn is_valid(&self) -> bool {
        self.id != 0
    }
}

/// The response of a target block to an offer
#[derive(
    strum::Display,
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DataflowMessageStatus {
    /// The target took the message, the source must not offer it again
    Accepted,

    /// The target refused the message, which can be offered elsewhere
    Declined,

    /// The target will ask for the message later
    Postponed,

    /// The target tried to consume the message, but the source no longer had it
    NotAvailable,

    /// The target refuses this message and all the forthcoming ones
    DecliningPermanently,
}

impl DataflowMessageStatus {
    pub fn is_accepted(&self) -> bool {
        matches!(self, DataflowMessageStatus::Accepted)
    }
}
