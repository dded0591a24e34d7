use dataflow_target::DataflowMessageStatus;

#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
pub enum FilterError {
    #[error("A filter cannot respond with {0} to the messages it rejects: only accepted or declined are supported")]
    UnsupportedDeclineStatus(DataflowMessageStatus),

    #[error("The number of messages to accept before completion must be positive")]
    InvalidLimit,
}
