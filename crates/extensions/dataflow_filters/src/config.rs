use crate::FilterError;
use dataflow_target::DataflowMessageStatus;
use serde::Deserialize;

/// Configuration of a filter
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Name used to identify the filter in the logs
    ///
    /// Default: `"filter"`.
    pub name: String,

    /// Response to the messages rejected by the filter,
    /// either `accepted` (the message is absorbed) or `declined` (the message can go elsewhere).
    ///
    /// Default: `accepted`.
    pub decline_status: DataflowMessageStatus,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            name: "filter".to_string(),
            decline_status: DataflowMessageStatus::Accepted,
        }
    }
}

impl FilterConfig {
    pub fn new(name: impl Into<String>) -> Self {
        FilterConfig {
            name: name.into(),
            ..FilterConfig::default()
        }
    }

    /// Set a custom name
    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    /// Set the response to rejected messages
    pub fn with_decline_status(self, decline_status: DataflowMessageStatus) -> Self {
        Self {
            decline_status,
            ..self
        }
    }

    /// Decline the rejected messages, so they can be offered to another target
    pub fn declining(self) -> Self {
        self.with_decline_status(DataflowMessageStatus::Declined)
    }

    pub(crate) fn decline_policy(&self) -> Result<DeclinePolicy, FilterError> {
        DeclinePolicy::try_from(self.decline_status)
    }
}

/// What a filter does with the messages it rejects
///
/// A filter never retains a message to offer it later,
/// hence cannot answer with `Postponed` or `NotAvailable`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeclinePolicy {
    /// Report the message as accepted, but drop it
    Absorb,

    /// Decline the message
    Decline,
}

impl TryFrom<DataflowMessageStatus> for DeclinePolicy {
    type Error = FilterError;

    fn try_from(status: DataflowMessageStatus) -> Result<Self, Self::Error> {
        match status {
            DataflowMessageStatus::Accepted => Ok(DeclinePolicy::Absorb),
            DataflowMessageStatus::Declined => Ok(DeclinePolicy::Decline),
            status => Err(FilterError::UnsupportedDeclineStatus(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn rejected_messages_are_absorbed_by_default() {
        let config = FilterConfig::default();
        assert_eq!(config.name, "filter");
        assert_eq!(config.decline_policy(), Ok(DeclinePolicy::Absorb));
        assert_eq!(
            config.declining().decline_policy(),
            Ok(DeclinePolicy::Decline)
        );
    }

    #[test_case(DataflowMessageStatus::Postponed)]
    #[test_case(DataflowMessageStatus::NotAvailable)]
    #[test_case(DataflowMessageStatus::DecliningPermanently)]
    fn unsupported_decline_status(status: DataflowMessageStatus) {
        let config = FilterConfig::new("test").with_decline_status(status);
        assert_eq!(
            config.decline_policy(),
            Err(FilterError::UnsupportedDeclineStatus(status))
        );
    }

    #[test]
    fn config_can_be_read_from_toml() {
        let config: FilterConfig = toml::from_str(
            r#"
            name = "dedup"
            decline_status = "declined"
            "#,
        )
        .unwrap();
        assert_eq!(config, FilterConfig::new("dedup").declining());

        let config: FilterConfig = toml::from_str(r#"name = "sampler""#).unwrap();
        assert_eq!(config.decline_status, DataflowMessageStatus::Accepted);
    }

    #[test]
    fn unknown_statuses_are_rejected_by_the_parser() {
        let config = toml::from_str::<FilterConfig>(r#"decline_status = "maybe""#);
        assert!(config.is_err());
    }
}
