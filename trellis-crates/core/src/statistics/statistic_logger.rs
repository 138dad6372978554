use std::fmt::Display;

use itertools::Itertools;

use super::statistic_logging::log_statistic;
#[cfg(doc)]
use crate::propagation::Propagator;

/// Responsible for logging the statistics with the provided prefix; currently used when logging
/// the statistics of the [`State`](crate::state::State) and of each [`Propagator`].
#[derive(Debug, Default, Clone)]
pub struct StatisticLogger {
    /// The prefix which will be attached to the statistic name
    name_prefix: String,
}

impl StatisticLogger {
    pub fn new<Input: IntoIterator<Item = impl Display>>(name_prefix: Input) -> Self {
        Self {
            name_prefix: name_prefix.into_iter().join("_"),
        }
    }

    /// Attaches the provided `addition_to_prefix` to the stored internal prefix and returns a new
    /// [`StatisticLogger`] with these two prefixes.
    pub fn attach_to_prefix(&self, addition_to_prefix: impl Display) -> Self {
        if self.name_prefix.is_empty() {
            return Self {
                name_prefix: addition_to_prefix.to_string(),
            };
        }

        Self {
            name_prefix: format!("{}_{}", self.name_prefix, addition_to_prefix),
        }
    }

    pub fn log_statistic(&self, value: impl Display) {
        log_statistic(&self.name_prefix, value);
    }

    pub(crate) fn prefix(&self) -> &str {
        &self.name_prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_joined_with_underscores() {
        let logger = StatisticLogger::new(["propagator", "3"]);

        assert_eq!(logger.prefix(), "propagator_3");
        assert_eq!(
            logger.attach_to_prefix("num_calls").prefix(),
            "propagator_3_num_calls"
        );
    }

    #[test]
    fn attaching_to_an_empty_prefix_does_not_add_a_separator() {
        let logger = StatisticLogger::default().attach_to_prefix("worlds");

        assert_eq!(logger.prefix(), "worlds");
    }
}
