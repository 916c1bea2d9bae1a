use std::fmt::Display;

use itertools::Itertools;

use super::log_statistic;

/// Logs statistics under a common name prefix, e.g. `sat_propagations`.
#[derive(Debug, Default, Clone)]
pub struct StatisticLogger {
    name_prefix: String,
}

impl StatisticLogger {
    pub fn new<Input: IntoIterator<Item = impl Display>>(name_prefix: Input) -> Self {
        Self {
            name_prefix: name_prefix.into_iter().join("_"),
        }
    }

    /// A logger whose prefix is the current one extended with `addition_to_prefix`.
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_joined_with_underscores() {
        let logger = StatisticLogger::new(["sat", "engine"]).attach_to_prefix("conflicts");
        assert_eq!("sat_engine_conflicts", logger.name_prefix);
    }

    #[test]
    fn empty_prefix_is_not_padded() {
        let logger = StatisticLogger::default().attach_to_prefix("decisions");
        assert_eq!("decisions", logger.name_prefix);
    }
}
