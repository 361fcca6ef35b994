use crate::bus::Topic;
use futures::task::SpawnError;

/// Errors raised by the tree core.
///
/// Listener failures never escape a relay; they only surface to code that
/// triggers a bus directly.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("{topic} listener failed: {cause:#}")]
    Listener { topic: Topic, cause: anyhow::Error },

    #[error("failed to spawn {task}: {source}")]
    Spawn {
        task: &'static str,
        #[source]
        source: SpawnError,
    },

    #[error("invalid tree config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("tree builder is missing {0}")]
    MissingPart(&'static str),
}

impl TreeError {
    pub fn listener(topic: Topic, cause: impl Into<anyhow::Error>) -> Self {
        TreeError::Listener {
            topic,
            cause: cause.into(),
        }
    }

    pub fn topic(&self) -> Option<Topic> {
        match self {
            TreeError::Listener { topic, .. } => Some(*topic),
            _ => None,
        }
    }
}

pub type TreeResult<T> = Result<T, TreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listener_error_names_topic_and_cause() {
        let error = TreeError::listener(
            Topic::SubRecordsStateUpdateRequested,
            anyhow::anyhow!("backend offline"),
        );

        assert_eq!(error.topic(), Some(Topic::SubRecordsStateUpdateRequested));
        assert_eq!(
            error.to_string(),
            "SUB_RECORDS_STATE_UPDATE_REQUESTED listener failed: backend offline"
        );
    }

    #[test]
    fn missing_part_has_no_topic() {
        assert_eq!(TreeError::MissingPart("spawner").topic(), None);
    }
}
