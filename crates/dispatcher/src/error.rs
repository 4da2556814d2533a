//! Dispatcher error types

use thiserror::Error;

/// Errors raised while building or feeding sinks
///
/// Write failures inside a sink never surface here: the worker logs and
/// counts them, and the frame stream keeps flowing.
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// A `[[exposure.sinks]]` entry could not be turned into a sink
    #[error("failed to create sink '{name}': {message}")]
    SinkCreation { name: String, message: String },

    /// The sink's queue was full and the frame was dropped
    #[error("queue full for sink '{sink_name}', tick {tick} dropped")]
    QueueFull { sink_name: String, tick: u64 },

    /// The sink's worker task is gone
    #[error("sink '{sink_name}' worker stopped")]
    WorkerStopped { sink_name: String },
}

impl DispatcherError {
    pub fn sink_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn queue_full(sink_name: impl Into<String>, tick: u64) -> Self {
        Self::QueueFull {
            sink_name: sink_name.into(),
            tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = DispatcherError::queue_full("signals_file", 42);
        assert_eq!(err.to_string(), "queue full for sink 'signals_file', tick 42 dropped");

        let err = DispatcherError::sink_creation("", "sink name is empty");
        assert!(err.to_string().contains("sink name is empty"));

        let err = DispatcherError::WorkerStopped {
            sink_name: "stdout".into(),
        };
        assert_eq!(err.to_string(), "sink 'stdout' worker stopped");
    }
}
