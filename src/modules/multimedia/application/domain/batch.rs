use serde::Serialize;
use std::fmt;

/// Lifecycle of one upload batch inside a gallery session.
///
/// `Idle -> Validating -> Uploading -> Aggregating -> Idle`. A validation
/// failure (e.g. no capacity left) returns straight to `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum BatchState {
    #[default]
    Idle,
    Validating,
    Uploading {
        in_flight: usize,
    },
    Aggregating,
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchState::Idle => write!(f, "idle"),
            BatchState::Validating => write!(f, "validating"),
            BatchState::Uploading { in_flight } => write!(f, "uploading({in_flight})"),
            BatchState::Aggregating => write!(f, "aggregating"),
        }
    }
}

#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
#[error("Invalid batch transition from {from} to {to}")]
pub struct BatchTransitionError {
    pub from: BatchState,
    pub to: BatchState,
}

impl BatchState {
    pub fn is_idle(&self) -> bool {
        matches!(self, BatchState::Idle)
    }

    /// True while a batch holds the session, from validation to aggregation.
    pub fn is_busy(&self) -> bool {
        !self.is_idle()
    }

    pub fn begin_validation(&mut self) -> Result<(), BatchTransitionError> {
        self.transition(BatchState::Validating, |from| from.is_idle())
    }

    pub fn begin_upload(&mut self, in_flight: usize) -> Result<(), BatchTransitionError> {
        self.transition(BatchState::Uploading { in_flight }, |from| {
            matches!(from, BatchState::Validating)
        })
    }

    pub fn begin_aggregation(&mut self) -> Result<(), BatchTransitionError> {
        self.transition(BatchState::Aggregating, |from| {
            matches!(from, BatchState::Uploading { .. })
        })
    }

    /// Back to `Idle`. Allowed from validation (batch refused) and from
    /// aggregation (batch done).
    pub fn finish(&mut self) -> Result<(), BatchTransitionError> {
        self.transition(BatchState::Idle, |from| {
            matches!(from, BatchState::Validating | BatchState::Aggregating)
        })
    }

    /// Unconditional return to `Idle`, used when a batch is abandoned.
    pub fn reset(&mut self) {
        *self = BatchState::Idle;
    }

    fn transition<F>(&mut self, to: BatchState, allowed: F) -> Result<(), BatchTransitionError>
    where
        F: FnOnce(&BatchState) -> bool,
    {
        if !allowed(self) {
            return Err(BatchTransitionError { from: *self, to });
        }
        *self = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_lifecycle() {
        let mut state = BatchState::default();
        assert!(state.is_idle());

        state.begin_validation().unwrap();
        assert!(state.is_busy());
        state.begin_upload(3).unwrap();
        assert_eq!(state, BatchState::Uploading { in_flight: 3 });
        state.begin_aggregation().unwrap();
        state.finish().unwrap();

        assert!(state.is_idle());
    }

    #[test]
    fn test_refused_batch_returns_to_idle_from_validation() {
        let mut state = BatchState::Validating;
        state.finish().unwrap();
        assert_eq!(state, BatchState::Idle);
    }

    #[test]
    fn test_second_batch_cannot_start_while_uploading() {
        let mut state = BatchState::Uploading { in_flight: 2 };

        let err = state.begin_validation().unwrap_err();

        assert_eq!(err.from, BatchState::Uploading { in_flight: 2 });
        assert_eq!(err.to, BatchState::Validating);
        assert_eq!(state, BatchState::Uploading { in_flight: 2 });
    }

    #[test]
    fn test_cannot_skip_upload_phase() {
        let mut state = BatchState::Validating;
        assert!(state.begin_aggregation().is_err());
        assert_eq!(state, BatchState::Validating);
    }

    #[test]
    fn test_cannot_finish_mid_upload() {
        let mut state = BatchState::Uploading { in_flight: 1 };
        assert!(state.finish().is_err());
    }

    #[test]
    fn test_reset_from_anywhere() {
        let mut state = BatchState::Uploading { in_flight: 4 };
        state.reset();
        assert!(state.is_idle());
    }

    #[test]
    fn test_display() {
        assert_eq!(BatchState::Uploading { in_flight: 2 }.to_string(), "uploading(2)");
        assert_eq!(
            BatchTransitionError {
                from: BatchState::Idle,
                to: BatchState::Aggregating
            }
            .to_string(),
            "Invalid batch transition from idle to aggregating"
        );
    }
}
