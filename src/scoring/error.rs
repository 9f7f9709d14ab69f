use thiserror::Error;

/// The only way a score can fail: the caller did not have enough videos.
/// Callers render a "not enough data" state instead of a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("not enough data for {metric}: needs {required} videos, have {actual}")]
    InsufficientData {
        metric: &'static str,
        required: usize,
        actual: usize,
    },
}

impl ScoreError {
    pub(crate) fn require(metric: &'static str, required: usize, actual: usize) -> Result<(), Self> {
        if actual < required {
            Err(ScoreError::InsufficientData {
                metric,
                required,
                actual,
            })
        } else {
            Ok(())
        }
    }
}
