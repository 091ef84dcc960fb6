/// Result of a best-effort collection step.
///
/// `Unavailable` is expected absence (permission denied, no geocode match);
/// `Failed` is a collection call that raised. Neither aborts the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome<T> {
    Available(T),
    Unavailable,
    Failed(String),
}

impl<T> StepOutcome<T> {
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Available(value) => Some(value),
            Self::Unavailable | Self::Failed(_) => None,
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for StepOutcome<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Available(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}
