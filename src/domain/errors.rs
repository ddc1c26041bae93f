use derive_more::Display;

/// Error taxonomy for series generation and chart geometry.
///
/// Both components are pure computations, so the only failure is a bad
/// argument at the call site. Nothing is retried and nothing is partially
/// produced: a caller either gets a complete result or this error.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ChartError {
    #[display(fmt = "Invalid argument: {}", _0)]
    InvalidArgument(String),
}

impl ChartError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl std::error::Error for ChartError {}

pub type ChartResult<T> = Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_reason() {
        let err = ChartError::invalid("length must be positive");
        assert_eq!(err.to_string(), "Invalid argument: length must be positive");
    }
}
