use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscodeError {
    #[error("destination too small: need {needed} bytes, have {capacity}")]
    DestinationTooSmall { needed: usize, capacity: usize },
}
