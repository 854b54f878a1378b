use std::io;

use thiserror::Error;
use utf_scalar::TranscodeError;

pub type Result<T> = std::result::Result<T, ValidationError>;
pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// Why a candidate could not become a validated value.
///
/// Every variant is a deterministic function of the input: retrying with the
/// same candidate fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{what} must not be empty")]
    EmptyInput { what: &'static str },

    #[error("{what} cannot start with {}", describe(.scalar))]
    InvalidLeadingCharacter { what: &'static str, scalar: u32 },

    #[error("{what} cannot contain {} (at position {position})", describe(.scalar))]
    InvalidCharacter {
        what: &'static str,
        scalar: u32,
        position: usize,
    },

    #[error("`{name}` is reserved: {hint}")]
    ReservedName {
        name: &'static str,
        hint: &'static str,
    },

    #[error("script parameter is unsafe: it contains `{pattern}`")]
    UnsafeScriptContent { pattern: &'static str },

    #[error("{what} was used before it was validated")]
    UninitializedUse { what: &'static str },

    #[error("destination too small: need {needed} bytes, have {capacity}")]
    DestinationTooSmall { needed: usize, capacity: usize },
}

impl From<TranscodeError> for ValidationError {
    fn from(err: TranscodeError) -> Self {
        match err {
            TranscodeError::DestinationTooSmall { needed, capacity } => {
                ValidationError::DestinationTooSmall { needed, capacity }
            }
        }
    }
}

/// Errors raised while streaming validated fragments to a sink.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("writing HTML output failed: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("`close` called with no open element")]
    UnbalancedClose,

    #[error("document finished with {open} element(s) still open")]
    UnclosedElements { open: usize },

    #[error("nesting depth {depth} exceeds the configured maximum of {max}")]
    DepthExceeded { depth: usize, max: usize },
}

fn describe(scalar: &u32) -> String {
    let scalar = *scalar;
    match char::from_u32(scalar) {
        Some(ch) if !ch.is_control() => format!("{ch:?} (U+{scalar:04X})"),
        _ => format!("U+{scalar:04X}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_scalar() {
        let err = ValidationError::InvalidCharacter {
            what: "element name",
            scalar: u32::from('!'),
            position: 1,
        };
        assert_eq!(
            err.to_string(),
            "element name cannot contain '!' (U+0021) (at position 1)"
        );

        let err = ValidationError::InvalidLeadingCharacter {
            what: "element name",
            scalar: 0x7,
        };
        assert_eq!(err.to_string(), "element name cannot start with U+0007");
    }

    #[test]
    fn test_transcode_error_maps_to_destination_too_small() {
        let err: ValidationError = TranscodeError::DestinationTooSmall {
            needed: 4,
            capacity: 1,
        }
        .into();
        assert_eq!(
            err,
            ValidationError::DestinationTooSmall {
                needed: 4,
                capacity: 1
            }
        );
    }
}
