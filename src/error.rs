use thiserror::Error;

use crate::types::CoordSys;

/// Frame rotation error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RotateError {
    #[error("velocity data must be in {required} coordinates, found '{found}'")]
    WrongFrame {
        required: &'static str,
        found: CoordSys,
    },

    #[error("orientation flag {flag} is not supported for the signature model (only ZUP = 4)")]
    UnsupportedOrientation { flag: u8 },

    #[error("precomputed transform matrix is singular and cannot be inverted")]
    SingularTransform,

    #[error("{what} length {found} does not match expected {expected}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Result type for rotation operations
pub type Result<T> = std::result::Result<T, RotateError>;
