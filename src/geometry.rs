//! Beam-to-instrument rotation geometry.
//!
//! The beam matrix depends only on the static head geometry (beam angle and
//! convex/concave pattern), so it is constant for the life of a dataset.

use crate::types::{BeamMatrix, BeamPattern};

/// Calculate the rotation matrix from beam coordinates to instrument head
/// coordinates.
///
/// `theta` is the angle of the heads (usually 20 or 30 degrees) and must lie
/// strictly between 0 and 90 degrees. `degrees` selects whether `theta` is
/// given in degrees or radians.
///
/// Note the result is not orthogonal: the inverse rotation requires the
/// algebraic matrix inverse, not the transpose.
pub fn calc_beam_rotmatrix(theta: f64, pattern: BeamPattern, degrees: bool) -> BeamMatrix {
    let theta = if degrees { theta.to_radians() } else { theta };
    let c = match pattern {
        BeamPattern::Concave => -1.0,
        BeamPattern::Convex => 1.0,
    };
    let a = 1.0 / (2.0 * theta.sin());
    let b = 1.0 / (4.0 * theta.cos());
    let d = a / 2.0_f64.sqrt();
    BeamMatrix::new(
        c * a,
        -c * a,
        0.0,
        0.0,
        0.0,
        0.0,
        -c * a,
        c * a,
        b,
        b,
        b,
        b,
        d,
        d,
        -d,
        -d,
    )
}
