//! Frame transitions: beam <-> instrument and instrument <-> earth.
//!
//! Each transition rotates the velocity array in place and advances
//! `props.coord_sys` by one step in the beam -> inst -> earth chain, so the
//! transitions compose and reverse cleanly. A failed precondition or
//! configuration check leaves the record untouched.

use log::{debug, warn};
use ndarray::{Array2, Array3};

use crate::error::{Result, RotateError};
use crate::orientation::{check_supported_orientation, inst2earth_rotmat, EarthRotation};
use crate::types::{
    BeamVec, CoordSys, EarthMatrix, MeasurementRecord, VelVec, BEAM_CHANNELS, VECTOR_CHANNELS,
};

/// Rotate velocities between beam and instrument coordinates.
///
/// Forward requires the record to be in beam coordinates and leaves it in
/// inst; `reverse` performs inst -> beam using the algebraic matrix inverse
/// (the beam matrix is not orthogonal, so its transpose is wrong). `force`
/// skips the coordinate-system check.
pub fn beam2inst(record: &mut MeasurementRecord, reverse: bool, force: bool) -> Result<()> {
    if !force {
        let required = if reverse { CoordSys::Inst } else { CoordSys::Beam };
        if record.props.coord_sys != required {
            return Err(RotateError::WrongFrame {
                required: if reverse { "inst" } else { "beam" },
                found: record.props.coord_sys,
            });
        }
    } else {
        warn!("skipping coordinate system check for beam<->inst rotation");
    }

    // One channel per transducer; anything else would index out of bounds
    let n_chan = record.vel.dim().0;
    if n_chan != BEAM_CHANNELS {
        return Err(RotateError::ShapeMismatch {
            what: "velocity channels",
            expected: BEAM_CHANNELS,
            found: n_chan,
        });
    }

    let mut rotmat = record.config.beam_matrix();
    let cs = if reverse {
        rotmat = rotmat.try_inverse().ok_or(RotateError::SingularTransform)?;
        CoordSys::Beam
    } else {
        CoordSys::Inst
    };

    debug!(
        "rotating {} bins x {} samples {} ({} beams)",
        record.n_bins(),
        record.n_time(),
        if reverse { "inst -> beam" } else { "beam -> inst" },
        rotmat.ncols(),
    );
    apply_beam_matrix(&mut record.vel, &rotmat);
    record.props.coord_sys = cs;
    Ok(())
}

fn apply_beam_matrix(vel: &mut Array3<f64>, rotmat: &nalgebra::Matrix4<f64>) {
    let (_, n_bins, n_time) = vel.dim();
    for t in 0..n_time {
        for bin in 0..n_bins {
            let v = BeamVec::new(
                vel[[0, bin, t]],
                vel[[1, bin, t]],
                vel[[2, bin, t]],
                vel[[3, bin, t]],
            );
            let w = rotmat * v;
            for c in 0..BEAM_CHANNELS {
                vel[[c, bin, t]] = w[c];
            }
        }
    }
}

/// Rotate velocities between instrument (or ship) and earth coordinates.
///
/// On the forward rotation a pending declination is folded into the heading
/// series exactly once, and `fixed_orientation` is recorded in the
/// properties. The reverse rotation consumes that recorded value; the
/// caller-supplied `fixed_orientation` is only a fallback when no forward
/// rotation recorded one. With `fixed_orientation` the time-averaged matrix
/// is applied uniformly to every sample.
///
/// Only the first three velocity channels are rotated; an error-velocity
/// channel passes through untouched. Bottom-track velocity, when present,
/// is rotated in parallel.
pub fn inst2earth(
    record: &mut MeasurementRecord,
    reverse: bool,
    fixed_orientation: bool,
    force: bool,
) -> Result<()> {
    if !force {
        let cs = record.props.coord_sys;
        if !reverse && cs != CoordSys::Inst && cs != CoordSys::Ship {
            return Err(RotateError::WrongFrame {
                required: "'inst' or 'ship'",
                found: cs,
            });
        }
        if reverse && cs != CoordSys::Earth {
            return Err(RotateError::WrongFrame {
                required: "earth",
                found: cs,
            });
        }
    } else {
        warn!("skipping coordinate system check for inst<->earth rotation");
    }

    let n_chan = record.vel.dim().0;
    if n_chan < VECTOR_CHANNELS {
        return Err(RotateError::ShapeMismatch {
            what: "velocity channels",
            expected: VECTOR_CHANNELS,
            found: n_chan,
        });
    }

    // Unsupported signature orientations must fail before any mutation
    check_supported_orientation(&record.orient, &record.config)?;

    if !reverse && !record.props.declination_in_heading {
        if let Some(declination) = record.props.declination {
            debug!("folding declination of {declination} degrees into heading");
            record.orient.heading += declination;
            record.props.declination_in_heading = true;
        }
    }

    let mats = inst2earth_rotmat(&record.orient, &record.config, record.props.coord_sys)?;

    let (fixed, cs) = if reverse {
        // The value recorded by the forward rotation wins over the argument
        let fixed = record
            .props
            .inst2earth_fixed
            .take()
            .unwrap_or(fixed_orientation);
        (fixed, CoordSys::Inst)
    } else {
        record.props.inst2earth_fixed = Some(fixed_orientation);
        (fixed_orientation, CoordSys::Earth)
    };

    let mut rotation = EarthRotation::PerSample(mats);
    if fixed {
        rotation = rotation.to_fixed();
    }

    debug!(
        "rotating {} bins x {} samples {} (fixed = {})",
        record.n_bins(),
        record.n_time(),
        if reverse { "earth -> inst" } else { "inst -> earth" },
        fixed,
    );
    apply_earth_rotation(&mut record.vel, &rotation, reverse);
    if let Some(bt_vel) = &mut record.bt_vel {
        apply_earth_rotation_bt(bt_vel, &rotation, reverse);
    }
    record.props.coord_sys = cs;
    Ok(())
}

fn matrix_at(rotation: &EarthRotation, t: usize, transpose: bool) -> EarthMatrix {
    let m = *rotation.at(t);
    if transpose {
        m.transpose()
    } else {
        m
    }
}

// Only the first three channels rotate; channel 3 is error velocity.
fn apply_earth_rotation(vel: &mut Array3<f64>, rotation: &EarthRotation, transpose: bool) {
    let (_, n_bins, n_time) = vel.dim();
    for t in 0..n_time {
        let m = matrix_at(rotation, t, transpose);
        for bin in 0..n_bins {
            let v = VelVec::new(vel[[0, bin, t]], vel[[1, bin, t]], vel[[2, bin, t]]);
            let w = m * v;
            for c in 0..VECTOR_CHANNELS {
                vel[[c, bin, t]] = w[c];
            }
        }
    }
}

fn apply_earth_rotation_bt(bt_vel: &mut Array2<f64>, rotation: &EarthRotation, transpose: bool) {
    let (_, n_time) = bt_vel.dim();
    for t in 0..n_time {
        let m = matrix_at(rotation, t, transpose);
        let v = VelVec::new(bt_vel[[0, t]], bt_vel[[1, t]], bt_vel[[2, t]]);
        let w = m * v;
        for c in 0..VECTOR_CHANNELS {
            bt_vel[[c, t]] = w[c];
        }
    }
}
