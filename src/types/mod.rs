pub mod linalg;

pub use linalg::*;

use ndarray::{Array1, Array2, Array3};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RotateError};

/// Signature-model orientation flag for the upward (ZUP) mount, the only
/// orientation the earth rotation supports for that model.
pub const ORIENT_ZUP: u8 = 4;

/// Coordinate system the velocity data is currently expressed in.
///
/// `ship` is a frame-equivalent of `inst` reached only externally; it is
/// distinguished by [`InstrumentConfig::use_pitchroll`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordSys {
    #[default]
    Beam,
    Inst,
    Ship,
    #[serde(alias = "enu")]
    Earth,
}

impl std::fmt::Display for CoordSys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            CoordSys::Beam => "beam",
            CoordSys::Inst => "inst",
            CoordSys::Ship => "ship",
            CoordSys::Earth => "earth",
        };
        f.write_str(tag)
    }
}

/// Transducer head pattern. Concave heads flip the sign of the first two
/// rows of the beam matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeamPattern {
    #[default]
    Convex,
    Concave,
}

/// Physical mounting orientation of the instrument.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountOrientation {
    Up,
    #[default]
    Down,
}

/// Instrument model, selecting the orientation-correction policy used when
/// building the earth rotation matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentModel {
    /// Standard models: up-mount roll flip and ship-frame tilt suppression.
    #[default]
    Standard,
    /// Nortek Signature: tilt handled internally, ZUP orientation only.
    Signature,
}

/// Static instrument configuration metadata.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InstrumentConfig {
    /// Beam angle of the heads in degrees (usually 20 or 30).
    pub beam_angle: f64,
    pub beam_pattern: BeamPattern,
    pub orientation: MountOrientation,
    /// Whether ship-frame data already carries the platform's pitch/roll.
    pub use_pitchroll: bool,
    pub model: InstrumentModel,
    /// Factory-calibrated beam transform, row-major. Takes precedence over
    /// the geometry-derived matrix when present.
    pub transform_matrix: Option<[[f64; 4]; 4]>,
}

impl InstrumentConfig {
    /// Resolve the beam matrix source once: the calibrated override when
    /// present, otherwise the geometry-derived matrix.
    pub fn beam_matrix(&self) -> BeamMatrix {
        match self.transform_matrix {
            Some(m) => BeamMatrix::from_fn(|i, j| m[i][j]),
            None => crate::geometry::calc_beam_rotmatrix(self.beam_angle, self.beam_pattern, true),
        }
    }
}

/// Orientation sensor time series, all in degrees.
#[derive(Clone, Debug)]
pub struct OrientationSeries {
    pub roll: Array1<f64>,
    pub pitch: Array1<f64>,
    pub heading: Array1<f64>,
    /// Per-sample orientation flags reported by signature-model instruments.
    pub orient_up: Option<Array1<u8>>,
}

impl OrientationSeries {
    pub fn new(roll: Array1<f64>, pitch: Array1<f64>, heading: Array1<f64>) -> Result<Self> {
        let n = roll.len();
        if pitch.len() != n {
            return Err(RotateError::ShapeMismatch {
                what: "pitch series",
                expected: n,
                found: pitch.len(),
            });
        }
        if heading.len() != n {
            return Err(RotateError::ShapeMismatch {
                what: "heading series",
                expected: n,
                found: heading.len(),
            });
        }
        Ok(OrientationSeries {
            roll,
            pitch,
            heading,
            orient_up: None,
        })
    }

    pub fn with_orient_up(mut self, orient_up: Array1<u8>) -> Result<Self> {
        if orient_up.len() != self.len() {
            return Err(RotateError::ShapeMismatch {
                what: "orientation flag series",
                expected: self.len(),
                found: orient_up.len(),
            });
        }
        self.orient_up = Some(orient_up);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.roll.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roll.is_empty()
    }
}

/// Mutable processing metadata carried alongside the velocity data.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RecordProperties {
    /// Frame of `vel` at rest between operations.
    pub coord_sys: CoordSys,
    /// Magnetic declination in degrees, folded into heading on the first
    /// forward earth rotation.
    pub declination: Option<f64>,
    /// Set once declination has been added to heading, so repeated forward
    /// rotations never double-apply it.
    pub declination_in_heading: bool,
    /// Heading offset in degrees, applied by the heading-vector helper.
    pub heading_offset: Option<f64>,
    /// Recorded by a forward earth rotation and consumed by the matching
    /// reverse rotation.
    pub inst2earth_fixed: Option<bool>,
}

/// One profiler dataset: velocity, orientation sensors, configuration and
/// processing state. Rotations mutate `vel` (and `bt_vel`) in place and keep
/// `props.coord_sys` in step.
#[derive(Clone, Debug)]
pub struct MeasurementRecord {
    /// Velocity, shape (channels, depth bins, time). 4 beam channels before
    /// the instrument rotation, 3 (+ error velocity) after.
    pub vel: Array3<f64>,
    /// Bottom-track velocity, shape (channels, time).
    pub bt_vel: Option<Array2<f64>>,
    pub orient: OrientationSeries,
    pub config: InstrumentConfig,
    pub props: RecordProperties,
}

impl MeasurementRecord {
    pub fn new(
        vel: Array3<f64>,
        orient: OrientationSeries,
        config: InstrumentConfig,
        coord_sys: CoordSys,
    ) -> Result<Self> {
        let (n_chan, _, n_time) = vel.dim();
        if n_chan < VECTOR_CHANNELS {
            return Err(RotateError::ShapeMismatch {
                what: "velocity channels",
                expected: VECTOR_CHANNELS,
                found: n_chan,
            });
        }
        if orient.len() != n_time {
            return Err(RotateError::ShapeMismatch {
                what: "orientation series",
                expected: n_time,
                found: orient.len(),
            });
        }
        Ok(MeasurementRecord {
            vel,
            bt_vel: None,
            orient,
            config,
            props: RecordProperties {
                coord_sys,
                ..RecordProperties::default()
            },
        })
    }

    pub fn with_bottom_track(mut self, bt_vel: Array2<f64>) -> Result<Self> {
        let (n_chan, _, n_time) = self.vel.dim();
        if bt_vel.dim() != (n_chan, n_time) {
            return Err(RotateError::ShapeMismatch {
                what: "bottom-track velocity",
                expected: n_chan * n_time,
                found: bt_vel.len(),
            });
        }
        self.bt_vel = Some(bt_vel);
        Ok(self)
    }

    pub fn n_time(&self) -> usize {
        self.vel.dim().2
    }

    pub fn n_bins(&self) -> usize {
        self.vel.dim().1
    }
}
