//! Coordinate-frame rotations for acoustic Doppler current profiler (ADCP)
//! velocity data.
//!
//! Raw velocities arrive in beam coordinates (one component per transducer)
//! and are rotated through instrument/ship coordinates into earth (ENU)
//! coordinates using the orientation sensors, and back:
//!
//! ```text
//! beam <-> inst/ship <-> earth
//! ```
//!
//! The two transitions mutate the [`MeasurementRecord`] in place and keep
//! its coordinate-system tag in step, so rotations compose and reverse.
//!
//! ```
//! use adcp_frames::{beam2inst, inst2earth, CoordSys, InstrumentConfig,
//!                   MeasurementRecord, OrientationSeries};
//! use ndarray::{Array1, Array3};
//!
//! let orient = OrientationSeries::new(
//!     Array1::zeros(10), Array1::zeros(10), Array1::zeros(10)).unwrap();
//! let config = InstrumentConfig { beam_angle: 20.0, ..Default::default() };
//! let mut record = MeasurementRecord::new(
//!     Array3::zeros((4, 25, 10)), orient, config, CoordSys::Beam).unwrap();
//!
//! beam2inst(&mut record, false, false).unwrap();
//! inst2earth(&mut record, false, false, false).unwrap();
//! assert_eq!(record.props.coord_sys, CoordSys::Earth);
//! ```

pub mod error;
pub mod geometry;
pub mod heading;
pub mod orientation;
pub mod transitions;
pub mod types;

pub use error::{Result, RotateError};
pub use geometry::calc_beam_rotmatrix;
pub use heading::inst2earth_heading;
pub use orientation::{inst2earth_rotmat, EarthRotation};
pub use transitions::{beam2inst, inst2earth};
pub use types::{
    BeamPattern, CoordSys, InstrumentConfig, InstrumentModel, MeasurementRecord,
    MountOrientation, OrientationSeries, RecordProperties,
};
