//! Instrument-to-earth rotation matrices from the orientation sensors.
//!
//! Matrix entries follow the Teledyne RDI ADCP Coordinate Transformation
//! manual (January 2008). Raw pitch is tilt-corrected for its coupling with
//! roll before the matrix is assembled.

use crate::error::{Result, RotateError};
use crate::types::{
    CoordSys, EarthMatrix, InstrumentConfig, InstrumentModel, MountOrientation, OrientationSeries,
    ORIENT_ZUP,
};

/// Per-record earth rotation: one matrix per time step, or a single
/// time-averaged matrix in fixed-orientation mode.
#[derive(Clone, Debug)]
pub enum EarthRotation {
    PerSample(Vec<EarthMatrix>),
    Fixed(EarthMatrix),
}

impl EarthRotation {
    /// Matrix applied at time step `t`.
    pub fn at(&self, t: usize) -> &EarthMatrix {
        match self {
            EarthRotation::PerSample(mats) => &mats[t],
            EarthRotation::Fixed(mat) => mat,
        }
    }

    /// Collapse to the elementwise time-average matrix.
    pub fn to_fixed(&self) -> EarthRotation {
        match self {
            EarthRotation::PerSample(mats) => EarthRotation::Fixed(mean_matrix(mats)),
            EarthRotation::Fixed(mat) => EarthRotation::Fixed(*mat),
        }
    }
}

pub(crate) fn mean_matrix(mats: &[EarthMatrix]) -> EarthMatrix {
    let mut acc = EarthMatrix::zeros();
    for m in mats {
        acc += *m;
    }
    acc / mats.len() as f64
}

/// Reject signature-model records carrying any orientation flag other than
/// ZUP. Must run before any record mutation so an unsupported record is left
/// untouched.
pub fn check_supported_orientation(
    orient: &OrientationSeries,
    config: &InstrumentConfig,
) -> Result<()> {
    if config.model != InstrumentModel::Signature {
        return Ok(());
    }
    if let Some(flags) = &orient.orient_up {
        for &flag in flags.iter() {
            if flag != ORIENT_ZUP {
                return Err(RotateError::UnsupportedOrientation { flag });
            }
        }
    }
    Ok(())
}

/// Build the per-time-step instrument-to-earth rotation matrices.
///
/// `coord_sys` is the frame the velocity currently sits in; ship-frame data
/// with `use_pitchroll` set has its roll and pitch zeroed because the
/// platform already supplied the tilt.
pub fn inst2earth_rotmat(
    orient: &OrientationSeries,
    config: &InstrumentConfig,
    coord_sys: CoordSys,
) -> Result<Vec<EarthMatrix>> {
    check_supported_orientation(orient, config)?;

    let standard = config.model != InstrumentModel::Signature;
    let flip_roll = standard && config.orientation == MountOrientation::Up;
    let zero_tilt = standard && coord_sys == CoordSys::Ship && config.use_pitchroll;

    let n = orient.len();
    let mut mats = Vec::with_capacity(n);
    for t in 0..n {
        let mut r = orient.roll[t].to_radians();
        // Tilt correction: the raw pitch reading couples with roll
        let mut p = (orient.pitch[t].to_radians().tan() * r.cos()).atan();
        let h = orient.heading[t].to_radians();
        if flip_roll {
            r += std::f64::consts::PI;
        }
        if zero_tilt {
            r = 0.0;
            p = 0.0;
        }
        let (sh, ch) = h.sin_cos();
        let (sr, cr) = r.sin_cos();
        let (sp, cp) = p.sin_cos();
        mats.push(EarthMatrix::new(
            ch * cr + sh * sp * sr,
            sh * cp,
            ch * sr - sh * sp * cr,
            -sh * cr + ch * sp * sr,
            ch * cp,
            -sh * sr - ch * sp * cr,
            -cp * sr,
            sp,
            cp * cr,
        ));
    }
    Ok(mats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BeamPattern;
    use approx::assert_relative_eq;
    use ndarray::arr1;

    fn series(roll: &[f64], pitch: &[f64], heading: &[f64]) -> OrientationSeries {
        OrientationSeries::new(arr1(roll), arr1(pitch), arr1(heading)).unwrap()
    }

    fn down_config() -> InstrumentConfig {
        InstrumentConfig {
            beam_angle: 20.0,
            beam_pattern: BeamPattern::Convex,
            orientation: MountOrientation::Down,
            use_pitchroll: false,
            model: InstrumentModel::Standard,
            transform_matrix: None,
        }
    }

    #[test]
    fn test_heading_90_zero_tilt() {
        let orient = series(&[0.0], &[0.0], &[90.0]);
        let mats = inst2earth_rotmat(&orient, &down_config(), CoordSys::Inst).unwrap();
        let expected = EarthMatrix::new(0.0, 1.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(mats[0], expected, epsilon = 1e-12);
    }

    #[test]
    fn test_matrices_are_orthogonal() {
        let orient = series(&[3.5, -8.0, 12.0], &[-2.0, 4.5, 1.0], &[10.0, 190.0, 275.0]);
        let mats = inst2earth_rotmat(&orient, &down_config(), CoordSys::Inst).unwrap();
        for m in &mats {
            let prod = m * m.transpose();
            assert_relative_eq!(prod, EarthMatrix::identity(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_up_mount_flips_roll() {
        let orient = series(&[0.0], &[0.0], &[0.0]);
        let mut config = down_config();
        config.orientation = MountOrientation::Up;
        let mats = inst2earth_rotmat(&orient, &config, CoordSys::Inst).unwrap();
        // roll = 180 degrees: x stays, y and z flip
        let expected = EarthMatrix::new(-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0);
        assert_relative_eq!(mats[0], expected, epsilon = 1e-12);
    }

    #[test]
    fn test_signature_skips_up_mount_correction() {
        let orient = series(&[5.0], &[3.0], &[40.0]);
        let mut up = down_config();
        up.orientation = MountOrientation::Up;
        up.model = InstrumentModel::Signature;
        let mut down = down_config();
        down.model = InstrumentModel::Signature;
        let m_up = inst2earth_rotmat(&orient, &up, CoordSys::Inst).unwrap();
        let m_down = inst2earth_rotmat(&orient, &down, CoordSys::Inst).unwrap();
        assert_relative_eq!(m_up[0], m_down[0]);
    }

    #[test]
    fn test_ship_frame_suppresses_tilt() {
        let orient = series(&[6.0, -3.0], &[2.0, 7.0], &[120.0, 121.0]);
        let mut config = down_config();
        config.use_pitchroll = true;
        let ship = inst2earth_rotmat(&orient, &config, CoordSys::Ship).unwrap();
        let flat = series(&[0.0, 0.0], &[0.0, 0.0], &[120.0, 121.0]);
        let heading_only = inst2earth_rotmat(&flat, &config, CoordSys::Inst).unwrap();
        for (a, b) in ship.iter().zip(heading_only.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_pitch_tilt_coupling() {
        let roll = 30.0_f64;
        let pitch = 10.0_f64;
        let orient = series(&[roll], &[pitch], &[0.0]);
        let mats = inst2earth_rotmat(&orient, &down_config(), CoordSys::Inst).unwrap();
        let p_eff = (pitch.to_radians().tan() * roll.to_radians().cos()).atan();
        assert_relative_eq!(mats[0][(2, 1)], p_eff.sin(), epsilon = 1e-12);
    }

    #[test]
    fn test_signature_rejects_non_zup() {
        let orient = series(&[0.0, 0.0], &[0.0, 0.0], &[0.0, 0.0])
            .with_orient_up(arr1(&[ORIENT_ZUP, 1]))
            .unwrap();
        let mut config = down_config();
        config.model = InstrumentModel::Signature;
        let err = inst2earth_rotmat(&orient, &config, CoordSys::Inst).unwrap_err();
        assert_eq!(err, RotateError::UnsupportedOrientation { flag: 1 });
    }

    #[test]
    fn test_standard_ignores_orientation_flags() {
        let orient = series(&[0.0], &[0.0], &[0.0])
            .with_orient_up(arr1(&[0]))
            .unwrap();
        assert!(inst2earth_rotmat(&orient, &down_config(), CoordSys::Inst).is_ok());
    }

    #[test]
    fn test_fixed_rotation_is_mean() {
        let orient = series(&[0.0, 0.0], &[0.0, 0.0], &[0.0, 90.0]);
        let mats = inst2earth_rotmat(&orient, &down_config(), CoordSys::Inst).unwrap();
        let rotation = EarthRotation::PerSample(mats.clone()).to_fixed();
        let mean = mean_matrix(&mats);
        assert_relative_eq!(*rotation.at(0), mean);
        assert_relative_eq!(*rotation.at(1), mean);
    }
}
