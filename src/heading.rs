//! Corrected-heading unit vectors.

use ndarray::Array1;
use num_complex::Complex64;

use crate::types::MeasurementRecord;

/// Heading as a unit complex number `exp(-i * h)` per time step, with the
/// heading offset and declination from the record properties folded in.
///
/// The phase encoding lets downstream code average heading as a vector,
/// avoiding the wraparound error of naive scalar averaging near north.
pub fn inst2earth_heading(record: &MeasurementRecord) -> Array1<Complex64> {
    let mut h = record.orient.heading.mapv(f64::to_radians);
    if let Some(offset) = record.props.heading_offset {
        h += offset.to_radians();
    }
    if let Some(declination) = record.props.declination {
        h += declination.to_radians();
    }
    h.mapv(|v| Complex64::new(0.0, -v).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CoordSys, InstrumentConfig, OrientationSeries};
    use approx::assert_relative_eq;
    use ndarray::{arr1, Array1, Array3};

    fn record(heading: &[f64]) -> MeasurementRecord {
        let n = heading.len();
        let orient = OrientationSeries::new(
            Array1::zeros(n),
            Array1::zeros(n),
            arr1(heading),
        )
        .unwrap();
        MeasurementRecord::new(
            Array3::zeros((4, 1, n)),
            orient,
            InstrumentConfig::default(),
            CoordSys::Inst,
        )
        .unwrap()
    }

    #[test]
    fn test_unit_magnitude() {
        let rec = record(&[0.0, 45.0, 123.0, 359.0]);
        for z in inst2earth_heading(&rec).iter() {
            assert_relative_eq!(z.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_heading_90_is_minus_i() {
        let rec = record(&[90.0]);
        let z = inst2earth_heading(&rec)[0];
        assert_relative_eq!(z.re, 0.0, epsilon = 1e-12);
        assert_relative_eq!(z.im, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_offset_and_declination_accumulate() {
        let mut rec = record(&[30.0]);
        rec.props.heading_offset = Some(40.0);
        rec.props.declination = Some(20.0);
        let z = inst2earth_heading(&rec)[0];
        let expected = Complex64::new(0.0, -(90.0_f64.to_radians())).exp();
        assert_relative_eq!(z.re, expected.re, epsilon = 1e-12);
        assert_relative_eq!(z.im, expected.im, epsilon = 1e-12);
    }

    #[test]
    fn test_vector_average_handles_wraparound() {
        // Scalar mean of 350 and 10 degrees is 180; the vector mean points north
        let rec = record(&[350.0, 10.0]);
        let z = inst2earth_heading(&rec);
        let mean = (z[0] + z[1]) / 2.0;
        assert_relative_eq!(mean.arg(), 0.0, epsilon = 1e-12);
        assert!(mean.norm() > 0.9);
    }
}
