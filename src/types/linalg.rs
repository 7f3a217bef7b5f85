//! Fixed-dimension linear algebra aliases for the frame rotations.
//!
//! Provides clean type aliases and dimension constants shared by the
//! beam-geometry and orientation rotation code.

use nalgebra::{Matrix3, Matrix4, Vector3, Vector4};

// ===== Channel Dimensions =====
pub const BEAM_CHANNELS: usize = 4; // one per transducer
pub const VECTOR_CHANNELS: usize = 3; // (u, v, w); channel 3 is error velocity

// ===== Rotation Matrix Types =====
/// Beam -> instrument matrix. Not orthogonal; invert, never transpose.
pub type BeamMatrix = Matrix4<f64>;
/// Instrument -> earth matrix for one time step. Orthogonal.
pub type EarthMatrix = Matrix3<f64>;

// ===== Velocity Sample Types =====
pub type BeamVec = Vector4<f64>;
pub type VelVec = Vector3<f64>;
