//! Rotation representations and the conversions between them.
//!
//! Three encodings of the same rotation travel through the frame chain:
//!
//! | Type | Layout |
//! |------|--------|
//! | [`Quaternion`]     | `(qr, qi, qj, qk)`, scalar first, unit norm.            |
//! | [`AxisAngle`]      | `(Rx, Ry, Rz)`, axis × angle in radians.                |
//! | [`RotationMatrix`] | 3×3 row-major, orthonormal, determinant +1.             |
//!
//! Quaternion → matrix is a fixed closed form ([`quaternion_to_rotation_matrix`]).
//! Axis-angle ↔ matrix goes through the [`RotationMath`] trait so the frame
//! chain can be exercised against any backend; [`Rodrigues`] is the built-in
//! one.
//!
//! # Example
//!
//! ```rust
//! use graspframe_geometry::rotation::{Rodrigues, RotationMath, RotationMatrix};
//! use graspframe_types::AxisAngle;
//!
//! let quarter_turn_z = AxisAngle::new(0.0, 0.0, std::f64::consts::FRAC_PI_2);
//! let r = Rodrigues.axis_angle_to_rotation_matrix(quarter_turn_z);
//! assert!((r.rows()[1][0] - 1.0).abs() < 1e-12);
//!
//! let back = Rodrigues.rotation_matrix_to_axis_angle(&r);
//! assert!((back.rz - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
//!
//! assert_eq!(Rodrigues.axis_angle_to_rotation_matrix(AxisAngle::zero()), RotationMatrix::identity());
//! ```

use std::ops::Mul;

use graspframe_types::{AxisAngle, Vec3};

// ────────────────────────────────────────────────────────────────────────────
// Quaternion
// ────────────────────────────────────────────────────────────────────────────

/// A rotation quaternion `qr + qi·i + qj·j + qk·k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub qr: f64,
    pub qi: f64,
    pub qj: f64,
    pub qk: f64,
}

impl Quaternion {
    /// Create a quaternion.  The caller is responsible for providing a unit
    /// quaternion (|q| = 1); nothing downstream renormalizes it.
    pub const fn new(qr: f64, qi: f64, qj: f64, qk: f64) -> Self {
        Self { qr, qi, qj, qk }
    }

    /// The identity rotation (no rotation).
    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    pub fn norm(self) -> f64 {
        (self.qr * self.qr + self.qi * self.qi + self.qj * self.qj + self.qk * self.qk).sqrt()
    }

    /// Hamilton product: compose two rotations.
    pub fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.qr * rhs.qr - self.qi * rhs.qi - self.qj * rhs.qj - self.qk * rhs.qk,
            self.qr * rhs.qi + self.qi * rhs.qr + self.qj * rhs.qk - self.qk * rhs.qj,
            self.qr * rhs.qj - self.qi * rhs.qk + self.qj * rhs.qr + self.qk * rhs.qi,
            self.qr * rhs.qk + self.qi * rhs.qj - self.qj * rhs.qi + self.qk * rhs.qr,
        )
    }

    /// Conjugate (== inverse for a unit quaternion).
    pub fn conjugate(self) -> Self {
        Self::new(self.qr, -self.qi, -self.qj, -self.qk)
    }

    /// Rotate a vector by this quaternion: p' = q * p * q*.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let p = Self::new(0.0, v.x, v.y, v.z);
        let rotated = self.mul(p).mul(self.conjugate());
        Vec3::new(rotated.qi, rotated.qj, rotated.qk)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// RotationMatrix
// ────────────────────────────────────────────────────────────────────────────

/// A 3×3 rotation matrix stored row-major.
///
/// Every matrix produced by this crate from well-formed input is orthonormal
/// with determinant +1.  Matrices built with [`RotationMatrix::from_rows`]
/// are taken as-is: orthonormality is a precondition of the consumers, not
/// something they re-check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix([[f64; 3]; 3]);

impl RotationMatrix {
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self(rows)
    }

    pub const fn identity() -> Self {
        Self::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    pub const fn rows(&self) -> [[f64; 3]; 3] {
        self.0
    }

    pub fn transpose(&self) -> Self {
        let m = &self.0;
        Self::from_rows([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    /// `R · v`.
    pub fn mul_vec(&self, v: Vec3) -> Vec3 {
        let m = &self.0;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    pub fn trace(&self) -> f64 {
        self.0[0][0] + self.0[1][1] + self.0[2][2]
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.0;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// True when `RᵀR = I` entry-wise and `det R = 1`, both within `tol`.
    pub fn is_orthonormal(&self, tol: f64) -> bool {
        let rtr = (self.transpose() * *self).0;
        let identity = Self::identity().0;
        let gram_ok = (0..3).all(|i| (0..3).all(|j| (rtr[i][j] - identity[i][j]).abs() <= tol));
        gram_ok && (self.determinant() - 1.0).abs() <= tol
    }
}

impl Mul for RotationMatrix {
    type Output = RotationMatrix;

    fn mul(self, rhs: Self) -> Self::Output {
        let (a, b) = (&self.0, &rhs.0);
        let mut out = [[0.0; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
            }
        }
        Self(out)
    }
}

impl From<Quaternion> for RotationMatrix {
    fn from(q: Quaternion) -> Self {
        quaternion_to_rotation_matrix(q)
    }
}

/// Rotation matrix of a unit quaternion `(qr, qi, qj, qk)`.
///
/// The norm is not checked: a non-unit quaternion yields a matrix that is
/// not a rotation.
pub fn quaternion_to_rotation_matrix(q: Quaternion) -> RotationMatrix {
    let Quaternion { qr, qi, qj, qk } = q;
    RotationMatrix::from_rows([
        [1.0 - 2.0 * (qj * qj + qk * qk), 2.0 * (qi * qj - qk * qr), 2.0 * (qi * qk + qj * qr)],
        [2.0 * (qi * qj + qk * qr), 1.0 - 2.0 * (qi * qi + qk * qk), 2.0 * (qj * qk - qi * qr)],
        [2.0 * (qi * qk - qj * qr), 2.0 * (qj * qk + qi * qr), 1.0 - 2.0 * (qi * qi + qj * qj)],
    ])
}

// ────────────────────────────────────────────────────────────────────────────
// Axis-angle conversion
// ────────────────────────────────────────────────────────────────────────────

/// Axis-angle ↔ rotation-matrix conversion.
///
/// Implementations must follow the rotation-vector convention (direction =
/// axis, magnitude = angle in radians, right-hand rule), map the zero vector
/// to the identity and satisfy
/// `axis_angle_to_rotation_matrix(rotation_matrix_to_axis_angle(R)) ≈ R` for
/// every proper rotation `R`.
pub trait RotationMath: Send + Sync {
    fn axis_angle_to_rotation_matrix(&self, a: AxisAngle) -> RotationMatrix;

    /// Returned angles lie in `[0, π]`.
    fn rotation_matrix_to_axis_angle(&self, r: &RotationMatrix) -> AxisAngle;
}

/// Below this angle the trigonometric ratios switch to their Taylor series.
const SMALL_ANGLE: f64 = 1e-4;

/// `sin θ` below which a rotation with `cos θ < 0` is treated as near π and
/// its axis is read from the symmetric part of the matrix.
const NEAR_PI_SIN: f64 = 1e-3;

/// Closed-form exponential / logarithm on SO(3).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rodrigues;

impl RotationMath for Rodrigues {
    /// `R = I + (sin θ / θ)·K + ((1 − cos θ) / θ²)·K²`, `K = [a]×`.
    fn axis_angle_to_rotation_matrix(&self, a: AxisAngle) -> RotationMatrix {
        let AxisAngle { rx, ry, rz } = a;
        let theta2 = rx * rx + ry * ry + rz * rz;
        let theta = theta2.sqrt();

        let (s, c) = if theta < SMALL_ANGLE {
            (1.0 - theta2 / 6.0, 0.5 - theta2 / 24.0)
        } else {
            (theta.sin() / theta, (1.0 - theta.cos()) / theta2)
        };

        RotationMatrix::from_rows([
            [1.0 - c * (ry * ry + rz * rz), -s * rz + c * rx * ry, s * ry + c * rx * rz],
            [s * rz + c * rx * ry, 1.0 - c * (rx * rx + rz * rz), -s * rx + c * ry * rz],
            [-s * ry + c * rx * rz, s * rx + c * ry * rz, 1.0 - c * (rx * rx + ry * ry)],
        ])
    }

    fn rotation_matrix_to_axis_angle(&self, r: &RotationMatrix) -> AxisAngle {
        let m = &r.0;
        // Axial vector of the skew-symmetric part: sin θ · n.
        let v = Vec3::new(m[2][1] - m[1][2], m[0][2] - m[2][0], m[1][0] - m[0][1]).scale(0.5);
        let sin = v.norm();
        let cos = (r.trace() - 1.0) * 0.5;
        let theta = sin.atan2(cos);

        if cos < 0.0 && sin < NEAR_PI_SIN {
            return near_pi_axis_angle(m, v, theta, cos);
        }

        let k = if sin < SMALL_ANGLE {
            1.0 + sin * sin / 6.0
        } else {
            theta / sin
        };
        AxisAngle::from(v.scale(k))
    }
}

/// Axis recovery where `sin θ` is too small to carry the axis.
///
/// Uses `(R + Rᵀ)/2 = cos θ·I + (1 − cos θ)·n nᵀ` and takes the column with
/// the largest diagonal.  The sign follows the residual skew part; at exactly
/// π, where both signs describe the same rotation, the largest axis component
/// comes out positive.
fn near_pi_axis_angle(m: &[[f64; 3]; 3], skew: Vec3, theta: f64, cos: f64) -> AxisAngle {
    let inv = 1.0 / (1.0 - cos);
    let nnt = |i: usize, j: usize| {
        let diag = if i == j { cos } else { 0.0 };
        ((m[i][j] + m[j][i]) * 0.5 - diag) * inv
    };

    let mut k = 0;
    for i in 1..3 {
        if nnt(i, i) > nnt(k, k) {
            k = i;
        }
    }

    let d = nnt(k, k);
    if d.is_nan() || d <= 0.0 {
        return AxisAngle::zero();
    }
    let d = d.sqrt();

    let mut axis = Vec3::new(nnt(0, k), nnt(1, k), nnt(2, k)).scale(1.0 / d);
    if axis.dot(skew) < 0.0 {
        axis = axis.scale(-1.0);
    }
    AxisAngle::from(axis.scale(theta))
}

// ────────────────────────────────────────────────────────────────────────────
// nalgebra backend
// ────────────────────────────────────────────────────────────────────────────

/// [`RotationMath`] backed by nalgebra's `Rotation3` exponential/logarithm.
#[cfg(feature = "nalgebra-support")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NalgebraRotationMath;

#[cfg(feature = "nalgebra-support")]
impl From<nalgebra::Rotation3<f64>> for RotationMatrix {
    fn from(r: nalgebra::Rotation3<f64>) -> Self {
        let m = r.matrix();
        let mut rows = [[0.0; 3]; 3];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = m[(i, j)];
            }
        }
        Self(rows)
    }
}

#[cfg(feature = "nalgebra-support")]
impl From<RotationMatrix> for nalgebra::Rotation3<f64> {
    fn from(r: RotationMatrix) -> Self {
        let m = &r.0;
        nalgebra::Rotation3::from_matrix_unchecked(nalgebra::Matrix3::new(
            m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], m[2][0], m[2][1], m[2][2],
        ))
    }
}

#[cfg(feature = "nalgebra-support")]
impl RotationMath for NalgebraRotationMath {
    fn axis_angle_to_rotation_matrix(&self, a: AxisAngle) -> RotationMatrix {
        nalgebra::UnitQuaternion::from_scaled_axis(nalgebra::Vector3::new(a.rx, a.ry, a.rz))
            .to_rotation_matrix()
            .into()
    }

    /// Goes through a unit quaternion so half turns keep their axis.  The
    /// angle comes from `acos`, which limits precision to ~1e-8 rad for very
    /// small rotations.
    fn rotation_matrix_to_axis_angle(&self, r: &RotationMatrix) -> AxisAngle {
        let rot = nalgebra::Rotation3::<f64>::from(*r);
        let v = nalgebra::UnitQuaternion::from_rotation_matrix(&rot).scaled_axis();
        AxisAngle::new(v.x, v.y, v.z)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
