//! 4×4 homogeneous rigid-body transforms.
//!
//! ```text
//! ┌       ┐
//! │ R   t │   R: 3×3 rotation, t: translation column
//! │ 0   1 │
//! └       ┘
//! ```
//!
//! A [`HomogeneousTransform`] `T_a_b` expresses frame `b` in frame `a`:
//! applying it to a point given in `b` yields the same point in `a`.
//! Chaining `T_a_b · T_b_c` gives `T_a_c`.
//!
//! # Example
//!
//! ```rust
//! use graspframe_geometry::homogeneous::HomogeneousTransform;
//! use graspframe_geometry::rotation::RotationMatrix;
//! use graspframe_types::Vec3;
//!
//! let base_to_tool = HomogeneousTransform::build(RotationMatrix::identity(), Vec3::new(1.0, 2.0, 3.0));
//! let tool_to_base = base_to_tool.invert();
//!
//! let round_trip = base_to_tool.compose(&tool_to_base);
//! assert!(round_trip.translation().norm() < 1e-12);
//! ```

use std::ops::Mul;

use graspframe_types::Vec3;

use crate::rotation::RotationMatrix;

/// A 4×4 transform with the `[R t; 0 1]` block layout.
///
/// The matrix is private: every value comes from [`build`](Self::build),
/// [`invert`](Self::invert) or [`compose`](Self::compose), so the bottom row
/// is always `(0, 0, 0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomogeneousTransform {
    m: [[f64; 4]; 4],
}

impl HomogeneousTransform {
    /// Place `r` in the top-left block and `t` in the last column.
    pub fn build(r: RotationMatrix, t: Vec3) -> Self {
        let [r0, r1, r2] = r.rows();
        Self {
            m: [
                [r0[0], r0[1], r0[2], t.x],
                [r1[0], r1[1], r1[2], t.y],
                [r2[0], r2[1], r2[2], t.z],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// The identity transform (no translation, no rotation).
    pub fn identity() -> Self {
        Self::build(RotationMatrix::identity(), Vec3::zero())
    }

    /// Top-left 3×3 block.
    pub fn rotation(&self) -> RotationMatrix {
        let m = &self.m;
        RotationMatrix::from_rows([
            [m[0][0], m[0][1], m[0][2]],
            [m[1][0], m[1][1], m[1][2]],
            [m[2][0], m[2][1], m[2][2]],
        ])
    }

    /// Last column, without the homogeneous 1.
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.m[0][3], self.m[1][3], self.m[2][3])
    }

    /// Copy of the full 4×4 matrix, row-major.
    pub fn matrix(&self) -> [[f64; 4]; 4] {
        self.m
    }

    /// Rigid-body inverse: `[Rᵀ  −Rᵀt; 0 1]`.
    ///
    /// Relies on `R` being orthonormal; a non-orthonormal block gives a
    /// matrix that is not the inverse.
    pub fn invert(&self) -> Self {
        let rt = self.rotation().transpose();
        let t = rt.mul_vec(self.translation()).scale(-1.0);
        Self::build(rt, t)
    }

    /// Matrix product `self · other`: `other` expressed in `self`'s frame.
    ///
    /// Not commutative.  For the frame chain the order is always
    /// base→object, then object→gripper.
    pub fn compose(&self, other: &Self) -> Self {
        let (a, b) = (&self.m, &other.m);
        let mut m = [[0.0; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| a[i][k] * b[k][j]).sum();
            }
        }
        Self { m }
    }

    /// Map a point given in the child frame into the parent frame.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation().mul_vec(p).add(self.translation())
    }
}

impl Default for HomogeneousTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for HomogeneousTransform {
    type Output = HomogeneousTransform;

    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(&rhs)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::{Rodrigues, RotationMath};
    use graspframe_types::AxisAngle;

    const TOL: f64 = 1e-9;

    fn assert_close(a: &HomogeneousTransform, b: &HomogeneousTransform, tol: f64) {
        let (ma, mb) = (a.matrix(), b.matrix());
        for i in 0..4 {
            for j in 0..4 {
                assert!(
                    (ma[i][j] - mb[i][j]).abs() < tol,
                    "[{i}][{j}]: {} vs {}",
                    ma[i][j],
                    mb[i][j]
                );
            }
        }
    }

    fn transform(rx: f64, ry: f64, rz: f64, x: f64, y: f64, z: f64) -> HomogeneousTransform {
        let r = Rodrigues.axis_angle_to_rotation_matrix(AxisAngle::new(rx, ry, rz));
        HomogeneousTransform::build(r, Vec3::new(x, y, z))
    }

    fn flip() -> HomogeneousTransform {
        let r = RotationMatrix::from_rows([[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]]);
        HomogeneousTransform::build(r, Vec3::zero())
    }

    #[test]
    fn build_places_blocks() {
        let r = Rodrigues.axis_angle_to_rotation_matrix(AxisAngle::new(0.3, -0.2, 0.9));
        let h = HomogeneousTransform::build(r, Vec3::new(609.90, 4.51, 103.94));
        let m = h.matrix();
        assert_eq!(h.rotation(), r);
        assert_eq!(h.translation(), Vec3::new(609.90, 4.51, 103.94));
        assert_eq!(m[3], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(m[1][3], 4.51);
    }

    #[test]
    fn invert_cancels_on_both_sides() {
        let samples = [
            transform(2.1361, 2.3107, 0.0546, 609.90, 4.51, 103.94),
            transform(-1.838161, 2.400074, 0.157878, 0.909219, -53.432566, 194.968568),
            transform(0.0, 0.0, 0.0, -5.0, 0.0, 12.5),
            transform(0.0, 3.14159, 0.0, 1.0, 1.0, 1.0),
        ];
        for h in samples {
            assert_close(&h.compose(&h.invert()), &HomogeneousTransform::identity(), TOL);
            assert_close(&h.invert().compose(&h), &HomogeneousTransform::identity(), TOL);
        }
    }

    #[test]
    fn invert_of_pure_translation_negates_it() {
        let h = HomogeneousTransform::build(RotationMatrix::identity(), Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(h.invert().translation(), Vec3::new(-1.0, 2.0, -3.0));
    }

    #[test]
    fn invert_rotates_translation_back() {
        // Child sits at +X of the parent, turned a quarter about Z: seen from
        // the child, the parent origin lies along the child's +Y.
        let h = transform(0.0, 0.0, std::f64::consts::FRAC_PI_2, 1.0, 0.0, 0.0);
        let t = h.invert().translation();
        assert!(t.x.abs() < TOL, "x={}", t.x);
        assert!((t.y - 1.0).abs() < TOL, "y={}", t.y);
        assert!(t.z.abs() < TOL);
    }

    #[test]
    fn flip_is_its_own_inverse() {
        let h = flip();
        assert_eq!(h.invert(), h);
    }

    #[test]
    fn double_inverse_is_original() {
        let h = transform(0.5, -1.2, 0.3, 10.0, 20.0, -30.0);
        assert_close(&h.invert().invert(), &h, TOL);
    }

    #[test]
    fn composition_is_associative() {
        let a = transform(2.1361, 2.3107, 0.0546, 609.90, 4.51, 103.94);
        let b = flip();
        let c = transform(-1.838161, 2.400074, 0.157878, 0.909219, -53.432566, 194.968568);
        assert_close(&a.compose(&b).compose(&c), &a.compose(&b.compose(&c)), 1e-9);
    }

    #[test]
    fn identity_is_neutral() {
        let h = transform(0.7, 0.1, -0.4, 3.0, -4.0, 5.0);
        let id = HomogeneousTransform::build(RotationMatrix::identity(), Vec3::zero());
        assert_eq!(h.compose(&id), h);
        assert_eq!(id.compose(&h), h);
    }

    #[test]
    fn composition_is_not_commutative() {
        let a = transform(0.0, 0.0, std::f64::consts::FRAC_PI_2, 1.0, 0.0, 0.0);
        let b = transform(0.0, 0.0, 0.0, 0.0, 2.0, 0.0);
        let ab = a.compose(&b).translation();
        let ba = b.compose(&a).translation();
        assert!((ab.x - (-1.0)).abs() < TOL && (ab.y - 0.0).abs() < TOL);
        assert!((ba.x - 1.0).abs() < TOL && (ba.y - 2.0).abs() < TOL);
    }

    #[test]
    fn mul_operator_matches_compose() {
        let a = transform(0.2, 0.0, 0.1, 1.0, 2.0, 3.0);
        let b = transform(-0.3, 0.4, 0.0, -1.0, 0.5, 0.0);
        assert_eq!(a * b, a.compose(&b));
    }

    #[test]
    fn composition_keeps_bottom_row() {
        let h = transform(1.0, 2.0, 0.5, 7.0, 8.0, 9.0) * flip() * transform(-0.2, 0.0, 0.3, 0.0, 1.0, 0.0);
        assert_eq!(h.matrix()[3], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(h.invert().matrix()[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn transform_point_matches_composition() {
        let h = transform(0.0, 0.0, std::f64::consts::FRAC_PI_2, 1.0, 0.0, 0.0);
        let p = h.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!((p.x - 1.0).abs() < TOL, "x={}", p.x);
        assert!((p.y - 1.0).abs() < TOL, "y={}", p.y);
    }

    #[test]
    fn invert_with_non_orthonormal_block_is_deterministic() {
        let skewed = RotationMatrix::from_rows([[2.0, 0.0, 0.0], [0.0, 1.0, 0.5], [0.0, 0.0, 1.0]]);
        let h = HomogeneousTransform::build(skewed, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(h.invert(), h.invert());
        // Not an inverse: the analytic formula only holds for rotations.
        let product = h.compose(&h.invert());
        assert!((product.matrix()[0][0] - 1.0).abs() > 1e-3);
    }
}
