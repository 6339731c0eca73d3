//! Base → object → gripper frame chain of the pick-and-place rig.
//!
//! A trajectory is recorded with the gripper pose expressed in the object's
//! own frame.  To replay it, the robot needs the same pose in its base frame:
//!
//! ```text
//! T_base_gripper = T_base_object · T_object_gripper
//! T_base_object  = T_base_tcp · FLIP
//! ```
//!
//! `T_base_tcp` comes from the controller's tool pose read while the
//! tool-centre point (TCP) sits at the object origin.  The TCP and the object
//! share that origin but their Z axes point in opposite directions; the
//! object's Y axis is fixed by the alignment used when the trajectory was
//! converted into the object frame.  [`FRAME_FLIP`] encodes that relation.
//!
//! # Example
//!
//! ```rust
//! use graspframe_geometry::frame_chain::FrameChain;
//! use graspframe_types::Pose;
//!
//! let tcp = Pose::from_array([609.90, 4.51, 103.94, 2.1361, 2.3107, 0.0546]);
//! let chain = FrameChain::new(&tcp);
//!
//! let local = Pose::from_array([0.909219, -53.432566, 194.968568, -1.838161, 2.400074, 0.157878]);
//! let target = chain.resolve(&local);
//! assert!((target.position.x - 552.934).abs() < 1e-3);
//! ```

use graspframe_types::{Pose, Vec3};

use crate::homogeneous::HomogeneousTransform;
use crate::rotation::{Rodrigues, RotationMath, RotationMatrix};

/// Rotation from the TCP frame to the object frame: a half turn about Y,
/// i.e. X and Z reversed, Y kept.
///
/// Specific to the one jig this chain was calibrated on.
pub const FRAME_FLIP: RotationMatrix =
    RotationMatrix::from_rows([[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]]);

/// Build the transform of a pose: its orientation and position as `[R t; 0 1]`.
fn pose_transform<M: RotationMath + ?Sized>(math: &M, pose: &Pose) -> HomogeneousTransform {
    let r = math.axis_angle_to_rotation_matrix(pose.orientation);
    HomogeneousTransform::build(r, pose.position)
}

/// Transform from the robot base frame to the object frame, given the tool
/// pose measured with the TCP at the object origin.
///
/// Computed as `T_base_tcp · T_flip`; the order matters.
pub fn base_to_object_transform<M: RotationMath + ?Sized>(
    math: &M,
    tcp_pose: &Pose,
) -> HomogeneousTransform {
    let h_flip = HomogeneousTransform::build(FRAME_FLIP, Vec3::zero());
    let h_tool = pose_transform(math, tcp_pose);
    h_tool.compose(&h_flip)
}

/// Transform from the object frame to the gripper for a pose recorded in the
/// object frame.  Use [`Pose::from_array`] for the flat `[x, y, z, Rx, Ry, Rz]`
/// layout.
pub fn object_to_gripper_transform<M: RotationMath + ?Sized>(
    math: &M,
    local_pose: &Pose,
) -> HomogeneousTransform {
    pose_transform(math, local_pose)
}

/// Read a transform back as a controller pose: translation column plus the
/// axis-angle of the rotation block.
pub fn transform_to_pose<M: RotationMath + ?Sized>(math: &M, h: &HomogeneousTransform) -> Pose {
    Pose::new(
        h.translation(),
        math.rotation_matrix_to_axis_angle(&h.rotation()),
    )
}

/// Gripper pose in the robot base frame: `base_to_object · object_to_gripper`.
pub fn resolve_base_frame_pose<M: RotationMath + ?Sized>(
    math: &M,
    base_to_object: &HomogeneousTransform,
    object_to_gripper: &HomogeneousTransform,
) -> Pose {
    transform_to_pose(math, &base_to_object.compose(object_to_gripper))
}

/// A frame chain bound to one rig set-up.
///
/// Holds the rotation backend and the base→object transform, built once from
/// the TCP reference pose, so every recorded point can be resolved with a
/// single call.
#[derive(Debug, Clone)]
pub struct FrameChain<M: RotationMath = Rodrigues> {
    math: M,
    base_to_object: HomogeneousTransform,
}

impl FrameChain<Rodrigues> {
    /// Chain using the built-in [`Rodrigues`] conversions.
    pub fn new(tcp_reference: &Pose) -> Self {
        Self::with_math(Rodrigues, tcp_reference)
    }
}

impl<M: RotationMath> FrameChain<M> {
    pub fn with_math(math: M, tcp_reference: &Pose) -> Self {
        let base_to_object = base_to_object_transform(&math, tcp_reference);
        Self {
            math,
            base_to_object,
        }
    }

    pub fn base_to_object(&self) -> &HomogeneousTransform {
        &self.base_to_object
    }

    /// Base-frame pose for a gripper pose recorded in the object frame.
    pub fn resolve(&self, local_pose: &Pose) -> Pose {
        let object_to_gripper = object_to_gripper_transform(&self.math, local_pose);
        resolve_base_frame_pose(&self.math, &self.base_to_object, &object_to_gripper)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
