//! `graspframe-geometry` – rigid-body transform core.
//!
//! Chains the coordinate frames of a pick-and-place rig (robot base → object
//! platform → gripper) so that a trajectory point recorded relative to the
//! object can be replayed as an absolute tool pose in the robot's base frame.
//!
//! # Modules
//!
//! - [`rotation`] – [`RotationMatrix`][rotation::RotationMatrix],
//!   [`Quaternion`][rotation::Quaternion] and the
//!   [`RotationMath`][rotation::RotationMath] seam for axis-angle conversion
//!   (default backend: [`Rodrigues`][rotation::Rodrigues]).
//! - [`homogeneous`] – [`HomogeneousTransform`][homogeneous::HomogeneousTransform]:
//!   4×4 `[R t; 0 1]` transforms with analytic inversion and composition.
//! - [`frame_chain`] – the rig-specific base→object and object→gripper
//!   transforms and [`resolve_base_frame_pose`][frame_chain::resolve_base_frame_pose].
//! - [`frame_graph`] – [`FrameGraph`][frame_graph::FrameGraph]: named frames
//!   connected by transforms, resolved by BFS in either direction.
//!
//! Everything except [`FrameGraph`][frame_graph::FrameGraph] is a pure
//! function over `Copy` values.

pub mod frame_chain;
pub mod frame_graph;
pub mod homogeneous;
pub mod rotation;

pub use frame_chain::{
    FRAME_FLIP, FrameChain, base_to_object_transform, object_to_gripper_transform,
    resolve_base_frame_pose, transform_to_pose,
};
pub use frame_graph::FrameGraph;
pub use homogeneous::HomogeneousTransform;
pub use rotation::{Quaternion, Rodrigues, RotationMath, RotationMatrix, quaternion_to_rotation_matrix};

#[cfg(feature = "nalgebra-support")]
pub use rotation::NalgebraRotationMath;

pub use graspframe_types::{AxisAngle, Pose, Vec3};
