//! Named frame graph.
//!
//! Keeps the rig's frames (`"base"`, `"object"`, `"gripper"`, …) and the
//! [`HomogeneousTransform`]s between them.  Each edge is stored once, as
//! registered; lookups may walk it in either direction, using the analytic
//! inverse for the reverse hop.
//!
//! # Example
//!
//! ```rust
//! use graspframe_geometry::frame_graph::FrameGraph;
//! use graspframe_geometry::homogeneous::HomogeneousTransform;
//! use graspframe_geometry::rotation::RotationMatrix;
//! use graspframe_types::Vec3;
//!
//! let mut graph = FrameGraph::new();
//! graph.set_transform("base", "object",
//!     HomogeneousTransform::build(RotationMatrix::identity(), Vec3::new(1.0, 0.0, 0.0)));
//! graph.set_transform("object", "gripper",
//!     HomogeneousTransform::build(RotationMatrix::identity(), Vec3::new(0.5, 0.0, 0.0)));
//!
//! let t = graph.lookup("base", "gripper").unwrap();
//! assert!((t.translation().x - 1.5).abs() < 1e-12);
//!
//! let back = graph.lookup("gripper", "base").unwrap();
//! assert!((back.translation().x + 1.5).abs() < 1e-12);
//! ```

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::trace;

use crate::homogeneous::HomogeneousTransform;

/// Directed graph of named frames.
///
/// `set_transform("a", "b", T)` records `T_a_b`, the pose of `b` in `a`.
/// [`FrameGraph::lookup`] finds the shortest chain of edges by BFS.
#[derive(Debug, Default, Clone)]
pub struct FrameGraph {
    /// `edges[parent][child] = T_parent_child`
    edges: HashMap<String, HashMap<String, HomogeneousTransform>>,
    /// `reverse[child]` lists the parents that point to `child`.
    reverse: HashMap<String, HashSet<String>>,
}

impl FrameGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the transform of `child_frame` in `parent_frame`.
    pub fn set_transform(
        &mut self,
        parent_frame: &str,
        child_frame: &str,
        transform: HomogeneousTransform,
    ) {
        self.edges
            .entry(parent_frame.to_string())
            .or_default()
            .insert(child_frame.to_string(), transform);
        self.reverse
            .entry(child_frame.to_string())
            .or_default()
            .insert(parent_frame.to_string());
    }

    /// True when `name` appears on either end of some edge.
    pub fn contains_frame(&self, name: &str) -> bool {
        self.edges.contains_key(name) || self.reverse.contains_key(name)
    }

    /// Transform of `target_frame` expressed in `source_frame`.
    ///
    /// Returns the identity when both names are equal and `None` when the two
    /// frames are not connected.
    pub fn lookup(&self, source_frame: &str, target_frame: &str) -> Option<HomogeneousTransform> {
        if source_frame == target_frame {
            return Some(HomogeneousTransform::identity());
        }

        let mut queue: VecDeque<(&str, HomogeneousTransform)> = VecDeque::new();
        let mut visited: HashSet<&str> = HashSet::new();

        queue.push_back((source_frame, HomogeneousTransform::identity()));
        visited.insert(source_frame);

        while let Some((current, accumulated)) = queue.pop_front() {
            for (next, hop) in self.neighbours(current) {
                if !visited.insert(next) {
                    continue;
                }
                let composed = accumulated.compose(&hop);
                if next == target_frame {
                    return Some(composed);
                }
                queue.push_back((next, composed));
            }
        }

        trace!(source = source_frame, target = target_frame, "no frame path");
        None
    }

    /// Frames one hop away from `frame`, with the transform of that frame
    /// expressed in `frame`.
    fn neighbours<'a>(
        &'a self,
        frame: &'a str,
    ) -> impl Iterator<Item = (&'a str, HomogeneousTransform)> + 'a {
        let forward = self
            .edges
            .get(frame)
            .into_iter()
            .flatten()
            .map(|(child, t)| (child.as_str(), *t));

        let backward = self
            .reverse
            .get(frame)
            .into_iter()
            .flatten()
            .filter_map(move |parent| {
                let t = self.edges.get(parent)?.get(frame)?;
                Some((parent.as_str(), t.invert()))
            });

        forward.chain(backward)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
