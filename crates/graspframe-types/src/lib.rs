use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A 3-D position or displacement expressed in some reference frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The zero vector.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }

    pub fn scale(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }

    pub fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Euclidean length.
    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Rotation vector: the direction is the rotation axis and the magnitude is
/// the rotation angle in radians (right-hand rule).
///
/// This is the `Rx, Ry, Rz` triple robot controllers report for the tool
/// orientation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisAngle {
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
}

impl AxisAngle {
    pub const fn new(rx: f64, ry: f64, rz: f64) -> Self {
        Self { rx, ry, rz }
    }

    /// The null rotation.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Rotation angle in radians (the vector's magnitude).
    pub fn angle(self) -> f64 {
        self.as_vec3().norm()
    }

    pub fn as_vec3(self) -> Vec3 {
        Vec3::new(self.rx, self.ry, self.rz)
    }
}

impl From<Vec3> for AxisAngle {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Tool pose as exchanged with a robot controller: position plus axis-angle
/// orientation, `(x, y, z, Rx, Ry, Rz)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: AxisAngle,
}

impl Pose {
    pub const fn new(position: Vec3, orientation: AxisAngle) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Build from the flat `[x, y, z, Rx, Ry, Rz]` layout.
    pub const fn from_array(a: [f64; 6]) -> Self {
        Self::new(
            Vec3::new(a[0], a[1], a[2]),
            AxisAngle::new(a[3], a[4], a[5]),
        )
    }

    pub fn to_array(self) -> [f64; 6] {
        [
            self.position.x,
            self.position.y,
            self.position.z,
            self.orientation.rx,
            self.orientation.ry,
            self.orientation.rz,
        ]
    }
}

/// Formats as `x=…, y=…, z=…, Rx=…, Ry=…, Rz=…`.  The formatter precision
/// (`{:.4}`) selects the number of decimals; the default is 3.
impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = f.precision().unwrap_or(3);
        let [x, y, z, rx, ry, rz] = self.to_array();
        write!(
            f,
            "x={x:.p$}, y={y:.p$}, z={z:.p$}, Rx={rx:.p$}, Ry={ry:.p$}, Rz={rz:.p$}"
        )
    }
}

/// Parses six comma-separated numbers `x,y,z,Rx,Ry,Rz`.
impl FromStr for Pose {
    type Err = GraspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = parse_floats(s).map_err(GraspError::InvalidPose)?;
        let arr: [f64; 6] = values.try_into().map_err(|v: Vec<f64>| {
            GraspError::InvalidPose(format!("expected 6 values, got {}", v.len()))
        })?;
        Ok(Self::from_array(arr))
    }
}

/// One sample of a recorded manipulation trajectory.
///
/// The pose is expressed in the object's local frame.  Finger actuator
/// positions are carried through untouched; interpreting them is the gripper
/// driver's job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    /// Seconds since the start of the recording.
    pub time_s: f64,
    pub pose: Pose,
    pub fingers: [f64; 4],
}

impl TrajectoryRecord {
    /// Number of comma-separated fields in one record line.
    pub const FIELDS: usize = 11;
}

/// Parses `t,x,y,z,Rx,Ry,Rz,f1,f2,f3,f4`.
impl FromStr for TrajectoryRecord {
    type Err = GraspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = |reason: String| GraspError::Parse { line: 0, reason };
        let v = parse_floats(s).map_err(parse_err)?;
        if v.len() != Self::FIELDS {
            return Err(parse_err(format!(
                "expected {} fields, got {}",
                Self::FIELDS,
                v.len()
            )));
        }
        Ok(Self {
            time_s: v[0],
            pose: Pose::from_array([v[1], v[2], v[3], v[4], v[5], v[6]]),
            fingers: [v[7], v[8], v[9], v[10]],
        })
    }
}

fn parse_floats(s: &str) -> Result<Vec<f64>, String> {
    s.split(',')
        .map(|field| {
            let field = field.trim();
            field
                .parse::<f64>()
                .map_err(|e| format!("invalid number '{field}': {e}"))
        })
        .collect()
}

/// Error type for everything outside the transform math: input parsing,
/// configuration and file access.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraspError {
    #[error("Parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Invalid pose: {0}")]
    InvalidPose(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl GraspError {
    /// Attach a 1-based line number to a [`GraspError::Parse`].
    pub fn at_line(self, line: usize) -> Self {
        match self {
            GraspError::Parse { reason, .. } => GraspError::Parse { line, reason },
            other => other,
        }
    }
}

impl From<std::io::Error> for GraspError {
    fn from(e: std::io::Error) -> Self {
        GraspError::Io(e.to_string())
    }
}
