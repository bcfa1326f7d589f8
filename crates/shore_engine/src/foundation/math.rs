//! Math utilities and types
//!
//! Provides the vector and rotation aliases shared by the scene model,
//! the spatial grid and the collision resolver.

pub use nalgebra::{Unit, UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// World axis selected by a dominant-component comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// World X axis
    X,
    /// World Y axis (up)
    Y,
    /// World Z axis
    Z,
}

impl Axis {
    /// Unit vector along this axis
    pub fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::x(),
            Self::Y => Vec3::y(),
            Self::Z => Vec3::z(),
        }
    }

    /// Component of `v` along this axis
    pub fn component(self, v: &Vec3) -> f32 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
            Self::Z => v.z,
        }
    }
}

/// Math utility functions
pub mod utils {
    use super::{Quat, Vec3};

    /// True when every component of `v` is finite
    pub fn is_finite(v: &Vec3) -> bool {
        v.iter().all(|c| c.is_finite())
    }

    /// Squared distance between two points projected on the XZ plane
    pub fn planar_distance_sq(a: &Vec3, b: &Vec3) -> f32 {
        let dx = a.x - b.x;
        let dz = a.z - b.z;
        dx * dx + dz * dz
    }

    /// Rotation about the world up axis
    pub fn yaw_rotation(yaw: f32) -> Quat {
        Quat::from_axis_angle(&Vec3::y_axis(), yaw)
    }

    /// Normalize `v`, returning `None` for zero-length or non-finite input
    pub fn try_normalize(v: &Vec3) -> Option<Vec3> {
        if !is_finite(v) {
            return None;
        }
        v.try_normalize(f32::EPSILON)
    }
}

/// Serde adapter writing a [`Vec3`] as a plain `[x, y, z]` triple
///
/// RON reads this as `(x, y, z)` and TOML as `[x, y, z]`.
pub mod serde_vec3 {
    use super::Vec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize as `[x, y, z]`
    pub fn serialize<S: Serializer>(v: &Vec3, serializer: S) -> Result<S::Ok, S::Error> {
        [v.x, v.y, v.z].serialize(serializer)
    }

    /// Deserialize from `[x, y, z]`
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec3, D::Error> {
        <[f32; 3]>::deserialize(deserializer).map(Vec3::from)
    }

    /// Same representation for a list of vectors
    pub mod list {
        use super::Vec3;
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        /// Serialize as a sequence of triples
        pub fn serialize<S: Serializer>(vs: &[Vec3], serializer: S) -> Result<S::Ok, S::Error> {
            vs.iter()
                .map(|v| [v.x, v.y, v.z])
                .collect::<Vec<_>>()
                .serialize(serializer)
        }

        /// Deserialize from a sequence of triples
        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec3>, D::Error> {
            Vec::<[f32; 3]>::deserialize(deserializer).map(|vs| vs.into_iter().map(Vec3::from).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_planar_distance_ignores_height() {
        let a = Vec3::new(0.0, 10.0, 0.0);
        let b = Vec3::new(3.0, -4.0, 4.0);
        assert_relative_eq!(utils::planar_distance_sq(&a, &b), 25.0);
    }

    #[test]
    fn test_try_normalize_rejects_degenerate() {
        assert!(utils::try_normalize(&Vec3::zeros()).is_none());
        assert!(utils::try_normalize(&Vec3::new(f32::NAN, 0.0, 1.0)).is_none());
        let n = utils::try_normalize(&Vec3::new(0.0, -5.0, 0.0)).unwrap();
        assert_relative_eq!(n, Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_yaw_rotation_turns_forward_vector() {
        let forward = Vec3::new(0.0, 0.0, -1.0);
        let turned = utils::yaw_rotation(std::f32::consts::FRAC_PI_2) * forward;
        assert_relative_eq!(turned, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_axis_component() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_relative_eq!(Axis::Y.component(&v), 2.0);
        assert_eq!(Axis::Z.unit(), Vec3::z());
    }

    #[test]
    fn test_serde_vec3_reads_ron_tuples() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Marker {
            #[serde(with = "serde_vec3")]
            at: Vec3,
        }

        let marker: Marker = ron::from_str("(at: (1.0, 2.5, -3.0))").unwrap();
        assert_relative_eq!(marker.at, Vec3::new(1.0, 2.5, -3.0));
        let text = ron::to_string(&marker).unwrap();
        let again: Marker = ron::from_str(&text).unwrap();
        assert_relative_eq!(again.at, marker.at);
    }
}
