//! Bounding volumes used for narrow-phase collision tests
//!
//! Every scene object is approximated by an upright cylinder whose base sits
//! at the object's world-space center and which extends `height` units up.
//! The test ignores rotation on purpose: the scenery is static and the agent
//! is a fast-moving camera, so the coarse shape is enough.
//!
//! An axis-aligned box test is kept alongside it, both as a standalone
//! mesh-vs-mesh check and as the cheap pre-filter of the cylinder test.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Vec3};

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every vertex, or `None` for an empty list
    pub fn from_vertices(vertices: &[Vec3]) -> Option<Self> {
        let (first, rest) = vertices.split_first()?;
        let mut aabb = Self::new(*first, *first);
        for v in rest {
            aabb.min = aabb.min.inf(v);
            aabb.max = aabb.max.sup(v);
        }
        Some(aabb)
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the full size of the AABB along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Same box moved by `offset`
    pub fn translated(&self, offset: Vec3) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }

    /// Check if this AABB intersects another AABB
    ///
    /// Touching faces count as intersecting.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }
}

/// World-space upright collision cylinder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingCylinder {
    /// Center of the cylinder's base in world space
    pub center: Vec3,
    /// Vertical extent above `center.y`
    pub height: f32,
    /// Horizontal radius
    pub radius: f32,
}

impl BoundingCylinder {
    /// Creates a new cylinder
    pub fn new(center: Vec3, height: f32, radius: f32) -> Self {
        Self { center, height, radius }
    }

    /// False for NaN/infinite fields and for zero or negative extents
    pub fn is_valid(&self) -> bool {
        utils::is_finite(&self.center)
            && self.height.is_finite()
            && self.radius.is_finite()
            && self.height > 0.0
            && self.radius > 0.0
    }

    /// Box enclosing the cylinder
    pub fn aabb(&self) -> Aabb {
        let r = Vec3::new(self.radius, 0.0, self.radius);
        Aabb::new(
            self.center - r,
            self.center + r + Vec3::new(0.0, self.height, 0.0),
        )
    }

    /// Check if this cylinder intersects another
    ///
    /// The vertical spans `[y, y + height]` must overlap and the XZ distance
    /// between centers must not exceed the sum of radii. Degenerate cylinders
    /// never intersect anything.
    pub fn intersects(&self, other: &BoundingCylinder) -> bool {
        if !self.is_valid() || !other.is_valid() {
            return false;
        }

        // The enclosing boxes always overlap when the cylinders do.
        if !self.aabb().intersects(&other.aabb()) {
            return false;
        }

        if self.center.y + self.height < other.center.y
            || other.center.y + other.height < self.center.y
        {
            return false;
        }

        let radius_sum = self.radius + other.radius;
        utils::planar_distance_sq(&self.center, &other.center) <= radius_sum * radius_sum
    }
}

/// Height and radius measured from mesh geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticExtent {
    /// Vertical size of the geometry
    pub height: f32,
    /// Largest horizontal distance of any vertex from the local origin
    pub radius: f32,
}

impl StaticExtent {
    /// Extent with explicit values
    pub fn new(height: f32, radius: f32) -> Self {
        Self { height, radius }
    }

    /// Measure the extent of local-space vertices
    ///
    /// An empty vertex list yields a zero extent, which never collides.
    pub fn from_vertices(vertices: &[Vec3]) -> Self {
        let Some(aabb) = Aabb::from_vertices(vertices) else {
            log::warn!("Measuring collision extent of empty geometry");
            return Self::new(0.0, 0.0);
        };

        let radius_sq = vertices
            .iter()
            .map(|v| v.x * v.x + v.z * v.z)
            .fold(0.0_f32, f32::max);

        Self::new(aabb.size().y, radius_sq.sqrt())
    }
}

/// Where an object's collision cylinder gets its height from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BoundingVolumeSource {
    /// Fixed extent measured once from geometry
    StaticExtent(StaticExtent),
    /// Camera proxy: height equals the camera's own world Y
    DynamicCameraHeight {
        /// Horizontal radius of the camera cylinder
        radius: f32,
    },
}

impl BoundingVolumeSource {
    /// Fixed extent from explicit height and radius
    pub fn fixed(height: f32, radius: f32) -> Self {
        Self::StaticExtent(StaticExtent::new(height, radius))
    }

    /// Fixed extent measured from local-space vertices
    pub fn from_vertices(vertices: &[Vec3]) -> Self {
        Self::StaticExtent(StaticExtent::from_vertices(vertices))
    }

    /// World-space cylinder for an object whose base center is `center`
    pub fn cylinder_at(&self, center: Vec3) -> BoundingCylinder {
        match *self {
            Self::StaticExtent(extent) => BoundingCylinder::new(center, extent.height, extent.radius),
            Self::DynamicCameraHeight { radius } => BoundingCylinder::new(center, center.y, radius),
        }
    }
}
