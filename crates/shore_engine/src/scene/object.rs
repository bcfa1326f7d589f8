//! Scene objects and the collision view over them

use crate::foundation::math::Vec3;
use crate::physics::collision::{BoundingCylinder, BoundingVolumeSource};

slotmap::new_key_type! {
    /// Stable handle to an object in a [`Scene`](super::Scene)
    pub struct ObjectId;
}

/// A placed object: name, translation relative to its parent, collision extent
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Human-readable name, used in logs
    pub name: String,
    /// Translation relative to the parent, or to the world for root objects
    pub local_position: Vec3,
    /// Parent object, if attached
    pub parent: Option<ObjectId>,
    /// Where the collision cylinder's extent comes from
    pub bounds: BoundingVolumeSource,
}

impl SceneObject {
    /// Create a root object at `position`
    pub fn new(name: impl Into<String>, position: Vec3, bounds: BoundingVolumeSource) -> Self {
        Self {
            name: name.into(),
            local_position: position,
            parent: None,
            bounds,
        }
    }
}

/// Anything the collision resolver can test against
pub trait Collidable {
    /// World-space position
    fn global_position(&self) -> Vec3;

    /// World-space collision cylinder
    fn bounding_cylinder(&self) -> BoundingCylinder;

    /// Scene handle, for agents that are themselves scene objects
    fn object_id(&self) -> Option<ObjectId> {
        None
    }

    /// Test this object's cylinder against another's
    fn intersects(&self, other: &dyn Collidable) -> bool {
        self.bounding_cylinder().intersects(&other.bounding_cylinder())
    }
}

/// Resolved view of a scene object at a known world position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedObject {
    /// Handle of the underlying object
    pub id: ObjectId,
    /// World-space position
    pub position: Vec3,
    /// Collision extent
    pub bounds: BoundingVolumeSource,
}

impl Collidable for PlacedObject {
    fn global_position(&self) -> Vec3 {
        self.position
    }

    fn bounding_cylinder(&self) -> BoundingCylinder {
        self.bounds.cylinder_at(self.position)
    }

    fn object_id(&self) -> Option<ObjectId> {
        Some(self.id)
    }
}

/// The moving agent: a camera that is not part of the scene
///
/// Its cylinder height is its own world Y, so it reaches down to the ground
/// plane wherever it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraProxy {
    /// Camera eye position in world space
    pub position: Vec3,
    /// Horizontal radius of the camera's cylinder
    pub radius: f32,
}

impl CameraProxy {
    /// Create a camera proxy
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self { position, radius }
    }
}

impl Collidable for CameraProxy {
    fn global_position(&self) -> Vec3 {
        self.position
    }

    fn bounding_cylinder(&self) -> BoundingCylinder {
        BoundingVolumeSource::DynamicCameraHeight { radius: self.radius }.cylinder_at(self.position)
    }
}
