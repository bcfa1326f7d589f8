//! Scene storage
//!
//! Objects are owned by a slot map for stable handles and listed in
//! insertion order, which is the order the spatial grid buckets them in.
//! The hierarchy is translation-only: an object's global position is the
//! sum of its own and all ancestors' local positions.

use slotmap::SlotMap;
use thiserror::Error;

use super::object::{ObjectId, PlacedObject, SceneObject};
use crate::foundation::math::Vec3;
use crate::physics::collision::BoundingCylinder;

/// Scene lookup errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The handle does not refer to a live object
    #[error("Unknown scene object {0:?}")]
    UnknownObject(ObjectId),

    /// A child was attached to a handle that does not exist
    #[error("Unknown parent object {0:?}")]
    UnknownParent(ObjectId),
}

/// Owner of every placed object in a level
#[derive(Debug, Default)]
pub struct Scene {
    objects: SlotMap<ObjectId, SceneObject>,
    order: Vec<ObjectId>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root object
    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        let parent = object.parent;
        let id = self.objects.insert(SceneObject { parent: None, ..object });
        self.order.push(id);
        if let Some(parent) = parent {
            log::warn!("Ignoring parent {:?} of root object {:?}; use add_child", parent, id);
        }
        id
    }

    /// Attach a new object under `parent`
    pub fn add_child(&mut self, parent: ObjectId, object: SceneObject) -> Result<ObjectId, SceneError> {
        if !self.objects.contains_key(parent) {
            return Err(SceneError::UnknownParent(parent));
        }
        let id = self.objects.insert(SceneObject {
            parent: Some(parent),
            ..object
        });
        self.order.push(id);
        Ok(id)
    }

    /// Remove an object together with everything attached below it
    pub fn remove(&mut self, id: ObjectId) -> Result<SceneObject, SceneError> {
        let object = self.objects.remove(id).ok_or(SceneError::UnknownObject(id))?;

        let mut removed = vec![id];
        loop {
            let orphans: Vec<ObjectId> = self
                .objects
                .iter()
                .filter(|(_, o)| o.parent.is_some_and(|p| removed.contains(&p)))
                .map(|(child, _)| child)
                .collect();
            if orphans.is_empty() {
                break;
            }
            for child in &orphans {
                self.objects.remove(*child);
            }
            removed.extend(orphans);
        }

        self.order.retain(|o| !removed.contains(o));
        Ok(object)
    }

    /// Look up an object
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    /// Whether `id` refers to a live object
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the scene has no objects
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// World-space position of an object
    pub fn global_position(&self, id: ObjectId) -> Result<Vec3, SceneError> {
        let mut object = self.objects.get(id).ok_or(SceneError::UnknownObject(id))?;
        let mut position = object.local_position;
        while let Some(parent) = object.parent {
            object = self.objects.get(parent).ok_or(SceneError::UnknownParent(parent))?;
            position += object.local_position;
        }
        Ok(position)
    }

    /// Collision view of an object at its current world position
    pub fn placed(&self, id: ObjectId) -> Result<PlacedObject, SceneError> {
        let bounds = self.objects.get(id).ok_or(SceneError::UnknownObject(id))?.bounds;
        Ok(PlacedObject {
            id,
            position: self.global_position(id)?,
            bounds,
        })
    }

    /// World-space collision cylinder of an object
    pub fn bounding_cylinder(&self, id: ObjectId) -> Result<BoundingCylinder, SceneError> {
        let placed = self.placed(id)?;
        Ok(placed.bounds.cylinder_at(placed.position))
    }

    /// Move an object (and its attachments) by `delta`
    pub fn translate(&mut self, id: ObjectId, delta: Vec3) -> Result<(), SceneError> {
        let object = self.objects.get_mut(id).ok_or(SceneError::UnknownObject(id))?;
        object.local_position += delta;
        Ok(())
    }

    /// Set an object's position relative to its parent
    pub fn set_position(&mut self, id: ObjectId, position: Vec3) -> Result<(), SceneError> {
        let object = self.objects.get_mut(id).ok_or(SceneError::UnknownObject(id))?;
        object.local_position = position;
        Ok(())
    }

    /// Objects in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> + '_ {
        self.order.iter().filter_map(|&id| self.objects.get(id).map(|o| (id, o)))
    }

    /// Global positions in insertion order
    pub fn positions(&self) -> impl Iterator<Item = (ObjectId, Vec3)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.global_position(id).ok().map(|p| (id, p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::BoundingVolumeSource;
    use approx::assert_relative_eq;

    fn block(name: &str, position: Vec3) -> SceneObject {
        SceneObject::new(name, position, BoundingVolumeSource::fixed(2.0, 1.0))
    }

    #[test]
    fn test_global_position_sums_ancestors() {
        let mut scene = Scene::new();
        let rig = scene.add(block("rig", Vec3::new(1.0, 0.0, 2.0)));
        let arm = scene.add_child(rig, block("arm", Vec3::new(0.0, 1.0, 0.0))).unwrap();
        let ball = scene.add_child(arm, block("ball", Vec3::new(0.5, 0.0, 0.0))).unwrap();

        assert_relative_eq!(scene.global_position(ball).unwrap(), Vec3::new(1.5, 1.0, 2.0));

        scene.translate(rig, Vec3::new(0.0, 0.0, -2.0)).unwrap();
        assert_relative_eq!(scene.global_position(ball).unwrap(), Vec3::new(1.5, 1.0, 0.0));

        let cyl = scene.bounding_cylinder(ball).unwrap();
        assert_relative_eq!(cyl.center, Vec3::new(1.5, 1.0, 0.0));
        assert_relative_eq!(cyl.height, 2.0);
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let mut scene = Scene::new();
        let a = scene.add(block("a", Vec3::zeros()));
        let b = scene.add(block("b", Vec3::zeros()));
        let c = scene.add_child(a, block("c", Vec3::zeros())).unwrap();

        let order: Vec<ObjectId> = scene.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![a, b, c]);
    }

    #[test]
    fn test_remove_takes_descendants() {
        let mut scene = Scene::new();
        let a = scene.add(block("a", Vec3::zeros()));
        let b = scene.add(block("b", Vec3::zeros()));
        let c = scene.add_child(a, block("c", Vec3::zeros())).unwrap();
        let d = scene.add_child(c, block("d", Vec3::zeros())).unwrap();

        let removed = scene.remove(a).unwrap();
        assert_eq!(removed.name, "a");
        assert_eq!(scene.len(), 1);
        assert!(scene.contains(b));
        assert!(!scene.contains(d));
        assert_eq!(scene.remove(a), Err(SceneError::UnknownObject(a)));
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut scene = Scene::new();
        let a = scene.add(block("a", Vec3::zeros()));
        scene.remove(a).unwrap();
        let err = scene.add_child(a, block("b", Vec3::zeros())).unwrap_err();
        assert_eq!(err, SceneError::UnknownParent(a));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_set_position() {
        let mut scene = Scene::new();
        let a = scene.add(block("a", Vec3::zeros()));
        scene.set_position(a, Vec3::new(3.0, 4.0, 5.0)).unwrap();
        let placed = scene.placed(a).unwrap();
        assert_eq!(placed.id, a);
        assert_relative_eq!(placed.position, Vec3::new(3.0, 4.0, 5.0));
    }
}
