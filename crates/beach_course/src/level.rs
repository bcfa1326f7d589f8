//! Level descriptions
//!
//! A level is a RON file listing placed objects, where the player spawns and
//! a scripted input sequence for headless runs. Building a level turns the
//! description into a scene plus the two collision filters: objects marked
//! non-collidable go into the ignore set, attachments into the resolver's
//! exclusions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shore_engine::foundation::math::serde_vec3;
use shore_engine::prelude::*;
use shore_engine::scene::SceneError;
use thiserror::Error;

use crate::script::ScriptStep;

/// Level loading errors
#[derive(Error, Debug)]
pub enum LevelError {
    /// The level file could not be read
    #[error("Failed to read level {path}: {source}")]
    Io {
        /// Path that failed
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// The level file is not valid RON for a level
    #[error("Failed to parse level: {0}")]
    Parse(String),

    /// Two objects share a name, so parents would be ambiguous
    #[error("Duplicate object name '{0}'")]
    DuplicateName(String),

    /// An object names a parent that is not listed before it
    #[error("Object '{object}' refers to unknown parent '{parent}'")]
    UnknownParent {
        /// Child object
        object: String,
        /// Missing parent name
        parent: String,
    },

    /// Scene rejected an operation
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Collision shape of a placed object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Block or platform with a known extent
    Platform {
        /// Vertical extent above the object's position
        height: f32,
        /// Horizontal radius
        radius: f32,
    },
    /// Geometry measured from its vertices
    Mesh {
        /// Local-space vertex positions
        #[serde(with = "serde_vec3::list")]
        vertices: Vec<Vec3>,
    },
    /// Sky, sea, sand and other scenery that is never collided with
    Backdrop,
}

impl ObjectKind {
    fn bounds(&self) -> BoundingVolumeSource {
        match self {
            Self::Platform { height, radius } => BoundingVolumeSource::fixed(*height, *radius),
            Self::Mesh { vertices } => BoundingVolumeSource::from_vertices(vertices),
            Self::Backdrop => BoundingVolumeSource::fixed(0.0, 0.0),
        }
    }
}

fn default_true() -> bool {
    true
}

/// One placed object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedDescription {
    /// Unique name
    pub name: String,
    /// Position relative to the parent
    #[serde(with = "serde_vec3")]
    pub position: Vec3,
    /// Collision shape
    pub kind: ObjectKind,
    /// Name of an object listed earlier to attach to
    #[serde(default)]
    pub parent: Option<String>,
    /// Whether the object goes into the spatial grid
    #[serde(default = "default_true")]
    pub collidable: bool,
    /// Carried by the player; indexed but never blocks
    #[serde(default)]
    pub attachment: bool,
}

/// A whole level file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescription {
    /// Level name
    pub name: String,
    /// Where both rigs start
    #[serde(default, with = "serde_vec3")]
    pub spawn: Vec3,
    /// Placed objects; parents must come before their children
    pub objects: Vec<PlacedDescription>,
    /// Input sequence for headless runs
    #[serde(default)]
    pub script: Vec<ScriptStep>,
}

/// Scene and filters assembled from a description
#[derive(Debug)]
pub struct BuiltLevel {
    /// Objects of the level
    pub scene: Scene,
    /// Objects kept out of the grid
    pub ignore: IgnoreSet,
    /// Objects the player carries
    pub attachments: Vec<ObjectId>,
}

impl LevelDescription {
    /// Parse a level from RON text
    pub fn parse(contents: &str) -> Result<Self, LevelError> {
        ron::from_str(contents).map_err(|e| LevelError::Parse(e.to_string()))
    }

    /// Read and parse a level file
    pub fn load(path: &str) -> Result<Self, LevelError> {
        let contents = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Assemble the scene and collision filters
    pub fn build(&self) -> Result<BuiltLevel, LevelError> {
        let mut scene = Scene::new();
        let mut ignore = IgnoreSet::builder();
        let mut attachments = Vec::new();
        let mut names = HashMap::new();

        for placed in &self.objects {
            if names.contains_key(&placed.name) {
                return Err(LevelError::DuplicateName(placed.name.clone()));
            }

            let object = SceneObject::new(placed.name.clone(), placed.position, placed.kind.bounds());
            let id = match &placed.parent {
                None => scene.add(object),
                Some(parent) => {
                    let parent_id = names.get(parent).copied().ok_or_else(|| LevelError::UnknownParent {
                        object: placed.name.clone(),
                        parent: parent.clone(),
                    })?;
                    scene.add_child(parent_id, object)?
                }
            };

            if !placed.collidable || placed.kind == ObjectKind::Backdrop {
                ignore.insert(id);
            }
            if placed.attachment {
                attachments.push(id);
            }
            names.insert(placed.name.clone(), id);
        }

        let ignore = ignore.build();
        log::info!(
            "Built level '{}': {} objects, {} ignored, {} attachments",
            self.name,
            scene.len(),
            ignore.len(),
            attachments.len()
        );

        Ok(BuiltLevel {
            scene,
            ignore,
            attachments,
        })
    }
}
