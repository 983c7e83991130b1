//! Render capability consumed by the weather systems.
//!
//! The scene owns drawables (point clouds, polylines, model instances), lights,
//! and global parameters (background colour, distance fog, clear colour).
//! Removing a drawable releases its geometry, its material and its scene
//! membership in one call.

use engine_core::{Rgb, Transform};
use glam::Vec3;

macro_rules! scene_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);
    };
}

scene_handle!(
    /// Point-cloud drawable.
    PointsHandle
);
scene_handle!(
    /// Line-strip drawable.
    LineHandle
);
scene_handle!(
    /// Light of any kind.
    LightHandle
);
scene_handle!(
    /// Instance of a loaded model.
    MeshHandle
);
scene_handle!(
    /// Loaded model that instances can be cloned from.
    ModelId
);
scene_handle!(
    /// Pending asynchronous model load.
    LoadTicket
);

/// Appearance of a point cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointsMaterial {
    pub color: Rgb,
    pub size: f32,
    pub opacity: f32,
    /// Additive blending without depth writes (fog banks).
    pub additive: bool,
}

impl PointsMaterial {
    pub fn new(color: Rgb, size: f32, opacity: f32) -> Self {
        Self {
            color,
            size,
            opacity,
            additive: false,
        }
    }

    pub fn additive(mut self) -> Self {
        self.additive = true;
        self
    }
}

/// Appearance of a polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMaterial {
    pub color: Rgb,
    pub opacity: f32,
    pub width: f32,
}

/// Lights the scene can host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: Rgb,
        intensity: f32,
    },
    Directional {
        color: Rgb,
        intensity: f32,
        position: Vec3,
    },
    Point {
        color: Rgb,
        intensity: f32,
        distance: f32,
        position: Vec3,
    },
    Hemisphere {
        sky: Rgb,
        ground: Rgb,
        intensity: f32,
    },
}

impl Light {
    pub fn intensity(&self) -> f32 {
        match *self {
            Light::Ambient { intensity, .. }
            | Light::Directional { intensity, .. }
            | Light::Point { intensity, .. }
            | Light::Hemisphere { intensity, .. } => intensity,
        }
    }
}

/// Linear distance fog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Rgb,
    pub near: f32,
    pub far: f32,
}

impl Fog {
    pub fn new(color: Rgb, near: f32, far: f32) -> Self {
        Self { color, near, far }
    }
}

/// Axis-aligned bounds of a loaded model in its own space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// A model load that finished (successfully or not).
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub ticket: LoadTicket,
    pub result: Result<ModelInfo, RenderError>,
}

/// A model ready to be instanced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelInfo {
    pub id: ModelId,
    pub bounds: Bounds,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("model {0:?} could not be loaded")]
    ModelNotFound(String),
    #[error("unknown model {0:?}")]
    UnknownModel(ModelId),
}

/// Scene graph and draw loop provided by the render engine.
pub trait SceneBackend {
    fn add_points(&mut self, positions: &[Vec3], material: PointsMaterial) -> PointsHandle;
    /// Re-upload the position buffer after in-place mutation.
    fn update_points(&mut self, handle: PointsHandle, positions: &[Vec3]);
    fn remove_points(&mut self, handle: PointsHandle);

    fn add_line(&mut self, points: &[Vec3], material: LineMaterial) -> LineHandle;
    fn set_line_opacity(&mut self, handle: LineHandle, opacity: f32);
    fn remove_line(&mut self, handle: LineHandle);

    fn add_light(&mut self, light: Light) -> LightHandle;
    fn set_light_intensity(&mut self, handle: LightHandle, intensity: f32);
    fn set_light_color(&mut self, handle: LightHandle, color: Rgb);
    fn set_light_position(&mut self, handle: LightHandle, position: Vec3);
    fn remove_light(&mut self, handle: LightHandle);

    /// Start loading a model; completion is reported by `poll_loaded` on a later frame.
    fn request_model(&mut self, path: &str) -> LoadTicket;
    fn poll_loaded(&mut self) -> Vec<LoadedModel>;
    /// Clone a loaded model into the scene, with its material colour multiplied by `tint`.
    fn add_instance(
        &mut self,
        model: ModelId,
        transform: &Transform,
        tint: f32,
    ) -> Result<MeshHandle, RenderError>;
    fn set_instance_transform(&mut self, handle: MeshHandle, transform: &Transform);
    fn remove_instance(&mut self, handle: MeshHandle);

    fn set_background(&mut self, color: Rgb);
    fn set_fog(&mut self, fog: Fog);
    fn set_clear_color(&mut self, color: Rgb);

    fn render(&mut self) -> Result<(), RenderError>;
}
