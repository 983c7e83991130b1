//! In-memory scene backend.
//!
//! Keeps every buffer the way a GPU backend would receive it (flat `f32`
//! arrays, column-major instance matrices) and counts live resources, so the
//! weather systems can run without a window and leaks show up as numbers.

use std::collections::HashMap;

use engine_core::{Rgb, Transform, TransformRaw};
use glam::Vec3;

use crate::scene::{
    Bounds, Fog, LightHandle, Light, LineHandle, LineMaterial, LoadTicket, LoadedModel, MeshHandle,
    ModelId, ModelInfo, PointsHandle, PointsMaterial, RenderError, SceneBackend,
};

/// A point cloud as uploaded: xyz triples.
#[derive(Debug, Clone)]
pub struct PointsBuffer {
    pub positions: Vec<f32>,
    pub material: PointsMaterial,
    pub uploads: u64,
}

impl PointsBuffer {
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, index: usize) -> Option<Vec3> {
        let xyz = self.positions.get(index * 3..index * 3 + 3)?;
        Some(Vec3::new(xyz[0], xyz[1], xyz[2]))
    }
}

#[derive(Debug, Clone)]
pub struct LineBuffer {
    pub vertices: Vec<f32>,
    pub material: LineMaterial,
}

#[derive(Debug, Clone, Copy)]
pub struct InstanceRecord {
    pub model: ModelId,
    pub transform: TransformRaw,
    pub tint: f32,
}

/// Live resource counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneStats {
    pub points: usize,
    pub lines: usize,
    pub lights: usize,
    pub instances: usize,
    pub pending_loads: usize,
    /// Distinct models resident in memory.
    pub models: usize,
}

struct PendingLoad {
    ticket: LoadTicket,
    path: String,
    frames_left: u32,
}

/// Scene backend with no GPU behind it.
pub struct HeadlessScene {
    next_id: u32,
    points: HashMap<PointsHandle, PointsBuffer>,
    lines: HashMap<LineHandle, LineBuffer>,
    lights: HashMap<LightHandle, Light>,
    instances: HashMap<MeshHandle, InstanceRecord>,
    catalog: HashMap<String, Bounds>,
    models: HashMap<ModelId, Bounds>,
    /// One resident model per asset path; repeat loads share it.
    loaded: HashMap<String, ModelId>,
    pending: Vec<PendingLoad>,
    load_delay_frames: u32,
    background: Rgb,
    fog: Option<Fog>,
    clear_color: Rgb,
    frames_rendered: u64,
    stale_removals: u64,
}

impl Default for HeadlessScene {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            points: HashMap::new(),
            lines: HashMap::new(),
            lights: HashMap::new(),
            instances: HashMap::new(),
            catalog: HashMap::new(),
            models: HashMap::new(),
            loaded: HashMap::new(),
            pending: Vec::new(),
            load_delay_frames: 1,
            background: Rgb::default(),
            fog: None,
            clear_color: Rgb::default(),
            frames_rendered: 0,
            stale_removals: 0,
        }
    }

    /// Make `path` loadable, with the given model-space bounds.
    pub fn register_model(&mut self, path: impl Into<String>, bounds: Bounds) {
        self.catalog.insert(path.into(), bounds);
    }

    /// How many `poll_loaded` calls a load takes to complete (minimum 1).
    pub fn set_load_delay_frames(&mut self, frames: u32) {
        self.load_delay_frames = frames.max(1);
    }

    fn allocate(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn note_stale(&mut self, what: &str, id: u32) {
        self.stale_removals += 1;
        log::warn!("Scene: {} #{} was already released", what, id);
    }

    pub fn stats(&self) -> SceneStats {
        SceneStats {
            points: self.points.len(),
            lines: self.lines.len(),
            lights: self.lights.len(),
            instances: self.instances.len(),
            pending_loads: self.pending.len(),
            models: self.models.len(),
        }
    }

    pub fn points(&self, handle: PointsHandle) -> Option<&PointsBuffer> {
        self.points.get(&handle)
    }

    pub fn line(&self, handle: LineHandle) -> Option<&LineBuffer> {
        self.lines.get(&handle)
    }

    pub fn light(&self, handle: LightHandle) -> Option<&Light> {
        self.lights.get(&handle)
    }

    pub fn instance(&self, handle: MeshHandle) -> Option<&InstanceRecord> {
        self.instances.get(&handle)
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn fog(&self) -> Option<Fog> {
        self.fog
    }

    pub fn clear_color(&self) -> Rgb {
        self.clear_color
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Removals of handles that were no longer live (double frees).
    pub fn stale_removals(&self) -> u64 {
        self.stale_removals
    }
}

impl SceneBackend for HeadlessScene {
    fn add_points(&mut self, positions: &[Vec3], material: PointsMaterial) -> PointsHandle {
        let handle = PointsHandle(self.allocate());
        self.points.insert(
            handle,
            PointsBuffer {
                positions: bytemuck::cast_slice::<Vec3, f32>(positions).to_vec(),
                material,
                uploads: 1,
            },
        );
        handle
    }

    fn update_points(&mut self, handle: PointsHandle, positions: &[Vec3]) {
        match self.points.get_mut(&handle) {
            Some(buffer) => {
                buffer.positions.clear();
                buffer
                    .positions
                    .extend_from_slice(bytemuck::cast_slice::<Vec3, f32>(positions));
                buffer.uploads += 1;
            }
            None => log::warn!("Scene: update of released points #{}", handle.0),
        }
    }

    fn remove_points(&mut self, handle: PointsHandle) {
        if self.points.remove(&handle).is_none() {
            self.note_stale("points", handle.0);
        }
    }

    fn add_line(&mut self, points: &[Vec3], material: LineMaterial) -> LineHandle {
        let handle = LineHandle(self.allocate());
        self.lines.insert(
            handle,
            LineBuffer {
                vertices: bytemuck::cast_slice::<Vec3, f32>(points).to_vec(),
                material,
            },
        );
        handle
    }

    fn set_line_opacity(&mut self, handle: LineHandle, opacity: f32) {
        if let Some(line) = self.lines.get_mut(&handle) {
            line.material.opacity = opacity;
        }
    }

    fn remove_line(&mut self, handle: LineHandle) {
        if self.lines.remove(&handle).is_none() {
            self.note_stale("line", handle.0);
        }
    }

    fn add_light(&mut self, light: Light) -> LightHandle {
        let handle = LightHandle(self.allocate());
        self.lights.insert(handle, light);
        handle
    }

    fn set_light_intensity(&mut self, handle: LightHandle, value: f32) {
        if let Some(light) = self.lights.get_mut(&handle) {
            match light {
                Light::Ambient { intensity, .. }
                | Light::Directional { intensity, .. }
                | Light::Point { intensity, .. }
                | Light::Hemisphere { intensity, .. } => *intensity = value,
            }
        }
    }

    fn set_light_color(&mut self, handle: LightHandle, value: Rgb) {
        if let Some(light) = self.lights.get_mut(&handle) {
            match light {
                Light::Ambient { color, .. }
                | Light::Directional { color, .. }
                | Light::Point { color, .. } => *color = value,
                Light::Hemisphere { sky, .. } => *sky = value,
            }
        }
    }

    fn set_light_position(&mut self, handle: LightHandle, value: Vec3) {
        if let Some(light) = self.lights.get_mut(&handle) {
            match light {
                Light::Directional { position, .. } | Light::Point { position, .. } => {
                    *position = value
                }
                // Ambient and hemisphere lights are not positional.
                Light::Ambient { .. } | Light::Hemisphere { .. } => {}
            }
        }
    }

    fn remove_light(&mut self, handle: LightHandle) {
        if self.lights.remove(&handle).is_none() {
            self.note_stale("light", handle.0);
        }
    }

    fn request_model(&mut self, path: &str) -> LoadTicket {
        let ticket = LoadTicket(self.allocate());
        self.pending.push(PendingLoad {
            ticket,
            path: path.to_string(),
            frames_left: self.load_delay_frames,
        });
        ticket
    }

    fn poll_loaded(&mut self) -> Vec<LoadedModel> {
        let mut done = Vec::new();
        let mut still_pending = Vec::with_capacity(self.pending.len());
        for mut load in std::mem::take(&mut self.pending) {
            load.frames_left = load.frames_left.saturating_sub(1);
            if load.frames_left > 0 {
                still_pending.push(load);
                continue;
            }
            let result = match self.catalog.get(&load.path).copied() {
                Some(bounds) => {
                    let id = match self.loaded.get(&load.path) {
                        Some(&id) => id,
                        None => {
                            let id = ModelId(self.allocate());
                            self.models.insert(id, bounds);
                            self.loaded.insert(load.path, id);
                            id
                        }
                    };
                    Ok(ModelInfo { id, bounds })
                }
                None => Err(RenderError::ModelNotFound(load.path)),
            };
            done.push(LoadedModel {
                ticket: load.ticket,
                result,
            });
        }
        self.pending = still_pending;
        done
    }

    fn add_instance(
        &mut self,
        model: ModelId,
        transform: &Transform,
        tint: f32,
    ) -> Result<MeshHandle, RenderError> {
        if !self.models.contains_key(&model) {
            return Err(RenderError::UnknownModel(model));
        }
        let handle = MeshHandle(self.allocate());
        self.instances.insert(
            handle,
            InstanceRecord {
                model,
                transform: TransformRaw::from(transform),
                tint,
            },
        );
        Ok(handle)
    }

    fn set_instance_transform(&mut self, handle: MeshHandle, transform: &Transform) {
        if let Some(instance) = self.instances.get_mut(&handle) {
            instance.transform = TransformRaw::from(transform);
        }
    }

    fn remove_instance(&mut self, handle: MeshHandle) {
        if self.instances.remove(&handle).is_none() {
            self.note_stale("instance", handle.0);
        }
    }

    fn set_background(&mut self, color: Rgb) {
        self.background = color;
    }

    fn set_fog(&mut self, fog: Fog) {
        self.fog = Some(fog);
    }

    fn set_clear_color(&mut self, color: Rgb) {
        self.clear_color = color;
    }

    fn render(&mut self) -> Result<(), RenderError> {
        self.frames_rendered += 1;
        Ok(())
    }
}
