use glam::Mat4;

use super::backend::RenderBackend;
use super::dirty::DirtyFlags;
use super::draw::{DrawRequest, Winding};
use super::fog::Fog;
use super::lights::{pack_lights, Light};
use super::pass::Pass;
use super::scope::OverwriteScope;
use super::stats::RendererStats;
use crate::asset::Handle;
use crate::error::{RenderError, Result};
use crate::math::{ortho_pixel_projection, polygon_offset_matrix, MatrixSlot, MatrixTable};
use crate::params::TextureSlot;
use crate::pipeline::{OverwriteStack, OverwriteToken, PipelineOverwrite, PipelineSettings};
use crate::settings::{RendererSettings, Resolution};
use crate::shader::{registry, uniforms, ShaderKind, ShaderProgram, ShaderRegistry};

/// Externally settable base transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum RenderTransform {
    World = 0,
    View = 1,
    Projection = 2,
}

impl RenderTransform {
    pub fn slot(self) -> MatrixSlot {
        match self {
            RenderTransform::World => MatrixSlot::World,
            RenderTransform::View => MatrixSlot::View,
            RenderTransform::Projection => MatrixSlot::Projection,
        }
    }
}

impl TryFrom<u32> for RenderTransform {
    type Error = RenderError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(RenderTransform::World),
            1 => Ok(RenderTransform::View),
            2 => Ok(RenderTransform::Projection),
            other => Err(RenderError::UnknownTransform(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderMode {
    #[default]
    Mode3D,
    /// Pixel-space drawing: view is identity, projection maps the render
    /// target with the origin at the top-left. Lighting and fog are off.
    Mode2D,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTarget {
    pub width: u32,
    pub height: u32,
}

impl From<Resolution> for RenderTarget {
    fn from(resolution: Resolution) -> Self {
        Self {
            width: resolution.width,
            height: resolution.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    Drawn,
    /// Nothing to draw; no state was touched.
    Skipped,
    Failed,
}

/// What the backend was last told, used to detect transitions.
#[derive(Debug, Clone, Copy)]
struct AppliedState {
    settings: PipelineSettings,
    shader: Handle<ShaderProgram>,
    kind: ShaderKind,
}

/// Caches render state and pushes only what changed to the backend before
/// each draw.
pub struct Renderer<B: RenderBackend> {
    backend: B,
    settings: RendererSettings,
    shaders: ShaderRegistry,
    matrices: MatrixTable,
    view: Mat4,
    projection: Mat4,
    overwrites: OverwriteStack,
    pass: Pass,
    folded: PipelineSettings,
    applied: Option<AppliedState>,
    bound_textures: Vec<TextureSlot>,
    lights: Vec<Light>,
    lit_slots: usize,
    fog: Fog,
    render_target: RenderTarget,
    render_mode: RenderMode,
    dirty: DirtyFlags,
    stats: RendererStats,
}

impl<B: RenderBackend> Renderer<B> {
    pub fn new(backend: B, settings: RendererSettings, mut shaders: ShaderRegistry) -> Self {
        let default_shader = shaders
            .instantiate(registry::SOLID)
            .unwrap_or_else(|_| shaders.add(ShaderProgram::fixed_function(registry::SOLID)));
        let pass = Pass::new(default_shader);

        log::info!(
            "Renderer created: {}x{} target, {}-bit depth, {} lights, {} texture layers",
            settings.resolution.width,
            settings.resolution.height,
            settings.depth_bits,
            settings.max_lights,
            settings.max_texture_layers
        );

        Self {
            backend,
            render_target: settings.resolution.into(),
            bound_textures: vec![TextureSlot::EMPTY; settings.max_texture_layers],
            settings,
            shaders,
            matrices: MatrixTable::new(),
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            overwrites: OverwriteStack::new(),
            folded: pass.settings,
            pass,
            applied: None,
            lights: Vec::new(),
            lit_slots: 0,
            fog: Fog::default(),
            render_mode: RenderMode::Mode3D,
            dirty: DirtyFlags::all(),
            stats: RendererStats::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    pub fn shaders(&self) -> &ShaderRegistry {
        &self.shaders
    }

    pub fn shaders_mut(&mut self) -> &mut ShaderRegistry {
        &mut self.shaders
    }

    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    pub fn stats(&self) -> &RendererStats {
        &self.stats
    }

    /// Returns the counters gathered so far and starts a new period.
    pub fn take_stats(&mut self) -> RendererStats {
        std::mem::take(&mut self.stats)
    }

    // --- transforms ---

    pub fn set_transform(&mut self, transform: RenderTransform, matrix: Mat4) {
        match transform {
            RenderTransform::World => {
                self.matrices.store_base(MatrixSlot::World, matrix);
                self.dirty |= DirtyFlags::WORLD;
            }
            RenderTransform::View => {
                self.view = matrix;
                self.dirty |= DirtyFlags::VIEW_PROJECTION;
            }
            RenderTransform::Projection => {
                self.projection = matrix;
                self.dirty |= DirtyFlags::VIEW_PROJECTION;
            }
        }
    }

    pub fn set_transform_raw(&mut self, transform: u32, matrix: Mat4) -> Result<()> {
        self.set_transform(RenderTransform::try_from(transform)?, matrix);
        Ok(())
    }

    /// The base transform as last set by the caller (before polygon offset
    /// or 2D substitution).
    pub fn transform(&self, transform: RenderTransform) -> Mat4 {
        match transform {
            RenderTransform::World => self.matrices.cached(MatrixSlot::World),
            RenderTransform::View => self.view,
            RenderTransform::Projection => self.projection,
        }
    }

    /// Effective matrix for `slot` as of the last setup, derived on demand.
    pub fn matrix(&mut self, slot: MatrixSlot) -> Mat4 {
        self.matrices.get_matrix(slot)
    }

    // --- scene state ---

    pub fn set_fog(&mut self, fog: Fog) {
        self.fog = fog;
        self.dirty |= DirtyFlags::FOG;
    }

    pub fn fog(&self) -> &Fog {
        &self.fog
    }

    /// Adds a light and returns its index. Lights beyond the configured
    /// capacity are kept but never uploaded.
    pub fn add_light(&mut self, light: Light) -> usize {
        if self.lights.len() >= self.settings.max_lights {
            log::warn!(
                "Light {} exceeds the capacity of {} and will be ignored",
                self.lights.len(),
                self.settings.max_lights
            );
        }
        self.lights.push(light);
        self.dirty |= DirtyFlags::LIGHTS;
        self.lights.len() - 1
    }

    pub fn clear_lights(&mut self) {
        if !self.lights.is_empty() {
            self.lights.clear();
            self.dirty |= DirtyFlags::LIGHTS;
        }
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    // --- pass and overwrites ---

    pub fn set_pass(&mut self, pass: Pass) {
        self.pass = pass;
        self.dirty |= DirtyFlags::PASS;
    }

    pub fn pass(&self) -> &Pass {
        &self.pass
    }

    /// Mutable access to the current pass; marks it changed.
    pub fn pass_mut(&mut self) -> &mut Pass {
        self.dirty |= DirtyFlags::PASS;
        &mut self.pass
    }

    pub fn push_pipeline_overwrite(&mut self, overwrite: PipelineOverwrite) -> Result<()> {
        self.overwrites.push(overwrite, None)?;
        self.dirty |= DirtyFlags::OVERWRITES;
        Ok(())
    }

    pub fn pop_pipeline_overwrite(&mut self) -> Result<()> {
        self.overwrites.pop(None)?;
        self.dirty |= DirtyFlags::OVERWRITES;
        Ok(())
    }

    pub fn push_overwrite_with(
        &mut self,
        overwrite: PipelineOverwrite,
        token: &mut OverwriteToken,
    ) -> Result<()> {
        self.overwrites.push(overwrite, Some(token))?;
        self.dirty |= DirtyFlags::OVERWRITES;
        Ok(())
    }

    /// Pops one entry pushed through `token`; a no-op once the token has
    /// nothing left on the stack.
    pub fn pop_overwrite_with(&mut self, token: &mut OverwriteToken) -> Result<()> {
        let before = self.overwrites.len();
        self.overwrites.pop(Some(token))?;
        if self.overwrites.len() != before {
            self.dirty |= DirtyFlags::OVERWRITES;
        }
        Ok(())
    }

    /// Pops every entry `token` is still responsible for.
    pub fn release_overwrites(&mut self, token: &mut OverwriteToken) -> Result<()> {
        if token.pushes() == 0 {
            return Ok(());
        }
        self.overwrites.release(token)?;
        self.dirty |= DirtyFlags::OVERWRITES;
        Ok(())
    }

    pub fn overwrites(&self) -> &OverwriteStack {
        &self.overwrites
    }

    /// Guard whose pushes are popped when it goes out of scope.
    pub fn overwrite_scope(&mut self) -> OverwriteScope<'_, B> {
        OverwriteScope::new(self)
    }

    // --- output ---

    pub fn set_render_target(&mut self, width: u32, height: u32) {
        let target = RenderTarget { width, height };
        if target != self.render_target {
            self.render_target = target;
            self.dirty |= DirtyFlags::RENDER_TARGET;
        }
    }

    pub fn render_target(&self) -> RenderTarget {
        self.render_target
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        if mode != self.render_mode {
            self.render_mode = mode;
            self.dirty |= DirtyFlags::RENDER_MODE;
        }
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    /// Forgets everything the backend was told; the next setup pushes all
    /// state again. Pending overwrites are dropped.
    pub fn reset_state(&mut self) {
        if !self.overwrites.is_empty() {
            log::warn!(
                "Resetting render state with {} overwrites still pushed",
                self.overwrites.len()
            );
        }
        self.overwrites.clear();
        self.applied = None;
        self.bound_textures.fill(TextureSlot::EMPTY);
        self.dirty = DirtyFlags::all();
    }

    // --- drawing ---

    /// Brings the backend in line with the cached state, issuing only the
    /// calls whose inputs changed since the last successful setup.
    pub fn setup_rendering(&mut self, winding: Winding) -> Result<()> {
        if self.dirty.intersects(DirtyFlags::PASS | DirtyFlags::OVERWRITES) {
            self.folded = self.overwrites.apply(&self.pass.settings);
        }

        let mut resolved = self.folded;
        if self.render_mode == RenderMode::Mode2D {
            resolved.lighting = false;
            resolved.fog = false;
        }
        if winding == Winding::Clockwise {
            resolved.flip_culling();
        }

        let previous = self.applied;
        let (fog_changed, lighting_changed) = match previous {
            Some(prev) => {
                if prev.settings != resolved {
                    self.dirty |= DirtyFlags::PASS;
                }
                if prev.settings.polygon_offset != resolved.polygon_offset {
                    self.dirty |= DirtyFlags::POLYGON_OFFSET;
                }
                (
                    prev.settings.fog != resolved.fog,
                    prev.settings.lighting != resolved.lighting,
                )
            }
            None => {
                self.dirty |= DirtyFlags::PASS | DirtyFlags::POLYGON_OFFSET;
                (true, true)
            }
        };

        let handle = self.pass.shader;
        let shader = self
            .shaders
            .get(handle)
            .ok_or(RenderError::InvalidShaderHandle(handle.index()))?;
        let kind = shader.kind();
        let uniform_matrices = kind.consumes_matrices_as_uniforms();

        let switched = previous.map_or(true, |prev| prev.shader != handle);
        // Fixed-function shaders share device transform, light and fog state,
        // so moving between two of them does not invalidate it.
        let significant = switched
            && !(kind == ShaderKind::FixedFunction
                && previous.is_some_and(|prev| prev.kind == ShaderKind::FixedFunction));
        if switched {
            self.stats.shader_switches += 1;
        }

        let mode_2d = self.render_mode == RenderMode::Mode2D;
        if self.dirty.intersects(DirtyFlags::view_inputs(mode_2d)) {
            let (view, projection) = match self.render_mode {
                RenderMode::Mode3D => (self.view, self.projection),
                RenderMode::Mode2D => (
                    Mat4::IDENTITY,
                    ortho_pixel_projection(self.render_target.width, self.render_target.height),
                ),
            };
            let offset = polygon_offset_matrix(
                resolved.polygon_offset * self.settings.polygon_offset_units,
                self.settings.depth_bits,
            );
            self.matrices.store_base(MatrixSlot::View, view);
            self.matrices.store_base(MatrixSlot::Projection, offset * projection);
            self.dirty |= DirtyFlags::VIEW_PROJECTION;
        }

        let dirty = self.dirty;

        if dirty.contains(DirtyFlags::PASS) {
            self.backend.enable_pass(&resolved, shader, &self.pass);
            self.stats.pass_changes += 1;

            if self.pass.textures.len() > self.bound_textures.len() {
                log::warn!(
                    "Pass binds {} texture layers, only {} are available",
                    self.pass.textures.len(),
                    self.bound_textures.len()
                );
            }
            for (layer, bound) in self.bound_textures.iter_mut().enumerate() {
                let texture = self.pass.texture(layer);
                if significant || *bound != texture {
                    self.backend.enable_texture_layer(layer, texture);
                    *bound = texture;
                    self.stats.texture_binds += 1;
                }
            }

            if let Some(params) = &self.pass.params {
                let uploaded = shader.load_scene_params(params, &mut self.backend);
                self.stats.shader_param_uploads += uploaded as u32;
            }
        }

        if uniform_matrices {
            for slot in MatrixSlot::ALL {
                let Some(id) = shader.matrix_param(slot) else {
                    continue;
                };
                if significant || self.matrices.is_dirty(slot) {
                    let matrix = self.matrices.get_matrix(slot).to_cols_array();
                    self.backend.set_shader_parameter(id, bytemuck::bytes_of(&matrix));
                    self.matrices.clear_dirty(slot);
                    self.stats.transform_uploads += 1;
                }
            }
        } else {
            if significant || dirty.contains(DirtyFlags::WORLD) {
                let world = self.matrices.get_matrix(MatrixSlot::World);
                self.backend.set_transform(MatrixSlot::World, &world);
                self.matrices.clear_dirty(MatrixSlot::World);
                self.stats.transform_uploads += 1;
            }
            if significant || dirty.contains(DirtyFlags::VIEW_PROJECTION) {
                for slot in [MatrixSlot::View, MatrixSlot::Projection] {
                    let matrix = self.matrices.get_matrix(slot);
                    self.backend.set_transform(slot, &matrix);
                    self.matrices.clear_dirty(slot);
                    self.stats.transform_uploads += 1;
                }
            }
        }

        if significant || fog_changed || dirty.contains(DirtyFlags::FOG) {
            if uniform_matrices {
                if let Some(id) = shader.param_id(uniforms::FOG) {
                    let fog = self.fog.uniform(resolved.fog);
                    self.backend.set_shader_parameter(id, bytemuck::bytes_of(&fog));
                    self.stats.fog_uploads += 1;
                }
            } else {
                self.backend.set_fog(&self.fog, resolved.fog);
                self.stats.fog_uploads += 1;
            }
        }

        if significant || lighting_changed || dirty.contains(DirtyFlags::LIGHTS) {
            let active = if resolved.lighting {
                self.lights.len().min(self.settings.max_lights)
            } else {
                0
            };

            if uniform_matrices {
                if let Some(id) = shader.param_id(uniforms::LIGHTS) {
                    let packed = pack_lights(&self.lights, active);
                    self.backend.set_shader_parameter(id, bytemuck::cast_slice(&packed));
                    self.stats.light_uploads += 1;
                }
                if let Some(id) = shader.param_id(uniforms::LIGHT_COUNT) {
                    self.backend
                        .set_shader_parameter(id, bytemuck::bytes_of(&(active as u32)));
                }
            } else {
                for (index, light) in self.lights[..active].iter().enumerate() {
                    self.backend.set_light(index, Some(light));
                    self.stats.light_uploads += 1;
                }
                for index in active..self.lit_slots {
                    self.backend.set_light(index, None);
                    self.stats.light_uploads += 1;
                }
                self.lit_slots = active;
            }
        }

        self.dirty = DirtyFlags::empty();
        self.applied = Some(AppliedState {
            settings: resolved,
            shader: handle,
            kind,
        });
        Ok(())
    }

    /// Sets up state and submits `request`. Zero-primitive requests return
    /// immediately without touching any state.
    pub fn draw(&mut self, request: &DrawRequest) -> DrawOutcome {
        if request.is_empty() {
            log::trace!("Skipping draw of zero {:?} primitives", request.primitive);
            self.stats.skipped_draws += 1;
            return DrawOutcome::Skipped;
        }

        if let Err(err) = self.setup_rendering(request.winding) {
            log::error!("Render state setup failed, dropping draw: {}", err);
            self.stats.failed_draws += 1;
            return DrawOutcome::Failed;
        }

        match self.backend.draw(request) {
            Ok(()) => {
                self.stats.draw_calls += 1;
                self.stats.primitives += u64::from(request.primitive_count);
                DrawOutcome::Drawn
            }
            Err(err) => {
                log::error!(
                    "Backend failed to draw {} {:?} primitives: {}",
                    request.primitive_count,
                    request.primitive,
                    err
                );
                self.stats.failed_draws += 1;
                DrawOutcome::Failed
            }
        }
    }
}
