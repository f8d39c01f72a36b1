use std::collections::{HashMap, HashSet};

use log::{debug, error, info, trace, warn};

use crate::core::utils::handle::Allocator;

use super::program::{CompiledStage, ShaderProgram};
use super::render_api::{ProgramHandle, RenderBackend};
use super::shader::{ShaderError, ShaderSrc, ShaderStage, UniformValue};
use super::uniform_cache::{UniformCache, UniformInfo};

/// Tunables of a [RenderContext]
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub log_discovered_uniforms: bool,
    pub report_uniform_misses: bool,
}

impl RenderSettings {
    pub fn new() -> Self {
        RenderSettings {
            log_discovered_uniforms: true,
            report_uniform_misses: true,
        }
    }

    /// Log every uniform found while linking, along with its location
    pub fn with_log_discovered_uniforms(mut self, enabled: bool) -> Self {
        self.log_discovered_uniforms = enabled;
        self
    }

    /// Warn the first time an upload targets a uniform the program doesn't have
    pub fn with_report_uniform_misses(mut self, enabled: bool) -> Self {
        self.report_uniform_misses = enabled;
        self
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Owner of every shader program created on one graphics context.
///
/// Holds the backend, the registry of linked programs and the uniform
/// location cache. Everything here must be used from the thread where the
/// context is current. Dropping the render context deletes every program
/// that is still alive, so it should be dropped before the graphics context.
pub struct RenderContext<B: RenderBackend> {
    backend: B,
    settings: RenderSettings,
    programs: Allocator<ShaderProgram<B::Program>>,
    /// Compiled stages not yet linked or released
    pending_stages: Vec<B::Shader>,
    uniform_cache: UniformCache<B::UniformLocation>,
    reported_misses: HashMap<ProgramHandle, HashSet<String>>,
    bound_program: Option<ProgramHandle>,
}

impl<B: RenderBackend> RenderContext<B> {
    pub fn new(backend: B) -> Self {
        Self::with_settings(backend, RenderSettings::default())
    }

    pub fn with_settings(backend: B, settings: RenderSettings) -> Self {
        let backend_info = backend.get_info();
        info!("{:?} render context successfully initialized!", backend.get_api());
        info!("\tVersion: {}", backend_info.version);
        info!("\tRenderer: {}", backend_info.renderer);
        info!("\tVendor: {}", backend_info.vendor);

        RenderContext {
            backend,
            settings,
            programs: Allocator::new(),
            pending_stages: Vec::new(),
            uniform_cache: UniformCache::new(),
            reported_misses: HashMap::new(),
            bound_program: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn uniform_cache(&self) -> &UniformCache<B::UniformLocation> {
        &self.uniform_cache
    }

    // -- < Program lifecycle > ---------------------------------------------

    /// Compile a single stage. A stage that fails to compile is deleted right
    /// away, so it can never reach a program.
    pub fn compile_stage(
        &mut self,
        stage: ShaderStage,
        source: &str,
    ) -> Result<CompiledStage<B::Shader>, ShaderError> {
        let shader = self
            .backend
            .create_shader(stage)
            .map_err(|reason| ShaderError::StageCreation { stage, reason })
            .inspect_err(|err| error!("Error creating {} shader: {}", stage, err))?;

        if !self.backend.compile_shader(shader, source) {
            let log = self.backend.get_shader_info_log(shader);
            self.backend.delete_shader(shader);

            error!("Error compiling {} shader: {}", stage, log);
            return Err(ShaderError::Compile { stage, log });
        }

        self.pending_stages.push(shader);
        Ok(CompiledStage {
            stage,
            native_shader: shader,
        })
    }

    /// Delete a compiled stage that will not be linked
    pub fn release_stage(&mut self, stage: CompiledStage<B::Shader>) {
        self.release_stages(&[stage]);
    }

    /// Number of compiled stages still waiting to be linked or released
    pub fn pending_stage_count(&self) -> usize {
        self.pending_stages.len()
    }

    /// Link two compiled stages into a program and register its active uniforms.
    ///
    /// Both stages are released whatever the outcome. On failure the program
    /// object is deleted and the uniform cache is left untouched.
    pub fn link_program(
        &mut self,
        name: &str,
        vertex: CompiledStage<B::Shader>,
        fragment: CompiledStage<B::Shader>,
    ) -> Result<ProgramHandle, ShaderError> {
        debug_assert!(vertex.stage == ShaderStage::Vertex, "Expected a vertex stage");
        debug_assert!(
            fragment.stage == ShaderStage::Fragment,
            "Expected a fragment stage"
        );
        let stages = [vertex, fragment];

        let program = match self.backend.create_program() {
            Ok(program) => program,
            Err(reason) => {
                self.release_stages(&stages);
                error!("Error creating program '{}': {}", name, reason);
                return Err(ShaderError::ProgramCreation {
                    name: name.to_owned(),
                    reason,
                });
            }
        };

        for stage in stages.iter() {
            self.backend.attach_shader(program, stage.native_shader);
        }

        if !self.backend.link_program(program) {
            // If not ok, clean up all the resources we have created
            let log = self.backend.get_program_info_log(program);
            self.backend.delete_program(program);
            self.release_stages(&stages);

            error!("Error linking program '{}': {}", name, log);
            return Err(ShaderError::Link {
                name: name.to_owned(),
                log,
            });
        }

        // The linked program keeps its own copy of the code
        for stage in stages.iter() {
            self.backend.detach_shader(program, stage.native_shader);
        }
        self.release_stages(&stages);

        let handle = self.programs.allocate(ShaderProgram {
            name: name.to_owned(),
            native_program: program,
        });
        self.discover_uniforms(handle, program);

        Ok(handle)
    }

    /// Load, compile and link a program from its two sources.
    ///
    /// Both sources are resolved before anything is compiled, and both stages
    /// must compile before a link is attempted.
    pub fn create_program(
        &mut self,
        name: &str,
        vertex_src: ShaderSrc<'_>,
        fragment_src: ShaderSrc<'_>,
    ) -> Result<ProgramHandle, ShaderError> {
        let vertex_code = vertex_src
            .load()
            .inspect_err(|err| error!("Error loading vertex shader for '{}': {}", name, err))?;
        let fragment_code = fragment_src
            .load()
            .inspect_err(|err| error!("Error loading fragment shader for '{}': {}", name, err))?;

        let vertex = self.compile_stage(ShaderStage::Vertex, &vertex_code)?;
        let fragment = match self.compile_stage(ShaderStage::Fragment, &fragment_code) {
            Ok(fragment) => fragment,
            Err(err) => {
                self.release_stages(&[vertex]);
                return Err(err);
            }
        };

        self.link_program(name, vertex, fragment)
    }

    /// Delete the program and everything cached about it. The handle is dead
    /// afterwards, even if the driver hands out the same program name again.
    pub fn destroy_program(&mut self, handle: ProgramHandle) -> Result<(), ShaderError> {
        let program = self
            .programs
            .free(handle)
            .ok_or(ShaderError::InvalidProgram(handle))?;

        if self.bound_program == Some(handle) {
            self.backend.use_program(None);
            self.bound_program = None;
        }
        self.backend.delete_program(program.native_program);

        let evicted = self.uniform_cache.evict_program(handle);
        self.reported_misses.remove(&handle);
        debug!(
            "Destroyed program '{}', {} cached uniforms evicted",
            program.name, evicted
        );

        Ok(())
    }

    pub fn is_program_live(&self, handle: ProgramHandle) -> bool {
        self.programs.is_live(handle)
    }

    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    pub fn program_name(&self, handle: ProgramHandle) -> Option<&str> {
        self.programs.get(handle).map(ShaderProgram::name)
    }

    pub fn native_program(&self, handle: ProgramHandle) -> Option<B::Program> {
        self.programs.get(handle).map(ShaderProgram::native_program)
    }

    // -- < Bindings > ------------------------------------------------------

    /// Make `handle` the active program. Uniform uploads only take effect on
    /// the bound program.
    pub fn bind_program(&mut self, handle: ProgramHandle) -> Result<(), ShaderError> {
        let program = self
            .programs
            .get(handle)
            .ok_or(ShaderError::InvalidProgram(handle))?;

        self.backend.use_program(Some(program.native_program));
        self.bound_program = Some(handle);
        Ok(())
    }

    pub fn unbind_program(&mut self) {
        self.backend.use_program(None);
        self.bound_program = None;
    }

    pub fn bound_program(&self) -> Option<ProgramHandle> {
        self.bound_program
    }

    // -- < Uniforms > ------------------------------------------------------

    pub fn uniform_location(
        &self,
        handle: ProgramHandle,
        name: &str,
    ) -> Option<&B::UniformLocation> {
        self.uniform_cache
            .lookup(handle, name)
            .map(|info| &info.location)
    }

    /// Every uniform cached for this program, in no particular order
    pub fn program_uniforms(
        &self,
        handle: ProgramHandle,
    ) -> impl Iterator<Item = (&str, &UniformInfo<B::UniformLocation>)> {
        self.uniform_cache.uniforms(handle)
    }

    /// Write `value` into the uniform called `name`. The program must already be bound.
    ///
    /// Returns false without touching the driver when the program has no
    /// active uniform with that exact name.
    pub fn set_uniform<'v>(
        &mut self,
        handle: ProgramHandle,
        name: &str,
        value: impl Into<UniformValue<'v>>,
    ) -> bool {
        match self.uniform_cache.lookup(handle, name) {
            Some(info) => {
                let value: UniformValue<'_> = value.into();
                if !info.data_type.accepts(&value) {
                    debug!(
                        "Uniform '{}' is declared as {:?} but received {:?}",
                        name,
                        info.data_type,
                        value.data_type()
                    );
                }
                self.backend.set_uniform(&info.location, value);
                true
            }
            None => {
                self.report_miss(handle, name);
                false
            }
        }
    }

    /// Typed upload facade for a single program
    pub fn uniforms(&mut self, handle: ProgramHandle) -> ProgramUniforms<'_, B> {
        ProgramUniforms {
            context: self,
            program: handle,
        }
    }

    fn discover_uniforms(&mut self, handle: ProgramHandle, program: B::Program) {
        for active in self.backend.get_active_uniforms(program) {
            // Members of uniform blocks and built-ins have no location
            let Some(location) = self.backend.get_uniform_location(program, &active.name) else {
                debug!("Uniform '{}' has no location, skipping it", active.name);
                continue;
            };

            if self.settings.log_discovered_uniforms {
                debug!("Uniform '{}' has location {:?}", active.name, location);
            }

            self.uniform_cache.insert(
                handle,
                &active.name,
                UniformInfo {
                    location,
                    data_type: active.data_type,
                    array_len: active.array_len,
                },
            );
        }
    }

    fn report_miss(&mut self, handle: ProgramHandle, name: &str) {
        if !self.settings.report_uniform_misses {
            return;
        }

        let Some(program) = self.programs.get(handle) else {
            debug!("Uniform upload '{}' skipped: program {:?} is not alive", name, handle);
            return;
        };

        let reported = self.reported_misses.entry(handle).or_default();
        if reported.contains(name) {
            trace!("Uniform '{}' not found in program '{}'", name, program.name);
            return;
        }
        reported.insert(name.to_owned());
        warn!(
            "Uniform '{}' not found in program '{}', upload skipped",
            name, program.name
        );
    }

    fn release_stages(&mut self, stages: &[CompiledStage<B::Shader>]) {
        for stage in stages {
            self.pending_stages.retain(|pending| *pending != stage.native_shader);
            self.backend.delete_shader(stage.native_shader);
        }
    }
}

impl<B: RenderBackend> Drop for RenderContext<B> {
    fn drop(&mut self) {
        for handle in self.programs.live_handles() {
            if let Err(err) = self.destroy_program(handle) {
                warn!("Could not destroy program during shutdown: {}", err);
            }
        }

        for shader in std::mem::take(&mut self.pending_stages) {
            debug!("Deleting {:?}, compiled but never linked", shader);
            self.backend.delete_shader(shader);
        }
    }
}

/// Typed uniform uploads for one program, see [RenderContext::uniforms].
///
/// Every setter returns whether a write was issued.
pub struct ProgramUniforms<'a, B: RenderBackend> {
    context: &'a mut RenderContext<B>,
    program: ProgramHandle,
}

impl<B: RenderBackend> ProgramUniforms<'_, B> {
    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    pub fn set_f32(&mut self, name: &str, value: f32) -> bool {
        self.context.set_uniform(self.program, name, value)
    }

    pub fn set_i32(&mut self, name: &str, value: i32) -> bool {
        self.context.set_uniform(self.program, name, value)
    }

    pub fn set_u32(&mut self, name: &str, value: u32) -> bool {
        self.context.set_uniform(self.program, name, value)
    }

    /// Written through the integer path as 1 or 0
    pub fn set_bool(&mut self, name: &str, value: bool) -> bool {
        self.context.set_uniform(self.program, name, value)
    }

    pub fn set_vec2(&mut self, name: &str, value: glam::Vec2) -> bool {
        self.context.set_uniform(self.program, name, value)
    }

    pub fn set_vec3(&mut self, name: &str, value: glam::Vec3) -> bool {
        self.context.set_uniform(self.program, name, value)
    }

    pub fn set_vec4(&mut self, name: &str, value: glam::Vec4) -> bool {
        self.context.set_uniform(self.program, name, value)
    }

    pub fn set_ivec2(&mut self, name: &str, value: glam::IVec2) -> bool {
        self.context.set_uniform(self.program, name, value)
    }

    pub fn set_ivec3(&mut self, name: &str, value: glam::IVec3) -> bool {
        self.context.set_uniform(self.program, name, value)
    }

    pub fn set_ivec4(&mut self, name: &str, value: glam::IVec4) -> bool {
        self.context.set_uniform(self.program, name, value)
    }

    pub fn set_mat3(&mut self, name: &str, value: glam::Mat3) -> bool {
        self.context.set_uniform(self.program, name, value)
    }

    pub fn set_mat4(&mut self, name: &str, value: glam::Mat4) -> bool {
        self.context.set_uniform(self.program, name, value)
    }

    pub fn set_i32_array(&mut self, name: &str, values: &[i32]) -> bool {
        self.context.set_uniform(self.program, name, values)
    }
}
