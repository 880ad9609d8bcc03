//! Backend capability seam.
//!
//! The cache layer is backend-agnostic: everything device-specific goes
//! through [`RenderBackend`]. A backend compiles stage sources into its own
//! resource type, assembles pipelines from compiled stages plus a
//! [`RenderState`], and contributes an opaque key for device state (target
//! formats, sample count) that partitions pipelines beyond what materials
//! express.
//!
//! The contract is synchronous: a returned `Err` means nothing was created
//! on the device side and the caller may report the failure immediately.

use crate::errors::BackendError;
use crate::renderer::objects::RenderObject;
use crate::renderer::pipeline::stage::StageKind;
use crate::resources::render_state::RenderState;

/// Device capabilities the pipeline cache depends on.
pub trait RenderBackend {
    /// A compiled shader stage (a shader module, typically).
    type StageResource;
    /// A fully assembled pipeline object.
    type PipelineResource;

    /// Compiles one stage from exact source text.
    ///
    /// On `Err` no resource exists; the diagnostic text ends up in
    /// [`PipelineError::StageCompile`](crate::errors::PipelineError::StageCompile).
    fn compile_stage(
        &mut self,
        kind: StageKind,
        source: &str,
    ) -> Result<Self::StageResource, BackendError>;

    /// Frees a compiled stage. Called exactly once per resource, when its
    /// reference count transitions to zero.
    fn release_stage(&mut self, stage: Self::StageResource);

    /// Assembles a pipeline from two compiled stages and the material
    /// render state.
    fn create_pipeline(
        &mut self,
        vertex: &Self::StageResource,
        fragment: &Self::StageResource,
        state: &RenderState,
    ) -> Result<Self::PipelineResource, BackendError>;

    /// Frees an assembled pipeline. Called exactly once per resource, when
    /// its reference count transitions to zero.
    fn release_pipeline(&mut self, pipeline: Self::PipelineResource);

    /// Whether backend-side state relevant to `object` changed since its
    /// pipeline was built (render-target format, sample count, …).
    ///
    /// Consulted last in the needs-update check, only after the material
    /// checks came up clean.
    fn needs_update(&mut self, object: &RenderObject) -> bool;

    /// Opaque key describing the backend state `object` would be built
    /// against right now. Objects with different keys never share pipelines.
    fn cache_key(&mut self, object: &RenderObject) -> String;
}
