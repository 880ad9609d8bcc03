//! Render pipeline caching and GPU resource lifetime management.
//!
//! Rendering an object needs a pipeline, a pipeline needs two compiled
//! shader stages, and all three are expensive enough that a renderer must
//! never build the same one twice. This crate owns that bookkeeping:
//!
//! - [`StageCache`] deduplicates compiled vertex and fragment stages by
//!   source hash, one registry per kind.
//! - [`PipelineCache`] deduplicates pipelines by their full composite
//!   identity (stages, render state, backend key) and keeps a per-object
//!   record of what each object is bound to and why.
//! - Everything is reference-counted; entries are released back to the
//!   backend exactly when their count reaches zero.
//!
//! The actual GPU work happens behind the [`RenderBackend`] trait, and
//! shader source production behind [`ShaderBuilder`], so the caches run
//! unchanged against wgpu, GL or the bundled [`HeadlessBackend`].
//!
//! # Example
//!
//! ```
//! use fable::{
//!     HeadlessBackend, Material, Materials, PipelineCache, RenderObjects, StageCache,
//!     StaticShaders,
//! };
//!
//! let mut backend = HeadlessBackend::new();
//! let mut shaders = StaticShaders::new("@vertex fn vs() {}", "@fragment fn fs() {}");
//! let mut stages = StageCache::new();
//! let mut cache = PipelineCache::new();
//!
//! let mut materials = Materials::new();
//! let mut objects = RenderObjects::new();
//! let material = materials.add(Material::new());
//! let object = objects.create(material);
//!
//! // First lookup compiles both stages and creates the pipeline.
//! let pipeline =
//!     cache.get_or_create(&mut backend, &mut shaders, &mut stages, &objects, &materials, object)?;
//!
//! // Until something changes, lookups are O(1) hits on the same pipeline.
//! let again =
//!     cache.get_or_create(&mut backend, &mut shaders, &mut stages, &objects, &materials, object)?;
//! assert_eq!(again, pipeline);
//! assert_eq!(cache.pipeline_count(), 1);
//! assert_eq!(stages.stage_count(), 2);
//! # Ok::<(), fable::PipelineError>(())
//! ```

pub mod errors;
pub mod renderer;
pub mod resources;

pub use errors::{BackendError, PipelineError};
pub use renderer::{
    HeadlessBackend, HeadlessSettings, HeadlessStats, ObjectRecord, PipelineCache, PipelineId,
    PipelineKey, ProgrammableStage, RenderBackend, RenderObject, RenderObjectId, RenderObjects,
    RenderPipeline, ShaderBuilder, ShaderSources, StageCache, StageId, StageKind, StaticShaders,
};
pub use resources::{
    BlendFactor, BlendOperation, Blending, ChangeTracker, CompareFunction, Material, MaterialId,
    Materials, MutGuard, RenderState, Side, StencilOperation, TextureFormat,
};
