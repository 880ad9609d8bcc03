//! Renderer-side subsystems.
//!
//! - backend: the device abstraction pipelines are compiled through
//! - headless: an in-memory backend for tests and tooling
//! - objects: render object arena
//! - shader: shader source production seam
//! - pipeline: stage and pipeline caches with per-object records

pub mod backend;
pub mod headless;
pub mod objects;
pub mod pipeline;
pub mod shader;

pub use backend::RenderBackend;
pub use headless::{HeadlessBackend, HeadlessSettings, HeadlessStats};
pub use objects::{RenderObject, RenderObjectId, RenderObjects};
pub use pipeline::{
    ObjectRecord, PipelineCache, PipelineId, PipelineKey, ProgrammableStage, RenderPipeline,
    StageCache, StageId, StageKind,
};
pub use shader::{ShaderBuilder, ShaderSources, StaticShaders};
