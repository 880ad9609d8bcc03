//! Pipeline caching.
//!
//! Shader stages and render pipelines, deduplicated and reference-counted:
//! - stage: per-kind programmable stage cache, keyed by source hash
//! - key: full composite pipeline identity
//! - cache: pipeline registry plus per-object binding records

pub mod cache;
pub mod key;
pub mod stage;

pub use cache::{ObjectRecord, PipelineCache, PipelineId, RenderPipeline};
pub use key::PipelineKey;
pub use stage::{ProgrammableStage, StageCache, StageId, StageKind};
