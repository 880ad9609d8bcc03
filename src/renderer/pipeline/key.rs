//! Composite pipeline cache key.
//!
//! A pipeline's identity is the pair of stage handles, the full material
//! render-state fingerprint, and the backend's opaque key, compared
//! field-for-field in that order. All components have exact equality (no
//! floats), so a typed key in a hash map partitions pipelines identically
//! to the classic joined-string key while hashing once and allocating only
//! for the backend string.

use crate::renderer::pipeline::stage::StageId;
use crate::resources::render_state::RenderState;

/// Registry identity of a render pipeline.
///
/// Stage handles stand in for the stage sources: the stage cache already
/// guarantees one handle per distinct source of a kind, and a handle can
/// only appear here while some pipeline keeps its stage alive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub vertex: StageId,
    pub fragment: StageId,
    pub state: RenderState,
    pub backend_key: String,
}
