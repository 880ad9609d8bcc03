//! Headless backend.
//!
//! A CPU-only [`RenderBackend`] for running render code without a GPU:
//! engine unit tests, benches, server-side tools. Resources are opaque
//! tickets, every backend call is counted, and target settings behave like
//! real device state: changing them invalidates objects built against the
//! old configuration through the regular needs-update path.
//!
//! ```rust,ignore
//! let mut backend = HeadlessBackend::new();
//!
//! // Later, switch to 4x MSAA; bound objects rebuild on their next lookup.
//! backend.edit_settings().sample_count = 4;
//! ```

use rustc_hash::FxHashMap;

use crate::errors::BackendError;
use crate::renderer::backend::RenderBackend;
use crate::renderer::objects::{RenderObject, RenderObjectId};
use crate::renderer::pipeline::stage::StageKind;
use crate::resources::render_state::{RenderState, TextureFormat};
use crate::resources::version_tracker::{ChangeTracker, MutGuard};

// ─── Settings ─────────────────────────────────────────────────────────────────

/// Target configuration of the headless backend.
///
/// # Fields
///
/// | Field          | Description                    | Default               |
/// |----------------|--------------------------------|-----------------------|
/// | `color_format` | Color attachment format        | `Bgra8Unorm`          |
/// | `depth_format` | Depth/stencil attachment format| `Depth24PlusStencil8` |
/// | `sample_count` | MSAA sample count              | `1`                   |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessSettings {
    pub color_format: TextureFormat,
    pub depth_format: TextureFormat,
    pub sample_count: u32,
}

impl Default for HeadlessSettings {
    fn default() -> Self {
        Self {
            color_format: TextureFormat::Bgra8Unorm,
            depth_format: TextureFormat::Depth24PlusStencil8,
            sample_count: 1,
        }
    }
}

/// Counters of backend activity, one per [`RenderBackend`] method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadlessStats {
    pub stages_compiled: usize,
    pub stages_released: usize,
    pub pipelines_created: usize,
    pub pipelines_released: usize,
}

// ─── Backend ──────────────────────────────────────────────────────────────────

/// CPU-only backend; resources are opaque `u64` tickets.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    settings: HeadlessSettings,
    settings_version: ChangeTracker,
    /// Settings version each object's pipeline was last keyed against.
    object_versions: FxHashMap<RenderObjectId, u64>,
    next_ticket: u64,
    stats: HeadlessStats,
}

impl HeadlessBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_settings(settings: HeadlessSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &HeadlessSettings {
        &self.settings
    }

    /// Mutable access to the settings through a version-bumping guard.
    ///
    /// When the guard drops, every object keyed under the old settings starts
    /// reporting [`needs_update`](RenderBackend::needs_update).
    pub fn edit_settings(&mut self) -> MutGuard<'_, HeadlessSettings> {
        MutGuard::new(&mut self.settings, &mut self.settings_version)
    }

    /// Backend activity counters since construction.
    #[inline]
    #[must_use]
    pub fn stats(&self) -> HeadlessStats {
        self.stats
    }

    /// Drops the settings stamp of an object.
    ///
    /// [`RenderBackend`] has no per-object release hook, so callers that
    /// destroy objects prune their stamps here; otherwise the table keeps
    /// entries for ids that will never be looked up again. Unknown ids are
    /// a no-op.
    pub fn forget(&mut self, object: RenderObjectId) {
        self.object_versions.remove(&object);
    }

    /// Number of objects currently stamped with a settings version.
    #[must_use]
    pub fn stamp_count(&self) -> usize {
        self.object_versions.len()
    }

    fn take_ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }
}

impl RenderBackend for HeadlessBackend {
    type StageResource = u64;
    type PipelineResource = u64;

    fn compile_stage(
        &mut self,
        _kind: StageKind,
        _source: &str,
    ) -> Result<Self::StageResource, BackendError> {
        self.stats.stages_compiled += 1;
        Ok(self.take_ticket())
    }

    fn release_stage(&mut self, _stage: Self::StageResource) {
        self.stats.stages_released += 1;
    }

    fn create_pipeline(
        &mut self,
        _vertex: &Self::StageResource,
        _fragment: &Self::StageResource,
        _state: &RenderState,
    ) -> Result<Self::PipelineResource, BackendError> {
        self.stats.pipelines_created += 1;
        Ok(self.take_ticket())
    }

    fn release_pipeline(&mut self, _pipeline: Self::PipelineResource) {
        self.stats.pipelines_released += 1;
    }

    fn needs_update(&mut self, object: &RenderObject) -> bool {
        // Objects never keyed yet are handled by the unbound-record check.
        self.object_versions
            .get(&object.id())
            .is_some_and(|&v| v != self.settings_version.version())
    }

    fn cache_key(&mut self, object: &RenderObject) -> String {
        self.object_versions
            .insert(object.id(), self.settings_version.version());
        format!(
            "{:?}|{:?}|x{}",
            self.settings.color_format, self.settings.depth_format, self.settings.sample_count
        )
    }
}
