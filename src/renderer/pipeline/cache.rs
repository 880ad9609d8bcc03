//! Render pipeline cache.
//!
//! Central owner of all render pipelines and of the per-object cache records.
//! Pipelines live in a slotmap addressed by [`PipelineId`] handles and are
//! deduplicated through a registry keyed by [`PipelineKey`]. Everything is
//! reference-counted: each bound object holds one reference on its pipeline,
//! and every acquisition also counts one reference on each of the pipeline's
//! two stages. An entry leaves its registry exactly when its own count
//! transitions to zero, never before and never after.
//!
//! # Lookup flow
//!
//! ```text
//! get_or_create(object)
//!   ├─ record fresh ────────────────► bound id                (O(1), per frame)
//!   └─ record stale:
//!        release previous binding ─► snapshot fingerprint ─► resolve stages
//!        ─► registry probe by (stages, state, backend key)
//!             ├─ hit:  share the existing pipeline
//!             └─ miss: backend.create_pipeline
//!        ─► +1 on pipeline and both stages ─► bind into record
//! ```
//!
//! Stage storage is owned by the caller's [`StageCache`] and passed into each
//! call; the pipeline cache drives its counts but does not own it.

use rustc_hash::FxHashMap;
use slotmap::{SecondaryMap, SlotMap, new_key_type};

use crate::errors::{PipelineError, Result};
use crate::renderer::backend::RenderBackend;
use crate::renderer::objects::{RenderObjectId, RenderObjects};
use crate::renderer::pipeline::key::PipelineKey;
use crate::renderer::pipeline::stage::{StageCache, StageKind};
use crate::renderer::shader::ShaderBuilder;
use crate::resources::material::{MaterialId, Materials};
use crate::resources::render_state::RenderState;

new_key_type! {
    /// Handle to a [`RenderPipeline`] in a [`PipelineCache`].
    pub struct PipelineId;
}

// ─── Pipeline Entries ─────────────────────────────────────────────────────────

/// One reference-counted pipeline entry.
///
/// Immutable once created; `used_times` is the number of object records
/// currently bound to it.
pub struct RenderPipeline<B: RenderBackend> {
    key: PipelineKey,
    used_times: u32,
    resource: B::PipelineResource,
}

impl<B: RenderBackend> RenderPipeline<B> {
    /// The registry identity this pipeline was created under.
    #[inline]
    #[must_use]
    pub fn key(&self) -> &PipelineKey {
        &self.key
    }

    /// How many object records are currently bound to this pipeline.
    #[inline]
    #[must_use]
    pub fn used_times(&self) -> u32 {
        self.used_times
    }

    /// The backend resource backing this pipeline.
    #[inline]
    #[must_use]
    pub fn resource(&self) -> &B::PipelineResource {
        &self.resource
    }
}

// ─── Object Records ───────────────────────────────────────────────────────────

/// Cached binding state of one render object.
///
/// Created lazily on the object's first lookup. Holds the material identity,
/// the material version and the fingerprint the bound pipeline was built
/// against; a mismatch on any of them is what makes the next lookup rebuild.
#[derive(Debug, Clone, Default)]
pub struct ObjectRecord {
    material: MaterialId,
    material_version: u64,
    state: RenderState,
    pipeline: Option<PipelineId>,
}

impl ObjectRecord {
    /// The material the binding was last built against.
    #[inline]
    #[must_use]
    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// The material version the binding was last built against.
    #[inline]
    #[must_use]
    pub fn material_version(&self) -> u64 {
        self.material_version
    }

    /// The fingerprint snapshot the binding was last built against.
    #[inline]
    #[must_use]
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// The currently bound pipeline, if any.
    ///
    /// `None` either before the first successful lookup or after a failed
    /// rebuild released the previous binding.
    #[inline]
    #[must_use]
    pub fn pipeline(&self) -> Option<PipelineId> {
        self.pipeline
    }
}

// ─── Pipeline Cache ───────────────────────────────────────────────────────────

/// Reference-counted render pipeline cache with per-object records.
pub struct PipelineCache<B: RenderBackend> {
    storage: SlotMap<PipelineId, RenderPipeline<B>>,
    /// Full composite identity → pipeline.
    lookup: FxHashMap<PipelineKey, PipelineId>,
    /// Side-table of per-object binding records.
    records: SecondaryMap<RenderObjectId, ObjectRecord>,
}

impl<B: RenderBackend> Default for PipelineCache<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: RenderBackend> PipelineCache<B> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: SlotMap::with_key(),
            lookup: FxHashMap::default(),
            records: SecondaryMap::new(),
        }
    }

    // ── Lookup (prepare-phase) ───────────────────────────────────────────────

    /// Returns the pipeline `object_id` should draw with, rebuilding its
    /// binding if anything relevant changed.
    ///
    /// The fresh case is O(1): the bound pipeline is returned when the record
    /// matches the object's current material identity, version and
    /// fingerprint and the backend reports no device-side change. Otherwise
    /// the previous binding is released, stages are resolved for the current
    /// shader sources, and the pipeline is shared through the registry or
    /// created through the backend.
    ///
    /// On failure ([`PipelineError`]) no partial cache state survives: the
    /// failing entry was not inserted, stages freshly compiled by this call
    /// are rolled back, and the record is left unbound so the next call
    /// rebuilds. The call is not retried internally.
    ///
    /// **Panics** if `object_id` or the object's material handle is stale.
    pub fn get_or_create<S: ShaderBuilder>(
        &mut self,
        backend: &mut B,
        shaders: &mut S,
        stages: &mut StageCache<B>,
        objects: &RenderObjects,
        materials: &Materials,
        object_id: RenderObjectId,
    ) -> Result<PipelineId> {
        let object = &objects[object_id];
        let material = &materials[object.material];

        if !self.records.contains_key(object_id) {
            self.records.insert(object_id, ObjectRecord::default());
        }

        // Fast path: bound and nothing relevant changed. The backend check
        // runs last, only when the material checks came up clean.
        let record = &self.records[object_id];
        if let Some(bound) = record.pipeline {
            if record.material == object.material
                && record.material_version == material.version()
                && record.state == *material.state()
                && !backend.needs_update(object)
            {
                return Ok(bound);
            }
        }

        // Rebuild: drop the previous binding first, then snapshot what this
        // binding is being built against.
        if let Some(previous) = self.records[object_id].pipeline.take() {
            self.release_pipeline_ref(backend, stages, previous);
        }
        {
            let record = &mut self.records[object_id];
            record.material = object.material;
            record.material_version = material.version();
            record.state = *material.state();
        }

        let sources = shaders.shader_sources(object, material);

        let vertex_existed = stages.find(StageKind::Vertex, &sources.vertex).is_some();
        let vertex = stages.get_or_create(backend, StageKind::Vertex, &sources.vertex)?;

        let fragment_existed = stages.find(StageKind::Fragment, &sources.fragment).is_some();
        let fragment = match stages.get_or_create(backend, StageKind::Fragment, &sources.fragment) {
            Ok(fragment) => fragment,
            Err(err) => {
                if !vertex_existed {
                    stages.discard_unused(backend, vertex);
                }
                return Err(err);
            }
        };

        let key = PipelineKey {
            vertex,
            fragment,
            state: *material.state(),
            backend_key: backend.cache_key(object),
        };

        let id = match self.lookup.get(&key) {
            Some(&id) => id,
            None => {
                let created = backend.create_pipeline(
                    stages.resource(vertex),
                    stages.resource(fragment),
                    &key.state,
                );
                let resource = match created {
                    Ok(resource) => resource,
                    Err(err) => {
                        if !fragment_existed {
                            stages.discard_unused(backend, fragment);
                        }
                        if !vertex_existed {
                            stages.discard_unused(backend, vertex);
                        }
                        return Err(PipelineError::PipelineCreation { reason: err.0 });
                    }
                };
                let id = self.storage.insert(RenderPipeline {
                    key: key.clone(),
                    used_times: 0,
                    resource,
                });
                self.lookup.insert(key, id);
                log::debug!("created render pipeline ({} total)", self.storage.len());
                id
            }
        };

        // Acquire: one reference on the pipeline and on each stage.
        self.storage[id].used_times += 1;
        stages.acquire(vertex);
        stages.acquire(fragment);
        self.records[object_id].pipeline = Some(id);
        Ok(id)
    }

    /// Releases whatever `object_id` holds and discards its record.
    ///
    /// Called when an object leaves the scene or is destroyed. Unknown ids
    /// and already-removed records are a no-op, as are records left unbound
    /// by a failed rebuild.
    pub fn remove(&mut self, backend: &mut B, stages: &mut StageCache<B>, object_id: RenderObjectId) {
        let Some(record) = self.records.remove(object_id) else {
            return;
        };
        if let Some(bound) = record.pipeline {
            self.release_pipeline_ref(backend, stages, bound);
        }
    }

    /// Clears the pipeline registry, both stage registries and all records
    /// unconditionally, without per-entry decrements or backend release
    /// calls. Idempotent.
    ///
    /// Dropping the entries frees owned resources for RAII backends; with
    /// handle-style resources, disposing a non-empty cache leaks on the
    /// backend side and is the caller's responsibility.
    pub fn dispose(&mut self, stages: &mut StageCache<B>) {
        let pipelines = self.storage.len();
        let stage_count = stages.stage_count();
        self.storage.clear();
        self.lookup.clear();
        self.records.clear();
        stages.clear();
        if pipelines > 0 || stage_count > 0 {
            log::info!("pipeline cache disposed ({pipelines} pipelines, {stage_count} stages dropped)");
        }
    }

    // ── Retrieval (execute-phase, O(1)) ──────────────────────────────────────

    /// Retrieve the backend pipeline resource by handle.
    ///
    /// **Panics** if the id is stale.
    #[inline]
    #[must_use]
    pub fn pipeline(&self, id: PipelineId) -> &B::PipelineResource {
        self.storage[id].resource()
    }

    /// Retrieve a pipeline entry by handle.
    #[inline]
    #[must_use]
    pub fn get(&self, id: PipelineId) -> Option<&RenderPipeline<B>> {
        self.storage.get(id)
    }

    /// The binding record of an object, if it has one.
    #[inline]
    #[must_use]
    pub fn record(&self, object_id: RenderObjectId) -> Option<&ObjectRecord> {
        self.records.get(object_id)
    }

    // ── Stats ────────────────────────────────────────────────────────────────

    /// Number of distinct pipelines currently in the registry.
    #[must_use]
    pub fn pipeline_count(&self) -> usize {
        self.storage.len()
    }

    /// Number of object records currently tracked.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Drops one reference on a pipeline and on both of its stages, evicting
    /// each entry whose count transitions to zero. The pipeline resource is
    /// released before its stages.
    fn release_pipeline_ref(
        &mut self,
        backend: &mut B,
        stages: &mut StageCache<B>,
        id: PipelineId,
    ) {
        let (vertex, fragment, evict) = {
            let pipeline = self
                .storage
                .get_mut(id)
                .expect("released a pipeline that is not in the cache");
            assert!(pipeline.used_times > 0, "pipeline used_times underflow");
            pipeline.used_times -= 1;
            (
                pipeline.key.vertex,
                pipeline.key.fragment,
                pipeline.used_times == 0,
            )
        };

        if evict {
            let pipeline = self
                .storage
                .remove(id)
                .expect("evicted a pipeline that is not in the cache");
            self.lookup.remove(&pipeline.key);
            log::debug!("released render pipeline ({} remain)", self.storage.len());
            backend.release_pipeline(pipeline.resource);
        }

        stages.release(backend, vertex);
        stages.release(backend, fragment);
    }
}
