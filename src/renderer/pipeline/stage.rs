//! Programmable stage cache.
//!
//! Deduplicates compiled shader stages by **exact source identity**: the
//! registry key is an xxh3-128 of the source text, one registry per stage
//! kind, so the same source used as both vertex and fragment yields two
//! independent entries. Entries are reference-counted with `used_times`;
//! the backend resource is freed exactly when the count transitions to zero.
//!
//! The cache itself never changes a count. Acquisition and release are
//! driven by the pipeline cache, which counts one reference on both stages
//! for every binding it hands out.

use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use xxhash_rust::xxh3::xxh3_128;

use crate::errors::{PipelineError, Result};
use crate::renderer::backend::RenderBackend;

new_key_type! {
    /// Handle to a [`ProgrammableStage`] in a [`StageCache`].
    pub struct StageId;
}

/// Which programmable stage a source compiles as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

// ─── Programmable Stage ───────────────────────────────────────────────────────

/// One compiled, reference-counted shader stage.
///
/// Immutable once created; the source text is retained verbatim for
/// diagnostics and re-keying.
pub struct ProgrammableStage<B: RenderBackend> {
    kind: StageKind,
    source: String,
    source_hash: u128,
    used_times: u32,
    resource: B::StageResource,
}

impl<B: RenderBackend> ProgrammableStage<B> {
    #[inline]
    #[must_use]
    pub fn kind(&self) -> StageKind {
        self.kind
    }

    /// The exact source this stage was compiled from.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// How many live bindings currently count this stage.
    #[inline]
    #[must_use]
    pub fn used_times(&self) -> u32 {
        self.used_times
    }

    /// The backend resource backing this stage.
    #[inline]
    #[must_use]
    pub fn resource(&self) -> &B::StageResource {
        &self.resource
    }
}

// ─── Stage Cache ──────────────────────────────────────────────────────────────

/// Source-identity cache of compiled stages, one registry per [`StageKind`].
pub struct StageCache<B: RenderBackend> {
    storage: SlotMap<StageId, ProgrammableStage<B>>,
    /// xxh3-128 of the source → stage, vertex registry.
    vertex: FxHashMap<u128, StageId>,
    /// xxh3-128 of the source → stage, fragment registry.
    fragment: FxHashMap<u128, StageId>,
}

impl<B: RenderBackend> Default for StageCache<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: RenderBackend> StageCache<B> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: SlotMap::with_key(),
            vertex: FxHashMap::default(),
            fragment: FxHashMap::default(),
        }
    }

    fn registry(&self, kind: StageKind) -> &FxHashMap<u128, StageId> {
        match kind {
            StageKind::Vertex => &self.vertex,
            StageKind::Fragment => &self.fragment,
        }
    }

    fn registry_mut(&mut self, kind: StageKind) -> &mut FxHashMap<u128, StageId> {
        match kind {
            StageKind::Vertex => &mut self.vertex,
            StageKind::Fragment => &mut self.fragment,
        }
    }

    /// Looks up the stage compiled from exactly `source`, without side
    /// effects.
    #[must_use]
    pub fn find(&self, kind: StageKind, source: &str) -> Option<StageId> {
        self.registry(kind).get(&xxh3_128(source.as_bytes())).copied()
    }

    /// Returns the stage for `source`, compiling it through the backend on
    /// first sight.
    ///
    /// New entries start with `used_times == 0`; callers count acquisitions
    /// via [`acquire`](Self::acquire). On compile failure nothing is
    /// inserted and the error carries the offending source.
    pub fn get_or_create(
        &mut self,
        backend: &mut B,
        kind: StageKind,
        source: &str,
    ) -> Result<StageId> {
        let hash = xxh3_128(source.as_bytes());
        if let Some(&id) = self.registry(kind).get(&hash) {
            return Ok(id);
        }

        let resource =
            backend
                .compile_stage(kind, source)
                .map_err(|e| PipelineError::StageCompile {
                    kind,
                    reason: e.0,
                    shader_source: source.to_owned(),
                })?;

        let id = self.storage.insert(ProgrammableStage {
            kind,
            source: source.to_owned(),
            source_hash: hash,
            used_times: 0,
            resource,
        });
        self.registry_mut(kind).insert(hash, id);
        log::debug!("compiled {kind} stage ({} bytes)", source.len());
        Ok(id)
    }

    /// Adds one reference to a stage.
    ///
    /// **Panics** if the id is stale.
    pub fn acquire(&mut self, id: StageId) {
        let stage = self
            .storage
            .get_mut(id)
            .expect("acquired a stage that is not in the cache");
        stage.used_times += 1;
    }

    /// Drops one reference; on the zero transition the entry is evicted and
    /// its resource handed to [`RenderBackend::release_stage`].
    ///
    /// **Panics** if the id is stale or the count underflows.
    pub fn release(&mut self, backend: &mut B, id: StageId) {
        {
            let stage = self
                .storage
                .get_mut(id)
                .expect("released a stage that is not in the cache");
            assert!(stage.used_times > 0, "stage used_times underflow");
            stage.used_times -= 1;
            if stage.used_times > 0 {
                return;
            }
        }
        self.evict(backend, id);
    }

    /// Evicts an entry that was created but never acquired.
    ///
    /// Used to roll back a stage compiled earlier in a lookup that failed
    /// further down, so a failed call leaves no partial state behind.
    pub(crate) fn discard_unused(&mut self, backend: &mut B, id: StageId) {
        debug_assert_eq!(
            self.storage[id].used_times, 0,
            "discard_unused on an acquired stage"
        );
        self.evict(backend, id);
    }

    fn evict(&mut self, backend: &mut B, id: StageId) {
        let stage = self
            .storage
            .remove(id)
            .expect("evicted a stage that is not in the cache");
        self.registry_mut(stage.kind).remove(&stage.source_hash);
        log::debug!("released {} stage ({} bytes)", stage.kind, stage.source.len());
        backend.release_stage(stage.resource);
    }

    /// Drops every entry without backend release calls (dispose semantics).
    pub fn clear(&mut self) {
        self.storage.clear();
        self.vertex.clear();
        self.fragment.clear();
    }

    #[inline]
    #[must_use]
    pub fn stage(&self, id: StageId) -> Option<&ProgrammableStage<B>> {
        self.storage.get(id)
    }

    /// Retrieve the backend resource of a stage by handle.
    ///
    /// **Panics** if the id is stale.
    #[inline]
    #[must_use]
    pub fn resource(&self, id: StageId) -> &B::StageResource {
        self.storage[id].resource()
    }

    /// Total number of cached stages across both kinds.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.storage.len()
    }

    /// Number of cached stages of one kind.
    #[must_use]
    pub fn stage_count_of(&self, kind: StageKind) -> usize {
        self.registry(kind).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}
