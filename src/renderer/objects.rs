//! Render objects and their arena.
//!
//! A [`RenderObject`] is the per-draw descriptor consumed by the pipeline
//! cache: which material the draw uses, under a stable [`RenderObjectId`].
//! The id doubles as the key of the cache's record side-table and as the
//! identity backends use for per-object bookkeeping.
//!
//! Geometry, transforms and camera state live in the surrounding renderer;
//! the cache only ever looks at the material and at what the backend and
//! shader builder say about the object.

use slotmap::{SlotMap, new_key_type};

use crate::resources::material::MaterialId;

new_key_type! {
    /// Handle to a [`RenderObject`] stored in a [`RenderObjects`] arena.
    pub struct RenderObjectId;
}

/// Per-draw descriptor: a material reference under a stable id.
#[derive(Debug, Clone)]
pub struct RenderObject {
    id: RenderObjectId,
    /// The material driving this object's pipeline state. Swapping it is an
    /// ordinary invalidation: the next cache lookup rebinds.
    pub material: MaterialId,
}

impl RenderObject {
    /// The arena id this object was created under.
    #[inline]
    #[must_use]
    pub fn id(&self) -> RenderObjectId {
        self.id
    }
}

/// Arena of render objects, indexed by [`RenderObjectId`].
#[derive(Debug, Default)]
pub struct RenderObjects {
    storage: SlotMap<RenderObjectId, RenderObject>,
}

impl RenderObjects {
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: SlotMap::with_key(),
        }
    }

    /// Creates an object bound to `material` and returns its handle.
    pub fn create(&mut self, material: MaterialId) -> RenderObjectId {
        self.storage
            .insert_with_key(|id| RenderObject { id, material })
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: RenderObjectId) -> Option<&RenderObject> {
        self.storage.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: RenderObjectId) -> Option<&mut RenderObject> {
        self.storage.get_mut(id)
    }

    /// Removes an object, invalidating its handle.
    ///
    /// The caller is expected to [`remove`](crate::renderer::pipeline::PipelineCache::remove)
    /// the object from the pipeline cache first, releasing whatever it held.
    pub fn remove(&mut self, id: RenderObjectId) -> Option<RenderObject> {
        self.storage.remove(id)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, id: RenderObjectId) -> bool {
        self.storage.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl std::ops::Index<RenderObjectId> for RenderObjects {
    type Output = RenderObject;

    /// **Panics** if the handle is stale.
    fn index(&self, id: RenderObjectId) -> &RenderObject {
        &self.storage[id]
    }
}

impl std::ops::IndexMut<RenderObjectId> for RenderObjects {
    /// **Panics** if the handle is stale.
    fn index_mut(&mut self, id: RenderObjectId) -> &mut RenderObject {
        &mut self.storage[id]
    }
}
