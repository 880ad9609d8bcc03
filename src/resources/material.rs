//! Materials and the material arena.
//!
//! A [`Material`] is the render-state side of a surface description: the
//! [`RenderState`] fingerprint fields plus a monotonic version. The version
//! advances on every edit (field changes and value-only changes alike) and
//! drives the per-object needs-update check; the fingerprint decides which
//! pipeline the object ends up sharing.
//!
//! Materials live in a [`Materials`] arena and are referred to by
//! [`MaterialId`] handles, so several render objects can share one material.
//!
//! ```rust,ignore
//! let mut materials = Materials::new();
//! let id = materials.add(Material::new());
//!
//! // Edits go through a guard; the version bumps once when it drops.
//! materials[id].edit().depth_write = false;
//! ```

use slotmap::{SlotMap, new_key_type};

use crate::resources::render_state::RenderState;
use crate::resources::version_tracker::{ChangeTracker, MutGuard};

new_key_type! {
    /// Handle to a [`Material`] stored in a [`Materials`] arena.
    pub struct MaterialId;
}

// ─── Material ─────────────────────────────────────────────────────────────────

/// Render-state fields plus a change-tracking version.
#[derive(Debug, Clone, Default)]
pub struct Material {
    state: RenderState,
    version: ChangeTracker,
}

impl Material {
    /// Creates a material with opaque front-face defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a material from an explicit render state.
    #[must_use]
    pub fn with_state(state: RenderState) -> Self {
        Self {
            state,
            version: ChangeTracker::new(),
        }
    }

    /// The current render-state fingerprint fields.
    #[inline]
    #[must_use]
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// The current material version.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version.version()
    }

    /// Mutable access to the render state through a version-bumping guard.
    ///
    /// The version advances exactly once when the guard drops, regardless of
    /// how many fields were touched.
    pub fn edit(&mut self) -> MutGuard<'_, RenderState> {
        MutGuard::new(&mut self.state, &mut self.version)
    }

    /// Bumps the version without changing any fingerprint field.
    ///
    /// Stands in for changes that invalidate an object's binding but not the
    /// pipeline identity (uniform values, texture contents); the rebuild
    /// resolves to the same pipeline through a registry hit.
    pub fn touch(&mut self) {
        self.version.changed();
    }
}

// ─── Material Arena ───────────────────────────────────────────────────────────

/// Arena of materials, indexed by [`MaterialId`].
#[derive(Debug, Default)]
pub struct Materials {
    storage: SlotMap<MaterialId, Material>,
}

impl Materials {
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: SlotMap::with_key(),
        }
    }

    /// Adds a material and returns its handle.
    pub fn add(&mut self, material: Material) -> MaterialId {
        self.storage.insert(material)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.storage.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.storage.get_mut(id)
    }

    /// Removes a material, invalidating its handle.
    pub fn remove(&mut self, id: MaterialId) -> Option<Material> {
        self.storage.remove(id)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, id: MaterialId) -> bool {
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

impl std::ops::Index<MaterialId> for Materials {
    type Output = Material;

    /// **Panics** if the handle is stale.
    fn index(&self, id: MaterialId) -> &Material {
        &self.storage[id]
    }
}

impl std::ops::IndexMut<MaterialId> for Materials {
    /// **Panics** if the handle is stale.
    fn index_mut(&mut self, id: MaterialId) -> &mut Material {
        &mut self.storage[id]
    }
}
