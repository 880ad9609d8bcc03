//! CPU-side resource definitions.
//!
//! Everything here is plain data with no backend dependency:
//! - Material: render-state fields plus a change-tracked version
//! - RenderState: the material fingerprint that decides pipeline identity
//! - ChangeTracker / MutGuard: version bookkeeping shared by resources

pub mod material;
pub mod render_state;
pub mod version_tracker;

// Re-export common types
pub use material::{Material, MaterialId, Materials};
pub use render_state::{
    BlendFactor, BlendOperation, Blending, CompareFunction, RenderState, Side, StencilOperation,
    TextureFormat,
};
pub use version_tracker::{ChangeTracker, MutGuard};
