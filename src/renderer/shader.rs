//! Shader source production seam.
//!
//! The pipeline cache never generates shader code; it asks a
//! [`ShaderBuilder`] for the current source pair of an object and
//! deduplicates the result by exact source identity. Engines plug in their
//! template/node systems here; tests plug in fixed strings.

use crate::renderer::objects::RenderObject;
use crate::resources::material::Material;

/// A vertex/fragment source pair, exact text.
///
/// Identity is the text itself: stages are shared between objects exactly
/// when their generated source is byte-for-byte equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    #[must_use]
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

/// Produces shader sources for render objects.
///
/// Called only on the rebuild path, never on a cache hit. Implementations
/// are free to cache generated code internally; the pipeline cache only
/// cares about the returned text.
pub trait ShaderBuilder {
    fn shader_sources(&mut self, object: &RenderObject, material: &Material) -> ShaderSources;
}

/// The simplest builder: one fixed source pair for every object.
///
/// Useful for depth-only or debug passes and as a test fixture.
#[derive(Debug, Clone)]
pub struct StaticShaders {
    sources: ShaderSources,
}

impl StaticShaders {
    #[must_use]
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            sources: ShaderSources::new(vertex, fragment),
        }
    }
}

impl ShaderBuilder for StaticShaders {
    fn shader_sources(&mut self, _object: &RenderObject, _material: &Material) -> ShaderSources {
        self.sources.clone()
    }
}
