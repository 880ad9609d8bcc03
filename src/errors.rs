//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`PipelineError`] covers the failure modes of pipeline
//! construction:
//! - Shader stage compilation failures
//! - Backend pipeline creation failures
//!
//! Both originate in the backend and are reported synchronously by the call
//! that triggered them. Stale handles and reference-count underflows are
//! caller programming errors and panic instead of returning an error.
//!
//! # Usage
//!
//! Fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, PipelineError>`.
//!
//! ```rust,ignore
//! use fable::errors::{PipelineError, Result};
//!
//! fn prepare_object() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::renderer::pipeline::StageKind;

/// Diagnostic reported by a [`RenderBackend`](crate::renderer::RenderBackend)
/// implementation.
///
/// Backends know nothing about the cache; they report plain diagnostic text
/// and the cache wraps it into a [`PipelineError`] with context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct BackendError(pub String);

impl BackendError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The main error type for pipeline construction.
///
/// A failed call leaves no partial cache state behind: nothing was inserted
/// for the failing entry, and anything created earlier in the same call that
/// nothing acquired has been rolled back.
#[derive(Error, Debug)]
pub enum PipelineError {
    // ========================================================================
    // Stage Compilation Errors
    // ========================================================================
    /// The backend rejected a shader stage source.
    #[error("Failed to compile {kind} stage: {reason}")]
    StageCompile {
        /// Which stage kind failed to compile.
        kind: StageKind,
        /// Backend diagnostic text.
        reason: String,
        /// The offending shader source, verbatim.
        shader_source: String,
    },

    // ========================================================================
    // Pipeline Creation Errors
    // ========================================================================
    /// The backend failed to assemble a pipeline from compiled stages.
    #[error("Failed to create render pipeline: {reason}")]
    PipelineCreation {
        /// Backend diagnostic text.
        reason: String,
    },
}

/// Alias for `Result<T, PipelineError>`.
pub type Result<T> = std::result::Result<T, PipelineError>;
