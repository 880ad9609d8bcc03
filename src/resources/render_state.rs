//! Material render state and its fingerprint.
//!
//! Pipeline identity is decided by structural equality over [`RenderState`],
//! one plain struct with **derived** `PartialEq` / `Eq` / `Hash`. Every field
//! added here automatically participates in cache keys and in the per-object
//! needs-update comparison; there is no hand-written field list to keep in
//! sync.
//!
//! The enums use the wgpu vocabulary; [`Blending`] is the material-level blend
//! mode from which backends derive concrete factor/equation state. The custom
//! factor/equation fields compare even while a preset mode is selected, so
//! editing them always invalidates, matching how the original material model
//! behaves.

// ─── State Enums ──────────────────────────────────────────────────────────────

/// Material-level blend mode.
///
/// Presets (`Normal`, `Additive`, …) are translated to concrete blend
/// factor/equation state by the backend; `Custom` uses the material's
/// explicit `blend_*` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Blending {
    /// No blending; the fragment output replaces the target.
    None,
    /// Standard alpha blending.
    Normal,
    /// Additive blending.
    Additive,
    /// Subtractive blending.
    Subtractive,
    /// Multiplicative blending.
    Multiply,
    /// Blend factors/equations taken from the material's explicit fields.
    Custom,
}

/// Blend factor applied to source or destination color/alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    Src,
    OneMinusSrc,
    SrcAlpha,
    OneMinusSrcAlpha,
    Dst,
    OneMinusDst,
    DstAlpha,
    OneMinusDstAlpha,
    SrcAlphaSaturated,
    Constant,
    OneMinusConstant,
}

/// Operation combining the weighted source and destination terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendOperation {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

/// Comparison function for depth and stencil tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareFunction {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

/// Action taken on a stencil-buffer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StencilOperation {
    Keep,
    Zero,
    Replace,
    Invert,
    IncrementClamp,
    DecrementClamp,
    IncrementWrap,
    DecrementWrap,
}

/// Which triangle faces are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Front faces only (back faces culled).
    Front,
    /// Back faces only (front faces culled).
    Back,
    /// Both faces (culling disabled).
    Double,
}

/// Render-target texture formats understood by the built-in backend settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    Rgba8Unorm,
    Bgra8Unorm,
    Rgba16Float,
    Depth24PlusStencil8,
    Depth32Float,
}

// ─── Render State Fingerprint ─────────────────────────────────────────────────

/// The material render-state fingerprint.
///
/// Holds every material field that contributes to pipeline identity, in cache
/// key order. Equality and hashing are derived; two materials with equal
/// fingerprints (and equal shader sources and backend key) share one pipeline.
///
/// `stencil_ref` is deliberately absent: it is dynamic encoder state, not
/// pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderState {
    pub transparent: bool,
    pub blending: Blending,
    pub premultiplied_alpha: bool,
    pub blend_src: BlendFactor,
    pub blend_dst: BlendFactor,
    pub blend_equation: BlendOperation,
    /// `None` derives the alpha factor from the color factor.
    pub blend_src_alpha: Option<BlendFactor>,
    pub blend_dst_alpha: Option<BlendFactor>,
    pub blend_equation_alpha: Option<BlendOperation>,
    pub color_write: bool,
    pub depth_write: bool,
    pub depth_test: bool,
    pub depth_func: CompareFunction,
    pub stencil_write: bool,
    pub stencil_func: CompareFunction,
    pub stencil_fail: StencilOperation,
    pub stencil_zfail: StencilOperation,
    pub stencil_zpass: StencilOperation,
    pub stencil_func_mask: u32,
    pub stencil_write_mask: u32,
    pub alpha_to_coverage: bool,
    pub side: Side,
}

impl Default for RenderState {
    /// Opaque front-face defaults matching the classic material model.
    fn default() -> Self {
        Self {
            transparent: false,
            blending: Blending::Normal,
            premultiplied_alpha: false,
            blend_src: BlendFactor::SrcAlpha,
            blend_dst: BlendFactor::OneMinusSrcAlpha,
            blend_equation: BlendOperation::Add,
            blend_src_alpha: None,
            blend_dst_alpha: None,
            blend_equation_alpha: None,
            color_write: true,
            depth_write: true,
            depth_test: true,
            depth_func: CompareFunction::LessEqual,
            stencil_write: false,
            stencil_func: CompareFunction::Always,
            stencil_fail: StencilOperation::Keep,
            stencil_zfail: StencilOperation::Keep,
            stencil_zpass: StencilOperation::Keep,
            stencil_func_mask: 0xff,
            stencil_write_mask: 0xff,
            alpha_to_coverage: false,
            side: Side::Front,
        }
    }
}

impl RenderState {
    /// Whether fragments are blended with the target rather than replacing it.
    #[inline]
    #[must_use]
    pub fn blends(&self) -> bool {
        self.transparent && self.blending != Blending::None
    }
}
