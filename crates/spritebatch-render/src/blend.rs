//! Blend equations a frame can be drawn with.

/// How sprite colors are combined with what is already in the target.
///
/// Chosen per frame in [`SpriteBatch::begin`](crate::SpriteBatch::begin). Each
/// mode maps to its own render pipeline, created the first time it is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// Source replaces destination.
    Replace,

    /// `src.rgb * src.a + dst.rgb * (1 - src.a)`
    #[default]
    Alpha,

    /// `src.rgb + dst.rgb * (1 - src.a)`
    PremultipliedAlpha,

    /// `src.rgb * src.a + dst.rgb`
    Additive,

    /// `src.rgb * dst.rgb`
    Multiply,

    /// Caller-supplied blend state.
    Custom(wgpu::BlendState),
}

impl BlendMode {
    pub fn to_blend_state(self) -> Option<wgpu::BlendState> {
        match self {
            BlendMode::Replace => Some(wgpu::BlendState::REPLACE),
            BlendMode::Alpha => Some(wgpu::BlendState::ALPHA_BLENDING),
            BlendMode::PremultipliedAlpha => Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
            BlendMode::Additive => Some(wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
            }),
            BlendMode::Multiply => Some(wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::Dst,
                    dst_factor: wgpu::BlendFactor::Zero,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::DstAlpha,
                    dst_factor: wgpu::BlendFactor::Zero,
                    operation: wgpu::BlendOperation::Add,
                },
            }),
            BlendMode::Custom(state) => Some(state),
        }
    }

    /// Debug label for the pipeline built for this mode.
    pub fn pipeline_label(self) -> &'static str {
        match self {
            BlendMode::Replace => "sprite_pipeline_replace",
            BlendMode::Alpha => "sprite_pipeline_alpha",
            BlendMode::PremultipliedAlpha => "sprite_pipeline_premultiplied",
            BlendMode::Additive => "sprite_pipeline_additive",
            BlendMode::Multiply => "sprite_pipeline_multiply",
            BlendMode::Custom(_) => "sprite_pipeline_custom",
        }
    }
}

impl From<wgpu::BlendState> for BlendMode {
    fn from(state: wgpu::BlendState) -> Self {
        BlendMode::Custom(state)
    }
}
