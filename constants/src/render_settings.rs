use bevy::math::Vec4;
use bevy::render::render_resource::ShaderType;

/// Uniform block consumed by `fresnel_highlight.wgsl`.
#[derive(Debug, Default, Clone, Copy, ShaderType)]
pub struct HighlightSettings {
    /// Linear RGB glow colour, alpha unused.
    pub colour: Vec4,
    /// Exponent applied to `1 - |n·v|`; higher values thin the rim.
    pub fresnel_power: f32,
    /// Opacity when looking straight at a surface.
    pub base_opacity: f32,
    /// Opacity at the silhouette edge.
    pub edge_opacity: f32,
    pub _padding: f32,
}

pub const HIGHLIGHT_SETTINGS: HighlightSettings = HighlightSettings {
    colour: Vec4::new(0.25, 0.85, 1.0, 1.0),
    fresnel_power: 2.5,
    base_opacity: 0.12,
    edge_opacity: 0.9,
    _padding: 0.0,
};

/// Depth bias pushing overlays in front of the hidden base geometry.
pub const HIGHLIGHT_DEPTH_BIAS: f32 = 1000.0;
